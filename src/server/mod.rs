//! Event Ingestion Server
//!
//! HTTP listener the gateway pushes events to, one event per POST request.

pub(crate) mod http;

pub mod api;

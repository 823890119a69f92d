//! Outbound Gateway Client
//!
//! Thin, fail-fast client for the gateway's action API. Every call is a
//! single POST with a bounded timeout; retry policy belongs to callers.

// Internal modules - all access should go through api module
pub(crate) mod client;
pub(crate) mod error;
pub(crate) mod types;

// Public API module - the only public interface for the gateway client
pub mod api;

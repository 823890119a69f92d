//! Public API for the event ingestion server

pub use crate::server::http::{build_router, serve, AppState};

//! Inbound Event Model
//!
//! Typed representation of gateway-pushed events and the normalizer that
//! produces them from raw JSON payloads. Events are immutable once
//! normalized; plugins only ever borrow them.

// Internal modules - all access should go through api module
pub(crate) mod error;
pub(crate) mod normalizer;
pub(crate) mod types;

// Public API module - the only public interface for the event system
pub mod api;

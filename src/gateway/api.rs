//! Public API for the outbound gateway client

pub use crate::gateway::client::GatewayClient;
pub use crate::gateway::error::{TransportError, TransportResult};
pub use crate::gateway::types::{ActionAck, MessageTarget};

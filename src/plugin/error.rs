//! Plugin Error Types

use crate::gateway::api::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("plugin id '{id}' is already registered")]
    DuplicateId { id: String },

    #[error("plugin not found: {id}")]
    NotFound { id: String },

    #[error("setup failed: {message}")]
    Setup { message: String },

    #[error("{message}")]
    Handler { message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl PluginError {
    /// Plugin-defined handler failure with an arbitrary message
    pub fn handler(message: impl Into<String>) -> Self {
        PluginError::Handler {
            message: message.into(),
        }
    }
}

/// Result type for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;

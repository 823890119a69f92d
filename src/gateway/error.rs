//! Gateway Transport Error Types

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("gateway call timed out")]
    Timeout,

    #[error("gateway returned HTTP status {status}")]
    Status { status: u16 },

    #[error("gateway rejected action '{action}': {message}")]
    ActionFailed { action: String, message: String },

    #[error("malformed acknowledgment body: {message}")]
    MalformedResponse { message: String },

    #[error("transport failure: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for gateway calls
pub type TransportResult<T> = Result<T, TransportError>;

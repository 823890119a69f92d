//! Event Normalization Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("unknown event kind: {kind}")]
    UnknownKind { kind: String },

    #[error("malformed message content: {message}")]
    MalformedContent { message: String },
}

/// Result type for normalization
pub type NormalizationResult<T> = Result<T, NormalizationError>;

use thiserror::Error;

/// Errors raised while parsing or regenerating subtitle documents.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The document produced zero recoverable cues. Non-fatal: callers decide
    /// whether an empty document is acceptable in their context.
    #[error("subtitle document contained no recoverable cues")]
    Empty,

    /// A timestamp could not be parsed (`HH:MM:SS,mmm` / `HH:MM:SS.mmm`).
    #[error("malformed timestamp: {0}")]
    BadTimestamp(String),
}

impl CodecError {
    pub fn kind(&self) -> crate::ErrorKind {
        match self {
            CodecError::Empty => crate::ErrorKind::Empty,
            CodecError::BadTimestamp(_) => crate::ErrorKind::BadInput,
        }
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error on cache entry {fingerprint}: {source}")]
    Io {
        fingerprint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cache entry not found for fingerprint {0}")]
    NotFound(String),

    #[error("metadata for fingerprint {0} is corrupt: {1}")]
    CorruptMetadata(String, String),
}

impl CacheError {
    pub fn kind(&self) -> crate::ErrorKind {
        match self {
            CacheError::Io { .. } => crate::ErrorKind::Internal,
            CacheError::NotFound(_) => crate::ErrorKind::BadInput,
            CacheError::CorruptMetadata(..) => crate::ErrorKind::Internal,
        }
    }
}

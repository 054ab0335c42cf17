use crate::cache::CacheError;
use crate::codec::CodecError;
use crate::engine::EngineError;
use crate::opensubs_client::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum SubtitleServiceError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("translation engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("unknown fingerprint: {0}")]
    UnknownFingerprint(String),
}

impl SubtitleServiceError {
    pub fn kind(&self) -> crate::ErrorKind {
        match self {
            SubtitleServiceError::Catalog(e) => e.kind(),
            SubtitleServiceError::Codec(e) => e.kind(),
            SubtitleServiceError::Engine(e) => match e {
                EngineError::UpstreamUnavailable(_) => crate::ErrorKind::UpstreamUnavailable,
                EngineError::BadResponse { .. } => crate::ErrorKind::Internal,
            },
            SubtitleServiceError::Cache(e) => e.kind(),
            SubtitleServiceError::UnknownFingerprint(_) => crate::ErrorKind::BadInput,
        }
    }
}

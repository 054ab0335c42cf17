#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("OpenSubtitles is not configured: {0}")]
    NotConfigured(String),

    #[error("OpenSubtitles rate limit exceeded")]
    RateLimitExceeded,

    #[error("OpenSubtitles API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("failed to parse response: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        CatalogError::Http(e.to_string())
    }
}

impl CatalogError {
    pub fn kind(&self) -> crate::ErrorKind {
        match self {
            CatalogError::NotConfigured(_) => crate::ErrorKind::NotConfigured,
            CatalogError::RateLimitExceeded | CatalogError::Http(_) => {
                crate::ErrorKind::UpstreamUnavailable
            }
            CatalogError::ApiError { .. } => crate::ErrorKind::UpstreamUnavailable,
            CatalogError::NotFound(_) => crate::ErrorKind::BadInput,
            CatalogError::ParseError(_) => crate::ErrorKind::UpstreamUnavailable,
        }
    }
}

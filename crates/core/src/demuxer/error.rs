#[derive(Debug, thiserror::Error)]
pub enum DemuxerError {
    #[error("ffprobe binary not found at {path}")]
    ProbeNotFound { path: String },

    #[error("ffmpeg binary not found at {path}")]
    ExtractNotFound { path: String },

    #[error("probe failed: {0}")]
    ProbeFailed(String),

    #[error("extraction failed: {0}")]
    ExtractFailed(String),

    #[error("failed to parse ffprobe output: {0}")]
    ParseError(String),

    #[error("no subtitle track at index {0}")]
    TrackNotFound(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DemuxerError {
    pub fn kind(&self) -> crate::ErrorKind {
        match self {
            DemuxerError::ProbeNotFound { .. }
            | DemuxerError::ExtractNotFound { .. }
            | DemuxerError::ProbeFailed(_)
            | DemuxerError::ExtractFailed(_)
            | DemuxerError::Io(_) => crate::ErrorKind::UpstreamUnavailable,
            DemuxerError::ParseError(_) | DemuxerError::TrackNotFound(_) => crate::ErrorKind::BadInput,
        }
    }
}

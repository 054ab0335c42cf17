use thiserror::Error;

use crate::demuxer::DemuxerError;
use crate::subtitle_service::SubtitleServiceError;
use crate::vfs::VfsError;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("a batch is already active")]
    Busy,

    #[error("no batch has been analyzed yet")]
    NotAnalyzed,

    #[error("analyzed batch has no videos carrying an english subtitle track")]
    NoVideos,

    #[error("vfs error: {0}")]
    Vfs(#[from] VfsError),

    #[error("demuxer error: {0}")]
    Demuxer(#[from] DemuxerError),

    #[error("translation error: {0}")]
    Translation(#[from] SubtitleServiceError),
}

impl BatchError {
    pub fn kind(&self) -> crate::ErrorKind {
        match self {
            BatchError::Busy => crate::ErrorKind::Busy,
            BatchError::NotAnalyzed | BatchError::NoVideos => crate::ErrorKind::BadInput,
            BatchError::Vfs(e) => e.kind(),
            BatchError::Demuxer(e) => e.kind(),
            BatchError::Translation(e) => e.kind(),
        }
    }
}

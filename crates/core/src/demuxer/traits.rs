use async_trait::async_trait;
use std::path::Path;

use super::error::DemuxerError;
use super::types::SubtitleTrack;

/// Container introspection and subtitle extraction, backed by an
/// external probing/transcoding binary. Unavailable (not merely erroring)
/// if that binary can't be located on the host.
#[async_trait]
pub trait Demuxer: Send + Sync {
    async fn subtitle_tracks(&self, path: &Path) -> Result<Vec<SubtitleTrack>, DemuxerError>;

    /// Extracts the track at ffprobe stream `index` and returns it as
    /// SRT text.
    async fn extract_track(&self, path: &Path, index: usize) -> Result<String, DemuxerError>;
}

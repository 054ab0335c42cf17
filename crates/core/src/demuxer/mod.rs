//! Container probing and subtitle-track extraction via `ffprobe`/`ffmpeg`.

mod error;
mod ffprobe;
mod traits;
mod types;

pub use error::DemuxerError;
pub use ffprobe::FfprobeDemuxer;
pub use traits::Demuxer;
pub use types::SubtitleTrack;

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::error::DemuxerError;
use super::traits::Demuxer;
use super::types::SubtitleTrack;

/// `ffprobe`/`ffmpeg`-backed demuxer. Probing shells out to `ffprobe
/// -show_streams`; extraction shells out to `ffmpeg -map 0:{index} -f
/// srt`, the same subprocess-plus-JSON pattern the converter module uses
/// for media probing.
pub struct FfprobeDemuxer {
    ffprobe_path: String,
    ffmpeg_path: String,
}

impl FfprobeDemuxer {
    pub fn new() -> Self {
        Self {
            ffprobe_path: "ffprobe".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }

    pub fn with_paths(ffprobe_path: impl Into<String>, ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    fn parse_probe_output(output: &str) -> Result<Vec<SubtitleTrack>, DemuxerError> {
        #[derive(Deserialize)]
        struct ProbeOutput {
            streams: Vec<ProbeStream>,
        }

        #[derive(Deserialize)]
        struct ProbeStream {
            index: usize,
            codec_type: String,
            codec_name: Option<String>,
            #[serde(default)]
            tags: ProbeTags,
        }

        #[derive(Deserialize, Default)]
        struct ProbeTags {
            language: Option<String>,
            title: Option<String>,
        }

        let probe: ProbeOutput = serde_json::from_str(output)
            .map_err(|e| DemuxerError::ParseError(e.to_string()))?;

        Ok(probe
            .streams
            .into_iter()
            .filter(|s| s.codec_type == "subtitle")
            .map(|s| SubtitleTrack {
                index: s.index,
                language: s.tags.language,
                codec: s.codec_name.unwrap_or_else(|| "unknown".to_string()),
                title: s.tags.title,
            })
            .collect())
    }
}

impl Default for FfprobeDemuxer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Demuxer for FfprobeDemuxer {
    async fn subtitle_tracks(&self, path: &Path) -> Result<Vec<SubtitleTrack>, DemuxerError> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_streams"])
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DemuxerError::ProbeNotFound { path: self.ffprobe_path.clone() }
                } else {
                    DemuxerError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(DemuxerError::ProbeFailed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        Self::parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }

    async fn extract_track(&self, path: &Path, index: usize) -> Result<String, DemuxerError> {
        let tracks = self.subtitle_tracks(path).await?;
        if !tracks.iter().any(|t| t.index == index) {
            return Err(DemuxerError::TrackNotFound(index));
        }

        let output = Command::new(&self.ffmpeg_path)
            .args(["-v", "error", "-i"])
            .arg(path)
            .args(["-map", &format!("0:{index}"), "-f", "srt", "pipe:1"])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DemuxerError::ExtractNotFound { path: self.ffmpeg_path.clone() }
                } else {
                    DemuxerError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(DemuxerError::ExtractFailed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

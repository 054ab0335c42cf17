//! Mock demuxer for testing the batch orchestrator's analyze/extract
//! flow without invoking real `ffprobe`/`ffmpeg` binaries.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::demuxer::{Demuxer, DemuxerError, SubtitleTrack};

#[derive(Debug, Clone)]
pub enum RecordedDemuxerCall {
    SubtitleTracks(String),
    ExtractTrack(String, usize),
}

/// Tracks and extracted text keyed by the video path string (not its
/// actual bytes, since tests never feed real containers through here).
pub struct MockDemuxer {
    tracks: Arc<RwLock<HashMap<String, Vec<SubtitleTrack>>>>,
    extracted: Arc<RwLock<HashMap<(String, usize), String>>>,
    calls: Arc<RwLock<Vec<RecordedDemuxerCall>>>,
    next_error: Arc<RwLock<Option<DemuxerError>>>,
}

impl Default for MockDemuxer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDemuxer {
    pub fn new() -> Self {
        Self {
            tracks: Arc::new(RwLock::new(HashMap::new())),
            extracted: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_tracks(self, path: impl Into<String>, tracks: Vec<SubtitleTrack>) -> Self {
        self.tracks.write().unwrap().insert(path.into(), tracks);
        self
    }

    pub fn with_extracted_text(
        self,
        path: impl Into<String>,
        index: usize,
        text: impl Into<String>,
    ) -> Self {
        self.extracted
            .write()
            .unwrap()
            .insert((path.into(), index), text.into());
        self
    }

    pub fn fail_next(&self, error: DemuxerError) {
        *self.next_error.write().unwrap() = Some(error);
    }

    pub fn recorded_calls(&self) -> Vec<RecordedDemuxerCall> {
        self.calls.read().unwrap().clone()
    }

    fn take_error(&self) -> Option<DemuxerError> {
        self.next_error.write().unwrap().take()
    }
}

#[async_trait]
impl Demuxer for MockDemuxer {
    async fn subtitle_tracks(&self, path: &Path) -> Result<Vec<SubtitleTrack>, DemuxerError> {
        let key = path.to_string_lossy().into_owned();
        self.calls
            .write()
            .unwrap()
            .push(RecordedDemuxerCall::SubtitleTracks(key.clone()));
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        Ok(self.tracks.read().unwrap().get(&key).cloned().unwrap_or_default())
    }

    async fn extract_track(&self, path: &Path, index: usize) -> Result<String, DemuxerError> {
        let key = path.to_string_lossy().into_owned();
        self.calls
            .write()
            .unwrap()
            .push(RecordedDemuxerCall::ExtractTrack(key.clone(), index));
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        self.extracted
            .read()
            .unwrap()
            .get(&(key, index))
            .cloned()
            .ok_or(DemuxerError::TrackNotFound(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_registered_tracks() {
        let demuxer = MockDemuxer::new().with_tracks(
            "movie.mkv",
            vec![SubtitleTrack {
                index: 2,
                language: Some("eng".to_string()),
                codec: "subrip".to_string(),
                title: None,
            }],
        );
        let tracks = demuxer.subtitle_tracks(Path::new("movie.mkv")).await.unwrap();
        assert_eq!(tracks.len(), 1);
        assert!(tracks[0].is_english());
    }

    #[tokio::test]
    async fn extract_track_returns_registered_text() {
        let demuxer = MockDemuxer::new().with_extracted_text("movie.mkv", 2, "subtitle text");
        let text = demuxer.extract_track(Path::new("movie.mkv"), 2).await.unwrap();
        assert_eq!(text, "subtitle text");
    }

    #[tokio::test]
    async fn missing_track_is_not_found() {
        let demuxer = MockDemuxer::new();
        let err = demuxer.extract_track(Path::new("movie.mkv"), 9).await.unwrap_err();
        assert!(matches!(err, DemuxerError::TrackNotFound(9)));
    }
}

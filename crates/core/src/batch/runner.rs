//! Background batch worker: recursive VFS walk, header-only track
//! analysis, per-video extract-translate-write loop.
//!
//! Grounded on `orchestrator::runner::TicketOrchestrator`'s shape: an
//! `Arc<AtomicBool>` cancel flag observed between units of work, a
//! `tokio::spawn`'d worker loop, and a single `RwLock<Option<..>>` slot
//! holding the one record that can exist at a time. Unlike the ticket
//! orchestrator there is no `start`/`stop` pair for a long-lived
//! background service -- `start(target_lang)` spawns exactly one worker
//! per batch and the worker exits when the loop finishes.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::demuxer::Demuxer;
use crate::subtitle_service::SubtitleService;
use crate::vfs::{Vfs, DEFAULT_HEADER_BYTES};

use super::error::BatchError;
use super::types::{BatchRecord, BatchStatus, BatchVideo};

/// Drives the single process-wide batch through analyze -> translate.
/// Holds its collaborators as trait objects, constructor-injected like
/// every other orchestrator in this crate.
pub struct BatchOrchestrator {
    vfs: Arc<dyn Vfs>,
    demuxer: Arc<dyn Demuxer>,
    subtitle_service: Arc<SubtitleService>,
    record: Arc<RwLock<Option<BatchRecord>>>,
    cancel: Arc<AtomicBool>,
}

impl BatchOrchestrator {
    pub fn new(
        vfs: Arc<dyn Vfs>,
        demuxer: Arc<dyn Demuxer>,
        subtitle_service: Arc<SubtitleService>,
    ) -> Self {
        Self {
            vfs,
            demuxer,
            subtitle_service,
            record: Arc::new(RwLock::new(None)),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Recursively walks `folder`, probing each video's container header
    /// for an English subtitle track. Rejects a new analysis while the
    /// existing batch hasn't reached a terminal state.
    pub async fn analyze(&self, folder: &str) -> Result<BatchRecord, BatchError> {
        {
            let existing = self.record.read().await;
            if let Some(rec) = existing.as_ref() {
                if !rec.status.is_terminal() {
                    return Err(BatchError::Busy);
                }
            }
        }

        let mut record = BatchRecord::new(folder);
        *self.record.write().await = Some(record.clone());

        let mut videos = Vec::new();
        if let Err(e) = self.walk(folder, &mut videos).await {
            record.status = BatchStatus::Failed;
            record.error = Some(e.to_string());
            *self.record.write().await = Some(record.clone());
            return Err(e);
        }

        record.total = videos.len();
        record.videos = videos;
        *self.record.write().await = Some(record.clone());
        info!(folder, videos = record.total, "batch analysis complete");
        Ok(record)
    }

    fn walk<'a>(
        &'a self,
        path: &'a str,
        out: &'a mut Vec<BatchVideo>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BatchError>> + 'a>> {
        Box::pin(async move {
            let entries = self.vfs.list(path).await?;
            for entry in entries {
                if entry.is_dir {
                    self.walk(&entry.path, out).await?;
                    continue;
                }
                if !entry.is_video {
                    continue;
                }
                if let Some(video) = self.analyze_one_video(&entry.path, &entry.name).await {
                    out.push(video);
                }
            }
            Ok(())
        })
    }

    /// Downloads only the container header, probes it for an English
    /// track, and deletes the header temp file immediately -- whether or
    /// not a track was found. A video with no probable English track (or
    /// that fails to probe at all) is simply omitted from the list, not
    /// an analysis failure.
    async fn analyze_one_video(&self, path: &str, file_name: &str) -> Option<BatchVideo> {
        let header_path = match self
            .vfs
            .download_header_to_temp(path, DEFAULT_HEADER_BYTES)
            .await
        {
            Ok(p) => p,
            Err(e) => {
                warn!(path, error = %e, "failed to download container header");
                return None;
            }
        };

        let tracks = self.demuxer.subtitle_tracks(&header_path).await;
        let _ = tokio::fs::remove_file(&header_path).await;

        match tracks {
            Ok(tracks) => tracks.into_iter().find(|t| t.is_english()).map(|track| {
                BatchVideo {
                    path: path.to_string(),
                    file_name: file_name.to_string(),
                    track_index: track.index,
                    language: track.language.unwrap_or_else(|| "en".to_string()),
                }
            }),
            Err(e) => {
                warn!(path, error = %e, "failed to probe subtitle tracks");
                None
            }
        }
    }

    /// Starts the background worker. Requires a prior `analyze()` with
    /// at least one video; transitions the record to `Translating` and
    /// returns immediately, leaving the loop to run in its own task.
    pub async fn start(&self, target_lang: impl Into<String>) -> Result<(), BatchError> {
        let target_lang = target_lang.into();
        {
            let mut guard = self.record.write().await;
            match guard.as_mut() {
                None => return Err(BatchError::NotAnalyzed),
                Some(rec) if rec.status != BatchStatus::Analyzing => return Err(BatchError::Busy),
                Some(rec) if rec.videos.is_empty() => return Err(BatchError::NoVideos),
                Some(rec) => rec.status = BatchStatus::Translating,
            }
        }

        self.cancel.store(false, Ordering::SeqCst);

        let vfs = Arc::clone(&self.vfs);
        let demuxer = Arc::clone(&self.demuxer);
        let subtitle_service = Arc::clone(&self.subtitle_service);
        let record = Arc::clone(&self.record);
        let cancel = Arc::clone(&self.cancel);

        tokio::spawn(async move {
            Self::run_worker(vfs, demuxer, subtitle_service, record, cancel, target_lang).await;
        });

        Ok(())
    }

    async fn run_worker(
        vfs: Arc<dyn Vfs>,
        demuxer: Arc<dyn Demuxer>,
        subtitle_service: Arc<SubtitleService>,
        record: Arc<RwLock<Option<BatchRecord>>>,
        cancel: Arc<AtomicBool>,
        target_lang: String,
    ) {
        let videos = {
            let guard = record.read().await;
            guard.as_ref().map(|r| r.videos.clone()).unwrap_or_default()
        };

        for video in videos {
            if cancel.load(Ordering::SeqCst) {
                let mut guard = record.write().await;
                if let Some(rec) = guard.as_mut() {
                    rec.status = BatchStatus::Cancelled;
                    rec.current_video = None;
                }
                info!("batch cancelled between videos");
                return;
            }

            {
                let mut guard = record.write().await;
                if let Some(rec) = guard.as_mut() {
                    rec.current_video = Some(video.file_name.clone());
                }
            }

            match Self::process_video(&vfs, &demuxer, &subtitle_service, &video, &target_lang).await
            {
                Ok(()) => {
                    let mut guard = record.write().await;
                    if let Some(rec) = guard.as_mut() {
                        rec.completed += 1;
                    }
                    info!(video = video.file_name.as_str(), "batch video translated");
                }
                Err(e) => {
                    warn!(video = video.file_name.as_str(), error = %e, "batch video failed, continuing");
                }
            }
        }

        let mut guard = record.write().await;
        if let Some(rec) = guard.as_mut() {
            rec.current_video = None;
            if rec.status != BatchStatus::Cancelled {
                rec.status = BatchStatus::Completed;
            }
        }
        info!("batch finished");
    }

    /// Download-extract-translate-write for a single video. The temp
    /// video file is always removed, including when any step in the
    /// middle of this chain fails.
    async fn process_video(
        vfs: &Arc<dyn Vfs>,
        demuxer: &Arc<dyn Demuxer>,
        subtitle_service: &Arc<SubtitleService>,
        video: &BatchVideo,
        target_lang: &str,
    ) -> Result<(), BatchError> {
        let temp_path = vfs.download_to_temp(&video.path).await?;

        let outcome: Result<(), BatchError> = async {
            let srt_text = demuxer.extract_track(&temp_path, video.track_index).await?;
            let translated = subtitle_service
                .translate_embedded_track(
                    &srt_text,
                    target_lang,
                    &video.file_name,
                    video.track_index as u32,
                )
                .await?;
            let lang_code = super::lang_code::code_for(target_lang);
            vfs.write_subtitle(&video.path, &translated, &lang_code).await?;
            Ok(())
        }
        .await;

        let _ = tokio::fs::remove_file(&temp_path).await;
        outcome
    }

    /// Point-in-time copy of the current (or most recent) batch record.
    pub async fn progress(&self) -> Option<BatchRecord> {
        self.record.read().await.clone()
    }

    /// Requests cancellation. Observed by the worker between videos; an
    /// in-flight video still completes or errors out first.
    pub async fn cancel(&self) -> Result<(), BatchError> {
        let guard = self.record.read().await;
        match guard.as_ref() {
            Some(rec) if rec.status == BatchStatus::Translating => {
                self.cancel.store(true, Ordering::SeqCst);
                Ok(())
            }
            Some(_) => Err(BatchError::Busy),
            None => Err(BatchError::NotAnalyzed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FsCache;
    use crate::demuxer::SubtitleTrack;
    use crate::engine::{EngineConfig, TranslationEngine};
    use crate::opensubs_client::OpenSubtitlesCatalog;
    use crate::progress::ProgressRegistry;
    use crate::testing::{MockDemuxer, MockLlmClient, MockOpenSubtitlesCatalog, MockVfs};
    use std::sync::Arc as StdArc;

    fn service(
        vfs: StdArc<MockVfs>,
    ) -> (StdArc<SubtitleService>, StdArc<dyn Vfs>, tempfile::TempDir) {
        let catalog: StdArc<dyn OpenSubtitlesCatalog> = StdArc::new(MockOpenSubtitlesCatalog::new());
        let llm = StdArc::new(MockLlmClient::new());
        let engine = StdArc::new(TranslationEngine::new(llm, EngineConfig::default()));
        let dir = tempfile::tempdir().unwrap();
        let cache = StdArc::new(FsCache::new(dir.path().to_path_buf()));
        let progress = StdArc::new(ProgressRegistry::new());
        let svc = StdArc::new(SubtitleService::new(catalog, engine, cache, progress));
        (svc, vfs as StdArc<dyn Vfs>, dir)
    }

    #[tokio::test]
    async fn analyze_selects_only_videos_with_english_tracks() {
        let vfs = StdArc::new(
            MockVfs::new()
                .with_directory("", vec!["a.mkv", "b.mkv", "c.mkv"])
                .with_file("a.mkv", b"hdr-a".to_vec())
                .with_file("b.mkv", b"hdr-b".to_vec())
                .with_file("c.mkv", b"hdr-c".to_vec()),
        );
        let demuxer = StdArc::new(
            MockDemuxer::new()
                .with_tracks(
                    std::env::temp_dir().join("mock_vfs_1").to_string_lossy().into_owned(),
                    vec![SubtitleTrack {
                        index: 2,
                        language: Some("eng".to_string()),
                        codec: "subrip".to_string(),
                        title: None,
                    }],
                )
                .with_tracks(
                    std::env::temp_dir().join("mock_vfs_2").to_string_lossy().into_owned(),
                    vec![SubtitleTrack {
                        index: 1,
                        language: Some("fra".to_string()),
                        codec: "subrip".to_string(),
                        title: None,
                    }],
                ),
        );
        let (svc, vfs_dyn, _dir) = service(StdArc::clone(&vfs));
        let batch = BatchOrchestrator::new(vfs_dyn, demuxer, svc);

        let record = batch.analyze("").await.unwrap();
        assert_eq!(record.status, BatchStatus::Analyzing);
        assert_eq!(record.total, record.videos.len());
        assert!(record.total <= 3);
    }

    #[tokio::test]
    async fn start_without_analysis_is_rejected() {
        let vfs = StdArc::new(MockVfs::new());
        let demuxer = StdArc::new(MockDemuxer::new());
        let (svc, vfs_dyn, _dir) = service(vfs);
        let batch = BatchOrchestrator::new(vfs_dyn, demuxer, svc);
        let err = batch.start("French").await.unwrap_err();
        assert!(matches!(err, BatchError::NotAnalyzed));
    }

    #[tokio::test]
    async fn second_analyze_while_active_is_busy() {
        let vfs = StdArc::new(MockVfs::new().with_directory("", vec![]));
        let demuxer = StdArc::new(MockDemuxer::new());
        let (svc, vfs_dyn, _dir) = service(vfs);
        let batch = BatchOrchestrator::new(vfs_dyn, demuxer, svc);
        batch.analyze("").await.unwrap();
        let err = batch.analyze("").await.unwrap_err();
        assert!(matches!(err, BatchError::Busy));
    }

    #[tokio::test]
    async fn cancel_before_start_is_rejected() {
        let vfs = StdArc::new(MockVfs::new().with_directory("", vec![]));
        let demuxer = StdArc::new(MockDemuxer::new());
        let (svc, vfs_dyn, _dir) = service(vfs);
        let batch = BatchOrchestrator::new(vfs_dyn, demuxer, svc);
        batch.analyze("").await.unwrap();
        let err = batch.cancel().await.unwrap_err();
        assert!(matches!(err, BatchError::Busy));
    }

    #[tokio::test]
    async fn full_run_translates_and_writes_subtitle() {
        let vfs = StdArc::new(
            MockVfs::new()
                .with_directory("", vec!["movie.mkv"])
                .with_file("movie.mkv", b"full-bytes".to_vec()),
        );
        let demuxer = StdArc::new(MockDemuxer::new());
        let (svc, vfs_dyn, _dir) = service(StdArc::clone(&vfs));
        let batch = BatchOrchestrator::new(StdArc::clone(&vfs_dyn), StdArc::clone(&demuxer) as StdArc<dyn Demuxer>, svc);

        let mut record = BatchRecord::new("");
        record.videos = vec![BatchVideo {
            path: "movie.mkv".to_string(),
            file_name: "movie.mkv".to_string(),
            track_index: 0,
            language: "en".to_string(),
        }];
        record.total = 1;
        *batch.record.write().await = Some(record);

        let temp_video_path = std::env::temp_dir().join("mock_vfs_1").to_string_lossy().into_owned();
        demuxer.with_extracted_text(
            temp_video_path,
            0,
            "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n",
        );

        batch.start("French").await.unwrap();

        let mut waited = 0;
        loop {
            let snapshot = batch.progress().await.unwrap();
            if snapshot.status == BatchStatus::Completed || waited > 50 {
                assert_eq!(snapshot.completed, 1);
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            waited += 1;
        }
        assert_eq!(vfs.written_subtitles().len(), 1);
    }
}

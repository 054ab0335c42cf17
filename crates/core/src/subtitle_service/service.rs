use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{CacheMetadata, CacheStore};
use crate::codec::{self, Cue, SubtitleFormat};
use crate::engine::TranslationEngine;
use crate::opensubs_client::{OpenSubtitlesCatalog, SearchFilters};
use crate::progress::ProgressRegistry;

use super::error::SubtitleServiceError;
use super::types::ProxySearchPage;

/// Catalog proxy flow: search pass-through with language relabeling,
/// download-translate-cache, ad-hoc content translation, and cache
/// probes. Wired the way `TicketOrchestrator::new` constructor-injects
/// its collaborators -- every dependency is a trait object so tests can
/// substitute the mocks in `crate::testing`.
pub struct SubtitleService {
    catalog: Arc<dyn OpenSubtitlesCatalog>,
    engine: Arc<TranslationEngine>,
    cache: Arc<dyn CacheStore>,
    progress: Arc<ProgressRegistry>,
    local_counter: AtomicU64,
}

impl SubtitleService {
    pub fn new(
        catalog: Arc<dyn OpenSubtitlesCatalog>,
        engine: Arc<TranslationEngine>,
        cache: Arc<dyn CacheStore>,
        progress: Arc<ProgressRegistry>,
    ) -> Self {
        Self {
            catalog,
            engine,
            cache,
            progress,
            local_counter: AtomicU64::new(0),
        }
    }

    /// `GET /api/v1/subtitles` pass-through. No cue processing: only the
    /// catalog listing's language label and translation flags change.
    pub async fn proxy_search(
        &self,
        filters: SearchFilters,
        target_lang: &str,
    ) -> Result<ProxySearchPage, SubtitleServiceError> {
        let page = self.catalog.search(filters).await?;
        Ok(ProxySearchPage::relabel(page, target_lang))
    }

    /// Whether a translated artifact already exists for `file_id` in
    /// `target_lang`.
    pub async fn is_cached(
        &self,
        file_id: &str,
        target_lang: &str,
    ) -> Result<bool, SubtitleServiceError> {
        Ok(self.cache.has(file_id, target_lang).await?)
    }

    /// Download-translate-cache flow behind `/api/v1/download/{fileId}/{fileName}`.
    /// Returns the subtitle bytes in `format`, plus the file name to serve
    /// them under.
    pub async fn proxy_download_and_translate(
        &self,
        file_id: &str,
        format: SubtitleFormat,
        requested_name: Option<&str>,
        target_lang: &str,
    ) -> Result<(Vec<u8>, String), SubtitleServiceError> {
        if let Some(translated_srt) = self.cache.load_translated(file_id, target_lang).await? {
            let name = requested_name
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("subtitle_{file_id}"));
            let bytes = render_in_format(&translated_srt, format)?;
            return Ok((bytes, with_extension(&name, format)));
        }

        let (bytes, actual_name) = self.catalog.download(file_id).await?;
        let english_text = String::from_utf8_lossy(&bytes).into_owned();
        let display_name = actual_name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| requested_name.map(|n| n.to_string()))
            .unwrap_or_else(|| format!("subtitle_{file_id}.srt"));

        let metadata = CacheMetadata {
            file_name: display_name.clone(),
            file_id: Some(file_id.to_string()),
            video_path: None,
            track_index: None,
        };

        let translated_srt = self
            .translate_and_cache(file_id, &display_name, &english_text, target_lang, metadata)
            .await?;

        let bytes = render_in_format(&translated_srt, format)?;
        Ok((bytes, with_extension(&display_name, format)))
    }

    /// Ad-hoc translation of raw subtitle text with no catalog lookup and
    /// no cache write. Always returns SRT text.
    pub async fn translate_content(
        &self,
        text: &str,
        target_lang: &str,
    ) -> Result<String, SubtitleServiceError> {
        let document = codec::parse(text)?;
        let fingerprint = format!("local_{}", self.local_counter.fetch_add(1, Ordering::Relaxed));

        let guard = self
            .progress
            .begin(fingerprint.clone(), "ad-hoc content", document.cues.len())
            .await;

        let translated = match self
            .engine
            .translate_cues(
                &document.cues,
                target_lang,
                Some(&|completed| guard.update(completed)),
            )
            .await
        {
            Ok(cues) => cues,
            Err(e) => {
                warn!(fingerprint = %fingerprint, error = %e, "ad-hoc translation failed");
                return Err(e.into());
            }
        };

        info!(fingerprint = %fingerprint, cues = translated.len(), "ad-hoc translation completed");
        Ok(codec::generate_srt(&translated))
    }

    /// Translates a demuxed embedded track, caching the result under the
    /// `embedded_{sanitized file name}_track{n}` fingerprint so a
    /// re-analyzed batch (or a second manual request for the same track)
    /// is a cache hit. Used exclusively by the batch orchestrator.
    pub async fn translate_embedded_track(
        &self,
        text: &str,
        target_lang: &str,
        file_name: &str,
        track_index: u32,
    ) -> Result<String, SubtitleServiceError> {
        let fingerprint = format!(
            "embedded_{}_track{}",
            sanitize_fingerprint_component(file_name),
            track_index
        );

        if let Some(cached) = self.cache.load_translated(&fingerprint, target_lang).await? {
            return Ok(cached);
        }

        let metadata = CacheMetadata {
            file_name: file_name.to_string(),
            file_id: None,
            video_path: None,
            track_index: Some(track_index),
        };

        self.translate_and_cache(&fingerprint, file_name, text, target_lang, metadata)
            .await
    }

    /// Shared parse-translate-cache sequence used by every flow that
    /// persists its result (the catalog proxy and embedded-track
    /// translation both go through this; ad-hoc `translate_content`
    /// deliberately doesn't, per spec).
    async fn translate_and_cache(
        &self,
        fingerprint: &str,
        display_name: &str,
        original_text: &str,
        target_lang: &str,
        metadata: CacheMetadata,
    ) -> Result<String, SubtitleServiceError> {
        let document = codec::parse(original_text)?;

        let guard = self
            .progress
            .begin(fingerprint.to_string(), display_name, document.cues.len())
            .await;

        let translated: Vec<Cue> = match self
            .engine
            .translate_cues(
                &document.cues,
                target_lang,
                Some(&|completed| guard.update(completed)),
            )
            .await
        {
            Ok(cues) => cues,
            Err(e) => {
                warn!(fingerprint = %fingerprint, error = %e, "translation failed");
                return Err(e.into());
            }
        };

        let translated_srt = codec::generate_srt(&translated);

        self.cache
            .store(
                fingerprint,
                Some(original_text),
                &translated_srt,
                target_lang,
                metadata,
            )
            .await?;

        info!(fingerprint = %fingerprint, cues = translated.len(), "translation cached");
        Ok(translated_srt)
    }
}

fn render_in_format(
    srt_text: &str,
    format: SubtitleFormat,
) -> Result<Vec<u8>, SubtitleServiceError> {
    match format {
        SubtitleFormat::Srt => Ok(srt_text.as_bytes().to_vec()),
        SubtitleFormat::Vtt => {
            let document = codec::parse(srt_text)?;
            Ok(codec::generate_vtt(&document.cues).into_bytes())
        }
    }
}

fn with_extension(name: &str, format: SubtitleFormat) -> String {
    let stem = name
        .rsplit_once('.')
        .map(|(stem, ext)| if ext.eq_ignore_ascii_case("srt") || ext.eq_ignore_ascii_case("vtt") {
            stem
        } else {
            name
        })
        .unwrap_or(name);
    match format {
        SubtitleFormat::Srt => format!("{stem}.srt"),
        SubtitleFormat::Vtt => format!("{stem}.vtt"),
    }
}

/// Replaces everything but ASCII alphanumerics with `_` so a file name
/// is safe to embed in a fingerprint (and, by extension, a cache
/// directory name).
fn sanitize_fingerprint_component(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FsCache;
    use crate::engine::EngineConfig;
    use crate::testing::{MockLlmClient, MockOpenSubtitlesCatalog};
    use tempfile::tempdir;

    fn service(cache: Arc<dyn CacheStore>) -> SubtitleService {
        let catalog = Arc::new(MockOpenSubtitlesCatalog::new());
        let llm = Arc::new(MockLlmClient::new());
        let engine = Arc::new(TranslationEngine::new(llm, EngineConfig::default()));
        let progress = Arc::new(ProgressRegistry::new());
        SubtitleService::new(catalog, engine, cache, progress)
    }

    fn fs_cache() -> (Arc<dyn CacheStore>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        (Arc::new(FsCache::new(dir.path().to_path_buf())), dir)
    }

    #[tokio::test]
    async fn translate_content_never_writes_cache() {
        let (cache, _dir) = fs_cache();
        let svc = service(Arc::clone(&cache));
        let text = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n";
        let out = svc.translate_content(text, "French").await.unwrap();
        assert!(out.contains("-->"));
        assert!(cache.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn proxy_download_and_translate_is_cache_idempotent() {
        let (cache, _dir) = fs_cache();
        let svc = service(Arc::clone(&cache));

        let (first_bytes, _name) = svc
            .proxy_download_and_translate("42", SubtitleFormat::Srt, None, "French")
            .await
            .unwrap();

        assert!(svc.is_cached("42", "French").await.unwrap());

        let (second_bytes, _name) = svc
            .proxy_download_and_translate("42", SubtitleFormat::Srt, None, "French")
            .await
            .unwrap();

        assert_eq!(first_bytes, second_bytes);
    }

    #[tokio::test]
    async fn translate_embedded_track_caches_by_sanitized_fingerprint() {
        let (cache, _dir) = fs_cache();
        let svc = service(Arc::clone(&cache));
        let text = "1\n00:00:01,000 --> 00:00:02,000\nHi\n\n";

        svc.translate_embedded_track(text, "German", "My Movie (2020).mkv", 2)
            .await
            .unwrap();

        let summaries = cache.list().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].fingerprint.starts_with("embedded_My_Movie__2020__mkv_track2"));
    }
}

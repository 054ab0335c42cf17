//! Filesystem-backed cache store.
//!
//! Layout mirrors the data model: one directory per fingerprint under the
//! cache root, containing `original.srt`, `translated_{lang}.srt`, and
//! `metadata.json`. Writes go through a temp-file-then-rename so a reader
//! never observes a half-written `translated_*` file -- the same atomicity
//! idiom used for placed media files elsewhere in this crate, including
//! the cross-filesystem (`EXDEV`) rename fallback.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use super::error::CacheError;
use super::traits::CacheStore;
use super::types::{CacheEntrySummary, CacheMetadata};

pub struct FsCache {
    root: PathBuf,
}

impl FsCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_dir(&self, fingerprint: &str) -> PathBuf {
        self.root.join(fingerprint)
    }

    fn original_path(&self, fingerprint: &str) -> PathBuf {
        self.entry_dir(fingerprint).join("original.srt")
    }

    fn translated_path(&self, fingerprint: &str, lang: &str) -> PathBuf {
        self.entry_dir(fingerprint)
            .join(format!("translated_{lang}.srt"))
    }

    fn metadata_path(&self, fingerprint: &str) -> PathBuf {
        self.entry_dir(fingerprint).join("metadata.json")
    }

    fn io_err(fingerprint: &str, source: std::io::Error) -> CacheError {
        CacheError::Io {
            fingerprint: fingerprint.to_string(),
            source,
        }
    }

    /// Write `contents` to `destination` atomically: write to a sibling
    /// temp file, flush, then rename into place. Falls back to copy+remove
    /// if the temp file and destination straddle a filesystem boundary.
    async fn write_atomic(
        destination: &Path,
        contents: &str,
        fingerprint: &str,
    ) -> Result<(), CacheError> {
        let parent = destination
            .parent()
            .expect("cache file paths always have a parent directory");
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Self::io_err(fingerprint, e))?;

        let tmp_path = parent.join(format!(
            ".{}.tmp",
            destination.file_name().unwrap_or_default().to_string_lossy()
        ));

        {
            let mut file = fs::File::create(&tmp_path)
                .await
                .map_err(|e| Self::io_err(fingerprint, e))?;
            file.write_all(contents.as_bytes())
                .await
                .map_err(|e| Self::io_err(fingerprint, e))?;
            file.flush().await.map_err(|e| Self::io_err(fingerprint, e))?;
        }

        match fs::rename(&tmp_path, destination).await {
            Ok(()) => Ok(()),
            Err(e)
                if e.kind() == std::io::ErrorKind::CrossesDevices
                    || e.raw_os_error() == Some(18) =>
            {
                fs::copy(&tmp_path, destination)
                    .await
                    .map_err(|e| Self::io_err(fingerprint, e))?;
                fs::remove_file(&tmp_path)
                    .await
                    .map_err(|e| Self::io_err(fingerprint, e))?;
                Ok(())
            }
            Err(e) => Err(Self::io_err(fingerprint, e)),
        }
    }

    async fn read_optional(path: &Path, fingerprint: &str) -> Result<Option<String>, CacheError> {
        match fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_err(fingerprint, e)),
        }
    }
}

#[async_trait]
impl CacheStore for FsCache {
    async fn has(&self, fingerprint: &str, lang: &str) -> Result<bool, CacheError> {
        Ok(fs::metadata(self.translated_path(fingerprint, lang))
            .await
            .is_ok())
    }

    async fn load_translated(
        &self,
        fingerprint: &str,
        lang: &str,
    ) -> Result<Option<String>, CacheError> {
        Self::read_optional(&self.translated_path(fingerprint, lang), fingerprint).await
    }

    async fn load_original(&self, fingerprint: &str) -> Result<Option<String>, CacheError> {
        Self::read_optional(&self.original_path(fingerprint), fingerprint).await
    }

    async fn store(
        &self,
        fingerprint: &str,
        original: Option<&str>,
        translated: &str,
        lang: &str,
        metadata: CacheMetadata,
    ) -> Result<(), CacheError> {
        if let Some(original) = original {
            Self::write_atomic(&self.original_path(fingerprint), original, fingerprint).await?;
        }

        let metadata_json = serde_json::to_string_pretty(&metadata).map_err(|e| {
            CacheError::CorruptMetadata(fingerprint.to_string(), e.to_string())
        })?;
        Self::write_atomic(&self.metadata_path(fingerprint), &metadata_json, fingerprint).await?;

        // Write the translated artifact last: its presence is the
        // cache-hit signal, so everything else must already be durable.
        Self::write_atomic(
            &self.translated_path(fingerprint, lang),
            translated,
            fingerprint,
        )
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<CacheEntrySummary>, CacheError> {
        let mut entries = Vec::new();

        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(Self::io_err("<root>", e)),
        };

        while let Some(dir_entry) = dir
            .next_entry()
            .await
            .map_err(|e| Self::io_err("<root>", e))?
        {
            if !dir_entry
                .file_type()
                .await
                .map_err(|e| Self::io_err("<root>", e))?
                .is_dir()
            {
                continue;
            }
            let fingerprint = dir_entry.file_name().to_string_lossy().into_owned();

            let metadata = match Self::read_optional(&self.metadata_path(&fingerprint), &fingerprint)
                .await?
            {
                Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                    warn!("cache entry {fingerprint} has corrupt metadata.json: {e}");
                    CacheMetadata::default()
                }),
                None => CacheMetadata::default(),
            };

            let mut translated_languages = Vec::new();
            let mut sub_dir = fs::read_dir(dir_entry.path())
                .await
                .map_err(|e| Self::io_err(&fingerprint, e))?;
            while let Some(file) = sub_dir
                .next_entry()
                .await
                .map_err(|e| Self::io_err(&fingerprint, e))?
            {
                let name = file.file_name().to_string_lossy().into_owned();
                if let Some(lang) = name
                    .strip_prefix("translated_")
                    .and_then(|s| s.strip_suffix(".srt"))
                {
                    translated_languages.push(lang.to_string());
                }
            }

            let in_progress = translated_languages.is_empty()
                && fs::metadata(self.original_path(&fingerprint)).await.is_ok();

            entries.push(CacheEntrySummary {
                fingerprint,
                metadata,
                translated_languages,
                in_progress,
            });
        }

        Ok(entries)
    }

    async fn delete(&self, fingerprint: &str) -> Result<(), CacheError> {
        match fs::remove_dir_all(self.entry_dir(fingerprint)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CacheError::NotFound(fingerprint.to_string()))
            }
            Err(e) => Err(Self::io_err(fingerprint, e)),
        }
    }

    async fn clear(&self) -> Result<(), CacheError> {
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_err("<root>", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("submute-cache-test-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn store_then_load_round_trips() {
        let cache = FsCache::new(temp_root());
        cache
            .store(
                "42",
                Some("english text"),
                "translated text",
                "es",
                CacheMetadata {
                    file_name: "movie.srt".to_string(),
                    file_id: Some("42".to_string()),
                    video_path: None,
                    track_index: None,
                },
            )
            .await
            .unwrap();

        assert!(cache.has("42", "es").await.unwrap());
        assert!(!cache.has("42", "he").await.unwrap());
        assert_eq!(
            cache.load_translated("42", "es").await.unwrap().as_deref(),
            Some("translated text")
        );
        assert_eq!(
            cache.load_original("42").await.unwrap().as_deref(),
            Some("english text")
        );
    }

    #[tokio::test]
    async fn list_marks_original_only_entries_in_progress() {
        let root = temp_root();
        let cache = FsCache::new(root.clone());
        fs::create_dir_all(root.join("abc")).await.unwrap();
        fs::write(root.join("abc").join("original.srt"), "en")
            .await
            .unwrap();

        let entries = cache.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].in_progress);
        assert!(entries[0].translated_languages.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_entry_recursively() {
        let cache = FsCache::new(temp_root());
        cache
            .store(
                "fp",
                None,
                "translated",
                "fr",
                CacheMetadata {
                    file_name: "x.srt".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        cache.delete("fp").await.unwrap();
        assert!(!cache.has("fp", "fr").await.unwrap());
    }

    #[tokio::test]
    async fn delete_missing_entry_is_not_found() {
        let cache = FsCache::new(temp_root());
        let result = cache.delete("missing").await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }
}

use async_trait::async_trait;

use super::error::CacheError;
use super::types::{CacheEntrySummary, CacheMetadata};

/// Content-addressed store for translated subtitle artifacts, keyed by
/// fingerprint (see the crate-level fingerprint glossary entry) and target
/// language. Implementations must make `store` atomic with respect to
/// readers: a reader must never observe a partially-written
/// `translated_{lang}.srt`.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Whether a translated artifact exists for this fingerprint+language.
    async fn has(&self, fingerprint: &str, lang: &str) -> Result<bool, CacheError>;

    /// Load the translated artifact's raw text, if present.
    async fn load_translated(
        &self,
        fingerprint: &str,
        lang: &str,
    ) -> Result<Option<String>, CacheError>;

    /// Load the original (English) source text, if present.
    async fn load_original(&self, fingerprint: &str) -> Result<Option<String>, CacheError>;

    /// Persist `translated` (and, if given, `original`) for `fingerprint`,
    /// along with `metadata`. Each file is written through a temp file and
    /// renamed into place so a concurrent reader never sees a partial file.
    async fn store(
        &self,
        fingerprint: &str,
        original: Option<&str>,
        translated: &str,
        lang: &str,
        metadata: CacheMetadata,
    ) -> Result<(), CacheError>;

    /// List all cache entries, including those with only an `original`
    /// present (surfaced to the dashboard as "in progress").
    async fn list(&self) -> Result<Vec<CacheEntrySummary>, CacheError>;

    /// Recursively delete the entry for `fingerprint`.
    async fn delete(&self, fingerprint: &str) -> Result<(), CacheError>;

    /// Delete every cache entry.
    async fn clear(&self) -> Result<(), CacheError>;
}

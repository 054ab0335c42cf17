use async_trait::async_trait;
use std::path::PathBuf;

use super::error::VfsError;
use super::types::VfsEntry;

/// Uniform filesystem contract satisfied by both the local-disk and SMB
/// adapters, so the batch orchestrator and browse endpoints never branch
/// on which backend is active.
#[async_trait]
pub trait Vfs: Send + Sync {
    /// Lists the direct children of `path`, relative to the configured
    /// root.
    async fn list(&self, path: &str) -> Result<Vec<VfsEntry>, VfsError>;

    /// Reads a subtitle file's full text.
    async fn read_subtitle(&self, path: &str) -> Result<String, VfsError>;

    /// Writes `content` next to `video_path` as
    /// `{basename}.{lang_code}.srt`.
    async fn write_subtitle(
        &self,
        video_path: &str,
        content: &str,
        lang_code: &str,
    ) -> Result<String, VfsError>;

    /// Writes `content` to the exact given path, no naming convention
    /// applied.
    async fn write_subtitle_direct(&self, path: &str, content: &[u8]) -> Result<(), VfsError>;

    /// Downloads the entire file at `path` to a local temp file and
    /// returns its path. Caller owns cleanup.
    async fn download_to_temp(&self, path: &str) -> Result<PathBuf, VfsError>;

    /// Downloads only the first `max_bytes` of `path` to a local temp
    /// file, for header-only container probing.
    async fn download_header_to_temp(&self, path: &str, max_bytes: u64) -> Result<PathBuf, VfsError>;

    /// Best-effort human-readable title derived from the file name.
    async fn extract_video_title(&self, path: &str) -> Result<String, VfsError>;
}

pub const DEFAULT_HEADER_BYTES: u64 = 20 * 1024 * 1024;

//! In-memory mock VFS for testing the batch orchestrator and browse
//! endpoints without a real disk or SMB share.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::vfs::{is_subtitle_file, is_video_file, sibling_language_tag, Vfs, VfsEntry, VfsError};

#[derive(Debug, Clone)]
pub enum RecordedVfsCall {
    List(String),
    ReadSubtitle(String),
    WriteSubtitle { video_path: String, lang_code: String },
    WriteSubtitleDirect(String),
    DownloadToTemp(String),
    DownloadHeaderToTemp(String, u64),
}

/// A fake directory tree keyed by path, with fixed file contents, so
/// tests can assert on the batch orchestrator's walk-analyze-translate
/// sequence without touching the real filesystem.
pub struct MockVfs {
    entries: Arc<RwLock<HashMap<String, Vec<VfsEntry>>>>,
    file_contents: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    calls: Arc<RwLock<Vec<RecordedVfsCall>>>,
    next_error: Arc<RwLock<Option<String>>>,
    written_subtitles: Arc<RwLock<Vec<(String, String, String)>>>,
    temp_counter: Arc<RwLock<u64>>,
}

impl Default for MockVfs {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVfs {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            file_contents: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            written_subtitles: Arc::new(RwLock::new(Vec::new())),
            temp_counter: Arc::new(RwLock::new(0)),
        }
    }

    /// Register the children listed at `path`, auto-deriving `is_video`
    /// / `is_subtitle` from the file name.
    pub fn with_directory(self, path: impl Into<String>, names: Vec<&str>) -> Self {
        let path = path.into();
        let entries = names
            .into_iter()
            .map(|name| {
                let full_path = if path.is_empty() {
                    name.to_string()
                } else {
                    format!("{path}/{name}")
                };
                VfsEntry {
                    name: name.to_string(),
                    path: full_path,
                    is_dir: !name.contains('.'),
                    is_video: is_video_file(name),
                    is_subtitle: is_subtitle_file(name),
                    has_subtitle: false,
                    language: sibling_language_tag(name, name),
                }
            })
            .collect();
        self.entries.write().unwrap().insert(path, entries);
        self
    }

    pub fn with_file(self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.file_contents
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    pub fn fail_next(&self, message: impl Into<String>) {
        *self.next_error.write().unwrap() = Some(message.into());
    }

    pub fn recorded_calls(&self) -> Vec<RecordedVfsCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn written_subtitles(&self) -> Vec<(String, String, String)> {
        self.written_subtitles.read().unwrap().clone()
    }

    fn take_error(&self) -> Option<VfsError> {
        self.next_error.write().unwrap().take().map(|message| VfsError::Io {
            path: "mock".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, message),
        })
    }
}

#[async_trait]
impl Vfs for MockVfs {
    async fn list(&self, path: &str) -> Result<Vec<VfsEntry>, VfsError> {
        self.calls.write().unwrap().push(RecordedVfsCall::List(path.to_string()));
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        Ok(self.entries.read().unwrap().get(path).cloned().unwrap_or_default())
    }

    async fn read_subtitle(&self, path: &str) -> Result<String, VfsError> {
        self.calls
            .write()
            .unwrap()
            .push(RecordedVfsCall::ReadSubtitle(path.to_string()));
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        self.file_contents
            .read()
            .unwrap()
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .ok_or_else(|| VfsError::NotFound(path.to_string()))
    }

    async fn write_subtitle(
        &self,
        video_path: &str,
        content: &str,
        lang_code: &str,
    ) -> Result<String, VfsError> {
        self.calls.write().unwrap().push(RecordedVfsCall::WriteSubtitle {
            video_path: video_path.to_string(),
            lang_code: lang_code.to_string(),
        });
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        let stem = video_path.rsplit_once('.').map(|(s, _)| s).unwrap_or(video_path);
        let out_path = format!("{stem}.{lang_code}.srt");
        self.written_subtitles.write().unwrap().push((
            out_path.clone(),
            lang_code.to_string(),
            content.to_string(),
        ));
        Ok(out_path)
    }

    async fn write_subtitle_direct(&self, path: &str, content: &[u8]) -> Result<(), VfsError> {
        self.calls
            .write()
            .unwrap()
            .push(RecordedVfsCall::WriteSubtitleDirect(path.to_string()));
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        self.file_contents
            .write()
            .unwrap()
            .insert(path.to_string(), content.to_vec());
        Ok(())
    }

    async fn download_to_temp(&self, path: &str) -> Result<PathBuf, VfsError> {
        self.calls
            .write()
            .unwrap()
            .push(RecordedVfsCall::DownloadToTemp(path.to_string()));
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        self.write_temp_copy(path)
    }

    async fn download_header_to_temp(&self, path: &str, max_bytes: u64) -> Result<PathBuf, VfsError> {
        self.calls
            .write()
            .unwrap()
            .push(RecordedVfsCall::DownloadHeaderToTemp(path.to_string(), max_bytes));
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        self.write_temp_copy(path)
    }

    async fn extract_video_title(&self, path: &str) -> Result<String, VfsError> {
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        let name = path.rsplit('/').next().unwrap_or(path);
        Ok(name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name).to_string())
    }
}

impl MockVfs {
    fn write_temp_copy(&self, path: &str) -> Result<PathBuf, VfsError> {
        let bytes = self
            .file_contents
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| VfsError::NotFound(path.to_string()))?;

        let mut counter = self.temp_counter.write().unwrap();
        *counter += 1;
        let temp_path = std::env::temp_dir().join(format!("mock_vfs_{}", *counter));
        std::fs::write(&temp_path, bytes).map_err(|source| VfsError::Io {
            path: path.to_string(),
            source,
        })?;
        Ok(temp_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_registered_directory() {
        let vfs = MockVfs::new().with_directory("", vec!["a.mkv", "b.srt"]);
        let entries = vfs.list("").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_video);
        assert!(entries[1].is_subtitle);
    }

    #[tokio::test]
    async fn write_subtitle_records_and_returns_sibling_path() {
        let vfs = MockVfs::new();
        let out = vfs.write_subtitle("movie.mkv", "text", "fr").await.unwrap();
        assert_eq!(out, "movie.fr.srt");
        assert_eq!(vfs.written_subtitles().len(), 1);
    }

    #[tokio::test]
    async fn fail_next_injects_one_error() {
        let vfs = MockVfs::new().with_directory("", vec!["a.mkv"]);
        vfs.fail_next("boom");
        assert!(vfs.list("").await.is_err());
        assert!(vfs.list("").await.is_ok());
    }
}

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::error::VfsError;
use super::traits::Vfs;
use super::types::{is_subtitle_file, is_video_file, sibling_language_tag, VfsEntry};

/// Disk-backed VFS rooted at a configured directory. Every relative path
/// is resolved with `normalize`, which rejects `..` components that
/// would escape the root -- this happens before any syscall touches the
/// filesystem, so a traversal attempt never reaches `open`/`read`.
pub struct LocalVfs {
    root: PathBuf,
}

impl LocalVfs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves `relative` against the root, rejecting any path whose
    /// lexical normalization would climb above the root. Does not touch
    /// the filesystem and does not require the path to exist.
    fn normalize(&self, relative: &str) -> Result<PathBuf, VfsError> {
        let mut resolved = PathBuf::new();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !resolved.pop() {
                        return Err(VfsError::PathEscapesRoot(relative.to_string()));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(VfsError::PathEscapesRoot(relative.to_string()));
                }
            }
        }
        Ok(self.root.join(resolved))
    }

    async fn io_err(path: &Path, source: std::io::Error) -> VfsError {
        VfsError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl Vfs for LocalVfs {
    async fn list(&self, path: &str) -> Result<Vec<VfsEntry>, VfsError> {
        let dir = self.normalize(path)?;
        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(&dir)
            .await
            .map_err(|e| VfsError::Io { path: dir.display().to_string(), source: e })?;

        let mut names = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| VfsError::Io { path: dir.display().to_string(), source: e })?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            names.push((name, is_dir));
        }

        for (name, is_dir) in &names {
            let is_video = !is_dir && is_video_file(name);
            let stem = name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name);
            let mut has_subtitle = false;
            let mut language = None;
            if is_video {
                for (other, other_is_dir) in &names {
                    if *other_is_dir || other == name {
                        continue;
                    }
                    if let Some(lang) = sibling_language_tag(stem, other) {
                        has_subtitle = true;
                        language = Some(lang);
                        break;
                    }
                }
            }

            let child_path = if path.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", path.trim_end_matches('/'), name)
            };

            entries.push(VfsEntry {
                name: name.clone(),
                path: child_path,
                is_dir: *is_dir,
                is_video,
                is_subtitle: !is_dir && is_subtitle_file(name),
                has_subtitle,
                language,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn read_subtitle(&self, path: &str) -> Result<String, VfsError> {
        let resolved = self.normalize(path)?;
        fs::read_to_string(&resolved)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => VfsError::NotFound(path.to_string()),
                _ => VfsError::Io { path: resolved.display().to_string(), source: e },
            })
    }

    async fn write_subtitle(
        &self,
        video_path: &str,
        content: &str,
        lang_code: &str,
    ) -> Result<String, VfsError> {
        let resolved_video = self.normalize(video_path)?;
        let stem = resolved_video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let out_name = format!("{stem}.{lang_code}.srt");
        let out_path = resolved_video.with_file_name(&out_name);

        let mut body = Vec::with_capacity(content.len() + 3);
        body.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
        body.extend_from_slice(content.as_bytes());

        write_atomic(&out_path, &body).await?;

        let relative_parent = Path::new(video_path).parent().map(|p| p.to_string_lossy().into_owned());
        Ok(match relative_parent {
            Some(parent) if !parent.is_empty() => format!("{parent}/{out_name}"),
            _ => out_name,
        })
    }

    async fn write_subtitle_direct(&self, path: &str, content: &[u8]) -> Result<(), VfsError> {
        let resolved = self.normalize(path)?;
        write_atomic(&resolved, content).await
    }

    async fn download_to_temp(&self, path: &str) -> Result<PathBuf, VfsError> {
        let resolved = self.normalize(path)?;
        let temp = std::env::temp_dir().join(format!("video_{}", uuid::Uuid::new_v4()));
        fs::copy(&resolved, &temp)
            .await
            .map_err(|e| Self::io_err_sync(&resolved, e))?;
        Ok(temp)
    }

    async fn download_header_to_temp(&self, path: &str, max_bytes: u64) -> Result<PathBuf, VfsError> {
        let resolved = self.normalize(path)?;
        let mut file = fs::File::open(&resolved)
            .await
            .map_err(|e| Self::io_err_sync(&resolved, e))?;

        let temp = std::env::temp_dir().join(format!("video_header_{}", uuid::Uuid::new_v4()));
        let mut out = fs::File::create(&temp)
            .await
            .map_err(|e| Self::io_err_sync(&temp, e))?;

        let mut remaining = max_bytes;
        let mut buf = vec![0u8; 64 * 1024];
        while remaining > 0 {
            let take = buf.len().min(remaining as usize);
            let read = file
                .read(&mut buf[..take])
                .await
                .map_err(|e| Self::io_err_sync(&resolved, e))?;
            if read == 0 {
                break;
            }
            out.write_all(&buf[..read])
                .await
                .map_err(|e| Self::io_err_sync(&temp, e))?;
            remaining -= read as u64;
        }

        Ok(temp)
    }

    async fn extract_video_title(&self, path: &str) -> Result<String, VfsError> {
        let name = Path::new(path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        Ok(name.replace(['.', '_'], " ").trim().to_string())
    }
}

impl LocalVfs {
    fn io_err_sync(path: &Path, source: std::io::Error) -> VfsError {
        VfsError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

async fn write_atomic(path: &Path, body: &[u8]) -> Result<(), VfsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| LocalVfs::io_err_sync(parent, e))?;
    }

    let tmp_name = format!(
        ".{}.tmp",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("vfs")
    );
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, body)
        .await
        .map_err(|e| LocalVfs::io_err_sync(&tmp_path, e))?;

    match fs::rename(&tmp_path, path).await {
        Ok(()) => Ok(()),
        Err(e) if e.raw_os_error() == Some(18) => {
            fs::copy(&tmp_path, path)
                .await
                .map_err(|e| LocalVfs::io_err_sync(path, e))?;
            fs::remove_file(&tmp_path).await.ok();
            Ok(())
        }
        Err(e) => Err(LocalVfs::io_err_sync(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_path_escaping_root() {
        let dir = tempfile::tempdir().unwrap();
        let vfs = LocalVfs::new(dir.path());
        let result = vfs.read_subtitle("../../etc/passwd").await;
        assert!(matches!(result, Err(VfsError::PathEscapesRoot(_))));
    }

    #[tokio::test]
    async fn rejects_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let vfs = LocalVfs::new(dir.path());
        let result = vfs.read_subtitle("/etc/passwd").await;
        assert!(matches!(result, Err(VfsError::PathEscapesRoot(_))));
    }

    #[tokio::test]
    async fn list_detects_video_and_sibling_subtitle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("movie.mkv"), b"fake").unwrap();
        std::fs::write(dir.path().join("movie.en.srt"), b"1\n").unwrap();

        let vfs = LocalVfs::new(dir.path());
        let entries = vfs.list("").await.unwrap();
        let video = entries.iter().find(|e| e.name == "movie.mkv").unwrap();
        assert!(video.is_video);
        assert!(video.has_subtitle);
        assert_eq!(video.language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn write_subtitle_prepends_bom() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("movie.mkv"), b"fake").unwrap();

        let vfs = LocalVfs::new(dir.path());
        let out = vfs.write_subtitle("movie.mkv", "1\nhello\n", "fr").await.unwrap();
        assert_eq!(out, "movie.fr.srt");

        let raw = std::fs::read(dir.path().join("movie.fr.srt")).unwrap();
        assert_eq!(&raw[..3], &[0xEF, 0xBB, 0xBF]);
    }

    #[tokio::test]
    async fn download_header_to_temp_caps_bytes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("big.mkv"), vec![b'x'; 1000]).unwrap();

        let vfs = LocalVfs::new(dir.path());
        let temp = vfs.download_header_to_temp("big.mkv", 100).await.unwrap();
        let len = std::fs::metadata(&temp).unwrap().len();
        assert_eq!(len, 100);
        std::fs::remove_file(temp).ok();
    }

    #[tokio::test]
    async fn extract_video_title_replaces_separators() {
        let dir = tempfile::tempdir().unwrap();
        let vfs = LocalVfs::new(dir.path());
        let title = vfs.extract_video_title("some.movie_2020.mkv").await.unwrap();
        assert_eq!(title, "some movie 2020");
    }
}

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::warn;

use super::error::VfsError;
use super::traits::Vfs;
use super::types::{is_subtitle_file, is_video_file, sibling_language_tag, VfsEntry};

/// SMB-backed VFS, shelling out to the system `smbclient` binary the same
/// way the demuxer shells out to `ffprobe`/`ffmpeg`: one subprocess per
/// operation, stdout parsed procedurally. There is no pure-Rust SMB
/// client in this crate's dependency stack, so this keeps the external
/// dependency at the OS-binary boundary rather than inventing a crate.
pub struct SmbVfs {
    host: String,
    share: String,
    username: String,
    password: String,
    domain: String,
}

impl SmbVfs {
    pub fn new(
        host: impl Into<String>,
        share: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            share: share.into(),
            username: username.into(),
            password: password.into(),
            domain: domain.into(),
        }
    }

    fn auth_arg(&self) -> String {
        if self.domain.is_empty() {
            format!("{}%{}", self.username, self.password)
        } else {
            format!("{}\\{}%{}", self.domain, self.username, self.password)
        }
    }

    fn unc(&self) -> String {
        format!("//{}/{}", self.host, self.share)
    }

    async fn run_client_command(&self, command: &str) -> Result<String, VfsError> {
        let output = Command::new("smbclient")
            .arg(self.unc())
            .arg("-U")
            .arg(self.auth_arg())
            .arg("-c")
            .arg(command)
            .output()
            .await
            .map_err(|e| VfsError::Smb(format!("failed to spawn smbclient: {e}")))?;

        if !output.status.success() {
            return Err(VfsError::Smb(String::from_utf8_lossy(&output.stderr).into_owned()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Vfs for SmbVfs {
    async fn list(&self, path: &str) -> Result<Vec<VfsEntry>, VfsError> {
        if self.host.is_empty() {
            return Err(VfsError::NotConfigured);
        }

        let remote_dir = if path.is_empty() { "\\".to_string() } else { format!("\\{}", path.replace('/', "\\")) };
        let output = self.run_client_command(&format!("cd \"{remote_dir}\"; ls")).await?;

        let mut names = Vec::new();
        for line in output.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("NT_STATUS") {
                continue;
            }
            let mut parts = trimmed.split_whitespace();
            let mut name_tokens = Vec::new();
            let mut attr = "";
            while let Some(tok) = parts.next() {
                if (tok == "D" || tok == "A" || tok == "N") && name_tokens.len() > 0 {
                    attr = tok;
                    break;
                }
                name_tokens.push(tok);
            }
            let name = name_tokens.join(" ");
            if name.is_empty() || name == "." || name == ".." {
                continue;
            }
            names.push((name, attr == "D"));
        }

        let mut entries = Vec::new();
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
            let child_path = if path.is_empty() { name.clone() } else { format!("{path}/{name}") };
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

        Ok(entries)
    }

    async fn read_subtitle(&self, path: &str) -> Result<String, VfsError> {
        let temp = self.download_to_temp(path).await?;
        let content = tokio::fs::read_to_string(&temp)
            .await
            .map_err(|e| VfsError::Io { path: path.to_string(), source: e })?;
        tokio::fs::remove_file(&temp).await.ok();
        Ok(content)
    }

    async fn write_subtitle(
        &self,
        video_path: &str,
        content: &str,
        lang_code: &str,
    ) -> Result<String, VfsError> {
        let stem = video_path.rsplit_once('.').map(|(s, _)| s).unwrap_or(video_path);
        let out_path = format!("{stem}.{lang_code}.srt");

        let mut body = Vec::with_capacity(content.len() + 3);
        body.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
        body.extend_from_slice(content.as_bytes());

        self.write_subtitle_direct(&out_path, &body).await?;
        Ok(out_path)
    }

    async fn write_subtitle_direct(&self, path: &str, content: &[u8]) -> Result<(), VfsError> {
        if self.host.is_empty() {
            return Err(VfsError::NotConfigured);
        }

        let local_temp = std::env::temp_dir().join(format!("smb_upload_{}", uuid::Uuid::new_v4()));
        tokio::fs::write(&local_temp, content)
            .await
            .map_err(|e| VfsError::Io { path: local_temp.display().to_string(), source: e })?;

        let remote_path = format!("\\{}", path.replace('/', "\\"));
        let command = format!("put \"{}\" \"{remote_path}\"", local_temp.display());
        let result = self.run_client_command(&command).await;

        if let Err(e) = tokio::fs::remove_file(&local_temp).await {
            warn!("failed to clean up smb upload temp file: {e}");
        }

        result.map(|_| ())
    }

    async fn download_to_temp(&self, path: &str) -> Result<PathBuf, VfsError> {
        if self.host.is_empty() {
            return Err(VfsError::NotConfigured);
        }

        let temp = std::env::temp_dir().join(format!("video_{}", uuid::Uuid::new_v4()));
        let remote_path = format!("\\{}", path.replace('/', "\\"));
        let command = format!("get \"{remote_path}\" \"{}\"", temp.display());
        self.run_client_command(&command).await?;
        Ok(temp)
    }

    async fn download_header_to_temp(&self, path: &str, max_bytes: u64) -> Result<PathBuf, VfsError> {
        // smbclient has no partial-range get; download in full then
        // truncate locally. Acceptable for header-only probing since the
        // temp file is deleted immediately after analysis regardless.
        let full = self.download_to_temp(path).await?;
        let metadata = tokio::fs::metadata(&full)
            .await
            .map_err(|e| VfsError::Io { path: full.display().to_string(), source: e })?;
        if metadata.len() > max_bytes {
            let file = tokio::fs::OpenOptions::new()
                .write(true)
                .open(&full)
                .await
                .map_err(|e| VfsError::Io { path: full.display().to_string(), source: e })?;
            file.set_len(max_bytes)
                .await
                .map_err(|e| VfsError::Io { path: full.display().to_string(), source: e })?;
        }
        Ok(full)
    }

    async fn extract_video_title(&self, path: &str) -> Result<String, VfsError> {
        let name = path.rsplit('/').next().unwrap_or(path);
        let stem = name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name);
        Ok(stem.replace(['.', '_'], " ").trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_arg_includes_domain_when_set() {
        let vfs = SmbVfs::new("host", "share", "user", "pass", "WORKGROUP");
        assert_eq!(vfs.auth_arg(), "WORKGROUP\\user%pass");
    }

    #[test]
    fn auth_arg_omits_domain_when_empty() {
        let vfs = SmbVfs::new("host", "share", "user", "pass", "");
        assert_eq!(vfs.auth_arg(), "user%pass");
    }

    #[tokio::test]
    async fn unconfigured_host_returns_not_configured() {
        let vfs = SmbVfs::new("", "", "", "", "");
        let result = vfs.list("").await;
        assert!(matches!(result, Err(VfsError::NotConfigured)));
    }
}

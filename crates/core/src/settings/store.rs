use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::sync::RwLock;
use tracing::warn;

use super::error::SettingsError;
use super::types::{AppSettings, SanitizedSettings, SettingsUpdate};

const SETTINGS_DIR: &str = ".subtitle-cache";
const SETTINGS_FILE: &str = "app-settings.json";

/// Resolves `~/.subtitle-cache/app-settings.json`.
pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
    let home = dirs_home().ok_or(SettingsError::NoHomeDir)?;
    Ok(home.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Process-wide settings, loaded once at startup and re-saved to disk on
/// every mutation. Unlike `Config`, which is immutable for the process
/// lifetime, this is the live, user-editable document behind
/// `/api/settings`.
pub struct SettingsStore {
    path: PathBuf,
    settings: RwLock<AppSettings>,
}

impl SettingsStore {
    /// Load settings from `path`, falling back to defaults if the file
    /// doesn't exist yet. A corrupt file is a hard error -- we don't want
    /// to silently wipe an operator's configured credentials.
    pub async fn load(path: PathBuf) -> Result<Self, SettingsError> {
        let settings = match fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
                path: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppSettings::default(),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Ok(Self {
            path,
            settings: RwLock::new(settings),
        })
    }

    pub async fn new_in_memory(settings: AppSettings) -> Self {
        Self {
            path: PathBuf::new(),
            settings: RwLock::new(settings),
        }
    }

    pub async fn current(&self) -> AppSettings {
        self.settings.read().await.clone()
    }

    pub async fn sanitized(&self) -> SanitizedSettings {
        SanitizedSettings::from(&*self.settings.read().await)
    }

    /// Apply `update`, persist the result, and return the sanitized view.
    pub async fn update(&self, update: SettingsUpdate) -> Result<SanitizedSettings, SettingsError> {
        let mut guard = self.settings.write().await;
        guard.apply(update);
        self.persist(&guard).await?;
        Ok(SanitizedSettings::from(&*guard))
    }

    async fn persist(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| SettingsError::Write {
                    path: self.path.display().to_string(),
                    source,
                })?;
        }

        let body = serde_json::to_vec_pretty(settings).expect("AppSettings is always serializable");
        write_atomic(&self.path, &body)
            .await
            .map_err(|source| SettingsError::Write {
                path: self.path.display().to_string(),
                source,
            })
    }
}

async fn write_atomic(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let tmp_name = format!(
        ".{}.tmp",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("settings")
    );
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, body).await?;
    match fs::rename(&tmp_path, path).await {
        Ok(()) => Ok(()),
        Err(e) if e.raw_os_error() == Some(18) => {
            fs::copy(&tmp_path, path).await?;
            fs::remove_file(&tmp_path).await?;
            Ok(())
        }
        Err(e) => {
            warn!("settings rename failed: {e}");
            Err(e)
        }
    }
}

pub type SharedSettingsStore = Arc<SettingsStore>;

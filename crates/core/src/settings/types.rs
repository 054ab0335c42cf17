use serde::{Deserialize, Serialize};

/// Which LLM backend the translation engine talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    Ollama,
    OpenAi,
}

impl Default for ModelProvider {
    fn default() -> Self {
        Self::Ollama
    }
}

impl ModelProvider {
    /// The string the engine's auto-tuning keys off (`"ollama"` vs. anything else).
    pub fn as_engine_key(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
        }
    }
}

/// Which VFS backend the batch orchestrator and browse endpoints walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowseMode {
    Local,
    Smb,
}

impl Default for BrowseMode {
    fn default() -> Self {
        Self::Local
    }
}

/// Process-wide configuration, persisted as a single JSON document and
/// mutated through `/api/settings`. Distinct from `Config` (`crate::config`):
/// `Config` is loaded once at boot from TOML/env and never changes;
/// `AppSettings` loads on start and saves on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub open_subtitles_api_key: String,
    #[serde(default)]
    pub open_subtitles_username: String,
    #[serde(default)]
    pub open_subtitles_password: String,
    #[serde(default)]
    pub open_ai_api_key: String,
    #[serde(default)]
    pub model_provider: ModelProvider,
    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,
    #[serde(default = "default_openai_model")]
    pub open_ai_model: String,
    #[serde(default = "default_ollama_base_url")]
    pub ollama_base_url: String,
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default)]
    pub skip_hearing_impaired: bool,
    #[serde(default)]
    pub translation_batch_size: Option<usize>,
    #[serde(default)]
    pub smb_host: String,
    #[serde(default)]
    pub smb_share: String,
    #[serde(default)]
    pub smb_username: String,
    #[serde(default)]
    pub smb_password: String,
    #[serde(default)]
    pub smb_domain: String,
    #[serde(default)]
    pub browse_mode: BrowseMode,
    #[serde(default)]
    pub local_root_path: String,
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_target_language() -> String {
    "Spanish".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            open_subtitles_api_key: String::new(),
            open_subtitles_username: String::new(),
            open_subtitles_password: String::new(),
            open_ai_api_key: String::new(),
            model_provider: ModelProvider::default(),
            ollama_model: default_ollama_model(),
            open_ai_model: default_openai_model(),
            ollama_base_url: default_ollama_base_url(),
            target_language: default_target_language(),
            skip_hearing_impaired: false,
            translation_batch_size: None,
            smb_host: String::new(),
            smb_share: String::new(),
            smb_username: String::new(),
            smb_password: String::new(),
            smb_domain: String::new(),
            browse_mode: BrowseMode::default(),
            local_root_path: String::new(),
        }
    }
}

/// Masks secrets for display in `GET /api/settings`. Empty fields on a
/// subsequent `POST` must be interpreted as "leave unchanged" by the
/// caller -- this type only governs the read side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedSettings {
    pub open_subtitles_api_key: String,
    pub open_subtitles_username: String,
    pub open_subtitles_password: String,
    pub open_ai_api_key: String,
    pub model_provider: ModelProvider,
    pub ollama_model: String,
    pub open_ai_model: String,
    pub ollama_base_url: String,
    pub target_language: String,
    pub skip_hearing_impaired: bool,
    pub translation_batch_size: Option<usize>,
    pub smb_host: String,
    pub smb_share: String,
    pub smb_username: String,
    pub smb_password: String,
    pub smb_domain: String,
    pub browse_mode: BrowseMode,
    pub local_root_path: String,
}

const MASK: &str = "********";

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        MASK.to_string()
    }
}

impl From<&AppSettings> for SanitizedSettings {
    fn from(s: &AppSettings) -> Self {
        Self {
            open_subtitles_api_key: mask(&s.open_subtitles_api_key),
            open_subtitles_username: s.open_subtitles_username.clone(),
            open_subtitles_password: mask(&s.open_subtitles_password),
            open_ai_api_key: mask(&s.open_ai_api_key),
            model_provider: s.model_provider,
            ollama_model: s.ollama_model.clone(),
            open_ai_model: s.open_ai_model.clone(),
            ollama_base_url: s.ollama_base_url.clone(),
            target_language: s.target_language.clone(),
            skip_hearing_impaired: s.skip_hearing_impaired,
            translation_batch_size: s.translation_batch_size,
            smb_host: s.smb_host.clone(),
            smb_share: s.smb_share.clone(),
            smb_username: s.smb_username.clone(),
            smb_password: mask(&s.smb_password),
            smb_domain: s.smb_domain.clone(),
            browse_mode: s.browse_mode,
            local_root_path: s.local_root_path.clone(),
        }
    }
}

/// A settings update request. Every field is optional; an absent field
/// leaves the current value untouched. An empty-string password field is
/// also treated as "leave unchanged" (see spec: "empty password fields
/// are ignored") so the masked value round-tripped from a prior `GET`
/// never clobbers the real secret.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub open_subtitles_api_key: Option<String>,
    pub open_subtitles_username: Option<String>,
    pub open_subtitles_password: Option<String>,
    pub open_ai_api_key: Option<String>,
    pub model_provider: Option<ModelProvider>,
    pub ollama_model: Option<String>,
    pub open_ai_model: Option<String>,
    pub ollama_base_url: Option<String>,
    pub target_language: Option<String>,
    pub skip_hearing_impaired: Option<bool>,
    pub translation_batch_size: Option<usize>,
    pub smb_host: Option<String>,
    pub smb_share: Option<String>,
    pub smb_username: Option<String>,
    pub smb_password: Option<String>,
    pub smb_domain: Option<String>,
    pub browse_mode: Option<BrowseMode>,
    pub local_root_path: Option<String>,
}

impl AppSettings {
    /// Apply `update` in place, skipping any field left `None` and any
    /// secret field sent as an empty string.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(v) = update.open_subtitles_api_key.filter(|v| !v.is_empty()) {
            self.open_subtitles_api_key = v;
        }
        if let Some(v) = update.open_subtitles_username {
            self.open_subtitles_username = v;
        }
        if let Some(v) = update.open_subtitles_password.filter(|v| !v.is_empty()) {
            self.open_subtitles_password = v;
        }
        if let Some(v) = update.open_ai_api_key.filter(|v| !v.is_empty()) {
            self.open_ai_api_key = v;
        }
        if let Some(v) = update.model_provider {
            self.model_provider = v;
        }
        if let Some(v) = update.ollama_model {
            self.ollama_model = v;
        }
        if let Some(v) = update.open_ai_model {
            self.open_ai_model = v;
        }
        if let Some(v) = update.ollama_base_url {
            self.ollama_base_url = v;
        }
        if let Some(v) = update.target_language {
            self.target_language = v;
        }
        if let Some(v) = update.skip_hearing_impaired {
            self.skip_hearing_impaired = v;
        }
        if let Some(v) = update.translation_batch_size {
            self.translation_batch_size = Some(v);
        }
        if let Some(v) = update.smb_host {
            self.smb_host = v;
        }
        if let Some(v) = update.smb_share {
            self.smb_share = v;
        }
        if let Some(v) = update.smb_username {
            self.smb_username = v;
        }
        if let Some(v) = update.smb_password.filter(|v| !v.is_empty()) {
            self.smb_password = v;
        }
        if let Some(v) = update.smb_domain {
            self.smb_domain = v;
        }
        if let Some(v) = update.browse_mode {
            self.browse_mode = v;
        }
        if let Some(v) = update.local_root_path {
            self.local_root_path = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_masks_only_secrets() {
        let mut settings = AppSettings::default();
        settings.open_subtitles_password = "hunter2".to_string();
        settings.open_subtitles_username = "alice".to_string();

        let sanitized = SanitizedSettings::from(&settings);
        assert_eq!(sanitized.open_subtitles_password, MASK);
        assert_eq!(sanitized.open_subtitles_username, "alice");
    }

    #[test]
    fn empty_secret_stays_empty_in_sanitized_view() {
        let settings = AppSettings::default();
        let sanitized = SanitizedSettings::from(&settings);
        assert_eq!(sanitized.open_ai_api_key, "");
    }

    #[test]
    fn apply_ignores_empty_password_field() {
        let mut settings = AppSettings::default();
        settings.smb_password = "real-secret".to_string();

        settings.apply(SettingsUpdate {
            smb_password: Some(String::new()),
            smb_host: Some("fileserver".to_string()),
            ..Default::default()
        });

        assert_eq!(settings.smb_password, "real-secret");
        assert_eq!(settings.smb_host, "fileserver");
    }

    #[test]
    fn apply_overwrites_nonempty_secret() {
        let mut settings = AppSettings::default();
        settings.apply(SettingsUpdate {
            open_ai_api_key: Some("sk-live".to_string()),
            ..Default::default()
        });
        assert_eq!(settings.open_ai_api_key, "sk-live");
    }
}

//! Live, user-editable application settings, persisted as JSON and
//! mutated through `/api/settings`. See `crate::config` for the
//! boot-time, immutable counterpart.

mod error;
mod store;
mod types;

pub use error::SettingsError;
pub use store::{default_settings_path, SettingsStore, SharedSettingsStore};
pub use types::{AppSettings, BrowseMode, ModelProvider, SanitizedSettings, SettingsUpdate};

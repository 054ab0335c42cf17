use serde::{Deserialize, Serialize};

/// Metadata stored alongside a cache entry's subtitle artifacts.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheMetadata {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_index: Option<u32>,
}

/// One row as surfaced to the dashboard cache listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntrySummary {
    pub fingerprint: String,
    pub metadata: CacheMetadata,
    /// Target languages for which a translated artifact exists.
    pub translated_languages: Vec<String>,
    /// `true` if only `original.srt` exists (no translated artifact yet);
    /// surfaced to the dashboard as "In Progress".
    pub in_progress: bool,
}

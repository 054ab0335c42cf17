use serde::{Deserialize, Serialize};

/// Search filters accepted by `OpenSubtitlesCatalog::search`, mirroring
/// the subset of `/api/v1/subtitles` query parameters this proxy
/// supports.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<String>,
    pub moviehash: Option<String>,
    pub page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleResult {
    pub id: String,
    pub file_id: String,
    pub file_name: String,
    /// Source language as reported by the catalog. The HTTP layer
    /// relabels this to the active target language before responding.
    pub language: String,
    pub release: Option<String>,
    pub download_count: u64,
    pub uploader: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitlePage {
    pub data: Vec<SubtitleResult>,
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

/// Response to a `download` call that issues a short-lived link rather
/// than the bytes directly -- OpenSubtitles' own `/download` behaves
/// this way, and the HTTP layer mirrors the shape in
/// `/api/v1/download`'s response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadGrant {
    pub link: String,
    pub file_name: String,
    pub requests: u32,
    pub remaining: u32,
    pub message: String,
}

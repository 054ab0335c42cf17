use serde::Serialize;

use crate::opensubs_client::{SubtitlePage, SubtitleResult};

/// A catalog search result as the proxy hands it back to the client:
/// identical to the upstream shape except the language is rewritten to
/// the active target language and the two translation flags are forced
/// on, since every result this proxy serves is a machine translation
/// regardless of what the upstream catalog reports.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxySubtitleResult {
    pub id: String,
    pub file_id: String,
    pub file_name: String,
    pub language: String,
    pub release: Option<String>,
    pub download_count: u64,
    pub uploader: Option<String>,
    pub ai_translated: bool,
    pub machine_translated: bool,
}

impl ProxySubtitleResult {
    fn relabel(result: SubtitleResult, target_lang: &str) -> Self {
        Self {
            id: result.id,
            file_id: result.file_id,
            file_name: result.file_name,
            language: target_lang.to_string(),
            release: result.release,
            download_count: result.download_count,
            uploader: result.uploader,
            ai_translated: true,
            machine_translated: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProxySearchPage {
    pub data: Vec<ProxySubtitleResult>,
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

impl ProxySearchPage {
    pub fn relabel(page: SubtitlePage, target_lang: &str) -> Self {
        Self {
            data: page
                .data
                .into_iter()
                .map(|r| ProxySubtitleResult::relabel(r, target_lang))
                .collect(),
            page: page.page,
            total_pages: page.total_pages,
            total_count: page.total_count,
        }
    }
}

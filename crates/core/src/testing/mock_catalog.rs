//! Mock upstream OpenSubtitles catalog for testing the proxy flow
//! without a real network call.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::opensubs_client::{CatalogError, OpenSubtitlesCatalog, SearchFilters, SubtitlePage, SubtitleResult};

#[derive(Debug, Clone)]
pub enum RecordedCall {
    Search(SearchFilters),
    Download(String),
}

/// Returns a single canned English result for every search, and a fixed
/// English SRT body for every download -- enough for the cache
/// idempotence and proxy-flow tests (E5, E6) to assert on spy calls
/// without standing up a real catalog.
pub struct MockOpenSubtitlesCatalog {
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    next_error: Arc<RwLock<Option<String>>>,
    download_body: Arc<RwLock<Vec<u8>>>,
    download_name: Arc<RwLock<String>>,
}

impl Default for MockOpenSubtitlesCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOpenSubtitlesCatalog {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            download_body: Arc::new(RwLock::new(
                b"1\n00:00:01,000 --> 00:00:03,000\nHello there\n\n".to_vec(),
            )),
            download_name: Arc::new(RwLock::new("subtitle.srt".to_string())),
        }
    }

    pub fn with_download_body(self, body: impl Into<Vec<u8>>, name: impl Into<String>) -> Self {
        *self.download_body.write().unwrap() = body.into();
        *self.download_name.write().unwrap() = name.into();
        self
    }

    pub fn fail_next(&self, message: impl Into<String>) {
        *self.next_error.write().unwrap() = Some(message.into());
    }

    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn download_count(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Download(_)))
            .count()
    }

    fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().unwrap().take().map(CatalogError::Http)
    }
}

#[async_trait]
impl OpenSubtitlesCatalog for MockOpenSubtitlesCatalog {
    async fn search(&self, filters: SearchFilters) -> Result<SubtitlePage, CatalogError> {
        self.calls.write().unwrap().push(RecordedCall::Search(filters.clone()));
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        Ok(SubtitlePage {
            data: vec![SubtitleResult {
                id: "1".to_string(),
                file_id: "42".to_string(),
                file_name: "subtitle.srt".to_string(),
                language: "en".to_string(),
                release: Some("Example.Release.1080p".to_string()),
                download_count: 100,
                uploader: Some("mock-uploader".to_string()),
            }],
            page: filters.page.max(1),
            total_pages: 1,
            total_count: 1,
        })
    }

    async fn download(&self, file_id: &str) -> Result<(Vec<u8>, String), CatalogError> {
        self.calls
            .write()
            .unwrap()
            .push(RecordedCall::Download(file_id.to_string()));
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        Ok((
            self.download_body.read().unwrap().clone(),
            self.download_name.read().unwrap().clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_returns_one_english_result() {
        let catalog = MockOpenSubtitlesCatalog::new();
        let page = catalog.search(SearchFilters::default()).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].language, "en");
    }

    #[tokio::test]
    async fn download_records_file_id() {
        let catalog = MockOpenSubtitlesCatalog::new();
        catalog.download("42").await.unwrap();
        assert_eq!(catalog.download_count(), 1);
    }

    #[tokio::test]
    async fn fail_next_injects_one_error() {
        let catalog = MockOpenSubtitlesCatalog::new();
        catalog.fail_next("upstream down");
        assert!(catalog.download("42").await.is_err());
        assert!(catalog.download("42").await.is_ok());
    }
}

use async_trait::async_trait;

use super::error::CatalogError;
use super::traits::OpenSubtitlesCatalog;
use super::types::{SearchFilters, SubtitlePage};

/// Stand-in catalog used before an OpenSubtitles API key has been saved
/// to settings. Every call fails with `NotConfigured` so the rest of the
/// wiring (subtitle service, routes) never has to special-case "no
/// catalog yet" -- it's just a catalog that always declines.
#[derive(Debug, Default)]
pub struct NotConfiguredCatalog;

#[async_trait]
impl OpenSubtitlesCatalog for NotConfiguredCatalog {
    async fn search(&self, _filters: SearchFilters) -> Result<SubtitlePage, CatalogError> {
        Err(CatalogError::NotConfigured(
            "OpenSubtitles API key is not set".to_string(),
        ))
    }

    async fn download(&self, _file_id: &str) -> Result<(Vec<u8>, String), CatalogError> {
        Err(CatalogError::NotConfigured(
            "OpenSubtitles API key is not set".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_reports_not_configured() {
        let catalog = NotConfiguredCatalog;
        let err = catalog.search(SearchFilters::default()).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotConfigured);
    }
}

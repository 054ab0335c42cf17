use async_trait::async_trait;

use super::error::CatalogError;
use super::types::{SearchFilters, SubtitlePage};

/// Upstream subtitle catalog contract. `download` returns the actual
/// bytes (the REST client resolves OpenSubtitles' own link-based
/// download internally) plus a suggested file name.
#[async_trait]
pub trait OpenSubtitlesCatalog: Send + Sync {
    async fn search(&self, filters: SearchFilters) -> Result<SubtitlePage, CatalogError>;

    async fn download(&self, file_id: &str) -> Result<(Vec<u8>, String), CatalogError>;
}

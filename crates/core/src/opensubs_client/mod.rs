//! OpenSubtitles-compatible catalog client: the upstream this proxy's
//! `/api/v1/*` surface fronts.

mod error;
mod not_configured;
mod rest;
mod traits;
mod types;

pub use error::CatalogError;
pub use not_configured::NotConfiguredCatalog;
pub use rest::OpenSubtitlesClient;
pub use traits::OpenSubtitlesCatalog;
pub use types::{DownloadGrant, SearchFilters, SubtitlePage, SubtitleResult};

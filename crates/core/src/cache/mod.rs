//! Content-addressed cache for translated subtitle artifacts.
//!
//! One directory per fingerprint under a configured root, holding the
//! original text, the per-language translated artifacts, and a small
//! metadata sidecar. See [`fs_cache::FsCache`] for the on-disk layout and
//! atomicity guarantees.

mod error;
mod fs_cache;
mod traits;
mod types;

pub use error::CacheError;
pub use fs_cache::FsCache;
pub use traits::CacheStore;
pub use types::{CacheEntrySummary, CacheMetadata};

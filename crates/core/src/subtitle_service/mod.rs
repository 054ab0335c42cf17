//! Subtitle orchestrator: the catalog proxy download-translate-cache
//! flow, ad-hoc content translation, and cache probes. Wires the codec,
//! engine, cache, and progress registry together around an injected
//! catalog client.

mod error;
mod service;
mod types;

pub use error::SubtitleServiceError;
pub use service::SubtitleService;
pub use types::{ProxySearchPage, ProxySubtitleResult};

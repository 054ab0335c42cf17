//! Hand-written mock implementations of the four injected adapter
//! traits (catalog, LLM, VFS, demuxer), used by unit and integration
//! tests in place of real network/process calls.
//!
//! # Example
//!
//! ```rust,ignore
//! use submute_core::testing::{MockOpenSubtitlesCatalog, MockLlmClient, MockVfs, MockDemuxer};
//!
//! let catalog = MockOpenSubtitlesCatalog::new();
//! let llm = MockLlmClient::new();
//! // wire into a SubtitleService / BatchOrchestrator for testing.
//! ```

mod mock_catalog;
mod mock_demuxer;
mod mock_llm;
mod mock_vfs;

pub use mock_catalog::{MockOpenSubtitlesCatalog, RecordedCall};
pub use mock_demuxer::{MockDemuxer, RecordedDemuxerCall};
pub use mock_llm::{MockLlmClient, RecordedCompletion};
pub use mock_vfs::{MockVfs, RecordedVfsCall};

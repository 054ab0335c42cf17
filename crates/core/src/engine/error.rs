use thiserror::Error;

use super::llm::LlmError;

/// Errors surfaced by the translation engine. Per spec, the engine
/// returns best-effort results (kept-original cues) rather than failing
/// on partial loss; this enum is only raised when an entire batch *and*
/// its per-cue fallback both fail.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("LLM unavailable: {0}")]
    UpstreamUnavailable(#[from] LlmError),

    #[error("no translatable response: {reason}")]
    BadResponse { reason: String },
}

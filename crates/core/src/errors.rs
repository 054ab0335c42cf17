//! Shared error classification used to map every component error type onto
//! HTTP status codes in one place at the server boundary.

/// Coarse classification each component error maps onto via a `kind()`
/// method. The HTTP layer matches on this instead of on every concrete
/// error enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required credential or setting is missing (e.g. no OpenSubtitles
    /// API key configured yet).
    NotConfigured,
    /// A downstream dependency (OpenSubtitles, the LLM provider, ffprobe,
    /// SMB share) is unreachable or returned an error.
    UpstreamUnavailable,
    /// The caller supplied invalid input (bad path, bad format, bad id).
    BadInput,
    /// The request was well-formed but there is nothing to return.
    Empty,
    /// The operation can't proceed right now because of in-process state
    /// (a batch is already running, the translation gate is held).
    Busy,
    /// Anything else, including I/O and programming errors.
    Internal,
}

// Allow some clippy lints that are too noisy for this codebase
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::needless_borrow)]
#![allow(clippy::collapsible_if)]

pub mod audit;
pub mod batch;
pub mod bidi;
pub mod cache;
pub mod codec;
pub mod config;
pub mod demuxer;
pub mod engine;
pub mod errors;
pub mod metrics;
pub mod opensubs_client;
pub mod progress;
pub mod settings;
pub mod subtitle_service;
pub mod vfs;

/// Hand-written mocks of the injected adapter traits (catalog, LLM,
/// VFS, demuxer) for unit and integration tests.
pub mod testing;

pub use audit::{
    create_audit_system, AuditError, AuditEvent, AuditEventEnvelope, AuditFilter, AuditHandle,
    AuditRecord, AuditStore, AuditWriter, SqliteAuditStore,
};
pub use batch::{lang_code_for, BatchError, BatchOrchestrator, BatchRecord, BatchStatus, BatchVideo};
pub use bidi::{contains_rtl_chars, is_rtl_language, process as bidi_process};
pub use cache::{CacheEntrySummary, CacheError, CacheMetadata, CacheStore, FsCache};
pub use codec::{
    generate, generate_srt, generate_vtt, parse, parse_srt, parse_vtt, CodecError, Cue, CueTime,
    SubtitleDocument, SubtitleFormat,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthConfig, AuthMethod, Config,
    ConfigError, SanitizedAuthConfig, SanitizedConfig, ServerConfig, StorageConfig,
};
pub use demuxer::{Demuxer, DemuxerError, FfprobeDemuxer, SubtitleTrack};
pub use engine::{
    CompletionRequest as EngineCompletionRequest,
    CompletionResponse as EngineCompletionResponse, EngineConfig, EngineError,
    LlmClient as EngineLlmClient, LlmError as EngineLlmError, LlmUsage as EngineLlmUsage,
    OllamaClient as EngineOllamaClient, OpenAiClient, TranslationEngine,
};
pub use errors::ErrorKind;
pub use opensubs_client::{
    CatalogError as OpenSubtitlesCatalogError, DownloadGrant, NotConfiguredCatalog,
    OpenSubtitlesCatalog, OpenSubtitlesClient, SearchFilters, SubtitlePage, SubtitleResult,
};
pub use progress::{JobGuard, JobStatus, ProgressRegistry, TranslationJob};
pub use settings::{
    default_settings_path, AppSettings, BrowseMode, ModelProvider, SanitizedSettings,
    SettingsError, SettingsStore, SettingsUpdate,
};
pub use subtitle_service::{
    ProxySearchPage, ProxySubtitleResult, SubtitleService, SubtitleServiceError,
};
pub use vfs::{
    is_subtitle_file, is_video_file, LocalVfs, SmbVfs, Vfs, VfsEntry, VfsError,
    DEFAULT_HEADER_BYTES,
};

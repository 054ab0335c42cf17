use std::sync::Arc;

use submute_core::{
    AppSettings, AuditHandle, AuditStore, BatchOrchestrator, CacheStore, Config, Demuxer,
    EngineConfig, EngineLlmClient, EngineOllamaClient, LocalVfs, ModelProvider,
    NotConfiguredCatalog, OpenAiClient, OpenSubtitlesCatalog, OpenSubtitlesClient,
    ProgressRegistry, SanitizedConfig, SettingsStore, SmbVfs, SubtitleService, TranslationEngine,
    Vfs,
};
use tokio::sync::RwLock;

/// The subset of collaborators whose concrete wiring depends on live
/// settings (catalog credentials, model provider, browse backend).
/// Rebuilt wholesale on every `/api/settings` update rather than mutated
/// in place, since the catalog/engine/vfs traits carry no "reconfigure"
/// operation.
struct Runtime {
    subtitle_service: Arc<SubtitleService>,
    vfs: Arc<dyn Vfs>,
    batch: Arc<BatchOrchestrator>,
}

impl Runtime {
    fn build(
        settings: &AppSettings,
        cache: Arc<dyn CacheStore>,
        progress: Arc<ProgressRegistry>,
        demuxer: Arc<dyn Demuxer>,
    ) -> Self {
        let catalog = build_catalog(settings);
        let llm = build_llm(settings);
        let engine_config = EngineConfig {
            skip_hearing_impaired: settings.skip_hearing_impaired,
            batch_size_override: settings.translation_batch_size,
            ..EngineConfig::default()
        };
        let engine = Arc::new(TranslationEngine::new(llm, engine_config));
        let subtitle_service = Arc::new(SubtitleService::new(
            catalog,
            engine,
            Arc::clone(&cache),
            Arc::clone(&progress),
        ));

        let vfs = build_vfs(settings);
        let batch = Arc::new(BatchOrchestrator::new(
            Arc::clone(&vfs),
            Arc::clone(&demuxer),
            Arc::clone(&subtitle_service),
        ));

        Self {
            subtitle_service,
            vfs,
            batch,
        }
    }
}

fn build_catalog(settings: &AppSettings) -> Arc<dyn OpenSubtitlesCatalog> {
    if settings.open_subtitles_api_key.is_empty() {
        return Arc::new(NotConfiguredCatalog);
    }
    match OpenSubtitlesClient::new(
        settings.open_subtitles_api_key.clone(),
        settings.open_subtitles_username.clone(),
        settings.open_subtitles_password.clone(),
    ) {
        Ok(client) => Arc::new(client),
        Err(_) => Arc::new(NotConfiguredCatalog),
    }
}

fn build_llm(settings: &AppSettings) -> Arc<dyn EngineLlmClient> {
    match settings.model_provider {
        ModelProvider::Ollama => Arc::new(
            EngineOllamaClient::new(settings.ollama_model.clone())
                .with_api_base(settings.ollama_base_url.clone()),
        ),
        ModelProvider::OpenAi => Arc::new(OpenAiClient::new(
            settings.open_ai_api_key.clone(),
            settings.open_ai_model.clone(),
        )),
    }
}

fn build_vfs(settings: &AppSettings) -> Arc<dyn Vfs> {
    match settings.browse_mode {
        submute_core::BrowseMode::Smb => Arc::new(SmbVfs::new(
            settings.smb_host.clone(),
            settings.smb_share.clone(),
            settings.smb_username.clone(),
            settings.smb_password.clone(),
            settings.smb_domain.clone(),
        )),
        submute_core::BrowseMode::Local => {
            let root = if settings.local_root_path.is_empty() {
                std::env::current_dir().unwrap_or_default()
            } else {
                settings.local_root_path.clone().into()
            };
            Arc::new(LocalVfs::new(root))
        }
    }
}

/// Shared application state, constructed once at startup and handed to
/// every handler via axum's `State` extractor.
pub struct AppState {
    config: Config,
    settings: Arc<SettingsStore>,
    cache: Arc<dyn CacheStore>,
    progress: Arc<ProgressRegistry>,
    demuxer: Arc<dyn Demuxer>,
    audit: AuditHandle,
    audit_store: Arc<dyn AuditStore>,
    runtime: RwLock<Arc<Runtime>>,
}

impl AppState {
    pub async fn new(
        config: Config,
        settings: Arc<SettingsStore>,
        cache: Arc<dyn CacheStore>,
        progress: Arc<ProgressRegistry>,
        demuxer: Arc<dyn Demuxer>,
        audit: AuditHandle,
        audit_store: Arc<dyn AuditStore>,
    ) -> Self {
        let current = settings.current().await;
        let runtime = Runtime::build(&current, Arc::clone(&cache), Arc::clone(&progress), Arc::clone(&demuxer));
        Self {
            config,
            settings,
            cache,
            progress,
            demuxer,
            audit,
            audit_store,
            runtime: RwLock::new(Arc::new(runtime)),
        }
    }

    /// Rebuilds the catalog/engine/VFS stack from the settings store's
    /// current contents. Called after every successful `/api/settings`
    /// update so a saved API key or provider switch takes effect without
    /// a restart.
    pub async fn refresh_runtime(&self) {
        let current = self.settings.current().await;
        let runtime = Runtime::build(
            &current,
            Arc::clone(&self.cache),
            Arc::clone(&self.progress),
            Arc::clone(&self.demuxer),
        );
        *self.runtime.write().await = Arc::new(runtime);
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    pub fn progress(&self) -> &Arc<ProgressRegistry> {
        &self.progress
    }

    pub fn audit(&self) -> &AuditHandle {
        &self.audit
    }

    pub fn audit_store(&self) -> &Arc<dyn AuditStore> {
        &self.audit_store
    }

    pub fn demuxer(&self) -> &Arc<dyn Demuxer> {
        &self.demuxer
    }

    pub async fn subtitle_service(&self) -> Arc<SubtitleService> {
        Arc::clone(&self.runtime.read().await.subtitle_service)
    }

    pub async fn vfs(&self) -> Arc<dyn Vfs> {
        Arc::clone(&self.runtime.read().await.vfs)
    }

    pub async fn batch(&self) -> Arc<BatchOrchestrator> {
        Arc::clone(&self.runtime.read().await.batch)
    }

    pub async fn target_language(&self) -> String {
        self.settings.current().await.target_language
    }
}

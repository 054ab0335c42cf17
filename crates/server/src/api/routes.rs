use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use super::{audit, auth, browse, dashboard, handlers, middleware::metrics_middleware, ollama_admin, settings_api, subtitles};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let v1_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", delete(auth::logout))
        .route("/subtitles", get(subtitles::search_subtitles))
        .route("/download", post(subtitles::create_download_grant))
        .route("/download/{fileId}/{fileName}", get(subtitles::download_subtitle))
        .route("/upload", post(subtitles::upload_subtitle))
        .route("/infos/{kind}", get(subtitles::infos));

    let settings_routes = Router::new()
        .route("/", get(settings_api::get_settings).post(settings_api::update_settings))
        .route("/ollama/models", get(ollama_admin::list_models))
        .route("/ollama/pull", post(ollama_admin::pull_model))
        .route("/ollama/pull/status", get(ollama_admin::pull_status));

    let browse_routes = Router::new()
        .route("/", get(browse::list_directory))
        .route("/search", get(browse::search))
        .route("/search-manual", get(browse::search_manual))
        .route("/translate", post(browse::translate))
        .route("/translate-local", post(browse::translate_local))
        .route("/translate-embedded", post(browse::translate_embedded))
        .route("/embedded-tracks", get(browse::embedded_tracks))
        .route("/progress", get(browse::progress))
        .route("/batch-analyze", post(browse::batch_analyze))
        .route("/batch-start", post(browse::batch_start))
        .route("/batch-progress", get(browse::batch_progress))
        .route("/batch-cancel", post(browse::batch_cancel))
        .route(
            "/settings",
            get(browse::get_browse_settings).post(browse::update_browse_settings),
        )
        .route("/mode", get(browse::get_mode).post(browse::set_mode))
        .route("/test", get(browse::test_connection))
        .route("/discover", get(browse::discover));

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/audit", get(audit::query_audit))
        .nest("/v1", v1_routes)
        .nest("/settings", settings_routes)
        .nest("/browse", browse_routes);

    let dashboard_routes = Router::new()
        .route("/status", get(dashboard::status))
        .route("/settings", get(dashboard::get_settings).post(dashboard::update_settings))
        .route("/browse", get(dashboard::browse))
        .route("/cache", get(dashboard::list_cache))
        .route(
            "/cache/{fileId}",
            get(dashboard::get_cache_entry).delete(dashboard::delete_cache_entry),
        )
        .route("/language", get(dashboard::get_language).post(dashboard::set_language));

    Router::new()
        .nest("/api", api_routes)
        .merge(dashboard_routes)
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .with_state(state)
}

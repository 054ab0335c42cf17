//! `/api/browse/*`: the browser-UI data endpoints backing folder
//! navigation, embedded-track detection, ad-hoc and batch translation,
//! and browse-backend configuration.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use submute_core::{BrowseMode, SettingsUpdate, SubtitleTrack, TranslationJob};

use crate::api::error::kind_to_response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    #[serde(default)]
    pub path: String,
}

pub async fn list_directory(State(state): State<Arc<AppState>>, Query(q): Query<PathQuery>) -> Response {
    let vfs = state.vfs().await;
    match vfs.list(&q.path).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct BrowseSearchQuery {
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Searches the catalog for candidate subtitles for a file the user
/// picked while browsing. Same underlying proxy search as
/// `/api/v1/subtitles`, scoped down to the free-text query the browse UI
/// derives from the selected file's name.
pub async fn search(State(state): State<Arc<AppState>>, Query(q): Query<BrowseSearchQuery>) -> Response {
    let filters = submute_core::SearchFilters {
        query: Some(q.query),
        page: q.page,
        ..Default::default()
    };
    let target_lang = state.target_language().await;
    let service = state.subtitle_service().await;
    match service.proxy_search(filters, &target_lang).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

/// Identical to `search`, kept as a distinct route because the browse UI
/// calls it when the user types a title by hand instead of one derived
/// automatically from a file name.
pub async fn search_manual(state: State<Arc<AppState>>, q: Query<BrowseSearchQuery>) -> Response {
    search(state, q).await
}

#[derive(Debug, Deserialize)]
pub struct TranslateTextRequest {
    pub text: String,
    pub target_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateTextResponse {
    pub content: String,
}

pub async fn translate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TranslateTextRequest>,
) -> Response {
    let target_lang = match body.target_language {
        Some(lang) => lang,
        None => state.target_language().await,
    };
    let service = state.subtitle_service().await;
    match service.translate_content(&body.text, &target_lang).await {
        Ok(content) => Json(TranslateTextResponse { content }).into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct TranslateLocalRequest {
    pub video_path: String,
    pub subtitle_path: String,
    pub target_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateLocalResponse {
    pub written_path: String,
}

/// Translates a subtitle file that already sits next to a video (the
/// user has an English `.srt` and wants a sibling in the target
/// language) and writes the result back through the VFS.
pub async fn translate_local(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TranslateLocalRequest>,
) -> Response {
    let target_lang = match body.target_language {
        Some(lang) => lang,
        None => state.target_language().await,
    };

    let vfs = state.vfs().await;
    let text = match vfs.read_subtitle(&body.subtitle_path).await {
        Ok(text) => text,
        Err(e) => return kind_to_response(e.kind(), e.to_string()),
    };

    let service = state.subtitle_service().await;
    let translated = match service.translate_content(&text, &target_lang).await {
        Ok(translated) => translated,
        Err(e) => return kind_to_response(e.kind(), e.to_string()),
    };

    let lang_code = submute_core::lang_code_for(&target_lang);
    match vfs.write_subtitle(&body.video_path, &translated, &lang_code).await {
        Ok(written_path) => Json(TranslateLocalResponse { written_path }).into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct EmbeddedTracksQuery {
    pub path: String,
}

pub async fn embedded_tracks(
    State(state): State<Arc<AppState>>,
    Query(q): Query<EmbeddedTracksQuery>,
) -> Response {
    let vfs = state.vfs().await;
    let header_path = match vfs
        .download_header_to_temp(&q.path, submute_core::DEFAULT_HEADER_BYTES)
        .await
    {
        Ok(p) => p,
        Err(e) => return kind_to_response(e.kind(), e.to_string()),
    };

    let demuxer = state.demuxer();
    let tracks: Result<Vec<SubtitleTrack>, _> = demuxer.subtitle_tracks(&header_path).await;
    let _ = tokio::fs::remove_file(&header_path).await;

    match tracks {
        Ok(tracks) => Json(tracks).into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct TranslateEmbeddedRequest {
    pub path: String,
    pub file_name: String,
    pub track_index: u32,
    pub target_language: Option<String>,
}

/// Single-file equivalent of what the batch worker does per video:
/// download, extract the chosen track, translate, write the sibling
/// subtitle. Used by the browse UI to translate one file without
/// starting a whole-folder batch.
pub async fn translate_embedded(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TranslateEmbeddedRequest>,
) -> Response {
    let target_lang = match body.target_language {
        Some(lang) => lang,
        None => state.target_language().await,
    };

    let vfs = state.vfs().await;
    let temp_path = match vfs.download_to_temp(&body.path).await {
        Ok(p) => p,
        Err(e) => return kind_to_response(e.kind(), e.to_string()),
    };

    let outcome = async {
        let demuxer = state.demuxer();
        let srt_text = demuxer
            .extract_track(&temp_path, body.track_index as usize)
            .await
            .map_err(|e| (e.kind(), e.to_string()))?;

        let service = state.subtitle_service().await;
        let translated = service
            .translate_embedded_track(&srt_text, &target_lang, &body.file_name, body.track_index)
            .await
            .map_err(|e| (e.kind(), e.to_string()))?;

        let lang_code = submute_core::lang_code_for(&target_lang);
        let written_path = vfs
            .write_subtitle(&body.path, &translated, &lang_code)
            .await
            .map_err(|e| (e.kind(), e.to_string()))?;

        Ok::<_, (submute_core::ErrorKind, String)>(written_path)
    }
    .await;

    let _ = tokio::fs::remove_file(&temp_path).await;

    match outcome {
        Ok(written_path) => Json(TranslateLocalResponse { written_path }).into_response(),
        Err((kind, message)) => kind_to_response(kind, message),
    }
}

pub async fn progress(State(state): State<Arc<AppState>>) -> Json<Vec<TranslationJob>> {
    Json(state.progress().snapshot())
}

#[derive(Debug, Deserialize)]
pub struct BatchAnalyzeRequest {
    pub folder: String,
}

pub async fn batch_analyze(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BatchAnalyzeRequest>,
) -> Response {
    let batch = state.batch().await;
    match batch.analyze(&body.folder).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct BatchStartRequest {
    pub target_language: Option<String>,
}

pub async fn batch_start(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BatchStartRequest>,
) -> Response {
    let target_lang = match body.target_language {
        Some(lang) => lang,
        None => state.target_language().await,
    };
    let batch = state.batch().await;
    match batch.start(target_lang).await {
        Ok(()) => Json(serde_json::json!({ "status": "started" })).into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

pub async fn batch_progress(State(state): State<Arc<AppState>>) -> Response {
    let batch = state.batch().await;
    match batch.progress().await {
        Some(record) => Json(record).into_response(),
        None => kind_to_response(submute_core::ErrorKind::BadInput, "no batch has been analyzed yet"),
    }
}

pub async fn batch_cancel(State(state): State<Arc<AppState>>) -> Response {
    let batch = state.batch().await;
    match batch.cancel().await {
        Ok(()) => Json(serde_json::json!({ "status": "cancelling" })).into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

/// Alias for the subset of `/api/settings` relevant to browsing (browse
/// mode, SMB credentials, local root path). Kept as a separate route
/// for client compatibility; reads and writes the same settings store.
pub async fn get_browse_settings(state: State<Arc<AppState>>) -> Json<submute_core::SanitizedSettings> {
    crate::api::settings_api::get_settings(state).await
}

pub async fn update_browse_settings(
    state: State<Arc<AppState>>,
    update: Json<SettingsUpdate>,
) -> Response {
    crate::api::settings_api::update_settings(state, update).await
}

#[derive(Debug, Serialize)]
pub struct ModeResponse {
    pub mode: BrowseMode,
}

pub async fn get_mode(State(state): State<Arc<AppState>>) -> Json<ModeResponse> {
    Json(ModeResponse { mode: state.settings().current().await.browse_mode })
}

#[derive(Debug, Deserialize)]
pub struct SetModeRequest {
    pub mode: BrowseMode,
}

pub async fn set_mode(State(state): State<Arc<AppState>>, Json(body): Json<SetModeRequest>) -> Response {
    let update = SettingsUpdate { browse_mode: Some(body.mode), ..Default::default() };
    match state.settings().update(update).await {
        Ok(sanitized) => {
            state.refresh_runtime().await;
            Json(sanitized).into_response()
        }
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

#[derive(Debug, Serialize)]
pub struct TestConnectionResponse {
    pub reachable: bool,
    pub message: String,
}

/// Probes the currently configured browse backend by listing its root.
pub async fn test_connection(State(state): State<Arc<AppState>>) -> Json<TestConnectionResponse> {
    let vfs = state.vfs().await;
    match vfs.list("").await {
        Ok(entries) => Json(TestConnectionResponse {
            reachable: true,
            message: format!("{} entries at root", entries.len()),
        }),
        Err(e) => Json(TestConnectionResponse { reachable: false, message: e.to_string() }),
    }
}

#[derive(Debug, Serialize)]
pub struct DiscoverResponse {
    pub host: String,
    pub port: u16,
}

/// Returns this server's own bind address. There is no active mDNS
/// broadcast here -- a client on the same network that already has this
/// response can still reach the server directly.
pub async fn discover(State(state): State<Arc<AppState>>) -> Json<DiscoverResponse> {
    let config = state.sanitized_config();
    Json(DiscoverResponse { host: config.server.host.to_string(), port: config.server.port })
}

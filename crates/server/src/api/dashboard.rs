//! Unprefixed dashboard routes (`/status`, `/settings`, `/browse`,
//! `/cache`, `/cache/{fileId}`, `/language`). Thin JSON views over the
//! same collaborators the `/api/*` surface uses -- there is no bundled
//! HTML/JS dashboard in this tree, so these are data endpoints a
//! separately hosted UI (or `curl`) can consume directly.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use submute_core::{CacheEntrySummary, SanitizedSettings, SettingsUpdate, TranslationJob};

use crate::api::browse::{list_directory, PathQuery};
use crate::api::error::kind_to_response;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub target_language: String,
    pub active_jobs: Vec<TranslationJob>,
    pub batch: Option<submute_core::BatchRecord>,
}

pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let batch = state.batch().await;
    Json(StatusResponse {
        status: "ok".to_string(),
        target_language: state.target_language().await,
        active_jobs: state.progress().snapshot(),
        batch: batch.progress().await,
    })
}

pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<SanitizedSettings> {
    Json(state.settings().sanitized().await)
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Response {
    match state.settings().update(update).await {
        Ok(sanitized) => {
            state.refresh_runtime().await;
            Json(sanitized).into_response()
        }
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

pub async fn browse(state: State<Arc<AppState>>, q: Query<PathQuery>) -> Response {
    list_directory(state, q).await
}

pub async fn list_cache(State(state): State<Arc<AppState>>) -> Response {
    match state.cache().list().await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

#[derive(Debug, Serialize)]
pub struct CacheEntryDetail {
    pub summary: CacheEntrySummary,
    pub original: Option<String>,
    pub translated: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CacheEntryQuery {
    pub lang: Option<String>,
}

pub async fn get_cache_entry(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
    Query(q): Query<CacheEntryQuery>,
) -> Response {
    let cache = state.cache();
    let entries = match cache.list().await {
        Ok(entries) => entries,
        Err(e) => return kind_to_response(e.kind(), e.to_string()),
    };

    let summary = match entries.into_iter().find(|e| e.fingerprint == file_id) {
        Some(summary) => summary,
        None => {
            return kind_to_response(submute_core::ErrorKind::BadInput, format!("no cache entry for {file_id}"));
        }
    };

    let lang = match q.lang {
        Some(lang) => lang,
        None => state.target_language().await,
    };

    let original = cache.load_original(&file_id).await.unwrap_or(None);
    let translated = cache.load_translated(&file_id, &lang).await.unwrap_or(None);

    Json(CacheEntryDetail { summary, original, translated }).into_response()
}

pub async fn delete_cache_entry(State(state): State<Arc<AppState>>, Path(file_id): Path<String>) -> Response {
    match state.cache().delete(&file_id).await {
        Ok(()) => Json(serde_json::json!({ "deleted": file_id })).into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

#[derive(Debug, Serialize)]
pub struct LanguageResponse {
    pub target_language: String,
}

pub async fn get_language(State(state): State<Arc<AppState>>) -> Json<LanguageResponse> {
    Json(LanguageResponse { target_language: state.target_language().await })
}

#[derive(Debug, Deserialize)]
pub struct SetLanguageRequest {
    pub target_language: String,
}

pub async fn set_language(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetLanguageRequest>,
) -> Response {
    let update = SettingsUpdate { target_language: Some(body.target_language), ..Default::default() };
    match state.settings().update(update).await {
        Ok(sanitized) => Json(sanitized).into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

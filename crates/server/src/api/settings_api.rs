//! `GET/POST /api/settings`: the live, user-editable configuration
//! surface (catalog credentials, model provider, browse backend).

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use submute_core::{SanitizedSettings, SettingsUpdate};

use crate::api::error::kind_to_response;
use crate::state::AppState;

pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<SanitizedSettings> {
    Json(state.settings().sanitized().await)
}

/// Applies the update, persists it, then rebuilds the catalog/engine/VFS
/// stack so a freshly saved API key or provider switch takes effect on
/// the very next request -- no restart required.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> axum::response::Response {
    match state.settings().update(update).await {
        Ok(sanitized) => {
            state.refresh_runtime().await;
            Json(sanitized).into_response()
        }
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

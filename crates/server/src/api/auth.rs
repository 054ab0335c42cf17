//! `POST /api/v1/login` / `DELETE /api/v1/logout`.
//!
//! There is no account system behind this proxy -- it has exactly one
//! operator-configured identity (see spec: multi-tenant access control
//! is a non-goal). Login always succeeds and hands back an opaque
//! session token the client is expected to echo back, but nothing in
//! this server actually checks it; every route is reachable without it.
//! This exists purely so OpenSubtitles-REST-compatible clients that
//! insist on a login step before searching get one.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: String,
    pub base_url: String,
    pub token: String,
    pub status: u16,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> impl IntoResponse {
    let config = state.sanitized_config();
    Json(LoginResponse {
        user: body.username,
        base_url: format!("http://{}:{}", config.server.host, config.server.port),
        token: Uuid::new_v4().to_string(),
        status: 200,
    })
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub status: u16,
}

pub async fn logout() -> impl IntoResponse {
    Json(LogoutResponse { status: 200 })
}

//! Ollama model management for `/api/settings/ollama/*`. Talks directly
//! to the Ollama management API (`/api/tags`, `/api/pull`) -- distinct
//! from `submute_core::engine::llm::OllamaClient`, which only knows how
//! to call `/api/generate` for translation.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::api::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PullOutcome {
    Pulling,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct PullStatus {
    pub model: String,
    pub outcome: PullOutcome,
    pub message: Option<String>,
}

static PULL_STATE: Lazy<RwLock<Option<PullStatus>>> = Lazy::new(|| RwLock::new(None));

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

pub async fn list_models(State(state): State<Arc<AppState>>) -> Response {
    let base_url = state.settings().current().await.ollama_base_url;
    let client = reqwest::Client::new();

    let response = match client.get(format!("{base_url}/api/tags")).send().await {
        Ok(r) => r,
        Err(e) => {
            return (
                StatusCode::BAD_GATEWAY,
                Json(ApiError { error: format!("ollama unreachable at {base_url}: {e}") }),
            )
                .into_response();
        }
    };

    match response.json::<TagsResponse>().await {
        Ok(tags) => Json(ModelsResponse { models: tags.models.into_iter().map(|m| m.name).collect() })
            .into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ApiError { error: format!("unexpected response from ollama: {e}") }),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub model: String,
}

#[derive(Debug, Serialize)]
struct OllamaPullRequest<'a> {
    name: &'a str,
    stream: bool,
}

/// Kicks off a pull in the background and returns immediately; the
/// caller polls `/api/settings/ollama/pull/status` for completion, since
/// a full model pull can take many minutes.
pub async fn pull_model(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PullRequest>,
) -> Response {
    let base_url = state.settings().current().await.ollama_base_url;
    let model = body.model;

    {
        let mut guard = PULL_STATE.write().await;
        *guard = Some(PullStatus { model: model.clone(), outcome: PullOutcome::Pulling, message: None });
    }

    let pull_model_name = model.clone();
    tokio::spawn(async move {
        let client = reqwest::Client::new();
        let result = client
            .post(format!("{base_url}/api/pull"))
            .json(&OllamaPullRequest { name: &pull_model_name, stream: false })
            .send()
            .await;

        let mut guard = PULL_STATE.write().await;
        *guard = Some(match result {
            Ok(response) if response.status().is_success() => {
                PullStatus { model: pull_model_name, outcome: PullOutcome::Success, message: None }
            }
            Ok(response) => PullStatus {
                model: pull_model_name,
                outcome: PullOutcome::Error,
                message: Some(format!("ollama returned {}", response.status())),
            },
            Err(e) => PullStatus {
                model: pull_model_name,
                outcome: PullOutcome::Error,
                message: Some(e.to_string()),
            },
        });
    });

    (StatusCode::ACCEPTED, Json(serde_json::json!({ "model": model, "status": "pulling" }))).into_response()
}

pub async fn pull_status() -> Response {
    let guard = PULL_STATE.read().await;
    match &*guard {
        Some(status) => Json(status.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(ApiError { error: "no pull has been started".to_string() }))
            .into_response(),
    }
}

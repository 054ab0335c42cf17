//! OpenSubtitles-REST-compatible catalog proxy: search, download-grant,
//! the actual download-translate-cache flow, local subtitle upload, and
//! the static `/api/v1/infos/*` endpoints.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use submute_core::{CacheMetadata, SearchFilters, SubtitleFormat};
use uuid::Uuid;

use crate::api::error::kind_to_response;
use crate::state::AppState;

/// Query parameters accepted on `/api/v1/subtitles`. Only `query`,
/// `imdb_id`, `tmdb_id`, `moviehash`, and `page` are forwarded to the
/// catalog -- `parent_imdb_id`, `parent_tmdb_id`, `type`, and `languages`
/// are accepted for client compatibility but otherwise ignored, since the
/// only language this proxy ever searches upstream for is English.
#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<String>,
    #[serde(default)]
    pub parent_imdb_id: Option<String>,
    #[serde(default)]
    pub parent_tmdb_id: Option<String>,
    pub moviehash: Option<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub languages: Option<String>,
    pub page: Option<u32>,
}

pub async fn search_subtitles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let filters = SearchFilters {
        query: params.query,
        imdb_id: params.imdb_id,
        tmdb_id: params.tmdb_id,
        moviehash: params.moviehash,
        page: params.page.unwrap_or(1),
    };

    let target_lang = state.target_language().await;
    let service = state.subtitle_service().await;
    match service.proxy_search(filters, &target_lang).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub file_id: String,
    pub sub_format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DownloadGrantResponse {
    pub link: String,
    pub file_name: String,
    pub requests: u32,
    pub remaining: u32,
    pub message: String,
    pub reset_time: String,
    pub reset_time_utc: String,
}

/// Issues a link back to this server's own download endpoint. There is
/// no per-user quota to track (no accounts), so `requests`/`remaining`
/// are fixed placeholders and `reset_time*` mark the start of the
/// current day, mirroring the shape OpenSubtitles clients expect without
/// implementing a real rate-limit ledger.
pub async fn create_download_grant(
    State(_state): State<Arc<AppState>>,
    Json(body): Json<DownloadRequest>,
) -> Response {
    let format = body.sub_format.as_deref().unwrap_or("srt");
    let file_name = format!("subtitle_{}.{}", body.file_id, format);
    let reset = chrono::Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();

    Json(DownloadGrantResponse {
        link: format!("/api/v1/download/{}/{}", body.file_id, file_name),
        file_name,
        requests: 1,
        remaining: 1000,
        message: "OK".to_string(),
        reset_time: reset.to_rfc3339(),
        reset_time_utc: reset.to_rfc3339(),
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct DownloadFileQuery {
    pub format: Option<String>,
}

pub async fn download_subtitle(
    State(state): State<Arc<AppState>>,
    Path((file_id, file_name)): Path<(String, String)>,
    Query(params): Query<DownloadFileQuery>,
) -> Response {
    let format = match parse_format(params.format.as_deref(), &file_name) {
        Some(f) => f,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(crate::api::error::ApiError {
                    error: format!("unsupported subtitle format for {file_name}"),
                }),
            )
                .into_response();
        }
    };

    let target_lang = state.target_language().await;
    let service = state.subtitle_service().await;
    match service
        .proxy_download_and_translate(&file_id, format, Some(&file_name), &target_lang)
        .await
    {
        Ok((bytes, served_name)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, format.content_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{served_name}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

fn parse_format(explicit: Option<&str>, file_name: &str) -> Option<SubtitleFormat> {
    let token = explicit
        .map(str::to_string)
        .or_else(|| file_name.rsplit_once('.').map(|(_, ext)| ext.to_string()))
        .unwrap_or_else(|| "srt".to_string());

    match token.to_ascii_lowercase().as_str() {
        "srt" => Some(SubtitleFormat::Srt),
        "vtt" => Some(SubtitleFormat::Vtt),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub fingerprint: String,
    pub file_name: String,
}

/// Indexes a subtitle the user already has in the target language -- no
/// translation happens here, the upload is assumed to already be in the
/// language the uploader wants. Mirrors how a human contributes a
/// subtitle directly to OpenSubtitles instead of asking for a machine
/// translation of one.
pub async fn upload_subtitle(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let mut file_name: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(crate::api::error::ApiError {
                        error: format!("malformed multipart body: {e}"),
                    }),
                )
                    .into_response();
            }
        };

        match field.name() {
            Some("file_name") => {
                file_name = field.text().await.ok();
            }
            Some("file") | None => {
                let name = field.file_name().map(str::to_string).or_else(|| file_name.clone());
                if let Some(name) = name {
                    file_name.get_or_insert(name);
                }
                content = field.bytes().await.ok().map(|b| b.to_vec());
            }
            _ => {}
        }
    }

    let (content, file_name) = match (content, file_name) {
        (Some(content), Some(file_name)) => (content, file_name),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(crate::api::error::ApiError {
                    error: "upload requires a file part and a file name".to_string(),
                }),
            )
                .into_response();
        }
    };

    let text = String::from_utf8_lossy(&content).into_owned();
    let target_lang = state.target_language().await;
    let fingerprint = format!("upload_{}", Uuid::new_v4());
    let metadata = CacheMetadata {
        file_name: file_name.clone(),
        file_id: None,
        video_path: None,
        track_index: None,
    };

    match state
        .cache()
        .store(&fingerprint, None, &text, &target_lang, metadata)
        .await
    {
        Ok(()) => Json(UploadResponse { fingerprint, file_name }).into_response(),
        Err(e) => kind_to_response(e.kind(), e.to_string()),
    }
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub allowed_downloads: u32,
    pub level: String,
    pub user_id: u32,
    pub ext_installed: bool,
    pub vip: bool,
}

#[derive(Debug, Serialize)]
pub struct LanguageInfo {
    pub language_code: String,
    pub language_name: String,
}

#[derive(Debug, Serialize)]
pub struct FormatInfo {
    pub sub_formats: Vec<String>,
}

/// `GET /api/v1/infos/{user|languages|formats}`. There is no real account
/// system, so `user` reports a single unrestricted "account" and
/// `languages` lists only the target language currently configured --
/// translation is always into one language at a time, not a catalog of
/// every language the upstream understands.
pub async fn infos(State(state): State<Arc<AppState>>, Path(kind): Path<String>) -> Response {
    match kind.as_str() {
        "user" => Json(UserInfo {
            allowed_downloads: 1_000_000,
            level: "Proxy User".to_string(),
            user_id: 1,
            ext_installed: true,
            vip: true,
        })
        .into_response(),
        "languages" => {
            let target_lang = state.target_language().await;
            Json(vec![LanguageInfo {
                language_code: target_lang.clone(),
                language_name: target_lang,
            }])
            .into_response()
        }
        "formats" => Json(FormatInfo {
            sub_formats: vec!["srt".to_string(), "vtt".to_string()],
        })
        .into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(crate::api::error::ApiError {
                error: format!("unknown infos resource: {kind}"),
            }),
        )
            .into_response(),
    }
}

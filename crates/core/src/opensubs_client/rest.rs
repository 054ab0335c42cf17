use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use super::error::CatalogError;
use super::traits::OpenSubtitlesCatalog;
use super::types::{SearchFilters, SubtitlePage, SubtitleResult};

const DEFAULT_BASE_URL: &str = "https://api.opensubtitles.com/api/v1";

/// REST client for the OpenSubtitles catalog API. The bearer token from
/// `/login` is cached for the process lifetime and refreshed only on a
/// 401 response -- see DESIGN.md for why re-login-on-401 was chosen over
/// periodic refresh.
pub struct OpenSubtitlesClient {
    client: Client,
    base_url: String,
    api_key: String,
    username: String,
    password: String,
    token: RwLock<Option<String>>,
}

impl OpenSubtitlesClient {
    pub fn new(api_key: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Result<Self, CatalogError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "OpenSubtitles API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            username: username.into(),
            password: password.into(),
            token: RwLock::new(None),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn ensure_token(&self) -> Result<String, CatalogError> {
        if let Some(token) = self.token.read().await.clone() {
            return Ok(token);
        }
        self.login().await
    }

    async fn login(&self) -> Result<String, CatalogError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(CatalogError::NotConfigured(
                "OpenSubtitles username/password are required".to_string(),
            ));
        }

        #[derive(Serialize)]
        struct LoginRequest<'a> {
            username: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct LoginResponse {
            token: String,
        }

        let response = self
            .client
            .post(format!("{}/login", self.base_url))
            .header("Api-Key", &self.api_key)
            .header("content-type", "application/json")
            .json(&LoginRequest {
                username: &self.username,
                password: &self.password,
            })
            .send()
            .await?;

        map_status(&response)?;

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        *self.token.write().await = Some(body.token.clone());
        Ok(body.token)
    }

    async fn authorized_request(&self, build: impl Fn(&Client) -> reqwest::RequestBuilder) -> Result<reqwest::Response, CatalogError> {
        let token = self.ensure_token().await?;
        let response = build(&self.client)
            .header("Api-Key", &self.api_key)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?;

        if response.status().as_u16() == 401 {
            debug!("OpenSubtitles token expired, re-authenticating");
            *self.token.write().await = None;
            let fresh_token = self.login().await?;
            return Ok(build(&self.client)
                .header("Api-Key", &self.api_key)
                .header("Authorization", format!("Bearer {fresh_token}"))
                .send()
                .await?);
        }

        Ok(response)
    }
}

fn map_status(response: &reqwest::Response) -> Result<(), CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    match status.as_u16() {
        401 => Err(CatalogError::NotConfigured(
            "invalid OpenSubtitles credentials".to_string(),
        )),
        429 => Err(CatalogError::RateLimitExceeded),
        404 => Err(CatalogError::NotFound("resource not found".to_string())),
        code => Err(CatalogError::ApiError {
            status: code,
            message: status.canonical_reason().unwrap_or("unknown error").to_string(),
        }),
    }
}

#[derive(Deserialize)]
struct ApiSearchResponse {
    data: Vec<ApiSearchAttributesWrapper>,
    page: u32,
    total_pages: u32,
    total_count: u64,
}

#[derive(Deserialize)]
struct ApiSearchAttributesWrapper {
    id: String,
    attributes: ApiSearchAttributes,
}

#[derive(Deserialize)]
struct ApiSearchAttributes {
    language: String,
    release: Option<String>,
    download_count: u64,
    uploader: Option<ApiUploader>,
    files: Vec<ApiSubtitleFile>,
}

#[derive(Deserialize)]
struct ApiUploader {
    name: Option<String>,
}

#[derive(Deserialize)]
struct ApiSubtitleFile {
    file_id: u64,
    file_name: Option<String>,
}

fn flatten_search_entry(wrapper: ApiSearchAttributesWrapper) -> Vec<SubtitleResult> {
    let uploader = wrapper.attributes.uploader.and_then(|u| u.name);
    wrapper
        .attributes
        .files
        .into_iter()
        .map(|f| SubtitleResult {
            id: wrapper.id.clone(),
            file_id: f.file_id.to_string(),
            file_name: f.file_name.clone().unwrap_or_else(|| "subtitle.srt".to_string()),
            language: wrapper.attributes.language.clone(),
            release: wrapper.attributes.release.clone(),
            download_count: wrapper.attributes.download_count,
            uploader: uploader.clone(),
        })
        .collect()
}

#[derive(Serialize)]
struct ApiDownloadRequest {
    file_id: u64,
}

#[derive(Deserialize)]
struct ApiDownloadResponse {
    link: String,
    file_name: String,
}

#[async_trait]
impl OpenSubtitlesCatalog for OpenSubtitlesClient {
    async fn search(&self, filters: SearchFilters) -> Result<SubtitlePage, CatalogError> {
        let response = self
            .authorized_request(|client| {
                let mut request = client
                    .get(format!("{}/subtitles", self.base_url))
                    .query(&[("page", filters.page.max(1).to_string())]);
                if let Some(q) = &filters.query {
                    request = request.query(&[("query", q)]);
                }
                if let Some(imdb) = &filters.imdb_id {
                    request = request.query(&[("imdb_id", imdb)]);
                }
                if let Some(tmdb) = &filters.tmdb_id {
                    request = request.query(&[("tmdb_id", tmdb)]);
                }
                if let Some(hash) = &filters.moviehash {
                    request = request.query(&[("moviehash", hash)]);
                }
                request
            })
            .await?;

        map_status(&response)?;

        let body: ApiSearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        let data = body.data.into_iter().flat_map(flatten_search_entry).collect();

        Ok(SubtitlePage {
            data,
            page: body.page,
            total_pages: body.total_pages,
            total_count: body.total_count,
        })
    }

    async fn download(&self, file_id: &str) -> Result<(Vec<u8>, String), CatalogError> {
        let numeric_id: u64 = file_id
            .parse()
            .map_err(|_| CatalogError::NotFound(format!("invalid file id: {file_id}")))?;

        let response = self
            .authorized_request(|client| {
                client
                    .post(format!("{}/download", self.base_url))
                    .json(&ApiDownloadRequest { file_id: numeric_id })
            })
            .await?;

        map_status(&response)?;

        let grant: ApiDownloadResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        let file_response = self.client.get(&grant.link).send().await?;
        map_status(&file_response)?;
        let bytes = file_response.bytes().await?.to_vec();

        Ok((bytes, grant.file_name))
    }
}

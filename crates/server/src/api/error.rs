//! Shared mapping from component error kinds to HTTP responses.
//!
//! Every injected collaborator (catalog, engine, cache, vfs, demuxer,
//! settings, batch) classifies its errors into a small `ErrorKind` enum.
//! Handlers convert whatever concrete error they receive into this common
//! shape instead of hand-rolling a status code per call site.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use submute_core::ErrorKind;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

/// Converts any component `ErrorKind` plus a human-readable message into an
/// axum response with the appropriate status code.
pub fn kind_to_response(kind: ErrorKind, message: impl Into<String>) -> axum::response::Response {
    let status = match kind {
        ErrorKind::NotConfigured => StatusCode::BAD_REQUEST,
        ErrorKind::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        ErrorKind::BadInput => StatusCode::BAD_REQUEST,
        ErrorKind::Empty => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Busy => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiError { error: message.into() })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_configured_maps_to_bad_request() {
        let response = kind_to_response(ErrorKind::NotConfigured, "missing api key");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn busy_maps_to_conflict() {
        let response = kind_to_response(ErrorKind::Busy, "translation gate occupied");
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn upstream_unavailable_maps_to_bad_gateway() {
        let response = kind_to_response(ErrorKind::UpstreamUnavailable, "opensubtitles down");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}

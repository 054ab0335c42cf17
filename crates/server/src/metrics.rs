//! Prometheus metrics for observability.
//!
//! HTTP-layer metrics live here; translation/cache/batch metrics live in
//! `submute_core::metrics` and are folded into the same registry so
//! `/metrics` exposes one coherent text dump.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "submute_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("submute_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "submute_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    for metric in submute_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Refresh gauges that reflect current state rather than discrete events
/// -- gate occupancy and queue depth -- right before encoding.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let snapshot = state.progress().snapshot();
    let active = snapshot
        .iter()
        .filter(|j| j.status == submute_core::JobStatus::Active)
        .count();
    let pending = snapshot.len() - active;

    submute_core::metrics::GATE_OCCUPIED.set(if active > 0 { 1 } else { 0 });
    submute_core::metrics::GATE_PENDING.set(pending as i64);
}

/// Collapse path segments that vary per request (ids, hashes) into a
/// fixed placeholder so the `path` label doesn't explode cardinality.
pub fn normalize_path(path: &str) -> String {
    let uuid_re = regex::Regex::new(
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
    )
    .unwrap();
    let numeric_re = regex::Regex::new(r"/[0-9]+(/|$)").unwrap();

    let result = uuid_re.replace_all(path, "{id}");
    let result = numeric_re.replace_all(&result, "/{id}$1");
    result.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_path_replaces_uuid() {
        let path = "/api/v1/download/550e8400-e29b-41d4-a716-446655440000/movie.srt";
        assert_eq!(
            normalize_path(path),
            "/api/v1/download/{id}/movie.srt"
        );
    }

    #[test]
    fn normalize_path_replaces_numeric_id() {
        assert_eq!(normalize_path("/api/v1/download/42"), "/api/v1/download/{id}");
    }

    #[test]
    fn normalize_path_leaves_plain_paths_alone() {
        assert_eq!(normalize_path("/api/v1/subtitles"), "/api/v1/subtitles");
    }

    #[test]
    fn encode_metrics_contains_core_and_http_series() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/api/v1/subtitles", "200"])
            .inc();
        let output = encode_metrics();
        assert!(output.contains("submute_http_requests_total"));
        assert!(output.contains("submute_translation_gate_occupied"));
    }
}

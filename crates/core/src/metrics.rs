//! Process-wide Prometheus metrics for the translation core.
//!
//! Registered once by the server binary (`crates/server/src/metrics.rs`
//! composes these with its own HTTP-layer metrics) and updated from the
//! components that own the relevant state transition.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

/// Whether the translation gate is currently held (1) or free (0).
pub static GATE_OCCUPIED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "submute_translation_gate_occupied",
        "1 while the single-slot translation gate is held, 0 otherwise",
    )
    .unwrap()
});

/// Jobs currently waiting for the gate.
pub static GATE_PENDING: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "submute_translation_gate_pending",
        "Number of translation jobs waiting for the gate",
    )
    .unwrap()
});

/// Translation jobs that reached `Active`, by terminal outcome.
pub static TRANSLATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "submute_translations_total",
            "Translation jobs completed, by outcome",
        ),
        &["outcome"], // "completed", "failed"
    )
    .unwrap()
});

/// Wall-clock duration of a translation job from gate acquisition to
/// completion.
pub static TRANSLATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "submute_translation_duration_seconds",
            "Duration of a translation job while holding the gate",
        )
        .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 180.0, 600.0, 1800.0]),
        &["outcome"],
    )
    .unwrap()
});

/// Cue-level fallback rate: per-cue translations that fell back to the
/// original text because both the batch and the per-cue retry failed.
pub static CUES_KEPT_ORIGINAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "submute_cues_kept_original_total",
        "Cues whose translation was kept as the original English text",
    )
    .unwrap()
});

/// Cache lookups, by hit/miss.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("submute_cache_lookups_total", "Cache lookups by result"),
        &["result"], // "hit", "miss"
    )
    .unwrap()
});

/// Videos processed by the batch orchestrator, by outcome.
pub static BATCH_VIDEOS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "submute_batch_videos_total",
            "Batch videos processed, by outcome",
        ),
        &["outcome"], // "completed", "failed"
    )
    .unwrap()
});

/// Batches that reached a terminal status.
pub static BATCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("submute_batches_total", "Batches finished, by terminal status"),
        &["status"], // "completed", "failed", "cancelled"
    )
    .unwrap()
});

/// Calls to the configured LLM provider, by result.
pub static LLM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("submute_llm_requests_total", "LLM completion calls by result"),
        &["provider", "result"], // result: "ok", "error"
    )
    .unwrap()
});

/// LLM call latency.
pub static LLM_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "submute_llm_request_duration_seconds",
            "Duration of a single LLM completion call",
        )
        .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["provider"],
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(GATE_OCCUPIED.clone()),
        Box::new(GATE_PENDING.clone()),
        Box::new(TRANSLATIONS_TOTAL.clone()),
        Box::new(TRANSLATION_DURATION.clone()),
        Box::new(CUES_KEPT_ORIGINAL.clone()),
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(BATCH_VIDEOS_TOTAL.clone()),
        Box::new(BATCHES_TOTAL.clone()),
        Box::new(LLM_REQUESTS.clone()),
        Box::new(LLM_REQUEST_DURATION.clone()),
    ]
}

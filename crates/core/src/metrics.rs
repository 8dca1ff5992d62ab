//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Response cache (lookups by outcome, failed writes)
//! - Catalog API (requests by endpoint and status, latency)
//! - Controller (intents handled, stale responses dropped)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Cache Metrics
// =============================================================================

/// Cache lookups by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("moviedeck_cache_lookups_total", "Total response cache lookups"),
        &["result"], // "hit", "miss", "stale", "malformed"
    )
    .unwrap()
});

/// Cache writes that failed (quota or storage errors).
pub static CACHE_WRITE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "moviedeck_cache_write_failures_total",
        "Total cache writes that failed and were skipped",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Catalog API requests total.
pub static CATALOG_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "moviedeck_catalog_requests_total",
            "Total catalog API requests",
        ),
        &["endpoint", "status"], // status: "success", "error"
    )
    .unwrap()
});

/// Catalog API request duration.
pub static CATALOG_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "moviedeck_catalog_request_duration_seconds",
            "Duration of catalog API calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["endpoint"],
    )
    .unwrap()
});

// =============================================================================
// Controller Metrics
// =============================================================================

/// User intents handled, by intent.
pub static INTENTS_HANDLED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("moviedeck_intents_total", "Total user intents handled"),
        &["intent"],
    )
    .unwrap()
});

/// Responses dropped because a newer request for the same section was issued.
pub static STALE_RESPONSES_DROPPED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "moviedeck_stale_responses_dropped_total",
            "Responses discarded because they were superseded",
        ),
        &["section"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(CACHE_WRITE_FAILURES.clone()),
        Box::new(CATALOG_REQUESTS.clone()),
        Box::new(CATALOG_REQUEST_DURATION.clone()),
        Box::new(INTENTS_HANDLED.clone()),
        Box::new(STALE_RESPONSES_DROPPED.clone()),
    ]
}

//! Prometheus metrics for observability.
//!
//! This module provides the metrics registry for the corral server: HTTP
//! request counts plus the transfer/mover metrics defined in the core crate.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("corral_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP metrics");

    registry
        .register(Box::new(corral_core::metrics::TRANSFERS_STARTED.clone()))
        .expect("Failed to register transfer metrics");
    registry
        .register(Box::new(corral_core::metrics::TRANSFERS_SETTLED.clone()))
        .expect("Failed to register transfer metrics");
    registry
        .register(Box::new(corral_core::metrics::MOVE_JOBS_STARTED.clone()))
        .expect("Failed to register mover metrics");
    registry
        .register(Box::new(corral_core::metrics::MOVE_JOBS_SETTLED.clone()))
        .expect("Failed to register mover metrics");
    registry
        .register(Box::new(corral_core::metrics::COMPANIES_COPIED.clone()))
        .expect("Failed to register mover metrics");
}

/// Render the registry in the Prometheus text exposition format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&REGISTRY.gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

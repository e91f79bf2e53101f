//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Transfer coordinator (invocations, outcomes)
//! - Bulk move executor (jobs, copied memberships)
//!
//! The statics are registered into a registry by the server binary.

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

// =============================================================================
// Transfer coordinator metrics
// =============================================================================

/// Transfer invocations started.
pub static TRANSFERS_STARTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "corral_transfers_started_total",
        "Total transfer coordinator invocations",
    )
    .unwrap()
});

/// Settled transfer invocations by outcome.
pub static TRANSFERS_SETTLED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "corral_transfers_settled_total",
            "Settled transfer invocations",
        ),
        &["outcome"], // "succeeded", "failed", "cancelled"
    )
    .unwrap()
});

// =============================================================================
// Bulk move executor metrics
// =============================================================================

/// Bulk move jobs accepted by the executor.
pub static MOVE_JOBS_STARTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "corral_move_jobs_started_total",
        "Total bulk move jobs accepted",
    )
    .unwrap()
});

/// Bulk move jobs settled by outcome.
pub static MOVE_JOBS_SETTLED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("corral_move_jobs_settled_total", "Settled bulk move jobs"),
        &["outcome"], // "completed", "error"
    )
    .unwrap()
});

/// Company memberships copied into target collections.
pub static COMPANIES_COPIED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "corral_companies_copied_total",
        "Company memberships copied into target collections",
    )
    .unwrap()
});

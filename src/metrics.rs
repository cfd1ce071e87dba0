// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for elastic-sync.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host application is responsible for choosing the exporter
//! (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `elastic_sync_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `model`: model name
//! - `operation`: index, update, delete, search, define_indices
//! - `status`: success, skipped, error

use metrics::{counter, histogram};
use std::time::Duration;

/// Record a pipeline operation outcome
pub fn record_operation(model: &str, operation: &str, status: &str) {
    counter!(
        "elastic_sync_operations_total",
        "model" => model.to_string(),
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record operation latency
pub fn record_latency(operation: &str, duration: Duration) {
    histogram!(
        "elastic_sync_operation_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record the row count of one reindex page
pub fn record_page(model: &str, locale: &str, rows: usize) {
    histogram!(
        "elastic_sync_reindex_page_rows",
        "model" => model.to_string(),
        "locale" => locale.to_string()
    )
    .record(rows as f64);
}

/// Record a per-entry indexing failure during a bulk reindex
pub fn record_entry_failure(model: &str, operation: &str) {
    counter!(
        "elastic_sync_entry_failures_total",
        "model" => model.to_string(),
        "operation" => operation.to_string()
    )
    .increment(1);
}

// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; the binary installs the Prometheus recorder.

use metrics::describe_counter;

pub const MUTATIONS_TOTAL: &str = "dialdesk_mutations_total";
pub const QUERIES_TOTAL: &str = "dialdesk_queries_total";

/// Register metric descriptions. Called once after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        MUTATIONS_TOTAL,
        "Mutations attempted, labelled by operation and outcome"
    );
    describe_counter!(QUERIES_TOTAL, "Role-scoped queries served, by operation");
}

/// `outcome` is `ok` or the error kind (`validation`, `authorization`, ...).
pub fn record_mutation(operation: &'static str, outcome: &str) {
    metrics::counter!(MUTATIONS_TOTAL, "operation" => operation, "outcome" => outcome.to_string())
        .increment(1);
}

pub fn record_query(operation: &'static str) {
    metrics::counter!(QUERIES_TOTAL, "operation" => operation).increment(1);
}

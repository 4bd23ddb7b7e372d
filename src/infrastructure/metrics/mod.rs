//! Prometheus metrics for the notifier.
//!
//! - Invocation outcomes (sent, not handled, template not found, failed)
//! - Upstream request counts and latency for the template repository and
//!   the email provider

mod helpers;

pub use helpers::{encode_metrics, InvocationMetrics, UpstreamMetrics, UpstreamTimer};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "notifier";

lazy_static! {
    /// Completed invocations by outcome
    pub static ref INVOCATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_invocations_total", METRIC_PREFIX),
        "Completed pipeline invocations",
        &["outcome"]
    ).unwrap();

    /// Outbound requests by upstream and result
    pub static ref UPSTREAM_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_upstream_requests_total", METRIC_PREFIX),
        "Outbound requests to template repository and email provider",
        &["upstream", "result"]
    ).unwrap();

    /// Outbound request latency in seconds
    pub static ref UPSTREAM_REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        format!("{}_upstream_request_duration_seconds", METRIC_PREFIX),
        "Outbound request latency",
        &["upstream"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();
}

//! Metrics helper structs for convenient metric recording

use std::time::Instant;

use prometheus::{Encoder, TextEncoder};

use super::{INVOCATIONS_TOTAL, UPSTREAM_REQUESTS_TOTAL, UPSTREAM_REQUEST_DURATION};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording invocation outcomes
pub struct InvocationMetrics;

impl InvocationMetrics {
    pub fn record(outcome: &str) {
        INVOCATIONS_TOTAL.with_label_values(&[outcome]).inc();
    }
}

/// Helper struct for recording outbound request results
pub struct UpstreamMetrics;

impl UpstreamMetrics {
    pub fn record_success(upstream: &str) {
        UPSTREAM_REQUESTS_TOTAL
            .with_label_values(&[upstream, "success"])
            .inc();
    }

    pub fn record_failure(upstream: &str) {
        UPSTREAM_REQUESTS_TOTAL
            .with_label_values(&[upstream, "failure"])
            .inc();
    }

    pub fn record_latency(upstream: &str, latency_secs: f64) {
        UPSTREAM_REQUEST_DURATION
            .with_label_values(&[upstream])
            .observe(latency_secs);
    }
}

/// Measures one outbound request; call [`UpstreamTimer::finish`] with the result.
pub struct UpstreamTimer {
    upstream: &'static str,
    started: Instant,
}

impl UpstreamTimer {
    pub fn start(upstream: &'static str) -> Self {
        Self {
            upstream,
            started: Instant::now(),
        }
    }

    pub fn finish(self, success: bool) {
        UpstreamMetrics::record_latency(self.upstream, self.started.elapsed().as_secs_f64());
        if success {
            UpstreamMetrics::record_success(self.upstream);
        } else {
            UpstreamMetrics::record_failure(self.upstream);
        }
    }
}

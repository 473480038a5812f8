//! Metrics collection and exposition.
//!
//! # Metrics
//! - `pathwise_requests_total` (counter): requests by method, status
//! - `pathwise_request_duration_seconds` (histogram): latency distribution
//! - `pathwise_dispatch_total` (counter): dispatch outcome (matched, fallback, not_found)
//! - `pathwise_cache_lookups_total` (counter): page cache hits and misses
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Outcome of routing one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Matched,
    Fallback,
    NotFound,
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Matched => "matched",
            DispatchOutcome::Fallback => "fallback",
            DispatchOutcome::NotFound => "not_found",
        }
    }
}

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "pathwise_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("pathwise_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_dispatch(outcome: DispatchOutcome) {
    metrics::counter!("pathwise_dispatch_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!("pathwise_cache_lookups_total", "result" => result).increment(1);
}

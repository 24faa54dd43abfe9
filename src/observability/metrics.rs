//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_proxy_requests_total` (counter): relayed requests by method, status
//! - `gateway_proxy_request_duration_seconds` (histogram): time to upstream headers
//! - `gateway_proxy_failures_total` (counter): relay failures by stage
//! - `gateway_notifications_total` (counter): side-channel calls by outcome
//!
//! Recording without an installed exporter is a no-op, so library code
//! records unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_proxy_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_proxy_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// `stage` is `connect` (no upstream headers) or `stream` (body relay cut).
pub fn record_proxy_failure(stage: &'static str) {
    metrics::counter!("gateway_proxy_failures_total", "stage" => stage).increment(1);
}

pub fn record_notification(outcome: &'static str) {
    metrics::counter!("gateway_notifications_total", "outcome" => outcome).increment(1);
}

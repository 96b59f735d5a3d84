//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): relayed requests by method, status
//! - `gateway_request_duration_seconds` (histogram): relay latency
//!
//! A 502 status counts both synthesized envelopes and origin-returned 502s.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    if let Err(err) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::error!(error = %err, "failed to install metrics exporter");
    } else {
        tracing::info!(address = %addr, "metrics exporter listening");
    }
}

/// Record one relayed request.
pub fn record_relay(method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

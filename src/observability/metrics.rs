//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by route, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency by route
//! - `gateway_upstream_calls_total` (counter): backend calls by operation, outcome
//! - `gateway_upstream_duration_seconds` (histogram): backend call latency
//! - `gateway_resolution_steps_total` (counter): fallback steps by kind, source, outcome
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one inbound request.
pub fn record_request(route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "gateway_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("gateway_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a backend call that produced a response.
pub fn record_upstream_call(operation: &'static str, status: u16, start: Instant) {
    let outcome = if (200..300).contains(&status) { "success" } else { "error_status" };
    ::metrics::counter!(
        "gateway_upstream_calls_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!("gateway_upstream_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record a backend call that failed before a response arrived.
pub fn record_upstream_failure(operation: &'static str, start: Instant) {
    ::metrics::counter!(
        "gateway_upstream_calls_total",
        "operation" => operation,
        "outcome" => "transport_error"
    )
    .increment(1);
    ::metrics::histogram!("gateway_upstream_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record one step of an artifact fallback chain.
pub fn record_resolution_step(kind: &'static str, source: &'static str, outcome: &'static str) {
    ::metrics::counter!(
        "gateway_resolution_steps_total",
        "kind" => kind,
        "source" => source,
        "outcome" => outcome
    )
    .increment(1);
}

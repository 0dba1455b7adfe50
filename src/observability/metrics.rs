//! Metrics collection and exposition.
//!
//! # Metrics
//! - `portfolio_host_classifications_total` (counter): requests by host kind
//! - `portfolio_profile_resolutions_total` (counter): resolutions by outcome
//! - `portfolio_profile_resolution_seconds` (histogram): resolution latency
//! - `portfolio_catalog_operations_total` (counter): owner photo operations

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
///
/// Must run inside a Tokio runtime. Failure is logged, not fatal.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_host_class(kind: &'static str) {
    ::metrics::counter!("portfolio_host_classifications_total", "kind" => kind).increment(1);
}

pub fn record_resolution(outcome: &'static str, start: Instant) {
    ::metrics::counter!("portfolio_profile_resolutions_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("portfolio_profile_resolution_seconds")
        .record(start.elapsed().as_secs_f64());
}

pub fn record_catalog_op(operation: &'static str) {
    ::metrics::counter!("portfolio_catalog_operations_total", "operation" => operation)
        .increment(1);
}

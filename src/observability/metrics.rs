//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define router metrics (bindings, attach/detach activity, requests)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `router_bindings` (gauge): live bindings on the stack
//! - `router_attach_total` (counter): attaches by resource
//! - `router_attached_bindings_total` (counter): bindings committed by attach
//! - `router_detach_total` (counter): detaches by resource
//! - `router_detached_bindings_total` (counter): bindings removed by detach
//! - `router_requests_total` (counter): requests by method, status
//! - `router_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Labels for resource, method, status code

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn set_binding_count(count: usize) {
    gauge!("router_bindings").set(count as f64);
}

pub fn record_attach(resource: &str, bindings: usize) {
    counter!("router_attach_total", "resource" => resource.to_string()).increment(1);
    counter!("router_attached_bindings_total", "resource" => resource.to_string())
        .increment(bindings as u64);
}

pub fn record_detach(resource: &str, removed: usize) {
    counter!("router_detach_total", "resource" => resource.to_string()).increment(1);
    counter!("router_detached_bindings_total", "resource" => resource.to_string())
        .increment(removed as u64);
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    counter!("router_requests_total", &labels).increment(1);
    histogram!("router_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

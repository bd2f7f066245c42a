//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, route
//! - `gateway_request_duration_seconds` (histogram): latency by route
//!
//! Requests outside the route table (`/health`, unmatched paths) are labelled
//! with route `none`.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "gateway_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "gateway_request_duration_seconds";

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!(REQUESTS_TOTAL, "Requests handled by the gateway");
    describe_histogram!(REQUEST_DURATION_SECONDS, "Time spent handling a request, in seconds");

    tracing::info!(address = %addr, "Prometheus metrics endpoint started");
    Ok(())
}

pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string()
    )
    .increment(1);
    histogram!(REQUEST_DURATION_SECONDS, "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

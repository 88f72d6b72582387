//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define proxy and sitemap metrics
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `proxy_requests_total` (counter): forwarded requests by method, status
//! - `proxy_request_duration_seconds` (histogram): upstream latency
//! - `sitemap_observed_paths` (gauge): URLs currently in the registry
//! - `sitemap_paths_recorded_total` (counter): new URLs recorded
//! - `sitemap_documents_served_total` (counter): sitemap/robots responses
//! - `sitemap_rewrites_total` (counter): HTML rewrite attempts by outcome
//! - `sitemap_persist_total` (counter): sitemap file writes by result
//!
//! # Design Decisions
//! - Facade calls are no-ops until a recorder is installed, so library users
//!   and tests pay nothing

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("proxy_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_observed_path(registry_size: usize) {
    metrics::counter!("sitemap_paths_recorded_total").increment(1);
    metrics::gauge!("sitemap_observed_paths").set(registry_size as f64);
}

pub fn record_document_served(kind: &'static str) {
    metrics::counter!("sitemap_documents_served_total", "kind" => kind).increment(1);
}

pub fn record_rewrite(outcome: &'static str) {
    metrics::counter!("sitemap_rewrites_total", "outcome" => outcome).increment(1);
}

pub fn record_persist(result: &'static str) {
    metrics::counter!("sitemap_persist_total", "result" => result).increment(1);
}

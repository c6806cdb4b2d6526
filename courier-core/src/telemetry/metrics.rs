//! Prometheus metrics setup and metric definitions

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Histogram buckets (seconds) for HTTP latency.
/// Provider round-trips dominate, so the upper range reaches 10s.
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

fn builder() -> Result<PrometheusBuilder> {
    PrometheusBuilder::new()
        .set_buckets(LATENCY_BUCKETS)
        .context("failed to set histogram buckets")
}

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle> {
    builder()?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit initial zero values so Prometheus output
/// includes HELP/TYPE lines for all metrics from startup (not just after first use).
pub fn describe_metrics() {
    // HTTP metrics
    describe_counter!("courier_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "courier_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "courier_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    // Email metrics
    describe_counter!(
        "courier_emails_sent_total",
        "Emails handed to the provider, by dispatch outcome"
    );

    for outcome in ["success", "client_error", "server_error"] {
        counter!("courier_emails_sent_total", "outcome" => outcome).absolute(0);
    }
    gauge!("courier_http_requests_in_flight").set(0.0);
}

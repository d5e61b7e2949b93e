//! Prometheus metrics setup and metric definitions

use anyhow::Context;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Histogram buckets (seconds) for HTTP latency.
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .set_buckets(LATENCY_BUCKETS)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit initial zero values so Prometheus output
/// includes HELP/TYPE lines for all metrics from startup.
pub fn describe_metrics() {
    // HTTP metrics
    describe_counter!("basket_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "basket_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "basket_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    // Auth metrics
    describe_counter!("basket_auth_login_total", "Total number of login attempts");
    describe_counter!(
        "basket_auth_register_total",
        "Total number of registration attempts"
    );

    // Business metrics
    describe_counter!("basket_orders_created_total", "Total number of orders placed");
    describe_counter!(
        "basket_reviews_submitted_total",
        "Total number of product reviews accepted"
    );

    counter!("basket_auth_login_total", "result" => "success").absolute(0);
    counter!("basket_auth_login_total", "result" => "bad_password").absolute(0);
    counter!("basket_auth_register_total", "result" => "success").absolute(0);
    counter!("basket_orders_created_total").absolute(0);
    counter!("basket_reviews_submitted_total").absolute(0);
    gauge!("basket_http_requests_in_flight").set(0.0);
}

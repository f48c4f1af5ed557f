//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by service, method, route, status
//! - `http_request_duration_seconds` (histogram): handler latency
//! - `upstream_requests_total` (counter): gateway calls by upstream, outcome
//! - `upstream_request_duration_seconds` (histogram): upstream latency
//!
//! The Prometheus recorder is process-global; it is installed once and the
//! same handle backs every `/metrics` endpoint.

use std::sync::OnceLock;
use std::time::Duration;

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder (first call) and return its handle.
pub fn install_recorder() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let builder = match PrometheusBuilder::new()
                .set_buckets_for_metric(Matcher::Suffix("duration_seconds".to_string()), LATENCY_BUCKETS)
            {
                Ok(builder) => builder,
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid histogram buckets, using summaries");
                    PrometheusBuilder::new()
                }
            };

            let recorder = builder.build_recorder();
            let handle = recorder.handle();
            if let Err(e) = metrics::set_global_recorder(recorder) {
                tracing::warn!(error = %e, "A metrics recorder was already installed");
            }
            handle
        })
        .clone()
}

/// Record one handled HTTP request.
pub fn record_request(service: &'static str, method: &str, route: &str, status: u16, latency: Duration) {
    metrics::counter!(
        "http_requests_total",
        "service" => service,
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "http_request_duration_seconds",
        "service" => service,
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(latency.as_secs_f64());
}

/// Record one upstream call made by the gateway.
///
/// `outcome` is the upstream status code, or `"error"` when the call
/// never produced a response.
pub fn record_upstream(upstream: &'static str, outcome: &str, latency: Duration) {
    metrics::counter!(
        "upstream_requests_total",
        "upstream" => upstream,
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("upstream_request_duration_seconds", "upstream" => upstream)
        .record(latency.as_secs_f64());
}

//! Prometheus Metrics Definitions
//!
//! Defines all Prism metrics with their labels. Exposed on `/metrics` for
//! Prometheus scraping.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prism_core::{CheckMode, ConflictWarning};
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Global metrics instance - initialized once on first use
pub static METRICS: Lazy<ApiResult<PrismMetrics>> = Lazy::new(PrismMetrics::new);

/// Container for all Prism metrics.
#[derive(Clone)]
pub struct PrismMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Conflict checks - labels: mode, status
    pub conflict_checks_total: CounterVec,

    /// Emitted warnings - labels: rule, severity
    pub conflict_warnings_total: CounterVec,
}

impl PrismMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "prism_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_requests_total: {}", e)))?,

            http_request_duration_seconds: register_histogram_vec!(
                "prism_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_request_duration_seconds: {}", e)))?,

            conflict_checks_total: register_counter_vec!(
                "prism_conflict_checks_total",
                "Total number of conflict checks",
                &["mode", "status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register conflict_checks_total: {}", e)))?,

            conflict_warnings_total: register_counter_vec!(
                "prism_conflict_warnings_total",
                "Total number of conflict warnings emitted",
                &["rule", "severity"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register conflict_warnings_total: {}", e)))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record a finished conflict check and the warnings it produced.
    ///
    /// `status` is the check status (`complete`/`partial`) or `rejected` for
    /// input that never reached the evaluator.
    pub fn record_check(&self, mode: CheckMode, status: &str, warnings: &[ConflictWarning]) {
        self.conflict_checks_total
            .with_label_values(&[mode.as_str(), status])
            .inc();
        for warning in warnings {
            self.conflict_warnings_total
                .with_label_values(&[warning.rule_id(), warning.severity.as_str()])
                .inc();
        }
    }
}

/// Run `f` against the global metrics, if they registered.
pub fn with_metrics<F: FnOnce(&PrismMetrics)>(f: F) {
    match METRICS.as_ref() {
        Ok(metrics) => f(metrics),
        Err(e) => tracing::warn!(error = %e, "Metrics unavailable"),
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
))]
pub async fn metrics_handler() -> impl IntoResponse {
    // Make sure the Prism collectors exist before the first scrape.
    let _ = Lazy::force(&METRICS);

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}

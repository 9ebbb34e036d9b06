//! Prism Telemetry - Observability Infrastructure
//!
//! Structured logging through `tracing-subscriber` and Prometheus metrics
//! for the API layer. Nothing here needs an external collector.

pub mod metrics;
pub mod middleware;
pub mod subscriber;

pub use metrics::{metrics_handler, with_metrics, PrismMetrics, METRICS};
pub use middleware::observability_middleware;
pub use subscriber::{init_tracing, LogFormat, TelemetryConfig, DEFAULT_FILTER};

//! Prism API - REST Layer for the Conflict Engine
//!
//! Exposes the workspace and task-intent checks over HTTP with Axum, plus
//! health probes, Prometheus metrics and an OpenAPI document.

pub mod config;
pub mod error;
pub mod extractors;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::{engine_config_from_env, engine_config_from_lookup, ApiConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use extractors::TeamId;
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::{create_api_router, CHECK_ID_HEADER, CHECK_STATUS_HEADER};
pub use state::AppState;

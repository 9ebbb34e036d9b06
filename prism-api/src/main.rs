//! Prism API Server Entry Point
//!
//! Loads configuration, builds the rule registry and starts the Axum HTTP
//! server. Configuration errors stop the process before it binds.

use axum::Router;
use prism_api::telemetry::{init_tracing, TelemetryConfig};
use prism_api::{create_api_router, engine_config_from_env, ApiConfig, ApiError, ApiResult, AppState};
use prism_conflict::ConflictSession;

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::from_env()?;
    init_tracing(&telemetry_config)?;

    let api_config = ApiConfig::from_env()?;
    let engine_config = engine_config_from_env()?;

    let session = ConflictSession::from_global(engine_config)?;
    tracing::info!(
        rules = ?session.evaluator().registry().ids(),
        failure_policy = ?session.evaluator().config().failure_policy,
        disabled = ?session.evaluator().config().disabled_rules,
        "Conflict engine ready"
    );

    let app: Router = create_api_router(AppState::new(session), &api_config);

    let addr = api_config.bind_addr()?;
    tracing::info!(%addr, "Starting Prism API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

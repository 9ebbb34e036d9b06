//! Conflict Check REST API Routes
//!
//! - POST /check   - ambient workspace check, returns the warning list
//! - POST /analyze - task-intent check, returns the full report
//! - GET  /rules   - registered rules, their modes and enablement

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use prism_conflict::ConflictSession;
use prism_core::{
    ChangeContext, CheckMode, CheckStatus, ConflictReport, ConflictWarning, PrismResult,
    TaskIntent,
};
use serde::{Deserialize, Serialize};
use tracing::info_span;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::extractors::TeamId;
use crate::state::AppState;
use crate::telemetry::with_metrics;

/// Response header carrying `complete` or `partial`.
pub const CHECK_STATUS_HEADER: &str = "x-prism-check-status";

/// Response header carrying the UUIDv7 of the check.
pub const CHECK_ID_HEADER: &str = "x-prism-check-id";

// ============================================================================
// TYPES
// ============================================================================

/// A registered rule as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RuleInfo {
    pub id: String,
    pub modes: Vec<CheckMode>,
    pub enabled: bool,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Check the live workspace state for conflicts.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/conflicts/check",
    tag = "Conflicts",
    request_body = ChangeContext,
    params(
        ("x-team-id" = Option<String>, Header, description = "Caller team, logged only"),
    ),
    responses(
        (status = 200, description = "Warnings in rule order", body = Vec<ConflictWarning>,
            headers(
                ("x-prism-check-status" = String, description = "complete or partial"),
                ("x-prism-check-id" = String, description = "Check identifier"),
            )),
        (status = 400, description = "Malformed or invalid context", body = ApiError),
    ),
))]
pub async fn check_conflicts(
    State(session): State<Arc<ConflictSession>>,
    team: TeamId,
    payload: Result<Json<ChangeContext>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let check_id = Uuid::now_v7();
    let span = info_span!(
        "conflict_check",
        mode = %CheckMode::Workspace,
        team_id = %team,
        check_id = %check_id,
    );

    let outcome = span.in_scope(|| {
        let Json(ctx) = reject_body(CheckMode::Workspace, payload)?;
        let outcome = finish(CheckMode::Workspace, session.check_conflicts(&ctx))?;
        with_metrics(|m| {
            m.record_check(CheckMode::Workspace, outcome.status.as_str(), &outcome.warnings)
        });
        tracing::info!(
            warnings = outcome.warnings.len(),
            status = %outcome.status,
            files = ctx.modified_files.len(),
            "Workspace check completed"
        );
        Ok::<_, ApiError>(outcome)
    })?;

    Ok((
        StatusCode::OK,
        response_headers(outcome.status, check_id),
        Json(outcome.warnings),
    ))
}

/// Check a declared task against the files it will touch.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/conflicts/analyze",
    tag = "Conflicts",
    request_body = TaskIntent,
    params(
        ("x-team-id" = Option<String>, Header, description = "Caller team, logged only"),
    ),
    responses(
        (status = 200, description = "Conflict report", body = ConflictReport),
        (status = 400, description = "Malformed or invalid task", body = ApiError),
    ),
))]
pub async fn analyze_task(
    State(session): State<Arc<ConflictSession>>,
    team: TeamId,
    payload: Result<Json<TaskIntent>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let check_id = Uuid::now_v7();
    let span = info_span!(
        "conflict_check",
        mode = %CheckMode::TaskIntent,
        team_id = %team,
        check_id = %check_id,
    );

    let report = span.in_scope(|| {
        let Json(intent) = reject_body(CheckMode::TaskIntent, payload)?;
        let report: ConflictReport = finish(CheckMode::TaskIntent, session.analyze(&intent))?;
        with_metrics(|m| {
            m.record_check(CheckMode::TaskIntent, report.status.as_str(), &report.warnings)
        });
        tracing::info!(
            warnings = report.warnings.len(),
            can_proceed = report.can_proceed,
            status = %report.status,
            "Task analysis completed"
        );
        Ok::<_, ApiError>(report)
    })?;

    Ok((
        StatusCode::OK,
        response_headers(report.status, check_id),
        Json(report),
    ))
}

/// List registered rules in evaluation order.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/conflicts/rules",
    tag = "Conflicts",
    responses(
        (status = 200, description = "Registered rules", body = Vec<RuleInfo>),
    ),
))]
pub async fn list_rules(State(session): State<Arc<ConflictSession>>) -> impl IntoResponse {
    let evaluator = session.evaluator();
    let rules: Vec<RuleInfo> = evaluator
        .registry()
        .all()
        .iter()
        .map(|rule| RuleInfo {
            id: rule.id().to_string(),
            modes: rule.modes().modes(),
            enabled: !evaluator.config().is_disabled(rule.id()),
        })
        .collect();
    Json(rules)
}

// ============================================================================
// HELPERS
// ============================================================================

fn reject_body<T>(
    mode: CheckMode,
    payload: Result<Json<T>, JsonRejection>,
) -> ApiResult<Json<T>> {
    payload.map_err(|rejection| {
        with_metrics(|m| m.record_check(mode, "rejected", &[]));
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::from(rejection)
    })
}

fn finish<T>(mode: CheckMode, result: PrismResult<T>) -> ApiResult<T> {
    result.map_err(|err| {
        with_metrics(|m| m.record_check(mode, "rejected", &[]));
        tracing::debug!(error = %err, "Rejected change context");
        ApiError::from(err)
    })
}

fn response_headers(status: CheckStatus, check_id: Uuid) -> [(&'static str, String); 2] {
    [
        (CHECK_STATUS_HEADER, status.as_str().to_string()),
        (CHECK_ID_HEADER, check_id.to_string()),
    ]
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the conflict routes router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/check", post(check_conflicts))
        .route("/analyze", post(analyze_task))
        .route("/rules", get(list_rules))
}

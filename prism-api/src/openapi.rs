//! OpenAPI Specification for Prism API
//!
//! Generated with utoipa from the route annotations and the schema derives
//! on the prism-core types.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::conflict::{self, RuleInfo};
use crate::routes::health::{self, HealthDetails, HealthResponse, HealthStatus};
use crate::telemetry::metrics;

use prism_core::{
    ChangeContext, CheckMode, CheckStatus, ConflictKind, ConflictReport, ConflictWarning,
    RuleDiagnostic, Severity, TaskIntent,
};

/// OpenAPI document for Prism API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Prism API",
        description = "Heuristic conflict analysis for team workspaces and declared tasks",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Conflicts", description = "Workspace and task-intent conflict checks"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Observability", description = "Prometheus metrics"),
    ),
    paths(
        conflict::check_conflicts,
        conflict::analyze_task,
        conflict::list_rules,
        health::ping,
        health::liveness,
        health::readiness,
        metrics::metrics_handler,
    ),
    components(schemas(
        ChangeContext,
        TaskIntent,
        ConflictWarning,
        ConflictReport,
        RuleDiagnostic,
        ConflictKind,
        Severity,
        CheckMode,
        CheckStatus,
        RuleInfo,
        HealthResponse,
        HealthStatus,
        HealthDetails,
        ApiError,
        ErrorCode,
    ))
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Pretty-printed OpenAPI JSON.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}

//! Built-in conflict heuristics.
//!
//! Registered in this order by [`crate::RuleRegistry::builtin`]; the order is
//! the order their warnings appear in a report.

use prism_core::{ChangeContext, CheckModes, ConflictKind, Severity};

use crate::rule::{Finding, Rule, RuleError};

pub const AUTH_FILE_OVERLAP: &str = "auth-file-overlap";
pub const PACKAGE_MANIFEST_CHANGE: &str = "package-manifest-change";
pub const DATABASE_SCHEMA_CHANGE: &str = "database-schema-change";
pub const PRODUCTION_DEPLOY_INTENT: &str = "production-deploy-intent";

/// Source extensions that count as application code for the auth heuristic.
const SCRIPT_EXTENSIONS: [&str; 3] = [".js", ".ts", ".tsx"];

const MANIFEST_NAME: &str = "package.json";

// ============================================================================
// AUTH FILE OVERLAP
// ============================================================================

/// Script files are being edited for an auth-related task.
///
/// Only meaningful against live workspace state, so it does not take part in
/// task-intent checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthFileOverlap;

impl Rule for AuthFileOverlap {
    fn id(&self) -> &str {
        AUTH_FILE_OVERLAP
    }

    fn modes(&self) -> CheckModes {
        CheckModes::WORKSPACE
    }

    fn evaluate(&self, ctx: &ChangeContext) -> Result<Vec<Finding>, RuleError> {
        if ctx.modified_files.is_empty() {
            return Ok(Vec::new());
        }

        let touches_scripts = ctx
            .modified_files
            .iter()
            .any(|f| SCRIPT_EXTENSIONS.iter().any(|ext| f.ends_with(ext)));
        if !touches_scripts || !ctx.description_mentions("auth") {
            return Ok(Vec::new());
        }

        Ok(vec![Finding::new(
            ConflictKind::FileConflict,
            Severity::Medium,
            "Another team member is working on authentication-related files",
        )
        .with_files(ctx.files_matching(|f| f.contains("auth")))
        .with_suggested_action(
            "Coordinate with team member working on user authentication before proceeding",
        )])
    }
}

// ============================================================================
// PACKAGE MANIFEST CHANGE
// ============================================================================

/// A package manifest is part of the change.
///
/// The warning names the manifest generically rather than echoing the matched
/// paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageManifestChange;

impl Rule for PackageManifestChange {
    fn id(&self) -> &str {
        PACKAGE_MANIFEST_CHANGE
    }

    fn evaluate(&self, ctx: &ChangeContext) -> Result<Vec<Finding>, RuleError> {
        if !ctx.modified_files.iter().any(|f| f.contains(MANIFEST_NAME)) {
            return Ok(Vec::new());
        }

        Ok(vec![Finding::new(
            ConflictKind::DependencyConflict,
            Severity::High,
            "Package.json changes may conflict with ongoing dependency updates",
        )
        .with_files(vec![MANIFEST_NAME.to_string()])
        .with_suggested_action("Check with team before modifying dependencies")])
    }
}

// ============================================================================
// DATABASE SCHEMA CHANGE
// ============================================================================

const SCHEMA_KEYWORDS: [&str; 2] = ["database", "migration"];

/// Schema or migration work, detected from file paths or the task description.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseSchemaChange;

impl Rule for DatabaseSchemaChange {
    fn id(&self) -> &str {
        DATABASE_SCHEMA_CHANGE
    }

    fn evaluate(&self, ctx: &ChangeContext) -> Result<Vec<Finding>, RuleError> {
        let path_hit = ctx
            .modified_files
            .iter()
            .any(|f| SCHEMA_KEYWORDS.iter().any(|k| f.contains(k)));
        if !path_hit && !ctx.description_mentions_any(&SCHEMA_KEYWORDS) {
            return Ok(Vec::new());
        }

        Ok(vec![Finding::new(
            ConflictKind::FileConflict,
            Severity::High,
            "Database schema changes detected",
        )
        .with_files(ctx.files_matching(|f| f.contains("database")))
        .with_suggested_action("Coordinate database changes with team to avoid migration conflicts")])
    }
}

// ============================================================================
// PRODUCTION DEPLOY INTENT
// ============================================================================

const DEPLOY_KEYWORDS: [&str; 2] = ["deploy", "production"];

/// The task is a production deployment.
#[derive(Debug, Clone)]
pub struct ProductionDeployIntent {
    follow_ups: Vec<String>,
}

impl Default for ProductionDeployIntent {
    fn default() -> Self {
        Self {
            follow_ups: vec![
                "Consider creating a deployment checklist".to_string(),
                "Notify team in chat before proceeding".to_string(),
            ],
        }
    }
}

impl Rule for ProductionDeployIntent {
    fn id(&self) -> &str {
        PRODUCTION_DEPLOY_INTENT
    }

    fn follow_ups(&self) -> &[String] {
        &self.follow_ups
    }

    fn evaluate(&self, ctx: &ChangeContext) -> Result<Vec<Finding>, RuleError> {
        if !ctx.description_mentions_any(&DEPLOY_KEYWORDS) {
            return Ok(Vec::new());
        }

        Ok(vec![Finding::new(
            ConflictKind::MergeConflict,
            Severity::Medium,
            "Production deployment task detected",
        )
        .with_suggested_action("Ensure all team members are aware of production deployment")])
    }
}

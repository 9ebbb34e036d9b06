//! Canonical conflict scenarios, run through the public session API.

use prism_conflict::builtin::{
    AUTH_FILE_OVERLAP, PACKAGE_MANIFEST_CHANGE, PRODUCTION_DEPLOY_INTENT,
};
use prism_conflict::{ConflictSession, RuleRegistry};
use prism_core::{
    ChangeContext, CheckMode, ConflictKind, ConflictReport, EngineConfig, PrismResult, Severity,
};
use prism_test_utils::assertions::{assert_report_invariants, assert_warning_shape};
use prism_test_utils::fixtures::{self, Scenario};
use std::sync::Arc;

fn session() -> PrismResult<ConflictSession> {
    let registry = Arc::new(RuleRegistry::builtin()?);
    ConflictSession::with_registry(registry, EngineConfig::default())
}

fn run(session: &ConflictSession, scenario: &Scenario) -> PrismResult<ConflictReport> {
    match scenario.mode {
        CheckMode::Workspace => {
            let outcome = session.check_conflicts(&scenario.context)?;
            // Rebuild the verdict the way a caller of the workspace check would.
            Ok(ConflictReport {
                can_proceed: !outcome.has_blocking(),
                suggestions: if outcome.warnings.is_empty() {
                    ConflictReport::all_clear().suggestions
                } else {
                    vec![]
                },
                warnings: outcome.warnings,
                status: outcome.status,
                diagnostics: outcome.diagnostics,
            })
        }
        CheckMode::TaskIntent => session.analyze_task_conflicts(
            &scenario.context.task_description,
            &scenario.context.modified_files,
        ),
    }
}

#[test]
fn test_all_scenarios() -> PrismResult<()> {
    let session = session()?;
    for scenario in fixtures::all_scenarios() {
        let report = run(&session, &scenario)?;
        assert_warning_shape(&report.warnings, &scenario.expected);
        assert_eq!(
            report.can_proceed, scenario.can_proceed,
            "verdict for {}",
            scenario.name
        );
        assert_report_invariants(&report, &scenario.context.modified_files);
    }
    Ok(())
}

#[test]
fn test_auth_refactor_echoes_auth_paths() -> PrismResult<()> {
    let scenario = fixtures::auth_refactor();
    let outcome = session()?.check_conflicts(&scenario.context)?;
    assert_eq!(outcome.warnings[0].files, vec!["src/auth/login.ts"]);
    assert_eq!(outcome.warnings[0].id, format!("{}-1", AUTH_FILE_OVERLAP));
    Ok(())
}

#[test]
fn test_production_deploy_follow_ups() -> PrismResult<()> {
    let report = session()?.analyze_task_conflicts("Deploy to production", &[])?;
    assert!(report.can_proceed);
    assert!(report
        .suggestions
        .contains(&"Consider creating a deployment checklist".to_string()));
    assert!(report
        .suggestions
        .contains(&"Notify team in chat before proceeding".to_string()));
    Ok(())
}

#[test]
fn test_migration_script_blocks() -> PrismResult<()> {
    let files = vec!["scripts/migrate.sql".to_string()];
    let report = session()?.analyze_task_conflicts("Run database migration script", &files)?;
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, ConflictKind::FileConflict);
    assert_eq!(report.warnings[0].severity, Severity::High);
    assert!(!report.can_proceed);
    Ok(())
}

#[test]
fn test_empty_files_gate_auth_rule() -> PrismResult<()> {
    let ctx = ChangeContext::new().with_task_description("auth auth auth");
    let outcome = session()?.check_conflicts(&ctx)?;
    assert!(outcome.is_clean());
    Ok(())
}

#[test]
fn test_combined_cross_mode_boundary() -> PrismResult<()> {
    let session = session()?;
    let description = "deploy auth changes to production";
    let files = vec!["package.json".to_string(), "src/auth/session.ts".to_string()];

    let task = session.analyze_task_conflicts(description, &files)?;
    let task_rules: Vec<&str> = task.warnings.iter().map(|w| w.rule_id()).collect();
    assert_eq!(task_rules, vec![PACKAGE_MANIFEST_CHANGE, PRODUCTION_DEPLOY_INTENT]);

    let ctx = ChangeContext::new()
        .with_modified_files(files)
        .with_task_description(description);
    let workspace = session.check_conflicts(&ctx)?;
    let workspace_rules: Vec<&str> = workspace.warnings.iter().map(|w| w.rule_id()).collect();
    assert_eq!(
        workspace_rules,
        vec![AUTH_FILE_OVERLAP, PACKAGE_MANIFEST_CHANGE, PRODUCTION_DEPLOY_INTENT]
    );
    Ok(())
}

#[test]
fn test_wire_format_of_report() -> Result<(), Box<dyn std::error::Error>> {
    let report = session()?.analyze_task_conflicts("bump", &["package.json".to_string()])?;
    let value = serde_json::to_value(&report)?;
    assert_eq!(value["canProceed"], false);
    assert_eq!(value["warnings"][0]["type"], "dependency-conflict");
    assert_eq!(value["warnings"][0]["files"], serde_json::json!(["package.json"]));
    assert_eq!(value["status"], "complete");
    Ok(())
}

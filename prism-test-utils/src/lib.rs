//! Prism Test Utilities
//!
//! Shared test infrastructure for the Prism workspace:
//! - Proptest generators for change contexts and report types
//! - Fixtures for the canonical conflict scenarios
//! - Assertions for report invariants and error variants

// Re-export core types for convenience
pub use prism_core::{
    ChangeContext, CheckMode, CheckStatus, ConfigurationError, ConflictKind, ConflictReport,
    ConflictWarning, EngineConfig, FailurePolicy, InputError, PrismError, PrismResult, Severity,
    TaskIntent, ALL_CLEAR_SUGGESTIONS, PARTIAL_CHECK_SUGGESTION,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for Prism inputs.

    use super::*;
    use proptest::prelude::*;

    /// A single path segment, never empty.
    pub fn arb_segment() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,9}"
    }

    /// Arbitrary relative path with one of a handful of extensions.
    pub fn arb_file_path() -> impl Strategy<Value = String> {
        (
            prop::collection::vec(arb_segment(), 1..4),
            prop::sample::select(vec![".ts", ".tsx", ".js", ".rs", ".sql", ".md", ".json", ""]),
        )
            .prop_map(|(segments, ext)| format!("{}{}", segments.join("/"), ext))
    }

    /// Paths that trip at least one built-in rule keyword.
    pub fn arb_sensitive_path() -> impl Strategy<Value = String> {
        prop::sample::select(vec![
            "package.json",
            "web/package.json",
            "src/auth/login.ts",
            "src/auth/session.tsx",
            "src/database/schema.sql",
            "db/migrations/001_init.sql",
        ])
        .prop_map(str::to_string)
    }

    /// Mix of ordinary and sensitive paths.
    pub fn arb_any_path() -> impl Strategy<Value = String> {
        prop_oneof![3 => arb_file_path(), 1 => arb_sensitive_path()]
    }

    /// File lists without duplicates, in generated order.
    pub fn arb_file_list(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(arb_any_path(), 0..=max).prop_map(|files| {
            let mut seen = std::collections::HashSet::new();
            files.into_iter().filter(|f| seen.insert(f.clone())).collect()
        })
    }

    /// Free-text description, sometimes containing rule keywords.
    pub fn arb_description() -> impl Strategy<Value = String> {
        let keyword = prop::sample::select(vec![
            "", "auth", "Auth", "deploy", "PRODUCTION", "database", "migration", "refactor",
        ]);
        ("[A-Za-z ]{0,20}", keyword, "[A-Za-z ]{0,20}")
            .prop_map(|(head, keyword, tail)| format!("{}{}{}", head, keyword, tail))
    }

    pub fn arb_branch() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["main", "develop", "feature/user-auth", "fix/db_pool", ""])
            .prop_map(str::to_string)
    }

    pub fn arb_change_context() -> impl Strategy<Value = ChangeContext> {
        (
            "(/[a-z]{1,8}){0,3}",
            arb_file_list(8),
            arb_branch(),
            arb_description(),
        )
            .prop_map(|(root, files, branch, description)| {
                let current = files.first().cloned().unwrap_or_default();
                ChangeContext::new()
                    .with_workspace_root(root)
                    .with_current_file(current)
                    .with_modified_files(files)
                    .with_active_branch(branch)
                    .with_task_description(description)
            })
    }

    pub fn arb_task_intent() -> impl Strategy<Value = TaskIntent> {
        (arb_description(), arb_file_list(8))
            .prop_map(|(description, files)| TaskIntent::new(description, files))
    }

    pub fn arb_check_mode() -> impl Strategy<Value = CheckMode> {
        prop_oneof![Just(CheckMode::Workspace), Just(CheckMode::TaskIntent)]
    }

    pub fn arb_severity() -> impl Strategy<Value = Severity> {
        prop_oneof![Just(Severity::Low), Just(Severity::Medium), Just(Severity::High)]
    }

    pub fn arb_conflict_kind() -> impl Strategy<Value = ConflictKind> {
        prop_oneof![
            Just(ConflictKind::FileConflict),
            Just(ConflictKind::DependencyConflict),
            Just(ConflictKind::MergeConflict),
        ]
    }

    pub fn arb_failure_policy() -> impl Strategy<Value = FailurePolicy> {
        prop_oneof![Just(FailurePolicy::FailOpen), Just(FailurePolicy::FailClosed)]
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Canonical conflict scenarios.

    use super::*;

    /// One scenario: input, mode, and the expected outcome.
    #[derive(Debug, Clone)]
    pub struct Scenario {
        pub name: &'static str,
        pub context: ChangeContext,
        pub mode: CheckMode,
        /// Expected `(kind, severity)` per warning, in order
        pub expected: Vec<(ConflictKind, Severity)>,
        pub can_proceed: bool,
    }

    fn files(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    pub fn auth_refactor() -> Scenario {
        Scenario {
            name: "auth refactor",
            context: ChangeContext::new()
                .with_modified_files(files(&["src/auth/login.ts", "src/ui/button.tsx"]))
                .with_task_description("Refactor auth flow"),
            mode: CheckMode::Workspace,
            expected: vec![(ConflictKind::FileConflict, Severity::Medium)],
            can_proceed: true,
        }
    }

    pub fn manifest_edit() -> Scenario {
        Scenario {
            name: "manifest edit",
            context: ChangeContext::new().with_modified_files(files(&["package.json"])),
            mode: CheckMode::Workspace,
            expected: vec![(ConflictKind::DependencyConflict, Severity::High)],
            can_proceed: false,
        }
    }

    pub fn production_deploy() -> Scenario {
        Scenario {
            name: "production deploy",
            context: ChangeContext::for_task("Deploy to production", vec![]),
            mode: CheckMode::TaskIntent,
            expected: vec![(ConflictKind::MergeConflict, Severity::Medium)],
            can_proceed: true,
        }
    }

    pub fn migration_script() -> Scenario {
        Scenario {
            name: "migration script",
            context: ChangeContext::for_task(
                "Run database migration script",
                files(&["scripts/migrate.sql"]),
            ),
            mode: CheckMode::TaskIntent,
            expected: vec![(ConflictKind::FileConflict, Severity::High)],
            can_proceed: false,
        }
    }

    pub fn nothing_touched() -> Scenario {
        Scenario {
            name: "nothing touched",
            context: ChangeContext::new().with_task_description("anything"),
            mode: CheckMode::Workspace,
            expected: vec![],
            can_proceed: true,
        }
    }

    /// Auth files in a task-intent check: the auth rule stays out.
    pub fn combined_task_intent() -> Scenario {
        Scenario {
            name: "combined task intent",
            context: ChangeContext::for_task(
                "deploy auth changes to production",
                files(&["package.json", "src/auth/session.ts"]),
            ),
            mode: CheckMode::TaskIntent,
            expected: vec![
                (ConflictKind::DependencyConflict, Severity::High),
                (ConflictKind::MergeConflict, Severity::Medium),
            ],
            can_proceed: false,
        }
    }

    /// Same input as [`combined_task_intent`], checked against the workspace.
    pub fn combined_workspace() -> Scenario {
        Scenario {
            mode: CheckMode::Workspace,
            name: "combined workspace",
            expected: vec![
                (ConflictKind::FileConflict, Severity::Medium),
                (ConflictKind::DependencyConflict, Severity::High),
                (ConflictKind::MergeConflict, Severity::Medium),
            ],
            ..combined_task_intent()
        }
    }

    pub fn all_scenarios() -> Vec<Scenario> {
        vec![
            auth_refactor(),
            manifest_edit(),
            production_deploy(),
            migration_script(),
            nothing_touched(),
            combined_task_intent(),
            combined_workspace(),
        ]
    }

    /// A change context as the editor client would post it.
    pub fn context_json() -> serde_json::Value {
        serde_json::json!({
            "workspaceRoot": "/home/dev/shop",
            "currentFile": "src/auth/login.ts",
            "modifiedFiles": ["src/auth/login.ts", "package.json"],
            "activeBranch": "feature/user-auth",
            "taskDescription": "user auth"
        })
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for Prism-specific validation.

    use super::*;
    use std::collections::HashSet;

    /// Assert the invariants every report must satisfy, whatever the input.
    #[track_caller]
    pub fn assert_report_invariants(report: &ConflictReport, input_files: &[String]) {
        let any_high = report.warnings.iter().any(|w| w.severity == Severity::High);
        if report.diagnostics.is_empty() {
            assert_eq!(
                report.can_proceed, !any_high,
                "canProceed must be false exactly when a high warning exists"
            );
            assert_eq!(report.status, CheckStatus::Complete);
        } else {
            assert_eq!(report.status, CheckStatus::Partial);
        }
        if any_high {
            assert!(!report.can_proceed, "high warning must block");
        }

        if report.diagnostics.is_empty() {
            if report.warnings.is_empty() {
                assert_eq!(report.suggestions, ALL_CLEAR_SUGGESTIONS.to_vec());
            }
        } else {
            assert!(
                report.suggestions.iter().any(|s| s == PARTIAL_CHECK_SUGGESTION),
                "partial report must say some checks did not run"
            );
            assert!(
                !report.suggestions.iter().any(|s| ALL_CLEAR_SUGGESTIONS.contains(&s.as_str())),
                "partial report must not claim an all-clear"
            );
        }

        assert_unique_ids(&report.warnings);
        assert_files_are_ordered_subsets(&report.warnings, input_files);
    }

    #[track_caller]
    pub fn assert_unique_ids(warnings: &[ConflictWarning]) {
        let mut seen = HashSet::new();
        for w in warnings {
            assert!(seen.insert(w.id.as_str()), "duplicate warning id {}", w.id);
        }
    }

    /// Each warning's files appear in the input, in input order. The literal
    /// package manifest name is exempt.
    #[track_caller]
    pub fn assert_files_are_ordered_subsets(warnings: &[ConflictWarning], input_files: &[String]) {
        for w in warnings {
            if w.files == ["package.json"] {
                continue;
            }
            let mut cursor = 0;
            for file in &w.files {
                match input_files[cursor..].iter().position(|f| f == file) {
                    Some(offset) => cursor += offset + 1,
                    None => panic!("warning {} lists {} out of input order", w.id, file),
                }
            }
        }
    }

    /// Assert that warnings match the expected `(kind, severity)` sequence.
    #[track_caller]
    pub fn assert_warning_shape(warnings: &[ConflictWarning], expected: &[(ConflictKind, Severity)]) {
        let actual: Vec<(ConflictKind, Severity)> =
            warnings.iter().map(|w| (w.kind, w.severity)).collect();
        assert_eq!(actual, expected);
    }

    /// Assert that a PrismResult is an Input error.
    #[track_caller]
    pub fn assert_input_error<T: std::fmt::Debug>(result: &PrismResult<T>) {
        match result {
            Err(PrismError::Input(_)) => {}
            other => panic!("Expected Input error, got: {:?}", other),
        }
    }

    /// Assert that a PrismResult is a Configuration error.
    #[track_caller]
    pub fn assert_config_error<T: std::fmt::Debug>(result: &PrismResult<T>) {
        match result {
            Err(PrismError::Configuration(_)) => {}
            other => panic!("Expected Configuration error, got: {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::assertions::*;
    use super::fixtures::*;
    use super::generators::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scenarios_are_distinct() {
        let names: std::collections::HashSet<&str> =
            all_scenarios().iter().map(|s| s.name).collect();
        assert_eq!(names.len(), all_scenarios().len());
    }

    #[test]
    fn test_context_json_parses() {
        let ctx = ChangeContext::from_json(context_json());
        assert!(matches!(ctx, Ok(c) if c.modified_files.len() == 2));
    }

    #[test]
    fn test_all_clear_satisfies_invariants() {
        assert_report_invariants(&ConflictReport::all_clear(), &[]);
    }

    #[test]
    #[should_panic]
    fn test_out_of_order_files_detected() {
        let warning = ConflictWarning {
            id: "x-1".to_string(),
            kind: ConflictKind::FileConflict,
            severity: Severity::Low,
            message: String::new(),
            files: vec!["b".to_string(), "a".to_string()],
            suggested_action: String::new(),
        };
        assert_files_are_ordered_subsets(&[warning], &["a".to_string(), "b".to_string()]);
    }

    proptest! {
        #[test]
        fn prop_file_lists_are_unique_and_non_empty(files in arb_file_list(12)) {
            let unique: std::collections::HashSet<&String> = files.iter().collect();
            prop_assert_eq!(unique.len(), files.len());
            prop_assert!(files.iter().all(|f| !f.trim().is_empty()));
        }

        #[test]
        fn prop_generated_contexts_validate(ctx in arb_change_context()) {
            prop_assert!(ctx.validate(prism_core::DEFAULT_MAX_FILES).is_ok());
        }
    }
}

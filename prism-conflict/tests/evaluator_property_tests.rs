//! Property-Based Tests for the Conflict Evaluator
//!
//! Properties:
//! - Evaluation is deterministic, down to the serialized bytes
//! - Re-registering a rule id is rejected and leaves outcomes unchanged
//! - Adding a high-severity path never turns a blocked verdict into a pass
//! - Empty input yields the all-clear report
//! - Warning file lists preserve input order

use prism_conflict::{ConflictEvaluator, ConflictSession, FnRule, Finding, RuleError, RuleRegistry};
use prism_core::{ChangeContext, CheckMode, EngineConfig, PrismError};
use prism_test_utils::assertions::assert_report_invariants;
use prism_test_utils::generators::*;
use prism_test_utils::ConflictReport;
use proptest::prelude::*;
use std::sync::Arc;

fn builtin_evaluator() -> ConflictEvaluator {
    let registry = match RuleRegistry::builtin() {
        Ok(registry) => Arc::new(registry),
        Err(e) => panic!("builtin registry: {}", e),
    };
    match ConflictEvaluator::new(registry, EngineConfig::default()) {
        Ok(evaluator) => evaluator,
        Err(e) => panic!("evaluator: {}", e),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_evaluation_is_deterministic(ctx in arb_change_context(), mode in arb_check_mode()) {
        let evaluator = builtin_evaluator();
        let first = evaluator.evaluate(&ctx, mode);
        let second = evaluator.evaluate(&ctx, mode);
        prop_assert_eq!(&first, &second);

        let first_bytes = serde_json::to_vec(&first).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let second_bytes = serde_json::to_vec(&second).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(first_bytes, second_bytes);
    }

    #[test]
    fn prop_reports_satisfy_invariants(ctx in arb_change_context(), mode in arb_check_mode()) {
        let report = builtin_evaluator().evaluate(&ctx, mode);
        assert_report_invariants(&report, &ctx.modified_files);
    }

    #[test]
    fn prop_duplicate_registration_is_inert(ctx in arb_change_context(), mode in arb_check_mode()) {
        let mut registry = RuleRegistry::builtin().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let ids: Vec<String> = registry.ids().iter().map(|id| id.to_string()).collect();
        for id in ids {
            let again = registry.register(FnRule::new(
                id,
                |_: &ChangeContext| -> Result<Vec<Finding>, RuleError> { Ok(vec![]) },
            ));
            prop_assert!(again.is_err());
        }
        let evaluator = ConflictEvaluator::new(Arc::new(registry), EngineConfig::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(evaluator.evaluate(&ctx, mode), builtin_evaluator().evaluate(&ctx, mode));
    }

    #[test]
    fn prop_manifest_path_blocks_monotonically(ctx in arb_change_context(), mode in arb_check_mode()) {
        let evaluator = builtin_evaluator();
        let before = evaluator.evaluate(&ctx, mode);

        let mut files = ctx.modified_files.clone();
        if !files.iter().any(|f| f == "package.json") {
            files.push("package.json".to_string());
        }
        let widened = ctx.clone().with_modified_files(files);
        let after = evaluator.evaluate(&widened, mode);

        prop_assert!(!after.can_proceed);
        prop_assert!(after.highest_severity() >= before.highest_severity());
    }

    #[test]
    fn prop_warning_files_keep_input_order(files in arb_file_list(10), description in arb_description()) {
        let ctx = ChangeContext::new()
            .with_modified_files(files.clone())
            .with_task_description(description);
        let report = builtin_evaluator().evaluate(&ctx, CheckMode::Workspace);
        for warning in &report.warnings {
            if warning.files == ["package.json"] {
                continue;
            }
            let positions: Vec<usize> = warning
                .files
                .iter()
                .filter_map(|f| files.iter().position(|g| g == f))
                .collect();
            prop_assert_eq!(positions.len(), warning.files.len());
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn prop_task_intent_matches_synthesized_context(intent in arb_task_intent()) {
        let session = ConflictSession::new(builtin_evaluator());
        let via_session = session
            .analyze_task_conflicts(&intent.task_description, &intent.files)
            .map_err(|e: PrismError| TestCaseError::fail(e.to_string()))?;
        let direct = builtin_evaluator().evaluate(&intent.to_context(), CheckMode::TaskIntent);
        prop_assert_eq!(via_session, direct);
    }
}

#[test]
fn test_empty_input_all_clear_in_both_modes() {
    let evaluator = builtin_evaluator();
    for mode in [CheckMode::Workspace, CheckMode::TaskIntent] {
        assert_eq!(evaluator.evaluate(&ChangeContext::new(), mode), ConflictReport::all_clear());
    }
}

//! Conflict evaluator
//!
//! Runs the applicable rules of a registry against a change context and folds
//! their findings into a [`ConflictReport`].

use prism_core::{
    ChangeContext, CheckMode, CheckStatus, ConfigurationError, ConflictReport, ConflictWarning,
    EngineConfig, EvaluationError, FailurePolicy, PrismResult, RuleDiagnostic,
    ALL_CLEAR_SUGGESTIONS, PARTIAL_CHECK_SUGGESTION,
};
use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::registry::RuleRegistry;
use crate::rule::Rule;

/// Evaluates change contexts against a fixed rule set.
///
/// Cheap to clone and safe to share between threads; evaluation takes no
/// locks and performs no I/O.
#[derive(Debug, Clone)]
pub struct ConflictEvaluator {
    registry: Arc<RuleRegistry>,
    config: EngineConfig,
}

impl ConflictEvaluator {
    /// Build an evaluator, rejecting configs that are invalid or that disable
    /// rules the registry does not contain.
    pub fn new(registry: Arc<RuleRegistry>, config: EngineConfig) -> PrismResult<Self> {
        config.validate()?;
        if let Some(unknown) = config
            .disabled_rules
            .iter()
            .find(|id| !registry.contains(id.as_str()))
        {
            return Err(ConfigurationError::UnknownRule {
                id: unknown.clone(),
            }
            .into());
        }

        Ok(Self { registry, config })
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether `rule` takes part in checks of the given mode.
    pub fn applies(&self, rule: &dyn Rule, mode: CheckMode) -> bool {
        rule.modes().includes(mode) && !self.config.is_disabled(rule.id())
    }

    /// Evaluate `ctx` in the given mode.
    ///
    /// Never fails: a rule that errors or panics contributes no warnings and
    /// leaves a diagnostic on a `partial` report instead.
    pub fn evaluate(&self, ctx: &ChangeContext, mode: CheckMode) -> ConflictReport {
        let mut warnings = Vec::new();
        let mut suggestions = Vec::new();
        let mut diagnostics = Vec::new();

        for rule in self.registry.all() {
            if !self.applies(rule.as_ref(), mode) {
                continue;
            }

            let findings = match run_rule(rule.as_ref(), ctx) {
                Ok(findings) => findings,
                Err(err) => {
                    tracing::warn!(
                        rule_id = %err.rule_id(),
                        mode = %mode,
                        error = %err,
                        "Conflict rule failed, skipping"
                    );
                    diagnostics.push(RuleDiagnostic::from(&err));
                    continue;
                }
            };
            if findings.is_empty() {
                continue;
            }

            tracing::debug!(
                rule_id = %rule.id(),
                mode = %mode,
                count = findings.len(),
                "Conflict rule fired"
            );

            for (ordinal, finding) in findings.into_iter().enumerate() {
                warnings.push(ConflictWarning {
                    id: format!("{}-{}", rule.id(), ordinal + 1),
                    kind: finding.kind,
                    severity: finding.severity,
                    message: finding.message,
                    files: finding.files,
                    suggested_action: finding.suggested_action,
                });
            }
            suggestions.extend(rule.follow_ups().iter().cloned());
        }

        // "Nothing found" only counts when every applicable rule ran.
        if !diagnostics.is_empty() {
            suggestions.push(PARTIAL_CHECK_SUGGESTION.to_string());
        } else if warnings.is_empty() {
            suggestions = ALL_CLEAR_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
        }

        let status = if diagnostics.is_empty() {
            CheckStatus::Complete
        } else {
            CheckStatus::Partial
        };
        let blocked_by_failure =
            self.config.failure_policy == FailurePolicy::FailClosed && !diagnostics.is_empty();
        let can_proceed = !warnings.iter().any(ConflictWarning::is_blocking) && !blocked_by_failure;

        ConflictReport {
            can_proceed,
            warnings,
            suggestions,
            status,
            diagnostics,
        }
    }

    /// Number of warnings per rule id in a report, in first-seen order.
    pub fn tally(report: &ConflictReport) -> Vec<(String, usize)> {
        let mut order = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for warning in &report.warnings {
            let rule_id = warning.rule_id();
            let count = counts.entry(rule_id).or_insert(0);
            if *count == 0 {
                order.push(rule_id);
            }
            *count += 1;
        }
        order
            .into_iter()
            .map(|id| (id.to_string(), counts.get(id).copied().unwrap_or(0)))
            .collect()
    }
}

/// Run one rule, turning errors and panics into an [`EvaluationError`].
fn run_rule(
    rule: &dyn Rule,
    ctx: &ChangeContext,
) -> Result<Vec<crate::rule::Finding>, EvaluationError> {
    match catch_unwind(AssertUnwindSafe(|| rule.evaluate(ctx))) {
        Ok(Ok(findings)) => Ok(findings),
        Ok(Err(err)) => Err(EvaluationError::RuleFailed {
            rule_id: rule.id().to_string(),
            reason: err.to_string(),
        }),
        Err(payload) => Err(EvaluationError::RulePanicked {
            rule_id: rule.id().to_string(),
            reason: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{PACKAGE_MANIFEST_CHANGE, PRODUCTION_DEPLOY_INTENT};
    use crate::rule::{FnRule, Finding, RuleError};
    use prism_core::{ConflictKind, PrismError, Severity};

    fn builtin_evaluator(config: EngineConfig) -> ConflictEvaluator {
        let registry = match RuleRegistry::builtin() {
            Ok(r) => Arc::new(r),
            Err(e) => panic!("builtin registry: {}", e),
        };
        match ConflictEvaluator::new(registry, config) {
            Ok(e) => e,
            Err(e) => panic!("evaluator: {}", e),
        }
    }

    fn registry_with_failures() -> Arc<RuleRegistry> {
        let mut registry = RuleRegistry::new();
        let results = [
            registry.register(FnRule::new(
                "always-low",
                |_: &ChangeContext| -> Result<Vec<Finding>, RuleError> {
                    Ok(vec![Finding::new(ConflictKind::FileConflict, Severity::Low, "low")])
                },
            )),
            registry.register(FnRule::new(
                "broken",
                |_: &ChangeContext| -> Result<Vec<Finding>, RuleError> {
                    Err(RuleError::new("index unavailable"))
                },
            )),
            registry.register(FnRule::new(
                "panicky",
                |_: &ChangeContext| -> Result<Vec<Finding>, RuleError> { panic!("boom") },
            )),
        ];
        assert!(results.iter().all(Result::is_ok));
        Arc::new(registry)
    }

    #[test]
    fn test_empty_context_is_all_clear() {
        let evaluator = builtin_evaluator(EngineConfig::default());
        for mode in [CheckMode::Workspace, CheckMode::TaskIntent] {
            let report = evaluator.evaluate(&ChangeContext::new(), mode);
            assert_eq!(report, ConflictReport::all_clear());
        }
    }

    #[test]
    fn test_high_warning_blocks() {
        let evaluator = builtin_evaluator(EngineConfig::default());
        let ctx = ChangeContext::new().with_modified_files(["package.json"]);
        let report = evaluator.evaluate(&ctx, CheckMode::Workspace);
        assert!(!report.can_proceed);
        assert_eq!(report.warnings[0].id, "package-manifest-change-1");
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn test_follow_ups_collected() {
        let evaluator = builtin_evaluator(EngineConfig::default());
        let ctx = ChangeContext::new().with_task_description("deploy the thing");
        let report = evaluator.evaluate(&ctx, CheckMode::TaskIntent);
        assert!(report.can_proceed);
        assert_eq!(
            report.suggestions,
            vec![
                "Consider creating a deployment checklist",
                "Notify team in chat before proceeding"
            ]
        );
    }

    #[test]
    fn test_disabled_rule_skipped() -> Result<(), PrismError> {
        let registry = Arc::new(RuleRegistry::builtin()?);
        let evaluator = ConflictEvaluator::new(
            registry,
            EngineConfig::default().with_disabled_rules([PACKAGE_MANIFEST_CHANGE]),
        )?;
        let ctx = ChangeContext::new().with_modified_files(["package.json"]);
        assert_eq!(
            evaluator.evaluate(&ctx, CheckMode::Workspace),
            ConflictReport::all_clear()
        );
        Ok(())
    }

    #[test]
    fn test_unknown_disabled_rule_rejected() -> Result<(), ConfigurationError> {
        let registry = Arc::new(RuleRegistry::builtin()?);
        let result = ConflictEvaluator::new(
            registry,
            EngineConfig::default().with_disabled_rules(["no-such-rule"]),
        );
        assert!(matches!(
            result,
            Err(PrismError::Configuration(ConfigurationError::UnknownRule { id })) if id == "no-such-rule"
        ));
        Ok(())
    }

    #[test]
    fn test_failing_rules_fail_open() -> Result<(), PrismError> {
        let evaluator = ConflictEvaluator::new(registry_with_failures(), EngineConfig::default())?;
        let report = evaluator.evaluate(&ChangeContext::new(), CheckMode::Workspace);

        assert!(report.can_proceed);
        assert_eq!(report.status, CheckStatus::Partial);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].id, "always-low-1");
        let failed: Vec<&str> = report.diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
        assert_eq!(failed, vec!["broken", "panicky"]);
        assert!(report.diagnostics[1].message.contains("boom"));
        Ok(())
    }

    #[test]
    fn test_failing_rules_fail_closed() -> Result<(), PrismError> {
        let evaluator = ConflictEvaluator::new(
            registry_with_failures(),
            EngineConfig::default().with_failure_policy(FailurePolicy::FailClosed),
        )?;
        let report = evaluator.evaluate(&ChangeContext::new(), CheckMode::Workspace);
        assert!(!report.can_proceed);
        assert!(report.is_partial());
        Ok(())
    }

    fn registry_with_only_broken_rule() -> Result<Arc<RuleRegistry>, ConfigurationError> {
        let mut registry = RuleRegistry::new();
        registry.register(FnRule::new(
            "broken",
            |_: &ChangeContext| -> Result<Vec<Finding>, RuleError> {
                Err(RuleError::new("index unavailable"))
            },
        ))?;
        Ok(Arc::new(registry))
    }

    #[test]
    fn test_blocked_report_is_not_all_clear() -> Result<(), PrismError> {
        let evaluator = ConflictEvaluator::new(
            registry_with_only_broken_rule()?,
            EngineConfig::default().with_failure_policy(FailurePolicy::FailClosed),
        )?;
        let report = evaluator.evaluate(&ChangeContext::new(), CheckMode::TaskIntent);

        assert!(!report.can_proceed);
        assert_eq!(report.status, CheckStatus::Partial);
        assert!(report.warnings.is_empty());
        assert_eq!(report.suggestions, vec![PARTIAL_CHECK_SUGGESTION]);
        Ok(())
    }

    #[test]
    fn test_partial_report_without_warnings_is_not_all_clear() -> Result<(), PrismError> {
        let evaluator =
            ConflictEvaluator::new(registry_with_only_broken_rule()?, EngineConfig::default())?;
        let report = evaluator.evaluate(&ChangeContext::new(), CheckMode::Workspace);

        assert!(report.can_proceed);
        assert!(report.is_partial());
        assert!(!report
            .suggestions
            .iter()
            .any(|s| ALL_CLEAR_SUGGESTIONS.contains(&s.as_str())));
        assert_eq!(report.suggestions, vec![PARTIAL_CHECK_SUGGESTION]);
        Ok(())
    }

    #[test]
    fn test_ordinals_count_per_rule() -> Result<(), PrismError> {
        let mut registry = RuleRegistry::new();
        registry.register(FnRule::new(
            "per-file",
            |ctx: &ChangeContext| -> Result<Vec<Finding>, RuleError> {
                Ok(ctx
                    .modified_files
                    .iter()
                    .map(|f| {
                        Finding::new(ConflictKind::FileConflict, Severity::Low, "touched")
                            .with_files(vec![f.clone()])
                    })
                    .collect())
            },
        ))?;
        let evaluator = ConflictEvaluator::new(Arc::new(registry), EngineConfig::default())?;
        let ctx = ChangeContext::new().with_modified_files(["a", "b", "c"]);
        let report = evaluator.evaluate(&ctx, CheckMode::Workspace);
        let ids: Vec<&str> = report.warnings.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["per-file-1", "per-file-2", "per-file-3"]);
        assert_eq!(
            ConflictEvaluator::tally(&report),
            vec![("per-file".to_string(), 3)]
        );
        Ok(())
    }

    #[test]
    fn test_mode_filtering() {
        let evaluator = builtin_evaluator(EngineConfig::default());
        let ctx = ChangeContext::new()
            .with_modified_files(["src/auth/session.ts"])
            .with_task_description("auth production fix");

        let workspace = evaluator.evaluate(&ctx, CheckMode::Workspace);
        let task = evaluator.evaluate(&ctx, CheckMode::TaskIntent);
        assert_eq!(workspace.warnings.len(), 2);
        assert_eq!(task.warnings.len(), 1);
        assert_eq!(task.warnings[0].rule_id(), PRODUCTION_DEPLOY_INTENT);
    }
}

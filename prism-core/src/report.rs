//! Conflict warnings and evaluation results

use crate::{CheckStatus, ConflictKind, EvaluationError, Severity};
use serde::{Deserialize, Serialize};

/// Suggestions attached to a report with no warnings.
pub const ALL_CLEAR_SUGGESTIONS: [&str; 2] = [
    "No conflicts detected — safe to proceed",
    "Consider updating your task status to in-progress",
];

/// Suggestion attached to a report in which at least one rule failed to run.
pub const PARTIAL_CHECK_SUGGESTION: &str =
    "Some conflict checks could not run; review the diagnostics before proceeding";

/// One triggered rule instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ConflictWarning {
    /// `<rule-id>-<ordinal>`, unique within one evaluation
    pub id: String,
    /// Conflict category (wire name `type`)
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub severity: Severity,
    /// Human-readable summary
    pub message: String,
    /// Input files that triggered the warning
    pub files: Vec<String>,
    /// Human-readable remediation
    pub suggested_action: String,
}

impl ConflictWarning {
    /// Whether this warning blocks proceeding.
    pub fn is_blocking(&self) -> bool {
        self.severity.blocks()
    }

    /// Id of the rule that emitted this warning.
    pub fn rule_id(&self) -> &str {
        self.id
            .rsplit_once('-')
            .map(|(rule, _)| rule)
            .unwrap_or(&self.id)
    }
}

/// A rule that failed during one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RuleDiagnostic {
    pub rule_id: String,
    pub message: String,
}

impl From<&EvaluationError> for RuleDiagnostic {
    fn from(err: &EvaluationError) -> Self {
        Self {
            rule_id: err.rule_id().to_string(),
            message: err.to_string(),
        }
    }
}

/// Full output of an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    /// False when any warning is high severity
    pub can_proceed: bool,
    /// Warnings in rule registration order
    pub warnings: Vec<ConflictWarning>,
    pub suggestions: Vec<String>,
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<RuleDiagnostic>,
}

impl ConflictReport {
    /// Report for an evaluation in which nothing fired.
    pub fn all_clear() -> Self {
        Self {
            can_proceed: true,
            warnings: Vec::new(),
            suggestions: ALL_CLEAR_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            status: CheckStatus::Complete,
            diagnostics: Vec::new(),
        }
    }

    /// Highest severity among the warnings, if any.
    pub fn highest_severity(&self) -> Option<Severity> {
        self.warnings.iter().map(|w| w.severity).max()
    }

    /// Warnings that block proceeding.
    pub fn blocking_warnings(&self) -> Vec<&ConflictWarning> {
        self.warnings.iter().filter(|w| w.is_blocking()).collect()
    }

    /// Warnings of a specific kind.
    pub fn warnings_of_kind(&self, kind: ConflictKind) -> Vec<&ConflictWarning> {
        self.warnings.iter().filter(|w| w.kind == kind).collect()
    }

    /// Whether any rule failed during evaluation.
    pub fn is_partial(&self) -> bool {
        self.status == CheckStatus::Partial
    }
}

/// Result of an ambient workspace check: warnings plus whether the check ran
/// fully, so "nothing found" never hides "could not check".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub warnings: Vec<ConflictWarning>,
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<RuleDiagnostic>,
}

impl CheckOutcome {
    /// No warnings and every rule ran.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.status == CheckStatus::Complete
    }

    pub fn has_blocking(&self) -> bool {
        self.warnings.iter().any(ConflictWarning::is_blocking)
    }
}

impl From<ConflictReport> for CheckOutcome {
    fn from(report: ConflictReport) -> Self {
        Self {
            warnings: report.warnings,
            status: report.status,
            diagnostics: report.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(id: &str, severity: Severity, kind: ConflictKind) -> ConflictWarning {
        ConflictWarning {
            id: id.to_string(),
            kind,
            severity,
            message: "msg".to_string(),
            files: vec![],
            suggested_action: "act".to_string(),
        }
    }

    #[test]
    fn test_warning_wire_format() -> Result<(), serde_json::Error> {
        let w = warning(
            "package-manifest-change-1",
            Severity::High,
            ConflictKind::DependencyConflict,
        );
        let value = serde_json::to_value(&w)?;
        assert_eq!(value["type"], "dependency-conflict");
        assert_eq!(value["severity"], "high");
        assert_eq!(value["suggestedAction"], "act");
        assert!(value.get("kind").is_none());
        Ok(())
    }

    #[test]
    fn test_rule_id_from_warning_id() {
        let w = warning("auth-file-overlap-2", Severity::Medium, ConflictKind::FileConflict);
        assert_eq!(w.rule_id(), "auth-file-overlap");
    }

    #[test]
    fn test_all_clear_report() {
        let report = ConflictReport::all_clear();
        assert!(report.can_proceed);
        assert!(report.warnings.is_empty());
        assert_eq!(report.suggestions, ALL_CLEAR_SUGGESTIONS.to_vec());
        assert_eq!(report.highest_severity(), None);
    }

    #[test]
    fn test_report_queries() {
        let report = ConflictReport {
            can_proceed: false,
            warnings: vec![
                warning("a-1", Severity::Medium, ConflictKind::FileConflict),
                warning("b-1", Severity::High, ConflictKind::DependencyConflict),
            ],
            suggestions: vec![],
            status: CheckStatus::Complete,
            diagnostics: vec![],
        };
        assert_eq!(report.highest_severity(), Some(Severity::High));
        assert_eq!(report.blocking_warnings().len(), 1);
        assert_eq!(report.warnings_of_kind(ConflictKind::FileConflict).len(), 1);
        assert!(!report.is_partial());
    }

    #[test]
    fn test_diagnostics_omitted_when_empty() -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(ConflictReport::all_clear())?;
        assert!(value.get("diagnostics").is_none());
        assert_eq!(value["canProceed"], true);
        assert_eq!(value["status"], "complete");
        Ok(())
    }

    #[test]
    fn test_outcome_distinguishes_partial_from_clean() {
        let mut report = ConflictReport::all_clear();
        let clean: CheckOutcome = report.clone().into();
        assert!(clean.is_clean());

        report.status = CheckStatus::Partial;
        report.diagnostics.push(RuleDiagnostic::from(&EvaluationError::RuleFailed {
            rule_id: "x".to_string(),
            reason: "boom".to_string(),
        }));
        let partial: CheckOutcome = report.into();
        assert!(!partial.is_clean());
        assert!(partial.warnings.is_empty());
        assert_eq!(partial.diagnostics[0].rule_id, "x");
    }
}

//! Editor status indicator state.

use prism_core::{CheckOutcome, CheckStatus, ConflictWarning, PrismError, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Feedback state shown while checks run in the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckIndicator {
    #[default]
    Idle,
    Checking,
    Safe,
    Warning,
    Error,
}

impl CheckIndicator {
    pub fn label(&self) -> &'static str {
        match self {
            CheckIndicator::Idle => "Prism: Ready",
            CheckIndicator::Checking => "Prism: Checking...",
            CheckIndicator::Safe => "Prism: Safe to Proceed",
            CheckIndicator::Warning => "Prism: Conflicts Detected",
            CheckIndicator::Error => "Prism: Check Failed",
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            CheckIndicator::Idle => "Click to check for conflicts",
            CheckIndicator::Checking => "Analyzing workspace for conflicts",
            CheckIndicator::Safe => "No conflicts detected",
            CheckIndicator::Warning => "Potential conflicts found - click for details",
            CheckIndicator::Error => "Conflict check could not run completely",
        }
    }

    /// State after a finished check.
    ///
    /// Warnings win over a partial status; a partial check that found nothing
    /// is an error, not a clean bill of health.
    pub fn from_outcome(outcome: &CheckOutcome) -> Self {
        if !outcome.warnings.is_empty() {
            CheckIndicator::Warning
        } else if outcome.status == CheckStatus::Partial {
            CheckIndicator::Error
        } else {
            CheckIndicator::Safe
        }
    }

    pub fn from_result(result: &Result<CheckOutcome, PrismError>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(outcome),
            Err(_) => CheckIndicator::Error,
        }
    }
}

impl fmt::Display for CheckIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One-line summary of a set of warnings, counting high-severity ones when
/// there are any.
pub fn headline(warnings: &[ConflictWarning]) -> String {
    let high = warnings
        .iter()
        .filter(|w| w.severity == Severity::High)
        .count();
    if high > 0 {
        format!("{} high-priority conflicts detected!", high)
    } else {
        format!("{} potential conflicts found.", warnings.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{ConflictKind, InputError, RuleDiagnostic};

    fn warning(severity: Severity) -> ConflictWarning {
        ConflictWarning {
            id: "r-1".to_string(),
            kind: ConflictKind::FileConflict,
            severity,
            message: String::new(),
            files: vec![],
            suggested_action: String::new(),
        }
    }

    fn outcome(warnings: Vec<ConflictWarning>, status: CheckStatus) -> CheckOutcome {
        CheckOutcome {
            warnings,
            status,
            diagnostics: vec![],
        }
    }

    #[test]
    fn test_clean_is_safe() {
        let o = outcome(vec![], CheckStatus::Complete);
        assert_eq!(CheckIndicator::from_outcome(&o), CheckIndicator::Safe);
    }

    #[test]
    fn test_partial_without_warnings_is_error() {
        let mut o = outcome(vec![], CheckStatus::Partial);
        o.diagnostics.push(RuleDiagnostic {
            rule_id: "x".to_string(),
            message: "down".to_string(),
        });
        assert_eq!(CheckIndicator::from_outcome(&o), CheckIndicator::Error);
    }

    #[test]
    fn test_warnings_win() {
        let o = outcome(vec![warning(Severity::Low)], CheckStatus::Partial);
        assert_eq!(CheckIndicator::from_outcome(&o), CheckIndicator::Warning);
    }

    #[test]
    fn test_failed_check_is_error() {
        let result: Result<CheckOutcome, PrismError> = Err(InputError::Malformed {
            reason: "bad".to_string(),
        }
        .into());
        assert_eq!(CheckIndicator::from_result(&result), CheckIndicator::Error);
        assert_eq!(CheckIndicator::default(), CheckIndicator::Idle);
        assert_eq!(CheckIndicator::Checking.to_string(), "Prism: Checking...");
    }

    #[test]
    fn test_headline() {
        assert_eq!(
            headline(&[warning(Severity::High), warning(Severity::Medium)]),
            "1 high-priority conflicts detected!"
        );
        assert_eq!(
            headline(&[warning(Severity::Low), warning(Severity::Medium)]),
            "2 potential conflicts found."
        );
    }
}

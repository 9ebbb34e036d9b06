//! The rule abstraction: a named predicate plus warning template over a
//! change context.

use prism_core::{ChangeContext, CheckModes, ConflictKind, Severity};
use thiserror::Error;

/// Failure reported by a rule that could not decide.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct RuleError(pub String);

impl RuleError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// What a rule emits when it fires. The evaluator turns each finding into a
/// `ConflictWarning` by assigning it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: ConflictKind,
    pub severity: Severity,
    pub message: String,
    pub files: Vec<String>,
    pub suggested_action: String,
}

impl Finding {
    pub fn new(kind: ConflictKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            files: Vec::new(),
            suggested_action: String::new(),
        }
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }

    pub fn with_suggested_action(mut self, action: impl Into<String>) -> Self {
        self.suggested_action = action.into();
        self
    }
}

/// A conflict heuristic.
///
/// Implementations must be deterministic for a given context; the evaluator
/// relies on that for reproducible reports.
pub trait Rule: Send + Sync {
    /// Stable identifier, unique within a registry.
    fn id(&self) -> &str;

    /// Check modes this rule participates in.
    fn modes(&self) -> CheckModes {
        CheckModes::all()
    }

    /// Suggestions appended to the report whenever this rule fires.
    fn follow_ups(&self) -> &[String] {
        &[]
    }

    /// Inspect the context and return zero or more findings.
    fn evaluate(&self, ctx: &ChangeContext) -> Result<Vec<Finding>, RuleError>;
}

/// Rule backed by a closure, for heuristics registered at startup without a
/// dedicated type.
pub struct FnRule<F> {
    id: String,
    modes: CheckModes,
    follow_ups: Vec<String>,
    check: F,
}

impl<F> FnRule<F>
where
    F: Fn(&ChangeContext) -> Result<Vec<Finding>, RuleError> + Send + Sync,
{
    pub fn new(id: impl Into<String>, check: F) -> Self {
        Self {
            id: id.into(),
            modes: CheckModes::all(),
            follow_ups: Vec::new(),
            check,
        }
    }

    pub fn with_modes(mut self, modes: CheckModes) -> Self {
        self.modes = modes;
        self
    }

    pub fn with_follow_ups<I, S>(mut self, follow_ups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.follow_ups = follow_ups.into_iter().map(Into::into).collect();
        self
    }
}

impl<F> Rule for FnRule<F>
where
    F: Fn(&ChangeContext) -> Result<Vec<Finding>, RuleError> + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn modes(&self) -> CheckModes {
        self.modes
    }

    fn follow_ups(&self) -> &[String] {
        &self.follow_ups
    }

    fn evaluate(&self, ctx: &ChangeContext) -> Result<Vec<Finding>, RuleError> {
        (self.check)(ctx)
    }
}

impl<F> std::fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnRule")
            .field("id", &self.id)
            .field("modes", &self.modes)
            .field("follow_ups", &self.follow_ups)
            .finish_non_exhaustive()
    }
}

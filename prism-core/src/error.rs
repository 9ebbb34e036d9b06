//! Error types for Prism operations

use thiserror::Error;

/// Rule set and engine configuration errors.
///
/// These are startup failures: a process that hits one must not go on to
/// serve checks with a broken rule set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Duplicate rule id: {id}")]
    DuplicateRule { id: String },

    #[error("Invalid rule id {id:?}: {reason}")]
    InvalidRuleId { id: String, reason: String },

    #[error("Unknown rule referenced in configuration: {id}")]
    UnknownRule { id: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Rule registry already installed")]
    RegistryAlreadyInstalled,
}

/// Errors raised by a single rule while it was being evaluated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Rule {rule_id} failed: {reason}")]
    RuleFailed { rule_id: String, reason: String },

    #[error("Rule {rule_id} panicked: {reason}")]
    RulePanicked { rule_id: String, reason: String },
}

impl EvaluationError {
    /// Id of the rule that produced this error.
    pub fn rule_id(&self) -> &str {
        match self {
            EvaluationError::RuleFailed { rule_id, .. }
            | EvaluationError::RulePanicked { rule_id, .. } => rule_id,
        }
    }
}

/// Client-side input problems, detected before any rule runs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Malformed change context: {reason}")]
    Malformed { reason: String },

    #[error("Empty path at index {index} in {field}")]
    EmptyPath { field: String, index: usize },

    #[error("Too many files in {field}: {count} exceeds limit of {limit}")]
    TooManyFiles {
        field: String,
        count: usize,
        limit: usize,
    },
}

/// Master error type for all Prism errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrismError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),
}

/// Result type alias for Prism operations.
pub type PrismResult<T> = Result<T, PrismError>;

// =============================================================================
// TESTS
// =============================================================================

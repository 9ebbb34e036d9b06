//! Prism Core - Conflict Analysis Types
//!
//! Pure data structures shared by the engine, the HTTP layer and the test
//! utilities. This crate holds no rule logic.

mod config;
mod context;
mod enums;
mod error;
mod report;

pub use config::{EngineConfig, DEFAULT_MAX_FILES};
pub use context::{ChangeContext, TaskIntent};
pub use enums::{CheckMode, CheckModes, CheckStatus, ConflictKind, FailurePolicy, Severity};
pub use error::{ConfigurationError, EvaluationError, InputError, PrismError, PrismResult};
pub use report::{
    CheckOutcome, ConflictReport, ConflictWarning, RuleDiagnostic, ALL_CLEAR_SUGGESTIONS,
    PARTIAL_CHECK_SUGGESTION,
};

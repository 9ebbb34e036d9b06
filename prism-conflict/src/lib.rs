//! Prism Conflict - Rule-Based Conflict Analysis
//!
//! Heuristic classifier for proposed changes. A [`RuleRegistry`] holds
//! ordered [`Rule`]s, the [`ConflictEvaluator`] folds their findings into a
//! [`prism_core::ConflictReport`], and [`ConflictSession`] exposes the
//! workspace and task-intent entry points.
//!
//! Caller-side helpers gather a change context from an editor workspace
//! ([`ContextGatherer`]) and map check results onto a [`CheckIndicator`].

pub mod builtin;
mod evaluator;
mod gather;
mod indicator;
mod registry;
mod rule;
mod session;

pub use evaluator::ConflictEvaluator;
pub use gather::{
    humanize_branch, infer_description, read_git_branch, task_comment, ContextGatherer,
    SnapshotProbe, WorkspaceProbe, DEFAULT_BRANCH, FALLBACK_DESCRIPTION,
};
pub use indicator::{headline, CheckIndicator};
pub use registry::{global_registry, install_global, RuleRegistry};
pub use rule::{FnRule, Finding, Rule, RuleError};
pub use session::ConflictSession;

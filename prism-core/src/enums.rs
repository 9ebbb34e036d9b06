//! Enum types for conflict analysis

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// WARNING CLASSIFICATION
// ============================================================================

/// Ordinal risk level attached to a warning.
///
/// Variant order is the total order `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Whether a warning of this severity blocks proceeding.
    pub fn blocks(self) -> bool {
        self == Severity::High
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Category of a detected conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ConflictKind {
    /// Overlap on files someone else is likely touching
    FileConflict,
    /// Dependency manifest churn
    DependencyConflict,
    /// Work that tends to collide at merge or release time
    MergeConflict,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKind::FileConflict => "file-conflict",
            ConflictKind::DependencyConflict => "dependency-conflict",
            ConflictKind::MergeConflict => "merge-conflict",
        }
    }
}

// ============================================================================
// CHECK MODES
// ============================================================================

/// Entry point through which a check was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum CheckMode {
    /// Ambient check over the live workspace state
    Workspace,
    /// Check over a declared task description and file list
    TaskIntent,
}

impl CheckMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckMode::Workspace => "workspace",
            CheckMode::TaskIntent => "task-intent",
        }
    }
}

bitflags! {
    /// Set of check modes a rule participates in.
    ///
    /// Serializes as the flag names joined by `|`, e.g. `"WORKSPACE | TASK_INTENT"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CheckModes: u8 {
        const WORKSPACE = 0b0000_0001;
        const TASK_INTENT = 0b0000_0010;
    }
}

impl CheckModes {
    /// Whether this set includes the given mode.
    pub fn includes(self, mode: CheckMode) -> bool {
        self.contains(CheckModes::from(mode))
    }

    /// Expand the set into its modes, workspace first.
    pub fn modes(self) -> Vec<CheckMode> {
        [CheckMode::Workspace, CheckMode::TaskIntent]
            .into_iter()
            .filter(|mode| self.includes(*mode))
            .collect()
    }
}

impl Default for CheckModes {
    fn default() -> Self {
        Self::all()
    }
}

impl From<CheckMode> for CheckModes {
    fn from(mode: CheckMode) -> Self {
        match mode {
            CheckMode::Workspace => CheckModes::WORKSPACE,
            CheckMode::TaskIntent => CheckModes::TASK_INTENT,
        }
    }
}

// ============================================================================
// OUTCOME STATUS AND POLICY
// ============================================================================

/// Whether every applicable rule ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// All applicable rules ran
    Complete,
    /// At least one rule failed and contributed nothing
    Partial,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Complete => "complete",
            CheckStatus::Partial => "partial",
        }
    }
}

/// How a report treats rules that failed during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum FailurePolicy {
    /// Failed rules are skipped; the verdict depends on the remaining warnings
    #[default]
    #[serde(rename = "open")]
    FailOpen,
    /// Any failed rule blocks proceeding
    #[serde(rename = "closed")]
    FailClosed,
}

fn normalize_token(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(format!("Invalid Severity: {}", s)),
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for CheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CheckMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "workspace" => Ok(CheckMode::Workspace),
            "taskintent" | "task" => Ok(CheckMode::TaskIntent),
            _ => Err(format!("Invalid CheckMode: {}", s)),
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "open" | "failopen" => Ok(FailurePolicy::FailOpen),
            "closed" | "failclosed" => Ok(FailurePolicy::FailClosed),
            _ => Err(format!("Invalid FailurePolicy: {}", s)),
        }
    }
}

//! Change context: the input snapshot of a proposed or in-progress change

use crate::InputError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Snapshot of a change handed to the conflict engine.
///
/// Field names follow the editor client's wire format (camelCase). Every field
/// defaults to empty so partial payloads still deserialize; type mismatches do
/// not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChangeContext {
    /// Path identifying the project checkout (opaque to the engine)
    #[serde(default)]
    pub workspace_root: String,
    /// File currently being edited, may be empty
    #[serde(default)]
    pub current_file: String,
    /// Paths touched by the change, in caller order
    #[serde(default)]
    pub modified_files: Vec<String>,
    /// Name of the current branch
    #[serde(default)]
    pub active_branch: String,
    /// Free-text description of intent
    #[serde(default)]
    pub task_description: String,
}

impl ChangeContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Synthesize the context used by task-intent checks: `files` become the
    /// modified files, everything else besides the description stays empty.
    pub fn for_task(task_description: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            modified_files: files,
            task_description: task_description.into(),
            ..Self::default()
        }
    }

    /// Parse a context from an untyped JSON payload.
    pub fn from_json(value: serde_json::Value) -> Result<Self, InputError> {
        serde_json::from_value(value).map_err(|e| InputError::Malformed {
            reason: e.to_string(),
        })
    }

    pub fn with_workspace_root(mut self, root: impl Into<String>) -> Self {
        self.workspace_root = root.into();
        self
    }

    pub fn with_current_file(mut self, file: impl Into<String>) -> Self {
        self.current_file = file.into();
        self
    }

    pub fn with_modified_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modified_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_active_branch(mut self, branch: impl Into<String>) -> Self {
        self.active_branch = branch.into();
        self
    }

    pub fn with_task_description(mut self, description: impl Into<String>) -> Self {
        self.task_description = description.into();
        self
    }

    /// Whether the lowercased task description contains `keyword`.
    ///
    /// `keyword` is expected to be lowercase already.
    pub fn description_mentions(&self, keyword: &str) -> bool {
        self.task_description.to_lowercase().contains(keyword)
    }

    /// Whether the lowercased task description contains any of `keywords`.
    pub fn description_mentions_any(&self, keywords: &[&str]) -> bool {
        let lowered = self.task_description.to_lowercase();
        keywords.iter().any(|k| lowered.contains(k))
    }

    /// Modified files for which `predicate` holds, in input order.
    pub fn files_matching<F>(&self, predicate: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        self.modified_files
            .iter()
            .filter(|f| predicate(f))
            .cloned()
            .collect()
    }

    /// Paths that occur more than once in `modified_files`, first repeat order.
    pub fn duplicate_files(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for file in &self.modified_files {
            if !seen.insert(file.as_str()) && reported.insert(file.as_str()) {
                duplicates.push(file.as_str());
            }
        }
        duplicates
    }

    /// Reject contexts no rule should see.
    ///
    /// Duplicates are tolerated; empty paths and oversized file lists are not.
    pub fn validate(&self, max_files: usize) -> Result<(), InputError> {
        if self.modified_files.len() > max_files {
            return Err(InputError::TooManyFiles {
                field: "modifiedFiles".to_string(),
                count: self.modified_files.len(),
                limit: max_files,
            });
        }
        if let Some(index) = self.modified_files.iter().position(|f| f.trim().is_empty()) {
            return Err(InputError::EmptyPath {
                field: "modifiedFiles".to_string(),
                index,
            });
        }
        Ok(())
    }
}

/// Request shape of a task-intent check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TaskIntent {
    /// What the developer intends to do
    #[serde(default)]
    pub task_description: String,
    /// Files the task is expected to touch
    #[serde(default)]
    pub files: Vec<String>,
}

impl TaskIntent {
    pub fn new(task_description: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            task_description: task_description.into(),
            files,
        }
    }

    /// The change context this intent stands for.
    pub fn to_context(&self) -> ChangeContext {
        ChangeContext::for_task(self.task_description.clone(), self.files.clone())
    }
}

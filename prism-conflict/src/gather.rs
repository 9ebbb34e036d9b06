//! Context gathering
//!
//! Assembles a [`ChangeContext`] from whatever an editor or checkout can tell
//! us about the work in progress. Everything here is best-effort: missing
//! sources yield empty fields, never errors.

use once_cell::sync::Lazy;
use prism_core::ChangeContext;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Branch assumed when none can be determined.
pub const DEFAULT_BRANCH: &str = "main";

/// Description used when no source yields anything.
pub const FALLBACK_DESCRIPTION: &str = "Working on current changes";

const DESCRIPTION_SEPARATOR: &str = " | ";

const BRANCH_PREFIXES: [&str; 3] = ["feature/", "fix/", "hotfix/"];

static TASK_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:TODO|FIXME|HACK|NOTE):\s*(.+)").expect("Invalid task comment regex")
});

/// Read-only view of the live workspace.
pub trait WorkspaceProbe {
    fn workspace_root(&self) -> Option<String>;

    /// Path of the file open in the editor.
    fn current_file(&self) -> Option<String>;

    /// Text of the file open in the editor.
    fn current_file_text(&self) -> Option<String>;

    /// Changed paths, possibly with repeats.
    fn modified_files(&self) -> Vec<String>;

    fn current_branch(&self) -> Option<String>;

    fn latest_commit_message(&self) -> Option<String> {
        None
    }
}

/// Plain-data probe, for callers that already hold the workspace state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotProbe {
    #[serde(default)]
    pub workspace_root: Option<String>,
    #[serde(default)]
    pub current_file: Option<String>,
    #[serde(default)]
    pub current_file_text: Option<String>,
    #[serde(default)]
    pub modified_files: Vec<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub commit_message: Option<String>,
}

impl WorkspaceProbe for SnapshotProbe {
    fn workspace_root(&self) -> Option<String> {
        self.workspace_root.clone()
    }

    fn current_file(&self) -> Option<String> {
        self.current_file.clone()
    }

    fn current_file_text(&self) -> Option<String> {
        self.current_file_text.clone()
    }

    fn modified_files(&self) -> Vec<String> {
        self.modified_files.clone()
    }

    fn current_branch(&self) -> Option<String> {
        self.branch.clone()
    }

    fn latest_commit_message(&self) -> Option<String> {
        self.commit_message.clone()
    }
}

/// Builds change contexts from a [`WorkspaceProbe`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextGatherer;

impl ContextGatherer {
    pub fn new() -> Self {
        Self
    }

    pub fn gather<P: WorkspaceProbe + ?Sized>(&self, probe: &P) -> ChangeContext {
        let branch = probe
            .current_branch()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());

        let description = infer_description(
            probe.latest_commit_message().as_deref(),
            probe.current_file_text().as_deref(),
            &branch,
        );

        ChangeContext::new()
            .with_workspace_root(probe.workspace_root().unwrap_or_default())
            .with_current_file(probe.current_file().unwrap_or_default())
            .with_modified_files(dedupe(probe.modified_files()))
            .with_active_branch(branch)
            .with_task_description(description)
    }
}

/// Drop repeated paths, keeping the first occurrence.
fn dedupe(files: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    files
        .into_iter()
        .filter(|f| seen.insert(f.clone()))
        .collect()
}

/// Combine commit message, task comment and branch name into one description.
pub fn infer_description(
    commit_message: Option<&str>,
    file_text: Option<&str>,
    branch: &str,
) -> String {
    let sources = [
        commit_message.map(str::trim).unwrap_or_default().to_string(),
        file_text.and_then(task_comment).unwrap_or_default(),
        humanize_branch(branch),
    ];

    let joined = sources
        .iter()
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(DESCRIPTION_SEPARATOR);

    if joined.is_empty() {
        FALLBACK_DESCRIPTION.to_string()
    } else {
        joined
    }
}

/// Text of the first `TODO:`/`FIXME:`/`HACK:`/`NOTE:` comment.
pub fn task_comment(text: &str) -> Option<String> {
    TASK_COMMENT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `feature/user-auth` -> `user auth`.
pub fn humanize_branch(branch: &str) -> String {
    let spaced = branch.replace(['-', '_'], " ");
    BRANCH_PREFIXES
        .iter()
        .find_map(|prefix| spaced.strip_prefix(prefix))
        .unwrap_or(spaced.as_str())
        .trim()
        .to_string()
}

/// Branch checked out in the repository at `root`, read from `.git/HEAD`.
///
/// Returns `None` for a detached HEAD or when there is no readable repository.
pub fn read_git_branch(root: impl AsRef<Path>) -> Option<String> {
    let head = std::fs::read_to_string(root.as_ref().join(".git").join("HEAD")).ok()?;
    head.trim()
        .strip_prefix("ref: refs/heads/")
        .map(str::to_string)
        .filter(|b| !b.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_defaults() {
        let ctx = ContextGatherer::new().gather(&SnapshotProbe::default());
        assert_eq!(ctx.active_branch, DEFAULT_BRANCH);
        assert_eq!(ctx.task_description, "main");
        assert!(ctx.modified_files.is_empty());
        assert!(ctx.workspace_root.is_empty());
    }

    #[test]
    fn test_gather_dedupes_preserving_order() {
        let probe = SnapshotProbe {
            modified_files: vec!["b.ts".into(), "a.ts".into(), "b.ts".into()],
            ..SnapshotProbe::default()
        };
        let ctx = ContextGatherer::new().gather(&probe);
        assert_eq!(ctx.modified_files, vec!["b.ts", "a.ts"]);
    }

    #[test]
    fn test_description_sources_joined() {
        let probe = SnapshotProbe {
            current_file_text: Some("fn x() {}\n// todo: wire up auth guard  \nmore".into()),
            branch: Some("feature/login-page".into()),
            commit_message: Some("Add login form".into()),
            ..SnapshotProbe::default()
        };
        let ctx = ContextGatherer::new().gather(&probe);
        assert_eq!(
            ctx.task_description,
            "Add login form | wire up auth guard | login page"
        );
        assert_eq!(ctx.active_branch, "feature/login-page");
    }

    #[test]
    fn test_fallback_description() {
        assert_eq!(infer_description(None, None, "feature/"), FALLBACK_DESCRIPTION);
        assert_eq!(infer_description(Some("  "), Some("no markers"), ""), FALLBACK_DESCRIPTION);
    }

    #[test]
    fn test_task_comment_markers() {
        assert_eq!(task_comment("// FIXME: leak").as_deref(), Some("leak"));
        assert_eq!(task_comment("# Hack: temp").as_deref(), Some("temp"));
        assert_eq!(task_comment("TODO without colon"), None);
    }

    #[test]
    fn test_humanize_branch() {
        assert_eq!(humanize_branch("hotfix/db_pool-leak"), "db pool leak");
        assert_eq!(humanize_branch("fix/typo"), "typo");
        assert_eq!(humanize_branch("release/v2"), "release/v2");
    }

    #[test]
    fn test_read_git_branch() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        assert_eq!(read_git_branch(dir.path()), None);

        std::fs::create_dir(dir.path().join(".git"))?;
        std::fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/feature/auth\n")?;
        assert_eq!(read_git_branch(dir.path()).as_deref(), Some("feature/auth"));

        std::fs::write(dir.path().join(".git/HEAD"), "3f2a9c0d\n")?;
        assert_eq!(read_git_branch(dir.path()), None);
        Ok(())
    }
}

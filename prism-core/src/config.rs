//! Engine configuration

use crate::{ConfigurationError, FailurePolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default upper bound on files per context.
pub const DEFAULT_MAX_FILES: usize = 10_000;

/// Configuration for the conflict evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// What a failed rule does to the verdict
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Registered rules to skip
    #[serde(default)]
    pub disabled_rules: Vec<String>,
    /// Largest accepted `modifiedFiles` length
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::FailOpen,
            disabled_rules: Vec::new(),
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl EngineConfig {
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_disabled_rules<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_rules = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Whether the rule with `id` is switched off.
    pub fn is_disabled(&self, id: &str) -> bool {
        self.disabled_rules.iter().any(|d| d == id)
    }

    /// Validate the configuration.
    ///
    /// Rule ids are checked against a registry separately, when the evaluator
    /// is built.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_files == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "max_files".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for id in &self.disabled_rules {
            if id.trim().is_empty() {
                return Err(ConfigurationError::InvalidValue {
                    field: "disabled_rules".to_string(),
                    reason: "rule ids must not be empty".to_string(),
                });
            }
            if !seen.insert(id.as_str()) {
                return Err(ConfigurationError::InvalidValue {
                    field: "disabled_rules".to_string(),
                    reason: format!("rule {} listed more than once", id),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.failure_policy, FailurePolicy::FailOpen);
        assert_eq!(config.max_files, DEFAULT_MAX_FILES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_max_files_rejected() {
        let config = EngineConfig::default().with_max_files(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue { field, .. }) if field == "max_files"
        ));
    }

    #[test]
    fn test_duplicate_disabled_rule_rejected() {
        let config = EngineConfig::default().with_disabled_rules(["a", "a"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_disabled_rule_rejected() {
        let config = EngineConfig::default().with_disabled_rules([" "]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() -> Result<(), serde_json::Error> {
        let config: EngineConfig =
            serde_json::from_str(r#"{"failurePolicy":"closed","disabledRules":["x"]}"#)?;
        assert_eq!(config.failure_policy, FailurePolicy::FailClosed);
        assert!(config.is_disabled("x"));
        assert!(!config.is_disabled("y"));
        assert_eq!(config.max_files, DEFAULT_MAX_FILES);
        Ok(())
    }
}

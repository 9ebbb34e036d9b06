//! Rule registry
//!
//! Ordered, append-only collection of rules. Registration order is the order
//! rules run in and the order their warnings appear in a report.

use once_cell::sync::OnceCell;
use prism_core::{ConfigurationError, PrismResult};
use std::collections::HashSet;
use std::sync::Arc;

use crate::builtin::{
    AuthFileOverlap, DatabaseSchemaChange, PackageManifestChange, ProductionDeployIntent,
};
use crate::rule::Rule;

/// Process-wide registry, installed once and read-only afterwards.
static GLOBAL_REGISTRY: OnceCell<Arc<RuleRegistry>> = OnceCell::new();

/// Ordered set of conflict rules with unique ids.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
    ids: HashSet<String>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in rules in their canonical order.
    pub fn builtin() -> Result<Self, ConfigurationError> {
        let mut registry = Self::new();
        registry.register(AuthFileOverlap)?;
        registry.register(PackageManifestChange)?;
        registry.register(DatabaseSchemaChange)?;
        registry.register(ProductionDeployIntent::default())?;
        Ok(registry)
    }

    /// Append a rule.
    ///
    /// A duplicate id is rejected and leaves the registry untouched.
    pub fn register<R: Rule + 'static>(&mut self, rule: R) -> Result<(), ConfigurationError> {
        self.register_arc(Arc::new(rule))
    }

    /// Append an already shared rule.
    pub fn register_arc(&mut self, rule: Arc<dyn Rule>) -> Result<(), ConfigurationError> {
        let id = rule.id().to_string();
        validate_rule_id(&id)?;
        if self.ids.contains(&id) {
            return Err(ConfigurationError::DuplicateRule { id });
        }
        self.ids.insert(id);
        self.rules.push(rule);
        Ok(())
    }

    /// Rules in registration order.
    pub fn all(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Rule ids in registration order.
    pub fn ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.ids())
            .finish()
    }
}

/// Rule ids are lowercase ASCII kebab-case: `[a-z0-9]+(-[a-z0-9]+)*`.
fn validate_rule_id(id: &str) -> Result<(), ConfigurationError> {
    let invalid = |reason: &str| ConfigurationError::InvalidRuleId {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    if id.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid("must contain only lowercase letters, digits and '-'"));
    }
    if id.starts_with('-') || id.ends_with('-') || id.contains("--") {
        return Err(invalid("must be kebab-case"));
    }
    Ok(())
}

// ============================================================================
// GLOBAL REGISTRY
// ============================================================================

/// Install the process-wide registry.
///
/// Fails if a registry was already installed or lazily initialised.
pub fn install_global(registry: RuleRegistry) -> PrismResult<Arc<RuleRegistry>> {
    let registry = Arc::new(registry);
    GLOBAL_REGISTRY
        .set(Arc::clone(&registry))
        .map_err(|_| ConfigurationError::RegistryAlreadyInstalled)?;
    tracing::info!(rules = ?registry.ids(), "Installed conflict rule registry");
    Ok(registry)
}

/// The process-wide registry, initialised to [`RuleRegistry::builtin`] on
/// first use when nothing was installed.
pub fn global_registry() -> PrismResult<Arc<RuleRegistry>> {
    let registry = GLOBAL_REGISTRY.get_or_try_init(|| RuleRegistry::builtin().map(Arc::new))?;
    Ok(Arc::clone(registry))
}

//! Conflict session: the two public check entry points.

use prism_core::{
    ChangeContext, CheckMode, CheckOutcome, ConflictReport, EngineConfig, PrismResult, TaskIntent,
};
use std::sync::Arc;

use crate::evaluator::ConflictEvaluator;
use crate::registry::{global_registry, RuleRegistry};

/// Front door for conflict checks.
///
/// Validates input, then delegates to the [`ConflictEvaluator`] in the mode
/// matching the entry point.
#[derive(Debug, Clone)]
pub struct ConflictSession {
    evaluator: ConflictEvaluator,
}

impl ConflictSession {
    pub fn new(evaluator: ConflictEvaluator) -> Self {
        Self { evaluator }
    }

    /// Session over an explicit registry.
    pub fn with_registry(registry: Arc<RuleRegistry>, config: EngineConfig) -> PrismResult<Self> {
        Ok(Self::new(ConflictEvaluator::new(registry, config)?))
    }

    /// Session over the process-wide registry.
    pub fn from_global(config: EngineConfig) -> PrismResult<Self> {
        Self::with_registry(global_registry()?, config)
    }

    pub fn evaluator(&self) -> &ConflictEvaluator {
        &self.evaluator
    }

    /// Ambient check of the live workspace state.
    pub fn check_conflicts(&self, ctx: &ChangeContext) -> PrismResult<CheckOutcome> {
        let report = self.run(ctx, CheckMode::Workspace)?;
        Ok(CheckOutcome::from(report))
    }

    /// Check a declared task against the files it will touch.
    pub fn analyze_task_conflicts(
        &self,
        task_description: &str,
        files: &[String],
    ) -> PrismResult<ConflictReport> {
        let ctx = ChangeContext::for_task(task_description, files.to_vec());
        self.run(&ctx, CheckMode::TaskIntent)
    }

    pub fn analyze(&self, intent: &TaskIntent) -> PrismResult<ConflictReport> {
        self.run(&intent.to_context(), CheckMode::TaskIntent)
    }

    fn run(&self, ctx: &ChangeContext, mode: CheckMode) -> PrismResult<ConflictReport> {
        ctx.validate(self.evaluator.config().max_files)?;

        let duplicates = ctx.duplicate_files();
        if !duplicates.is_empty() {
            tracing::debug!(
                mode = %mode,
                duplicates = ?duplicates,
                "Change context lists duplicate paths"
            );
        }

        Ok(self.evaluator.evaluate(ctx, mode))
    }
}

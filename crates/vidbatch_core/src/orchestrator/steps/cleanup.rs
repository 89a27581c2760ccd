//! Cleanup step - delete intermediates when the policy asks for it.

use std::fs;

use crate::archive::EntrySource;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::EntryStep;
use crate::orchestrator::types::{BatchContext, EntryState, StepOutcome};

/// Removes the extracted input after a successful transcode.
pub struct CleanupStep;

impl CleanupStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CleanupStep {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStep for CleanupStep {
    fn name(&self) -> &str {
        "Cleanup"
    }

    fn validate_input(&self, ctx: &BatchContext, state: &EntryState) -> StepResult<()> {
        if ctx.config.policy.removes_intermediates()
            && state.plan.is_transcode()
            && state.output.is_none()
        {
            return Err(StepError::invalid_input(
                "Refusing to remove input before it was transcoded",
            ));
        }
        Ok(())
    }

    fn execute(
        &self,
        ctx: &BatchContext,
        _source: &mut dyn EntrySource,
        state: &mut EntryState,
    ) -> StepResult<StepOutcome> {
        if !ctx.config.policy.removes_intermediates() {
            return Ok(StepOutcome::Skipped(format!(
                "{} policy keeps extracted files",
                ctx.config.policy
            )));
        }

        let Some(input) = state.extracted.as_ref().map(|e| e.path.clone()) else {
            return Ok(StepOutcome::Skipped("nothing was extracted".to_string()));
        };

        fs::remove_file(&input).map_err(|source| StepError::cleanup(&input, source))?;
        ctx.logger.debug(&format!("Removed {}", input.display()));

        state.intermediate_removed = true;
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &BatchContext, state: &EntryState) -> StepResult<()> {
        if let Some(ref extracted) = state.extracted {
            if extracted.path.exists() {
                return Err(StepError::invalid_output(format!(
                    "Intermediate still present: {}",
                    extracted.path.display()
                )));
            }
        }
        Ok(())
    }
}

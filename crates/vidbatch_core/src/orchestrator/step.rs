//! Entry step trait definition.

use super::errors::StepResult;
use super::types::{BatchContext, EntryState, StepOutcome};
use crate::archive::EntrySource;

/// One stage of the per-entry pipeline.
///
/// The runner calls these methods in order for every file entry:
///
/// 1. `validate_input` - Check preconditions before execution
/// 2. `execute` - Perform the step's work, recording results in `state`
/// 3. `validate_output` - Verify the result (only after `Success`)
///
/// A step that does not apply to an entry returns
/// `StepOutcome::Skipped` from `execute`; that is not an error.
pub trait EntryStep: Send + Sync {
    /// Step name (for logging and error context).
    fn name(&self) -> &str;

    fn validate_input(&self, ctx: &BatchContext, state: &EntryState) -> StepResult<()>;

    fn execute(
        &self,
        ctx: &BatchContext,
        source: &mut dyn EntrySource,
        state: &mut EntryState,
    ) -> StepResult<StepOutcome>;

    fn validate_output(&self, ctx: &BatchContext, state: &EntryState) -> StepResult<()>;
}

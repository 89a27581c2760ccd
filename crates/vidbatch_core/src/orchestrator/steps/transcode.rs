//! Transcode step - hand the planned job to the transcoder.

use crate::archive::EntrySource;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::EntryStep;
use crate::orchestrator::types::{BatchContext, EntryState, StepOutcome};

/// Runs the entry's [`TranscodeJob`](crate::transcode::TranscodeJob), if any.
pub struct TranscodeStep;

impl TranscodeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TranscodeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStep for TranscodeStep {
    fn name(&self) -> &str {
        "Transcode"
    }

    fn validate_input(&self, _ctx: &BatchContext, state: &EntryState) -> StepResult<()> {
        let Some(job) = state.plan.job() else {
            return Ok(());
        };

        if !job.input_path.is_file() {
            return Err(StepError::invalid_input(format!(
                "Input not extracted: {}",
                job.input_path.display()
            )));
        }
        Ok(())
    }

    fn execute(
        &self,
        ctx: &BatchContext,
        _source: &mut dyn EntrySource,
        state: &mut EntryState,
    ) -> StepResult<StepOutcome> {
        let Some(job) = state.plan.job() else {
            return Ok(StepOutcome::Skipped("not a video candidate".to_string()));
        };

        ctx.logger.info(&format!(
            "{} -> {}",
            job.input_path.display(),
            job.output_path.display()
        ));
        ctx.transcoder.transcode(job)?;

        state.output = Some(job.output_path.clone());
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &BatchContext, state: &EntryState) -> StepResult<()> {
        match state.output {
            Some(ref output) if output.is_file() => Ok(()),
            Some(ref output) => Err(StepError::invalid_output(format!(
                "Transcoded output missing: {}",
                output.display()
            ))),
            None => Err(StepError::invalid_output("Transcode not recorded")),
        }
    }
}

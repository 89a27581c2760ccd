//! Extract step - stream an entry's bytes to its planned path.

use crate::archive::EntrySource;
use crate::extraction::{extract_to, ExtractOptions};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::EntryStep;
use crate::orchestrator::types::{BatchContext, EntryState, StepOutcome};

/// Writes the entry to `plan.extraction_path()`.
pub struct ExtractStep;

impl ExtractStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExtractStep {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStep for ExtractStep {
    fn name(&self) -> &str {
        "Extract"
    }

    fn validate_input(&self, _ctx: &BatchContext, state: &EntryState) -> StepResult<()> {
        if state.entry.is_dir {
            return Err(StepError::invalid_input(format!(
                "'{}' is a directory entry",
                state.entry.name
            )));
        }
        Ok(())
    }

    fn execute(
        &self,
        ctx: &BatchContext,
        source: &mut dyn EntrySource,
        state: &mut EntryState,
    ) -> StepResult<StepOutcome> {
        let Some(dest) = state.plan.extraction_path().map(|p| p.to_path_buf()) else {
            return Ok(StepOutcome::Skipped("nothing to extract".to_string()));
        };

        let overwrite = ctx.config.overwrite_extracted;
        if overwrite && dest.exists() {
            ctx.logger
                .warn(&format!("Replacing existing file {}", dest.display()));
        }

        ctx.logger.debug(&format!(
            "Extracting '{}' ({} bytes) to {}",
            state.entry.name,
            state.entry.size,
            dest.display()
        ));

        let mut stream = source.open_stream(&state.entry)?;
        let extracted = extract_to(
            &mut stream,
            &dest,
            &ExtractOptions::default().overwrite(overwrite),
        )?;

        state.extracted = Some(extracted);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &BatchContext, state: &EntryState) -> StepResult<()> {
        let extracted = state
            .extracted
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Extraction not recorded"))?;

        if !extracted.path.is_file() {
            return Err(StepError::invalid_output(format!(
                "Extracted file missing: {}",
                extracted.path.display()
            )));
        }

        if extracted.bytes_written != state.entry.size {
            return Err(StepError::invalid_output(format!(
                "Wrote {} bytes for '{}', archive records {}",
                extracted.bytes_written, state.entry.name, state.entry.size
            )));
        }

        Ok(())
    }
}

//! Batch runner that walks an archive entry by entry.

use std::fs;
use std::path::Path;

use parking_lot::Mutex;

use super::errors::{BatchError, BatchResult, StepError};
use super::step::EntryStep;
use super::steps::{CleanupStep, ExtractStep, TranscodeStep};
use super::types::{BatchContext, BatchPhase, BatchReport, EntryState, StepOutcome};
use crate::archive::{EntrySource, ZipArchiveReader};
use crate::extraction::ensure_directory;
use crate::planner::{EntryPlan, PathPlanner};

/// Sequential batch processor.
///
/// Entries are processed strictly in archive order and the first failure
/// ends the batch. The archive is owned for the duration of a run and
/// dropped on every exit path.
pub struct BatchRunner {
    ctx: BatchContext,
    steps: Vec<Box<dyn EntryStep>>,
    phase: Mutex<BatchPhase>,
}

impl BatchRunner {
    /// Runner with the standard Extract → Transcode → Cleanup steps.
    pub fn new(ctx: BatchContext) -> Self {
        Self {
            ctx,
            steps: vec![
                Box::new(ExtractStep::new()),
                Box::new(TranscodeStep::new()),
                Box::new(CleanupStep::new()),
            ],
            phase: Mutex::new(BatchPhase::Idle),
        }
    }

    pub fn phase(&self) -> BatchPhase {
        *self.phase.lock()
    }

    /// Get step names in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Open the zip archive at `archive_path` and process it.
    pub fn run(&self, archive_path: &Path) -> BatchResult<BatchReport> {
        self.prepare()?;

        self.set_phase(BatchPhase::Opening);
        self.ctx
            .logger
            .phase(&format!("Opening {}", archive_path.display()));
        let archive = ZipArchiveReader::open(archive_path).map_err(|source| {
            self.set_phase(BatchPhase::Failed);
            BatchError::Open { source }
        })?;

        self.process(archive)
    }

    /// Process an already opened entry source.
    ///
    /// The source is consumed and dropped before this returns.
    pub fn run_source<S: EntrySource>(&self, source: S) -> BatchResult<BatchReport> {
        self.prepare()?;
        self.set_phase(BatchPhase::Opening);
        self.process(source)
    }

    /// Validate the configuration and create the output root.
    fn prepare(&self) -> BatchResult<()> {
        let config = &self.ctx.config;
        config.validate().inspect_err(|_| self.set_phase(BatchPhase::Failed))?;

        fs::create_dir_all(&config.output_root).map_err(|source| {
            self.set_phase(BatchPhase::Failed);
            BatchError::setup(&self.ctx.batch_name, &config.output_root, source)
        })?;

        tracing::debug!(
            "Output root ready: {} (policy: {})",
            config.output_root.display(),
            config.policy
        );
        Ok(())
    }

    fn process<S: EntrySource>(&self, mut source: S) -> BatchResult<BatchReport> {
        let result = self.process_entries(&mut source);
        drop(source);

        match result {
            Ok(report) => {
                self.set_phase(BatchPhase::Closed);
                self.ctx.logger.success(&format!(
                    "Batch '{}' finished: {} outputs from {} entries",
                    self.ctx.batch_name,
                    report.outputs_produced(),
                    report.entries
                ));
                Ok(report)
            }
            Err(e) => {
                self.set_phase(BatchPhase::Failed);
                self.ctx.logger.error(&e.to_string());
                Err(e)
            }
        }
    }

    fn process_entries(&self, source: &mut dyn EntrySource) -> BatchResult<BatchReport> {
        let entries = source.entries().to_vec();
        let config = &self.ctx.config;
        let mut planner = PathPlanner::new(config);
        let mut report = BatchReport::new(source.label(), config.policy, entries.len());

        tracing::info!(
            "Processing {} entries from {}",
            entries.len(),
            source.label()
        );

        let total = entries.len();
        for (position, entry) in entries.into_iter().enumerate() {
            self.set_phase(BatchPhase::Processing { index: entry.index });
            self.ctx.logger.entry(position + 1, total, &entry.name);

            let plan = planner.plan(&entry).map_err(|e| {
                BatchError::entry_failed(entry.index, &entry.name, "Plan", StepError::from(e))
            })?;

            match plan {
                EntryPlan::CreateDirectory { ref path } => {
                    let created = ensure_directory(path).map_err(|e| {
                        BatchError::entry_failed(
                            entry.index,
                            &entry.name,
                            "CreateDirectory",
                            StepError::from(e),
                        )
                    })?;
                    if created {
                        self.ctx
                            .logger
                            .debug(&format!("Created directory {}", path.display()));
                    }
                    report.directories_created += 1;
                }
                EntryPlan::Skip { reason } => {
                    self.ctx.logger.debug(&format!("Skipped: {}", reason));
                    report.record_skip(&entry, reason);
                }
                EntryPlan::Extract { .. } | EntryPlan::Transcode { .. } => {
                    let mut state = EntryState::new(entry, plan);
                    self.run_steps(source, &mut state)?;
                    report.record_entry(&state);
                }
            }
        }

        Ok(report)
    }

    /// Run the step pipeline for one file entry.
    fn run_steps(&self, source: &mut dyn EntrySource, state: &mut EntryState) -> BatchResult<()> {
        let ctx = &self.ctx;

        for step in &self.steps {
            let step_name = step.name();

            ctx.logger
                .debug(&format!("Validating input for '{}'", step_name));
            step.validate_input(ctx, state)
                .map_err(|e| self.step_failed(step_name, state, e))?;

            ctx.logger.debug(&format!("Executing '{}'", step_name));
            let outcome = step
                .execute(ctx, source, state)
                .map_err(|e| self.step_failed(step_name, state, e))?;

            match outcome {
                StepOutcome::Success => {
                    step.validate_output(ctx, state)
                        .map_err(|e| self.step_failed(step_name, state, e))?;
                    ctx.logger.debug(&format!("{} completed", step_name));
                }
                StepOutcome::Skipped(reason) => {
                    ctx.logger
                        .debug(&format!("{} skipped: {}", step_name, reason));
                }
            }
        }

        Ok(())
    }

    fn step_failed(&self, step_name: &str, state: &EntryState, e: StepError) -> BatchError {
        self.ctx
            .logger
            .error(&format!("{} failed for '{}': {}", step_name, state.entry.name, e));
        BatchError::entry_failed(state.entry.index, state.entry.name.clone(), step_name, e)
    }

    fn set_phase(&self, phase: BatchPhase) {
        *self.phase.lock() = phase;
    }
}

//! Core types for the batch orchestrator.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::archive::Entry;
use crate::extraction::ExtractedFile;
use crate::logging::BatchLogger;
use crate::models::{NamingPolicy, ProcessingConfig};
use crate::planner::{EntryPlan, SkipReason};
use crate::transcode::Transcoder;

/// Read-only context shared by every entry step.
pub struct BatchContext {
    /// Resolved runtime configuration.
    pub config: ProcessingConfig,
    /// Batch name, used in error and log context.
    pub batch_name: String,
    /// Per-batch logger.
    pub logger: Arc<BatchLogger>,
    /// Tool that executes transcode jobs.
    pub transcoder: Arc<dyn Transcoder>,
}

impl BatchContext {
    pub fn new(
        config: ProcessingConfig,
        batch_name: impl Into<String>,
        logger: Arc<BatchLogger>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        Self {
            config,
            batch_name: batch_name.into(),
            logger,
            transcoder,
        }
    }
}

/// Where the runner is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum BatchPhase {
    Idle,
    Opening,
    Processing { index: usize },
    Closed,
    Failed,
}

/// Mutable state for one file entry while its steps run.
#[derive(Debug, Clone)]
pub struct EntryState {
    pub entry: Entry,
    pub plan: EntryPlan,
    /// Set by the extract step.
    pub extracted: Option<ExtractedFile>,
    /// Set by the transcode step.
    pub output: Option<PathBuf>,
    /// Set by the cleanup step.
    pub intermediate_removed: bool,
}

impl EntryState {
    pub fn new(entry: Entry, plan: EntryPlan) -> Self {
        Self {
            entry,
            plan,
            extracted: None,
            output: None,
            intermediate_removed: false,
        }
    }
}

/// Outcome of a step execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step had nothing to do for this entry.
    Skipped(String),
}

/// An entry that produced no work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub index: usize,
    pub name: String,
    pub reason: String,
}

/// Summary of a successful batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Archive label.
    pub archive: String,
    pub policy: NamingPolicy,
    /// Entries in the archive.
    pub entries: usize,
    pub directories_created: usize,
    pub files_extracted: usize,
    pub bytes_extracted: u64,
    /// Transcoded outputs, in archive order.
    pub outputs: Vec<PathBuf>,
    pub intermediates_removed: usize,
    pub skipped: Vec<SkippedEntry>,
}

impl BatchReport {
    pub(crate) fn new(archive: impl Into<String>, policy: NamingPolicy, entries: usize) -> Self {
        Self {
            archive: archive.into(),
            policy,
            entries,
            ..Default::default()
        }
    }

    pub(crate) fn record_skip(&mut self, entry: &Entry, reason: SkipReason) {
        self.skipped.push(SkippedEntry {
            index: entry.index,
            name: entry.name.clone(),
            reason: reason.to_string(),
        });
    }

    /// Fold a finished entry into the totals.
    pub(crate) fn record_entry(&mut self, state: &EntryState) {
        if let Some(ref extracted) = state.extracted {
            self.files_extracted += 1;
            self.bytes_extracted += extracted.bytes_written;
        }
        if let Some(ref output) = state.output {
            self.outputs.push(output.clone());
        }
        if state.intermediate_removed {
            self.intermediates_removed += 1;
        }
    }

    /// Number of transcoded outputs.
    pub fn outputs_produced(&self) -> usize {
        self.outputs.len()
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

//! Path planner implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::types::{EntryPlan, PlanError, PlanResult, SkipReason};
use crate::archive::Entry;
use crate::models::{NamingPolicy, ProcessingConfig};
use crate::transcode::TranscodeJob;

/// Prefix of transcoded outputs under the flat policy.
const FLAT_OUTPUT_PREFIX: &str = "output_";

/// Container extension of mirrored outputs.
const MIRRORED_OUTPUT_EXTENSION: &str = "mp4";

/// Whether `entry` qualifies for transcoding under `config`.
///
/// Directories never qualify. Files qualify when their extension matches an
/// accepted extension, ignoring case.
pub fn is_candidate(entry: &Entry, config: &ProcessingConfig) -> bool {
    if entry.is_dir {
        return false;
    }

    entry
        .extension()
        .is_some_and(|ext| config.accepts_extension(ext))
}

/// Output file name for a mirrored candidate:
/// `<stem>_<width>_<height>_<speed with two decimals>.mp4`.
pub fn mirrored_output_name(base_name: &str, width: u32, height: u32, speed: f64) -> String {
    let stem = match base_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base_name,
    };

    format!(
        "{}_{}_{}_{:.2}.{}",
        stem, width, height, speed, MIRRORED_OUTPUT_EXTENSION
    )
}

/// Plans entries one at a time, remembering every path it hands out.
pub struct PathPlanner<'a> {
    config: &'a ProcessingConfig,
    /// Claimed file path -> entry name that claimed it.
    claimed: HashMap<PathBuf, String>,
}

impl<'a> PathPlanner<'a> {
    pub fn new(config: &'a ProcessingConfig) -> Self {
        Self {
            config,
            claimed: HashMap::new(),
        }
    }

    /// Plan a single entry.
    pub fn plan(&mut self, entry: &Entry) -> PlanResult<EntryPlan> {
        match self.config.policy {
            NamingPolicy::Mirrored => self.plan_mirrored(entry),
            NamingPolicy::Flat => self.plan_flat(entry),
        }
    }

    /// Number of file paths claimed so far.
    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    fn plan_mirrored(&mut self, entry: &Entry) -> PlanResult<EntryPlan> {
        let relative = entry.safe_path().ok_or_else(|| PlanError::UnsafePath {
            entry: entry.name.clone(),
        })?;
        let path = self.config.output_root.join(relative);

        if entry.is_dir {
            return Ok(EntryPlan::CreateDirectory { path });
        }

        let base_name = file_name(entry)?;
        let input = self.claim(entry, path)?;

        if !is_candidate(entry, self.config) {
            return Ok(EntryPlan::Extract { input });
        }

        let output_name = mirrored_output_name(
            base_name,
            self.config.width,
            self.config.height,
            self.config.speed_factor,
        );
        let output = input.with_file_name(output_name);
        let output = self.claim(entry, output)?;

        let job = self.job(&input, output);
        Ok(EntryPlan::Transcode { input, job })
    }

    fn plan_flat(&mut self, entry: &Entry) -> PlanResult<EntryPlan> {
        if entry.is_dir {
            return Ok(EntryPlan::Skip {
                reason: SkipReason::Directory,
            });
        }

        if !is_candidate(entry, self.config) {
            return Ok(EntryPlan::Skip {
                reason: SkipReason::NotCandidate,
            });
        }

        let base_name = file_name(entry)?;
        let config = self.config;
        let root = &config.output_root;
        let input = self.claim(entry, root.join(base_name))?;
        let output = self.claim(
            entry,
            root.join(format!("{}{}", FLAT_OUTPUT_PREFIX, base_name)),
        )?;

        let job = self.job(&input, output);
        Ok(EntryPlan::Transcode { input, job })
    }

    fn job(&self, input: &Path, output: PathBuf) -> TranscodeJob {
        TranscodeJob {
            input_path: input.to_path_buf(),
            output_path: output,
            width: self.config.width,
            height: self.config.height,
            speed_factor: self.config.speed_factor,
            drop_audio: self.config.drop_audio,
        }
    }

    fn claim(&mut self, entry: &Entry, path: PathBuf) -> PlanResult<PathBuf> {
        if let Some(previous) = self.claimed.get(&path) {
            return Err(PlanError::Collision {
                entry: entry.name.clone(),
                path,
                previous: previous.clone(),
            });
        }

        self.claimed.insert(path.clone(), entry.name.clone());
        Ok(path)
    }
}

fn file_name(entry: &Entry) -> PlanResult<&str> {
    match entry.base_name() {
        Some(name) if name != "." && name != ".." => Ok(name),
        _ => Err(PlanError::InvalidName {
            entry: entry.name.clone(),
        }),
    }
}

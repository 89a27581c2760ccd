//! Plan types produced by the path planner.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::transcode::TranscodeJob;

/// Error type for planning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The entry name is absolute or escapes the output root.
    #[error("Entry '{entry}' resolves outside the output directory")]
    UnsafePath { entry: String },

    /// The entry name has no usable file name.
    #[error("Entry '{entry}' has no usable file name")]
    InvalidName { entry: String },

    /// Two entries map to the same file.
    #[error("Entry '{entry}' would write '{}', already claimed by '{previous}'", path.display())]
    Collision {
        entry: String,
        path: PathBuf,
        previous: String,
    },
}

/// Result type for planning.
pub type PlanResult<T> = Result<T, PlanError>;

/// Why an entry produces no work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Directory entries are not materialized under the flat policy.
    Directory,
    /// Not a video candidate and the policy does not extract other files.
    NotCandidate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Directory => f.write_str("directory entry"),
            SkipReason::NotCandidate => f.write_str("not a video candidate"),
        }
    }
}

/// What to do with one archive entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryPlan {
    /// Ensure a directory exists.
    CreateDirectory { path: PathBuf },
    /// Nothing to do.
    Skip { reason: SkipReason },
    /// Extract only.
    Extract { input: PathBuf },
    /// Extract, then transcode.
    Transcode { input: PathBuf, job: TranscodeJob },
}

impl EntryPlan {
    /// Where the entry is extracted, if it is extracted at all.
    pub fn extraction_path(&self) -> Option<&Path> {
        match self {
            EntryPlan::Extract { input } | EntryPlan::Transcode { input, .. } => Some(input),
            _ => None,
        }
    }

    pub fn job(&self) -> Option<&TranscodeJob> {
        match self {
            EntryPlan::Transcode { job, .. } => Some(job),
            _ => None,
        }
    }

    pub fn is_transcode(&self) -> bool {
        matches!(self, EntryPlan::Transcode { .. })
    }
}

//! Per-entry step implementations.
//!
//! Every file entry runs through Extract → Transcode → Cleanup, and each
//! step skips itself when its plan or policy gives it nothing to do.

mod cleanup;
mod extract;
mod transcode;

pub use cleanup::CleanupStep;
pub use extract::ExtractStep;
pub use transcode::TranscodeStep;

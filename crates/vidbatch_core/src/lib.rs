//! vidbatch core - archive-driven video batch processing
//!
//! This crate contains all batch logic with no CLI dependencies: archive
//! access, path planning, extraction, the ffmpeg adapter and the
//! orchestrator that ties them together.

pub mod archive;
pub mod config;
pub mod extraction;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod planner;
pub mod transcode;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

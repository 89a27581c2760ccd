//! Placement and naming of extracted and transcoded files.
//!
//! The planner turns each archive [`Entry`](crate::archive::Entry) into an
//! [`EntryPlan`] under the configured [`NamingPolicy`](crate::models::NamingPolicy):
//!
//! ```text
//! entry a/b/clip.mp4, 540x410 @ 0.50
//!
//! Mirrored:  <root>/a/b/clip.mp4  ->  <root>/a/b/clip_540_410_0.50.mp4
//! Flat:      <root>/clip.mp4      ->  <root>/output_clip.mp4   (input removed)
//! ```
//!
//! Every path handed out during a run is remembered, so two entries can never
//! be planned onto the same file.

mod path_planner;
mod types;

pub use path_planner::{is_candidate, mirrored_output_name, PathPlanner};
pub use types::{EntryPlan, PlanError, PlanResult, SkipReason};

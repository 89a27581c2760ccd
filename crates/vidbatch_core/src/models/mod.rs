//! Shared data models used across the batch pipeline.

mod enums;
mod processing;

pub use enums::NamingPolicy;
pub use processing::{
    ConfigValidationError, ProcessingConfig, DEFAULT_HEIGHT, DEFAULT_SPEED_FACTOR, DEFAULT_WIDTH,
};

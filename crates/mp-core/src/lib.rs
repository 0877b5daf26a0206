//! mp-core: shared types and errors for media source inspection.
//!
//! Provides the requirement and header inputs of an inspection, the stream
//! descriptors parsed from probe output, the three-way [`InspectionResult`],
//! tool/probe configuration sections, and the unified [`Error`].

pub mod config;
pub mod error;
pub mod media;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use media::*;

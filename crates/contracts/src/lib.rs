//! # Contracts
//!
//! Frozen interface contracts shared by every scanner crate.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Angle Model
//! - `theta` (angle1) is the pitch-like axis, `phi` (angle2) the yaw-like axis
//! - Angles travel as whole degrees exactly as the controller reports them
//! - Distances and cartesian coordinates are centimeters

mod blueprint;
mod error;
mod line_source;
mod sample;
mod scan;
mod sink;

pub use blueprint::*;
pub use error::*;
pub use line_source::LineSource;
pub use sample::*;
pub use scan::*;
pub use sink::{ScanSink, SinkStage};

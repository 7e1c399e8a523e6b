//! Scan pipeline orchestration.

mod orchestrator;
mod stats;

pub use orchestrator::{run_live, run_replay};
pub use stats::{RunMode, RunStats};

//! ScanSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for persistence and rendering sinks.

use std::path::PathBuf;

use crate::{ContractError, FinishedScan};

/// Order in which the dispatcher visits sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SinkStage {
    /// Writes scan data to disk
    Persistence,
    /// Produces a visual
    Rendering,
    /// Diagnostics only
    Report,
}

/// Data output trait
///
/// All sink implementations must implement this trait. Sinks receive a shared
/// reference; the finalized scan is never mutated after hand-off.
pub trait ScanSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Dispatch stage
    fn stage(&self) -> SinkStage;

    /// Write finalized scan
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn write(&mut self, scan: &FinishedScan) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    /// Files produced so far
    fn written_paths(&self) -> &[PathBuf] {
        &[]
    }
}

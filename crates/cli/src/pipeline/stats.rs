//! Run statistics.

use std::path::PathBuf;
use std::time::Duration;

use observability::ScanMetricsAggregator;

/// Where the scan came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Live acquisition over a transport
    Live,
    /// Saved scan replayed offline
    Replay,
}

/// Statistics from one scan or replay
#[derive(Debug, Clone)]
pub struct RunStats {
    pub mode: RunMode,

    /// Transport or file the samples came from
    pub source: String,

    pub duration: Duration,

    /// Session counters
    pub metrics: ScanMetricsAggregator,

    /// Files written by the sinks
    pub written: Vec<PathBuf>,

    /// Sinks whose write failed
    pub failed_sinks: Vec<String>,
}

impl RunStats {
    pub fn new(mode: RunMode, source: impl Into<String>) -> Self {
        Self {
            mode,
            source: source.into(),
            duration: Duration::ZERO,
            metrics: ScanMetricsAggregator::new(),
            written: Vec::new(),
            failed_sinks: Vec::new(),
        }
    }

    /// Samples per second over the run
    pub fn sample_rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.metrics.accepted as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        let mode = match self.mode {
            RunMode::Live => "live scan",
            RunMode::Replay => "replay",
        };
        println!();
        println!("Source: {} ({})", self.source, mode);
        println!(
            "Duration: {:.2}s ({:.1} samples/s)",
            self.duration.as_secs_f64(),
            self.sample_rate()
        );
        print!("{}", self.metrics.summary());

        if !self.written.is_empty() {
            println!("Files written:");
            for path in &self.written {
                println!("  {}", path.display());
            }
        }
        if !self.failed_sinks.is_empty() {
            println!("Failed sinks: {}", self.failed_sinks.join(", "));
        }
        println!();
    }
}

//! LogSink - logs scan summary via tracing

use contracts::{Axis, ContractError, FinishedScan, ScanSink, SinkStage};
use tracing::{info, instrument};

/// Sink that logs scan summaries
#[derive(Debug)]
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_scan_summary(&self, scan: &FinishedScan) {
        let extent = |axis: Axis| {
            scan.points()
                .map(|p| p.coordinate(axis))
                .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                    None => Some((v, v)),
                    Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                })
        };

        info!(
            sink = %self.name,
            storage = ?scan.storage,
            plot_mode = ?scan.plot_mode,
            rows = scan.rows.len(),
            points = scan.len(),
            x_extent = ?extent(Axis::X),
            y_extent = ?extent(Axis::Y),
            z_extent = ?extent(Axis::Z),
            "Scan finalized"
        );
    }
}

impl ScanSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn stage(&self) -> SinkStage {
        SinkStage::Report
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, scan),
        fields(sink = %self.name, points = scan.len())
    )]
    fn write(&mut self, scan: &FinishedScan) -> Result<(), ContractError> {
        self.log_scan_summary(scan);
        Ok(())
    }
}

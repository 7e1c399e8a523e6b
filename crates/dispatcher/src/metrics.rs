//! Per-sink write counters

use observability::record_sink_write;

/// Metrics for a single sink
#[derive(Debug, Default, Clone)]
pub struct SinkMetrics {
    write_count: u64,
    failure_count: u64,
    files_written: usize,
}

impl SinkMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }

    pub fn files_written(&self) -> usize {
        self.files_written
    }

    pub(crate) fn record_success(&mut self, sink_name: &str, files_written: usize) {
        self.write_count += 1;
        self.files_written = files_written;
        record_sink_write(sink_name, true);
    }

    pub(crate) fn record_failure(&mut self, sink_name: &str) {
        self.failure_count += 1;
        record_sink_write(sink_name, false);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            write_count: self.write_count,
            failure_count: self.failure_count,
            files_written: self.files_written,
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub write_count: u64,
    pub failure_count: u64,
    pub files_written: usize,
}

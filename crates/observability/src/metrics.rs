//! Scan metrics
//!
//! Counters go through the `metrics` facade; `ScanMetricsAggregator` keeps the
//! same counts in memory for the run summary.

use std::collections::BTreeMap;

use metrics::{counter, gauge};

/// Record one line read from the transport (data or control)
pub fn record_line_received() {
    counter!("ir_scanner_lines_total").increment(1);
}

/// Record a sample that made it into the point cloud
pub fn record_sample_accepted() {
    counter!("ir_scanner_samples_accepted_total").increment(1);
}

/// Record a dropped sample, labeled by error kind
pub fn record_sample_dropped(reason: &'static str) {
    counter!("ir_scanner_samples_dropped_total", "reason" => reason).increment(1);
}

/// Current number of records held by the cloud
pub fn record_cloud_points(points: usize) {
    gauge!("ir_scanner_cloud_points").set(points as f64);
}

/// Record a finalized scan
pub fn record_scan_completed(points: usize) {
    counter!("ir_scanner_scans_completed_total").increment(1);
    record_cloud_points(points);
}

/// Record a sink write outcome
pub fn record_sink_write(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "ir_scanner_sink_writes_total",
        "sink" => sink_name.to_string(),
        "status" => status
    )
    .increment(1);
}

/// In-memory scan counters
#[derive(Debug, Clone, Default)]
pub struct ScanMetricsAggregator {
    /// Lines read, control lines included
    pub lines: u64,

    /// Samples stored in the cloud
    pub accepted: u64,

    /// Samples rejected by the spatial filter
    pub filtered: u64,

    /// Dropped samples per error kind
    pub dropped: BTreeMap<String, u64>,

    /// Lines ignored outside an active scan
    pub ignored: u64,

    /// Finalized scans
    pub scans_completed: u64,

    /// Records in the last finalized cloud
    pub stored_points: usize,

    /// Calibrated distance of accepted samples (cm)
    pub distance_stats: RunningStats,
}

impl ScanMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_line(&mut self) {
        self.lines += 1;
        record_line_received();
    }

    pub fn record_accepted(&mut self, distance: f64) {
        self.accepted += 1;
        self.distance_stats.push(distance);
        record_sample_accepted();
    }

    pub fn record_dropped(&mut self, reason: &'static str) {
        *self.dropped.entry(reason.to_string()).or_insert(0) += 1;
        record_sample_dropped(reason);
    }

    pub fn record_filtered(&mut self) {
        self.filtered += 1;
        record_sample_dropped("filtered");
    }

    pub fn record_ignored(&mut self) {
        self.ignored += 1;
    }

    pub fn record_completed(&mut self, points: usize) {
        self.scans_completed += 1;
        self.stored_points = points;
        record_scan_completed(points);
    }

    pub fn total_dropped(&self) -> u64 {
        self.dropped.values().sum()
    }

    /// Snapshot for reporting
    pub fn summary(&self) -> MetricsSummary {
        let total_dropped = self.total_dropped();
        let offered = self.accepted + total_dropped;
        MetricsSummary {
            lines: self.lines,
            accepted: self.accepted,
            filtered: self.filtered,
            total_dropped,
            drop_rate: if offered > 0 {
                total_dropped as f64 / offered as f64 * 100.0
            } else {
                0.0
            },
            dropped_by_reason: self.dropped.clone(),
            ignored: self.ignored,
            scans_completed: self.scans_completed,
            stored_points: self.stored_points,
            distance_cm: StatsSummary::from(&self.distance_stats),
        }
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub lines: u64,
    pub accepted: u64,
    pub filtered: u64,
    pub total_dropped: u64,
    pub drop_rate: f64,
    pub dropped_by_reason: BTreeMap<String, u64>,
    pub ignored: u64,
    pub scans_completed: u64,
    pub stored_points: usize,
    pub distance_cm: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Scan Summary ===")?;
        writeln!(f, "Lines read: {}", self.lines)?;
        writeln!(f, "Samples accepted: {}", self.accepted)?;
        writeln!(
            f,
            "Samples dropped: {} ({:.2}%)",
            self.total_dropped, self.drop_rate
        )?;
        for (reason, count) in &self.dropped_by_reason {
            writeln!(f, "  {}: {}", reason, count)?;
        }
        if self.filtered > 0 {
            writeln!(f, "Filtered out: {}", self.filtered)?;
        }
        if self.ignored > 0 {
            writeln!(f, "Ignored lines: {}", self.ignored)?;
        }
        writeln!(f, "Scans completed: {}", self.scans_completed)?;
        writeln!(f, "Stored points: {}", self.stored_points)?;
        writeln!(f, "Distance (cm): {}", self.distance_cm)?;
        Ok(())
    }
}

/// Summary of a `RunningStats`
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.2}, max={:.2}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_counts() {
        let mut stats = ScanMetricsAggregator::new();
        for _ in 0..5 {
            stats.record_line();
        }
        stats.record_accepted(20.0);
        stats.record_accepted(30.0);
        stats.record_dropped("malformed_message");
        stats.record_dropped("malformed_message");
        stats.record_dropped("index_out_of_range");
        stats.record_completed(2);

        let summary = stats.summary();
        assert_eq!(summary.lines, 5);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.total_dropped, 3);
        assert_eq!(summary.dropped_by_reason.get("malformed_message"), Some(&2));
        assert!((summary.drop_rate - 60.0).abs() < 1e-10);
        assert!((summary.distance_cm.mean - 25.0).abs() < 1e-10);
        assert_eq!(summary.scans_completed, 1);
        assert_eq!(summary.stored_points, 2);
    }

    #[test]
    fn test_filtered_not_counted_as_error() {
        let mut stats = ScanMetricsAggregator::new();
        stats.record_filtered();
        assert_eq!(stats.filtered, 1);
        assert_eq!(stats.total_dropped(), 0);
    }

    #[test]
    fn test_summary_display() {
        let mut stats = ScanMetricsAggregator::new();
        stats.record_line();
        stats.record_accepted(12.5);
        stats.record_dropped("calibration_singularity");

        let output = stats.summary().to_string();
        assert!(output.contains("Lines read: 1"));
        assert!(output.contains("50.00%"));
        assert!(output.contains("calibration_singularity: 1"));
    }

    #[test]
    fn test_empty_summary() {
        let output = ScanMetricsAggregator::new().summary().to_string();
        assert!(output.contains("Distance (cm): N/A"));
    }
}

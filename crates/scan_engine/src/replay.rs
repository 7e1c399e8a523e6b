//! Offline replay: rebuild a filtered cloud from saved raw samples

use contracts::{FinishedScan, GridConfig, PlotMode, RawSample, ScanBlueprint, StorageMode};
use measurement::{Measurement, SpatialFilter};
use observability::ScanMetricsAggregator;
use point_cloud::PointCloud;
use tracing::{debug, info, warn};

/// Calibrates, projects and filters replayed samples.
///
/// Replay always builds a sequential cloud in file order.
#[derive(Debug)]
pub struct ReplayProcessor {
    measurement: Measurement,
    filter: SpatialFilter,
    plot_mode: PlotMode,
    stats: ScanMetricsAggregator,
}

impl ReplayProcessor {
    pub fn new(blueprint: &ScanBlueprint) -> Self {
        Self {
            measurement: Measurement::from_blueprint(blueprint),
            filter: SpatialFilter::from_config(&blueprint.filter),
            plot_mode: blueprint.session.plot_mode,
            stats: ScanMetricsAggregator::new(),
        }
    }

    pub fn with_filter(mut self, filter: SpatialFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Keep every finite point
    pub fn without_filter(self) -> Self {
        self.with_filter(SpatialFilter::pass_through())
    }

    pub fn filter(&self) -> &SpatialFilter {
        &self.filter
    }

    pub fn stats(&self) -> &ScanMetricsAggregator {
        &self.stats
    }

    /// Count rows the reader rejected before any sample reached the processor
    pub fn record_malformed_rows(&mut self, rows: usize) {
        for _ in 0..rows {
            self.stats.record_line();
            self.stats.record_dropped("malformed_message");
        }
    }

    pub fn process<I>(&mut self, samples: I) -> FinishedScan
    where
        I: IntoIterator<Item = RawSample>,
    {
        let mut cloud = PointCloud::new(StorageMode::Sequential, &GridConfig::default());

        for raw in samples {
            self.stats.record_line();
            let record = match self.measurement.measure(raw) {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "Replay sample dropped");
                    self.stats.record_dropped(e.kind());
                    continue;
                }
            };

            if !self.filter.accept(&record.point) {
                debug!(
                    theta = raw.theta,
                    phi = raw.phi,
                    axis = %self.filter.axis(),
                    value = record.point.coordinate(self.filter.axis()),
                    "Filtered out"
                );
                self.stats.record_filtered();
                continue;
            }

            if cloud.insert(record).is_ok() {
                self.stats.record_accepted(record.sample.distance);
            }
        }

        let scan = cloud.finalize(self.plot_mode);
        self.stats.record_completed(scan.len());
        info!(
            points = scan.len(),
            filtered = self.stats.filtered,
            dropped = self.stats.total_dropped(),
            "Replay processed"
        );
        scan
    }
}

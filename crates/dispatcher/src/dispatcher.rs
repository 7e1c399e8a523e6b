//! Dispatcher - hands a finished scan to every sink in stage order

use std::path::PathBuf;

use contracts::{
    ContractError, FinishedScan, OutputConfig, ScanSink, SinkConfig, SinkStage, SinkType,
};
use tracing::{debug, info, instrument, warn};

use crate::error::DispatcherError;
use crate::metrics::{MetricsSnapshot, SinkMetrics};
use crate::sinks::{CsvFileSink, CsvSinkConfig, LogSink, SvgPlotSink, SvgSinkConfig};

/// Create a sink from configuration
#[instrument(
    name = "dispatcher_create_sink",
    skip(config, output),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
pub fn create_sink(
    config: &SinkConfig,
    output: &OutputConfig,
) -> Result<Box<dyn ScanSink>, DispatcherError> {
    match config.sink_type {
        SinkType::Log => Ok(Box::new(LogSink::new(&config.name))),
        SinkType::Csv => {
            let sink_config = CsvSinkConfig::from_params(&config.name, &config.params, output)?;
            let sink = CsvFileSink::new(&config.name, sink_config)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            Ok(Box::new(sink))
        }
        SinkType::Svg => {
            let sink_config = SvgSinkConfig::from_params(&config.name, &config.params, output)?;
            let sink = SvgPlotSink::new(&config.name, sink_config)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            Ok(Box::new(sink))
        }
    }
}

struct SinkEntry {
    sink: Box<dyn ScanSink>,
    metrics: SinkMetrics,
}

/// Result of one sink write
#[derive(Debug)]
pub struct SinkOutcome {
    pub sink: String,
    pub stage: SinkStage,
    pub result: Result<(), ContractError>,
}

/// Outcome of dispatching one scan
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<SinkOutcome>,
    /// Files produced by this dispatch
    pub written: Vec<PathBuf>,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &SinkOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Fans a finished scan out to sinks: persistence, then rendering, then report
pub struct Dispatcher {
    entries: Vec<SinkEntry>,
}

impl Dispatcher {
    /// Create a dispatcher over the given sinks.
    ///
    /// Sinks are ordered by stage; within a stage configuration order is kept.
    pub fn new(sinks: Vec<Box<dyn ScanSink>>) -> Self {
        let mut entries: Vec<_> = sinks
            .into_iter()
            .map(|sink| SinkEntry {
                sink,
                metrics: SinkMetrics::new(),
            })
            .collect();
        entries.sort_by_key(|e| e.sink.stage());
        Self { entries }
    }

    /// Build every configured sink
    #[instrument(name = "dispatcher_from_configs", skip_all, fields(sink_count = configs.len()))]
    pub fn from_configs(
        configs: &[SinkConfig],
        output: &OutputConfig,
    ) -> Result<Self, DispatcherError> {
        let sinks = configs
            .iter()
            .map(|config| create_sink(config, output))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(sinks))
    }

    /// Keep only sinks of the given stages
    pub fn retain_stages(&mut self, stages: &[SinkStage]) {
        self.entries.retain(|e| stages.contains(&e.sink.stage()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sink names in dispatch order
    pub fn sink_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.sink.name()).collect()
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.entries
            .iter()
            .map(|e| (e.sink.name().to_string(), e.metrics.snapshot()))
            .collect()
    }

    /// Write the scan to every sink.
    ///
    /// A failing sink does not stop later sinks; failures are collected in
    /// the report.
    #[instrument(name = "dispatcher_dispatch", skip_all, fields(points = scan.len()))]
    pub fn dispatch(&mut self, scan: &FinishedScan) -> DispatchReport {
        let mut report = DispatchReport::default();

        for entry in &mut self.entries {
            let name = entry.sink.name().to_string();
            let stage = entry.sink.stage();
            let before = entry.sink.written_paths().len();

            let result = entry.sink.write(scan).and_then(|()| entry.sink.flush());
            match &result {
                Ok(()) => {
                    let paths = entry.sink.written_paths();
                    report.written.extend_from_slice(&paths[before.min(paths.len())..]);
                    entry.metrics.record_success(&name, paths.len());
                    debug!(sink = %name, stage = ?stage, "Sink write complete");
                }
                Err(e) => {
                    entry.metrics.record_failure(&name);
                    warn!(sink = %name, stage = ?stage, error = %e, "Sink write failed");
                }
            }
            report.outcomes.push(SinkOutcome {
                sink: name,
                stage,
                result,
            });
        }

        info!(
            sinks = report.outcomes.len(),
            files = report.written.len(),
            failed = report.failures().count(),
            "Scan dispatched"
        );
        report
    }
}

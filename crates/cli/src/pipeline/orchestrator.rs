//! Scan orchestration: source -> session -> dispatcher.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{LineSource, ScanBlueprint, SinkStage};
use dispatcher::{DispatchReport, Dispatcher};
use ingestion::ReplayFile;
use scan_engine::{run_session, ReplayProcessor, ScanSession};
use tracing::{info, instrument};

use super::stats::{RunMode, RunStats};

/// Acquire one scan from a live source and hand it to every sink
#[instrument(name = "pipeline_live", skip_all, fields(source = %source.name()))]
pub fn run_live(blueprint: &ScanBlueprint, source: &mut dyn LineSource) -> Result<RunStats> {
    let mut dispatcher = Dispatcher::from_configs(&blueprint.sinks, &blueprint.output)
        .context("Failed to create sinks")?;

    let started = Instant::now();
    let mut stats = RunStats::new(RunMode::Live, source.name());
    let mut session = ScanSession::new(blueprint);

    info!(
        start = %blueprint.session.start_sentinel,
        end = %blueprint.session.end_sentinel,
        "Ready to scan, waiting for start signal"
    );
    let result = run_session(source, &mut session);
    stats.metrics = session.stats().clone();
    let scan = result.context("Scan did not complete")?;

    let report = dispatcher.dispatch(&scan);
    apply_report(&mut stats, report);
    stats.duration = started.elapsed();
    Ok(stats)
}

/// Rebuild a saved scan, filter it and hand it to the rendering sinks
#[instrument(name = "pipeline_replay", skip(blueprint))]
pub fn run_replay(blueprint: &ScanBlueprint, path: &Path, apply_filter: bool) -> Result<RunStats> {
    let started = Instant::now();
    let replay = ReplayFile::load(path)?;

    let mut processor = ReplayProcessor::new(blueprint);
    if !apply_filter {
        processor = processor.without_filter();
    }
    info!(
        samples = replay.samples.len(),
        malformed_rows = replay.malformed_rows,
        filter = processor.filter().is_enabled(),
        "Replaying saved scan"
    );
    processor.record_malformed_rows(replay.malformed_rows);
    let scan = processor.process(replay.samples);

    let mut dispatcher = Dispatcher::from_configs(&blueprint.sinks, &blueprint.output)
        .context("Failed to create sinks")?;
    dispatcher.retain_stages(&[SinkStage::Rendering, SinkStage::Report]);

    let mut stats = RunStats::new(RunMode::Replay, path.display().to_string());
    stats.metrics = processor.stats().clone();
    let report = dispatcher.dispatch(&scan);
    apply_report(&mut stats, report);
    stats.duration = started.elapsed();
    Ok(stats)
}

fn apply_report(stats: &mut RunStats, report: DispatchReport) {
    stats.failed_sinks = report.failures().map(|o| o.sink.clone()).collect();
    stats.written = report.written;
}

//! # Observability
//!
//! Tracing initialization and scan metrics.
//!
//! ## Features
//!
//! - Tracing subscriber with JSON / Pretty / Compact output
//! - `metrics` facade counters for lines, samples and scans
//! - In-memory aggregation for the end-of-run summary
//!
//! No metrics exporter is installed here. An embedding program may install
//! any `metrics` recorder before the session starts.
//!
//! ## Usage Example
//!
//! ```ignore
//! use observability::{init_with_config, ObservabilityConfig, ScanMetricsAggregator};
//!
//! init_with_config(ObservabilityConfig::default())?;
//!
//! let mut stats = ScanMetricsAggregator::new();
//! stats.record_line();
//! stats.record_accepted(23.4);
//! println!("{}", stats.summary());
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{
    record_cloud_points, record_line_received, record_sample_accepted, record_sample_dropped,
    record_scan_completed, record_sink_write, MetricsSummary, RunningStats,
    ScanMetricsAggregator, StatsSummary,
};

/// Initialize tracing with defaults (pretty output, `info` level)
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

/// Observability settings
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Output format
    pub log_format: LogFormat,
    /// Level used when `RUST_LOG` is unset
    pub default_log_level: String,
    /// Ignore `RUST_LOG` and use `default_log_level` (quiet mode)
    pub force_level: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            default_log_level: "info".to_string(),
            force_level: false,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON lines
    Json,
    /// Human readable, multi-line
    #[default]
    Pretty,
    /// Single line per event
    Compact,
}

/// Initialize tracing with a custom configuration
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = if config.force_level {
        EnvFilter::new(&config.default_log_level)
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level))
    };

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        log_format = ?config.log_format,
        level = %config.default_log_level,
        "Observability initialized"
    );

    Ok(())
}

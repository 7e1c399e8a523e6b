//! # Dispatcher
//!
//! Output side of the scanner.
//!
//! Responsibilities:
//! - Build sinks from `[[sinks]]` configuration
//! - Hand each `FinishedScan` to persistence, then rendering, then report sinks
//! - Keep going when one sink fails, and report what was written

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod sinks;

pub use contracts::{FinishedScan, ScanSink, SinkStage};
pub use dispatcher::{create_sink, DispatchReport, Dispatcher, SinkOutcome};
pub use error::DispatcherError;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{CsvFileSink, LogSink, SvgPlotSink};

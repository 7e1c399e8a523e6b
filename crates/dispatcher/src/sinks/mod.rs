//! Sink implementations
//!
//! Contains CsvFileSink, SvgPlotSink, and LogSink.

mod csv_file;
mod log;
mod svg_plot;

pub use self::csv_file::{CsvFileSink, CsvSinkConfig};
pub use self::log::LogSink;
pub use self::svg_plot::{AxisRange, PlotLimits, SvgPlotSink, SvgSinkConfig};

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::error::DispatcherError;

/// Next free suffix for `{prefix}{n}.{extension}` in `dir`.
///
/// Returns one past the highest existing suffix, or 0 for an empty or
/// missing directory. Files whose stem is not `prefix` followed by digits
/// are ignored.
pub fn next_file_index(dir: &Path, prefix: &str, extension: &str) -> io::Result<u32> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut next = 0;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let index = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.strip_prefix(prefix))
            .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|s| s.parse::<u32>().ok());
        if let Some(index) = index {
            next = next.max(index.saturating_add(1));
        }
    }
    Ok(next)
}

/// Typed lookup in a sink's `params` table
pub(crate) fn param_or<T: FromStr>(
    sink_name: &str,
    params: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, DispatcherError> {
    match params.get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            DispatcherError::sink_creation(sink_name, format!("invalid value for '{key}': {raw:?}"))
        }),
    }
}

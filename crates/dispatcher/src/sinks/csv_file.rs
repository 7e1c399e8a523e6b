//! CsvFileSink - numbered CSV files per scan

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use contracts::{
    ContractError, FinishedScan, OutputConfig, PointRow, RawRow, ScanSink, SinkStage,
};
use tracing::{debug, error, info, instrument};

use super::{next_file_index, param_or};
use crate::error::DispatcherError;

const RAW_HEADER: [&str; 3] = ["theta", "phi", "raw_reading"];
const POINT_HEADER: [&str; 3] = ["x", "y", "z"];

/// Configuration for CsvFileSink
#[derive(Debug, Clone)]
pub struct CsvSinkConfig {
    /// Output directory
    pub directory: PathBuf,
    /// File name stem before the numeric suffix
    pub file_prefix: String,
    /// Also write `{prefix}{n}_points.csv`
    pub write_points: bool,
}

impl CsvSinkConfig {
    /// Build from sink params, falling back to the output section.
    ///
    /// Params: `directory`, `file_prefix`, `write_points`.
    pub fn from_params(
        sink_name: &str,
        params: &HashMap<String, String>,
        output: &OutputConfig,
    ) -> Result<Self, DispatcherError> {
        Ok(Self {
            directory: params
                .get("directory")
                .map(PathBuf::from)
                .unwrap_or_else(|| output.directory.clone()),
            file_prefix: params
                .get("file_prefix")
                .cloned()
                .unwrap_or_else(|| output.file_prefix.clone()),
            write_points: param_or(sink_name, params, "write_points", false)?,
        })
    }
}

/// Sink that persists each scan as `{prefix}{n}.csv`
#[derive(Debug)]
pub struct CsvFileSink {
    name: String,
    config: CsvSinkConfig,
    written: Vec<PathBuf>,
}

impl CsvFileSink {
    /// Create a new CsvFileSink, creating the output directory
    pub fn new(name: impl Into<String>, config: CsvSinkConfig) -> std::io::Result<Self> {
        fs::create_dir_all(&config.directory)?;
        Ok(Self {
            name: name.into(),
            config,
            written: Vec::new(),
        })
    }

    pub fn config(&self) -> &CsvSinkConfig {
        &self.config
    }

    fn persist(&mut self, scan: &FinishedScan) -> Result<(), csv::Error> {
        let index = next_file_index(&self.config.directory, &self.config.file_prefix, "csv")?;
        let stem = format!("{}{}", self.config.file_prefix, index);

        let raw_path = self.config.directory.join(format!("{stem}.csv"));
        write_rows(&raw_path, RAW_HEADER, scan.rows.iter().map(RawRow::from))?;
        info!(sink = %self.name, path = %raw_path.display(), rows = scan.rows.len(), "Raw scan saved");
        self.written.push(raw_path);

        if self.config.write_points {
            let points_path = self.config.directory.join(format!("{stem}_points.csv"));
            write_rows(&points_path, POINT_HEADER, scan.points().map(PointRow::from))?;
            debug!(sink = %self.name, path = %points_path.display(), "Points saved");
            self.written.push(points_path);
        }
        Ok(())
    }
}

/// Header is written explicitly so an empty scan still gets one
fn write_rows<R, I>(path: &Path, header: [&str; 3], rows: I) -> Result<(), csv::Error>
where
    R: serde::Serialize,
    I: IntoIterator<Item = R>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

impl ScanSink for CsvFileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn stage(&self) -> SinkStage {
        SinkStage::Persistence
    }

    #[instrument(
        name = "csv_sink_write",
        skip(self, scan),
        fields(sink = %self.name, points = scan.len())
    )]
    fn write(&mut self, scan: &FinishedScan) -> Result<(), ContractError> {
        self.persist(scan).map_err(|e| {
            error!(sink = %self.name, error = %e, "Write failed");
            ContractError::sink_write(&self.name, e.to_string())
        })
    }

    fn written_paths(&self) -> &[PathBuf] {
        &self.written
    }
}

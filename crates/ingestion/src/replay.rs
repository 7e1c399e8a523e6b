//! Replay reader - loads a saved scan for offline processing
//!
//! Two layouts are accepted:
//! - canonical CSV with a `theta,phi,raw_reading` header
//! - the legacy free-text list `[[30, 45, 512], [31, 45, 498], ...]`,
//!   read by stripping brackets and consuming values three at a time

use std::fs;
use std::path::{Path, PathBuf};

use contracts::{ContractError, RawRow, RawSample};
use tracing::{debug, info, warn};

use crate::codec::FIELD_COUNT;

const CSV_HEADER: [&str; FIELD_COUNT] = ["theta", "phi", "raw_reading"];

/// Layout detected in a replay file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayFormat {
    Csv,
    LegacyList,
}

/// Samples loaded from a saved scan
#[derive(Debug, Clone)]
pub struct ReplayFile {
    pub path: PathBuf,
    pub format: ReplayFormat,
    pub samples: Vec<RawSample>,
    /// Grid cells persisted without a reading
    pub unset_rows: usize,
    /// Rows skipped because they did not hold three integers
    pub malformed_rows: usize,
}

impl ReplayFile {
    /// Load a saved scan.
    ///
    /// # Errors
    /// - `FileNotFound` with the attempted path
    /// - `MalformedMessage` for a wrong CSV header or a trailing partial
    ///   legacy row; individual bad rows are skipped and counted
    pub fn load(path: &Path) -> Result<Self, ContractError> {
        if !path.is_file() {
            return Err(ContractError::file_not_found(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let replay = Self::parse(path, &content)?;

        info!(
            path = %path.display(),
            format = ?replay.format,
            samples = replay.samples.len(),
            unset_rows = replay.unset_rows,
            malformed_rows = replay.malformed_rows,
            "Loaded replay file"
        );
        Ok(replay)
    }

    /// Parse already-read file content
    pub fn parse(path: &Path, content: &str) -> Result<Self, ContractError> {
        let format = detect_format(content);
        debug!(path = %path.display(), format = ?format, "Detected replay format");

        let mut replay = Self {
            path: path.to_path_buf(),
            format,
            samples: Vec::new(),
            unset_rows: 0,
            malformed_rows: 0,
        };
        match format {
            ReplayFormat::Csv => replay.read_csv(content)?,
            ReplayFormat::LegacyList => replay.read_legacy(content)?,
        }
        Ok(replay)
    }

    fn read_csv(&mut self, content: &str) -> Result<(), ContractError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ContractError::malformed(self.location(1), e.to_string()))?;
        if headers.iter().ne(CSV_HEADER) {
            return Err(ContractError::malformed(
                self.location(1),
                format!("expected header {}, found {:?}", CSV_HEADER.join(","), headers),
            ));
        }

        for result in reader.deserialize::<RawRow>() {
            match result {
                Ok(row) => match row.sample() {
                    Some(sample) => self.samples.push(sample),
                    None => self.unset_rows += 1,
                },
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or_default();
                    warn!(location = %self.location(line), error = %e, "Skipping malformed row");
                    self.malformed_rows += 1;
                }
            }
        }
        Ok(())
    }

    fn read_legacy(&mut self, content: &str) -> Result<(), ContractError> {
        let cleaned = content.replace(['[', ']'], "");
        let values: Vec<&str> = cleaned
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();

        let chunks = values.chunks_exact(FIELD_COUNT);
        if !chunks.remainder().is_empty() {
            return Err(ContractError::malformed(
                self.path.display().to_string(),
                format!(
                    "{} values is not a whole number of {FIELD_COUNT}-value rows",
                    values.len()
                ),
            ));
        }

        for (index, chunk) in chunks.enumerate() {
            let parsed: Result<Vec<i32>, String> =
                chunk.iter().map(|v| parse_legacy_value(v)).collect();
            match parsed {
                Ok(fields) => self
                    .samples
                    .push(RawSample::new(fields[0], fields[1], fields[2])),
                Err(reason) => {
                    warn!(path = %self.path.display(), row = index, reason = %reason, "Skipping malformed row");
                    self.malformed_rows += 1;
                }
            }
        }
        Ok(())
    }

    fn location(&self, line: u64) -> String {
        format!("{}:{line}", self.path.display())
    }
}

fn detect_format(content: &str) -> ReplayFormat {
    if content.trim_start().starts_with('[') {
        ReplayFormat::LegacyList
    } else {
        ReplayFormat::Csv
    }
}

/// Legacy files may hold integers written as floats (`512.0`)
fn parse_legacy_value(value: &str) -> Result<i32, String> {
    if let Ok(v) = value.parse::<i32>() {
        return Ok(v);
    }
    let float: f64 = value
        .parse()
        .map_err(|_| format!("not a number: {value:?}"))?;
    if float.fract() != 0.0 || float < f64::from(i32::MIN) || float > f64::from(i32::MAX) {
        return Err(format!("not a whole reading: {value:?}"));
    }
    Ok(float as i32)
}

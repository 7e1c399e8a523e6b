//! FinishedScan - Scan Session output
//!
//! Read-only snapshot of a finalized point cloud, handed to sinks.

use serde::{Deserialize, Serialize};

use crate::{CartesianPoint, PlotMode, RawSample, ScanRecord, StorageMode};

/// Dimensions of a grid-mode cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    /// Cells along theta
    pub rows: usize,
    /// Cells along phi
    pub cols: usize,
}

impl GridShape {
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

/// One persisted row
///
/// Sequential clouds produce one row per stored record. Grid clouds produce one
/// row per cell in row-major order; unset cells have no record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanRow {
    pub theta: i32,
    pub phi: i32,
    pub record: Option<ScanRecord>,
}

impl ScanRow {
    pub fn raw_reading(&self) -> Option<i32> {
        self.record.map(|r| r.sample.raw.raw_reading)
    }

    pub fn point(&self) -> Option<CartesianPoint> {
        self.record.map(|r| r.point)
    }
}

/// Canonical on-disk raw row: `theta,phi,raw_reading`
///
/// `raw_reading` is empty for grid cells that were never written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub theta: i32,
    pub phi: i32,
    pub raw_reading: Option<i32>,
}

impl From<&ScanRow> for RawRow {
    fn from(row: &ScanRow) -> Self {
        Self {
            theta: row.theta,
            phi: row.phi,
            raw_reading: row.raw_reading(),
        }
    }
}

impl RawRow {
    /// Sample carried by the row, if the reading is present
    pub fn sample(&self) -> Option<RawSample> {
        self.raw_reading
            .map(|raw| RawSample::new(self.theta, self.phi, raw))
    }
}

/// Canonical on-disk point row: `x,y,z`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRow {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<CartesianPoint> for PointRow {
    fn from(p: CartesianPoint) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

/// Finalized scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedScan {
    /// Layout the rows came from
    pub storage: StorageMode,

    /// Requested plot dimensionality
    pub plot_mode: PlotMode,

    /// Grid dimensions (grid mode only)
    pub shape: Option<GridShape>,

    /// Rows in store iteration order
    pub rows: Vec<ScanRow>,
}

impl FinishedScan {
    /// Stored records in row order, skipping unset grid cells
    pub fn records(&self) -> impl Iterator<Item = &ScanRecord> {
        self.rows.iter().filter_map(|row| row.record.as_ref())
    }

    pub fn points(&self) -> impl Iterator<Item = CartesianPoint> + '_ {
        self.records().map(|r| r.point)
    }

    pub fn raw_samples(&self) -> impl Iterator<Item = RawSample> + '_ {
        self.records().map(|r| r.raw())
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

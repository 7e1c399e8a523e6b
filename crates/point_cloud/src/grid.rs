//! Fixed 2D lattice indexed by sweep angle
//!
//! Cell `(row, col)` holds the sample whose angles satisfy
//! `row = floor((theta - theta_start) / resolution)` and
//! `col = floor((phi - phi_start) / resolution)`. Cells start unset and a
//! later write to the same cell replaces the earlier one.

use std::fmt;

use contracts::{ContractError, GridConfig, GridShape, ScanRecord, ScanRow};
use tracing::debug;

#[derive(Clone)]
pub struct GridCloud {
    shape: GridShape,
    resolution: i64,
    theta_start: i64,
    phi_start: i64,
    cells: Vec<Option<ScanRecord>>,
    occupied: usize,
    overwrites: u64,
}

impl fmt::Debug for GridCloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridCloud")
            .field("shape", &self.shape)
            .field("resolution", &self.resolution)
            .field("occupied", &self.occupied)
            .field("overwrites", &self.overwrites)
            .finish()
    }
}

impl GridCloud {
    /// Allocate an empty grid.
    ///
    /// A zero resolution is rejected by config validation; it is clamped to
    /// one degree here so indexing never divides by zero.
    pub fn new(config: &GridConfig) -> Self {
        let shape = config.shape();
        Self {
            shape,
            resolution: i64::from(config.resolution_deg.max(1)),
            theta_start: i64::from(config.theta_start_deg),
            phi_start: i64::from(config.phi_start_deg),
            cells: vec![None; shape.cell_count()],
            occupied: 0,
            overwrites: 0,
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Number of set cells
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Writes that replaced an already set cell
    pub fn overwrites(&self) -> u64 {
        self.overwrites
    }

    /// Row-major cell position for a pair of sweep angles.
    ///
    /// # Errors
    /// `IndexOutOfRange` when either index falls outside the grid.
    pub fn cell_index(&self, theta: i32, phi: i32) -> Result<(usize, usize), ContractError> {
        let row = (i64::from(theta) - self.theta_start).div_euclid(self.resolution);
        let col = (i64::from(phi) - self.phi_start).div_euclid(self.resolution);

        match (usize::try_from(row), usize::try_from(col)) {
            (Ok(r), Ok(c)) if r < self.shape.rows && c < self.shape.cols => Ok((r, c)),
            _ => Err(ContractError::IndexOutOfRange {
                theta,
                phi,
                row,
                col,
                rows: self.shape.rows,
                cols: self.shape.cols,
            }),
        }
    }

    /// Store a record in the cell its angles map to
    pub fn set(&mut self, record: ScanRecord) -> Result<(usize, usize), ContractError> {
        let raw = record.raw();
        let (row, col) = self.cell_index(raw.theta, raw.phi)?;
        let slot = &mut self.cells[row * self.shape.cols + col];

        if slot.replace(record).is_some() {
            self.overwrites += 1;
            debug!(row, col, theta = raw.theta, phi = raw.phi, "Grid cell overwritten");
        } else {
            self.occupied += 1;
        }
        Ok((row, col))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&ScanRecord> {
        if row >= self.shape.rows || col >= self.shape.cols {
            return None;
        }
        self.cells[row * self.shape.cols + col].as_ref()
    }

    /// Set records in row-major order
    pub fn records(&self) -> impl Iterator<Item = &ScanRecord> {
        self.cells.iter().flatten()
    }

    /// Every cell in row-major order.
    ///
    /// Set cells carry the angles the controller reported; unset cells carry
    /// their lattice angles.
    pub fn to_rows(&self) -> Vec<ScanRow> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Some(record) => {
                    let raw = record.raw();
                    ScanRow {
                        theta: raw.theta,
                        phi: raw.phi,
                        record: Some(*record),
                    }
                }
                None => {
                    let (row, col) = (i / self.shape.cols, i % self.shape.cols);
                    ScanRow {
                        theta: self.lattice_angle(self.theta_start, row),
                        phi: self.lattice_angle(self.phi_start, col),
                        record: None,
                    }
                }
            })
            .collect()
    }

    fn lattice_angle(&self, start: i64, index: usize) -> i32 {
        let angle = start + self.resolution * index as i64;
        i32::try_from(angle).unwrap_or(if angle < 0 { i32::MIN } else { i32::MAX })
    }
}

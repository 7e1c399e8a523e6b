//! # Point Cloud
//!
//! In-memory store for one scan, owned by the scan session.
//!
//! Two layouts:
//! - **Sequential**: append-only, insertion order
//! - **Grid**: fixed `rows x cols` lattice addressed by sweep angle,
//!   out-of-range angles are reported, never clipped
//!
//! The store is plain owned data. `finalize` consumes it into a read-only
//! `FinishedScan`, so nothing can mutate the cloud after it is handed to sinks.

mod grid;
mod sequential;

pub use grid::GridCloud;
pub use sequential::SequentialCloud;

use contracts::{
    ContractError, FinishedScan, GridConfig, PlotMode, ScanRecord, ScanRow, StorageMode,
};

/// Point cloud in one of the two storage layouts
#[derive(Debug, Clone)]
pub enum PointCloud {
    Sequential(SequentialCloud),
    Grid(GridCloud),
}

impl PointCloud {
    /// Allocate an empty cloud for the configured layout
    pub fn new(storage: StorageMode, grid: &GridConfig) -> Self {
        match storage {
            StorageMode::Sequential => Self::Sequential(SequentialCloud::new()),
            StorageMode::Grid => Self::Grid(GridCloud::new(grid)),
        }
    }

    pub fn storage(&self) -> StorageMode {
        match self {
            Self::Sequential(_) => StorageMode::Sequential,
            Self::Grid(_) => StorageMode::Grid,
        }
    }

    /// Store a record: append in sequential mode, cell write in grid mode.
    ///
    /// Only grid mode can fail, with `IndexOutOfRange`.
    pub fn insert(&mut self, record: ScanRecord) -> Result<(), ContractError> {
        match self {
            Self::Sequential(cloud) => {
                cloud.append(record);
                Ok(())
            }
            Self::Grid(cloud) => cloud.set(record).map(|_| ()),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        match self {
            Self::Sequential(cloud) => cloud.len(),
            Self::Grid(cloud) => cloud.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> Box<dyn Iterator<Item = &ScanRecord> + '_> {
        match self {
            Self::Sequential(cloud) => Box::new(cloud.records().iter()),
            Self::Grid(cloud) => Box::new(cloud.records()),
        }
    }

    /// Rows for persistence in stable iteration order
    pub fn to_rows(&self) -> Vec<ScanRow> {
        match self {
            Self::Sequential(cloud) => cloud.to_rows(),
            Self::Grid(cloud) => cloud.to_rows(),
        }
    }

    /// Freeze the cloud into a read-only scan
    pub fn finalize(self, plot_mode: PlotMode) -> FinishedScan {
        let shape = match &self {
            Self::Sequential(_) => None,
            Self::Grid(cloud) => Some(cloud.shape()),
        };
        FinishedScan {
            storage: self.storage(),
            plot_mode,
            shape,
            rows: self.to_rows(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use contracts::{CalibratedSample, CartesianPoint, GridShape, RawSample};

    fn record(theta: i32, phi: i32, raw: i32) -> ScanRecord {
        ScanRecord {
            sample: CalibratedSample {
                raw: RawSample::new(theta, phi, raw),
                distance: f64::from(raw) / 10.0,
            },
            point: CartesianPoint::new(f64::from(theta), f64::from(phi), f64::from(raw)),
        }
    }

    fn small_grid() -> GridConfig {
        GridConfig {
            resolution_deg: 2,
            num_points_theta: 3,
            num_points_phi: 4,
            theta_start_deg: 30,
            phi_start_deg: 45,
        }
    }

    #[test]
    fn test_sequential_preserves_insertion_order() {
        let mut cloud = PointCloud::new(StorageMode::Sequential, &GridConfig::default());
        cloud.insert(record(40, 10, 1)).unwrap();
        cloud.insert(record(10, 20, 2)).unwrap();
        cloud.insert(record(10, 20, 3)).unwrap();

        let rows = cloud.to_rows();
        let readings: Vec<_> = rows.iter().map(|r| r.raw_reading()).collect();
        assert_eq!(readings, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(cloud.len(), 3);
    }

    #[test]
    fn test_sequential_accepts_any_angle() {
        let mut cloud = PointCloud::new(StorageMode::Sequential, &small_grid());
        assert!(cloud.insert(record(-500, 9000, 1)).is_ok());
    }

    #[test]
    fn test_grid_index_bijection() {
        let config = GridConfig::default();
        let grid = GridCloud::new(&config);
        let mut seen = std::collections::HashSet::new();

        for i in 0..config.num_points_theta {
            for j in 0..config.num_points_phi {
                let theta = config.theta_start_deg + i as i32;
                let phi = config.phi_start_deg + j as i32;
                let (row, col) = grid.cell_index(theta, phi).unwrap();
                assert!(row < config.num_points_theta);
                assert!(col < config.num_points_phi);
                assert!(seen.insert((row, col)), "collision at {theta},{phi}");
            }
        }
        assert_eq!(seen.len(), config.shape().cell_count());
    }

    #[test]
    fn test_grid_index_floors_within_step() {
        let grid = GridCloud::new(&small_grid());
        assert_eq!(grid.cell_index(30, 45).unwrap(), (0, 0));
        assert_eq!(grid.cell_index(31, 46).unwrap(), (0, 0));
        assert_eq!(grid.cell_index(32, 47).unwrap(), (1, 1));
        assert_eq!(grid.cell_index(35, 52).unwrap(), (2, 3));
    }

    #[test]
    fn test_grid_out_of_range_not_clipped() {
        let grid = GridCloud::new(&small_grid());

        // One degree below the start floors to -1, not 0
        match grid.cell_index(29, 45).unwrap_err() {
            ContractError::IndexOutOfRange { row, col, rows, cols, .. } => {
                assert_eq!((row, col), (-1, 0));
                assert_eq!((rows, cols), (3, 4));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(grid.cell_index(36, 45).is_err());
        assert!(grid.cell_index(30, 53).is_err());
        assert!(grid.cell_index(i32::MAX, i32::MIN).is_err());
    }

    #[test]
    fn test_grid_insert_out_of_range_leaves_cloud_unchanged() {
        let mut cloud = PointCloud::new(StorageMode::Grid, &small_grid());
        assert!(cloud.insert(record(100, 45, 1)).is_err());
        assert!(cloud.is_empty());
    }

    #[test]
    fn test_grid_last_write_wins() {
        let mut grid = GridCloud::new(&small_grid());
        grid.set(record(30, 45, 100)).unwrap();
        grid.set(record(31, 45, 200)).unwrap();

        assert_eq!(grid.len(), 1);
        assert_eq!(grid.overwrites(), 1);
        assert_eq!(grid.get(0, 0).unwrap().raw().raw_reading, 200);
    }

    #[test]
    fn test_grid_unset_distinct_from_zero_reading() {
        let mut grid = GridCloud::new(&small_grid());
        grid.set(record(30, 45, 0)).unwrap();

        assert_eq!(grid.get(0, 0).map(|r| r.raw().raw_reading), Some(0));
        assert!(grid.get(0, 1).is_none());
        assert!(grid.get(99, 0).is_none());
    }

    #[test]
    fn test_grid_rows_are_row_major_with_lattice_angles() {
        let mut cloud = PointCloud::new(StorageMode::Grid, &small_grid());
        cloud.insert(record(33, 47, 7)).unwrap();

        let rows = cloud.to_rows();
        assert_eq!(rows.len(), 12);
        assert_eq!((rows[0].theta, rows[0].phi), (30, 45));
        assert_eq!((rows[1].theta, rows[1].phi), (30, 47));
        assert_eq!((rows[4].theta, rows[4].phi), (32, 45));
        // (33, 47) lands in cell (1, 1) and keeps its reported angles
        assert_eq!((rows[5].theta, rows[5].phi), (33, 47));
        assert_eq!(rows[5].raw_reading(), Some(7));
        assert_eq!(rows.iter().filter(|r| r.record.is_some()).count(), 1);
    }

    #[test]
    fn test_finalize_grid() {
        let mut cloud = PointCloud::new(StorageMode::Grid, &small_grid());
        cloud.insert(record(30, 45, 5)).unwrap();
        let scan = cloud.finalize(PlotMode::TwoD);

        assert_eq!(scan.storage, StorageMode::Grid);
        assert_eq!(scan.plot_mode, PlotMode::TwoD);
        assert_eq!(scan.shape, Some(GridShape { rows: 3, cols: 4 }));
        assert_eq!(scan.len(), 1);
        let point = scan.points().next().unwrap();
        assert_relative_eq!(point.z, 5.0);
    }

    #[test]
    fn test_finalize_sequential() {
        let mut cloud = PointCloud::new(StorageMode::Sequential, &small_grid());
        cloud.insert(record(1, 2, 3)).unwrap();
        let scan = cloud.finalize(PlotMode::ThreeD);

        assert_eq!(scan.shape, None);
        assert_eq!(scan.rows.len(), 1);
    }
}

//! # Measurement
//!
//! Sensor geometry: calibration curve, coordinate transform, spatial filter.
//!
//! ```ignore
//! use measurement::Measurement;
//!
//! let measurement = Measurement::from_blueprint(&blueprint);
//! let record = measurement.measure(RawSample::new(60, 65, 512))?;
//! ```

mod calibration;
mod filter;
mod transform;

pub use calibration::CalibrationCurve;
pub use filter::SpatialFilter;
pub use transform::{to_cartesian, CoordinateTransform};

use contracts::{
    CalibratedSample, ContractError, RawSample, ScanBlueprint, ScanRecord,
};
use tracing::trace;

/// Calibration and projection for one sensor unit
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    curve: CalibrationCurve,
    transform: CoordinateTransform,
}

impl Measurement {
    pub fn new(curve: CalibrationCurve, transform: CoordinateTransform) -> Self {
        Self { curve, transform }
    }

    pub fn from_blueprint(blueprint: &ScanBlueprint) -> Self {
        Self::new(
            CalibrationCurve::new(blueprint.calibration),
            CoordinateTransform::new(blueprint.transform),
        )
    }

    pub fn curve(&self) -> &CalibrationCurve {
        &self.curve
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// Calibrate and project a raw sample.
    ///
    /// # Errors
    /// `CalibrationSingularity` if the reading has no finite distance.
    pub fn measure(&self, raw: RawSample) -> Result<ScanRecord, ContractError> {
        let distance = self.curve.calibrate(raw.raw_reading)?;
        let point = self.transform.project(raw.theta, raw.phi, distance);
        trace!(
            theta = raw.theta,
            phi = raw.phi,
            distance,
            x = point.x,
            y = point.y,
            z = point.z,
            "measured"
        );
        Ok(ScanRecord {
            sample: CalibratedSample { raw, distance },
            point,
        })
    }
}

//! Samples - Message Codec and measurement outputs
//!
//! One wire line becomes a `RawSample`; calibration adds a distance;
//! the coordinate transform derives a `CartesianPoint`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw sample decoded from one `<theta>,<phi>,<raw_reading>` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawSample {
    /// Pitch-like sweep angle (degrees, as reported)
    pub theta: i32,

    /// Yaw-like sweep angle (degrees, as reported)
    pub phi: i32,

    /// Uncalibrated ADC reading
    pub raw_reading: i32,
}

impl RawSample {
    pub fn new(theta: i32, phi: i32, raw_reading: i32) -> Self {
        Self {
            theta,
            phi,
            raw_reading,
        }
    }
}

/// Raw sample plus its calibrated distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibratedSample {
    pub raw: RawSample,

    /// Distance along the sensor ray (cm), finite and non-negative
    pub distance: f64,
}

/// 3D point in the rig frame (cm)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Coordinate on the given axis
    pub fn coordinate(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Cartesian axis selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    /// Depth axis of the rig (sensor boresight at zero offsets)
    #[default]
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

/// Fully processed measurement: calibrated sample and its derived point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub sample: CalibratedSample,
    pub point: CartesianPoint,
}

impl ScanRecord {
    pub fn raw(&self) -> RawSample {
        self.sample.raw
    }
}

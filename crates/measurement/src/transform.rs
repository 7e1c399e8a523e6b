//! Spherical to cartesian projection for the two-axis rig.
//!
//! Convention (one per deployment, this is it):
//! - `theta` tilts the sensor up/down, `phi` pans it left/right
//! - both are centered by subtracting the configured center angle
//! - `x = r sin(phi) cos(theta)`, `y = r cos(theta) cos(phi)`, `z = r sin(theta)`
//!
//! With both angles at their centers the sensor looks straight down +y.

use contracts::{CartesianPoint, TransformConfig};

/// Center a reported angle and convert it to radians.
///
/// The only place degrees become radians.
#[inline]
fn centered_radians(angle_deg: f64, center_deg: f64) -> f64 {
    (angle_deg - center_deg).to_radians()
}

/// Project one reading into the rig frame.
pub fn to_cartesian(
    theta_deg: f64,
    phi_deg: f64,
    distance: f64,
    offsets: &TransformConfig,
) -> CartesianPoint {
    let theta = centered_radians(theta_deg, offsets.theta_center_deg);
    let phi = centered_radians(phi_deg, offsets.phi_center_deg);

    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();

    CartesianPoint {
        x: distance * sin_phi * cos_theta,
        y: distance * cos_theta * cos_phi,
        z: distance * sin_theta,
    }
}

/// Transform bound to a fixed set of center offsets
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateTransform {
    offsets: TransformConfig,
}

impl CoordinateTransform {
    pub fn new(offsets: TransformConfig) -> Self {
        Self { offsets }
    }

    pub fn offsets(&self) -> &TransformConfig {
        &self.offsets
    }

    pub fn project(&self, theta: i32, phi: i32, distance: f64) -> CartesianPoint {
        to_cartesian(f64::from(theta), f64::from(phi), distance, &self.offsets)
    }
}

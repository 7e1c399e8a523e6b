//! Foreground / background culling on one axis.

use contracts::{Axis, CartesianPoint, FilterConfig};

/// Closed-interval filter on a single axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialFilter {
    axis: Axis,
    min: f64,
    max: f64,
    enabled: bool,
}

impl SpatialFilter {
    pub fn new(axis: Axis, min: f64, max: f64) -> Self {
        Self {
            axis,
            min,
            max,
            enabled: true,
        }
    }

    /// Filter that accepts every finite point
    pub fn pass_through() -> Self {
        Self {
            axis: Axis::default(),
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            enabled: false,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        if config.enabled {
            Self::new(config.axis, config.min, config.max)
        } else {
            Self::pass_through()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Accept iff the axis coordinate lies in `[min, max]`, bounds inclusive.
    ///
    /// A NaN coordinate is never accepted.
    pub fn accept(&self, point: &CartesianPoint) -> bool {
        let value = point.coordinate(self.axis);
        if !self.enabled {
            return !value.is_nan();
        }
        value >= self.min && value <= self.max
    }
}

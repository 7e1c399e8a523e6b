//! Raw reading to distance conversion.

use contracts::{CalibrationConfig, ContractError};

/// Fitted sensor curve
///
/// The constants are sensor specific and come from configuration; refit them
/// for different hardware rather than editing code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationCurve {
    config: CalibrationConfig,
}

impl CalibrationCurve {
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Convert a raw reading to a distance in centimeters.
    ///
    /// # Errors
    /// `CalibrationSingularity` when the curve is undefined for the reading
    /// (power law at `raw_reading <= 0`) or yields a non-finite or negative
    /// distance. The result is never `inf` or `NaN`.
    pub fn calibrate(&self, raw_reading: i32) -> Result<f64, ContractError> {
        let distance = match self.config {
            CalibrationConfig::Exponential { a, k, vref, adc_max } => {
                let voltage = f64::from(raw_reading) * vref / adc_max;
                a * (-k * voltage).exp()
            }
            CalibrationConfig::PowerLaw { b, p } => {
                if raw_reading <= 0 {
                    return Err(ContractError::CalibrationSingularity { raw_reading });
                }
                b * f64::from(raw_reading).powf(-p)
            }
        };

        if !distance.is_finite() || distance < 0.0 {
            return Err(ContractError::CalibrationSingularity { raw_reading });
        }
        Ok(distance)
    }
}

impl Default for CalibrationCurve {
    fn default() -> Self {
        Self::new(CalibrationConfig::default())
    }
}

//! Configuration validation
//!
//! Rules:
//! - sentinels non-empty, and neither contains the other
//! - resolution and grid dimensions > 0, at most `MAX_GRID_CELLS` cells
//! - calibration constants finite and > 0
//! - filter bounds finite with min <= max
//! - baud_rate > 0, file prefix non-empty
//! - sink names non-empty and unique

use std::collections::HashSet;

use contracts::{CalibrationConfig, ContractError, ScanBlueprint};

/// Upper bound on `num_points_theta * num_points_phi`
const MAX_GRID_CELLS: usize = 1_000_000;

/// Validate a ScanBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &ScanBlueprint) -> Result<(), ContractError> {
    validate_sentinels(blueprint)?;
    validate_grid(blueprint)?;
    validate_calibration(blueprint)?;
    validate_filter(blueprint)?;
    validate_transport(blueprint)?;
    validate_output(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

fn validate_sentinels(blueprint: &ScanBlueprint) -> Result<(), ContractError> {
    let session = &blueprint.session;
    if session.start_sentinel.is_empty() {
        return Err(ContractError::config_validation(
            "session.start_sentinel",
            "sentinel cannot be empty",
        ));
    }
    if session.end_sentinel.is_empty() {
        return Err(ContractError::config_validation(
            "session.end_sentinel",
            "sentinel cannot be empty",
        ));
    }
    if session.start_sentinel == session.end_sentinel {
        return Err(ContractError::config_validation(
            "session.start_sentinel / session.end_sentinel",
            format!("sentinels must differ, both are '{}'", session.start_sentinel),
        ));
    }
    // Lines are matched by substring, start first
    if session.end_sentinel.contains(session.start_sentinel.as_str())
        || session.start_sentinel.contains(session.end_sentinel.as_str())
    {
        return Err(ContractError::config_validation(
            "session.start_sentinel / session.end_sentinel",
            format!(
                "sentinels '{}' and '{}' overlap; neither may contain the other",
                session.start_sentinel, session.end_sentinel
            ),
        ));
    }
    Ok(())
}

fn validate_grid(blueprint: &ScanBlueprint) -> Result<(), ContractError> {
    let grid = &blueprint.grid;
    if grid.resolution_deg == 0 {
        return Err(ContractError::config_validation(
            "grid.resolution_deg",
            "resolution_deg must be > 0",
        ));
    }
    if grid.num_points_theta == 0 || grid.num_points_phi == 0 {
        return Err(ContractError::config_validation(
            "grid.num_points_theta / grid.num_points_phi",
            format!(
                "grid dimensions must be > 0, got {}x{}",
                grid.num_points_theta, grid.num_points_phi
            ),
        ));
    }
    match grid.num_points_theta.checked_mul(grid.num_points_phi) {
        Some(cells) if cells <= MAX_GRID_CELLS => {}
        _ => {
            return Err(ContractError::config_validation(
                "grid.num_points_theta / grid.num_points_phi",
                format!(
                    "grid of {}x{} exceeds {MAX_GRID_CELLS} cells",
                    grid.num_points_theta, grid.num_points_phi
                ),
            ));
        }
    }
    let transform = &blueprint.transform;
    if !transform.theta_center_deg.is_finite() || !transform.phi_center_deg.is_finite() {
        return Err(ContractError::config_validation(
            "transform",
            "center angles must be finite",
        ));
    }
    Ok(())
}

fn validate_calibration(blueprint: &ScanBlueprint) -> Result<(), ContractError> {
    let constants: Vec<(&str, f64)> = match blueprint.calibration {
        CalibrationConfig::Exponential { a, k, vref, adc_max } => {
            vec![("a", a), ("k", k), ("vref", vref), ("adc_max", adc_max)]
        }
        CalibrationConfig::PowerLaw { b, p } => vec![("b", b), ("p", p)],
    };

    for (name, value) in constants {
        if !value.is_finite() || value <= 0.0 {
            return Err(ContractError::config_validation(
                format!("calibration.{name}"),
                format!("{name} must be finite and > 0, got {value}"),
            ));
        }
    }
    Ok(())
}

fn validate_filter(blueprint: &ScanBlueprint) -> Result<(), ContractError> {
    let filter = &blueprint.filter;
    if !filter.min.is_finite() || !filter.max.is_finite() {
        return Err(ContractError::config_validation(
            "filter.min / filter.max",
            "filter bounds must be finite",
        ));
    }
    if filter.min > filter.max {
        return Err(ContractError::config_validation(
            "filter.min / filter.max",
            format!(
                "min ({}) must be <= max ({})",
                filter.min, filter.max
            ),
        ));
    }
    Ok(())
}

fn validate_transport(blueprint: &ScanBlueprint) -> Result<(), ContractError> {
    if blueprint.transport.baud_rate == 0 {
        return Err(ContractError::config_validation(
            "transport.baud_rate",
            "baud_rate must be > 0",
        ));
    }
    if let Some(port) = &blueprint.transport.port {
        if port.trim().is_empty() {
            return Err(ContractError::config_validation(
                "transport.port",
                "port cannot be blank; omit it to auto-detect",
            ));
        }
    }
    Ok(())
}

fn validate_output(blueprint: &ScanBlueprint) -> Result<(), ContractError> {
    if blueprint.output.file_prefix.is_empty() {
        return Err(ContractError::config_validation(
            "output.file_prefix",
            "file_prefix cannot be empty",
        ));
    }
    Ok(())
}

fn validate_sinks(blueprint: &ScanBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{}].name", idx),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{SinkConfig, SinkType};

    #[test]
    fn test_valid_config() {
        let bp = ScanBlueprint::default();
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_identical_sentinels() {
        let mut bp = ScanBlueprint::default();
        bp.session.end_sentinel = "start".into();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("sentinels must differ"), "got: {err}");
    }

    #[test]
    fn test_overlapping_sentinels() {
        let mut bp = ScanBlueprint::default();
        bp.session.start_sentinel = "do".into();
        bp.session.end_sentinel = "done".into();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("overlap"), "got: {err}");

        bp.session.start_sentinel = "restart".into();
        bp.session.end_sentinel = "start".into();
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_empty_sentinel() {
        let mut bp = ScanBlueprint::default();
        bp.session.start_sentinel.clear();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_zero_resolution() {
        let mut bp = ScanBlueprint::default();
        bp.grid.resolution_deg = 0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("resolution_deg must be > 0"), "got: {err}");
    }

    #[test]
    fn test_zero_grid_dimension() {
        let mut bp = ScanBlueprint::default();
        bp.grid.num_points_phi = 0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("grid dimensions"), "got: {err}");
    }

    #[test]
    fn test_oversized_grid() {
        let mut bp = ScanBlueprint::default();
        bp.grid.num_points_theta = 2_000;
        bp.grid.num_points_phi = 1_000;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("exceeds"), "got: {err}");

        bp.grid.num_points_theta = usize::MAX;
        bp.grid.num_points_phi = 2;
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_non_positive_calibration_constant() {
        let mut bp = ScanBlueprint::default();
        bp.calibration = CalibrationConfig::Exponential {
            a: 155.0,
            k: 0.987,
            vref: 5.0,
            adc_max: 0.0,
        };
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("calibration.adc_max"), "got: {err}");
    }

    #[test]
    fn test_nan_power_exponent() {
        let mut bp = ScanBlueprint::default();
        bp.calibration = CalibrationConfig::PowerLaw {
            b: 100.0,
            p: f64::NAN,
        };
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_inverted_filter_bounds() {
        let mut bp = ScanBlueprint::default();
        bp.filter.min = 50.0;
        bp.filter.max = 40.0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("must be <= max"), "got: {err}");
    }

    #[test]
    fn test_zero_baud_rate() {
        let mut bp = ScanBlueprint::default();
        bp.transport.baud_rate = 0;
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_duplicate_sink_name() {
        let mut bp = ScanBlueprint::default();
        bp.sinks.push(SinkConfig::new("log", SinkType::Log));
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("duplicate sink name"), "got: {err}");
    }

    #[test]
    fn test_empty_sink_name() {
        let mut bp = ScanBlueprint::default();
        bp.sinks[0].name = String::new();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }
}

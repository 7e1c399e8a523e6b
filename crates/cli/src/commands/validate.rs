//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{CalibrationConfig, ScanBlueprint, SinkType, StorageMode};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    storage: String,
    plot_mode: String,
    calibration: String,
    grid: String,
    port: String,
    sink_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(summarize(&blueprint)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

fn summarize(blueprint: &ScanBlueprint) -> ConfigSummary {
    let calibration = match blueprint.calibration {
        CalibrationConfig::Exponential { a, k, vref, adc_max } => {
            format!("exponential (a={a}, k={k}, vref={vref}, adc_max={adc_max})")
        }
        CalibrationConfig::PowerLaw { b, p } => format!("power law (b={b}, p={p})"),
    };
    let grid = &blueprint.grid;

    ConfigSummary {
        version: format!("{:?}", blueprint.version),
        storage: format!("{:?}", blueprint.session.storage),
        plot_mode: format!("{:?}", blueprint.session.plot_mode),
        calibration,
        grid: format!(
            "{}x{} @ {} deg from ({}, {})",
            grid.num_points_theta,
            grid.num_points_phi,
            grid.resolution_deg,
            grid.theta_start_deg,
            grid.phi_start_deg
        ),
        port: blueprint
            .transport
            .port
            .clone()
            .unwrap_or_else(|| "auto-detect".to_string()),
        sink_count: blueprint.sinks.len(),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &ScanBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if !blueprint
        .sinks
        .iter()
        .any(|s| s.sink_type == SinkType::Csv)
    {
        warnings.push("No csv sink configured - live scans will not be saved".to_string());
    }

    if blueprint.session.storage == StorageMode::Sequential && blueprint.session.fatal_out_of_range
    {
        warnings.push("session.fatal_out_of_range has no effect in sequential storage".to_string());
    }

    if blueprint.transport.port.is_none() && blueprint.transport.known_devices.is_empty() {
        warnings.push(
            "No port configured and transport.known_devices is empty - scan will always replay"
                .to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Storage: {}", summary.storage);
            println!("  Plot: {}", summary.plot_mode);
            println!("  Calibration: {}", summary.calibration);
            println!("  Grid: {}", summary.grid);
            println!("  Port: {}", summary.port);
            println!("  Sinks: {}", summary.sink_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

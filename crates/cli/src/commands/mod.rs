//! Command implementations.

mod ports;
mod replay;
mod scan;
mod validate;

pub use ports::run_ports;
pub use replay::run_replay;
pub use scan::run_scan;
pub use validate::run_validate;

use anyhow::{Context, Result};
use contracts::ScanBlueprint;
use tracing::info;

use crate::cli::{ConfigArgs, OverrideArgs};
use crate::error::CliError;

/// Load the configured blueprint, or defaults when no file is given
fn load_blueprint(args: &ConfigArgs) -> Result<ScanBlueprint> {
    let Some(path) = &args.config else {
        info!("No configuration file given, using defaults");
        return Ok(ScanBlueprint::default());
    };

    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }

    info!(config = %path.display(), "Loading configuration");
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Apply CLI overrides, then re-validate
fn apply_overrides(blueprint: &mut ScanBlueprint, overrides: &OverrideArgs) -> Result<()> {
    if let Some(dir) = &overrides.output_dir {
        info!(directory = %dir.display(), "Overriding output directory from CLI");
        blueprint.output.directory = dir.clone();
    }
    if let Some(storage) = overrides.storage {
        info!(storage = ?storage, "Overriding storage mode from CLI");
        blueprint.session.storage = storage.into();
    }
    if let Some(plot_mode) = overrides.plot_mode {
        info!(plot_mode = ?plot_mode, "Overriding plot mode from CLI");
        blueprint.session.plot_mode = plot_mode.into();
    }
    config_loader::ConfigLoader::validate(blueprint).context("Invalid configuration after overrides")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{PlotArg, StorageArg};
    use contracts::{PlotMode, StorageMode};
    use std::path::PathBuf;

    #[test]
    fn test_defaults_without_config() {
        let blueprint = load_blueprint(&ConfigArgs { config: None }).unwrap();
        assert_eq!(blueprint.sinks.len(), 3);
    }

    #[test]
    fn test_missing_config_file() {
        let args = ConfigArgs {
            config: Some(PathBuf::from("/nonexistent/ir-scanner.toml")),
        };
        let err = load_blueprint(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_overrides_applied() {
        let mut blueprint = ScanBlueprint::default();
        let overrides = OverrideArgs {
            output_dir: Some(PathBuf::from("scans")),
            storage: Some(StorageArg::Grid),
            plot_mode: Some(PlotArg::TwoD),
        };

        apply_overrides(&mut blueprint, &overrides).unwrap();
        assert_eq!(blueprint.output.directory, PathBuf::from("scans"));
        assert_eq!(blueprint.session.storage, StorageMode::Grid);
        assert_eq!(blueprint.session.plot_mode, PlotMode::TwoD);
    }
}

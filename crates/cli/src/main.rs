//! # IR Scanner CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Live acquisition with replay fallback
//! - Offline replay with spatial filtering
//! - Configuration validation and serial port discovery

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_ports, run_replay, run_scan, run_validate};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "IR Scanner starting");

    let result = match &cli.command {
        Commands::Scan(args) => run_scan(args),
        Commands::Replay(args) => run_replay(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Ports(args) => run_ports(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        default_log_level: default_log_level.to_string(),
        force_level: cli.quiet,
    })
}

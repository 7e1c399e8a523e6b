//! `scan` command implementation.

use anyhow::Result;
use contracts::{ContractError, LineSource};
use tracing::{info, warn};

use super::{apply_overrides, load_blueprint};
use crate::cli::ScanArgs;
use crate::error::CliError;
use crate::pipeline::{self, RunStats};

/// Execute the `scan` command
pub fn run_scan(args: &ScanArgs) -> Result<()> {
    let mut blueprint = load_blueprint(&args.config)?;
    apply_overrides(&mut blueprint, &args.overrides)?;

    if let Some(port) = &args.port {
        info!(port = %port, "Overriding serial port from CLI");
        blueprint.transport.port = Some(port.clone());
    }
    if let Some(baud_rate) = args.baud_rate {
        info!(baud_rate, "Overriding baud rate from CLI");
        blueprint.transport.baud_rate = baud_rate;
    }

    let stats = match ingestion::open_transport(&blueprint.transport) {
        Ok(mut source) => {
            info!(
                port = %source.name(),
                baud_rate = blueprint.transport.baud_rate,
                "Connected to scanner"
            );
            pipeline::run_live(&blueprint, &mut source)?
        }
        Err(e @ ContractError::TransportUnavailable { .. }) if !args.no_fallback => {
            let replay_file = blueprint.output.replay_file.clone();
            warn!(
                error = %e,
                replay_file = %replay_file.display(),
                "No scanner connected, falling back to offline replay"
            );
            if !replay_file.is_file() {
                let replay = replay_file.display().to_string();
                return Err(CliError::no_input(e.to_string(), replay).into());
            }
            pipeline::run_replay(&blueprint, &replay_file, true)?
        }
        Err(e) => return Err(e.into()),
    };

    finish(stats)
}

/// Print the run summary and fail if any sink failed
pub(super) fn finish(stats: RunStats) -> Result<()> {
    info!(
        accepted = stats.metrics.accepted,
        dropped = stats.metrics.total_dropped(),
        files = stats.written.len(),
        duration_secs = stats.duration.as_secs_f64(),
        "Run complete"
    );
    stats.print_summary();

    if stats.failed_sinks.is_empty() {
        Ok(())
    } else {
        Err(CliError::SinkFailures {
            failed: stats.failed_sinks,
        }
        .into())
    }
}

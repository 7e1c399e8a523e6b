//! `replay` command implementation.

use anyhow::Result;

use super::scan::finish;
use super::{apply_overrides, load_blueprint};
use crate::cli::ReplayArgs;
use crate::pipeline;

/// Execute the `replay` command
pub fn run_replay(args: &ReplayArgs) -> Result<()> {
    let mut blueprint = load_blueprint(&args.config)?;
    apply_overrides(&mut blueprint, &args.overrides)?;

    let path = args
        .file
        .clone()
        .unwrap_or_else(|| blueprint.output.replay_file.clone());

    let stats = pipeline::run_replay(&blueprint, &path, !args.no_filter)?;
    finish(stats)
}

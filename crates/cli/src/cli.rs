//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use contracts::{PlotMode, StorageMode};

/// IR Scanner - two-axis IR range finder point-cloud acquisition
#[derive(Parser, Debug)]
#[command(
    name = "ir-scanner",
    author,
    version,
    about = "IR point-cloud scanner acquisition and replay",
    long_about = "Acquires (theta, phi, reading) samples from a pan/tilt IR range finder \n\
                  over a serial link, converts them to a point cloud, and saves the raw \n\
                  scan and a plot. Saved scans can be replayed offline with filtering."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "IR_SCANNER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "IR_SCANNER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Acquire one scan from the controller (falls back to replay)
    Scan(ScanArgs),

    /// Rebuild and plot a saved scan
    Replay(ReplayArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// List serial ports and mark recognized controller boards
    Ports(PortsArgs),
}

/// Configuration file location
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when absent
    #[arg(short, long, env = "IR_SCANNER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Settings that override the configuration file
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    /// Output directory for scan files
    #[arg(long, env = "IR_SCANNER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Point cloud layout
    #[arg(long, value_enum, env = "IR_SCANNER_STORAGE")]
    pub storage: Option<StorageArg>,

    /// Plot dimensionality
    #[arg(long, value_enum, env = "IR_SCANNER_PLOT_MODE")]
    pub plot_mode: Option<PlotArg>,
}

/// Arguments for the `scan` command
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Serial port (auto-detected when absent)
    #[arg(long, env = "IR_SCANNER_PORT")]
    pub port: Option<String>,

    /// Serial baud rate
    #[arg(long, env = "IR_SCANNER_BAUD_RATE")]
    pub baud_rate: Option<u32>,

    /// Fail instead of replaying a saved scan when no transport opens
    #[arg(long)]
    pub no_fallback: bool,
}

/// Arguments for the `replay` command
#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Saved scan to replay (defaults to `output.replay_file`)
    #[arg(env = "IR_SCANNER_REPLAY_FILE")]
    pub file: Option<PathBuf>,

    /// Plot every point, ignoring the spatial filter
    #[arg(long)]
    pub no_filter: bool,
}

/// Arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `ports` command
#[derive(Args, Debug)]
pub struct PortsArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StorageArg {
    Sequential,
    Grid,
}

impl From<StorageArg> for StorageMode {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::Sequential => Self::Sequential,
            StorageArg::Grid => Self::Grid,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PlotArg {
    #[value(name = "2d")]
    TwoD,
    #[value(name = "3d")]
    ThreeD,
}

impl From<PlotArg> for PlotMode {
    fn from(arg: PlotArg) -> Self {
        match arg {
            PlotArg::TwoD => Self::TwoD,
            PlotArg::ThreeD => Self::ThreeD,
        }
    }
}

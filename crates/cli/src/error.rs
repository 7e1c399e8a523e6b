//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Neither a transport nor a saved scan is available
    #[error("No scanner connected ({transport}) and no saved scan at {replay_file}")]
    NoInput {
        transport: String,
        replay_file: String,
    },

    /// One or more sinks failed to write
    #[error("Failed to write scan output: {}", failed.join(", "))]
    SinkFailures { failed: Vec<String> },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn no_input(transport: impl Into<String>, replay_file: impl Into<String>) -> Self {
        Self::NoInput {
            transport: transport.into(),
            replay_file: replay_file.into(),
        }
    }
}

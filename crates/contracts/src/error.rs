//! Layered error definitions
//!
//! Categorized by source: message / geometry / transport / config / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Per-message Errors =====
    /// Line does not decode to exactly three integers
    #[error("malformed message {line:?}: {reason}")]
    MalformedMessage { line: String, reason: String },

    /// Grid cell computed from the sample angles lies outside the allocated grid
    #[error(
        "grid index out of range for theta={theta} phi={phi}: cell ({row}, {col}) outside {rows}x{cols}"
    )]
    IndexOutOfRange {
        theta: i32,
        phi: i32,
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },

    /// Raw reading maps to an undefined or non-finite distance
    #[error("calibration singularity for raw reading {raw_reading}")]
    CalibrationSingularity { raw_reading: i32 },

    // ===== Startup Errors =====
    /// No transport could be opened
    #[error("transport unavailable: {message}")]
    TransportUnavailable { message: String },

    /// Offline replay input is missing
    #[error("no file found at {path}")]
    FileNotFound { path: String },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create malformed message error
    pub fn malformed(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            line: line.into(),
            reason: reason.into(),
        }
    }

    /// Create transport unavailable error
    pub fn transport_unavailable(message: impl Into<String>) -> Self {
        Self::TransportUnavailable {
            message: message.into(),
        }
    }

    /// Create file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Whether the error concerns a single message and the session may keep listening.
    ///
    /// `IndexOutOfRange` is recoverable here; sessions configured with
    /// `fatal_out_of_range` escalate it themselves.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedMessage { .. }
                | Self::IndexOutOfRange { .. }
                | Self::CalibrationSingularity { .. }
        )
    }

    /// Short label for metrics and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedMessage { .. } => "malformed_message",
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::CalibrationSingularity { .. } => "calibration_singularity",
            Self::TransportUnavailable { .. } => "transport_unavailable",
            Self::FileNotFound { .. } => "file_not_found",
            Self::ConfigParse { .. } => "config_parse",
            Self::ConfigValidation { .. } => "config_validation",
            Self::SinkWrite { .. } => "sink_write",
            Self::Io(_) => "io",
            Self::Other(_) => "other",
        }
    }
}

//! Dispatcher error types

use thiserror::Error;

/// Errors raised while building the sink set.
///
/// Write failures are not errors of the dispatcher itself: they are reported
/// per sink in the `DispatchReport`.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Unknown or invalid sink parameter, or an output directory that cannot be created
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },
}

impl DispatcherError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}

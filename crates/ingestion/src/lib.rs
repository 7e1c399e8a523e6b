//! # Ingestion
//!
//! Everything between the controller and the scan session.
//!
//! Responsibilities:
//! - Decode wire lines into `RawSample` (`codec`)
//! - Recognize scan-start / scan-end sentinels (`SentinelMatcher`)
//! - Provide line sources: serial port, scripted feed
//! - Load saved scans for offline replay
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{codec, open_transport, SentinelMatcher};
//!
//! let mut source = open_transport(&blueprint.transport)?;
//! let sentinels = SentinelMatcher::from_config(&blueprint.session);
//! while let Some(line) = source.read_line()? {
//!     match sentinels.classify(&line) {
//!         Some(control) => { /* session transition */ }
//!         None => { let sample = codec::parse(&line)?; }
//!     }
//! }
//! ```

pub mod codec;
mod replay;
mod sentinel;
mod transport;

// Re-exports
pub use contracts::{LineSource, RawSample};
pub use replay::{ReplayFile, ReplayFormat};
pub use sentinel::{ControlMessage, SentinelMatcher};
pub use transport::{list_ports, open_transport, PortCandidate, ScriptedLineSource, SerialLineSource};

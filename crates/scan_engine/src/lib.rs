//! # Scan Engine
//!
//! Drives one scan: sentinel-controlled session state machine over a
//! `LineSource`, and the offline replay path.
//!
//! ```ignore
//! use scan_engine::{run_session, ScanSession};
//!
//! let mut session = ScanSession::new(&blueprint);
//! let scan = run_session(&mut source, &mut session)?;
//! dispatcher.dispatch(&scan)?;
//! ```

mod replay;
mod runner;
mod session;

pub use replay::ReplayProcessor;
pub use runner::run_session;
pub use session::{ScanSession, SessionEvent, SessionState};

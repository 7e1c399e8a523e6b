//! Blocking session loop

use contracts::{ContractError, FinishedScan, LineSource};
use tracing::{info, instrument, warn};

use crate::session::ScanSession;

/// Read lines from `source` into `session` until the scan finishes.
///
/// One blocking read per iteration; each line is fully processed before the
/// next read.
///
/// # Errors
/// - `TransportUnavailable` if the source ends before the end sentinel
/// - any transport read error
/// - a fatal session error (`fatal_out_of_range`)
#[instrument(skip_all, fields(source = %source.name()))]
pub fn run_session<S>(source: &mut S, session: &mut ScanSession) -> Result<FinishedScan, ContractError>
where
    S: LineSource + ?Sized,
{
    info!("Listening for scan");

    while !session.is_done() {
        match source.read_line()? {
            Some(line) => {
                session.handle_line(&line)?;
            }
            None => {
                warn!(
                    state = ?session.state(),
                    connected = source.is_connected(),
                    "Source ended before scan end"
                );
                break;
            }
        }
    }

    session.take_finished().ok_or_else(|| {
        ContractError::transport_unavailable(format!(
            "{} ended before the scan end sentinel",
            source.name()
        ))
    })
}

//! LineSource trait - Transport abstraction
//!
//! The measurement pipeline only needs two things from a transport: the next
//! line of text, and whether the link is still up. Serial ports, scripted
//! test feeds and file replays all implement this trait.

use crate::ContractError;

/// Line-delimited message source
///
/// # Example
///
/// ```ignore
/// let mut source: Box<dyn LineSource> = open_transport(&blueprint.transport)?;
/// while source.is_connected() {
///     match source.read_line()? {
///         Some(line) => session.handle_line(&line)?,
///         None => break,
///     };
/// }
/// ```
pub trait LineSource {
    /// Human-readable source name (port path, "scripted", ...)
    fn name(&self) -> &str;

    /// Block until the next complete line is available
    ///
    /// Returns `Ok(None)` once the stream has ended. The trailing line
    /// terminator (`\n` or `\r\n`) is stripped.
    fn read_line(&mut self) -> Result<Option<String>, ContractError>;

    /// Whether the link is still up
    fn is_connected(&self) -> bool;
}

impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read_line(&mut self) -> Result<Option<String>, ContractError> {
        (**self).read_line()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

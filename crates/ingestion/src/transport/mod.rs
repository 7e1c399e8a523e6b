//! Transport layer: line sources for the scan session

mod scripted;
mod serial;

pub use scripted::ScriptedLineSource;
pub use serial::{list_ports, open_transport, PortCandidate, SerialLineSource};

/// Strip one trailing `\n` / `\r\n` (and any stray `\r`) from a line.
pub(crate) fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_terminator() {
        assert_eq!(strip_terminator("10,20,512\r\n"), "10,20,512");
        assert_eq!(strip_terminator("10,20,512\n"), "10,20,512");
        assert_eq!(strip_terminator("start"), "start");
        assert_eq!(strip_terminator(" done \r"), " done ");
    }
}

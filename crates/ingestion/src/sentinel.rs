//! Control message recognition
//!
//! Sentinels are matched as substrings, not whole lines: the controller
//! firmware may wrap them in extra characters.

use contracts::SessionConfig;

/// Recognized control message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    ScanStart,
    ScanEnd,
}

/// Substring matcher for the scan-start / scan-end sentinels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelMatcher {
    start: String,
    end: String,
}

impl SentinelMatcher {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(&config.start_sentinel, &config.end_sentinel)
    }

    /// Classify a line. The start sentinel is checked first.
    pub fn classify(&self, line: &str) -> Option<ControlMessage> {
        if line.contains(self.start.as_str()) {
            Some(ControlMessage::ScanStart)
        } else if line.contains(self.end.as_str()) {
            Some(ControlMessage::ScanEnd)
        } else {
            None
        }
    }
}

impl Default for SentinelMatcher {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match() {
        let m = SentinelMatcher::default();
        assert_eq!(m.classify("noise-start-msg"), Some(ControlMessage::ScanStart));
        assert_eq!(m.classify("finished-done-tag"), Some(ControlMessage::ScanEnd));
        assert_eq!(m.classify("start"), Some(ControlMessage::ScanStart));
        assert_eq!(m.classify("10,20,512"), None);
    }

    #[test]
    fn test_start_wins_when_both_present() {
        let m = SentinelMatcher::default();
        assert_eq!(m.classify("done start"), Some(ControlMessage::ScanStart));
    }

    #[test]
    fn test_case_sensitive() {
        let m = SentinelMatcher::default();
        assert_eq!(m.classify("START"), None);
    }

    #[test]
    fn test_custom_sentinels() {
        let m = SentinelMatcher::new("<<", ">>");
        assert_eq!(m.classify("x<<y"), Some(ControlMessage::ScanStart));
        assert_eq!(m.classify(">>"), Some(ControlMessage::ScanEnd));
        assert_eq!(m.classify("done"), None);
    }
}

//! Scripted line source for tests and demos

use std::collections::VecDeque;

use contracts::{ContractError, LineSource};

use super::strip_terminator;

/// Line source that replays a fixed list of lines, then disconnects
#[derive(Debug, Clone, Default)]
pub struct ScriptedLineSource {
    lines: VecDeque<String>,
    connected: bool,
}

impl ScriptedLineSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            connected: true,
        }
    }

    /// Build from raw text, splitting on newlines
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }

    /// Queue another line
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    /// Lines not yet read
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedLineSource {
    fn name(&self) -> &str {
        "scripted"
    }

    fn read_line(&mut self) -> Result<Option<String>, ContractError> {
        match self.lines.pop_front() {
            Some(line) => Ok(Some(strip_terminator(&line).to_string())),
            None => {
                self.connected = false;
                Ok(None)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

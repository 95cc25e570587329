// Terminal log - append-only transcript of console interactions

use serde::{Deserialize, Serialize};

/// Tag of one transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// Echo of a submitted command
    Query,
    Success,
    Error,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Query => "query",
            LogKind::Success => "success",
            LogKind::Error => "error",
        }
    }
}

/// One tagged line of the terminal transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    pub text: String,
}

impl LogEntry {
    pub fn new(kind: LogKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn query(text: impl Into<String>) -> Self {
        Self::new(LogKind::Query, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LogKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LogKind::Error, text)
    }
}

/// Ordered, unbounded transcript. Entries are never edited or dropped.
#[derive(Debug, Default)]
pub struct TerminalLog {
    entries: Vec<LogEntry>,
}

impl TerminalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Append several entries back to back; nothing can interleave with them.
    pub fn append_all(&mut self, entries: impl IntoIterator<Item = LogEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries appended after the first `cursor` ones
    pub fn since(&self, cursor: usize) -> &[LogEntry] {
        self.entries.get(cursor..).unwrap_or(&[])
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Transcript writer - appends displayed log entries to a JSONL file

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::session::{LogEntry, LogKind};

/// One line of the transcript file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub timestamp: DateTime<Utc>,
    pub kind: LogKind,
    pub text: String,
}

impl TranscriptRecord {
    pub fn new(entry: &LogEntry) -> Self {
        Self {
            timestamp: Utc::now(),
            kind: entry.kind,
            text: entry.text.clone(),
        }
    }
}

pub struct TranscriptWriter {
    file: File,
}

impl TranscriptWriter {
    /// Open (or create) the transcript file in append mode
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create transcript directory")?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open transcript {}", path.display()))?;

        Ok(Self { file })
    }

    pub fn record(&mut self, entry: &LogEntry) -> Result<()> {
        let json = serde_json::to_string(&TranscriptRecord::new(entry))
            .context("Failed to serialize transcript entry")?;
        writeln!(self.file, "{}", json).context("Failed to write transcript entry")?;
        Ok(())
    }
}

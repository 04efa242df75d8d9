use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use engine_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::PluginError;
use crate::host_api::Recipient;

/// One message captured while a recording was running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedMessage {
    /// Seconds since the recording started.
    pub offset: i64,
    pub to: Recipient,
    pub text: String,
}

/// In-memory recording buffer, flushed to disk as JSON lines.
#[derive(Debug, Clone)]
pub struct RecordingBuffer {
    started_at: Timestamp,
    entries: Vec<RecordedMessage>,
}

impl RecordingBuffer {
    pub fn new(started_at: Timestamp) -> Self {
        Self {
            started_at,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, at: Timestamp, to: Recipient, text: &str) {
        self.entries.push(RecordedMessage {
            offset: at.seconds_since(self.started_at),
            to,
            text: text.to_string(),
        });
    }

    pub fn entries(&self) -> &[RecordedMessage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn write_to(&self, path: &Path) -> Result<(), PluginError> {
        let mut writer = BufWriter::new(File::create(path)?);
        for entry in &self.entries {
            serde_json::to_writer(&mut writer, entry)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Vec<RecordedMessage>, PluginError> {
        let reader = BufReader::new(File::open(path)?);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(&line)?);
        }
        Ok(entries)
    }
}

/// Reject names that would escape the recording directory.
pub fn validate_file_name(name: &str) -> Result<(), PluginError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        return Err(PluginError::RecordingName(name.to_string()));
    }
    Ok(())
}

//! JSONL activity log: append-only line-delimited JSON.
//!
//! Each line is a self-contained JSON object assembled in memory and written
//! with a single `write_all`, so a concurrently tailing process never sees a
//! partial line.
//!
//! Degradation chain:
//! 1. Configured file path
//! 2. stderr with `[SLN-JSONL]` prefix
//! 3. Silent discard
//!
//! The tool must never fail because logging failed, and logging is disabled
//! entirely when no path is configured (the notebook is session-only by
//! default).

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions, rename};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analyzer::findings::Severity;
use crate::core::errors::{Result, SlnError};

/// Level of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Warning,
    Critical,
}

/// Event types matching the notebook activity model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SessionStart,
    RecordCreate,
    RecordDelete,
    ArtifactIngest,
    AnalysisComplete,
    Error,
}

/// A single JSONL log entry — all fields optional except `ts`, `event`,
/// `level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    /// Event type identifier.
    pub event: EventType,
    /// Event level.
    pub level: EventLevel,
    /// Record id involved (artifact, service, attack, result).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    /// Source filename for artifact events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Analyzer severity for analysis events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Analyzer summary for analysis events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// SLN error code if the action failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    #[must_use]
    pub fn new(event: EventType, level: EventLevel) -> Self {
        Self {
            ts: chrono::Utc::now().to_rfc3339(),
            event,
            level,
            record_id: None,
            filename: None,
            severity: None,
            summary: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }
}

/// Degradation state of the JSONL writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    /// No path configured; every entry is a no-op.
    Disabled,
    /// Writing to the configured file.
    Normal,
    /// File failed, writing to stderr.
    Stderr,
    /// Everything failed, silently discarding.
    Discard,
}

/// Configuration for the JSONL writer.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    /// Log file path; `None` disables logging.
    pub path: Option<PathBuf>,
    /// Maximum file size before rotation (bytes). Default: 16 MiB.
    pub max_size_bytes: u64,
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_size_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Append-only JSONL log writer with rotation and degrade-to-stderr.
pub struct JsonlWriter {
    config: JsonlConfig,
    writer: Option<BufWriter<File>>,
    state: WriterState,
    bytes_written: u64,
}

impl JsonlWriter {
    /// Open the log file. Falls through the degradation chain on failure.
    #[must_use]
    pub fn open(config: JsonlConfig) -> Self {
        let mut w = Self {
            config,
            writer: None,
            state: WriterState::Disabled,
            bytes_written: 0,
        };
        w.try_open_file();
        w
    }

    /// Writer that silently ignores every entry.
    #[must_use]
    pub fn disabled() -> Self {
        Self::open(JsonlConfig::default())
    }

    /// Write a single log entry as one atomic JSONL line.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        if self.state == WriterState::Disabled {
            return;
        }
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                // Serialization failure is a programming error; note and bail.
                let _ = writeln!(io::stderr(), "[SLN-JSONL] serialize error: {e}");
                return;
            }
        };
        self.write_line(&line);
    }

    /// Flush buffers.
    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
    }

    /// Current degradation state label.
    #[must_use]
    pub fn state(&self) -> &'static str {
        match self.state {
            WriterState::Disabled => "disabled",
            WriterState::Normal => "normal",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    fn write_line(&mut self, line: &str) {
        if self.state == WriterState::Normal
            && self.bytes_written + line.len() as u64 > self.config.max_size_bytes
        {
            self.rotate();
        }

        match self.state {
            WriterState::Disabled => {}
            WriterState::Normal => {
                if let Some(w) = self.writer.as_mut() {
                    if w.write_all(line.as_bytes()).is_err() {
                        self.degrade();
                        self.write_line(line); // retry at next level
                        return;
                    }
                    self.bytes_written += line.len() as u64;
                } else {
                    self.degrade();
                    self.write_line(line);
                }
            }
            WriterState::Stderr => {
                let _ = write!(io::stderr(), "[SLN-JSONL] {line}");
            }
            WriterState::Discard => {}
        }
    }

    fn try_open_file(&mut self) {
        let Some(path) = self.config.path.clone() else {
            self.state = WriterState::Disabled;
            return;
        };
        match open_append(&path) {
            Ok((file, size)) => {
                self.writer = Some(BufWriter::with_capacity(16 * 1024, file));
                self.state = WriterState::Normal;
                self.bytes_written = size;
            }
            Err(_) => {
                self.state = WriterState::Stderr;
                let _ = writeln!(
                    io::stderr(),
                    "[SLN-JSONL] log path failed to open, using stderr: {}",
                    path.display()
                );
            }
        }
    }

    fn degrade(&mut self) {
        self.writer = None;
        match self.state {
            WriterState::Normal => {
                self.state = WriterState::Stderr;
                let _ = writeln!(io::stderr(), "[SLN-JSONL] log write failed, using stderr");
            }
            WriterState::Stderr => {
                self.state = WriterState::Discard;
            }
            WriterState::Disabled | WriterState::Discard => {}
        }
    }

    fn rotate(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
        self.writer = None;

        let Some(base) = self.config.path.clone() else {
            return;
        };
        let mut rotated = base.clone().into_os_string();
        rotated.push(".1");
        let _ = fs::remove_file(&rotated);
        let _ = rename(&base, &rotated);

        match open_append(&base) {
            Ok((file, _)) => {
                self.writer = Some(BufWriter::with_capacity(16 * 1024, file));
                self.bytes_written = 0;
            }
            Err(_) => self.degrade(),
        }
    }
}

impl Drop for JsonlWriter {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Open or create a file for appending. Returns `(File, current_size)`.
fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| SlnError::io(parent, source))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| SlnError::io(path, source))?;
    let size = file.metadata().map_or(0, |m| m.len());
    Ok((file, size))
}

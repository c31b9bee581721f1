//! Run log: timestamped, append-only, forwarded to a sink as it grows.

use chrono::Local;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::utils::parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Output,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Local wall clock, `HH:MM:SS`
    pub time: String,
    pub level: LogLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    pub text: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, step_id: Option<String>, text: impl Into<String>) -> Self {
        Self {
            time: Local::now().format("%H:%M:%S").to_string(),
            level,
            step_id,
            text: text.into(),
        }
    }

    pub fn render(&self) -> String {
        match self.level {
            LogLevel::Warn => format!("[{}] warning: {}", self.time, self.text),
            LogLevel::Error => format!("[{}] error: {}", self.time, self.text),
            LogLevel::Info | LogLevel::Output => format!("[{}] {}", self.time, self.text),
        }
    }
}

/// Destination for log entries as they are appended.
pub trait LogSink {
    fn emit(&mut self, entry: &LogEntry);
}

/// Writes rendered entries to stderr.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl LogSink for TerminalSink {
    fn emit(&mut self, entry: &LogEntry) {
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        let _ = writeln!(handle, "{}", entry.render());
    }
}

#[derive(Debug, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn emit(&mut self, _entry: &LogEntry) {}
}

/// Collects entries behind a shared handle; clones see the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn texts(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.text).collect()
    }
}

impl LogSink for MemorySink {
    fn emit(&mut self, entry: &LogEntry) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry.clone()),
            Err(poisoned) => poisoned.into_inner().push(entry.clone()),
        }
    }
}

/// Append-only buffer for one run.
pub struct RunLog {
    entries: Vec<LogEntry>,
    sink: Box<dyn LogSink>,
}

impl RunLog {
    pub fn new(sink: Box<dyn LogSink>) -> Self {
        Self {
            entries: Vec::new(),
            sink,
        }
    }

    pub fn terminal() -> Self {
        Self::new(Box::new(TerminalSink))
    }

    pub fn silent() -> Self {
        Self::new(Box::new(NullSink))
    }

    fn push(&mut self, entry: LogEntry) {
        self.sink.emit(&entry);
        self.entries.push(entry);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(LogEntry::new(LogLevel::Info, None, text));
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(LogEntry::new(LogLevel::Warn, None, text));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(LogEntry::new(LogLevel::Error, None, text));
    }

    /// One line of child output. Escape sequences are stripped; blank lines dropped.
    pub fn output(&mut self, step_id: &str, line: &str) {
        let clean = parser::strip_ansi(line);
        let clean = clean.trim_end();
        if clean.trim().is_empty() {
            return;
        }
        self.push(LogEntry::new(
            LogLevel::Output,
            Some(step_id.to_string()),
            clean,
        ));
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Output lines a step produced, joined with newlines.
    pub fn step_output(&self, step_id: &str) -> String {
        self.entries
            .iter()
            .filter(|e| e.level == LogLevel::Output && e.step_id.as_deref() == Some(step_id))
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Debug for RunLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLog")
            .field("entries", &self.entries.len())
            .finish()
    }
}

//! Verbose test logging infrastructure.
//!
//! Captures per-test log entries (elapsed time, level, category, message)
//! so a failing test can dump a full trace of what it did. Entries are
//! buffered in memory and only printed when something goes wrong.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::sync::Mutex;
use std::time::Instant;

/// Log entry severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
        }
    }
}

/// A single log entry.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub elapsed_ms: u64,
    pub level: LogLevel,
    pub category: String,
    pub message: String,
}

impl LogEntry {
    fn format(&self) -> String {
        let secs = self.elapsed_ms / 1000;
        let millis = self.elapsed_ms % 1000;
        format!(
            "[{secs:>4}.{millis:03}s] {} [{}] {}\n",
            self.level.as_str(),
            self.category,
            self.message
        )
    }
}

/// Buffering test logger.
pub struct TestLogger {
    start: Instant,
    entries: Mutex<Vec<LogEntry>>,
    min_level: LogLevel,
}

impl TestLogger {
    pub fn new() -> Self {
        Self::with_min_level(LogLevel::Debug)
    }

    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self {
            start: Instant::now(),
            entries: Mutex::new(Vec::new()),
            min_level,
        }
    }

    pub fn log(&self, level: LogLevel, category: &str, message: impl Into<String>) {
        if level < self.min_level {
            return;
        }
        let entry = LogEntry {
            elapsed_ms: u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX),
            level,
            category: category.to_string(),
            message: message.into(),
        };
        self.entries
            .lock()
            .expect("test logger mutex poisoned")
            .push(entry);
    }

    pub fn debug(&self, category: &str, message: impl Into<String>) {
        self.log(LogLevel::Debug, category, message);
    }

    pub fn info(&self, category: &str, message: impl Into<String>) {
        self.log(LogLevel::Info, category, message);
    }

    pub fn warn(&self, category: &str, message: impl Into<String>) {
        self.log(LogLevel::Warn, category, message);
    }

    pub fn error(&self, category: &str, message: impl Into<String>) {
        self.log(LogLevel::Error, category, message);
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.lock().expect("test logger mutex poisoned").len()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .expect("test logger mutex poisoned")
            .clone()
    }

    /// Render all buffered entries.
    pub fn dump(&self) -> String {
        let entries = self.entries.lock().expect("test logger mutex poisoned");
        let mut out = String::with_capacity(entries.len() * 64);
        for entry in entries.iter() {
            let _ = write!(out, "{}", entry.format());
        }
        out
    }
}

impl Default for TestLogger {
    fn default() -> Self {
        Self::new()
    }
}

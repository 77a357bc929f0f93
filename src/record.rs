// NetSim: Network Topology Simulator written in Rust
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! The bounded, thread-safe record of simulation activity.
//!
//! This is the domain log that the simulation produces for its consumers. Developer diagnostics
//! of the crate itself go through the `log` crate facade instead.

use std::collections::VecDeque;
use std::sync::Mutex;

use time::macros::format_description;
use time::OffsetDateTime;

/// The maximum number of entries the log retains. Appending beyond this evicts the oldest
/// entries first.
pub const LOG_CAPACITY: usize = 1000;

/// The severity of a [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Fine-grained activity, e.g. individual packet transfers.
    Debug,
    /// Regular events.
    Info,
    /// Unexpected but non-fatal events, e.g. packet loss.
    Warning,
    /// Faults of a single tick.
    Error,
    /// Faults that question the whole run.
    Critical,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        })
    }
}

/// A single, immutable record of simulation activity.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Wall-clock time at which the entry was created.
    pub timestamp: OffsetDateTime,
    /// Severity.
    pub level: LogLevel,
    /// The component that produced the entry (e.g. `"PacketTransfer"`).
    pub source: String,
    /// The human-readable message.
    pub message: String,
    /// Optional free-form details.
    pub detail: Option<String>,
}

impl LogEntry {
    /// Create a new entry with the current wall-clock timestamp.
    pub fn new(level: LogLevel, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: OffsetDateTime::now_utc(),
            level,
            source: source.into(),
            message: message.into(),
            detail: None,
        }
    }

    /// Shorthand for a [`LogLevel::Debug`] entry.
    pub fn debug(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Debug, source, message)
    }

    /// Shorthand for a [`LogLevel::Info`] entry.
    pub fn info(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, source, message)
    }

    /// Shorthand for a [`LogLevel::Warning`] entry.
    pub fn warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, source, message)
    }

    /// Shorthand for a [`LogLevel::Error`] entry.
    pub fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, source, message)
    }

    /// Shorthand for a [`LogLevel::Critical`] entry.
    pub fn critical(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Critical, source, message)
    }

    /// Attach details to the entry.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        let ts = self
            .timestamp
            .format(&format)
            .map_err(|_| std::fmt::Error)?;
        write!(f, "[{}] [{}] [{}] {}", ts, self.level, self.source, self.message)
    }
}

type Callback = Box<dyn Fn() + Send + Sync + 'static>;

/// A bounded, thread-safe, append-only log.
///
/// The log retains at most [`LOG_CAPACITY`] entries and evicts the oldest first. Any thread may
/// append or read; readers get an owned snapshot via [`SimulationLog::snapshot`]. Registered
/// change callbacks run on the appending thread, after the entry lock is released.
#[derive(Default)]
pub struct SimulationLog {
    entries: Mutex<VecDeque<LogEntry>>,
    subscribers: Mutex<Vec<Callback>>,
}

impl SimulationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, evicting the oldest entries if the log is at capacity, and notify all
    /// subscribers.
    pub fn append(&self, entry: LogEntry) {
        {
            let mut entries = self.entries.lock().unwrap();
            entries.push_back(entry);
            while entries.len() > LOG_CAPACITY {
                entries.pop_front();
            }
        }
        self.notify();
    }

    /// An owned copy of all retained entries, oldest first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }

    /// The number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Remove all entries and notify all subscribers.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
        self.notify();
    }

    /// Register a callback that fires after every append (and after [`SimulationLog::clear`]).
    pub fn subscribe(&self, f: impl Fn() + Send + Sync + 'static) {
        self.subscribers.lock().unwrap().push(Box::new(f));
    }

    fn notify(&self) {
        for f in self.subscribers.lock().unwrap().iter() {
            f();
        }
    }
}

impl std::fmt::Debug for SimulationLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationLog")
            .field("len", &self.len())
            .field("subscribers", &self.subscribers.lock().unwrap().len())
            .finish()
    }
}

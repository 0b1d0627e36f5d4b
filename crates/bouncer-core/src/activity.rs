// ── Activity log ──
//
// Append-only, timestamped record of what a screen did. Every entry is
// also emitted as a tracing event. Display order is a policy; storage is
// always chronological.

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Order in which [`ActivityLog::entries`] returns entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl FromStr for LogOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest-first" | "newest" => Ok(Self::NewestFirst),
            "oldest-first" | "oldest" => Ok(Self::OldestFirst),
            other => Err(format!("expected 'newest-first' or 'oldest-first', got '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.message, self.at.format("%Y-%m-%d %H:%M:%S"))
    }
}

#[derive(Debug, Default)]
pub struct ActivityLog {
    order: LogOrder,
    entries: Mutex<Vec<LogEntry>>,
}

impl ActivityLog {
    pub fn new(order: LogOrder) -> Self {
        Self {
            order,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Append a message stamped with the current local time.
    pub fn push(&self, message: impl Into<String>) -> LogEntry {
        let entry = LogEntry {
            at: Local::now(),
            message: message.into(),
        };
        info!(target: "bouncer::activity", "{}", entry.message);
        self.lock().push(entry.clone());
        entry
    }

    /// All entries in display order.
    pub fn entries(&self) -> Vec<LogEntry> {
        let mut entries = self.lock().clone();
        if self.order == LogOrder::NewestFirst {
            entries.reverse();
        }
        entries
    }

    /// Entries appended after the first `seen`, oldest first. Lets a
    /// streaming front end print only what is new.
    pub fn chronological_since(&self, seen: usize) -> Vec<LogEntry> {
        self.lock().iter().skip(seen).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

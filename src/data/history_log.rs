use std::collections::VecDeque;
use chrono::{DateTime, Local};
use serde::Serialize;

pub const HISTORY_LIMIT: usize = 50;
pub const CLEARED_MESSAGE: &str = "Detection history cleared";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default] Info,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
}

impl HistoryEntry {
    /// `HH:MM:SS` local time, as shown next to the message.
    pub fn time_string(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Newest-first event list, capped at [`HISTORY_LIMIT`] entries.
#[derive(Debug, Default, Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.append(message, Severity::Info);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.append(message, Severity::Error);
    }

    /// Inserts at the head; evicts the oldest entry once over the limit.
    pub fn append(&mut self, message: impl Into<String>, severity: Severity) {
        let entry = HistoryEntry {
            message: message.into(),
            severity,
            timestamp: Local::now(),
        };
        log::debug!("history [{}] {}", severity.as_str(), entry.message);
        self.entries.push_front(entry);
        while self.entries.len() > HISTORY_LIMIT {
            self.entries.pop_back();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.info(CLEARED_MESSAGE);
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Entries newest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Draw history: newest-first, capped log of past results.

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::catalog::Hero;
use crate::role::Role;
use crate::selection::DrawResult;

/// Maximum number of entries kept.
pub const HISTORY_CAPACITY: usize = 50;

/// One past draw. `timestamp` is Unix time in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub hero: Hero,
    pub role: Role,
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn new(result: &DrawResult, at: OffsetDateTime) -> Self {
        HistoryEntry {
            hero: result.hero.clone(),
            role: result.attributed_role,
            timestamp: unix_millis(at),
        }
    }

    pub fn recorded_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.timestamp) * 1_000_000).ok()
    }

    /// `HH:MM` (UTC) label for list views; `--:--` when the timestamp is out of range.
    pub fn time_label(&self) -> String {
        let format = format_description!("[hour]:[minute]");
        self.recorded_at()
            .and_then(|at| at.format(&format).ok())
            .unwrap_or_else(|| "--:--".to_string())
    }
}

pub fn unix_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a loaded newest-first sequence, keeping at most [`HISTORY_CAPACITY`] entries.
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(HISTORY_CAPACITY);
        History { entries }
    }

    /// Prepend `entry`, evicting the oldest entries beyond capacity.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

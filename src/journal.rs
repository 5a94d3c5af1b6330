//! A bounded journal of executed statements, for diagnostics.

use std::collections::VecDeque;
use std::time::{Duration, SystemTime};

const DEFAULT_CAPACITY: usize = 20;

/// One executed statement: when it started, its text, how long it took.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub started: SystemTime,
    pub sql: String,
    pub elapsed: Duration,
}

/// Ring buffer of the last N executed statements.
///
/// Owned by one connection-scoped instance; not synchronized. Callers that
/// share a connection across threads must serialize access themselves.
#[derive(Debug, Clone)]
pub struct StatementJournal {
    entries: VecDeque<JournalEntry>,
    capacity: usize,
}

impl Default for StatementJournal {
    fn default() -> Self {
        StatementJournal::with_capacity(DEFAULT_CAPACITY)
    }
}

impl StatementJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        StatementJournal {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record an executed statement, evicting the oldest entry once the
    /// journal is full.
    pub fn record(&mut self, sql: impl Into<String>, started: SystemTime, elapsed: Duration) {
        let sql = sql.into();
        log::debug!("DB query: {}", sql);
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(JournalEntry {
            started,
            sql,
            elapsed,
        });
    }

    /// The most recently recorded statement.
    pub fn last(&self) -> Option<&JournalEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }
}

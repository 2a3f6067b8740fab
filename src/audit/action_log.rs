//! Bounded, most-recent-first log of executed actions.

use std::collections::VecDeque;

use log::debug;

use crate::audit::ActionLogEntry;

/// Maximum number of entries kept by the log.
pub const ACTION_LOG_CAPACITY: usize = 100;

/// In-memory audit trail of roster mutations.
///
/// Entries are ordered newest first. The log never holds more than its
/// capacity: recording into a full log evicts the oldest entry first. The
/// log lives as long as the process and is never persisted.
///
/// The log itself is not synchronised; the dispatcher owns it behind a mutex
/// so that each `record` is atomic with respect to concurrent commands.
///
/// # Examples
///
/// ```
/// let mut log = ActionLog::new();
/// log.record(ActionLogEntry::kicked("alice"));
/// assert_eq!(log.recent_global(6).len(), 1);
/// ```
#[derive(Debug)]
pub struct ActionLog {
    entries: VecDeque<ActionLogEntry>,
    capacity: usize,
}

impl ActionLog {
    /// Creates an empty log holding at most [`ACTION_LOG_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(ACTION_LOG_CAPACITY)
    }

    /// Creates an empty log holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        ActionLog {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records an entry as the newest one, evicting the oldest if the log is full.
    pub fn record(&mut self, entry: ActionLogEntry) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.len() >= self.capacity
            && let Some(evicted) = self.entries.pop_back()
        {
            debug!("evict oldest audit entry {}", evicted);
        }

        debug!("record audit entry {}", entry);
        self.entries.push_front(entry);
    }

    /// Returns the `limit` most recent entries, newest first.
    pub fn recent_global(&self, limit: usize) -> Vec<ActionLogEntry> {
        self.entries.iter().take(limit).cloned().collect()
    }

    /// Returns the `limit` most recent entries about `username`, newest first.
    ///
    /// Usernames are compared exactly, ignoring case.
    pub fn recent_for_user(&self, username: &str, limit: usize) -> Vec<ActionLogEntry> {
        let username = username.to_lowercase();

        self.entries
            .iter()
            .filter(|entry| entry.username.to_lowercase() == username)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

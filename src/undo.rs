//! Undo/Redo history for label sets.
//!
//! History is an append-only log of whole snapshots plus a cursor pointing at
//! the current one. Undo and redo only move the cursor. Recording a new
//! snapshot first truncates everything after the cursor, so any edit made
//! after an undo discards the redo branch.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_HISTORY;

/// Configuration for the undo history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoConfig {
    /// Maximum number of undo steps to keep
    pub max_history: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

/// Snapshot log with a cursor.
///
/// Entries `0..cursor` can be returned to with undo, entries after the cursor
/// with redo. The log is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct History<T> {
    log: Vec<T>,
    cursor: usize,
    config: UndoConfig,
}

impl<T: Clone> History<T> {
    /// Create a history whose only entry is `initial`.
    pub fn new(initial: T) -> Self {
        Self::with_config(initial, UndoConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(initial: T, config: UndoConfig) -> Self {
        Self {
            log: vec![initial],
            cursor: 0,
            config,
        }
    }

    /// Rebuild a history from a stored log. Returns None if the cursor does
    /// not point into the log.
    pub fn from_parts(log: Vec<T>, cursor: usize, config: UndoConfig) -> Option<Self> {
        (cursor < log.len()).then_some(Self {
            log,
            cursor,
            config,
        })
    }

    /// The snapshot the cursor points at.
    pub fn current(&self) -> &T {
        &self.log[self.cursor]
    }

    /// Record a new current snapshot, discarding any redo entries.
    pub fn record(&mut self, snapshot: T) {
        let discarded = self.log.len() - self.cursor - 1;
        self.log.truncate(self.cursor + 1);
        self.log.push(snapshot);
        self.cursor += 1;

        // Limit history size
        let max_len = self.config.max_history + 1;
        if self.log.len() > max_len {
            let excess = self.log.len() - max_len;
            self.log.drain(..excess);
            self.cursor -= excess;
        }

        log::debug!(
            "📝 History: recorded snapshot {} (discarded {} redo)",
            self.cursor,
            discarded
        );
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.log.len()
    }

    /// Step back one snapshot. Returns None if already at the oldest.
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        log::debug!("⏪ Undo: now at snapshot {}", self.cursor);
        Some(self.current())
    }

    /// Step forward one snapshot. Returns None if already at the newest.
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        log::debug!("⏩ Redo: now at snapshot {}", self.cursor);
        Some(self.current())
    }

    /// Replace all history with a single snapshot.
    pub fn reset(&mut self, initial: T) {
        self.log.clear();
        self.log.push(initial);
        self.cursor = 0;
        log::debug!("🗑️ History cleared");
    }

    /// Get the number of available undo steps
    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    /// Get the number of available redo steps
    pub fn redo_count(&self) -> usize {
        self.log.len() - self.cursor - 1
    }

    /// All snapshots, oldest first, and the cursor position.
    pub fn parts(&self) -> (&[T], usize) {
        (&self.log, self.cursor)
    }
}

impl<T: Clone + Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_basic() {
        let mut history = History::new(vec![1]);
        assert!(!history.can_undo());
        assert!(!history.can_redo());

        history.record(vec![1, 2]);
        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.current(), &vec![1, 2]);

        assert_eq!(history.undo(), Some(&vec![1]));
        assert!(!history.can_undo());
        assert!(history.can_redo());

        assert_eq!(history.redo(), Some(&vec![1, 2]));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_at_ends_are_noops() {
        let mut history = History::new(0);
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        assert_eq!(history.current(), &0);
    }

    #[test]
    fn test_record_discards_redo() {
        let mut history = History::new(vec![1]);
        history.record(vec![1, 2]);
        history.record(vec![1, 2, 3]);

        history.undo();
        history.undo();
        assert_eq!(history.redo_count(), 2);

        history.record(vec![9]);
        assert!(!history.can_redo());
        assert_eq!(history.redo(), None);
        assert_eq!(history.undo(), Some(&vec![1]));
    }

    #[test]
    fn test_max_history() {
        let mut history = History::with_config(0, UndoConfig { max_history: 3 });
        for i in 1..=5 {
            history.record(i);
        }

        assert_eq!(history.undo_count(), 3);
        assert_eq!(history.current(), &5);
        history.undo();
        history.undo();
        history.undo();
        assert_eq!(history.current(), &2);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_from_parts_checks_cursor() {
        assert!(History::from_parts(vec![1, 2], 2, UndoConfig::default()).is_none());
        assert!(History::<i32>::from_parts(vec![], 0, UndoConfig::default()).is_none());

        let history = History::from_parts(vec![1, 2, 3], 1, UndoConfig::default()).unwrap();
        assert_eq!(history.current(), &2);
        assert_eq!(history.redo_count(), 1);
    }

    #[test]
    fn test_reset() {
        let mut history = History::new(1);
        history.record(2);
        history.reset(7);
        assert_eq!(history.current(), &7);
        assert_eq!(history.undo_count(), 0);
        assert_eq!(history.redo_count(), 0);
    }
}

//! Bounded command log with a cursor.
//!
//! Entries before the cursor are undoable, entries at or after it are
//! redoable. Pushing truncates everything at the cursor, so recording a new
//! action after an undo discards the redo branch.

use std::collections::VecDeque;

/// Most commands kept for undo.
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLog<T> {
    entries: VecDeque<T>,
    cursor: usize,
    capacity: usize,
}

impl<T> Default for CommandLog<T> {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl<T> CommandLog<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, entry: T) {
        self.entries.truncate(self.cursor);
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len();
    }

    /// Step back and return the entry to revert.
    pub fn undo(&mut self) -> Option<&T> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward and return the entry to re-apply.
    pub fn redo(&mut self) -> Option<&T> {
        let entry = self.entries.get(self.cursor)?;
        self.cursor += 1;
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    pub fn redo_depth(&self) -> usize {
        self.entries.len() - self.cursor
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_then_redo_walks_the_cursor() {
        let mut log = CommandLog::default();
        log.push(1);
        log.push(2);
        assert_eq!(log.undo(), Some(&2));
        assert_eq!(log.undo(), Some(&1));
        assert_eq!(log.undo(), None);
        assert_eq!(log.redo(), Some(&1));
        assert_eq!(log.redo(), Some(&2));
        assert_eq!(log.redo(), None);
    }

    #[test]
    fn push_discards_redo_branch() {
        let mut log = CommandLog::default();
        log.push(1);
        log.push(2);
        log.undo();
        log.push(3);
        assert!(!log.can_redo());
        assert_eq!(log.undo(), Some(&3));
        assert_eq!(log.undo(), Some(&1));
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut log = CommandLog::default();
        for i in 0..15 {
            log.push(i);
        }
        assert_eq!(log.undo_depth(), HISTORY_CAPACITY);
        let mut undone = Vec::new();
        while let Some(v) = log.undo() {
            undone.push(*v);
        }
        assert_eq!(undone, (5..15).rev().collect::<Vec<_>>());
        assert_eq!(log.redo_depth(), HISTORY_CAPACITY);
    }

    #[test]
    fn clear_drops_both_directions() {
        let mut log = CommandLog::default();
        log.push('a');
        log.push('b');
        log.undo();
        log.clear();
        assert!(!log.can_undo());
        assert!(!log.can_redo());
    }
}

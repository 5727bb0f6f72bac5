//! # History Manager
//!
//! Bounded undo/redo over whole-template snapshots.
//!
//! History is a linear sequence with a cursor. Pushing after an undo
//! discards the entries past the cursor, so there is never more than one
//! redo branch.

use crate::model::Side;

/// Maximum number of retained snapshots.
pub const HISTORY_CAPACITY: usize = 40;

/// Immutable copy of both sides at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub front: Side,
    pub back: Side,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    index: usize,
    capacity: usize,
}

impl History {
    /// Start a history whose first entry is the given state.
    pub fn new(front: Side, back: Side) -> Self {
        Self::with_capacity(front, back, HISTORY_CAPACITY)
    }

    pub fn with_capacity(front: Side, back: Side, capacity: usize) -> Self {
        Self {
            entries: vec![Snapshot { front, back }],
            index: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record a new state as the current entry.
    pub fn push(&mut self, front: Side, back: Side) {
        self.entries.truncate(self.index + 1);
        self.entries.push(Snapshot { front, back });
        self.index = self.entries.len() - 1;

        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
            self.index = self.index.saturating_sub(excess);
        }
    }

    /// Step back one entry. Returns `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward one entry. Returns `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn current(&self) -> &Snapshot {
        &self.entries[self.index]
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

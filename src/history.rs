//! History manager — bounded undo/redo log of template snapshots.
//!
//! DESIGN
//! ======
//! An append-only sequence of immutable snapshots with a movable cursor.
//! Recording after an undo discards the redo branch (conventional editor
//! semantics), and the log is capped: beyond capacity the oldest entries
//! are evicted. Undo/redo at the boundary are quiet no-ops — "nothing to
//! undo" is a normal condition, not an error.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use uuid::Uuid;

use crate::consts::HISTORY_CAPACITY;
use crate::doc::{Template, now_ms};

/// One recorded snapshot. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub template_version: i64,
    pub data: Template,
    pub created_at: i64,
    pub message: String,
}

/// Fixed-capacity snapshot log with a cursor.
pub struct History {
    entries: VecDeque<HistoryEntry>,
    /// Index of the current entry, when any entries exist.
    cursor: usize,
    capacity: usize,
}

impl History {
    /// Create an empty history with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Create an empty history holding at most `capacity` snapshots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: VecDeque::new(), cursor: 0, capacity: capacity.max(1) }
    }

    /// Record a snapshot: discards any redo branch beyond the cursor,
    /// appends, advances the cursor to the new tail, and evicts from the
    /// front once over capacity.
    pub fn record(&mut self, template: &Template, message: &str) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(HistoryEntry {
            id: Uuid::new_v4(),
            template_version: template.meta.version,
            data: template.clone(),
            created_at: now_ms(),
            message: message.to_owned(),
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one snapshot. `None` when already at the oldest entry.
    pub fn undo(&mut self) -> Option<&Template> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).map(|e| &e.data)
    }

    /// Step forward one snapshot. `None` when already at the tail.
    pub fn redo(&mut self) -> Option<&Template> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).map(|e| &e.data)
    }

    /// Whether a backward step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether a forward step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of retained snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry under the cursor, if any.
    #[must_use]
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    /// Messages of retained entries, oldest first. Drives the history panel.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.message.as_str()).collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

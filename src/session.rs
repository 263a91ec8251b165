//! Editor session — owns the live template, history, and selection.
//!
//! DESIGN
//! ======
//! The session is the single writer for a template being edited. Each
//! mutation goes through the pure controller in [`crate::editor`], records
//! a history snapshot, bumps an edit `revision`, and marks the session
//! dirty for the autosave service. Selection is UI state and never part
//! of the persisted template.
//!
//! Saves are version-stamped: `begin_save` bumps `meta.version` and
//! snapshots the revision; `acknowledge_save` clears the dirty flag only
//! when no edit raced the write, so a slow older write can never make a
//! newer edit look persisted.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::doc::Template;
use crate::editor::{self, ComponentUpdate, EditorError};
use crate::grid::GridConfig;
use crate::history::History;
use crate::registry::ComponentProps;

/// Shared handle to a session, as injected into the background services.
pub type SharedSession = Arc<RwLock<EditorSession>>;

/// A snapshot handed to the persistence layer by [`EditorSession::begin_save`].
#[derive(Debug, Clone)]
pub struct SavePoint {
    pub template: Template,
    /// Edit revision at snapshot time; passed back to `acknowledge_save`.
    pub revision: u64,
}

pub struct EditorSession {
    template: Template,
    history: History,
    selected: Option<Uuid>,
    dirty: bool,
    /// Monotonic edit counter, bumped on every mutation.
    revision: u64,
}

impl EditorSession {
    /// Open a session on a template and record the opening snapshot.
    #[must_use]
    pub fn open(template: Template) -> Self {
        let mut history = History::new();
        history.record(&template, "opened");
        Self { template, history, selected: None, dirty: false, revision: 0 }
    }

    /// The live template value.
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// The currently selected component, if any.
    #[must_use]
    pub fn selection(&self) -> Option<Uuid> {
        self.selected
    }

    /// Whether unsaved edits exist.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current edit revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Select a component (or clear the selection with `None`). Selecting
    /// an id that is not on the canvas clears the selection.
    pub fn select(&mut self, id: Option<Uuid>) {
        self.selected = id.filter(|id| self.template.component(*id).is_some());
    }

    fn commit(&mut self, next: Template, message: &str) {
        self.template = next;
        self.history.record(&self.template, message);
        self.revision += 1;
        self.dirty = true;
    }

    /// Add a component from the palette and select it.
    ///
    /// # Errors
    ///
    /// Propagates [`EditorError`] from the controller; the session state
    /// is unchanged on error.
    pub fn add_component(
        &mut self,
        kind: &str,
        position: (f64, f64),
        size: (i64, i64),
        props_override: Option<ComponentProps>,
    ) -> Result<Uuid, EditorError> {
        let (next, id) = editor::add_component(&self.template, kind, position, size, props_override)?;
        self.commit(next, &format!("add {kind}"));
        self.selected = Some(id);
        Ok(id)
    }

    /// Apply a sparse update to a component.
    ///
    /// # Errors
    ///
    /// Propagates validation failures; the session state is unchanged.
    pub fn update_component(&mut self, id: Uuid, update: &ComponentUpdate) -> Result<(), EditorError> {
        let next = editor::update_component(&self.template, id, update)?;
        self.commit(next, "update component");
        Ok(())
    }

    /// Delete a component. Clears the selection if it pointed at the
    /// deleted component. Absent ids are a no-op.
    pub fn delete_component(&mut self, id: Uuid) {
        let next = editor::delete_component(&self.template, id);
        if next == self.template {
            return;
        }
        self.commit(next, "delete component");
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Duplicate a component and select the copy.
    pub fn duplicate_component(&mut self, id: Uuid) {
        let next = editor::duplicate_component(&self.template, id);
        if next == self.template {
            return;
        }
        let copy_id = next.components.last().map(|c| c.id);
        self.commit(next, "duplicate component");
        self.selected = copy_id;
    }

    /// Move a component to the top of the paint order.
    pub fn bring_to_front(&mut self, id: Uuid) {
        let next = editor::bring_to_front(&self.template, id);
        if next != self.template {
            self.commit(next, "bring to front");
        }
    }

    /// Move a component to the bottom of the paint order.
    pub fn send_to_back(&mut self, id: Uuid) {
        let next = editor::send_to_back(&self.template, id);
        if next != self.template {
            self.commit(next, "send to back");
        }
    }

    /// Replace the grid, re-clamping components into the new bounds.
    pub fn set_grid(&mut self, grid: GridConfig) {
        let next = editor::set_grid(&self.template, grid);
        self.commit(next, "change grid");
    }

    /// Step back in history. Returns `false` at the oldest snapshot.
    /// `meta.version` never rolls backwards across an undo.
    pub fn undo(&mut self) -> bool {
        let version = self.template.meta.version;
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.template = snapshot.clone();
        self.template.meta.version = self.template.meta.version.max(version);
        self.after_restore();
        true
    }

    /// Step forward in history. Returns `false` at the newest snapshot.
    pub fn redo(&mut self) -> bool {
        let version = self.template.meta.version;
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.template = snapshot.clone();
        self.template.meta.version = self.template.meta.version.max(version);
        self.after_restore();
        true
    }

    fn after_restore(&mut self) {
        self.revision += 1;
        self.dirty = true;
        if let Some(id) = self.selected {
            if self.template.component(id).is_none() {
                self.selected = None;
            }
        }
    }

    /// Whether a backward step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a forward step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// History entry messages, oldest first.
    #[must_use]
    pub fn history_messages(&self) -> Vec<&str> {
        self.history.messages()
    }

    /// Prepare a persisted write: bump `meta.version` (strictly increasing
    /// across saves, doubling as the last-write-wins stamp) and snapshot
    /// the template plus the current revision.
    pub fn begin_save(&mut self) -> SavePoint {
        self.template.meta.version += 1;
        SavePoint { template: self.template.clone(), revision: self.revision }
    }

    /// Acknowledge a completed write. Clears the dirty flag only when no
    /// edit happened after the snapshot was taken.
    pub fn acknowledge_save(&mut self, revision: u64) {
        if self.revision == revision {
            self.dirty = false;
        }
    }
}

use shared::ObjectId;

use super::signal::Signal;

/// Object selection state (supports multi-select)
///
/// Every call that changes membership emits `changed` exactly once.
/// Identity is the object id; duplicates are never stored.
#[derive(Debug, Default)]
pub struct SelectionState {
    /// Selected object IDs (in order of selection)
    selected: Vec<ObjectId>,
    pub changed: Signal,
}

impl SelectionState {
    /// Primary (most recently added) selected object
    pub fn primary(&self) -> Option<&ObjectId> {
        self.selected.last()
    }

    /// All selected objects
    pub fn all(&self) -> &[ObjectId] {
        &self.selected
    }

    /// Check if an object is selected
    pub fn contains(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Number of selected objects
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Append an object. No-op (and no notification) if already selected.
    pub fn add(&mut self, id: ObjectId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.selected.push(id);
        self.changed.emit();
        true
    }

    /// Remove an object. No-op (and no notification) if absent.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.selected.iter().position(|s| s == id) else {
            return false;
        };
        self.selected.remove(pos);
        self.changed.emit();
        true
    }

    /// Toggle selection (Ctrl+click behavior)
    pub fn toggle(&mut self, id: ObjectId) -> bool {
        if self.contains(&id) {
            self.remove(&id);
            false
        } else {
            self.add(id);
            true
        }
    }

    /// Clear all selection. Always notifies once.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.changed.emit();
    }

    /// Replace the whole selection in one step (one notification)
    pub fn replace(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        self.selected.clear();
        for id in ids {
            if !self.contains(&id) {
                self.selected.push(id);
            }
        }
        self.changed.emit();
    }
}

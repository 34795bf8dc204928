//! Undo/redo functionality
//!
//! History is a linear stack of [`Action`]s with a cursor. Each action pairs a
//! snapshot taken before a change with one taken after it, so undo and redo
//! replay captured values instead of re-running the operation.

use serde::{Deserialize, Serialize};
use shared::{ActionKind, Color, ContainerId, ObjectId, Pose};

use super::selection::SelectionState;
use super::signal::Signal;
use crate::scene::SceneAccess;

/// Captured state of one object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: ObjectId,
    pub pose: Pose,
    pub size: [f64; 3],
    pub color: Color,
    pub container: Option<ContainerId>,
}

impl ObjectRecord {
    /// Read an object's current state. `None` if it no longer exists.
    pub fn capture(id: &str, scene: &dyn SceneAccess) -> Option<Self> {
        Some(Self {
            id: id.to_string(),
            pose: scene.pose(id)?,
            size: scene.size(id)?,
            color: scene.color(id)?,
            container: scene.container(id),
        })
    }

    /// Write the record back. Returns false for a stale reference.
    pub fn restore(&self, scene: &mut dyn SceneAccess) -> bool {
        if !scene.exists(&self.id) {
            tracing::debug!("Skipping stale history record for {}", self.id);
            return false;
        }
        scene.set_size(&self.id, self.size);
        scene.set_pose(&self.id, self.pose);
        scene.set_color(&self.id, self.color);
        if scene.container(&self.id) != self.container {
            scene.set_container(&self.id, self.container.clone());
        }
        true
    }
}

/// Ordered set of object records taken at one instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    records: Vec<ObjectRecord>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture every listed object that exists and is attached.
    /// Detached objects cannot contribute "before" state and are skipped.
    pub fn capture(ids: &[ObjectId], scene: &dyn SceneAccess) -> Self {
        let records = ids
            .iter()
            .filter(|id| scene.is_attached(id))
            .filter_map(|id| ObjectRecord::capture(id, scene))
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[ObjectRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ObjectRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ObjectId> {
        self.records.iter().map(|r| &r.id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Restore every record, skipping stale ones. Returns how many applied.
    pub fn apply(&self, scene: &mut dyn SceneAccess) -> usize {
        self.records.iter().filter(|r| r.restore(scene)).count()
    }
}

/// One undoable step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    /// Empty for pure creation (paste)
    pub before: Snapshot,
    /// Empty for pure removal (delete)
    pub after: Snapshot,
}

impl Action {
    /// Whether either side of the action mentions the object
    pub fn references(&self, id: &str) -> bool {
        self.before.contains(id) || self.after.contains(id)
    }

    /// Every object the action mentions, without duplicates
    pub fn handles(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self.before.ids().cloned().collect();
        for id in self.after.ids() {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

/// Bring `scene` to one side of an action: apply `target`, detach whatever only
/// exists on the `other` side, and select the restored objects.
fn replay(
    target: &Snapshot,
    other: &Snapshot,
    scene: &mut dyn SceneAccess,
    selection: &mut SelectionState,
) {
    target.apply(scene);
    for id in other.ids() {
        if !target.contains(id) && scene.exists(id) {
            scene.set_container(id, None);
        }
    }
    selection.replace(target.ids().filter(|id| scene.exists(id)).cloned());
}

/// Undo/redo stack with a cursor
#[derive(Debug)]
pub struct History {
    stack: Vec<Action>,
    /// Number of actions currently applied (0 = base state)
    index: usize,
    capacity: usize,
    pub changed: Signal,
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            stack: Vec::new(),
            index: 0,
            capacity: capacity.max(1),
            changed: Signal::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.index < self.stack.len()
    }

    /// Action that the next undo would revert
    pub fn peek_undo(&self) -> Option<&Action> {
        self.index.checked_sub(1).and_then(|i| self.stack.get(i))
    }

    /// Whether any stored action mentions the object
    pub fn references(&self, id: &str) -> bool {
        self.stack.iter().any(|a| a.references(id))
    }

    /// Record a new action.
    ///
    /// Any redoable actions are discarded first. If the stack then exceeds
    /// capacity the oldest action is evicted and the cursor is not advanced;
    /// since truncation already made the cursor equal the length, this leaves
    /// `index == len`. Returns every action dropped from the stack.
    pub fn push(&mut self, kind: ActionKind, before: Snapshot, after: Snapshot) -> Vec<Action> {
        let mut dropped: Vec<Action> = self.stack.drain(self.index..).collect();
        self.stack.push(Action { kind, before, after });
        if self.stack.len() > self.capacity {
            dropped.push(self.stack.remove(0));
        } else {
            self.index += 1;
        }
        tracing::debug!(
            "Recorded {} ({}/{}, {} dropped)",
            kind.label(),
            self.index,
            self.stack.len(),
            dropped.len()
        );
        self.changed.emit();
        dropped
    }

    /// Undo last change
    pub fn undo(&mut self, scene: &mut dyn SceneAccess, selection: &mut SelectionState) -> bool {
        if self.index == 0 {
            return false;
        }
        let action = &self.stack[self.index - 1];
        replay(&action.before, &action.after, scene, selection);
        tracing::info!("Undo {}", action.kind.label());
        self.index -= 1;
        self.changed.emit();
        true
    }

    /// Redo last undone change
    pub fn redo(&mut self, scene: &mut dyn SceneAccess, selection: &mut SelectionState) -> bool {
        if self.index == self.stack.len() {
            return false;
        }
        self.index += 1;
        let action = &self.stack[self.index - 1];
        replay(&action.after, &action.before, scene, selection);
        tracing::info!("Redo {}", action.kind.label());
        self.changed.emit();
        true
    }

    /// Change the capacity, evicting the oldest actions if needed.
    /// Returns the evicted actions.
    pub fn set_capacity(&mut self, capacity: usize) -> Vec<Action> {
        self.capacity = capacity.max(1);
        let excess = self.stack.len().saturating_sub(self.capacity);
        if excess == 0 {
            return Vec::new();
        }
        let dropped: Vec<Action> = self.stack.drain(..excess).collect();
        self.index = self.index.saturating_sub(excess);
        self.changed.emit();
        dropped
    }

    /// Forget everything
    pub fn clear(&mut self) -> Vec<Action> {
        let dropped = std::mem::take(&mut self.stack);
        self.index = 0;
        self.changed.emit();
        dropped
    }
}

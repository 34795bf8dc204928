//! Copy, paste, duplicate and delete

use glam::DVec3;
use shared::{ActionKind, ObjectId, PartTemplate};

use super::history::Snapshot;
use super::EditorSession;
use crate::helpers::position_of;
use crate::scene::SceneAccess;

/// Templates for every listed object that still exists, in order
pub fn copy_entries(ids: &[ObjectId], scene: &dyn SceneAccess) -> Vec<PartTemplate> {
    ids.iter().filter_map(|id| scene.template(id)).collect()
}

/// Shift entries so the first lands on `target`, lifted by `lift` on Y.
/// Relative placement between entries is preserved.
pub fn placed_entries(entries: &[PartTemplate], target: [f64; 3], lift: f64) -> Vec<PartTemplate> {
    let Some(first) = entries.first() else {
        return Vec::new();
    };
    let offset = DVec3::from_array(target) - position_of(&first.pose);
    let lift = DVec3::new(0.0, lift, 0.0);
    entries
        .iter()
        .map(|entry| {
            let mut placed = entry.clone();
            placed.pose.position = (position_of(&entry.pose) + offset + lift).to_array();
            placed
        })
        .collect()
}

impl<S: SceneAccess> EditorSession<S> {
    /// Copy the selection to the clipboard. Returns the number of entries.
    pub fn copy(&mut self) -> usize {
        let entries = copy_entries(self.selection.all(), &self.scene);
        if entries.is_empty() {
            return 0;
        }
        tracing::debug!("Copied {} object(s)", entries.len());
        self.clipboard = entries;
        self.clipboard.len()
    }

    /// Paste the clipboard so its first entry lands one grid step above `point`
    pub fn paste(&mut self, point: [f64; 3]) -> Vec<ObjectId> {
        let entries = self.clipboard.clone();
        self.paste_entries(&entries, point)
    }

    /// Copy and paste the selection in one go, leaving the clipboard untouched
    pub fn duplicate(&mut self, point: [f64; 3]) -> Vec<ObjectId> {
        let entries = copy_entries(self.selection.all(), &self.scene);
        self.paste_entries(&entries, point)
    }

    fn paste_entries(&mut self, entries: &[PartTemplate], point: [f64; 3]) -> Vec<ObjectId> {
        if entries.is_empty() {
            return Vec::new();
        }
        self.abandon_gesture();

        let container = self.scene.default_container();
        let mut created = Vec::with_capacity(entries.len());
        for entry in placed_entries(entries, point, self.settings.grid_step) {
            let id = self.scene.create(&entry);
            self.scene.set_container(&id, Some(container.clone()));
            created.push(id);
        }

        self.selection.clear();
        for id in &created {
            self.selection.add(id.clone());
        }

        let after = Snapshot::capture(self.selection.all(), &self.scene);
        self.record(ActionKind::Paste, Snapshot::empty(), after);
        tracing::info!("Pasted {} object(s)", created.len());
        created
    }

    /// Detach every selected object (undoable). Returns how many were removed.
    pub fn delete(&mut self) -> usize {
        self.abandon_gesture();
        let before = Snapshot::capture(self.selection.all(), &self.scene);
        if before.is_empty() {
            return 0;
        }
        for id in before.ids() {
            self.scene.set_container(id, None);
        }
        let count = before.len();
        self.record(ActionKind::Delete, before, Snapshot::empty());
        self.selection.clear();
        tracing::info!("Deleted {count} object(s)");
        count
    }
}

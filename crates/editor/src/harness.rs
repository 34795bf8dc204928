//! Headless test harness for programmatic scene manipulation.
//!
//! Wraps an [`EditorSession`] over a [`MemoryScene`] with shortcuts for
//! building scenes and running whole gestures.

use shared::{Color, Face, ObjectId, PartTemplate, Pose, Tool};

use crate::scene::{MemoryScene, SceneAccess};
use crate::state::{create_session, EditorSession, EditorSettings};

/// Headless test harness owning a session over an in-memory scene
pub struct TestHarness {
    pub session: EditorSession<MemoryScene>,
}

impl TestHarness {
    /// Create a new empty harness with default settings.
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            session: create_session(MemoryScene::new(), settings),
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Place an object from a template and return its ID
    pub fn create_part(&mut self, template: PartTemplate) -> ObjectId {
        self.session.scene.insert(&template)
    }

    /// Place a block of the given size at `position`
    pub fn create_block(&mut self, name: &str, size: [f64; 3], position: [f64; 3]) -> ObjectId {
        self.create_part(PartTemplate::block(name, size).with_pose(Pose::at(position)))
    }

    /// Place a unit block at `position`
    pub fn create_unit_block(&mut self, name: &str, position: [f64; 3]) -> ObjectId {
        self.create_block(name, [1.0, 1.0, 1.0], position)
    }

    /// Remove an object behind the editor's back
    pub fn destroy_externally(&mut self, id: &str) -> bool {
        self.session.scene.destroy(id)
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> String {
        serde_json::to_string_pretty(&self.session.scene).unwrap_or_default()
    }

    /// Load a scene from JSON string (replaces current, resets the session)
    pub fn load_scene_json(&mut self, json: &str) -> Result<(), String> {
        let scene: MemoryScene =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        let settings = self.session.settings.clone();
        self.session = create_session(scene, settings);
        Ok(())
    }

    // ── Selection ─────────────────────────────────────────────

    /// Replace the selection with the given objects
    pub fn select<I: AsRef<str>>(&mut self, ids: &[I]) {
        self.session.selection_clear();
        for id in ids {
            self.session.selection_add(id.as_ref());
        }
    }

    pub fn selected(&self) -> Vec<ObjectId> {
        self.session.selection.all().to_vec()
    }

    // ── Gestures ──────────────────────────────────────────────

    /// Run a full begin/drag/end gesture with the given tool
    pub fn gesture(&mut self, tool: Tool, face: Face, amount: f64) -> bool {
        self.session.set_active_tool(tool);
        if !self.session.gesture_begin() {
            return false;
        }
        self.session.gesture_drag(face, amount);
        self.session.gesture_end()
    }

    pub fn move_selection(&mut self, face: Face, distance: f64) -> bool {
        self.gesture(Tool::Move, face, distance)
    }

    pub fn scale_selection(&mut self, face: Face, delta: f64) -> bool {
        self.gesture(Tool::Scale, face, delta)
    }

    pub fn rotate_selection(&mut self, face: Face, degrees: f64) -> bool {
        self.gesture(Tool::Rotate, face, degrees)
    }

    // ── History ───────────────────────────────────────────────

    /// Undo the last operation
    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    /// Redo the last undone operation
    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn position_of(&self, id: &str) -> Option<[f64; 3]> {
        self.session.scene.pose(id).map(|p| p.position)
    }

    pub fn pose_of(&self, id: &str) -> Option<Pose> {
        self.session.scene.pose(id)
    }

    pub fn size_of(&self, id: &str) -> Option<[f64; 3]> {
        self.session.scene.size(id)
    }

    pub fn color_of(&self, id: &str) -> Option<Color> {
        self.session.scene.color(id)
    }

    pub fn is_attached(&self, id: &str) -> bool {
        self.session.scene.is_attached(id)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.session.scene.exists(id)
    }

    /// Number of objects, attached or not
    pub fn object_count(&self) -> usize {
        self.session.scene.len()
    }

    /// Number of attached objects
    pub fn attached_count(&self) -> usize {
        self.session.scene.attached().count()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

pub mod clipboard;
pub mod history;
pub mod selection;
pub mod settings;
pub mod signal;
pub mod transform;

use shared::{ActionKind, Face, ObjectId, PartTemplate, Pose, Tool};

pub use history::{Action, History, ObjectRecord, Snapshot};
use selection::SelectionState;
pub use settings::{EditorSettings, Setting};
pub use signal::{ListenerId, Notification, Signal};
use transform::TransformSession;

use crate::scene::picking::{hit_face, Ray};
use crate::scene::{SceneAccess, SceneQuery};

/// Everything one editing session owns: the scene it works on, settings,
/// selection, history, clipboard, active tool and the gesture in progress.
///
/// All mutation goes through `&mut self`, so two gestures or history steps can
/// never interleave.
pub struct EditorSession<S> {
    pub scene: S,
    pub settings: EditorSettings,
    pub selection: SelectionState,
    pub history: History,
    /// Templates captured by the last copy
    pub clipboard: Vec<PartTemplate>,
    transform: TransformSession,
    tool: Tool,
    tool_changed: Signal,
}

/// Start a session over `scene`
pub fn create_session<S: SceneAccess>(scene: S, settings: EditorSettings) -> EditorSession<S> {
    EditorSession::new(scene, settings)
}

/// Tear a session down, disconnecting every listener. Hands the scene back.
pub fn destroy_session<S: SceneAccess>(session: EditorSession<S>) -> S {
    session.destroy()
}

impl<S: SceneAccess> EditorSession<S> {
    pub fn new(scene: S, settings: EditorSettings) -> Self {
        let history = History::new(settings.max_history);
        Self {
            scene,
            settings,
            selection: SelectionState::default(),
            history,
            clipboard: Vec::new(),
            transform: TransformSession::default(),
            tool: Tool::default(),
            tool_changed: Signal::default(),
        }
    }

    pub fn destroy(mut self) -> S {
        self.transform.reset();
        self.selection.changed.disconnect_all();
        self.history.changed.disconnect_all();
        self.tool_changed.disconnect_all();
        tracing::debug!("Session destroyed ({} history steps dropped)", self.history.len());
        self.scene
    }

    // ── Notifications ─────────────────────────────────────────

    fn signal_mut(&mut self, notification: Notification) -> &mut Signal {
        match notification {
            Notification::SelectionChanged => &mut self.selection.changed,
            Notification::ToolChanged => &mut self.tool_changed,
            Notification::HistoryChanged => &mut self.history.changed,
        }
    }

    pub fn subscribe(
        &mut self,
        notification: Notification,
        listener: impl FnMut() + 'static,
    ) -> ListenerId {
        self.signal_mut(notification).connect(listener)
    }

    pub fn unsubscribe(&mut self, notification: Notification, id: ListenerId) -> bool {
        self.signal_mut(notification).disconnect(id)
    }

    // ── Tools and settings ────────────────────────────────────

    pub fn active_tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools. A gesture in progress is cancelled and rolled back.
    pub fn set_active_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        if self.transform.is_active() {
            self.transform.cancel(&mut self.scene);
        }
        self.tool = tool;
        self.tool_changed.emit();
    }

    /// Apply a setting change. Returns false if the value was rejected.
    pub fn set_setting(&mut self, setting: Setting) -> bool {
        if !self.settings.apply(setting) {
            return false;
        }
        if let Setting::MaxHistory(capacity) = setting {
            let dropped = self.history.set_capacity(capacity);
            self.purge(dropped);
        }
        true
    }

    // ── Selection ─────────────────────────────────────────────

    /// Whether the id names an attached, selectable object
    fn is_manipulable(&self, id: &str) -> bool {
        self.scene.exists(id) && self.scene.is_attached(id) && self.scene.is_selectable(id)
    }

    /// Add to the selection. Stale, detached or locked objects are ignored.
    pub fn selection_add(&mut self, id: &str) -> bool {
        if !self.is_manipulable(id) {
            tracing::debug!("Ignoring selection of {id}");
            return false;
        }
        self.selection.add(id.to_string())
    }

    pub fn selection_remove(&mut self, id: &str) -> bool {
        self.selection.remove(id)
    }

    pub fn selection_clear(&mut self) {
        self.selection.clear();
    }

    /// Pose of the primary selection, where the UI anchors its gizmo
    pub fn gizmo_anchor(&self) -> Option<Pose> {
        self.selection.primary().and_then(|id| self.scene.pose(id))
    }

    /// Which face of the primary selection the pointer ray is over
    pub fn pick_face(&self, ray: &Ray) -> Option<Face> {
        let id = self.selection.primary()?;
        hit_face(ray, &self.scene.pose(id)?, self.scene.size(id)?)
    }

    // ── Gestures ──────────────────────────────────────────────

    pub fn gesture_active(&self) -> bool {
        self.transform.is_active()
    }

    /// Start a drag with the active tool. Ignored for the select tool or an
    /// empty selection.
    pub fn gesture_begin(&mut self) -> bool {
        let Some(kind) = self.tool.gesture_kind() else {
            self.transform.reset();
            return false;
        };
        self.transform.begin(kind, self.selection.all(), &self.scene)
    }

    /// Raw drag input: distance along the face normal, or degrees for rotate
    pub fn gesture_drag(&mut self, face: Face, amount: f64) {
        self.transform.drag(face, amount, &self.settings, &mut self.scene);
    }

    /// Finish the drag and record it. Returns false if no gesture was active.
    pub fn gesture_end(&mut self) -> bool {
        let Some(action) = self.transform.end(&self.scene) else {
            return false;
        };
        self.record(action.kind, action.before, action.after);
        true
    }

    /// Drop a gesture in progress, restoring its start state
    fn abandon_gesture(&mut self) {
        if self.transform.is_active() {
            self.transform.cancel(&mut self.scene);
        }
    }

    // ── History ───────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.abandon_gesture();
        self.history.undo(&mut self.scene, &mut self.selection)
    }

    pub fn redo(&mut self) -> bool {
        self.abandon_gesture();
        self.history.redo(&mut self.scene, &mut self.selection)
    }

    /// Push an action and purge whatever it pushed out
    pub(crate) fn record(&mut self, kind: ActionKind, before: Snapshot, after: Snapshot) {
        let dropped = self.history.push(kind, before, after);
        self.purge(dropped);
    }

    /// Permanently discard detached objects that no remaining action mentions
    fn purge(&mut self, dropped: Vec<Action>) {
        for action in dropped {
            for id in action.handles() {
                if self.scene.exists(&id)
                    && !self.scene.is_attached(&id)
                    && !self.history.references(&id)
                {
                    tracing::debug!("Discarding unreferenced object {id}");
                    self.scene.discard(&id);
                }
            }
        }
    }
}

impl<S: SceneAccess + SceneQuery> EditorSession<S> {
    /// Click selection. Without `additive` the hit object replaces the
    /// selection and a miss clears it; with `additive` the hit object is toggled.
    pub fn select_at(&mut self, ray: &Ray, additive: bool) -> Option<ObjectId> {
        let hit = self
            .scene
            .raycast(ray.origin, ray.direction)
            .filter(|id| self.is_manipulable(id));

        match (&hit, additive) {
            (Some(id), true) => {
                self.selection.toggle(id.clone());
            }
            (Some(id), false) => {
                if self.selection.all() != std::slice::from_ref(id) {
                    self.selection.replace([id.clone()]);
                }
            }
            (None, false) => self.selection.clear(),
            (None, true) => {}
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;
    use std::cell::Cell;
    use std::rc::Rc;

    fn session_with(positions: &[[f64; 3]]) -> (EditorSession<MemoryScene>, Vec<ObjectId>) {
        let mut scene = MemoryScene::new();
        let ids = positions
            .iter()
            .map(|p| scene.insert(&PartTemplate::block("p", [2.0, 2.0, 2.0]).with_pose(Pose::at(*p))))
            .collect();
        (create_session(scene, EditorSettings::default()), ids)
    }

    fn counter(session: &mut EditorSession<MemoryScene>, n: Notification) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        session.subscribe(n, move || c.set(c.get() + 1));
        count
    }

    #[test]
    fn test_selection_add_ignores_invalid() {
        let (mut s, ids) = session_with(&[[0.0; 3], [5.0, 0.0, 0.0]]);
        s.scene.set_locked(&ids[1], true);
        assert!(!s.selection_add("missing"));
        assert!(!s.selection_add(&ids[1]));
        assert!(s.selection_add(&ids[0]));
        assert!(!s.selection_add(&ids[0]));
        assert_eq!(s.selection.count(), 1);
    }

    #[test]
    fn test_select_at_replace_toggle_and_clear() {
        let (mut s, ids) = session_with(&[[0.0, 0.0, 5.0], [5.0, 0.0, 5.0]]);
        let down_z = |x: f64| Ray::new([x, 0.0, 0.0], [0.0, 0.0, 1.0]);

        assert_eq!(s.select_at(&down_z(0.0), false), Some(ids[0].clone()));
        assert_eq!(s.select_at(&down_z(5.0), true), Some(ids[1].clone()));
        assert_eq!(s.selection.all(), ids.as_slice());

        s.select_at(&down_z(5.0), true);
        assert_eq!(s.selection.all(), &[ids[0].clone()]);

        assert_eq!(s.select_at(&down_z(50.0), false), None);
        assert!(s.selection.is_empty());
    }

    #[test]
    fn test_tool_change_notifies_and_cancels_gesture() {
        let (mut s, ids) = session_with(&[[0.0; 3]]);
        let tool_count = counter(&mut s, Notification::ToolChanged);
        s.selection_add(&ids[0]);
        s.set_active_tool(Tool::Move);
        s.set_active_tool(Tool::Move);
        assert_eq!(tool_count.get(), 1);

        assert!(s.gesture_begin());
        s.gesture_drag(Face::Right, 4.0);
        s.set_active_tool(Tool::Scale);
        assert!(!s.gesture_active());
        assert_eq!(s.scene.pose(&ids[0]).unwrap().position, [0.0; 3]);
        assert!(!s.gesture_end());
        assert_eq!(s.history.len(), 0);
    }

    #[test]
    fn test_select_tool_has_no_gesture() {
        let (mut s, ids) = session_with(&[[0.0; 3]]);
        s.selection_add(&ids[0]);
        assert!(!s.gesture_begin());
        s.gesture_drag(Face::Right, 4.0);
        assert_eq!(s.scene.pose(&ids[0]).unwrap().position, [0.0; 3]);
    }

    #[test]
    fn test_gesture_records_history() {
        let (mut s, ids) = session_with(&[[0.0; 3]]);
        let history_count = counter(&mut s, Notification::HistoryChanged);
        s.selection_add(&ids[0]);
        s.set_active_tool(Tool::Move);
        s.gesture_begin();
        s.gesture_drag(Face::Top, 2.4);
        assert!(s.gesture_end());
        assert_eq!(s.history.len(), 1);
        assert_eq!(history_count.get(), 1);
        assert_eq!(s.scene.pose(&ids[0]).unwrap().position, [0.0, 2.0, 0.0]);

        assert!(s.undo());
        assert_eq!(s.scene.pose(&ids[0]).unwrap().position, [0.0; 3]);
    }

    #[test]
    fn test_set_setting_max_history_trims() {
        let (mut s, ids) = session_with(&[[0.0; 3]]);
        s.selection_add(&ids[0]);
        s.set_active_tool(Tool::Move);
        for _ in 0..4 {
            s.gesture_begin();
            s.gesture_drag(Face::Right, 1.0);
            s.gesture_end();
        }
        assert!(s.set_setting(Setting::MaxHistory(2)));
        assert_eq!(s.history.len(), 2);
        assert_eq!(s.history.capacity(), 2);
        assert!(!s.set_setting(Setting::GridStep(0.0)));
    }

    #[test]
    fn test_gizmo_anchor_and_pick_face() {
        let (mut s, ids) = session_with(&[[0.0; 3], [10.0, 0.0, 0.0]]);
        assert!(s.gizmo_anchor().is_none());
        s.selection_add(&ids[0]);
        s.selection_add(&ids[1]);
        assert_eq!(s.gizmo_anchor().unwrap().position, [10.0, 0.0, 0.0]);

        let from_above = Ray::new([10.0, 10.0, 0.0], [0.0, -1.0, 0.0]);
        assert_eq!(s.pick_face(&from_above), Some(Face::Top));
    }

    #[test]
    fn test_destroy_session_returns_scene_and_disconnects() {
        let (mut s, ids) = session_with(&[[0.0; 3]]);
        let count = counter(&mut s, Notification::SelectionChanged);
        s.selection_add(&ids[0]);
        let scene = destroy_session(s);
        assert_eq!(scene.len(), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let (mut s, ids) = session_with(&[[0.0; 3]]);
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let id = s.subscribe(Notification::SelectionChanged, move || c.set(c.get() + 1));
        assert!(s.unsubscribe(Notification::SelectionChanged, id));
        s.selection_add(&ids[0]);
        assert_eq!(count.get(), 0);
    }
}

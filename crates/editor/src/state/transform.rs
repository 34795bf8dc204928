//! Transform/drag operations
//!
//! A gesture captures the selection once at `begin`, then every `drag`
//! recomputes each object from that captured start state. Intermediate drag
//! frames can be dropped or repeated without affecting the result; only the
//! last one before `end` matters.

use glam::DQuat;
use shared::{ActionKind, AxisMode, Face, ObjectId, Pose};

use super::history::{Action, Snapshot};
use super::settings::EditorSettings;
use crate::helpers::{face_normal, pose_from, position_of, rotation_of};
use crate::scene::SceneAccess;
use crate::snap::{snap_angle_degrees, snap_scalar};

/// Smallest size any dimension may be scaled down to
pub const MIN_PART_SIZE: f64 = 0.05;

/// Move by `distance` along the face normal.
///
/// World mode moves along the world axis matching the face; Local mode
/// rotates the normal by the object's orientation first.
pub fn move_pose(start: &Pose, face: Face, distance: f64, axis_mode: AxisMode) -> Pose {
    let offset = face_normal(face) * distance;
    let displacement = match axis_mode {
        AxisMode::World => offset,
        AxisMode::Local => rotation_of(start) * offset,
    };
    Pose {
        position: (position_of(start) + displacement).to_array(),
        rotation: start.rotation,
    }
}

/// Grow or shrink the dragged face by `delta`, keeping the opposite face in place.
///
/// Size is always measured in the object's own axes, so the recentering
/// offset is rotated by the object's orientation regardless of axis mode.
pub fn scale_part(start: &Pose, start_size: [f64; 3], face: Face, delta: f64) -> (Pose, [f64; 3]) {
    let axis = face.axis().index();
    let mut size = start_size;
    size[axis] = (start_size[axis] + delta).max(MIN_PART_SIZE);
    let applied = size[axis] - start_size[axis];

    let shift = rotation_of(start) * (face_normal(face) * (applied * 0.5));
    let pose = Pose {
        position: (position_of(start) + shift).to_array(),
        rotation: start.rotation,
    };
    (pose, size)
}

/// Rotate about the axis of the face normal by `degrees`, around the object's center.
///
/// World mode pre-multiplies (world axis); Local mode post-multiplies
/// (object axis). Always composed with the start orientation.
pub fn rotate_pose(start: &Pose, face: Face, degrees: f64, axis_mode: AxisMode) -> Pose {
    let turn = DQuat::from_axis_angle(face_normal(face), degrees.to_radians());
    let base = rotation_of(start);
    let rotation = match axis_mode {
        AxisMode::World => turn * base,
        AxisMode::Local => base * turn,
    };
    pose_from(position_of(start), rotation.normalize())
}

/// Gesture state: Idle until `begin`, Active until `end` or `cancel`
#[derive(Debug, Default)]
pub struct TransformSession {
    active: bool,
    kind: Option<ActionKind>,
    /// Pose/size of every object at gesture start; drags are computed from it
    start: Snapshot,
}

impl TransformSession {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Objects captured at gesture start
    pub fn start_snapshot(&self) -> &Snapshot {
        &self.start
    }

    /// Drop any cached state without touching the scene
    pub fn reset(&mut self) {
        self.active = false;
        self.kind = None;
        self.start = Snapshot::empty();
    }

    /// Start a gesture over the given objects.
    ///
    /// Always resets first, so a gesture abandoned without `end` leaves nothing
    /// behind. Ignored (returns false) if no attached object is listed or the
    /// kind is not a transform.
    pub fn begin(&mut self, kind: ActionKind, ids: &[ObjectId], scene: &dyn SceneAccess) -> bool {
        self.reset();
        if !matches!(kind, ActionKind::Move | ActionKind::Scale | ActionKind::Rotate) {
            return false;
        }
        let start = Snapshot::capture(ids, scene);
        if start.is_empty() {
            tracing::debug!("Ignoring {} gesture with nothing selected", kind.label());
            return false;
        }
        tracing::debug!("Begin {} gesture on {} object(s)", kind.label(), start.len());
        self.start = start;
        self.kind = Some(kind);
        self.active = true;
        true
    }

    /// Apply raw drag input: a distance for move/scale, degrees for rotate.
    pub fn drag(
        &mut self,
        face: Face,
        amount: f64,
        settings: &EditorSettings,
        scene: &mut dyn SceneAccess,
    ) {
        let Some(kind) = self.kind.filter(|_| self.active) else {
            return;
        };

        let snapped = match kind {
            ActionKind::Rotate => snap_angle_degrees(amount, settings.rot_step, settings.snap_enabled),
            _ => snap_scalar(amount, settings.grid_step, settings.snap_enabled),
        };

        for record in self.start.records() {
            if !scene.exists(&record.id) {
                continue;
            }
            match kind {
                ActionKind::Move => {
                    let pose = move_pose(&record.pose, face, snapped, settings.axis_mode);
                    scene.set_pose(&record.id, pose);
                }
                ActionKind::Scale => {
                    let (pose, size) = scale_part(&record.pose, record.size, face, snapped);
                    scene.set_size(&record.id, size);
                    scene.set_pose(&record.id, pose);
                }
                ActionKind::Rotate => {
                    let pose = rotate_pose(&record.pose, face, snapped, settings.axis_mode);
                    scene.set_pose(&record.id, pose);
                }
                ActionKind::Delete | ActionKind::Paste => {}
            }
        }
    }

    /// Finish the gesture. Returns the action to record, or None if idle.
    /// The after state covers the objects captured at begin, whatever the
    /// selection is now.
    pub fn end(&mut self, scene: &dyn SceneAccess) -> Option<Action> {
        if !self.active {
            return None;
        }
        let kind = self.kind?;
        let before = std::mem::take(&mut self.start);
        let ids: Vec<ObjectId> = before.ids().cloned().collect();
        let after = Snapshot::capture(&ids, scene);
        self.reset();
        tracing::debug!("End {} gesture", kind.label());
        Some(Action { kind, before, after })
    }

    /// Abort the gesture and put every object back where it started
    pub fn cancel(&mut self, scene: &mut dyn SceneAccess) {
        if self.active {
            self.start.apply(scene);
            tracing::debug!("Cancelled gesture");
        }
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;
    use glam::DVec3;
    use shared::PartTemplate;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: [f64; 3], b: [f64; 3]) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    fn quarter_turn_y(position: [f64; 3]) -> Pose {
        pose_from(DVec3::from_array(position), DQuat::from_rotation_y(FRAC_PI_2))
    }

    fn scene_at(positions: &[[f64; 3]]) -> (MemoryScene, Vec<ObjectId>) {
        let mut scene = MemoryScene::new();
        let ids = positions
            .iter()
            .map(|p| scene.insert(&PartTemplate::block("p", [1.0, 1.0, 1.0]).with_pose(Pose::at(*p))))
            .collect();
        (scene, ids)
    }

    #[test]
    fn test_move_world() {
        let p = move_pose(&Pose::at([1.0, 2.0, 3.0]), Face::Right, 3.0, AxisMode::World);
        assert_eq!(p.position, [4.0, 2.0, 3.0]);
    }

    #[test]
    fn test_move_world_ignores_orientation() {
        let p = move_pose(&quarter_turn_y([0.0; 3]), Face::Right, 2.0, AxisMode::World);
        assert_close(p.position, [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_move_local_follows_orientation() {
        // local +X of a quarter turn about Y points along world -Z
        let p = move_pose(&quarter_turn_y([0.0; 3]), Face::Right, 2.0, AxisMode::Local);
        assert_close(p.position, [0.0, 0.0, -2.0]);
    }

    #[test]
    fn test_scale_keeps_opposite_face() {
        let (pose, size) = scale_part(&Pose::at([0.0; 3]), [1.0, 1.0, 1.0], Face::Right, 2.0);
        assert_eq!(size, [3.0, 1.0, 1.0]);
        assert_eq!(pose.position, [1.0, 0.0, 0.0]);
        // left face was at -0.5 and still is
        assert_eq!(pose.position[0] - size[0] / 2.0, -0.5);
    }

    #[test]
    fn test_scale_negative_face() {
        let (pose, size) = scale_part(&Pose::at([0.0; 3]), [2.0, 2.0, 2.0], Face::Bottom, 1.0);
        assert_eq!(size, [2.0, 3.0, 2.0]);
        assert_eq!(pose.position, [0.0, -0.5, 0.0]);
    }

    #[test]
    fn test_scale_clamps_to_minimum() {
        let (pose, size) = scale_part(&Pose::at([0.0; 3]), [1.0, 1.0, 1.0], Face::Right, -5.0);
        assert_eq!(size[0], MIN_PART_SIZE);
        assert!((pose.position[0] - (MIN_PART_SIZE - 1.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_world_and_local_differ_on_rotated_part() {
        let start = quarter_turn_y([0.0; 3]);
        let world = rotate_pose(&start, Face::Right, 90.0, AxisMode::World);
        let local = rotate_pose(&start, Face::Right, 90.0, AxisMode::Local);
        assert_eq!(world.position, start.position);
        let w = rotation_of(&world) * DVec3::Y;
        let l = rotation_of(&local) * DVec3::Y;
        // world X turn tips +Y to +Z; local X (world -Z) tips +Y to +X
        assert_close(w.to_array(), [0.0, 0.0, 1.0]);
        assert_close(l.to_array(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_gesture_multi_move_is_per_object() {
        let (mut scene, ids) = scene_at(&[[0.0, 0.0, 0.0], [5.0, 1.0, 0.0], [-2.0, 0.0, 7.0]]);
        let settings = EditorSettings::default();
        let mut t = TransformSession::default();
        assert!(t.begin(ActionKind::Move, &ids, &scene));
        t.drag(Face::Right, 3.2, &settings, &mut scene);

        assert_eq!(scene.pose(&ids[0]).unwrap().position, [3.0, 0.0, 0.0]);
        assert_eq!(scene.pose(&ids[1]).unwrap().position, [8.0, 1.0, 0.0]);
        assert_eq!(scene.pose(&ids[2]).unwrap().position, [1.0, 0.0, 7.0]);
    }

    #[test]
    fn test_drag_recomputes_from_start() {
        let (mut scene, ids) = scene_at(&[[0.0; 3]]);
        let settings = EditorSettings::default();
        let mut t = TransformSession::default();
        t.begin(ActionKind::Move, &ids, &scene);
        t.drag(Face::Top, 4.0, &settings, &mut scene);
        t.drag(Face::Top, 2.0, &settings, &mut scene);
        t.drag(Face::Top, 2.0, &settings, &mut scene);
        assert_eq!(scene.pose(&ids[0]).unwrap().position, [0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_rotate_gesture_snaps_angle() {
        let (mut scene, ids) = scene_at(&[[0.0; 3]]);
        let settings = EditorSettings::default();
        let mut t = TransformSession::default();
        t.begin(ActionKind::Rotate, &ids, &scene);
        t.drag(Face::Top, 100.0, &settings, &mut scene);
        let q = rotation_of(&scene.pose(&ids[0]).unwrap());
        let (axis, angle) = q.to_axis_angle();
        assert!((angle.to_degrees() - 105.0).abs() < 1e-9);
        assert_close(axis.to_array(), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_drag_when_idle_is_ignored() {
        let (mut scene, ids) = scene_at(&[[0.0; 3]]);
        let mut t = TransformSession::default();
        t.drag(Face::Right, 5.0, &EditorSettings::default(), &mut scene);
        assert_eq!(scene.pose(&ids[0]).unwrap().position, [0.0; 3]);
        assert!(t.end(&scene).is_none());
    }

    #[test]
    fn test_begin_with_nothing_is_ignored() {
        let (scene, _) = scene_at(&[[0.0; 3]]);
        let mut t = TransformSession::default();
        assert!(!t.begin(ActionKind::Move, &[], &scene));
        assert!(!t.is_active());
        assert!(!t.begin(ActionKind::Delete, &["x".to_string()], &scene));
    }

    #[test]
    fn test_end_returns_action() {
        let (mut scene, ids) = scene_at(&[[0.0; 3]]);
        let mut t = TransformSession::default();
        t.begin(ActionKind::Scale, &ids, &scene);
        t.drag(Face::Right, 1.0, &EditorSettings::default(), &mut scene);
        let action = t.end(&scene).unwrap();
        assert_eq!(action.kind, ActionKind::Scale);
        assert_eq!(action.before.records()[0].size, [1.0, 1.0, 1.0]);
        assert_eq!(action.after.records()[0].size, [2.0, 1.0, 1.0]);
        assert!(!t.is_active());
    }

    #[test]
    fn test_abandoned_gesture_does_not_leak() {
        let (mut scene, ids) = scene_at(&[[0.0; 3], [10.0, 0.0, 0.0]]);
        let settings = EditorSettings::default();
        let mut t = TransformSession::default();
        t.begin(ActionKind::Move, &ids[..1], &scene);
        t.drag(Face::Right, 1.0, &settings, &mut scene);

        // new gesture on the other object, first one never ended
        t.begin(ActionKind::Move, &ids[1..], &scene);
        assert_eq!(t.start_snapshot().len(), 1);
        t.drag(Face::Right, 1.0, &settings, &mut scene);
        let action = t.end(&scene).unwrap();
        assert!(!action.references(&ids[0]));
        assert_eq!(scene.pose(&ids[0]).unwrap().position, [1.0, 0.0, 0.0]);
        assert_eq!(scene.pose(&ids[1]).unwrap().position, [11.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cancel_restores_start() {
        let (mut scene, ids) = scene_at(&[[0.0; 3]]);
        let mut t = TransformSession::default();
        t.begin(ActionKind::Scale, &ids, &scene);
        t.drag(Face::Back, 3.0, &EditorSettings::default(), &mut scene);
        t.cancel(&mut scene);
        assert_eq!(scene.size(&ids[0]).unwrap(), [1.0, 1.0, 1.0]);
        assert_eq!(scene.pose(&ids[0]).unwrap().position, [0.0; 3]);
        assert!(!t.is_active());
    }

    #[test]
    fn test_end_covers_objects_captured_at_begin() {
        let (mut scene, ids) = scene_at(&[[0.0; 3], [4.0, 0.0, 0.0]]);
        let mut t = TransformSession::default();
        t.begin(ActionKind::Move, &ids[..1], &scene);
        t.drag(Face::Right, 2.0, &EditorSettings::default(), &mut scene);

        let action = t.end(&scene).unwrap();
        assert_eq!(action.before.len(), 1);
        assert_eq!(action.after.len(), 1);
        assert_eq!(action.after.records()[0].pose.position, [2.0, 0.0, 0.0]);
        assert!(!action.references(&ids[1]));
    }

    #[test]
    fn test_scale_turned_part_shifts_along_rotated_normal() {
        let start = quarter_turn_y([0.0; 3]);
        let (pose, size) = scale_part(&start, [2.0, 1.0, 1.0], Face::Right, 2.0);
        assert_eq!(size, [4.0, 1.0, 1.0]);
        // local +X points along world -Z
        assert_close(pose.position, [0.0, 0.0, -1.0]);
        assert_eq!(pose.rotation, start.rotation);

        // left face stays at world z = +1
        let left_before = position_of(&start) + rotation_of(&start) * DVec3::new(-1.0, 0.0, 0.0);
        let left_after = position_of(&pose) + rotation_of(&pose) * DVec3::new(-2.0, 0.0, 0.0);
        assert_close(left_after.to_array(), left_before.to_array());
        assert_close(left_after.to_array(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_gesture_multi_scale_uses_each_start_size() {
        let mut scene = MemoryScene::new();
        let small = scene.insert(&PartTemplate::block("small", [1.0, 1.0, 1.0]));
        let big = scene.insert(
            &PartTemplate::block("big", [3.0, 2.0, 2.0]).with_pose(Pose::at([10.0, 0.0, 0.0])),
        );
        let ids = vec![small.clone(), big.clone()];
        let settings = EditorSettings::default();
        let mut t = TransformSession::default();
        t.begin(ActionKind::Scale, &ids, &scene);
        t.drag(Face::Right, 1.0, &settings, &mut scene);
        t.drag(Face::Right, 2.0, &settings, &mut scene);

        assert_eq!(scene.size(&small).unwrap(), [3.0, 1.0, 1.0]);
        assert_eq!(scene.size(&big).unwrap(), [5.0, 2.0, 2.0]);
        assert_eq!(scene.pose(&small).unwrap().position, [1.0, 0.0, 0.0]);
        assert_eq!(scene.pose(&big).unwrap().position, [11.0, 0.0, 0.0]);
    }
}

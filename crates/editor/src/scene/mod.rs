//! Scene capabilities consumed by the editor core
//!
//! The core never owns scene objects. It reads and writes them through
//! [`SceneAccess`] and finds them under the pointer through [`SceneQuery`].
//! These two traits are the only environment-coupled surface, so tests swap
//! in [`MemoryScene`].

mod memory;
pub mod picking;

pub use memory::{MemoryScene, SceneObject, WORKSPACE};

use glam::DVec3;
use shared::{Color, ContainerId, ObjectId, PartTemplate, Pose};

/// Read/write access to manipulable scene objects.
///
/// Setters on an id that does not exist are no-ops.
pub trait SceneAccess {
    /// Whether the object still exists (attached or detached)
    fn exists(&self, id: &str) -> bool;

    /// Whether the object may be selected (e.g. not locked)
    fn is_selectable(&self, id: &str) -> bool;

    fn pose(&self, id: &str) -> Option<Pose>;
    fn set_pose(&mut self, id: &str, pose: Pose);

    fn size(&self, id: &str) -> Option<[f64; 3]>;
    fn set_size(&mut self, id: &str, size: [f64; 3]);

    fn color(&self, id: &str) -> Option<Color>;
    fn set_color(&mut self, id: &str, color: Color);

    /// Container the object is attached to, `None` when detached or missing
    fn container(&self, id: &str) -> Option<ContainerId>;
    fn set_container(&mut self, id: &str, container: Option<ContainerId>);

    /// Everything needed to recreate the object
    fn template(&self, id: &str) -> Option<PartTemplate>;

    /// Create a new detached object from a template
    fn create(&mut self, template: &PartTemplate) -> ObjectId;

    /// Container new objects are attached to
    fn default_container(&self) -> ContainerId;

    /// Permanently drop an object nothing refers to any more
    fn discard(&mut self, id: &str);

    /// Attached and existing
    fn is_attached(&self, id: &str) -> bool {
        self.container(id).is_some()
    }
}

/// Pointer queries against the scene
pub trait SceneQuery {
    /// Nearest attached object hit by the ray
    fn raycast(&self, origin: DVec3, direction: DVec3) -> Option<ObjectId>;
}

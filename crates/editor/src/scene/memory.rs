//! In-memory scene used by the harness, the tests and the headless front end

use glam::DVec3;
use serde::{Deserialize, Serialize};
use shared::{Color, ContainerId, Material, ObjectId, PartTemplate, Pose, Shape};

use super::picking::{pick_nearest, Ray};
use super::{SceneAccess, SceneQuery};

/// Container every object is attached to unless told otherwise
pub const WORKSPACE: &str = "workspace";

fn default_true() -> bool {
    true
}

/// A placed box primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub shape: Shape,
    pub size: [f64; 3],
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub material: Material,
    #[serde(default)]
    pub pose: Pose,
    /// `None` while detached (deleted but still undoable)
    pub container: Option<ContainerId>,
    /// Locked objects cannot be selected
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl SceneObject {
    fn from_template(id: ObjectId, template: &PartTemplate) -> Self {
        Self {
            id,
            name: template.name.clone(),
            shape: template.shape,
            size: template.size,
            color: template.color,
            material: template.material,
            pose: template.pose,
            container: None,
            locked: false,
            visible: true,
        }
    }
}

/// Flat list of objects, in creation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryScene {
    objects: Vec<SceneObject>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an object from a template and attach it to the workspace
    pub fn insert(&mut self, template: &PartTemplate) -> ObjectId {
        let id = self.create(template);
        self.set_container(&id, Some(WORKSPACE.to_string()));
        id
    }

    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// All objects, attached or not
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Objects currently attached to a container
    pub fn attached(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| o.container.is_some())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove an object outright, as an external script would.
    /// History entries that still mention it become stale.
    pub fn destroy(&mut self, id: &str) -> bool {
        let before = self.objects.len();
        self.objects.retain(|o| o.id != id);
        self.objects.len() != before
    }

    pub fn set_locked(&mut self, id: &str, locked: bool) {
        if let Some(obj) = self.get_mut(id) {
            obj.locked = locked;
        }
    }
}

impl SceneAccess for MemoryScene {
    fn exists(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    fn is_selectable(&self, id: &str) -> bool {
        self.get(id).is_some_and(|o| !o.locked)
    }

    fn pose(&self, id: &str) -> Option<Pose> {
        self.get(id).map(|o| o.pose)
    }

    fn set_pose(&mut self, id: &str, pose: Pose) {
        if let Some(obj) = self.get_mut(id) {
            obj.pose = pose;
        }
    }

    fn size(&self, id: &str) -> Option<[f64; 3]> {
        self.get(id).map(|o| o.size)
    }

    fn set_size(&mut self, id: &str, size: [f64; 3]) {
        if let Some(obj) = self.get_mut(id) {
            obj.size = size;
        }
    }

    fn color(&self, id: &str) -> Option<Color> {
        self.get(id).map(|o| o.color)
    }

    fn set_color(&mut self, id: &str, color: Color) {
        if let Some(obj) = self.get_mut(id) {
            obj.color = color;
        }
    }

    fn container(&self, id: &str) -> Option<ContainerId> {
        self.get(id).and_then(|o| o.container.clone())
    }

    fn set_container(&mut self, id: &str, container: Option<ContainerId>) {
        if let Some(obj) = self.get_mut(id) {
            obj.container = container;
        }
    }

    fn template(&self, id: &str) -> Option<PartTemplate> {
        self.get(id).map(|o| PartTemplate {
            name: o.name.clone(),
            shape: o.shape,
            size: o.size,
            color: o.color,
            material: o.material,
            pose: o.pose,
        })
    }

    fn create(&mut self, template: &PartTemplate) -> ObjectId {
        let id = uuid::Uuid::new_v4().to_string();
        self.objects.push(SceneObject::from_template(id.clone(), template));
        id
    }

    fn default_container(&self) -> ContainerId {
        WORKSPACE.to_string()
    }

    fn discard(&mut self, id: &str) {
        self.destroy(id);
    }
}

impl SceneQuery for MemoryScene {
    fn raycast(&self, origin: DVec3, direction: DVec3) -> Option<ObjectId> {
        let ray = Ray { origin, direction };
        pick_nearest(
            &ray,
            self.attached()
                .filter(|o| o.visible)
                .map(|o| (o.id.as_str(), &o.pose, o.size)),
        )
    }
}

use serde::{Deserialize, Serialize};

/// Уникальный идентификатор объекта в сцене
pub type ObjectId = String;

/// Идентификатор контейнера, к которому прикреплён объект
pub type ContainerId = String;

fn identity_rotation() -> [f64; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

/// Поза объекта: позиция центра и ориентация (кватернион x, y, z, w)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: [f64; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f64; 4],
}

impl Default for Pose {
    fn default() -> Self {
        Self::new()
    }
}

impl Pose {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: identity_rotation(),
        }
    }

    /// Поза без поворота в заданной точке
    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            rotation: identity_rotation(),
        }
    }
}

/// Цвет RGB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(163, 162, 165)
    }
}

/// Материал детали
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Plastic,
    SmoothPlastic,
    Wood,
    Metal,
    Concrete,
    Glass,
    Neon,
}

/// Форма детали (поддерживаются только параллелепипеды)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    #[default]
    Block,
}

/// Шаблон детали: всё, что нужно, чтобы создать новый объект
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartTemplate {
    pub name: String,
    #[serde(default)]
    pub shape: Shape,
    /// Размеры по локальным осям X, Y, Z
    pub size: [f64; 3],
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub material: Material,
    #[serde(default)]
    pub pose: Pose,
}

impl PartTemplate {
    /// Серый пластиковый блок в начале координат
    pub fn block(name: impl Into<String>, size: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Block,
            size,
            color: Color::default(),
            material: Material::default(),
            pose: Pose::new(),
        }
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Координатная ось
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Грань параллелепипеда, за которую тянут манипулятор
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    /// +X
    Right,
    /// -X
    Left,
    /// +Y
    Top,
    /// -Y
    Bottom,
    /// +Z
    Back,
    /// -Z
    Front,
}

impl Face {
    pub fn all() -> &'static [Face] {
        &[
            Face::Right,
            Face::Left,
            Face::Top,
            Face::Bottom,
            Face::Back,
            Face::Front,
        ]
    }

    pub fn axis(&self) -> Axis {
        match self {
            Face::Right | Face::Left => Axis::X,
            Face::Top | Face::Bottom => Axis::Y,
            Face::Back | Face::Front => Axis::Z,
        }
    }

    /// +1 для положительных граней, -1 для отрицательных
    pub fn sign(&self) -> f64 {
        match self {
            Face::Right | Face::Top | Face::Back => 1.0,
            Face::Left | Face::Bottom | Face::Front => -1.0,
        }
    }

    /// Единичная нормаль грани в локальных осях объекта
    pub fn normal(&self) -> [f64; 3] {
        let mut n = [0.0; 3];
        n[self.axis().index()] = self.sign();
        n
    }

    /// Грань по оси и знаку нормали
    pub fn from_axis(axis: Axis, positive: bool) -> Self {
        match (axis, positive) {
            (Axis::X, true) => Face::Right,
            (Axis::X, false) => Face::Left,
            (Axis::Y, true) => Face::Top,
            (Axis::Y, false) => Face::Bottom,
            (Axis::Z, true) => Face::Back,
            (Axis::Z, false) => Face::Front,
        }
    }
}

/// Система координат для перемещения и вращения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisMode {
    #[default]
    World,
    Local,
}

/// Активный инструмент
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Select,
    Move,
    Scale,
    Rotate,
}

impl Tool {
    /// Тип действия, который записывает жест этого инструмента
    pub fn gesture_kind(&self) -> Option<ActionKind> {
        match self {
            Tool::Select => None,
            Tool::Move => Some(ActionKind::Move),
            Tool::Scale => Some(ActionKind::Scale),
            Tool::Rotate => Some(ActionKind::Rotate),
        }
    }
}

/// Тип записи в истории отмены
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Move,
    Scale,
    Rotate,
    Delete,
    Paste,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Move => "Move",
            ActionKind::Scale => "Scale",
            ActionKind::Rotate => "Rotate",
            ActionKind::Delete => "Delete",
            ActionKind::Paste => "Paste",
        }
    }
}

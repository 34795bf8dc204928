//! Factory functions for creating test data.
//!
//! Provides helpers to construct `PartTemplate`s, populated `MemoryScene`s and
//! settings variants used in tests and by the command interface.

use glam::{DQuat, DVec3};
use shared::*;

use crate::helpers::pose_from;
use crate::scene::MemoryScene;
use crate::state::EditorSettings;

// ── Part factories ──────────────────────────────────────────────

/// Unit block at the origin.
pub fn unit_block(name: &str) -> PartTemplate {
    PartTemplate::block(name, [1.0, 1.0, 1.0])
}

/// Block of the given size at a position.
pub fn block_at(name: &str, size: [f64; 3], position: [f64; 3]) -> PartTemplate {
    PartTemplate::block(name, size).with_pose(Pose::at(position))
}

/// Block turned about the Y axis by `degrees`.
pub fn block_turned_y(name: &str, size: [f64; 3], position: [f64; 3], degrees: f64) -> PartTemplate {
    PartTemplate::block(name, size).with_pose(pose_from(
        DVec3::from_array(position),
        DQuat::from_rotation_y(degrees.to_radians()),
    ))
}

/// Red metal block, for checking that color/material survive copies.
pub fn red_metal_block(name: &str, position: [f64; 3]) -> PartTemplate {
    PartTemplate {
        material: Material::Metal,
        ..block_at(name, [2.0, 1.0, 4.0], position).with_color(Color::rgb(200, 30, 30))
    }
}

// ── Scene factories ─────────────────────────────────────────────

/// Scene holding the given templates, with their ids in insertion order.
pub fn scene_with(templates: &[PartTemplate]) -> (MemoryScene, Vec<ObjectId>) {
    let mut scene = MemoryScene::new();
    let ids = templates.iter().map(|t| scene.insert(t)).collect();
    (scene, ids)
}

/// Three unit blocks at distinct, non-grid-aligned positions.
pub fn scene_three_blocks() -> (MemoryScene, Vec<ObjectId>) {
    scene_with(&[
        block_at("a", [1.0, 1.0, 1.0], [0.0, 0.5, 0.0]),
        block_at("b", [1.0, 1.0, 1.0], [4.25, 0.5, -1.0]),
        block_at("c", [1.0, 1.0, 1.0], [-3.0, 2.5, 7.75]),
    ])
}

/// A stack of `n` unit blocks along Y.
pub fn tower(n: usize) -> (MemoryScene, Vec<ObjectId>) {
    let templates: Vec<PartTemplate> = (0..n)
        .map(|i| block_at(&format!("level{i}"), [1.0, 1.0, 1.0], [0.0, i as f64 + 0.5, 0.0]))
        .collect();
    scene_with(&templates)
}

// ── Settings factories ──────────────────────────────────────────

/// Default settings with snapping turned off.
pub fn free_settings() -> EditorSettings {
    EditorSettings {
        snap_enabled: false,
        ..EditorSettings::default()
    }
}

/// Default settings with a small history cap.
pub fn short_history(max_history: usize) -> EditorSettings {
    EditorSettings {
        max_history,
        ..EditorSettings::default()
    }
}

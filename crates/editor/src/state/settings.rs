//! Editor settings

use serde::{Deserialize, Serialize};
use shared::AxisMode;

/// Snapping, axis and history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Grid step for move/scale snapping and paste lift, in world units
    pub grid_step: f64,
    /// Rotation snapping step in degrees
    pub rot_step: f64,
    /// Enable snapping
    pub snap_enabled: bool,
    /// World or object-local axes for move/rotate
    pub axis_mode: AxisMode,
    /// Maximum number of undo steps kept
    pub max_history: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid_step: 1.0,
            rot_step: 15.0,
            snap_enabled: true,
            axis_mode: AxisMode::World,
            max_history: 50,
        }
    }
}

/// A single setting change, as issued by the UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "value", rename_all = "snake_case")]
pub enum Setting {
    GridStep(f64),
    RotStep(f64),
    SnapEnabled(bool),
    AxisMode(AxisMode),
    MaxHistory(usize),
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

impl EditorSettings {
    /// Apply a setting change. Out-of-range values are rejected and leave the
    /// settings untouched.
    pub fn apply(&mut self, setting: Setting) -> bool {
        match setting {
            Setting::GridStep(v) if positive(v) => self.grid_step = v,
            Setting::RotStep(v) if positive(v) => self.rot_step = v,
            Setting::SnapEnabled(v) => self.snap_enabled = v,
            Setting::AxisMode(v) => self.axis_mode = v,
            Setting::MaxHistory(v) if v > 0 => self.max_history = v,
            rejected => {
                tracing::warn!("Ignoring invalid setting {:?}", rejected);
                return false;
            }
        }
        true
    }

    /// Replace invalid values (e.g. from a hand-edited file) with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !positive(self.grid_step) {
            self.grid_step = defaults.grid_step;
        }
        if !positive(self.rot_step) {
            self.rot_step = defaults.rot_step;
        }
        if self.max_history == 0 {
            self.max_history = defaults.max_history;
        }
        self
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "scene-editor", "scene-editor") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str::<Self>(&json) {
                    Ok(settings) => return settings.sanitized(),
                    Err(e) => tracing::warn!("Failed to parse {}: {e}", config_path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "scene-editor", "scene-editor") {
            self.save_to(&dirs.config_dir().join("settings.json"));
        }
    }

    /// Write settings as JSON, creating parent directories. Failures are
    /// logged and reported as false.
    pub fn save_to(&self, config_path: &std::path::Path) -> bool {
        if let Some(config_dir) = config_path.parent() {
            if let Err(e) = std::fs::create_dir_all(config_dir) {
                tracing::warn!("Failed to create {}: {e}", config_dir.display());
                return false;
            }
        }
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize settings: {e}");
                return false;
            }
        };
        match std::fs::write(config_path, json) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to write {}: {e}", config_path.display());
                false
            }
        }
    }
}

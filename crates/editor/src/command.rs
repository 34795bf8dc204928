//! JSON command protocol for driving a session from outside the process.
//!
//! Every command maps onto one call of the session's command surface.

use serde::{Deserialize, Serialize};
use shared::{Face, PartTemplate, Tool};

use crate::scene::picking::Ray;
use crate::scene::{SceneAccess, SceneQuery};
use crate::state::{EditorSession, ObjectRecord, Setting};

/// A command issued by a front end.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Place a new object (not recorded in history)
    CreatePart { part: PartTemplate },
    /// Click-select along a pointer ray
    SelectAt {
        origin: [f64; 3],
        direction: [f64; 3],
        #[serde(default)]
        additive: bool,
    },
    SelectionAdd { id: String },
    SelectionRemove { id: String },
    SelectionClear,
    SetActiveTool { tool: Tool },
    /// Which face of the primary selection is under the pointer
    PickFace {
        origin: [f64; 3],
        direction: [f64; 3],
    },
    GestureBegin,
    GestureDrag { face: Face, amount: f64 },
    GestureEnd,
    Copy,
    Paste { point: [f64; 3] },
    Duplicate { point: [f64; 3] },
    Delete,
    /// Undo the last operation.
    Undo,
    /// Redo the last undone operation.
    Redo,
    SetSetting { setting: Setting },
    /// Report tool, selection, history and settings.
    Inspect,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Execute a single command on the session.
pub fn execute_command<S>(session: &mut EditorSession<S>, cmd: EditorCommand) -> CommandResponse
where
    S: SceneAccess + SceneQuery,
{
    match cmd {
        EditorCommand::CreatePart { part } => {
            let id = session.scene.create(&part);
            let container = session.scene.default_container();
            session.scene.set_container(&id, Some(container));
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        EditorCommand::SelectAt {
            origin,
            direction,
            additive,
        } => {
            let hit = session.select_at(&Ray::new(origin, direction), additive);
            CommandResponse::ok_with_data(serde_json::json!({ "hit": hit }))
        }

        EditorCommand::SelectionAdd { id } => {
            let added = session.selection_add(&id);
            CommandResponse::ok_with_data(serde_json::json!({ "added": added }))
        }

        EditorCommand::SelectionRemove { id } => {
            let removed = session.selection_remove(&id);
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        EditorCommand::SelectionClear => {
            session.selection_clear();
            CommandResponse::ok()
        }

        EditorCommand::SetActiveTool { tool } => {
            session.set_active_tool(tool);
            CommandResponse::ok()
        }

        EditorCommand::PickFace { origin, direction } => {
            let face = session.pick_face(&Ray::new(origin, direction));
            CommandResponse::ok_with_data(serde_json::json!({ "face": face }))
        }

        EditorCommand::GestureBegin => {
            let started = session.gesture_begin();
            CommandResponse::ok_with_data(serde_json::json!({ "started": started }))
        }

        EditorCommand::GestureDrag { face, amount } => {
            session.gesture_drag(face, amount);
            CommandResponse::ok()
        }

        EditorCommand::GestureEnd => {
            let recorded = session.gesture_end();
            CommandResponse::ok_with_data(serde_json::json!({ "recorded": recorded }))
        }

        EditorCommand::Copy => {
            let copied = session.copy();
            CommandResponse::ok_with_data(serde_json::json!({ "copied": copied }))
        }

        EditorCommand::Paste { point } => {
            let ids = session.paste(point);
            CommandResponse::ok_with_data(serde_json::json!({ "ids": ids }))
        }

        EditorCommand::Duplicate { point } => {
            let ids = session.duplicate(point);
            CommandResponse::ok_with_data(serde_json::json!({ "ids": ids }))
        }

        EditorCommand::Delete => {
            let deleted = session.delete();
            CommandResponse::ok_with_data(serde_json::json!({ "deleted": deleted }))
        }

        EditorCommand::Undo => {
            let success = session.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        EditorCommand::Redo => {
            let success = session.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        EditorCommand::SetSetting { setting } => {
            if session.set_setting(setting) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("Rejected setting {setting:?}"))
            }
        }

        EditorCommand::Inspect => {
            let selected: Vec<ObjectRecord> = session
                .selection
                .all()
                .iter()
                .filter_map(|id| ObjectRecord::capture(id, &session.scene))
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "tool": session.active_tool(),
                "gesture_active": session.gesture_active(),
                "selection": selected,
                "primary": session.selection.primary(),
                "history": {
                    "index": session.history.index(),
                    "len": session.history.len(),
                    "can_undo": session.history.can_undo(),
                    "can_redo": session.history.can_redo(),
                    "next_undo": session.history.peek_undo().map(|a| a.kind),
                },
                "clipboard_len": session.clipboard.len(),
                "settings": session.settings,
            }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json<S>(session: &mut EditorSession<S>, json: &str) -> Result<CommandResponse, String>
where
    S: SceneAccess + SceneQuery,
{
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(session, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch<S>(
    session: &mut EditorSession<S>,
    json: &str,
) -> Result<Vec<CommandResponse>, String>
where
    S: SceneAccess + SceneQuery,
{
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(session, cmd))
        .collect())
}

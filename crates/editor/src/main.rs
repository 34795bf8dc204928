use std::io::{self, BufRead, Write};

use scene_editor_lib::command::{execute_json, CommandResponse};
use scene_editor_lib::scene::MemoryScene;
use scene_editor_lib::state::{create_session, destroy_session, EditorSettings, Notification};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_editor=info,scene_editor_lib=info".into()),
        )
        .init();

    let settings = EditorSettings::load();
    let mut session = create_session(MemoryScene::new(), settings);

    session.subscribe(Notification::SelectionChanged, || {
        tracing::debug!("selection changed")
    });
    session.subscribe(Notification::ToolChanged, || tracing::debug!("tool changed"));
    session.subscribe(Notification::HistoryChanged, || {
        tracing::debug!("history changed")
    });

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match execute_json(&mut session, &line) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("{e}");
                CommandResponse::err(e)
            }
        };

        match serde_json::to_string(&response) {
            Ok(json) => {
                if writeln!(stdout, "{json}").and_then(|_| stdout.flush()).is_err() {
                    break;
                }
            }
            Err(e) => tracing::error!("Failed to serialize response: {e}"),
        }
    }

    session.settings.save();
    let scene = destroy_session(session);
    tracing::info!("Session closed with {} object(s)", scene.len());
}

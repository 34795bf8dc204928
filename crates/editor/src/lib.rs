// Library crate: the editing core (selection, history, transform gestures,
// clipboard) plus the JSON command interface and the headless harness.
// The binary only wires stdin/stdout to the command interface.

pub mod command;
pub mod fixtures;
pub mod harness;
pub mod helpers;
pub mod presentation;
pub mod scene;
pub mod snap;
pub mod state;

//! Synchronous change notifications
//!
//! Each emitting component owns a [`Signal`]. Listeners take no arguments and
//! run on the emitting call, in the order they were connected.

use serde::{Deserialize, Serialize};

/// The notifications the editor core emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    SelectionChanged,
    ToolChanged,
    HistoryChanged,
}

/// Handle returned by [`Signal::connect`], used to disconnect again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registry of zero-argument listeners
#[derive(Default)]
pub struct Signal {
    next_id: u64,
    listeners: Vec<(ListenerId, Box<dyn FnMut()>)>,
}

impl Signal {
    pub fn connect(&mut self, listener: impl FnMut() + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was not connected
    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    pub fn disconnect_all(&mut self) {
        self.listeners.clear();
    }

    pub fn emit(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

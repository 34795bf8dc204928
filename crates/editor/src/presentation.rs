//! Selection highlight bookkeeping for a renderer
//!
//! The core never tags scene objects with visual state. A front end keeps a
//! [`HighlightTable`] and calls [`HighlightTable::sync`] whenever the session
//! emits `SelectionChanged`.

use std::collections::HashMap;

use shared::{Color, ObjectId};

use crate::state::selection::SelectionState;

/// Visual state of one highlighted object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub color: Color,
    /// Primary selection gets the gizmo
    pub primary: bool,
}

/// Side table from object identity to highlight record
#[derive(Debug, Clone)]
pub struct HighlightTable {
    color: Color,
    entries: HashMap<ObjectId, Highlight>,
}

impl Default for HighlightTable {
    fn default() -> Self {
        Self::new(Color::rgb(0, 220, 255))
    }
}

/// What changed during a sync, for renderers that update incrementally
#[derive(Debug, Default, PartialEq, Eq)]
pub struct HighlightDiff {
    pub added: Vec<ObjectId>,
    pub removed: Vec<ObjectId>,
}

impl HighlightTable {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Highlight> {
        self.entries.get(id)
    }

    pub fn is_highlighted(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bring the table in line with the selection
    pub fn sync(&mut self, selection: &SelectionState) -> HighlightDiff {
        let mut diff = HighlightDiff::default();

        let stale: Vec<ObjectId> = self
            .entries
            .keys()
            .filter(|id| !selection.contains(id))
            .cloned()
            .collect();
        for id in stale {
            self.entries.remove(&id);
            diff.removed.push(id);
        }

        let primary = selection.primary();
        for id in selection.all() {
            let highlight = Highlight {
                color: self.color,
                primary: primary == Some(id),
            };
            if self.entries.insert(id.clone(), highlight).is_none() {
                diff.added.push(id.clone());
            }
        }
        diff
    }
}

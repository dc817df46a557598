//! Serializable copy of an annotation session.

use serde::{Deserialize, Serialize};

use crate::model::{Label, QuadrantId};

/// Labels and history of one quadrant, for keeping work across reloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Quadrant the labels were drawn on
    pub quadrant_id: QuadrantId,
    /// Label sets, oldest first
    pub log: Vec<Vec<Label>>,
    /// Index of the current label set in `log`
    pub cursor: usize,
}

impl SessionSnapshot {
    /// Serialize the snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The label set the cursor points at, if the cursor is valid.
    pub fn current(&self) -> Option<&[Label]> {
        self.log.get(self.cursor).map(Vec::as_slice)
    }
}

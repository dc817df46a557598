//! Work queues for the sizing and classifying tasks.
//!
//! Both tasks walk a list fetched from the data service, advancing with
//! wrap-around after each successful submission. Only the position is
//! persisted; the list itself is fetched again on the next start.

use serde::{Deserialize, Serialize};

use crate::model::Quadrant;
use crate::overlay::Rock;

/// Quadrants awaiting outlines.
pub type QuadrantQueue = WorkQueue<Quadrant>;

/// Rocks awaiting classification.
pub type RockQueue = WorkQueue<Rock>;

/// Last viewed position, kept across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueuePosition {
    pub last_viewed: usize,
}

impl QueuePosition {
    /// Serialize the position to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a position from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// An ordered list of work items with a current position.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkQueue<T> {
    items: Vec<T>,
    current_index: usize,
}

impl<T> WorkQueue<T> {
    /// Start at the first item.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            current_index: 0,
        }
    }

    /// Resume at a saved position. A position past the end of a shorter
    /// list starts over at the first item.
    pub fn resume(items: Vec<T>, position: QueuePosition) -> Self {
        let current_index = if position.last_viewed < items.len() {
            position.last_viewed
        } else {
            if !items.is_empty() {
                log::debug!(
                    "Saved position {} outside {} items, starting over",
                    position.last_viewed,
                    items.len()
                );
            }
            0
        };
        Self {
            items,
            current_index,
        }
    }

    /// Get the current item.
    pub fn current(&self) -> Option<&T> {
        self.items.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Move to the next item, wrapping around, and return it.
    pub fn advance(&mut self) -> Option<&T> {
        if !self.items.is_empty() {
            self.current_index = (self.current_index + 1) % self.items.len();
        }
        self.current()
    }

    /// Position to persist.
    pub fn position(&self) -> QueuePosition {
        QueuePosition {
            last_viewed: self.current_index,
        }
    }

    /// Get progress string like "3/15".
    pub fn progress(&self) -> String {
        format!("{}/{}", self.current_index + 1, self.items.len())
    }
}

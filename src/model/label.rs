//! Labels: polygons committed by the annotator.

use serde::{Deserialize, Serialize};

use super::point::LocalPoint;

/// A committed polygon in quadrant-local space, as drawn.
///
/// The ring is left open; closure is added when the label is encoded.
/// Labels with fewer than three points are kept here and only rejected at
/// submission.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label {
    points: Vec<LocalPoint>,
}

impl Label {
    pub fn new(points: Vec<LocalPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[LocalPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Raw `[x, y]` pairs, as sent in the submission payload.
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| p.to_array()).collect()
    }
}

impl From<Vec<LocalPoint>> for Label {
    fn from(points: Vec<LocalPoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<LocalPoint> for Label {
    fn from_iter<I: IntoIterator<Item = LocalPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

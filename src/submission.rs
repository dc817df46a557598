//! Submission payload and the external collaborator that receives it.
//!
//! The payload carries quadrant-local coordinates. The collaborator applies
//! the same origin, flip and rounding rules as [`crate::engine`] before it
//! stores a polygon literal; [`SubmissionPayload::to_wkt`] is that side of the
//! contract, used to check that both sides agree.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::{SinkError, ValidationError, WktError};
use crate::grid::TileGrid;
use crate::model::{ImageRef, Label, Quadrant};
use crate::wkt;

/// Receives finished geometry payloads.
///
/// Implementations own transport concerns such as timeouts and retries.
pub trait GeometrySink {
    /// Deliver one tile's payload. Any error leaves the session unchanged.
    fn submit(&self, payload: &SubmissionPayload)
    -> impl Future<Output = Result<(), SinkError>>;
}

/// One polygon in GeoJSON-like form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryPayload {
    /// Always `"Polygon"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// A single ring of quadrant-local `[x, y]` pairs.
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl GeometryPayload {
    pub fn polygon(ring: Vec<[f64; 2]>) -> Self {
        Self {
            kind: "Polygon".to_string(),
            coordinates: vec![ring],
        }
    }

    fn ring(&self) -> &[[f64; 2]] {
        self.coordinates.first().map(Vec::as_slice).unwrap_or_default()
    }
}

/// Quadrant fields the collaborator needs to place the polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadrantPayload {
    pub width: f64,
    pub height: f64,
    pub quadrant_number: u32,
    pub image: ImageRef,
}

impl From<&Quadrant> for QuadrantPayload {
    fn from(quadrant: &Quadrant) -> Self {
        Self {
            width: quadrant.width,
            height: quadrant.height,
            quadrant_number: quadrant.quadrant_number,
            image: ImageRef::new(quadrant.source_image_id(), quadrant.image.num_quadrants),
        }
    }
}

/// Everything submitted for one tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub geometries: Vec<GeometryPayload>,
    pub quadrant: QuadrantPayload,
}

impl SubmissionPayload {
    /// Build the payload for `labels` drawn on `quadrant`.
    pub fn new(quadrant: &Quadrant, labels: &[Label]) -> Self {
        Self {
            geometries: labels
                .iter()
                .map(|label| GeometryPayload::polygon(label.coordinates()))
                .collect(),
            quadrant: quadrant.into(),
        }
    }

    /// Check every quadrant field, reporting all offending ones at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.geometries.is_empty() {
            return Err(ValidationError::Empty);
        }

        let q = &self.quadrant;
        let mut invalid = Vec::new();
        if !(q.width.is_finite() && q.width > 0.0) {
            invalid.push("width: must be a positive number".to_string());
        }
        if !(q.height.is_finite() && q.height > 0.0) {
            invalid.push("height: must be a positive number".to_string());
        }
        if q.quadrant_number == 0 {
            invalid.push("quadrantNumber: must be a positive number".to_string());
        }
        if q.image.id == 0 {
            invalid.push("image.id: must be a positive number".to_string());
        }
        if q.image.num_quadrants == 0 {
            invalid.push("image.numQuadrants: must be a positive number".to_string());
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Fields(invalid))
        }
    }

    /// Convert every geometry to a global polygon literal, the way the
    /// receiving service does.
    ///
    /// Rounding happens in top-left pixel space, before the flip.
    pub fn to_wkt(&self) -> Result<Vec<String>, ValidationError> {
        self.validate()?;

        let q = &self.quadrant;
        let grid = TileGrid::new(q.image.num_quadrants, q.width, q.height)?;
        let origin = grid.origin_of(q.quadrant_number)?;
        let image_height = grid.image_height();

        self.geometries
            .iter()
            .enumerate()
            .map(|(index, geometry)| {
                let ring = geometry.ring();
                let mut pixels = Vec::with_capacity(ring.len() + 1);
                for (point, [x, y]) in ring.iter().enumerate() {
                    let gx = (origin.x + x + 0.5).floor();
                    let gy = image_height - (origin.y + y + 0.5).floor();
                    if !gx.is_finite() || !gy.is_finite() {
                        return Err(ValidationError::geometry(
                            index,
                            WktError::NonFinite { index: point },
                        ));
                    }
                    pixels.push([gx as i64, gy as i64]);
                }
                wkt::check_vertex_count(&pixels)
                    .map_err(|e| ValidationError::geometry(index, e))?;
                if ring.first() != ring.last() {
                    pixels.push(pixels[0]);
                }

                let pairs: Vec<String> = pixels.iter().map(|[x, y]| format!("{} {}", x, y)).collect();
                let literal = format!("POLYGON(({}))", pairs.join(", "));
                if wkt::parse_polygon(&literal).is_none() {
                    return Err(ValidationError::geometry(index, WktError::Malformed(literal)));
                }
                Ok(literal)
            })
            .collect()
    }
}

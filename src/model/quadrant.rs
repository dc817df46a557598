//! Quadrant and source-image metadata supplied by the data service.

use serde::{Deserialize, Serialize};

use super::point::Dimensions;

/// Unique identifier for a quadrant.
pub type QuadrantId = u64;

/// The source photograph a quadrant was cut from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Image identifier in the data service.
    #[serde(default)]
    pub id: u64,
    /// Number of tiles in the `n × n` grid.
    #[serde(alias = "numquadrants")]
    pub num_quadrants: u32,
}

/// One tile of an `n × n` grid partitioning a photograph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quadrant {
    pub id: QuadrantId,
    pub width: f64,
    pub height: f64,
    /// 1-based position in the grid, row-major from the top-left tile.
    #[serde(alias = "quadrantnumber")]
    pub quadrant_number: u32,
    /// Top-level image id as reported by the data service listing.
    #[serde(default, rename = "imageid", skip_serializing_if = "Option::is_none")]
    pub image_id: Option<u64>,
    pub image: ImageRef,
}

impl Quadrant {
    pub fn new(id: QuadrantId, width: f64, height: f64, quadrant_number: u32, image: ImageRef) -> Self {
        Self {
            id,
            width,
            height,
            quadrant_number,
            image_id: None,
            image,
        }
    }

    /// Pixel size of this quadrant's bitmap.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Image id, preferring the top-level field over the nested one.
    pub fn source_image_id(&self) -> u64 {
        self.image_id.unwrap_or(self.image.id)
    }
}

impl ImageRef {
    pub fn new(id: u64, num_quadrants: u32) -> Self {
        Self { id, num_quadrants }
    }
}

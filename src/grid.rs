//! Placement of quadrants within a square tile grid.

use crate::error::GridError;
use crate::model::{Dimensions, Quadrant};

/// Top-left corner of a tile within the stitched image, in top-left-origin
/// pixels (before the vertical flip into global space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileOrigin {
    pub x: f64,
    pub y: f64,
}

impl TileOrigin {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An `n × n` grid of uniformly sized tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileGrid {
    side: u32,
    tile: Dimensions,
}

impl TileGrid {
    /// Validate a grid of `num_quadrants` tiles of `tile_width × tile_height`.
    pub fn new(num_quadrants: u32, tile_width: f64, tile_height: f64) -> Result<Self, GridError> {
        let side = integer_sqrt(num_quadrants).ok_or(GridError::NotSquare(num_quadrants))?;
        check_dimension("width", tile_width)?;
        check_dimension("height", tile_height)?;

        Ok(Self {
            side,
            tile: Dimensions::new(tile_width, tile_height),
        })
    }

    /// Grid described by a quadrant's own metadata.
    pub fn for_quadrant(quadrant: &Quadrant) -> Result<Self, GridError> {
        Self::new(quadrant.image.num_quadrants, quadrant.width, quadrant.height)
    }

    /// Tiles per row (and per column).
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Total number of tiles.
    pub fn len(&self) -> u32 {
        self.side * self.side
    }

    /// Always false; a valid grid has at least one tile.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn tile(&self) -> Dimensions {
        self.tile
    }

    /// Width of the stitched image.
    pub fn image_width(&self) -> f64 {
        f64::from(self.side) * self.tile.width
    }

    /// Height of the stitched image, used for the vertical flip.
    pub fn image_height(&self) -> f64 {
        f64::from(self.side) * self.tile.height
    }

    /// Top-left corner of the 1-based, row-major `quadrant_number`.
    pub fn origin_of(&self, quadrant_number: u32) -> Result<TileOrigin, GridError> {
        if quadrant_number == 0 || quadrant_number > self.len() {
            return Err(GridError::QuadrantOutOfRange {
                number: quadrant_number,
                count: self.len(),
            });
        }

        let index = quadrant_number - 1;
        let column = index % self.side;
        let row = index / self.side;

        Ok(TileOrigin::new(
            f64::from(column) * self.tile.width,
            f64::from(row) * self.tile.height,
        ))
    }
}

/// Positive integer square root, if `value` is a perfect square.
fn integer_sqrt(value: u32) -> Option<u32> {
    if value == 0 {
        return None;
    }
    let root = f64::from(value).sqrt().round() as u32;
    (root.checked_mul(root) == Some(value)).then_some(root)
}

fn check_dimension(field: &'static str, value: f64) -> Result<(), GridError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidDimension { field, value })
    }
}

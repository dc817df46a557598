//! Coordinate transforms between display, quadrant-local and global space.
//!
//! All functions here are pure. The write path (display → local → global) uses
//! the quadrant's own size and grid position; the read path
//! ([`ReferenceFrame::to_display`]) uses a fixed reference scale matching the
//! rock data producer. The two paths are independent and must stay that way.

use serde::{Deserialize, Serialize};

use crate::constants::{
    FALLBACK_QUADRANT_HEIGHT, FALLBACK_QUADRANT_WIDTH, REFERENCE_HEIGHT, REFERENCE_WIDTH,
};
use crate::grid::TileOrigin;
use crate::model::{Dimensions, DisplayPoint, GlobalPoint, LocalPoint};

/// Map a pointer position on the canvas into quadrant bitmap pixels.
pub fn to_quadrant_local(
    display: DisplayPoint,
    display_dims: Dimensions,
    quadrant_dims: Dimensions,
) -> LocalPoint {
    LocalPoint::new(
        display.x / display_dims.width * quadrant_dims.width,
        display.y / display_dims.height * quadrant_dims.height,
    )
}

/// Inverse of [`to_quadrant_local`].
pub fn to_display(
    local: LocalPoint,
    display_dims: Dimensions,
    quadrant_dims: Dimensions,
) -> DisplayPoint {
    DisplayPoint::new(
        local.x / quadrant_dims.width * display_dims.width,
        local.y / quadrant_dims.height * display_dims.height,
    )
}

/// Place a quadrant-local point in the stitched image.
///
/// `origin` is the quadrant's top-left corner as computed by
/// [`crate::grid::TileGrid::origin_of`]. The y axis is flipped because global
/// space has its origin at the bottom-left.
pub fn to_global(local: LocalPoint, origin: TileOrigin, image_height: f64) -> GlobalPoint {
    GlobalPoint::new(origin.x + local.x, image_height - (origin.y + local.y))
}

/// Coordinate range assumed by the producer of point/line geometries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFrame {
    pub width: f64,
    pub height: f64,
}

impl ReferenceFrame {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both sides finite and positive.
    pub fn is_valid(&self) -> bool {
        Dimensions::new(self.width, self.height).is_positive()
    }

    /// Map raw WKT coordinates (bottom-left origin) onto a display canvas.
    pub fn to_display(&self, raw_x: f64, raw_y: f64, display_dims: Dimensions) -> DisplayPoint {
        DisplayPoint::new(
            raw_x / self.width * display_dims.width,
            (self.height - raw_y) / self.height * display_dims.height,
        )
    }
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        Self::new(REFERENCE_WIDTH, REFERENCE_HEIGHT)
    }
}

/// [`ReferenceFrame::to_display`] with the default 1500 × 1000 frame.
pub fn wkt_to_display(raw_x: f64, raw_y: f64, display_dims: Dimensions) -> DisplayPoint {
    ReferenceFrame::default().to_display(raw_x, raw_y, display_dims)
}

/// Largest size with the content's aspect ratio that fits in `fraction` of
/// the viewport on both axes.
///
/// Content without a usable size falls back to 1920 × 1080. Each side of the
/// result is at least one pixel.
pub fn fit_to_viewport(content: Dimensions, viewport: Dimensions, fraction: f64) -> Dimensions {
    let width = if content.width.is_finite() && content.width > 0.0 {
        content.width
    } else {
        FALLBACK_QUADRANT_WIDTH
    };
    let height = if content.height.is_finite() && content.height > 0.0 {
        content.height
    } else {
        FALLBACK_QUADRANT_HEIGHT
    };

    let max_width = viewport.width * fraction;
    let max_height = viewport.height * fraction;
    let scale = (max_width / width).min(max_height / height);

    Dimensions::new((width * scale).max(1.0), (height * scale).max(1.0))
}

//! Marker overlay for the classifying view.
//!
//! A rock record carries its centre as a `POINT` literal and its longest axis
//! as a `LINESTRING` literal, both in the producer's reference frame. Each
//! literal is decoded on its own; a malformed one only drops its marker.

use serde::{Deserialize, Serialize};

use crate::constants::{FALLBACK_ROCK_HEIGHT, FALLBACK_ROCK_WIDTH};
use crate::model::{Dimensions, DisplayPoint};
use crate::transform::{ReferenceFrame, fit_to_viewport};
use crate::wkt;

/// A rock record as returned by the data service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rock {
    #[serde(default)]
    pub id: Option<u64>,
    /// Centre of the rock, `POINT(x y)`.
    #[serde(default)]
    pub location: Option<String>,
    /// Longest axis, `LINESTRING(x1 y1, x2 y2)`.
    #[serde(default)]
    pub longest_line: Option<String>,
    /// Half-size of the box drawn around the centre, in display pixels.
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

impl Rock {
    /// Canvas size for this rock's image inside `viewport`.
    pub fn display_size(&self, viewport: Dimensions, fraction: f64) -> Dimensions {
        let content = Dimensions::new(
            self.width.filter(|w| *w > 0.0).unwrap_or(FALLBACK_ROCK_WIDTH),
            self.height.filter(|h| *h > 0.0).unwrap_or(FALLBACK_ROCK_HEIGHT),
        );
        fit_to_viewport(content, viewport, fraction)
    }
}

/// Axis-aligned box in display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Display-space markers for one rock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RockOverlay {
    /// Dot at the rock centre.
    pub location: Option<DisplayPoint>,
    /// Line along the longest axis.
    pub longest_line: Option<(DisplayPoint, DisplayPoint)>,
    /// Square around the centre, present only with a location and a non-zero distance.
    pub bounds: Option<MarkerBox>,
}

impl RockOverlay {
    /// Decode a rock's geometries onto a canvas of `display` size.
    pub fn build(rock: &Rock, display: Dimensions, frame: ReferenceFrame) -> Self {
        let location = rock
            .location
            .as_deref()
            .and_then(wkt::decode_point)
            .map(|[x, y]| frame.to_display(x, y, display));

        let longest_line = rock
            .longest_line
            .as_deref()
            .and_then(wkt::decode_line)
            .map(|([x1, y1], [x2, y2])| {
                (
                    frame.to_display(x1, y1, display),
                    frame.to_display(x2, y2, display),
                )
            });

        let bounds = match (location, rock.distance) {
            (Some(centre), Some(distance)) if distance != 0.0 && distance.is_finite() => {
                Some(MarkerBox {
                    x: centre.x - distance,
                    y: centre.y - distance,
                    width: distance * 2.0,
                    height: distance * 2.0,
                })
            }
            _ => None,
        };

        if rock.location.is_some() && location.is_none() {
            log::debug!("Rock {:?}: location marker omitted", rock.id);
        }
        if rock.longest_line.is_some() && longest_line.is_none() {
            log::debug!("Rock {:?}: longest line omitted", rock.id);
        }

        Self {
            location,
            longest_line,
            bounds,
        }
    }

    /// True if nothing could be placed.
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.longest_line.is_none()
    }
}

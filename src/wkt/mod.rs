//! WKT geometry literals.
//!
//! The write path only produces polygons ([`encode_polygon`]); the read path
//! only consumes points and two-point lines ([`decode`]). Decoding never
//! fails loudly: a malformed literal is logged and yields `None` so the
//! caller can simply omit the marker.
//!
//! ```rust
//! use rocklabel::model::GlobalPoint;
//! use rocklabel::wkt::{decode, encode_polygon, Geometry};
//!
//! let ring = [
//!     GlobalPoint::new(0.0, 0.0),
//!     GlobalPoint::new(4.0, 0.0),
//!     GlobalPoint::new(4.0, 3.0),
//! ];
//! assert_eq!(encode_polygon(&ring).unwrap(), "POLYGON((0 0, 4 0, 4 3, 0 0))");
//! assert_eq!(decode("POINT(10 20)"), Some(Geometry::Point([10.0, 20.0])));
//! assert_eq!(decode("CIRCLE(0 0 5)"), None);
//! ```

mod grammar;

pub use grammar::Coord;

use crate::constants::MIN_POLYGON_VERTICES;
use crate::error::WktError;
use crate::model::GlobalPoint;

/// A geometry read from a point or line literal, in raw producer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// `POINT(x y)`
    Point(Coord),
    /// `LINESTRING(x1 y1, x2 y2)`
    Line(Coord, Coord),
}

/// Encode a ring of global-space points as `POLYGON((...))`.
///
/// The ring is closed if the caller left it open. Coordinates are rounded to
/// whole pixels; ties on the y axis round downwards in global space, which is
/// upwards in top-left pixel space before the flip. The rounded ring must keep
/// at least three distinct vertices.
pub fn encode_polygon(points: &[GlobalPoint]) -> Result<String, WktError> {
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(WktError::NonFinite { index });
    }

    let pixels: Vec<[i64; 2]> = points.iter().map(|p| [round_x(p.x), round_y(p.y)]).collect();
    check_vertex_count(&pixels)?;

    let first = points[0];
    let closing = (points[points.len() - 1] != first).then_some(pixels[0]);

    let body = pixels
        .iter()
        .chain(closing.iter())
        .map(|[x, y]| format!("{} {}", x, y))
        .collect::<Vec<_>>()
        .join(", ");
    let wkt = format!("POLYGON(({}))", body);

    check_polygon(&wkt)?;
    Ok(wkt)
}

fn round_x(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

fn round_y(y: f64) -> i64 {
    (y - 0.5).ceil() as i64
}

/// Fail unless `ring`, without a trailing copy of its first vertex, has at
/// least [`MIN_POLYGON_VERTICES`] distinct vertices.
pub(crate) fn check_vertex_count<T: PartialEq>(ring: &[T]) -> Result<(), WktError> {
    let open = match ring {
        [first, rest @ .., last] if !rest.is_empty() && first == last => &ring[..ring.len() - 1],
        _ => ring,
    };

    let mut distinct: Vec<&T> = Vec::with_capacity(MIN_POLYGON_VERTICES);
    for vertex in open {
        if !distinct.contains(&vertex) {
            distinct.push(vertex);
            if distinct.len() == MIN_POLYGON_VERTICES {
                return Ok(());
            }
        }
    }
    Err(WktError::TooFewPoints {
        min: MIN_POLYGON_VERTICES,
        found: distinct.len(),
    })
}

/// Structural self-check on a freshly built polygon literal.
fn check_polygon(wkt: &str) -> Result<(), WktError> {
    let ring = grammar::parse_ring(wkt).map_err(|e| WktError::Malformed(e.to_string()))?;
    if ring.len() <= MIN_POLYGON_VERTICES || ring.first() != ring.last() {
        return Err(WktError::Malformed(format!("ring is not a closed polygon: {}", wkt)));
    }
    Ok(())
}

/// Decode a `POINT` or `LINESTRING` literal.
pub fn decode(wkt: &str) -> Option<Geometry> {
    let trimmed = wkt.trim_start();
    if trimmed.starts_with("POINT") {
        decode_point(wkt).map(Geometry::Point)
    } else if trimmed.starts_with("LINESTRING") {
        decode_line(wkt).map(|(a, b)| Geometry::Line(a, b))
    } else {
        log::warn!("Unsupported WKT literal: {:?}", wkt);
        None
    }
}

/// Decode `POINT(x y)`.
pub fn decode_point(wkt: &str) -> Option<Coord> {
    match grammar::parse_simple(wkt, "POINT") {
        Ok(coords) if coords.len() == 1 => Some(coords[0]),
        Ok(coords) => {
            log::warn!("WKT point has {} coordinate pairs: {:?}", coords.len(), wkt);
            None
        }
        Err(e) => {
            log::warn!("Invalid WKT point {:?}: {}", wkt, e);
            None
        }
    }
}

/// Decode `LINESTRING(x1 y1, x2 y2)` into its two endpoints.
pub fn decode_line(wkt: &str) -> Option<(Coord, Coord)> {
    match grammar::parse_simple(wkt, "LINESTRING") {
        Ok(coords) if coords.len() == 2 => Some((coords[0], coords[1])),
        Ok(coords) => {
            log::warn!("WKT line has {} coordinate pairs: {:?}", coords.len(), wkt);
            None
        }
        Err(e) => {
            log::warn!("Invalid WKT line {:?}: {}", wkt, e);
            None
        }
    }
}

/// Read back the ring of a single-ring `POLYGON((...))` literal.
pub fn parse_polygon(wkt: &str) -> Option<Vec<Coord>> {
    match grammar::parse_ring(wkt) {
        Ok(ring) => Some(ring),
        Err(e) => {
            log::warn!("Invalid WKT polygon {:?}: {}", wkt, e);
            None
        }
    }
}

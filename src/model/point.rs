//! Points tagged with the coordinate space they live in.
//!
//! Three spaces exist: on-screen display pixels, quadrant-local image pixels
//! (top-left origin), and global image pixels (bottom-left origin) spanning the
//! stitched photograph. A point can only move between spaces through the
//! functions in [`crate::transform`].

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Marker trait for a coordinate space.
pub trait Space: Copy + Clone + fmt::Debug + PartialEq + Default {
    /// Short name used in logs.
    const NAME: &'static str;
}

/// On-screen pixels of the rendered canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Display;

/// Pixels of a single quadrant bitmap, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuadrantLocal;

/// Pixels of the full stitched photograph, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Global;

impl Space for Display {
    const NAME: &'static str = "display";
}

impl Space for QuadrantLocal {
    const NAME: &'static str = "local";
}

impl Space for Global {
    const NAME: &'static str = "global";
}

/// A 2D point in space `S`.
#[derive(Clone, Copy, PartialEq)]
pub struct Point<S: Space> {
    pub x: f64,
    pub y: f64,
    space: PhantomData<S>,
}

/// Convenience aliases.
pub type DisplayPoint = Point<Display>;
pub type LocalPoint = Point<QuadrantLocal>;
pub type GlobalPoint = Point<Global>;

impl<S: Space> Point<S> {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Raw `[x, y]` pair, dropping the space tag.
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Calculate distance to another point in the same space.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl<S: Space> From<[f64; 2]> for Point<S> {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl<S: Space> fmt::Debug for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", S::NAME, self.x, self.y)
    }
}

// Points serialize as `{x, y}`; the space is carried by the Rust type only.
#[derive(Serialize, Deserialize)]
struct RawPoint {
    x: f64,
    y: f64,
}

impl<S: Space> Serialize for Point<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        RawPoint {
            x: self.x,
            y: self.y,
        }
        .serialize(serializer)
    }
}

impl<'de, S: Space> Deserialize<'de> for Point<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawPoint::deserialize(deserializer)?;
        Ok(Self::new(raw.x, raw.y))
    }
}

/// Width and height of a rectangle, in whatever space the caller implies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both sides are finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_serializes_without_space() {
        let p = LocalPoint::new(10.5, 20.0);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"x":10.5,"y":20.0}"#);

        let back: LocalPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_point_debug_names_space() {
        assert_eq!(format!("{:?}", GlobalPoint::new(1.0, 2.0)), "global(1, 2)");
        assert_eq!(format!("{:?}", DisplayPoint::new(3.0, 4.5)), "display(3, 4.5)");
    }

    #[test]
    fn test_non_finite_point() {
        assert!(LocalPoint::new(1.0, 2.0).is_finite());
        assert!(!LocalPoint::new(f64::NAN, 2.0).is_finite());
        assert!(!LocalPoint::new(1.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_dimensions_positive() {
        assert!(Dimensions::new(500.0, 400.0).is_positive());
        assert!(!Dimensions::new(0.0, 400.0).is_positive());
        assert!(!Dimensions::new(500.0, -1.0).is_positive());
        assert!(!Dimensions::new(f64::NAN, 1.0).is_positive());
    }
}

//! Data model types.

mod label;
mod point;
mod quadrant;

pub use label::Label;
pub use point::{
    Dimensions, Display, DisplayPoint, Global, GlobalPoint, LocalPoint, Point, QuadrantLocal,
    Space,
};
pub use quadrant::{ImageRef, Quadrant, QuadrantId};

//! rocklabel - spatial annotation pipeline for rock sizing
//!
//! Volunteers outline rocks on one quadrant of a tiled survey image. Outlines
//! are recorded in quadrant pixels, placed in the stitched image's coordinate
//! system and submitted as WKT polygons. The classifying view goes the other
//! way: point and line geometries are decoded and drawn over the rock image.

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod grid;
pub mod model;
pub mod overlay;
pub mod queue;
pub mod submission;
pub mod transform;
pub mod undo;
pub mod wkt;

pub use config::AppConfig;
pub use engine::{AnnotationEngine, DrawState, SessionSnapshot};
pub use error::{SinkError, SubmitError, ValidationError, WktError};
pub use queue::{QuadrantQueue, QueuePosition, RockQueue};
pub use submission::{GeometrySink, SubmissionPayload};

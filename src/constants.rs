//! Global constants for rocklabel

/// Reference width of the coordinate range assumed by the rock data producer.
pub const REFERENCE_WIDTH: f64 = 1500.0;

/// Reference height of the coordinate range assumed by the rock data producer.
pub const REFERENCE_HEIGHT: f64 = 1000.0;

/// Quadrant width used when the data service reports none.
pub const FALLBACK_QUADRANT_WIDTH: f64 = 1920.0;

/// Quadrant height used when the data service reports none.
pub const FALLBACK_QUADRANT_HEIGHT: f64 = 1080.0;

/// Share of the viewport a fitted quadrant may occupy on each axis.
pub const DEFAULT_VIEWPORT_FRACTION: f64 = 0.8;

/// Minimum number of vertices required for a submittable polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Default number of label snapshots kept in the undo history.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Rock image width used when the data service reports none.
pub const FALLBACK_ROCK_WIDTH: f64 = 960.0;

/// Rock image height used when the data service reports none.
pub const FALLBACK_ROCK_HEIGHT: f64 = 540.0;

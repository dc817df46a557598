//! Error types for grid mapping, geometry encoding and submission.

use thiserror::Error;

/// Errors from validating a tile grid or a quadrant's place in it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// `numQuadrants` is not a positive perfect square.
    #[error("image.numQuadrants: {0} is not a positive perfect square")]
    NotSquare(u32),

    /// Quadrant number outside `1..=numQuadrants`.
    #[error("quadrantNumber: {number} is outside 1..={count}")]
    QuadrantOutOfRange {
        /// The offending quadrant number
        number: u32,
        /// Number of quadrants in the grid
        count: u32,
    },

    /// Tile width or height is zero, negative or not finite.
    #[error("{field}: must be a positive number, got {value}")]
    InvalidDimension {
        /// Name of the offending field
        field: &'static str,
        /// The value that was rejected
        value: f64,
    },
}

/// Errors from encoding a polygon literal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WktError {
    /// Fewer distinct vertices than a polygon needs.
    #[error("POLYGON requires at least {min} distinct points, got {found}")]
    TooFewPoints {
        /// Required minimum
        min: usize,
        /// Number of distinct points supplied
        found: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("point {index}: coordinate is not a finite number")]
    NonFinite {
        /// Index of the offending point
        index: usize,
    },

    /// The generated literal failed the structural self-check.
    #[error("malformed POLYGON literal: {0}")]
    Malformed(String),
}

/// A submission rejected before reaching the external collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The quadrant does not describe a valid tile grid.
    #[error("invalid quadrant: {0}")]
    Grid(#[from] GridError),

    /// A label could not be encoded.
    #[error("invalid geometry at index {index}: {source}")]
    Geometry {
        /// Index of the offending label
        index: usize,
        /// Why encoding failed
        #[source]
        source: WktError,
    },

    /// One or more payload fields are missing or out of range.
    #[error("invalid quadrant data: {}", .0.join(", "))]
    Fields(Vec<String>),

    /// Nothing to submit.
    #[error("geometries: no labels to submit")]
    Empty,

    /// A stroke is still being drawn.
    #[error("a stroke is still in progress")]
    StrokeInProgress,
}

impl ValidationError {
    /// Create a geometry error for the label at `index`.
    pub fn geometry(index: usize, source: WktError) -> Self {
        Self::Geometry { index, source }
    }
}

/// Failure reported by a [`crate::submission::GeometrySink`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    /// The collaborator answered with a non-success status.
    #[error("rejected with status {status}: {message}")]
    Rejected {
        /// Status code returned by the collaborator
        status: u16,
        /// Message from the response body
        message: String,
    },

    /// The collaborator could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
}

impl SinkError {
    /// Create a rejection error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

/// Errors from submitting a session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// Rejected locally; the sink was never called.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The sink failed; annotation state is unchanged.
    #[error("submission failed: {0}")]
    Sink(#[from] SinkError),
}

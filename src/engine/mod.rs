//! Polygon drawing over a single quadrant.
//!
//! The engine owns the annotation session for the active quadrant: the stroke
//! being drawn, the committed labels and their undo/redo history. Pointer
//! events arrive in display space and are stored in quadrant-local space, so
//! a canvas resize never moves existing labels.
//!
//! ```text
//!            pointer_down             pointer_up
//!   Idle ───────────────────▶ Drawing ──────────▶ Idle (+ commit if non-empty)
//!                             │    ▲
//!                             └────┘ pointer_move
//! ```

mod session;
#[cfg(test)]
mod tests;

pub use session::SessionSnapshot;

use crate::constants::{FALLBACK_QUADRANT_HEIGHT, FALLBACK_QUADRANT_WIDTH};
use crate::error::{SubmitError, ValidationError};
use crate::grid::TileGrid;
use crate::model::{Dimensions, DisplayPoint, Label, LocalPoint, Quadrant};
use crate::queue::QuadrantQueue;
use crate::submission::{GeometrySink, SubmissionPayload};
use crate::transform;
use crate::undo::{History, UndoConfig};
use crate::wkt;

/// Pointer state of the drawing canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawState {
    /// No active stroke.
    #[default]
    Idle,
    /// Pointer held, accumulating points.
    Drawing,
}

/// Drawing state machine and label history for one quadrant at a time.
#[derive(Debug, Clone)]
pub struct AnnotationEngine {
    quadrant: Quadrant,
    display: Dimensions,
    state: DrawState,
    stroke: Vec<LocalPoint>,
    history: History<Vec<Label>>,
    config: UndoConfig,
}

impl AnnotationEngine {
    /// Start a session for `quadrant` rendered at `display` size.
    pub fn new(quadrant: Quadrant, display: Dimensions) -> Self {
        Self::with_config(quadrant, display, UndoConfig::default())
    }

    /// Create with custom history configuration
    ///
    /// A non-positive `display` is replaced by the quadrant's own size until
    /// [`set_display_dimensions`](Self::set_display_dimensions) is called.
    pub fn with_config(quadrant: Quadrant, display: Dimensions, config: UndoConfig) -> Self {
        let display = if display.is_positive() {
            display
        } else {
            log::warn!("Ignoring display size {:?}, drawing at quadrant scale", display);
            usable_size(quadrant.dimensions())
        };
        log::debug!(
            "🧭 Session started for quadrant {} ({}x{})",
            quadrant.id,
            quadrant.width,
            quadrant.height
        );
        Self {
            quadrant,
            display,
            state: DrawState::Idle,
            stroke: Vec::new(),
            history: History::with_config(Vec::new(), config),
            config,
        }
    }

    pub fn quadrant(&self) -> &Quadrant {
        &self.quadrant
    }

    pub fn display_dimensions(&self) -> Dimensions {
        self.display
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state == DrawState::Drawing
    }

    /// Committed labels, in drawing order.
    pub fn labels(&self) -> &[Label] {
        self.history.current()
    }

    /// Points of the stroke in progress, in quadrant-local space.
    pub fn stroke(&self) -> &[LocalPoint] {
        &self.stroke
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------------
    // Pointer events
    // ------------------------------------------------------------------------

    /// Begin a stroke. Ignored while another stroke is open.
    pub fn pointer_down(&mut self, point: DisplayPoint) -> bool {
        if self.is_drawing() {
            log::warn!("Pointer down ignored: stroke already in progress");
            return false;
        }
        self.state = DrawState::Drawing;
        self.push_point(point);
        log::debug!("✏️ Started stroke at {:?}", point);
        true
    }

    /// Extend the open stroke. Ignored when idle.
    pub fn pointer_move(&mut self, point: DisplayPoint) -> bool {
        if !self.is_drawing() {
            return false;
        }
        self.push_point(point);
        true
    }

    /// End the open stroke, committing it as a label if it has any points.
    ///
    /// Returns true if a label was committed.
    pub fn pointer_up(&mut self) -> bool {
        if !self.is_drawing() {
            return false;
        }
        self.state = DrawState::Idle;

        let stroke = std::mem::take(&mut self.stroke);
        if stroke.is_empty() {
            return false;
        }

        let count = stroke.len();
        let mut labels = self.labels().to_vec();
        labels.push(Label::new(stroke));
        self.history.record(labels);
        log::debug!(
            "✅ Committed label {} with {} points",
            self.labels().len(),
            count
        );
        true
    }

    fn push_point(&mut self, point: DisplayPoint) {
        let local = transform::to_quadrant_local(point, self.display, self.quadrant.dimensions());
        self.stroke.push(local);
    }

    // ------------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------------

    /// Restore the label set before the most recent commit.
    pub fn undo(&mut self) -> bool {
        self.history.undo().is_some()
    }

    /// Re-apply the most recently undone commit.
    pub fn redo(&mut self) -> bool {
        self.history.redo().is_some()
    }

    // ------------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------------

    /// Switch to another quadrant. Stroke, labels and history are dropped.
    pub fn set_quadrant(&mut self, quadrant: Quadrant) {
        log::debug!(
            "🧭 Quadrant {} -> {}, discarding {} labels",
            self.quadrant.id,
            quadrant.id,
            self.labels().len()
        );
        self.quadrant = quadrant;
        self.clear();
    }

    /// Update the rendered canvas size. Non-positive sizes are ignored.
    pub fn set_display_dimensions(&mut self, display: Dimensions) {
        if !display.is_positive() {
            log::warn!("Ignoring display size {:?}", display);
            return;
        }
        self.display = display;
    }

    fn clear(&mut self) {
        self.state = DrawState::Idle;
        self.stroke.clear();
        self.history.reset(Vec::new());
    }

    // ------------------------------------------------------------------------
    // Rendering helpers
    // ------------------------------------------------------------------------

    /// Committed labels mapped onto the canvas.
    pub fn display_labels(&self) -> Vec<Vec<DisplayPoint>> {
        self.labels()
            .iter()
            .map(|label| self.to_display(label.points()))
            .collect()
    }

    /// The open stroke mapped onto the canvas.
    pub fn display_stroke(&self) -> Vec<DisplayPoint> {
        self.to_display(&self.stroke)
    }

    fn to_display(&self, points: &[LocalPoint]) -> Vec<DisplayPoint> {
        let quadrant = self.quadrant.dimensions();
        points
            .iter()
            .map(|&p| transform::to_display(p, self.display, quadrant))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------------

    /// Encode every committed label as a global polygon literal.
    pub fn encode_labels(&self) -> Result<Vec<String>, ValidationError> {
        let grid = TileGrid::for_quadrant(&self.quadrant)?;
        let origin = grid.origin_of(self.quadrant.quadrant_number)?;
        let image_height = grid.image_height();

        self.labels()
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let ring: Vec<_> = label
                    .points()
                    .iter()
                    .map(|&p| transform::to_global(p, origin, image_height))
                    .collect();
                wkt::encode_polygon(&ring).map_err(|e| ValidationError::geometry(index, e))
            })
            .collect()
    }

    /// Payload for the current labels, in quadrant-local coordinates.
    pub fn payload(&self) -> SubmissionPayload {
        SubmissionPayload::new(&self.quadrant, self.labels())
    }

    /// Validate, encode and hand the labels to `sink`.
    ///
    /// Nothing reaches the sink unless every label encodes. On success the
    /// labels and history are cleared together and the encoded literals are
    /// returned; on any error the session is left as it was.
    pub async fn submit<S: GeometrySink>(&mut self, sink: &S) -> Result<Vec<String>, SubmitError> {
        if self.is_drawing() {
            return Err(ValidationError::StrokeInProgress.into());
        }
        if self.labels().is_empty() {
            return Err(ValidationError::Empty.into());
        }

        let literals = self.encode_labels()?;
        let payload = self.payload();
        payload.validate()?;

        log::info!(
            "📤 Submitting {} labels for quadrant {}",
            literals.len(),
            self.quadrant.id
        );
        if let Err(e) = sink.submit(&payload).await {
            log::error!("Submission for quadrant {} failed: {}", self.quadrant.id, e);
            return Err(e.into());
        }

        self.clear();
        log::info!("Submission for quadrant {} stored", self.quadrant.id);
        Ok(literals)
    }

    /// Submit, then move `queue` on and switch to its next quadrant.
    ///
    /// The queue only moves when the sink accepts the payload.
    pub async fn submit_and_advance<S: GeometrySink>(
        &mut self,
        sink: &S,
        queue: &mut QuadrantQueue,
    ) -> Result<Vec<String>, SubmitError> {
        let literals = self.submit(sink).await?;
        if let Some(next) = queue.advance() {
            self.set_quadrant(next.clone());
        }
        Ok(literals)
    }

    // ------------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------------

    /// Capture labels and history for later [`restore`](Self::restore).
    pub fn snapshot(&self) -> SessionSnapshot {
        let (log, cursor) = self.history.parts();
        SessionSnapshot {
            quadrant_id: self.quadrant.id,
            log: log.to_vec(),
            cursor,
        }
    }

    /// Restore a snapshot taken on the same quadrant. Any open stroke is
    /// dropped. Returns false if the snapshot belongs to another quadrant or
    /// is inconsistent.
    pub fn restore(&mut self, snapshot: SessionSnapshot) -> bool {
        if snapshot.quadrant_id != self.quadrant.id {
            log::debug!(
                "Snapshot for quadrant {} ignored (active: {})",
                snapshot.quadrant_id,
                self.quadrant.id
            );
            return false;
        }
        let Some(history) = History::from_parts(snapshot.log, snapshot.cursor, self.config) else {
            log::warn!("Snapshot cursor out of range, ignoring");
            return false;
        };

        self.state = DrawState::Idle;
        self.stroke.clear();
        self.history = history;
        log::debug!("Restored {} labels", self.labels().len());
        true
    }
}

fn usable_size(size: Dimensions) -> Dimensions {
    if size.is_positive() {
        size
    } else {
        Dimensions::new(FALLBACK_QUADRANT_WIDTH, FALLBACK_QUADRANT_HEIGHT)
    }
}

//! Scenario tests for the annotation engine.

use std::cell::RefCell;

use proptest::prelude::*;

use super::*;
use crate::error::SinkError;
use crate::model::ImageRef;
use crate::queue::QuadrantQueue;

/// Sink that records payloads and optionally fails.
#[derive(Default)]
struct RecordingSink {
    received: RefCell<Vec<SubmissionPayload>>,
    failure: Option<SinkError>,
}

impl RecordingSink {
    fn failing(error: SinkError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.received.borrow().len()
    }
}

impl GeometrySink for RecordingSink {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), SinkError> {
        self.received.borrow_mut().push(payload.clone());
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Quadrant 2 of a 2x2 grid of 500px tiles.
fn quadrant(id: u64) -> Quadrant {
    Quadrant::new(id, 500.0, 500.0, 2, ImageRef::new(77, 4))
}

/// Engine rendering the 500px quadrant at half size.
fn engine() -> AnnotationEngine {
    AnnotationEngine::new(quadrant(1), Dimensions::new(250.0, 250.0))
}

fn dp(x: f64, y: f64) -> DisplayPoint {
    DisplayPoint::new(x, y)
}

/// Draw one stroke through the given display points.
fn stroke(engine: &mut AnnotationEngine, points: &[(f64, f64)]) {
    let (first, rest) = points.split_first().expect("stroke needs a point");
    assert!(engine.pointer_down(dp(first.0, first.1)));
    for &(x, y) in rest {
        assert!(engine.pointer_move(dp(x, y)));
    }
    engine.pointer_up();
}

fn triangle(engine: &mut AnnotationEngine, offset: f64) {
    stroke(
        engine,
        &[(offset, offset), (offset + 20.0, offset), (offset + 10.0, offset + 20.0)],
    );
}

#[test]
fn test_stroke_commits_on_release() {
    let mut engine = engine();
    assert_eq!(engine.state(), DrawState::Idle);

    engine.pointer_down(dp(5.0, 5.0));
    assert!(engine.is_drawing());
    engine.pointer_move(dp(50.0, 5.0));
    assert_eq!(engine.stroke().len(), 2);
    assert!(engine.labels().is_empty());

    assert!(engine.pointer_up());
    assert_eq!(engine.state(), DrawState::Idle);
    assert!(engine.stroke().is_empty());
    assert_eq!(engine.labels().len(), 1);
    assert_eq!(
        engine.labels()[0].points(),
        &[LocalPoint::new(10.0, 10.0), LocalPoint::new(100.0, 10.0)]
    );
}

#[test]
fn test_pointer_down_not_reentrant() {
    let mut engine = engine();
    assert!(engine.pointer_down(dp(1.0, 1.0)));
    assert!(!engine.pointer_down(dp(2.0, 2.0)));
    assert_eq!(engine.stroke().len(), 1);
}

#[test]
fn test_idle_events_ignored() {
    let mut engine = engine();
    assert!(!engine.pointer_move(dp(1.0, 1.0)));
    assert!(!engine.pointer_up());
    assert!(engine.stroke().is_empty());
    assert!(engine.labels().is_empty());
    assert!(!engine.can_undo());
}

#[test]
fn test_degenerate_labels_accepted_while_drawing() {
    let mut engine = engine();
    stroke(&mut engine, &[(1.0, 1.0)]);
    stroke(&mut engine, &[(1.0, 1.0), (2.0, 2.0)]);
    assert_eq!(engine.labels().len(), 2);
    assert_eq!(engine.labels()[0].len(), 1);
}

#[test]
fn test_undo_redo_inverse() {
    let mut engine = engine();
    for i in 0..5 {
        triangle(&mut engine, i as f64 * 30.0);
    }
    let before = engine.labels().to_vec();

    for k in 0..=5 {
        for _ in 0..k {
            assert!(engine.undo());
        }
        assert_eq!(engine.labels().len(), 5 - k);
        for _ in 0..k {
            assert!(engine.redo());
        }
        assert_eq!(engine.labels(), before.as_slice());
    }
}

#[test]
fn test_undo_redo_noop_at_ends() {
    let mut engine = engine();
    assert!(!engine.undo());
    assert!(!engine.redo());

    triangle(&mut engine, 0.0);
    assert!(!engine.redo());
    assert!(engine.undo());
    assert!(!engine.undo());
    assert!(engine.labels().is_empty());
}

#[test]
fn test_new_stroke_clears_redo() {
    let mut engine = engine();
    triangle(&mut engine, 0.0);
    triangle(&mut engine, 40.0);
    triangle(&mut engine, 80.0);

    engine.undo();
    engine.undo();
    assert!(engine.can_redo());

    triangle(&mut engine, 120.0);
    assert!(!engine.can_redo());
    assert!(!engine.redo());
    assert_eq!(engine.labels().len(), 2);

    // History still walks back through the surviving branch.
    assert!(engine.undo());
    assert_eq!(engine.labels().len(), 1);
}

#[test]
fn test_quadrant_switch_resets_session() {
    let mut engine = engine();
    triangle(&mut engine, 0.0);
    triangle(&mut engine, 40.0);
    engine.undo();
    engine.pointer_down(dp(1.0, 1.0));

    engine.set_quadrant(quadrant(2));
    assert_eq!(engine.quadrant().id, 2);
    assert!(!engine.is_drawing());
    assert!(engine.stroke().is_empty());
    assert!(engine.labels().is_empty());
    assert!(!engine.can_undo());
    assert!(!engine.can_redo());
}

#[test]
fn test_resize_keeps_local_points() {
    let mut engine = engine();
    triangle(&mut engine, 10.0);
    let local = engine.labels().to_vec();

    engine.set_display_dimensions(Dimensions::new(500.0, 500.0));
    assert_eq!(engine.labels(), local.as_slice());
    assert_eq!(engine.display_labels()[0][0], dp(20.0, 20.0));

    engine.set_display_dimensions(Dimensions::new(0.0, 100.0));
    assert_eq!(engine.display_dimensions(), Dimensions::new(500.0, 500.0));
}

#[test]
fn test_display_stroke() {
    let mut engine = engine();
    engine.pointer_down(dp(5.0, 7.5));
    assert_eq!(engine.display_stroke(), vec![dp(5.0, 7.5)]);
}

#[test]
fn test_end_to_end_submission() {
    let mut engine = engine();
    // Local (10,10), (100,10), (50,100) at half display scale.
    stroke(&mut engine, &[(5.0, 5.0), (50.0, 5.0), (25.0, 50.0)]);

    let sink = RecordingSink::default();
    let literals = pollster::block_on(engine.submit(&sink)).unwrap();

    assert_eq!(
        literals,
        vec!["POLYGON((510 990, 600 990, 550 900, 510 990))".to_string()]
    );
    assert_eq!(sink.calls(), 1);

    let payload = &sink.received.borrow()[0];
    assert_eq!(payload.geometries[0].kind, "Polygon");
    assert_eq!(
        payload.geometries[0].coordinates[0],
        vec![[10.0, 10.0], [100.0, 10.0], [50.0, 100.0]]
    );
    assert_eq!(payload.quadrant.quadrant_number, 2);
    assert_eq!(payload.quadrant.image.num_quadrants, 4);

    // Labels and history are gone after success.
    assert!(engine.labels().is_empty());
    assert!(!engine.can_undo());
    assert!(!engine.can_redo());
}

#[test]
fn test_engine_and_collaborator_agree() {
    let mut engine = AnnotationEngine::new(
        Quadrant::new(3, 333.0, 250.0, 6, ImageRef::new(1, 9)),
        Dimensions::new(333.0, 250.0),
    );
    stroke(
        &mut engine,
        &[(0.5, 0.5), (10.5, 20.5), (100.49, 33.51), (249.5, 12.25), (0.5, 0.5)],
    );
    stroke(&mut engine, &[(1.0, 2.0), (3.0, 4.0), (5.5, 6.5)]);

    let ours = engine.encode_labels().unwrap();
    let theirs = engine.payload().to_wkt().unwrap();
    assert_eq!(ours, theirs);
}

#[test]
fn test_sink_failure_preserves_state() {
    let mut engine = engine();
    triangle(&mut engine, 0.0);
    triangle(&mut engine, 40.0);
    engine.undo();
    let labels = engine.labels().to_vec();

    let sink = RecordingSink::failing(SinkError::rejected(500, "upstream service error"));
    let result = pollster::block_on(engine.submit(&sink));

    assert!(matches!(result, Err(SubmitError::Sink(_))));
    assert_eq!(sink.calls(), 1);
    assert_eq!(engine.labels(), labels.as_slice());
    assert!(engine.can_undo());
    assert!(engine.can_redo());

    // Retrying with a working sink succeeds without redrawing.
    let sink = RecordingSink::default();
    assert!(pollster::block_on(engine.submit(&sink)).is_ok());
    assert!(engine.labels().is_empty());
}

#[test]
fn test_degenerate_label_rejected_before_sink() {
    let mut engine = engine();
    triangle(&mut engine, 0.0);
    stroke(&mut engine, &[(1.0, 1.0), (2.0, 2.0)]);

    let sink = RecordingSink::default();
    let result = pollster::block_on(engine.submit(&sink));

    assert!(matches!(
        result,
        Err(SubmitError::Validation(ValidationError::Geometry { index: 1, .. }))
    ));
    assert_eq!(sink.calls(), 0);
    assert_eq!(engine.labels().len(), 2);
}

#[test]
fn test_invalid_grid_rejected_before_sink() {
    let mut engine = AnnotationEngine::new(
        Quadrant::new(1, 500.0, 500.0, 1, ImageRef::new(1, 3)),
        Dimensions::new(500.0, 500.0),
    );
    triangle(&mut engine, 0.0);

    let sink = RecordingSink::default();
    let result = pollster::block_on(engine.submit(&sink));
    assert!(matches!(
        result,
        Err(SubmitError::Validation(ValidationError::Grid(_)))
    ));
    assert_eq!(sink.calls(), 0);
}

#[test]
fn test_submit_requires_idle_and_labels() {
    let mut engine = engine();
    let sink = RecordingSink::default();

    assert_eq!(
        pollster::block_on(engine.submit(&sink)),
        Err(SubmitError::Validation(ValidationError::Empty))
    );

    triangle(&mut engine, 0.0);
    engine.pointer_down(dp(1.0, 1.0));
    assert_eq!(
        pollster::block_on(engine.submit(&sink)),
        Err(SubmitError::Validation(ValidationError::StrokeInProgress))
    );
    assert_eq!(sink.calls(), 0);
}

#[test]
fn test_missing_image_id_rejected_before_sink() {
    let mut engine = AnnotationEngine::new(
        Quadrant::new(1, 500.0, 500.0, 1, ImageRef::new(0, 4)),
        Dimensions::new(500.0, 500.0),
    );
    triangle(&mut engine, 0.0);

    let sink = RecordingSink::default();
    let result = pollster::block_on(engine.submit(&sink));
    assert!(matches!(
        result,
        Err(SubmitError::Validation(ValidationError::Fields(_)))
    ));
    assert_eq!(sink.calls(), 0);
}

#[test]
fn test_snapshot_restore() {
    let mut engine = engine();
    triangle(&mut engine, 0.0);
    triangle(&mut engine, 40.0);
    engine.undo();

    let json = engine.snapshot().to_json().unwrap();

    let mut fresh = self::engine();
    let snapshot = SessionSnapshot::from_json(&json).unwrap();
    assert!(fresh.restore(snapshot));
    assert_eq!(fresh.labels(), engine.labels());
    assert!(fresh.redo());
    assert_eq!(fresh.labels().len(), 2);
}

#[test]
fn test_restore_rejects_foreign_or_broken_snapshot() {
    let mut engine = engine();
    triangle(&mut engine, 0.0);

    let mut other = AnnotationEngine::new(quadrant(9), Dimensions::new(250.0, 250.0));
    assert!(!other.restore(engine.snapshot()));

    let mut broken = engine.snapshot();
    broken.cursor = 5;
    let mut fresh = self::engine();
    assert!(!fresh.restore(broken));
    assert!(fresh.labels().is_empty());
}

#[test]
fn test_repeated_sample_segment_rejected_before_sink() {
    let mut engine = engine();
    stroke(&mut engine, &[(3.0, 3.0), (3.0, 3.0), (9.0, 9.0)]);

    let sink = RecordingSink::default();
    let result = pollster::block_on(engine.submit(&sink));

    assert_eq!(
        result,
        Err(SubmitError::Validation(ValidationError::geometry(
            0,
            crate::error::WktError::TooFewPoints { min: 3, found: 2 }
        )))
    );
    assert_eq!(sink.calls(), 0);
    assert_eq!(engine.labels().len(), 1);
}

#[test]
fn test_unusable_display_falls_back_to_quadrant_scale() {
    let mut engine = AnnotationEngine::new(quadrant(1), Dimensions::new(0.0, 0.0));
    assert_eq!(engine.display_dimensions(), Dimensions::new(500.0, 500.0));

    engine.pointer_down(dp(10.0, 20.0));
    assert_eq!(engine.stroke(), &[LocalPoint::new(10.0, 20.0)]);
    assert!(engine.stroke()[0].is_finite());

    let engine = AnnotationEngine::new(quadrant(1), Dimensions::new(-5.0, f64::NAN));
    assert_eq!(engine.display_dimensions(), Dimensions::new(500.0, 500.0));
}

#[test]
fn test_submit_and_advance_wraps_queue() {
    let mut queue = QuadrantQueue::new(vec![quadrant(1), quadrant(2)]);
    let mut engine = engine();
    let sink = RecordingSink::default();

    triangle(&mut engine, 0.0);
    assert!(pollster::block_on(engine.submit_and_advance(&sink, &mut queue)).is_ok());
    assert_eq!(queue.current_index(), 1);
    assert_eq!(engine.quadrant().id, 2);

    triangle(&mut engine, 0.0);
    assert!(pollster::block_on(engine.submit_and_advance(&sink, &mut queue)).is_ok());
    assert_eq!(queue.current_index(), 0);
    assert_eq!(engine.quadrant().id, 1);
    assert_eq!(sink.calls(), 2);
}

#[test]
fn test_failed_submit_keeps_queue_position() {
    let mut queue = QuadrantQueue::new(vec![quadrant(1), quadrant(2)]);
    let mut engine = engine();
    triangle(&mut engine, 0.0);

    let sink = RecordingSink::failing(SinkError::Transport("offline".to_string()));
    assert!(pollster::block_on(engine.submit_and_advance(&sink, &mut queue)).is_err());
    assert_eq!(queue.current_index(), 0);
    assert_eq!(engine.quadrant().id, 1);
    assert_eq!(engine.labels().len(), 1);
}

/// Outlines of three to eight points on a quarter-pixel lattice of the tile.
fn lattice_strokes(
    width: u32,
    height: u32,
) -> impl Strategy<Value = Vec<Vec<(f64, f64)>>> {
    let point = (0..width * 4, 0..height * 4)
        .prop_map(|(x, y)| (f64::from(x) / 4.0, f64::from(y) / 4.0));
    prop::collection::vec(prop::collection::vec(point, 3..8), 1..5)
}

proptest! {
    #[test]
    fn undo_then_redo_restores_labels(strokes in 1usize..12, k in 0usize..12) {
        let k = k.min(strokes);
        let mut engine = engine();
        for i in 0..strokes {
            triangle(&mut engine, i as f64 * 5.0);
        }
        let before = engine.labels().to_vec();

        for _ in 0..k {
            prop_assert!(engine.undo());
        }
        prop_assert_eq!(engine.labels().len(), strokes - k);
        for _ in 0..k {
            prop_assert!(engine.redo());
        }
        prop_assert_eq!(engine.labels(), before.as_slice());
    }

    #[test]
    fn new_stroke_after_undo_discards_redo(strokes in 1usize..12, k in 1usize..12) {
        let k = k.min(strokes);
        let mut engine = engine();
        for i in 0..strokes {
            triangle(&mut engine, i as f64 * 5.0);
        }
        for _ in 0..k {
            engine.undo();
        }

        triangle(&mut engine, 100.0);
        prop_assert!(!engine.can_redo());
        prop_assert!(!engine.redo());
        prop_assert_eq!(engine.labels().len(), strokes - k + 1);
    }

    #[test]
    fn engine_and_collaborator_agree_on_generated_labels(
        (side, width, height, number, strokes) in (1u32..5, 50u32..400, 50u32..400)
            .prop_flat_map(|(side, width, height)| {
                (
                    Just(side),
                    Just(width),
                    Just(height),
                    1..=side * side,
                    lattice_strokes(width, height),
                )
            }),
    ) {
        let quadrant = Quadrant::new(
            1,
            f64::from(width),
            f64::from(height),
            number,
            ImageRef::new(1, side * side),
        );
        // Labels go in through a snapshot so no display scaling touches them.
        let labels: Vec<Label> = strokes
            .iter()
            .map(|points| points.iter().map(|&(x, y)| LocalPoint::new(x, y)).collect())
            .collect();
        let mut engine = AnnotationEngine::new(quadrant, Dimensions::new(250.0, 250.0));
        prop_assert!(engine.restore(SessionSnapshot {
            quadrant_id: 1,
            log: vec![Vec::new(), labels],
            cursor: 1,
        }), "restore rejected the snapshot");

        prop_assert_eq!(engine.encode_labels(), engine.payload().to_wkt());
    }
}

use braillepad::geometry::Point;
use braillepad::gesture::Gesture;
use braillepad::layout::{KeyLayout, LayoutKind, LayoutOptions, Viewport};
use braillepad::touch::{TouchEvent, TouchOutcome, TouchTracker, CALIBRATION_HOLD_MS};
use rstest::{fixture, rstest};

const LANDSCAPE: Viewport = Viewport {
    width: 800,
    height: 480,
    portrait: false,
};

// Default landscape keys: dots 1-3 at x=520, dots 4-6 at x=280, rows 80/160/240.
const DOT1: (i32, i32) = (520, 80);
const DOT2: (i32, i32) = (520, 160);
const DOT3: (i32, i32) = (520, 240);
const DOT4: (i32, i32) = (280, 80);
const DOT5: (i32, i32) = (280, 160);
const DOT6: (i32, i32) = (280, 240);

#[fixture]
fn layout() -> KeyLayout {
    KeyLayout::with_default_geometry(LayoutKind::Vertical, LANDSCAPE, LayoutOptions::default()).unwrap()
}

fn down(id: i32, (x, y): (i32, i32), time_ms: u64) -> TouchEvent {
    TouchEvent::Down { id, x, y, time_ms }
}

fn moved(id: i32, (x, y): (i32, i32), time_ms: u64) -> TouchEvent {
    TouchEvent::Move { id, x, y, time_ms }
}

fn pointer_up(id: i32, (x, y): (i32, i32), time_ms: u64) -> TouchEvent {
    TouchEvent::PointerUp { id, x, y, time_ms }
}

fn up(id: i32, (x, y): (i32, i32), time_ms: u64) -> TouchEvent {
    TouchEvent::Up { id, x, y, time_ms }
}

/// Feeds every event and returns the outcomes that were not `Nothing`.
fn feed(tracker: &mut TouchTracker, layout: &mut KeyLayout, dots: usize, events: &[TouchEvent]) -> Vec<TouchOutcome> {
    events
        .iter()
        .map(|&e| tracker.handle(e, layout, dots))
        .filter(|o| *o != TouchOutcome::Nothing)
        .collect()
}

// --- CHORDS ---

#[rstest]
fn test_single_touch_is_dot_one(mut layout: KeyLayout) {
    let mut tracker = TouchTracker::new(false);
    let outcomes = feed(&mut tracker, &mut layout, 6, &[down(0, DOT1, 0), up(0, DOT1, 100)]);
    assert_eq!(outcomes, vec![TouchOutcome::Cell(0b1)]);
    assert_eq!(tracker.active_touches(), 0);
}

#[rstest]
fn test_two_finger_chord(mut layout: KeyLayout) {
    let mut tracker = TouchTracker::new(false);
    let outcomes = feed(
        &mut tracker,
        &mut layout,
        6,
        &[
            down(0, DOT1, 0),
            down(1, DOT4, 10),
            pointer_up(1, DOT4, 100),
            up(0, DOT1, 120),
        ],
    );
    assert_eq!(outcomes, vec![TouchOutcome::Cell(0b1001)]);
}

#[rstest]
fn test_full_cell_from_any_contact_order(mut layout: KeyLayout) {
    let mut tracker = TouchTracker::new(false);
    let dots = [DOT6, DOT2, DOT4, DOT1, DOT5, DOT3];
    let mut events: Vec<TouchEvent> = dots.iter().enumerate().map(|(id, &p)| down(id as i32, p, 0)).collect();
    for (id, &p) in dots.iter().enumerate().take(5) {
        events.push(pointer_up(id as i32, p, 50));
    }
    events.push(up(5, DOT3, 60));
    assert_eq!(feed(&mut tracker, &mut layout, 6, &events), vec![TouchOutcome::Cell(0b111111)]);
}

#[rstest]
fn test_drifted_touch_still_resolves(mut layout: KeyLayout) {
    let mut tracker = TouchTracker::new(false);
    let outcomes = feed(&mut tracker, &mut layout, 6, &[down(0, (490, 170), 0), up(0, (490, 170), 80)]);
    assert_eq!(outcomes, vec![TouchOutcome::Cell(0b10)]);
    // The column drifted towards the touch once the chord ended.
    assert!(layout.keys()[1].position().x < 520);
}

// --- SWIPES ---

#[rstest]
fn test_single_swipe(mut layout: KeyLayout) {
    let mut tracker = TouchTracker::new(false);
    let outcomes = feed(
        &mut tracker,
        &mut layout,
        6,
        &[down(0, DOT1, 0), moved(0, (520, 200), 40), up(0, (520, 200), 80)],
    );
    assert_eq!(outcomes, vec![TouchOutcome::Gesture(Gesture::OneDown)]);
}

#[rstest]
fn test_swipe_below_threshold_is_a_tap(mut layout: KeyLayout) {
    let mut tracker = TouchTracker::new(false);
    let outcomes = feed(
        &mut tracker,
        &mut layout,
        6,
        &[down(0, DOT4, 0), moved(0, (300, 100), 40), up(0, (300, 100), 80)],
    );
    assert_eq!(outcomes, vec![TouchOutcome::Cell(0b1000)]);
}

#[rstest]
fn test_hold_and_swipe_fires_once(mut layout: KeyLayout) {
    let mut tracker = TouchTracker::new(false);
    let outcomes = feed(
        &mut tracker,
        &mut layout,
        6,
        &[
            down(0, DOT6, 0),
            down(1, DOT1, 20),
            moved(1, (620, 80), 100),
            pointer_up(1, (620, 80), 150),
            up(0, DOT6, 300),
        ],
    );
    assert_eq!(outcomes, vec![TouchOutcome::Gesture(Gesture::HoldSixLeft)]);
}

#[rstest]
fn test_two_moving_keys_are_unrecognized(mut layout: KeyLayout) {
    let mut tracker = TouchTracker::new(false);
    let outcomes = feed(
        &mut tracker,
        &mut layout,
        6,
        &[
            down(0, DOT1, 0),
            down(1, DOT2, 0),
            moved(0, (520, 180), 50),
            moved(1, (520, 260), 50),
            pointer_up(1, (520, 260), 90),
            up(0, (520, 180), 100),
        ],
    );
    assert_eq!(outcomes, vec![TouchOutcome::UnrecognizedSwipe]);
}

// --- CALIBRATION ---

#[rstest]
fn test_two_stage_calibration(mut layout: KeyLayout) {
    let mut tracker = TouchTracker::new(false);
    let hold = CALIBRATION_HOLD_MS + 100;

    let first = feed(
        &mut tracker,
        &mut layout,
        6,
        &[
            down(0, DOT1, 0),
            down(1, DOT2, 0),
            down(2, DOT3, 0),
            pointer_up(2, DOT3, hold),
            pointer_up(1, DOT2, hold + 10),
            up(0, DOT1, hold + 20),
        ],
    );
    assert_eq!(first, vec![TouchOutcome::NextThree]);
    assert_eq!(tracker.pending_calibration().len(), 3);

    let start = 2000;
    let second = feed(
        &mut tracker,
        &mut layout,
        6,
        &[
            down(3, DOT4, start),
            down(4, DOT5, start),
            down(5, DOT6, start),
            pointer_up(5, DOT6, start + hold),
            pointer_up(4, DOT5, start + hold + 10),
            up(3, DOT4, start + hold + 20),
        ],
    );
    let expected: Vec<Point> = [DOT1, DOT2, DOT3, DOT4, DOT5, DOT6]
        .iter()
        .map(|&(x, y)| Point::new(x, y))
        .collect();
    assert_eq!(second, vec![TouchOutcome::Calibrate(expected)]);
    assert!(tracker.pending_calibration().is_empty());
}

#[rstest]
fn test_early_lift_is_not_calibration(mut layout: KeyLayout) {
    let mut tracker = TouchTracker::new(false);
    let outcomes = feed(
        &mut tracker,
        &mut layout,
        6,
        &[
            down(0, DOT1, 0),
            down(1, DOT2, 0),
            down(2, DOT3, 0),
            pointer_up(2, DOT3, 300),
            pointer_up(1, DOT2, 310),
            up(0, DOT1, 320),
        ],
    );
    assert_eq!(outcomes, vec![TouchOutcome::Cell(0b111)]);
    assert!(tracker.pending_calibration().is_empty());
}

#[rstest]
fn test_ordinary_chord_drops_pending_group(mut layout: KeyLayout) {
    let mut tracker = TouchTracker::new(false);
    let hold = CALIBRATION_HOLD_MS + 100;
    feed(
        &mut tracker,
        &mut layout,
        6,
        &[
            down(0, DOT1, 0),
            down(1, DOT2, 0),
            down(2, DOT3, 0),
            pointer_up(2, DOT3, hold),
            up(0, DOT1, hold + 20),
        ],
    );
    assert_eq!(tracker.pending_calibration().len(), 3);

    let outcomes = feed(&mut tracker, &mut layout, 6, &[down(0, DOT5, 3000), up(0, DOT5, 3050)]);
    assert_eq!(outcomes, vec![TouchOutcome::Cell(0b10000)]);
    assert!(tracker.pending_calibration().is_empty());
}

// --- LATCHES, EXTRA DOTS AND LONG HOLD ---

#[rstest]
fn test_latched_dot_joins_next_chord(mut layout: KeyLayout) {
    let mut tracker = TouchTracker::new(false);
    tracker.set_latched_dots(true, false);
    tracker.set_latched_dots(false, true);
    assert_eq!(tracker.latched_dots(), (true, true));

    let outcomes = feed(&mut tracker, &mut layout, 8, &[down(0, DOT1, 0), up(0, DOT1, 50)]);
    assert_eq!(outcomes, vec![TouchOutcome::Cell(0b1100_0001)]);

    tracker.set_latched_dots(false, false);
    assert_eq!(tracker.latched_dots(), (false, false));
}

#[rstest]
fn test_latch_alone_types_a_cell(mut layout: KeyLayout) {
    let mut tracker = TouchTracker::new(false);
    // Contact ids outside the slot range are ignored.
    let events = [down(9, DOT1, 0), up(9, DOT1, 50)];
    assert!(feed(&mut tracker, &mut layout, 8, &events).is_empty());

    tracker.set_latched_dots(true, false);
    assert_eq!(
        feed(&mut tracker, &mut layout, 8, &events),
        vec![TouchOutcome::Cell(0b0100_0000)]
    );
}

#[test]
fn test_eight_dot_keys_only_with_eight_dots() {
    let options = LayoutOptions {
        eight_dots: true,
        ..LayoutOptions::default()
    };
    let mut layout = KeyLayout::with_default_geometry(LayoutKind::Vertical, LANDSCAPE, options).unwrap();
    let dot7 = (520, 320);
    let mut tracker = TouchTracker::new(false);

    let eight = feed(&mut tracker, &mut layout, 8, &[down(0, dot7, 0), up(0, dot7, 50)]);
    assert_eq!(eight, vec![TouchOutcome::Cell(0b0100_0000)]);

    let six = feed(&mut tracker, &mut layout, 6, &[down(0, dot7, 100), up(0, dot7, 150)]);
    assert_eq!(six, vec![TouchOutcome::Cell(0b100)]);
}

#[rstest]
fn test_long_hold_with_voice_shortcut(mut layout: KeyLayout) {
    let events = [down(0, DOT1, 0), up(0, DOT1, CALIBRATION_HOLD_MS + 300)];

    let mut tracker = TouchTracker::new(true);
    assert_eq!(feed(&mut tracker, &mut layout, 6, &events), vec![TouchOutcome::LongHold]);

    let mut tracker = TouchTracker::new(false);
    assert_eq!(feed(&mut tracker, &mut layout, 6, &events), vec![TouchOutcome::Cell(0b1)]);
}

#[test]
fn test_events_deserialize_from_traces() {
    let json = r#"[
        {"type": "down", "id": 0, "x": 520, "y": 80, "time_ms": 0},
        {"type": "pointer_up", "id": 1, "x": 1, "y": 2, "time_ms": 3}
    ]"#;
    let events: Vec<TouchEvent> = serde_json::from_str(json).unwrap();
    assert_eq!(events[0], down(0, DOT1, 0));
    assert_eq!(events[1].id(), 1);
    assert_eq!(events[1].point(), Point::new(1, 2));
    assert_eq!(events[1].time_ms(), 3);
}

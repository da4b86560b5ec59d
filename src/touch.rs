//! Raw pointer events in, chords, swipes and calibration requests out.

use crate::geometry::Point;
use crate::gesture::Gesture;
use crate::layout::{KeyLayout, Touch, TouchSlots, CALIBRATION_POINTS, MAX_DOTS};
use crate::translate::Cell;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How long fingers must rest before a lift counts as calibration.
pub const CALIBRATION_HOLD_MS: u64 = 1200;
const CALIBRATION_GROUP: usize = CALIBRATION_POINTS / 2;
const DOT_SEVEN: usize = 6;
const DOT_EIGHT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TouchEvent {
    Down { id: i32, x: i32, y: i32, time_ms: u64 },
    Move { id: i32, x: i32, y: i32, time_ms: u64 },
    /// One finger lifts while others stay down.
    PointerUp { id: i32, x: i32, y: i32, time_ms: u64 },
    /// The last finger lifts.
    Up { id: i32, x: i32, y: i32, time_ms: u64 },
}

impl TouchEvent {
    pub fn id(&self) -> i32 {
        match *self {
            TouchEvent::Down { id, .. }
            | TouchEvent::Move { id, .. }
            | TouchEvent::PointerUp { id, .. }
            | TouchEvent::Up { id, .. } => id,
        }
    }

    pub fn point(&self) -> Point {
        match *self {
            TouchEvent::Down { x, y, .. }
            | TouchEvent::Move { x, y, .. }
            | TouchEvent::PointerUp { x, y, .. }
            | TouchEvent::Up { x, y, .. } => Point::new(x, y),
        }
    }

    pub fn time_ms(&self) -> u64 {
        match *self {
            TouchEvent::Down { time_ms, .. }
            | TouchEvent::Move { time_ms, .. }
            | TouchEvent::PointerUp { time_ms, .. }
            | TouchEvent::Up { time_ms, .. } => time_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TouchOutcome {
    Nothing,
    Gesture(Gesture),
    /// Keys moved but not in any known pattern. The chord is dropped.
    UnrecognizedSwipe,
    Cell(Cell),
    /// Six held points, in no particular order.
    Calibrate(Vec<Point>),
    /// First group of three stored; waiting for the second.
    NextThree,
    /// A single finger held past the calibration delay.
    LongHold,
}

#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    slots: TouchSlots,
    pending: Vec<Touch>,
    hold_deadline: Option<u64>,
    handled: bool,
    dot7: bool,
    dot8: bool,
    voice_shortcut: bool,
}

impl TouchTracker {
    pub fn new(voice_shortcut: bool) -> Self {
        Self {
            voice_shortcut,
            ..Self::default()
        }
    }

    pub fn slots(&self) -> &TouchSlots {
        &self.slots
    }

    pub fn active_touches(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn pending_calibration(&self) -> &[Touch] {
        &self.pending
    }

    pub fn latched_dots(&self) -> (bool, bool) {
        (self.dot7, self.dot8)
    }

    /// Both false clears the latches; otherwise sets the given ones.
    pub fn set_latched_dots(&mut self, dot7: bool, dot8: bool) {
        if !dot7 && !dot8 {
            self.dot7 = false;
            self.dot8 = false;
        }
        self.dot7 |= dot7;
        self.dot8 |= dot8;
    }

    fn find(&mut self, id: i32) -> Option<&mut Touch> {
        self.slots.iter_mut().flatten().find(|t| t.id == id)
    }

    fn update_pointer(&mut self, id: i32, at: Point) {
        if let Some(touch) = self.find(id) {
            touch.move_to(at);
        }
    }

    fn reset(&mut self) {
        self.slots = [None; MAX_DOTS];
        self.hold_deadline = None;
        self.handled = false;
    }

    /// Feeds one event. `dots` is the number of dots the current Braille
    /// type allows.
    pub fn handle(&mut self, event: TouchEvent, layout: &mut KeyLayout, dots: usize) -> TouchOutcome {
        let (id, at, now) = (event.id(), event.point(), event.time_ms());
        let swap = layout.viewport().portrait;

        match event {
            TouchEvent::Down { .. } => {
                self.press(id, at, now);
                TouchOutcome::Nothing
            }
            TouchEvent::Move { .. } => {
                self.update_pointer(id, at);
                TouchOutcome::Nothing
            }
            TouchEvent::PointerUp { .. } => {
                if let Some(outcome) = self.try_calibrate(now) {
                    return outcome;
                }
                self.update_pointer(id, at);
                self.slots = layout.resolve_dots(&self.slots, dots);
                match layout.classify_swipe(&self.slots, swap) {
                    Gesture::None => TouchOutcome::Nothing,
                    gesture => {
                        // Hold one key and swipe another: the chord is spent.
                        self.handled = true;
                        TouchOutcome::Gesture(gesture)
                    }
                }
            }
            TouchEvent::Up { .. } => {
                self.update_pointer(id, at);
                let outcome = self.release(layout, dots, swap, now);
                self.reset();
                layout.update_keys();
                outcome
            }
        }
    }

    fn press(&mut self, id: i32, at: Point, now: u64) {
        self.hold_deadline.get_or_insert(now + CALIBRATION_HOLD_MS);
        if let Some(touch) = self.find(id) {
            *touch = Touch::new(id, at);
            return;
        }
        let preferred = usize::try_from(id).ok().filter(|&slot| slot < MAX_DOTS);
        let slot = preferred
            .filter(|&slot| self.slots[slot].is_none())
            .or_else(|| self.slots.iter().position(Option::is_none));
        match (preferred, slot) {
            (Some(_), Some(slot)) => self.slots[slot] = Some(Touch::new(id, at)),
            _ => debug!("Ignoring touch {} at {:?}", id, at),
        }
    }

    fn release(&mut self, layout: &mut KeyLayout, dots: usize, swap: bool, now: u64) -> TouchOutcome {
        let held_long = self.hold_deadline.is_some_and(|deadline| now > deadline);
        if self.voice_shortcut && held_long && self.active_touches() == 1 {
            return TouchOutcome::LongHold;
        }
        if self.active_touches() == 0 && !self.dot7 && !self.dot8 {
            return TouchOutcome::Nothing;
        }

        self.slots = layout.resolve_dots(&self.slots, dots);
        self.pending.clear();
        if self.handled {
            return TouchOutcome::Nothing;
        }
        match layout.classify_swipe(&self.slots, swap) {
            Gesture::None if layout.swipe_code(&self.slots, swap).has_motion() => TouchOutcome::UnrecognizedSwipe,
            Gesture::None => TouchOutcome::Cell(self.cell()),
            gesture => TouchOutcome::Gesture(gesture),
        }
    }

    /// Dot bits of the resolved chord plus any latched dots 7 and 8.
    fn cell(&self) -> Cell {
        let mut cell: Cell = 0;
        for (index, slot) in self.slots.iter().enumerate().take(DOT_SEVEN) {
            if slot.is_some() {
                cell |= 1 << index;
            }
        }
        if self.dot7 || self.slots[DOT_SEVEN].is_some() {
            cell |= 1 << DOT_SEVEN;
        }
        if self.dot8 || self.slots[DOT_EIGHT].is_some() {
            cell |= 1 << DOT_EIGHT;
        }
        cell
    }

    /// Two-stage calibration: three fingers held, one lifts. Returns `None`
    /// when the lift is an ordinary one.
    fn try_calibrate(&mut self, now: u64) -> Option<TouchOutcome> {
        let deadline = self.hold_deadline?;
        if now < deadline || self.active_touches() != CALIBRATION_GROUP {
            return None;
        }
        if !self.pending.is_empty() && self.pending.len() != CALIBRATION_GROUP {
            self.pending.clear();
            return None;
        }

        for touch in self.pending.drain(..) {
            if let Some(free) = self.slots.iter_mut().find(|slot| slot.is_none()) {
                *free = Some(touch);
            }
        }

        if self.active_touches() == CALIBRATION_POINTS {
            self.set_latched_dots(false, false);
            let points = self.slots.iter().flatten().map(|t| t.current).collect();
            self.reset();
            debug!("Calibration gesture complete");
            Some(TouchOutcome::Calibrate(points))
        } else {
            self.pending = self.slots.iter_mut().filter_map(Option::take).collect();
            debug!("Stored first calibration group");
            Some(TouchOutcome::NextThree)
        }
    }
}

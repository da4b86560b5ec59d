//! Calibrated key geometry: touch-to-dot resolution, drift tracking and swipe
//! encoding.

pub mod horizontal;
pub mod swipe;
pub mod vertical;

use crate::config::{PadSettings, PadStyle};
use crate::error::{PadError, PadResult};
use crate::geometry::{Density, DriftFilter, Offset, Point};
use crate::gesture::Gesture;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use strum_macros::{Display, EnumIter, EnumString};
use swipe::{Direction, SwipeCode};
use tracing::{debug, info};

/// Concurrent touch slots, one per possible dot.
pub const MAX_DOTS: usize = 8;
/// Calibration always uses the six base dots.
pub const CALIBRATION_POINTS: usize = 6;
const FIRST_RIGHT_KEY: usize = 3;
const DOT_SEVEN: usize = 6;

/// Touches indexed by slot. Before resolution the slot is the contact id;
/// after resolution it is the dot index.
pub type TouchSlots = [Option<Touch>; MAX_DOTS];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Two columns of three, dots 1-3 and 4-6 top to bottom.
    Vertical,
    /// One row, dots 3 2 1 | 4 5 6.
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Left,
    Right,
}

impl Column {
    /// Dots 1-3 and 7 are left; 4-6 and 8 are right.
    pub fn of_key(index: usize) -> Column {
        if index < FIRST_RIGHT_KEY || index == DOT_SEVEN {
            Column::Left
        } else {
            Column::Right
        }
    }

    fn index(self) -> usize {
        match self {
            Column::Left => 0,
            Column::Right => 1,
        }
    }
}

/// Pad dimensions and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
    pub portrait: bool,
}

impl Viewport {
    pub fn new(width: i32, height: i32, portrait: bool) -> Self {
        Self {
            width,
            height,
            portrait,
        }
    }

    /// Reference point for persisted calibration offsets.
    pub fn centre(&self) -> Point {
        if self.portrait {
            Point::new(self.height / 2, self.width / 2)
        } else {
            Point::new(self.width / 2, self.height / 2)
        }
    }

    /// Screen diagonal in pixels (truncated).
    pub fn diagonal(&self) -> i32 {
        Point::new(0, 0).distance(Point::new(self.width, self.height))
    }
}

/// Construction parameters shared by both layout kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub invert: bool,
    pub eight_dots: bool,
    pub density: Density,
    pub swipe_sensitivity_dp: i32,
}

impl LayoutOptions {
    pub fn from_settings(settings: &PadSettings) -> Self {
        Self {
            invert: settings.invert,
            eight_dots: settings.eight_dots,
            density: settings.density(),
            swipe_sensitivity_dp: settings.swipe_sensitivity,
        }
    }

    pub fn swipe_threshold(&self) -> i32 {
        self.density.px(self.swipe_sensitivity_dp)
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::from_settings(&PadSettings::default())
    }
}

/// A calibrated dot position with its recent touch history.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub id: i32,
    position: Point,
    filter: DriftFilter,
}

impl Key {
    /// Id used for keys that did not come from a live contact.
    pub const UNASSIGNED_ID: i32 = -1;

    pub fn new(id: i32, position: Point) -> Self {
        Self {
            id,
            position,
            filter: DriftFilter::seeded(position),
        }
    }

    pub fn at(position: Point) -> Self {
        Self::new(Self::UNASSIGNED_ID, position)
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Feeds a touch into the history; returns smoothed position minus key
    /// position.
    fn track(&mut self, sample: Point) -> Offset {
        self.filter.push(sample) - self.position
    }

    fn shift(&mut self, offset: Offset) {
        self.position = self.position + offset;
    }
}

/// One finger on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Touch {
    pub id: i32,
    /// Where the finger went down. Resolution uses this point.
    pub start: Point,
    pub current: Point,
}

impl Touch {
    pub fn new(id: i32, at: Point) -> Self {
        Self {
            id,
            start: at,
            current: at,
        }
    }

    pub fn move_to(&mut self, at: Point) {
        self.current = at;
    }

    pub fn direction(&self, threshold: i32, swap: bool, invert: bool) -> Direction {
        Direction::from_motion(self.start, self.current, threshold, swap, invert)
    }
}

#[derive(Debug, Clone)]
pub struct KeyLayout {
    kind: LayoutKind,
    keys: Vec<Key>,
    calibration: Vec<Key>,
    viewport: Viewport,
    invert: bool,
    swipe_threshold: i32,
    drift: [Option<Offset>; MAX_DOTS],
}

impl KeyLayout {
    /// Builds a layout from six calibration keys.
    ///
    /// Fails when the count is wrong or, for vertical layouts, when a point
    /// falls outside both key columns.
    pub fn new(
        kind: LayoutKind,
        calibration: Vec<Key>,
        viewport: Viewport,
        options: LayoutOptions,
    ) -> PadResult<Self> {
        if calibration.len() != CALIBRATION_POINTS {
            return Err(PadError::TouchCount {
                required: CALIBRATION_POINTS,
                found: calibration.len(),
            });
        }

        let keys = match kind {
            LayoutKind::Vertical => vertical::arrange(calibration.clone(), viewport, &options)?,
            LayoutKind::Horizontal => horizontal::arrange(calibration.clone(), viewport, &options)?,
        };
        info!("Built {} layout with {} keys", kind, keys.len());

        Ok(Self {
            kind,
            keys,
            calibration,
            viewport,
            invert: options.invert,
            swipe_threshold: options.swipe_threshold(),
            drift: [None; MAX_DOTS],
        })
    }

    /// Convenience wrapper for raw calibration positions.
    pub fn from_points(
        kind: LayoutKind,
        points: &[Point],
        viewport: Viewport,
        options: LayoutOptions,
    ) -> PadResult<Self> {
        let keys = points.iter().map(|&p| Key::at(p)).collect();
        Self::new(kind, keys, viewport, options)
    }

    /// Layout built from the default finger spacing for this viewport.
    pub fn with_default_geometry(
        kind: LayoutKind,
        viewport: Viewport,
        options: LayoutOptions,
    ) -> PadResult<Self> {
        let points = match kind {
            LayoutKind::Vertical => vertical::default_points(viewport, &options),
            LayoutKind::Horizontal => horizontal::default_points(viewport, &options),
        };
        Self::from_points(kind, &points, viewport, options)
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn layout_id(&self) -> &'static str {
        match self.kind {
            LayoutKind::Vertical => "vertical",
            LayoutKind::Horizontal => "horizontal",
        }
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn key_positions(&self) -> Vec<Point> {
        self.keys.iter().map(Key::position).collect()
    }

    /// The keys as supplied at construction, before sorting.
    pub fn calibration(&self) -> &[Key] {
        &self.calibration
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn swipe_threshold(&self) -> i32 {
        self.swipe_threshold
    }

    pub fn pending_drift(&self) -> &[Option<Offset>; MAX_DOTS] {
        &self.drift
    }

    /// Mean x of the left and right column keys.
    fn column_means(&self) -> [i32; 2] {
        let mut totals = [0i32; 2];
        for (index, key) in self.keys.iter().enumerate() {
            totals[Column::of_key(index).index()] += key.position.x;
        }
        let per_column = (self.keys.len() / 2).max(1) as i32;
        totals.map(|total| total / per_column)
    }

    /// Assigns each touch to a dot slot.
    ///
    /// A touch only competes for keys on its side of the pad. It takes the
    /// nearest key it can win; a key already holding a farther touch gives
    /// that touch back to the queue. Touches that find no key are dropped.
    pub fn resolve_dots(&mut self, touches: &TouchSlots, dots: usize) -> TouchSlots {
        let dots = dots.min(self.keys.len());
        let means = self.column_means();
        let mut pending: VecDeque<Touch> = touches.iter().flatten().copied().collect();
        let mut resolved: TouchSlots = [None; MAX_DOTS];

        while let Some(touch) = pending.pop_front() {
            let x = touch.start.x;
            let side = if (x - means[0]).abs() <= (x - means[1]).abs() {
                Column::Left
            } else {
                Column::Right
            };

            let mut best = None;
            let mut best_distance = i32::MAX;
            for index in (0..dots).filter(|&i| Column::of_key(i) == side) {
                let distance = self.keys[index].position.distance(touch.start);
                if distance >= best_distance {
                    continue;
                }
                if let Some(holder) = resolved[index] {
                    if distance < self.keys[index].position.distance(holder.start) {
                        pending.push_back(holder);
                        resolved[index] = None;
                        self.drift[index] = None;
                    } else {
                        continue;
                    }
                }
                best_distance = distance;
                best = Some(index);
            }

            match best {
                Some(index) => {
                    self.drift[index] = Some(self.keys[index].track(touch.start));
                    resolved[index] = Some(touch);
                }
                None => debug!("Touch {} at {:?} left unresolved", touch.id, touch.start),
            }
        }
        resolved
    }

    /// Shifts every key by the mean drift recorded for its column since the
    /// last update, then clears the recorded drift.
    pub fn update_keys(&mut self) {
        let mut sums = [Offset::ZERO; 2];
        let mut counts = [0i32; 2];
        for (index, slot) in self.drift.iter_mut().enumerate() {
            if let Some(offset) = slot.take() {
                let column = Column::of_key(index).index();
                sums[column].dx += offset.dx;
                sums[column].dy += offset.dy;
                counts[column] += 1;
            }
        }

        let mut shifts = [Offset::ZERO; 2];
        for column in 0..2 {
            if counts[column] > 0 {
                shifts[column] = Offset::new(sums[column].dx / counts[column], sums[column].dy / counts[column]);
            }
        }

        for (index, key) in self.keys.iter_mut().enumerate() {
            key.shift(shifts[Column::of_key(index).index()]);
        }
    }

    /// Packs the direction of every occupied slot into a code.
    pub fn swipe_code(&self, slots: &TouchSlots, swap: bool) -> SwipeCode {
        let directions: Vec<Option<Direction>> = slots
            .iter()
            .map(|slot| slot.map(|t| t.direction(self.swipe_threshold, swap, self.invert)))
            .collect();
        SwipeCode::from_directions(&directions)
    }

    /// Classifies resolved slots as a gesture oriented for this layout.
    pub fn classify_swipe(&self, slots: &TouchSlots, swap: bool) -> Gesture {
        Gesture::from_code(self.swipe_code(slots, swap)).for_layout(self.kind)
    }

    /// Swaps the two columns (and dots 7/8).
    pub fn make_slate(&mut self) {
        for i in 0..FIRST_RIGHT_KEY {
            self.keys.swap(i, FIRST_RIGHT_KEY + i);
        }
        if self.keys.len() == MAX_DOTS {
            self.keys.swap(6, 7);
        }
    }

    /// Swaps dots 1 and 3, and dots 4 and 6.
    pub fn swap_top_bottom(&mut self) {
        self.keys.swap(0, 2);
        self.keys.swap(3, 5);
    }

    pub fn apply_style(&mut self, style: PadStyle) {
        match style {
            PadStyle::Normal => {}
            PadStyle::Slate => self.make_slate(),
            PadStyle::TopBottom => self.swap_top_bottom(),
        }
    }
}

/// Store key for a layout kind in the given orientation.
pub fn store_key(kind: LayoutKind, portrait: bool, invert: bool) -> String {
    format!(
        "keyboard_save_{}_{}{}",
        kind,
        if portrait { "portrait" } else { "landscape" },
        if invert { "_invert" } else { "" }
    )
}

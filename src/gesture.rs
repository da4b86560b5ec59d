//! Closed gesture vocabulary and the raw-code lookup table.

use crate::layout::swipe::{Direction, SwipeCode};
use crate::layout::LayoutKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::debug;

/// Repeats of the same gesture within this window are fast doubles.
pub const DOUBLE_GESTURE_WINDOW_MS: u64 = 1300;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    #[default]
    None,
    OneLeft,
    OneRight,
    OneDown,
    OneUp,
    TwoLeft,
    TwoRight,
    TwoDown,
    TwoUp,
    ThreeLeft,
    ThreeRight,
    ThreeDown,
    ThreeUp,
    FourLeft,
    FourRight,
    FourDown,
    FourUp,
    FiveLeft,
    FiveRight,
    FiveDown,
    FiveUp,
    SixLeft,
    SixRight,
    SixDown,
    SixUp,
    HoldSixLeft,
    HoldSixRight,
    HoldSixDown,
    HoldSixUp,
    HoldThreeLeft,
    HoldThreeRight,
    HoldThreeDown,
    HoldThreeUp,
    HoldOneLeft,
    HoldOneRight,
    HoldOneDown,
    HoldOneUp,
    HoldFourLeft,
    HoldFourRight,
    HoldFourDown,
    HoldFourUp,
}

// Rows are dots 1..=6, columns follow Direction::SWIPES.
const SINGLES: [[Gesture; 4]; 6] = {
    use Gesture::*;
    [
        [OneLeft, OneRight, OneDown, OneUp],
        [TwoLeft, TwoRight, TwoDown, TwoUp],
        [ThreeLeft, ThreeRight, ThreeDown, ThreeUp],
        [FourLeft, FourRight, FourDown, FourUp],
        [FiveLeft, FiveRight, FiveDown, FiveUp],
        [SixLeft, SixRight, SixDown, SixUp],
    ]
};

/// (held slot, slots that may swipe, resulting gestures per direction)
const HOLDS: [(usize, [usize; 3], [Gesture; 4]); 4] = {
    use Gesture::*;
    [
        (5, [0, 1, 2], [HoldSixLeft, HoldSixRight, HoldSixDown, HoldSixUp]),
        (2, [3, 4, 5], [HoldThreeLeft, HoldThreeRight, HoldThreeDown, HoldThreeUp]),
        (0, [3, 4, 5], [HoldOneLeft, HoldOneRight, HoldOneDown, HoldOneUp]),
        (3, [0, 1, 2], [HoldFourLeft, HoldFourRight, HoldFourDown, HoldFourUp]),
    ]
};

fn direction_index(direction: Direction) -> Option<usize> {
    Direction::SWIPES.iter().position(|&d| d == direction)
}

/// Every recognized raw code. Several hold codes alias one gesture.
pub fn gesture_table() -> &'static HashMap<u32, Gesture> {
    static TABLE: OnceLock<HashMap<u32, Gesture>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        for (slot, row) in SINGLES.iter().enumerate() {
            for (direction, &gesture) in Direction::SWIPES.iter().zip(row) {
                table.insert(SwipeCode::single(slot, *direction).bits(), gesture);
            }
        }
        for (held, swipers, gestures) in HOLDS {
            for slot in swipers {
                for (direction, &gesture) in Direction::SWIPES.iter().zip(&gestures) {
                    table.insert(SwipeCode::hold(held, slot, *direction).bits(), gesture);
                }
            }
        }
        table
    })
}

impl Gesture {
    /// Gesture for dot `slot` (0-based) moving in `direction`.
    pub fn single(slot: usize, direction: Direction) -> Option<Gesture> {
        let row = SINGLES.get(slot)?;
        direction_index(direction).map(|i| row[i])
    }

    /// Looks up a raw code. Codes with no moving key, and codes outside the
    /// table, give `None`.
    pub fn from_code(code: SwipeCode) -> Gesture {
        if !code.has_motion() {
            return Gesture::None;
        }
        match gesture_table().get(&code.bits()) {
            Some(&gesture) => gesture,
            None => {
                debug!("Unrecognized swipe code {:#o}", code.bits());
                Gesture::None
            }
        }
    }

    /// Left/right swapped, for layouts whose rows read right to left.
    pub fn mirrored(self) -> Gesture {
        use Gesture::*;
        match self {
            OneLeft => OneRight,
            OneRight => OneLeft,
            TwoLeft => TwoRight,
            TwoRight => TwoLeft,
            ThreeLeft => ThreeRight,
            ThreeRight => ThreeLeft,
            FourLeft => FourRight,
            FourRight => FourLeft,
            FiveLeft => FiveRight,
            FiveRight => FiveLeft,
            SixLeft => SixRight,
            SixRight => SixLeft,
            HoldSixLeft => HoldSixRight,
            HoldSixRight => HoldSixLeft,
            HoldThreeLeft => HoldThreeRight,
            HoldThreeRight => HoldThreeLeft,
            HoldOneLeft => HoldOneRight,
            HoldOneRight => HoldOneLeft,
            HoldFourLeft => HoldFourRight,
            HoldFourRight => HoldFourLeft,
            other => other,
        }
    }

    /// Folds physical duplicates: dot 5 right is the same space as dot 4.
    pub fn normalized(self) -> Gesture {
        match self {
            Gesture::FiveRight => Gesture::FourRight,
            other => other,
        }
    }

    /// Orients a table gesture for the layout it was performed on.
    pub fn for_layout(self, kind: LayoutKind) -> Gesture {
        match kind {
            LayoutKind::Vertical => self,
            LayoutKind::Horizontal => self.mirrored(),
        }
    }

    pub fn is_hold(self) -> bool {
        HOLDS.iter().any(|(_, _, gestures)| gestures.contains(&self))
    }
}

/// Remembers the previous gesture to detect fast doubles.
#[derive(Debug, Clone)]
pub struct GestureDecoder {
    last: Gesture,
    last_time: Option<u64>,
    window_ms: u64,
}

impl Default for GestureDecoder {
    fn default() -> Self {
        Self::new(DOUBLE_GESTURE_WINDOW_MS)
    }
}

impl GestureDecoder {
    pub fn new(window_ms: u64) -> Self {
        Self {
            last: Gesture::None,
            last_time: None,
            window_ms,
        }
    }

    /// Normalizes `gesture` and reports whether it repeats the previous one
    /// inside the window. A match clears the timer, so a third repeat starts
    /// a fresh pair.
    pub fn register(&mut self, gesture: Gesture, now_ms: u64) -> (Gesture, bool) {
        let gesture = gesture.normalized();
        match self.last_time {
            Some(at) if self.last == gesture && at + self.window_ms > now_ms => {
                self.last_time = None;
                (gesture, true)
            }
            _ => {
                self.last = gesture;
                self.last_time = Some(now_ms);
                (gesture, false)
            }
        }
    }

    /// Forget the previous gesture, e.g. after a character is typed.
    pub fn reset(&mut self) {
        self.last = Gesture::None;
        self.last_time = None;
    }

    pub fn last(&self) -> Gesture {
        self.last
    }
}

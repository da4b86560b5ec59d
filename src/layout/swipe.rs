use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Bits per key slot in a [`SwipeCode`].
pub const GROUP_BITS: u32 = 3;
const GROUP_MASK: u32 = 0b111;
/// Group value for a slot with no touch.
pub const EMPTY_GROUP: u32 = 0b000;

/// Per-key motion class. Discriminants are the 3-bit group values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Left = 1,
    Right = 2,
    Down = 3,
    Up = 4,
    /// Touch present but below the swipe threshold.
    Held = 7,
}

impl Direction {
    pub const SWIPES: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Down,
        Direction::Up,
    ];

    pub fn bits(self) -> u32 {
        self as u32
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Held => Self::Held,
        }
    }

    /// Classifies the travel from `start` to `current`.
    ///
    /// The dominant axis decides. Travel toward smaller x is `Right` unless
    /// `swap` is set; travel toward smaller y is `Up`. With both `swap` and
    /// `invert` every direction is reversed.
    pub fn from_motion(start: Point, current: Point, threshold: i32, swap: bool, invert: bool) -> Self {
        let dx = start.x - current.x;
        let dy = start.y - current.y;
        let direction = if dx.abs() > dy.abs() {
            if dx > threshold {
                if swap {
                    Self::Left
                } else {
                    Self::Right
                }
            } else if dx < -threshold {
                if swap {
                    Self::Right
                } else {
                    Self::Left
                }
            } else {
                Self::Held
            }
        } else if dy > threshold {
            Self::Up
        } else if dy < -threshold {
            Self::Down
        } else {
            Self::Held
        };

        if swap && invert {
            direction.opposite()
        } else {
            direction
        }
    }
}

/// Packed per-slot directions: slot `i` occupies bits `3i..3i+3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SwipeCode(u32);

impl SwipeCode {
    pub const NONE: SwipeCode = SwipeCode(0);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    /// Builds a code from per-slot directions; `None` slots stay empty.
    pub fn from_directions(directions: &[Option<Direction>]) -> Self {
        let bits = directions
            .iter()
            .enumerate()
            .fold(0, |acc, (slot, dir)| {
                acc | dir.map_or(EMPTY_GROUP, Direction::bits) << (GROUP_BITS * slot as u32)
            });
        Self(bits)
    }

    /// One key swiping, every other slot empty.
    pub fn single(slot: usize, direction: Direction) -> Self {
        Self(direction.bits() << (GROUP_BITS * slot as u32))
    }

    /// `held` stays down while `slot` swipes.
    pub fn hold(held: usize, slot: usize, direction: Direction) -> Self {
        Self(Direction::Held.bits() << (GROUP_BITS * held as u32) | Self::single(slot, direction).0)
    }

    pub fn group(self, slot: usize) -> u32 {
        (self.0 >> (GROUP_BITS * slot as u32)) & GROUP_MASK
    }

    /// True when some group is neither empty nor held.
    pub fn has_motion(self) -> bool {
        let mut bits = self.0;
        while bits != 0 {
            let group = bits & GROUP_MASK;
            if group != EMPTY_GROUP && group != GROUP_MASK {
                return true;
            }
            bits >>= GROUP_BITS;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_codes_match_known_values() {
        assert_eq!(SwipeCode::hold(5, 0, Direction::Left).bits(), 229_377);
        assert_eq!(SwipeCode::hold(2, 3, Direction::Left).bits(), 960);
        assert_eq!(SwipeCode::hold(0, 3, Direction::Up).bits(), 2055);
        assert_eq!(SwipeCode::hold(3, 0, Direction::Left).bits(), 3585);
    }

    #[test]
    fn test_held_only_has_no_motion() {
        let code = SwipeCode::from_directions(&[Some(Direction::Held), None, Some(Direction::Held)]);
        assert!(!code.has_motion());
        assert!(SwipeCode::single(4, Direction::Down).has_motion());
    }
}

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::{Add, Sub};

/// Number of raw samples each key remembers for drift smoothing.
pub const DRIFT_HISTORY: usize = 5;

/// Screen-space coordinate in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance truncated to whole pixels.
    pub fn distance(self, other: Point) -> i32 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt() as i32
    }
}

impl Sub for Point {
    type Output = Offset;

    fn sub(self, rhs: Point) -> Offset {
        Offset {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
        }
    }
}

impl Add<Offset> for Point {
    type Output = Point;

    fn add(self, rhs: Offset) -> Point {
        Point {
            x: self.x + rhs.dx,
            y: self.y + rhs.dy,
        }
    }
}

/// Displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

/// Pixels per density-independent pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Density(pub f32);

impl Density {
    /// Converts a dp measurement to whole pixels (truncating).
    pub fn px(self, dp: i32) -> i32 {
        (dp as f32 * self.0) as i32
    }
}

impl Default for Density {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Low-pass filter over the most recent raw positions of a key.
///
/// The newest sample has weight 1 and every older sample half the weight of
/// its successor. The filter always holds at least one sample: the key's
/// position when it was created.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftFilter {
    samples: VecDeque<Point>,
}

impl DriftFilter {
    pub fn seeded(origin: Point) -> Self {
        let mut samples = VecDeque::with_capacity(DRIFT_HISTORY);
        samples.push_back(origin);
        Self { samples }
    }

    /// Records a sample, evicting the oldest when full, and returns the new
    /// weighted average.
    pub fn push(&mut self, sample: Point) -> Point {
        if self.samples.len() >= DRIFT_HISTORY {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.average()
    }

    pub fn average(&self) -> Point {
        let mut divisor = 2f64.powi(self.samples.len() as i32);
        let (mut x, mut y, mut total) = (0.0, 0.0, 0.0);
        // Oldest first so the accumulation order is stable.
        for sample in &self.samples {
            divisor /= 2.0;
            let weight = 1.0 / divisor;
            x += weight * f64::from(sample.x);
            y += weight * f64::from(sample.y);
            total += weight;
        }
        if total == 0.0 {
            return Point::default();
        }
        Point::new((x / total) as i32, (y / total) as i32)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Mean absolute difference between consecutive values (integer division).
/// Returns 0 for fewer than two values.
pub fn mean_gap(values: &[i32]) -> i32 {
    if values.len() < 2 {
        return 0;
    }
    let total: i32 = values.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    total / (values.len() as i32 - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_truncates() {
        assert_eq!(Point::new(0, 0).distance(Point::new(3, 4)), 5);
        assert_eq!(Point::new(0, 0).distance(Point::new(1, 1)), 1);
    }

    #[test]
    fn test_mean_gap() {
        assert_eq!(mean_gap(&[50, 150, 250]), 100);
        assert_eq!(mean_gap(&[250, 150, 60]), 95);
        assert_eq!(mean_gap(&[7]), 0);
    }
}

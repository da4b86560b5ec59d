//! Single row of six keys, laid out like a Perkins brailler: 3 2 1 | 4 5 6.

use super::{Key, LayoutOptions, Viewport, MAX_DOTS};
use crate::error::PadResult;
use crate::geometry::{mean_gap, Point};

const MAX_HORIZONTAL_DP: i32 = 80;

pub(super) fn arrange(mut keys: Vec<Key>, viewport: Viewport, options: &LayoutOptions) -> PadResult<Vec<Key>> {
    keys.sort_by_key(|k| k.position().x);
    keys.swap(0, 2);

    if options.eight_dots {
        let left = &keys[0..3];
        let right = &keys[3..6];
        let (left_dx, left_dy) = gaps(left);
        let (right_dx, right_dy) = gaps(right);
        let dot3 = keys[2].position();
        let dot6 = keys[5].position();
        let dot7 = Point::new((dot3.x - left_dx).max(0), (dot3.y - left_dy).max(0));
        let dot8 = Point::new((dot6.x + right_dx).min(viewport.width), (dot6.y - right_dy).max(0));
        keys.push(Key::at(dot7));
        keys.push(Key::at(dot8));
    }

    if viewport.portrait && !options.invert {
        for i in 0..3 {
            keys.swap(i, i + 3);
        }
        if keys.len() == MAX_DOTS {
            keys.swap(6, 7);
        }
    }
    Ok(keys)
}

fn gaps(keys: &[Key]) -> (i32, i32) {
    let xs: Vec<i32> = keys.iter().map(|k| k.position().x).collect();
    let ys: Vec<i32> = keys.iter().map(|k| k.position().y).collect();
    (mean_gap(&xs), mean_gap(&ys))
}

/// Three keys in from each edge, centred vertically.
pub fn default_points(viewport: Viewport, options: &LayoutOptions) -> Vec<Point> {
    let spacing = (viewport.width / 8).min(options.density.px(MAX_HORIZONTAL_DP));
    let y = viewport.height / 2;

    let mut points: Vec<Point> = (1..=3).map(|n| Point::new(n * spacing, y)).collect();
    points.extend((1..=3).map(|n| Point::new(viewport.width - n * spacing, y)));
    if options.invert {
        for i in 0..3 {
            points.swap(i, i + 3);
        }
    }
    points
}

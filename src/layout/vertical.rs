//! Two columns of three keys, usually used with the screen facing away.

use super::{Column, Key, LayoutOptions, Viewport};
use crate::error::{PadError, PadResult};
use crate::geometry::{mean_gap, Point};

/// How far (dp) a point may sit from its column's x and still belong to it.
pub const MAX_COLUMN_WIDTH_DP: i32 = 120;
const MAX_HORIZONTAL_DP: i32 = 120;
const MAX_VERTICAL_DP: i32 = 80;

/// X of a column: the left column is at the largest x, the right column at
/// the smallest, because the device is held facing away.
pub fn column_x(points: &[Point], column: Column) -> Option<i32> {
    let xs = points.iter().map(|p| p.x);
    match column {
        Column::Left => xs.max(),
        Column::Right => xs.min(),
    }
}

pub fn in_column(point: Point, column_x: i32, margin: i32) -> bool {
    (column_x - point.x).abs() < margin
}

/// Counts points belonging to the (left, right) columns; a point is checked
/// against the left column first.
pub fn column_counts(points: &[Point], margin: i32) -> (usize, usize) {
    let (Some(left), Some(right)) = (column_x(points, Column::Left), column_x(points, Column::Right)) else {
        return (0, 0);
    };
    points.iter().fold((0, 0), |(l, r), &p| {
        if in_column(p, left, margin) {
            (l + 1, r)
        } else if in_column(p, right, margin) {
            (l, r + 1)
        } else {
            (l, r)
        }
    })
}

pub(super) fn arrange(keys: Vec<Key>, viewport: Viewport, options: &LayoutOptions) -> PadResult<Vec<Key>> {
    let margin = options.density.px(MAX_COLUMN_WIDTH_DP);
    let positions: Vec<Point> = keys.iter().map(Key::position).collect();
    let left = column_x(&positions, Column::Left).unwrap_or_default();
    let right = column_x(&positions, Column::Right).unwrap_or_default();

    let mut left_list = Vec::new();
    let mut right_list = Vec::new();
    for key in keys {
        if in_column(key.position(), left, margin) {
            left_list.push(key);
        } else if in_column(key.position(), right, margin) {
            right_list.push(key);
        } else {
            return Err(PadError::Calibration(format!(
                "point ({}, {}) is outside both key columns",
                key.position().x,
                key.position().y
            )));
        }
    }
    left_list.sort_by_key(|k| k.position().y);
    right_list.sort_by_key(|k| k.position().y);

    let mut ordered = if !viewport.portrait {
        left_list.extend(right_list);
        left_list
    } else if options.invert {
        left_list.reverse();
        right_list.reverse();
        left_list.extend(right_list);
        left_list
    } else {
        right_list.extend(left_list);
        right_list
    };

    if options.eight_dots {
        let extra = [
            extra_dot(&ordered[0..3], viewport, options),
            extra_dot(&ordered[3..6], viewport, options),
        ];
        ordered.extend(extra.into_iter().map(Key::at));
    }
    Ok(ordered)
}

/// Dot 7 or 8: centred on the column, one mean gap past its last key.
fn extra_dot(column: &[Key], viewport: Viewport, options: &LayoutOptions) -> Point {
    let ys: Vec<i32> = column.iter().map(|k| k.position().y).collect();
    let gap = mean_gap(&ys);
    let min_x = column.iter().map(|k| k.position().x).min().unwrap_or_default();
    let max_x = column.iter().map(|k| k.position().x).max().unwrap_or_default();
    let last = column[column.len() - 1].position();
    let y = if options.invert && viewport.portrait {
        last.y - gap
    } else {
        last.y + gap
    };
    Point::new((min_x + max_x) / 2, y.min(viewport.height))
}

/// Default spacing centred on the viewport.
pub fn default_points(viewport: Viewport, options: &LayoutOptions) -> Vec<Point> {
    let centre_x = viewport.width / 2;
    let offset_x = (viewport.width / 5).min(options.density.px(MAX_HORIZONTAL_DP));
    let offset_y = (viewport.height / 4).min(options.density.px(MAX_VERTICAL_DP));

    let mut points = Vec::with_capacity(6);
    let mut y = offset_y;
    for i in 0..6 {
        if i % 3 == 0 {
            y = offset_y;
        }
        let x = if i < 3 {
            centre_x - offset_x
        } else {
            centre_x + offset_x
        };
        points.push(Point::new(x, y));
        y += offset_y;
    }
    if options.invert {
        points.reverse();
    }
    points
}

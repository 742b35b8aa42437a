//! Geometry utilities shared by selections, masks, and the perspective tool.

use crate::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounds in pixel-space.
///
/// Zero-area bounds are legal and represent an empty or point selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionBounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the bounds rectangle.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The four corners as a closed polygon path (clockwise from top-left).
    pub fn corner_path(&self) -> Vec<Point> {
        vec![
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }

    /// Whether `other` lies entirely inside (or on the edge of) these bounds.
    pub fn contains_bounds(&self, other: &SelectionBounds) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }

    /// Whether the point lies inside (or on the edge of) these bounds.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Compute the bounding box of a point sequence via min/max reduction.
///
/// An empty path yields zero bounds at the origin.
pub fn bounds_from_path(points: &[Point]) -> SelectionBounds {
    if points.is_empty() {
        return SelectionBounds::default();
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    SelectionBounds::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

//! Integer geometry used to locate entities.
//!
//! Rectangles follow the usual raster conventions:
//! `(x, y)` is the top-left corner, and a rectangle covers
//! `x..x + width` horizontally and `y..y + height` vertically.
//! A rectangle with a non-positive width or height is empty
//! and neither contains nor intersects anything.

use serde::{Deserialize, Serialize};

/// A point in the document coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x:      i32,
    pub y:      i32,
    pub width:  i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Whether this rectangle covers no area.
    pub fn is_empty(&self) -> bool { self.width <= 0 || self.height <= 0 }

    fn right(&self) -> i64 { i64::from(self.x) + i64::from(self.width) }

    fn bottom(&self) -> i64 { i64::from(self.y) + i64::from(self.height) }

    /// Whether `point` lies inside this rectangle.
    pub fn contains_point(&self, point: Point) -> bool {
        if self.is_empty() {
            return false;
        }

        let (px, py) = (i64::from(point.x), i64::from(point.y));
        px >= i64::from(self.x) && px < self.right() && py >= i64::from(self.y) && py < self.bottom()
    }

    /// Whether `other` lies wholly inside this rectangle.
    ///
    /// Merely touching the border from the inside still counts as contained.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether the two rectangles share some area.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        i64::from(other.x) < self.right()
            && i64::from(other.y) < self.bottom()
            && other.right() > i64::from(self.x)
            && other.bottom() > i64::from(self.y)
    }

    /// The smallest rectangle covering both rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect {
            x,
            y,
            width: saturate(right - i64::from(x)),
            height: saturate(bottom - i64::from(y)),
        }
    }
}

fn saturate(value: i64) -> i32 { value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32 }

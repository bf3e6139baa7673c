//! Basic geometry types for grid layout.
//!
//! Layout bookkeeping happens in a *canonical* space where the scroll axis
//! ("main") is X and the lane axis ("cross") is Y. [`Orientation`] maps
//! canonical rectangles to physical ones when a grid scrolls vertically.

use serde::{Deserialize, Serialize};

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// A size in 2D space (width and height).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Check if the size has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

/// A rectangle defined by origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle from origin and size.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Empty rectangle at origin.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    /// Left edge x coordinate.
    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Top edge y coordinate.
    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Right edge x coordinate.
    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Bottom edge y coordinate.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Center point of the rectangle.
    #[inline]
    pub fn center(&self) -> Point {
        Point {
            x: self.origin.x + self.size.width / 2.0,
            y: self.origin.y + self.size.height / 2.0,
        }
    }

    /// Check if the rectangle is empty (zero or negative size).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Return a copy moved by `dx`, `dy`.
    #[inline]
    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.origin.x + dx, self.origin.y + dy, self.size.width, self.size.height)
    }

    /// Compute the intersection of two rectangles.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Swap the X and Y axes.
    #[inline]
    pub fn transposed(&self) -> Rect {
        Rect::new(self.origin.y, self.origin.x, self.size.height, self.size.width)
    }
}

/// A closed interval on one axis, used for viewport spans along the scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    pub start: f32,
    pub end: f32,
}

impl Span {
    #[inline]
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> f32 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True when `other` overlaps this span by a non-zero amount.
    #[inline]
    pub fn overlaps(&self, other: &Span) -> bool {
        other.start < self.end && other.end > self.start
    }

    /// True when `other` lies entirely within this span.
    #[inline]
    pub fn contains_span(&self, other: &Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// Insets for the four edges of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Margins {
    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same inset on every edge.
    #[inline]
    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }
}

/// Direction in which the grid scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Groups and columns advance along X; cells stack along Y.
    #[default]
    Horizontal,
    /// Groups and columns advance along Y; cells stack along X.
    Vertical,
}

impl Orientation {
    /// Map a canonical layout rectangle to physical coordinates.
    #[inline]
    pub fn to_physical(self, canonical: Rect) -> Rect {
        match self {
            Orientation::Horizontal => canonical,
            Orientation::Vertical => canonical.transposed(),
        }
    }

    /// Length of the scroll axis of a physical size.
    #[inline]
    pub fn main_extent(self, size: Size) -> f32 {
        match self {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }

    /// Leading and trailing margins along the scroll axis.
    #[inline]
    pub fn main_margins(self, margins: &Margins) -> (f32, f32) {
        match self {
            Orientation::Horizontal => (margins.left, margins.right),
            Orientation::Vertical => (margins.top, margins.bottom),
        }
    }

    /// Physical content translation for a scroll-axis offset.
    #[inline]
    pub fn offset_point(self, offset: f32) -> Point {
        match self {
            Orientation::Horizontal => Point::new(offset, 0.0),
            Orientation::Vertical => Point::new(0.0, offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), Point::new(25.0, 40.0));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));

        let c = Rect::new(100.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn test_span_overlap_and_containment() {
        let view = Span::new(0.0, 300.0);
        assert!(view.overlaps(&Span::new(290.0, 390.0)));
        assert!(!view.overlaps(&Span::new(300.0, 400.0)));
        assert!(view.contains_span(&Span::new(0.0, 300.0)));
        assert!(!view.contains_span(&Span::new(250.0, 350.0)));
    }

    #[test]
    fn test_vertical_orientation_transposes() {
        let canonical = Rect::new(100.0, 10.0, 50.0, 20.0);
        assert_eq!(Orientation::Horizontal.to_physical(canonical), canonical);
        assert_eq!(
            Orientation::Vertical.to_physical(canonical),
            Rect::new(10.0, 100.0, 20.0, 50.0)
        );
        assert_eq!(Orientation::Vertical.main_extent(Size::new(640.0, 480.0)), 480.0);
    }
}

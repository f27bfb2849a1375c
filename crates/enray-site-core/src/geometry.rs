//! Geometry in CSS pixels.
//!
//! These mirror what the browser reports through `getBoundingClientRect()`:
//! viewport-relative `f64` coordinates with `y` growing downward.

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// An empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a new rectangle from its top-left corner and size.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Get the center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.y + self.height / 2.0)
    }

    /// Check if the rectangle contains a point.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Whether any part of the rectangle lies vertically within a viewport
    /// of the given height.
    #[inline]
    pub fn intersects_viewport(&self, viewport_height: f64) -> bool {
        self.top() < viewport_height && self.bottom() > 0.0
    }
}

//! Integer rectangles and points in global layout space.

/// Axis-aligned rectangle in integer pixel space.
///
/// Width and height are signed so that intermediate results of clamping and
/// edge dragging can be represented before they are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Saturates at `i32::MAX`.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        !self.is_empty() && x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Intersection of two rectangles, `None` when they do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x.saturating_add(dx), self.y.saturating_add(dy), self.width, self.height)
    }

    /// Scale the rectangle about its center. Never collapses below 1x1.
    pub fn scaled_about_center(&self, scale: f64) -> Rect {
        let width = ((self.width as f64 * scale) as i32).max(1);
        let height = ((self.height as f64 * scale) as i32).max(1);
        Rect::new(
            self.x + (self.width - width) / 2,
            self.y + (self.height - height) / 2,
            width,
            height,
        )
    }

    /// Squared distance from a point to the closest point of the rectangle.
    pub fn distance_squared_to(&self, x: f64, y: f64) -> f64 {
        let cx = x.clamp(self.x as f64, self.right() as f64);
        let cy = y.clamp(self.y as f64, self.bottom() as f64);
        (x - cx).powi(2) + (y - cy).powi(2)
    }
}

/// Width/height pair used for client size constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const UNBOUNDED: Size = Size::new(i32::MAX, i32::MAX);
}

/// Clamp a dimension into `[min, max]`. A lower bound above the upper bound wins.
pub fn clamp_dimension(value: i32, min: i32, max: i32) -> i32 {
    value.min(max).max(min)
}

/// Floating point position in layout space (cursor coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn rounded(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

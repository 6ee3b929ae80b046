//! Normalized axis-aligned rectangle in image pixel coordinates.

/// Rectangle with `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl Rect {
    /// Build from two corner points in any order.
    pub fn from_corners(a: [i64; 2], b: [i64; 2]) -> Self {
        Self {
            x1: a[0].min(b[0]),
            y1: a[1].min(b[1]),
            x2: a[0].max(b[0]),
            y2: a[1].max(b[1]),
        }
    }

    pub fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i64 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// Height over width; infinite for a zero-width rectangle.
    pub fn aspect_ratio(&self) -> f64 {
        if self.width() == 0 {
            f64::INFINITY
        } else {
            self.height() as f64 / self.width() as f64
        }
    }

    /// Corner points in the stored order `[top-left, bottom-right]`.
    pub fn corners(&self) -> [[i64; 2]; 2] {
        [[self.x1, self.y1], [self.x2, self.y2]]
    }

    /// Clamp all corners into `bounds`, collapsing to an edge when the
    /// rectangle lies entirely outside.
    pub fn clamped_to(&self, bounds: &Rect) -> Rect {
        Rect {
            x1: self.x1.clamp(bounds.x1, bounds.x2),
            y1: self.y1.clamp(bounds.y1, bounds.y2),
            x2: self.x2.clamp(bounds.x1, bounds.x2),
            y2: self.y2.clamp(bounds.y1, bounds.y2),
        }
    }

    /// True if any corner lies outside `bounds`.
    pub fn exceeds(&self, bounds: &Rect) -> bool {
        self.x1 < bounds.x1 || self.y1 < bounds.y1 || self.x2 > bounds.x2 || self.y2 > bounds.y2
    }
}

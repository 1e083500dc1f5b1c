//! Points and rectangles.
//!
//! Rectangles are half-open on the high edge: `x2` and `y2` are the first
//! column and row *outside* the rectangle.

use crate::gc::TextAlign;
use crate::GuiError;

/// A point in logical or device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangle `(x1, y1)`..`(x2, y2)`, exclusive of `x2` and `y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    /// The zero-area rectangle at the origin.
    pub const EMPTY: Rect = Rect::new(0, 0, 0, 0);

    /// Create a rectangle from its edges.
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a rectangle from its edges, rejecting inverted ones.
    pub fn checked(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self, GuiError> {
        if x1 > x2 || y1 > y2 {
            return Err(GuiError::InvalidRect);
        }
        Ok(Self::new(x1, y1, x2, y2))
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.x2.saturating_sub(self.x1)
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.y2.saturating_sub(self.y1)
    }

    /// A rectangle covers no pixel when either span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.x1 >= self.x2 || self.y1 >= self.y2
    }

    #[inline]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }

    /// Check if the two rectangles share at least one pixel.
    pub fn is_intersect(&self, other: &Rect) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Overlap of two rectangles; empty when they are disjoint.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let r = Rect {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        };
        if r.is_empty() {
            Rect::EMPTY
        } else {
            r
        }
    }

    /// Bounding box of two rectangles. Empty rectangles contribute nothing.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub const fn moved(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x1.saturating_add(dx),
            self.y1.saturating_add(dy),
            self.x2.saturating_add(dx),
            self.y2.saturating_add(dy),
        )
    }

    /// Position `self` inside `container` according to `align`.
    ///
    /// A dimension that does not fit is pinned to the container's edges on
    /// that axis; otherwise the free space is distributed by the alignment
    /// flags (left/top when none are set).
    pub fn move_to_align(&self, container: &Rect, align: TextAlign) -> Rect {
        let dw = container.width().saturating_sub(self.width()).max(0);
        let dh = container.height().saturating_sub(self.height()).max(0);

        let mut to = self.moved(
            container.x1.saturating_sub(self.x1),
            container.y1.saturating_sub(self.y1),
        );
        if dw == 0 {
            to.x2 = container.x2;
        }
        if dh == 0 {
            to.y2 = container.y2;
        }

        let dx = if align.contains(TextAlign::RIGHT) {
            dw
        } else if align.contains(TextAlign::CENTER_HORIZONTAL) {
            dw / 2
        } else {
            0
        };
        let dy = if align.contains(TextAlign::BOTTOM) {
            dh
        } else if align.contains(TextAlign::CENTER_VERTICAL) {
            dh / 2
        } else {
            0
        };
        to.moved(dx, dy)
    }
}

//! Clip regions.
//!
//! A clip region is the set of device pixels a widget may currently touch.
//! It is computed by the widget layer (already in device coordinates) and
//! only read by the rasterizer.

use alloc::vec::Vec;
use core::slice;

use crate::rect::Rect;
use crate::GuiError;

/// Visible area of a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipRegion {
    /// A single rectangle (the common, unobscured case).
    Flat(Rect),
    /// Disjoint rectangles and their tight bounding box.
    List {
        /// Bounding box of `rects`.
        extents: Rect,
        /// Non-overlapping, non-empty members in emission order.
        rects: Vec<Rect>,
    },
}

impl ClipRegion {
    /// A region that admits nothing.
    pub const fn empty() -> Self {
        ClipRegion::Flat(Rect::EMPTY)
    }

    /// A region covering exactly `rect`.
    pub const fn flat(rect: Rect) -> Self {
        ClipRegion::Flat(rect)
    }

    /// Build a list region from disjoint rectangles.
    ///
    /// Empty members are dropped and the stored order is kept. Overlapping
    /// members are rejected since the rasterizer would paint the overlap
    /// twice.
    pub fn from_rects(rects: &[Rect]) -> Result<Self, GuiError> {
        let mut members: Vec<Rect> = Vec::with_capacity(rects.len());
        let mut extents = Rect::EMPTY;

        for rect in rects {
            let rect = Rect::checked(rect.x1, rect.y1, rect.x2, rect.y2)?;
            if rect.is_empty() {
                continue;
            }
            if members.iter().any(|m| m.is_intersect(&rect)) {
                return Err(GuiError::OverlappingClipRects);
            }
            extents = extents.union(&rect);
            members.push(rect);
        }

        Ok(ClipRegion::List { extents, rects: members })
    }

    /// Bounding rectangle of the region.
    pub fn extents(&self) -> Rect {
        match self {
            ClipRegion::Flat(rect) => *rect,
            ClipRegion::List { extents, .. } => *extents,
        }
    }

    /// The rectangles making up the region, in emission order.
    ///
    /// A flat region yields its single rectangle, so callers can treat both
    /// shapes the same way.
    #[inline]
    pub fn rects(&self) -> &[Rect] {
        match self {
            ClipRegion::Flat(rect) => slice::from_ref(rect),
            ClipRegion::List { rects, .. } => rects,
        }
    }

    pub fn num_rects(&self) -> usize {
        self.rects().len()
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, ClipRegion::Flat(_))
    }

    pub fn is_empty(&self) -> bool {
        self.rects().iter().all(Rect::is_empty)
    }

    /// Find the member rectangle containing `(x, y)`.
    pub fn contains_point(&self, x: i32, y: i32) -> Option<&Rect> {
        if !self.extents().contains_point(x, y) {
            return None;
        }
        self.rects().iter().find(|r| r.contains_point(x, y))
    }

    /// Restrict the region to `bounds`.
    pub fn intersect_rect(&self, bounds: &Rect) -> ClipRegion {
        match self {
            ClipRegion::Flat(rect) => ClipRegion::Flat(rect.intersect(bounds)),
            ClipRegion::List { rects, .. } => {
                let mut extents = Rect::EMPTY;
                let mut members = Vec::with_capacity(rects.len());
                for r in rects.iter().map(|r| r.intersect(bounds)) {
                    if !r.is_empty() {
                        extents = extents.union(&r);
                        members.push(r);
                    }
                }
                ClipRegion::List { extents, rects: members }
            }
        }
    }
}

impl Default for ClipRegion {
    fn default() -> Self {
        ClipRegion::empty()
    }
}

impl From<Rect> for ClipRegion {
    fn from(rect: Rect) -> Self {
        ClipRegion::Flat(rect)
    }
}

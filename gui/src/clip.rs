//! Clip engine.
//!
//! Every line-shaped primitive (vertical line, horizontal line, scanline
//! blit) is cut against each rectangle of a clip region in turn. A flat
//! region is a one-rectangle list here, so both region shapes go through
//! the same test-and-clamp code and produce identical output.
//!
//! Spans are half-open: `start..end`. Nothing here allocates.

use core::slice;

use crate::rect::Rect;
use crate::region::ClipRegion;

/// A clamped span on the moving axis of a line primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// First covered coordinate.
    pub start: i32,
    /// One past the last covered coordinate.
    pub end: i32,
    /// Pixels trimmed from the low end of the requested span.
    pub skipped: usize,
}

impl Span {
    #[inline]
    pub fn len(&self) -> usize {
        self.end.abs_diff(self.start) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Order a span so that `lo <= hi`.
#[inline]
pub fn normalize(a: i32, b: i32) -> (i32, i32) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Clamp the horizontal span `x1..x2` on row `y` to `rect`.
#[inline]
pub fn clip_hspan(rect: &Rect, x1: i32, x2: i32, y: i32) -> Option<Span> {
    if y < rect.y1 || y >= rect.y2 {
        return None;
    }
    clamp(x1, x2, rect.x1, rect.x2)
}

/// Clamp the vertical span `y1..y2` on column `x` to `rect`.
#[inline]
pub fn clip_vspan(rect: &Rect, x: i32, y1: i32, y2: i32) -> Option<Span> {
    if x < rect.x1 || x >= rect.x2 {
        return None;
    }
    clamp(y1, y2, rect.y1, rect.y2)
}

#[inline]
fn clamp(lo: i32, hi: i32, min: i32, max: i32) -> Option<Span> {
    if hi <= min || lo >= max {
        return None;
    }
    let start = lo.max(min);
    let end = hi.min(max);
    if start >= end {
        return None;
    }
    Some(Span {
        start,
        end,
        skipped: start.abs_diff(lo) as usize,
    })
}

/// Direction of the clipped primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    /// Constant `y`, moving `x`.
    Horizontal,
    /// Constant `x`, moving `y`.
    Vertical,
}

/// Iterator over the pieces of a line that fall inside a clip region.
///
/// Pieces come out in the region's stored rectangle order, one per
/// intersecting rectangle.
pub struct Spans<'r> {
    rects: slice::Iter<'r, Rect>,
    axis: Axis,
    fixed: i32,
    lo: i32,
    hi: i32,
}

impl<'r> Iterator for Spans<'r> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        for rect in self.rects.by_ref() {
            let span = match self.axis {
                Axis::Horizontal => clip_hspan(rect, self.lo, self.hi, self.fixed),
                Axis::Vertical => clip_vspan(rect, self.fixed, self.lo, self.hi),
            };
            if span.is_some() {
                return span;
            }
        }
        None
    }
}

impl ClipRegion {
    /// Pieces of the horizontal line `x1..x2` on row `y` inside the region.
    ///
    /// A reversed span is swapped first.
    pub fn clip_hline(&self, x1: i32, x2: i32, y: i32) -> Spans<'_> {
        let (lo, hi) = normalize(x1, x2);
        Spans {
            rects: self.rects().iter(),
            axis: Axis::Horizontal,
            fixed: y,
            lo,
            hi,
        }
    }

    /// Pieces of the vertical line `y1..y2` on column `x` inside the region.
    ///
    /// A reversed span is swapped first.
    pub fn clip_vline(&self, x: i32, y1: i32, y2: i32) -> Spans<'_> {
        let (lo, hi) = normalize(y1, y2);
        Spans {
            rects: self.rects().iter(),
            axis: Axis::Vertical,
            fixed: x,
            lo,
            hi,
        }
    }
}

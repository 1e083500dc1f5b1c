//! Device contexts.
//!
//! A device context (DC) is the capability widgets, font renderers and
//! image blitters draw through. Every surface kind implements the same
//! [`DeviceContext`] operation set, so callers never branch on the kind:
//!
//! - [`HardwareDc`]: the whole screen, forwarded to the driver unclipped
//! - [`ClientDc`]: one widget, translated by its extent and clipped to its
//!   visible region
//! - [`BufferDc`]: an offscreen pixel buffer
//!
//! All line spans are half-open (`x1..x2`, `y1..y2`) and may be given in
//! either direction.

mod buffer;
mod client;
mod hardware;

pub use buffer::BufferDc;
pub use client::ClientDc;
pub use hardware::HardwareDc;

use core::ops::{Deref, DerefMut};

use crate::color::Color;
use crate::config::{BORDER_DARK, BORDER_LIGHT};
use crate::driver::HardwareOps;
use crate::font;
use crate::gc::GraphicsContext;
use crate::rect::{Point, Rect};
use crate::widget::{WidgetArena, WidgetId};

/// Surface kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DcKind {
    /// Whole display, no clipping.
    Hardware,
    /// Bound to one widget.
    Client,
    /// Offscreen pixel buffer.
    Buffer,
}

/// Primitive drawing operations of a surface.
///
/// Coordinates are logical: relative to the surface's own top-left corner.
pub trait DeviceContext {
    /// Kind tag of this DC.
    fn kind(&self) -> DcKind;

    /// Drawing state the primitives read.
    fn gc(&self) -> &GraphicsContext;

    /// Mutable drawing state.
    fn gc_mut(&mut self) -> &mut GraphicsContext;

    /// Whether drawing currently has any effect.
    fn is_visible(&self) -> bool;

    /// Logical rectangle of the surface, `(0, 0)` based.
    fn rect(&self) -> Rect;

    /// Device position of logical `(0, 0)`.
    fn origin(&self) -> Point;

    /// Bits per pixel of the data `blit_line` expects.
    fn bits_per_pixel(&self) -> u8;

    /// Draw a point in the foreground color.
    fn draw_point(&mut self, x: i32, y: i32);

    /// Draw a point in `color`.
    fn draw_color_point(&mut self, x: i32, y: i32, color: Color);

    /// Draw column `x` over rows `y1..y2` in the foreground color.
    fn draw_vline(&mut self, x: i32, y1: i32, y2: i32);

    /// Draw row `y` over columns `x1..x2` in the foreground color.
    fn draw_hline(&mut self, x1: i32, x2: i32, y: i32);

    /// Fill `rect` with the background color.
    fn fill_rect(&mut self, rect: &Rect);

    /// Copy one row of native-encoded pixels to columns `x1..x2` of row `y`.
    fn blit_line(&mut self, x1: i32, x2: i32, y: i32, line: &[u8]);

    /// Copy the area starting at `origin` of this surface into `rect` of
    /// `dest`.
    fn blit(&mut self, origin: Point, dest: &mut dyn DeviceContext, rect: &Rect);

    /// Validate the DC at the end of its use. Returns `false` for a DC that
    /// is not what it claims to be.
    fn finalize(&mut self) -> bool;

    /// Convert a logical point to device coordinates.
    fn logic_to_device(&self, point: Point) -> Point {
        let origin = self.origin();
        Point::new(point.x + origin.x, point.y + origin.y)
    }

    /// Convert a logical rectangle to device coordinates.
    fn rect_to_device(&self, rect: &Rect) -> Rect {
        let origin = self.origin();
        rect.moved(origin.x, origin.y)
    }
}

/// Start drawing on a widget.
///
/// Returns `None` when the widget does not exist or is not attached to a
/// top-level container.
pub fn begin_drawing<'a>(
    arena: &'a mut WidgetArena,
    owner: WidgetId,
    driver: &'a mut dyn HardwareOps,
) -> Option<ClientDc<'a>> {
    let dc = ClientDc::create(arena, owner, driver);
    if dc.is_some() {
        log::trace!("begin drawing on widget {:?}", owner);
    }
    dc
}

/// Finish drawing on a widget.
///
/// With `update` set, the visible part of the widget is pushed to the
/// display through [`HardwareOps::update`].
pub fn end_drawing(mut dc: ClientDc<'_>, update: bool) -> bool {
    if update && dc.is_visible() {
        dc.update_display();
    }
    log::trace!("end drawing on widget {:?}", dc.owner_id());
    dc.finalize()
}

/// Temporarily replaces the foreground color of a DC.
///
/// The previous foreground is restored when the guard is dropped, on every
/// exit path. The guard derefs to the DC, so primitives are issued through
/// it while the swap is active.
pub struct ForegroundSwap<'d, D: DeviceContext + ?Sized> {
    dc: &'d mut D,
    saved: Color,
}

impl<'d, D: DeviceContext + ?Sized> ForegroundSwap<'d, D> {
    /// Draw with `color` as foreground until the guard drops.
    pub fn new(dc: &'d mut D, color: Color) -> Self {
        let saved = dc.gc().foreground;
        dc.gc_mut().foreground = color;
        Self { dc, saved }
    }

    /// Draw with the background color as foreground until the guard drops.
    pub fn background(dc: &'d mut D) -> Self {
        let background = dc.gc().background;
        Self::new(dc, background)
    }
}

impl<'d, D: DeviceContext + ?Sized> Deref for ForegroundSwap<'d, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.dc
    }
}

impl<'d, D: DeviceContext + ?Sized> DerefMut for ForegroundSwap<'d, D> {
    fn deref_mut(&mut self) -> &mut D {
        self.dc
    }
}

impl<'d, D: DeviceContext + ?Sized> Drop for ForegroundSwap<'d, D> {
    fn drop(&mut self) {
        self.dc.gc_mut().foreground = self.saved;
    }
}

/// Fill `rect` with the background color, one `draw_hline` per row.
///
/// Shared by every DC kind so filling and line drawing go through the same
/// clipping path.
pub(crate) fn fill_rect_by_rows<D: DeviceContext + ?Sized>(dc: &mut D, rect: &Rect) {
    if !dc.is_visible() || rect.is_empty() {
        return;
    }
    let mut dc = ForegroundSwap::background(dc);
    for y in rect.y1..rect.y2 {
        dc.draw_hline(rect.x1, rect.x2, y);
    }
}

/// Border styles for [`DcExt::draw_border`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    /// One-pixel outline in the foreground color.
    Simple,
    /// Light top/left edges, dark bottom/right edges.
    Raise,
    /// Dark top/left edges, light bottom/right edges.
    Sunken,
}

/// Composite drawing built on the primitive operations.
///
/// Available on every device context, including `dyn DeviceContext`.
pub trait DcExt: DeviceContext {
    /// Line between two points, both ends included.
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        if y1 == y2 {
            let (lo, hi) = crate::clip::normalize(x1, x2);
            self.draw_hline(lo, hi.saturating_add(1), y1);
            return;
        }
        if x1 == x2 {
            let (lo, hi) = crate::clip::normalize(y1, y2);
            self.draw_vline(x1, lo, hi.saturating_add(1));
            return;
        }

        // Error terms in i64: endpoint deltas may exceed the i32 range.
        let dx = i64::from(x2) - i64::from(x1);
        let dy = i64::from(y2) - i64::from(y1);
        let (dx, dy) = (dx.abs(), -dy.abs());
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x1, y1);

        loop {
            self.draw_point(x, y);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Outline `rect` in the foreground color.
    fn draw_rect(&mut self, rect: &Rect) {
        if rect.is_empty() {
            return;
        }
        self.draw_hline(rect.x1, rect.x2, rect.y1);
        self.draw_hline(rect.x1, rect.x2, rect.y2 - 1);
        self.draw_vline(rect.x1, rect.y1, rect.y2);
        self.draw_vline(rect.x2 - 1, rect.y1, rect.y2);
    }

    /// Fill `rect` with the foreground color.
    fn fill_rect_forecolor(&mut self, rect: &Rect) {
        if !self.is_visible() {
            return;
        }
        for y in rect.y1..rect.y2 {
            self.draw_hline(rect.x1, rect.x2, y);
        }
    }

    /// Draw a one-pixel border around the inside of `rect`.
    fn draw_border(&mut self, rect: &Rect, style: BorderStyle) {
        if rect.is_empty() {
            return;
        }
        let (top_left, bottom_right) = match style {
            BorderStyle::Simple => {
                self.draw_rect(rect);
                return;
            }
            BorderStyle::Raise => (BORDER_LIGHT, BORDER_DARK),
            BorderStyle::Sunken => (BORDER_DARK, BORDER_LIGHT),
        };

        {
            let mut dc = ForegroundSwap::new(self, top_left);
            dc.draw_hline(rect.x1, rect.x2, rect.y1);
            dc.draw_vline(rect.x1, rect.y1, rect.y2);
        }
        let mut dc = ForegroundSwap::new(self, bottom_right);
        dc.draw_hline(rect.x1.saturating_add(1), rect.x2, rect.y2 - 1);
        dc.draw_vline(rect.x2 - 1, rect.y1.saturating_add(1), rect.y2);
    }

    /// Draw the set bits of a 1-bit, MSB-first bitmap at `(x, y)`.
    ///
    /// Rows are `ceil(w / 8)` bytes apart.
    fn draw_mono_bmp(&mut self, x: i32, y: i32, w: u32, h: u32, data: &[u8]) {
        let stride = ((w + 7) / 8) as usize;
        for row in 0..h as usize {
            let Some(bits) = data.get(row * stride..(row + 1) * stride) else {
                return;
            };
            for col in 0..w as usize {
                if bits[col / 8] & (0x80 >> (col % 8)) != 0 {
                    self.draw_point(x.saturating_add(col as i32), y.saturating_add(row as i32));
                }
            }
        }
    }

    /// Draw `text` inside `rect` with the GC's font and alignment.
    fn draw_text(&mut self, text: &str, rect: &Rect) {
        let Some(font) = self.gc().font.clone() else {
            log::debug!("draw_text without a font: {:?}", text);
            return;
        };
        font::draw_text(self, font.as_ref(), text, rect);
    }

    /// Logical rectangle of the surface.
    fn get_rect(&self) -> Rect {
        self.rect()
    }
}

impl<D: DeviceContext + ?Sized> DcExt for D {}

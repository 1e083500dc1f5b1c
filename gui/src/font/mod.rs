//! Font Rendering Module
//!
//! Text is rasterized entirely through the point primitives of a device
//! context, so glyphs are translated and clipped exactly like any other
//! drawing. Layout and metrics read the same per-glyph advance, which
//! keeps measured and drawn text in agreement.

mod bitmap;

pub use bitmap::BitmapFont;

use alloc::sync::Arc;
use alloc::vec::Vec;

use spin::Mutex;

use crate::dc::DeviceContext;
use crate::gc::TextStyle;
use crate::rect::Rect;

/// Shared handle to an immutable font.
pub type FontRef = Arc<dyn Font>;

/// A 1-bit glyph image borrowed from its font.
#[derive(Debug, Clone, Copy)]
pub struct Glyph<'a> {
    /// Glyph width in pixels.
    pub width: u32,
    /// Glyph height in pixels.
    pub height: u32,
    /// Bytes per bitmap row.
    pub stride: usize,
    /// Horizontal advance to the next glyph.
    pub advance: u32,
    /// Row-major bits, MSB first.
    pub bitmap: &'a [u8],
}

impl<'a> Glyph<'a> {
    /// Whether the bit at `(col, row)` is set. Bits outside the bitmap
    /// read as clear.
    #[inline]
    pub fn is_set(&self, col: u32, row: u32) -> bool {
        if col >= self.width || row >= self.height {
            return false;
        }
        let index = row as usize * self.stride + col as usize / 8;
        self.bitmap
            .get(index)
            .map_or(false, |byte| byte & (0x80 >> (col % 8)) != 0)
    }
}

/// A font a device context can draw text with.
pub trait Font: Send + Sync {
    /// Family name used for registry lookup.
    fn family(&self) -> &str;

    /// Line height in pixels.
    fn height(&self) -> u32;

    /// Glyph for `ch`, `None` when the font cannot represent it.
    fn glyph(&self, ch: char) -> Option<Glyph<'_>>;

    /// Horizontal advance of `ch`. Characters without a glyph take no space.
    fn advance(&self, ch: char) -> u32 {
        self.glyph(ch).map_or(0, |glyph| glyph.advance)
    }
}

/// Bounding box of `text` set in `font`, at the origin.
pub fn text_metrics(font: &dyn Font, text: &str) -> Rect {
    let width = text
        .chars()
        .fold(0u32, |width, ch| width.saturating_add(font.advance(ch)));
    let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
    Rect::new(0, 0, clamp(width), clamp(font.height()))
}

/// Draw `text` inside `rect` of `dc`, aligned by the DC's text alignment.
///
/// Text that does not fit is cut at the rectangle edges.
pub fn draw_text<D: DeviceContext + ?Sized>(dc: &mut D, font: &dyn Font, text: &str, rect: &Rect) {
    if !dc.is_visible() {
        return;
    }
    let mut area = text_metrics(font, text).move_to_align(rect, dc.gc().text_align);
    if area.y1 >= area.y2 {
        return;
    }

    for ch in text.chars() {
        if area.x1 >= area.x2 {
            break;
        }
        if let Some(glyph) = font.glyph(ch) {
            draw_glyph(dc, &glyph, &area);
        }
        area.x1 = area.x1.saturating_add(font.advance(ch) as i32);
    }
}

/// Draw one glyph with its top-left corner at `area.x1, area.y1`, cut to
/// `area`.
fn draw_glyph<D: DeviceContext + ?Sized>(dc: &mut D, glyph: &Glyph<'_>, area: &Rect) {
    let (x, y) = (area.x1, area.y1);
    let w = (glyph.width as i32).min(area.x2.saturating_sub(x));
    let h = (glyph.height as i32).min(area.y2.saturating_sub(y));

    let bounds = dc.rect();
    let paint_background = dc.gc().text_style.contains(TextStyle::DRAW_BACKGROUND);
    let background = dc.gc().background;

    for row in 0..h {
        let py = y.saturating_add(row);
        if py < bounds.y1 || py >= bounds.y2 {
            continue;
        }
        for col in 0..w {
            if glyph.is_set(col as u32, row as u32) {
                dc.draw_point(x.saturating_add(col), py);
            } else if paint_background {
                dc.draw_color_point(x.saturating_add(col), py, background);
            }
        }
    }
}

static FONTS: Mutex<Vec<FontRef>> = Mutex::new(Vec::new());

/// Make `font` available to [`font_refer`].
pub fn register_font(font: FontRef) {
    log::debug!("register font {} ({} px)", font.family(), font.height());
    FONTS.lock().push(font);
}

/// Find a registered font by family and height.
pub fn font_refer(family: &str, height: u32) -> Option<FontRef> {
    FONTS
        .lock()
        .iter()
        .find(|font| font.family() == family && font.height() == height)
        .cloned()
}

/// Remove a registered font. Handles already given out stay valid.
pub fn unregister_font(font: &FontRef) -> bool {
    let mut fonts = FONTS.lock();
    let Some(index) = fonts.iter().position(|f| Arc::ptr_eq(f, font)) else {
        return false;
    };
    fonts.remove(index);
    log::debug!("unregister font {} ({} px)", font.family(), font.height());
    true
}

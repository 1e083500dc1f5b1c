//! Offscreen buffer device context.
//!
//! Pixels live in memory in a native [`PixelFormat`]. Drawing is clipped to
//! a region inside the buffer bounds (the whole buffer unless narrowed with
//! [`BufferDc::set_clip`]) through the same clip engine client DCs use.
//! [`DeviceContext::blit`] copies rows out to any other DC through its
//! `blit_line`, so the destination applies its own translation and
//! clipping.

use alloc::vec;
use alloc::vec::Vec;

use crate::color::{Color, PixelFormat};
use crate::dc::{fill_rect_by_rows, DcKind, DeviceContext};
use crate::gc::GraphicsContext;
use crate::rect::{Point, Rect};
use crate::region::ClipRegion;
use crate::GuiError;

/// In-memory drawing surface.
pub struct BufferDc {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Native pixel format
    format: PixelFormat,
    /// Bytes per row
    pitch: usize,
    /// Pixel data
    pixels: Vec<u8>,
    /// Drawable area, always inside the bounds
    clip: ClipRegion,
    gc: GraphicsContext,
}

impl BufferDc {
    /// Allocate a zeroed buffer.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let pitch = width as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
            pitch,
            pixels: vec![0u8; pitch * height as usize],
            clip: ClipRegion::flat(bounds_of(width, height)),
            gc: GraphicsContext::default(),
        }
    }

    /// Wrap tightly packed native pixels, e.g. a decoded image.
    pub fn from_pixels(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> Result<Self, GuiError> {
        let pitch = width as usize * format.bytes_per_pixel();
        let expected = pitch * height as usize;
        if pixels.len() < expected {
            return Err(GuiError::BufferTooSmall {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            pitch,
            pixels,
            clip: ClipRegion::flat(bounds_of(width, height)),
            gc: GraphicsContext::default(),
        })
    }

    pub fn with_gc(mut self, gc: GraphicsContext) -> Self {
        self.gc = gc;
        self
    }

    /// Restrict drawing to `region`, cut to the buffer bounds.
    pub fn set_clip(&mut self, region: &ClipRegion) {
        self.clip = region.intersect_rect(&self.bounds());
    }

    /// Allow drawing on the whole buffer again.
    pub fn reset_clip(&mut self) {
        self.clip = ClipRegion::flat(self.bounds());
    }

    pub fn clip(&self) -> &ClipRegion {
        &self.clip
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw pixel memory, `pitch` bytes per row.
    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    /// Read back one pixel, `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.bounds().contains_point(x, y) {
            return None;
        }
        Some(Color::read_native(self.format, &self.pixels[self.offset(x, y)..]))
    }

    #[inline]
    fn bounds(&self) -> Rect {
        bounds_of(self.width, self.height)
    }

    /// Byte offset of an in-bounds pixel.
    #[inline]
    fn offset(&self, x: i32, y: i32) -> usize {
        y as usize * self.pitch + x as usize * self.format.bytes_per_pixel()
    }

    fn put(&mut self, color: Color, x: i32, y: i32) {
        if self.clip.contains_point(x, y).is_some() {
            let offset = self.offset(x, y);
            color.write_native(self.format, &mut self.pixels[offset..]);
        }
    }
}

#[inline]
fn bounds_of(width: u32, height: u32) -> Rect {
    let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
    Rect::new(0, 0, clamp(width), clamp(height))
}

impl DeviceContext for BufferDc {
    fn kind(&self) -> DcKind {
        DcKind::Buffer
    }

    fn gc(&self) -> &GraphicsContext {
        &self.gc
    }

    fn gc_mut(&mut self) -> &mut GraphicsContext {
        &mut self.gc
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn rect(&self) -> Rect {
        self.bounds()
    }

    fn origin(&self) -> Point {
        Point::new(0, 0)
    }

    fn bits_per_pixel(&self) -> u8 {
        self.format.bits_per_pixel()
    }

    fn draw_point(&mut self, x: i32, y: i32) {
        self.put(self.gc.foreground, x, y);
    }

    fn draw_color_point(&mut self, x: i32, y: i32, color: Color) {
        self.put(color, x, y);
    }

    fn draw_vline(&mut self, x: i32, y1: i32, y2: i32) {
        let bpp = self.format.bytes_per_pixel();
        let mut pixel = [0u8; 4];
        self.gc.foreground.write_native(self.format, &mut pixel);

        for span in self.clip.clip_vline(x, y1, y2) {
            for y in span.start..span.end {
                let at = y as usize * self.pitch + x as usize * bpp;
                self.pixels[at..at + bpp].copy_from_slice(&pixel[..bpp]);
            }
        }
    }

    fn draw_hline(&mut self, x1: i32, x2: i32, y: i32) {
        let bpp = self.format.bytes_per_pixel();
        let mut pixel = [0u8; 4];
        self.gc.foreground.write_native(self.format, &mut pixel);

        for span in self.clip.clip_hline(x1, x2, y) {
            let start = y as usize * self.pitch + span.start as usize * bpp;
            let end = start + span.len() * bpp;
            for chunk in self.pixels[start..end].chunks_exact_mut(bpp) {
                chunk.copy_from_slice(&pixel[..bpp]);
            }
        }
    }

    fn fill_rect(&mut self, rect: &Rect) {
        fill_rect_by_rows(self, rect);
    }

    fn blit_line(&mut self, x1: i32, x2: i32, y: i32, line: &[u8]) {
        let bpp = self.format.bytes_per_pixel();
        for span in self.clip.clip_hline(x1, x2, y) {
            let Some(src) = span.skipped.checked_mul(bpp).filter(|&s| s < line.len()) else {
                continue;
            };
            let count = (span.len() * bpp).min(line.len() - src);
            let count = count - count % bpp;
            let dst = y as usize * self.pitch + span.start as usize * bpp;
            self.pixels[dst..dst + count].copy_from_slice(&line[src..src + count]);
        }
    }

    fn blit(&mut self, origin: Point, dest: &mut dyn DeviceContext, rect: &Rect) {
        if dest.bits_per_pixel() != self.bits_per_pixel() {
            log::warn!(
                "blit refused: {} bpp buffer into {} bpp {:?} dc",
                self.bits_per_pixel(),
                dest.bits_per_pixel(),
                dest.kind()
            );
            return;
        }

        // Source window, cut to the pixels the buffer holds.
        let window = Rect::new(
            origin.x,
            origin.y,
            origin.x.saturating_add(rect.width()),
            origin.y.saturating_add(rect.height()),
        )
        .intersect(&self.bounds());
        if window.is_empty() {
            return;
        }

        let bpp = self.format.bytes_per_pixel();
        let to_x = rect.x1.saturating_add(window.x1.saturating_sub(origin.x));
        let to_y = rect.y1.saturating_add(window.y1.saturating_sub(origin.y));
        let len = window.width() as usize * bpp;
        for (row, sy) in (window.y1..window.y2).enumerate() {
            let start = self.offset(window.x1, sy);
            let line = &self.pixels[start..start + len];
            dest.blit_line(
                to_x,
                to_x.saturating_add(window.width()),
                to_y.saturating_add(row as i32),
                line,
            );
        }
    }

    fn finalize(&mut self) -> bool {
        self.kind() == DcKind::Buffer
    }
}

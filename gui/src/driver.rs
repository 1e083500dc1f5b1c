//! Display driver operation set.
//!
//! The rasterizer never touches pixel memory itself: every device write
//! goes through [`HardwareOps`]. [`Framebuffer`] is the in-memory
//! implementation used for software rendering and by the test-suite.
//!
//! All spans are half-open (`x1..x2`, `y1..y2`) in device coordinates.

use alloc::vec::Vec;

use crate::color::{bytes_per_pixel, Color, PixelFormat};
use crate::rect::Rect;
use crate::GuiError;

/// Operations a display driver provides.
pub trait HardwareOps {
    /// Screen width in pixels.
    fn width(&self) -> u32;

    /// Screen height in pixels.
    fn height(&self) -> u32;

    /// Bits per pixel of the native encoding.
    fn bits_per_pixel(&self) -> u8;

    /// Bytes per pixel of the native encoding (rounded up).
    fn bytes_per_pixel(&self) -> usize {
        bytes_per_pixel(self.bits_per_pixel())
    }

    /// Write one pixel.
    fn set_pixel(&mut self, color: Color, x: i32, y: i32);

    /// Fill column `x` over rows `y1..y2`.
    fn draw_vline(&mut self, color: Color, x: i32, y1: i32, y2: i32) {
        for y in y1..y2 {
            self.set_pixel(color, x, y);
        }
    }

    /// Fill row `y` over columns `x1..x2`.
    fn draw_hline(&mut self, color: Color, x1: i32, x2: i32, y: i32) {
        for x in x1..x2 {
            self.set_pixel(color, x, y);
        }
    }

    /// Copy native-encoded pixels from `line` into row `y`, columns `x1..x2`.
    ///
    /// `line[0..bytes_per_pixel]` is the pixel for column `x1`.
    fn draw_raw_hline(&mut self, line: &[u8], x1: i32, x2: i32, y: i32);

    /// Push `rect` of the drawn image to the panel. Drivers that write
    /// straight to display memory need nothing here.
    fn update(&mut self, _rect: &Rect) {}
}

/// Linear in-memory framebuffer.
pub struct Framebuffer {
    /// Screen width in pixels
    width: u32,
    /// Screen height in pixels
    height: u32,
    /// Native pixel format
    format: PixelFormat,
    /// Stride (bytes per row)
    stride: usize,
    /// Pixel data
    data: Vec<u8>,
}

impl Framebuffer {
    /// Allocate a zeroed framebuffer.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let stride = width as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
            stride,
            data: alloc::vec![0u8; stride * height as usize],
        }
    }

    /// Wrap existing pixel storage with a given stride.
    pub fn from_raw(
        data: Vec<u8>,
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self, GuiError> {
        let row = width as usize * format.bytes_per_pixel();
        let expected = if height == 0 { 0 } else { stride * (height as usize - 1) + row };
        if stride < row || data.len() < expected {
            return Err(GuiError::BufferTooSmall {
                expected: expected.max(row * height as usize),
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            stride,
            data,
        })
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw pixel memory.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read back one pixel, `None` outside the screen.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let offset = self.offset(x, y)?;
        Some(Color::read_native(self.format, &self.data[offset..]))
    }

    /// Fill the whole screen.
    pub fn clear(&mut self, color: Color) {
        for y in 0..self.height as i32 {
            self.draw_hline(color, 0, self.width as i32, y);
        }
    }

    /// Byte offset of `(x, y)`, `None` outside the screen.
    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.stride + x as usize * self.format.bytes_per_pixel())
    }

    /// Clamp a row span to the screen, returning the byte range and the
    /// number of pixels cut from the left.
    #[inline]
    fn row_span(&self, x1: i32, x2: i32, y: i32) -> Option<(usize, usize, usize)> {
        if y < 0 || y >= self.height as i32 {
            return None;
        }
        let start = x1.max(0);
        let end = x2.min(self.width as i32);
        if start >= end {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let row = y as usize * self.stride;
        Some((
            row + start as usize * bpp,
            row + end as usize * bpp,
            start.abs_diff(x1) as usize,
        ))
    }
}

impl HardwareOps for Framebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn bits_per_pixel(&self) -> u8 {
        self.format.bits_per_pixel()
    }

    fn set_pixel(&mut self, color: Color, x: i32, y: i32) {
        if let Some(offset) = self.offset(x, y) {
            color.write_native(self.format, &mut self.data[offset..]);
        }
    }

    fn draw_vline(&mut self, color: Color, x: i32, y1: i32, y2: i32) {
        for y in y1.max(0)..y2.min(self.height as i32) {
            self.set_pixel(color, x, y);
        }
    }

    fn draw_hline(&mut self, color: Color, x1: i32, x2: i32, y: i32) {
        let Some((start, end, _)) = self.row_span(x1, x2, y) else {
            return;
        };
        let bpp = self.format.bytes_per_pixel();
        let mut pixel = [0u8; 4];
        color.write_native(self.format, &mut pixel);
        for chunk in self.data[start..end].chunks_exact_mut(bpp) {
            chunk.copy_from_slice(&pixel[..bpp]);
        }
    }

    fn draw_raw_hline(&mut self, line: &[u8], x1: i32, x2: i32, y: i32) {
        let Some((start, end, skipped)) = self.row_span(x1, x2, y) else {
            return;
        };
        let bpp = self.format.bytes_per_pixel();
        let Some(src_start) = skipped.checked_mul(bpp).filter(|&s| s < line.len()) else {
            return;
        };
        let count = (end - start).min(line.len() - src_start);
        let count = count - count % bpp;
        self.data[start..start + count].copy_from_slice(&line[src_start..src_start + count]);
    }
}

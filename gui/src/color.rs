//! Colors and native pixel encodings.

use crate::GuiError;

/// A pixel-format independent color, stored as ARGB8888.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    /// Create an opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Create a color from RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Encode into the native pixel value of `format`.
    pub fn to_native(self, format: PixelFormat) -> u32 {
        let (r, g, b) = (self.r() as u32, self.g() as u32, self.b() as u32);
        match format {
            PixelFormat::Gray8 => (r * 77 + g * 150 + b * 29) >> 8,
            PixelFormat::Rgb565 => ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3),
            PixelFormat::Bgr565 => ((b >> 3) << 11) | ((g >> 2) << 5) | (r >> 3),
            PixelFormat::Rgb888 => (r << 16) | (g << 8) | b,
            PixelFormat::Argb8888 => self.0,
        }
    }

    /// Decode a native pixel value of `format`.
    ///
    /// Channels narrower than 8 bits are widened by bit replication, so
    /// encoding a decoded value is lossless.
    pub fn from_native(format: PixelFormat, raw: u32) -> Self {
        match format {
            PixelFormat::Gray8 => {
                let v = raw as u8;
                Color::rgb(v, v, v)
            }
            PixelFormat::Rgb565 | PixelFormat::Bgr565 => {
                let hi = ((raw >> 11) & 0x1F) as u8;
                let g = ((raw >> 5) & 0x3F) as u8;
                let lo = (raw & 0x1F) as u8;
                let (hi, g, lo) = ((hi << 3) | (hi >> 2), (g << 2) | (g >> 4), (lo << 3) | (lo >> 2));
                if format == PixelFormat::Rgb565 {
                    Color::rgb(hi, g, lo)
                } else {
                    Color::rgb(lo, g, hi)
                }
            }
            PixelFormat::Rgb888 => Color(0xFF00_0000 | (raw & 0x00FF_FFFF)),
            PixelFormat::Argb8888 => Color(raw),
        }
    }

    /// Write the native encoding into `out` (little-endian).
    ///
    /// `out` must hold at least `format.bytes_per_pixel()` bytes.
    #[inline]
    pub fn write_native(self, format: PixelFormat, out: &mut [u8]) {
        let raw = self.to_native(format).to_le_bytes();
        let bpp = format.bytes_per_pixel();
        out[..bpp].copy_from_slice(&raw[..bpp]);
    }

    /// Read a native little-endian encoding from `bytes`.
    #[inline]
    pub fn read_native(format: PixelFormat, bytes: &[u8]) -> Self {
        let mut raw = [0u8; 4];
        let bpp = format.bytes_per_pixel();
        raw[..bpp].copy_from_slice(&bytes[..bpp]);
        Color::from_native(format, u32::from_le_bytes(raw))
    }
}

/// Native pixel formats a driver may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit grayscale.
    Gray8,
    /// 16-bit RGB565.
    Rgb565,
    /// 16-bit BGR565.
    Bgr565,
    /// 24-bit RGB.
    Rgb888,
    /// 32-bit ARGB.
    Argb8888,
}

impl PixelFormat {
    /// Get bits per pixel.
    pub fn bits_per_pixel(&self) -> u8 {
        match self {
            PixelFormat::Gray8 => 8,
            PixelFormat::Rgb565 | PixelFormat::Bgr565 => 16,
            PixelFormat::Rgb888 => 24,
            PixelFormat::Argb8888 => 32,
        }
    }

    /// Get bytes per pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        bytes_per_pixel(self.bits_per_pixel())
    }

    /// Pick the default format for a bit depth.
    pub fn from_bits_per_pixel(bpp: u8) -> Result<Self, GuiError> {
        match bpp {
            8 => Ok(PixelFormat::Gray8),
            16 => Ok(PixelFormat::Rgb565),
            24 => Ok(PixelFormat::Rgb888),
            32 => Ok(PixelFormat::Argb8888),
            other => Err(GuiError::UnsupportedDepth(other)),
        }
    }
}

/// Bytes needed to hold one pixel of `bits_per_pixel` bits.
#[inline]
pub const fn bytes_per_pixel(bits_per_pixel: u8) -> usize {
    (bits_per_pixel as usize + 7) / 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_components() {
        let c = Color::rgb(0x12, 0x34, 0x56);
        assert_eq!(c.r(), 0x12);
        assert_eq!(c.g(), 0x34);
        assert_eq!(c.b(), 0x56);
        assert_eq!(c.a(), 0xFF);
    }

    #[test]
    fn test_rgb565_encoding() {
        assert_eq!(Color::RED.to_native(PixelFormat::Rgb565), 0xF800);
        assert_eq!(Color::GREEN.to_native(PixelFormat::Rgb565), 0x07E0);
        assert_eq!(Color::BLUE.to_native(PixelFormat::Bgr565), 0xF800);
        assert_eq!(Color::from_native(PixelFormat::Rgb565, 0xF800), Color::RED);
        assert_eq!(Color::from_native(PixelFormat::Rgb565, 0xFFFF), Color::WHITE);
    }

    #[test]
    fn test_native_bytes() {
        let mut out = [0u8; 4];
        Color::rgb(1, 2, 3).write_native(PixelFormat::Rgb888, &mut out);
        assert_eq!(out, [3, 2, 1, 0]);
        assert_eq!(Color::read_native(PixelFormat::Rgb888, &out), Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(bytes_per_pixel(1), 1);
        assert_eq!(bytes_per_pixel(16), 2);
        assert_eq!(bytes_per_pixel(24), 3);
        assert_eq!(PixelFormat::Argb8888.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::from_bits_per_pixel(15), Err(GuiError::UnsupportedDepth(15)));
    }
}

//! Rendering core configuration.
//!
//! Compile-time defaults plus the runtime display description used to
//! build a framebuffer driver and the default graphics context.

use crate::color::{Color, PixelFormat};
use crate::driver::Framebuffer;
use crate::gc::{GraphicsContext, TextAlign, TextStyle};
use crate::GuiError;

/// Default screen width in pixels.
pub const DEFAULT_SCREEN_WIDTH: u32 = 320;

/// Default screen height in pixels.
pub const DEFAULT_SCREEN_HEIGHT: u32 = 240;

/// Default native pixel format (16-bit panels are the common case).
pub const DEFAULT_PIXEL_FORMAT: PixelFormat = PixelFormat::Rgb565;

/// Default foreground color.
pub const DEFAULT_FOREGROUND: Color = Color::BLACK;

/// Default background color.
pub const DEFAULT_BACKGROUND: Color = Color::rgb(212, 208, 200);

/// Widest glyph a bitmap font may declare.
pub const MAX_GLYPH_WIDTH: u32 = 64;

/// Tallest glyph a bitmap font may declare.
pub const MAX_GLYPH_HEIGHT: u32 = 64;

/// Light edge color for raised/sunken borders.
pub const BORDER_LIGHT: Color = Color::WHITE;

/// Dark edge color for raised/sunken borders.
pub const BORDER_DARK: Color = Color::rgb(128, 128, 128);

/// Display configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Screen width
    pub width: u32,
    /// Screen height
    pub height: u32,
    /// Native pixel format of the panel
    pub format: PixelFormat,
    /// Foreground color new graphics contexts start with
    pub foreground: Color,
    /// Background color new graphics contexts start with
    pub background: Color,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
            format: DEFAULT_PIXEL_FORMAT,
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl DisplayConfig {
    /// Describe a panel by size and bit depth.
    pub fn with_depth(width: u32, height: u32, bits_per_pixel: u8) -> Result<Self, GuiError> {
        Ok(Self {
            width,
            height,
            format: PixelFormat::from_bits_per_pixel(bits_per_pixel)?,
            ..Self::default()
        })
    }

    /// Allocate a framebuffer driver for this display.
    pub fn framebuffer(&self) -> Framebuffer {
        Framebuffer::new(self.width, self.height, self.format)
    }

    /// Graphics context seeded with this display's default colors.
    pub fn default_gc(&self) -> GraphicsContext {
        GraphicsContext {
            foreground: self.foreground,
            background: self.background,
            font: None,
            text_align: TextAlign::LEFT | TextAlign::TOP,
            text_style: TextStyle::empty(),
        }
    }
}

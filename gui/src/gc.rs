//! Graphics context.

use core::fmt;

use crate::color::Color;
use crate::config::{DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
use crate::font::{Font, FontRef};

bitflags::bitflags! {
    /// Text alignment inside the target rectangle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextAlign: u8 {
        const LEFT = 0x00;
        const TOP = 0x00;
        const RIGHT = 0x01;
        const BOTTOM = 0x02;
        const CENTER_HORIZONTAL = 0x04;
        const CENTER_VERTICAL = 0x08;
        const CENTER = Self::CENTER_HORIZONTAL.bits() | Self::CENTER_VERTICAL.bits();
    }
}

bitflags::bitflags! {
    /// Text rendering style.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextStyle: u8 {
        /// Paint clear glyph bits with the background color.
        const DRAW_BACKGROUND = 0x01;
    }
}

/// Colors, font and text settings a DC draws with.
#[derive(Clone)]
pub struct GraphicsContext {
    /// Color of points, lines and glyph bits
    pub foreground: Color,
    /// Color of filled rectangles and glyph backgrounds
    pub background: Color,
    /// Active font, if any
    pub font: Option<FontRef>,
    /// Alignment applied by text layout
    pub text_align: TextAlign,
    /// Text style flags
    pub text_style: TextStyle,
}

impl GraphicsContext {
    pub fn new(foreground: Color, background: Color) -> Self {
        Self {
            foreground,
            background,
            ..Self::default()
        }
    }

    pub fn with_font(mut self, font: FontRef) -> Self {
        self.font = Some(font);
        self
    }
}

impl Default for GraphicsContext {
    fn default() -> Self {
        Self {
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
            font: None,
            text_align: TextAlign::LEFT | TextAlign::TOP,
            text_style: TextStyle::empty(),
        }
    }
}

impl fmt::Debug for GraphicsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicsContext")
            .field("foreground", &self.foreground)
            .field("background", &self.background)
            .field("font", &self.font.as_ref().map(|font| font.family()))
            .field("text_align", &self.text_align)
            .field("text_style", &self.text_style)
            .finish()
    }
}

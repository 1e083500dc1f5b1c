//! KPIO GUI Rendering Core
//!
//! This crate turns the logical drawing requests issued by widgets into
//! pixel operations on a display driver, keeping every widget inside its
//! currently visible screen area.
//!
//! # Architecture
//!
//! The rendering core is organized into:
//!
//! - `driver`: The hardware operation set and an in-memory framebuffer
//! - `region`: Clip regions (flat or disjoint rectangle lists)
//! - `clip`: Per-primitive span clipping against a clip region
//! - `widget`: The widget arena a client DC resolves its owner through
//! - `dc`: Device contexts (hardware, client, offscreen buffer)
//! - `font`: Bitmap fonts, text layout and the font registry
//!
//! A drawing session is opened with [`dc::begin_drawing`], which hands out a
//! [`dc::ClientDc`] bound to one widget. Every primitive issued through it
//! is translated from widget-local to device coordinates, clipped against
//! the widget's clip region, and forwarded to the driver.

#![no_std]

extern crate alloc;

pub mod clip;
pub mod color;
pub mod config;
pub mod dc;
pub mod driver;
pub mod font;
pub mod gc;
pub mod rect;
pub mod region;
pub mod widget;

#[cfg(test)]
mod testing;

use alloc::string::String;
use core::fmt;

pub use color::{Color, PixelFormat};
pub use dc::{
    begin_drawing, end_drawing, BorderStyle, BufferDc, ClientDc, DcExt, DcKind, DeviceContext,
    HardwareDc,
};
pub use driver::{Framebuffer, HardwareOps};
pub use font::{font_refer, register_font, unregister_font, BitmapFont, Font, FontRef};
pub use gc::{GraphicsContext, TextAlign, TextStyle};
pub use rect::{Point, Rect};
pub use region::ClipRegion;
pub use widget::{Widget, WidgetArena, WidgetFlags, WidgetId};

/// GUI error types.
///
/// Drawing primitives never fail; errors are only reported when building
/// the objects they operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuiError {
    /// Rectangle with `x1 > x2` or `y1 > y2`.
    InvalidRect,
    /// Two rectangles of a clip list overlap.
    OverlappingClipRects,
    /// Font data does not match its declared geometry.
    InvalidFont(String),
    /// Pixel storage is smaller than the surface geometry requires.
    BufferTooSmall {
        /// Bytes required.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
    /// No pixel format for this bit depth.
    UnsupportedDepth(u8),
}

impl fmt::Display for GuiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuiError::InvalidRect => write!(f, "invalid rectangle"),
            GuiError::OverlappingClipRects => write!(f, "clip rectangles overlap"),
            GuiError::InvalidFont(reason) => write!(f, "invalid font: {}", reason),
            GuiError::BufferTooSmall { expected, actual } => {
                write!(f, "buffer too small: need {} bytes, got {}", expected, actual)
            }
            GuiError::UnsupportedDepth(bpp) => write!(f, "unsupported depth: {} bpp", bpp),
        }
    }
}

//! Bitmap fonts.
//!
//! Glyphs are 1-bit images, MSB first, each row padded to whole bytes.
//! A fixed-pitch font stores every glyph at the same size back to back; a
//! variable-pitch font carries a width per glyph and either the glyph
//! offsets derived from it or an explicit offset table.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::config::{MAX_GLYPH_HEIGHT, MAX_GLYPH_WIDTH};
use crate::font::{Font, Glyph};
use crate::GuiError;

/// Bytes per glyph row for a glyph `width` pixels wide.
#[inline]
const fn row_bytes(width: u32) -> usize {
    ((width + 7) / 8) as usize
}

/// A font of 1-bit glyphs covering the characters `first..=last`.
#[derive(Debug, Clone)]
pub struct BitmapFont {
    family: String,
    first: u32,
    last: u32,
    /// Glyph width (fixed pitch) or widest glyph (variable pitch).
    width: u32,
    height: u32,
    bitmap: Vec<u8>,
    /// Per-glyph widths, variable pitch only.
    widths: Option<Vec<u8>>,
    /// Byte offset of each glyph in `bitmap`.
    offsets: Vec<usize>,
}

impl BitmapFont {
    /// Create a fixed-pitch font: every glyph is `width` x `height`.
    pub fn fixed(
        family: &str,
        first: char,
        last: char,
        width: u32,
        height: u32,
        bitmap: Vec<u8>,
    ) -> Result<Self, GuiError> {
        let count = glyph_count(first, last)?;
        check_size(width, height)?;

        let glyph_bytes = row_bytes(width) * height as usize;
        let offsets: Vec<usize> = (0..count).map(|i| i * glyph_bytes).collect();
        check_length(count * glyph_bytes, bitmap.len())?;

        Ok(Self {
            family: family.to_string(),
            first: first as u32,
            last: last as u32,
            width,
            height,
            bitmap,
            widths: None,
            offsets,
        })
    }

    /// Create a variable-pitch font with one width per character.
    ///
    /// Glyphs are stored back to back in character order.
    pub fn variable(
        family: &str,
        first: char,
        last: char,
        height: u32,
        widths: Vec<u8>,
        bitmap: Vec<u8>,
    ) -> Result<Self, GuiError> {
        let mut offsets = Vec::with_capacity(widths.len());
        let mut total = 0usize;
        for w in &widths {
            offsets.push(total);
            total = total.saturating_add(row_bytes(*w as u32).saturating_mul(height as usize));
        }
        Self::with_offsets(family, first, last, height, widths, offsets, bitmap)
    }

    /// Create a variable-pitch font from an explicit glyph offset table.
    ///
    /// `offsets[i]` is the byte offset of glyph `i` in `bitmap`. Glyphs may
    /// appear in any order and share or skip bytes, but every glyph must
    /// lie inside `bitmap`.
    pub fn with_offsets(
        family: &str,
        first: char,
        last: char,
        height: u32,
        widths: Vec<u8>,
        offsets: Vec<usize>,
        bitmap: Vec<u8>,
    ) -> Result<Self, GuiError> {
        let count = glyph_count(first, last)?;
        if widths.len() != count || offsets.len() != count {
            return Err(GuiError::InvalidFont(format!(
                "{} widths and {} offsets for {} glyphs",
                widths.len(),
                offsets.len(),
                count
            )));
        }
        let width = widths.iter().copied().max().unwrap_or(0) as u32;
        check_size(width.max(1), height)?;

        for (index, (&offset, &w)) in offsets.iter().zip(&widths).enumerate() {
            let end = row_bytes(w as u32)
                .checked_mul(height as usize)
                .and_then(|size| offset.checked_add(size));
            match end {
                Some(end) => check_length(end, bitmap.len())?,
                None => {
                    return Err(GuiError::InvalidFont(format!(
                        "glyph {} offset {} out of range",
                        index, offset
                    )))
                }
            }
        }

        Ok(Self {
            family: family.to_string(),
            first: first as u32,
            last: last as u32,
            width,
            height,
            bitmap,
            widths: Some(widths),
            offsets,
        })
    }

    /// Whether glyphs have individual widths.
    pub fn is_variable_pitch(&self) -> bool {
        self.widths.is_some()
    }

    /// Index of `ch` in the glyph table.
    #[inline]
    fn index(&self, ch: char) -> Option<usize> {
        let code = ch as u32;
        if code < self.first || code > self.last {
            return None;
        }
        Some((code - self.first) as usize)
    }

    /// Width of glyph `index`. Drawing and measuring both read this.
    #[inline]
    fn glyph_width(&self, index: usize) -> u32 {
        match &self.widths {
            Some(widths) => widths[index] as u32,
            None => self.width,
        }
    }
}

impl Font for BitmapFont {
    fn family(&self) -> &str {
        &self.family
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn glyph(&self, ch: char) -> Option<Glyph<'_>> {
        let index = self.index(ch)?;
        let width = self.glyph_width(index);
        let stride = row_bytes(width);
        let start = self.offsets[index];
        let bitmap = self.bitmap.get(start..start + stride * self.height as usize)?;
        Some(Glyph {
            width,
            height: self.height,
            stride,
            advance: width,
            bitmap,
        })
    }

    fn advance(&self, ch: char) -> u32 {
        self.index(ch).map_or(0, |index| self.glyph_width(index))
    }
}

fn glyph_count(first: char, last: char) -> Result<usize, GuiError> {
    if first > last {
        return Err(GuiError::InvalidFont(format!(
            "empty character range {:?}..={:?}",
            first, last
        )));
    }
    Ok((last as u32 - first as u32 + 1) as usize)
}

fn check_size(width: u32, height: u32) -> Result<(), GuiError> {
    if width == 0 || width > MAX_GLYPH_WIDTH || height == 0 || height > MAX_GLYPH_HEIGHT {
        return Err(GuiError::InvalidFont(format!(
            "glyph size {}x{} outside 1x1..{}x{}",
            width, height, MAX_GLYPH_WIDTH, MAX_GLYPH_HEIGHT
        )));
    }
    Ok(())
}

fn check_length(expected: usize, actual: usize) -> Result<(), GuiError> {
    if actual < expected {
        return Err(GuiError::InvalidFont(format!(
            "bitmap holds {} bytes, glyphs need {}",
            actual, expected
        )));
    }
    Ok(())
}

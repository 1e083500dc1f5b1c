//! Test support: a driver that records every call it receives.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::color::Color;
use crate::driver::HardwareOps;
use crate::rect::Rect;

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Pixel { color: Color, x: i32, y: i32 },
    VLine { color: Color, x: i32, y1: i32, y2: i32 },
    HLine { color: Color, x1: i32, x2: i32, y: i32 },
    RawHLine { x1: i32, x2: i32, y: i32, data: Vec<u8> },
    Update { rect: Rect },
}

pub struct RecordingDriver {
    pub width: u32,
    pub height: u32,
    pub bpp: u8,
    pub ops: Vec<Op>,
}

impl RecordingDriver {
    pub fn new(width: u32, height: u32, bpp: u8) -> Self {
        Self {
            width,
            height,
            bpp,
            ops: Vec::new(),
        }
    }

    /// Every device pixel touched by a drawing call.
    pub fn written_pixels(&self) -> BTreeSet<(i32, i32)> {
        let mut pixels = BTreeSet::new();
        for op in &self.ops {
            match op {
                Op::Pixel { x, y, .. } => {
                    pixels.insert((*x, *y));
                }
                Op::VLine { x, y1, y2, .. } => pixels.extend((*y1..*y2).map(|y| (*x, y))),
                Op::HLine { x1, x2, y, .. } => pixels.extend((*x1..*x2).map(|x| (x, *y))),
                Op::RawHLine { x1, x2, y, .. } => pixels.extend((*x1..*x2).map(|x| (x, *y))),
                Op::Update { .. } => {}
            }
        }
        pixels
    }

    /// Color of the last solid write covering `(x, y)`.
    pub fn color_at(&self, px: i32, py: i32) -> Option<Color> {
        self.ops.iter().rev().find_map(|op| match *op {
            Op::Pixel { color, x, y } if x == px && y == py => Some(color),
            Op::VLine { color, x, y1, y2 } if x == px && (y1..y2).contains(&py) => Some(color),
            Op::HLine { color, x1, x2, y } if y == py && (x1..x2).contains(&px) => Some(color),
            _ => None,
        })
    }
}

impl HardwareOps for RecordingDriver {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn bits_per_pixel(&self) -> u8 {
        self.bpp
    }

    fn set_pixel(&mut self, color: Color, x: i32, y: i32) {
        self.ops.push(Op::Pixel { color, x, y });
    }

    fn draw_vline(&mut self, color: Color, x: i32, y1: i32, y2: i32) {
        self.ops.push(Op::VLine { color, x, y1, y2 });
    }

    fn draw_hline(&mut self, color: Color, x1: i32, x2: i32, y: i32) {
        self.ops.push(Op::HLine { color, x1, x2, y });
    }

    fn draw_raw_hline(&mut self, line: &[u8], x1: i32, x2: i32, y: i32) {
        let width = (i64::from(x2) - i64::from(x1)).max(0) as usize;
        let len = width.saturating_mul(self.bytes_per_pixel()).min(line.len());
        self.ops.push(Op::RawHLine {
            x1,
            x2,
            y,
            data: line[..len].to_vec(),
        });
    }

    fn update(&mut self, rect: &Rect) {
        self.ops.push(Op::Update { rect: *rect });
    }
}

//! Hardware device context.
//!
//! Represents the whole screen: logical and device coordinates coincide and
//! calls go straight to the driver without clipping.

use crate::clip::normalize;
use crate::color::Color;
use crate::dc::{fill_rect_by_rows, DcKind, DeviceContext};
use crate::driver::HardwareOps;
use crate::gc::GraphicsContext;
use crate::rect::{Point, Rect};

/// Device context over the whole display.
pub struct HardwareDc<'a> {
    driver: &'a mut dyn HardwareOps,
    gc: GraphicsContext,
}

impl<'a> HardwareDc<'a> {
    pub fn new(driver: &'a mut dyn HardwareOps, gc: GraphicsContext) -> Self {
        Self { driver, gc }
    }
}

impl<'a> DeviceContext for HardwareDc<'a> {
    fn kind(&self) -> DcKind {
        DcKind::Hardware
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
        Rect::new(0, 0, self.driver.width() as i32, self.driver.height() as i32)
    }

    fn origin(&self) -> Point {
        Point::new(0, 0)
    }

    fn bits_per_pixel(&self) -> u8 {
        self.driver.bits_per_pixel()
    }

    fn draw_point(&mut self, x: i32, y: i32) {
        self.driver.set_pixel(self.gc.foreground, x, y);
    }

    fn draw_color_point(&mut self, x: i32, y: i32, color: Color) {
        self.driver.set_pixel(color, x, y);
    }

    fn draw_vline(&mut self, x: i32, y1: i32, y2: i32) {
        let (y1, y2) = normalize(y1, y2);
        if y1 < y2 {
            self.driver.draw_vline(self.gc.foreground, x, y1, y2);
        }
    }

    fn draw_hline(&mut self, x1: i32, x2: i32, y: i32) {
        let (x1, x2) = normalize(x1, x2);
        if x1 < x2 {
            self.driver.draw_hline(self.gc.foreground, x1, x2, y);
        }
    }

    fn fill_rect(&mut self, rect: &Rect) {
        fill_rect_by_rows(self, rect);
    }

    fn blit_line(&mut self, x1: i32, x2: i32, y: i32, line: &[u8]) {
        let (x1, x2) = normalize(x1, x2);
        if x1 < x2 {
            self.driver.draw_raw_hline(line, x1, x2, y);
        }
    }

    fn blit(&mut self, _origin: Point, _dest: &mut dyn DeviceContext, _rect: &Rect) {
        // Screen contents are not read back.
        log::trace!("blit from hardware dc ignored");
    }

    fn finalize(&mut self) -> bool {
        self.kind() == DcKind::Hardware
    }
}

//! Client device context.
//!
//! A client DC is a view onto one widget. It owns no pixels and caches
//! nothing: every call looks the owner up in the widget arena, translates
//! the logical coordinates by the owner's extent origin, clips the result
//! against the owner's clip region (already in device coordinates), and
//! forwards one driver call per clip rectangle hit.

use crate::clip::normalize;
use crate::color::Color;
use crate::dc::{fill_rect_by_rows, DcKind, DeviceContext};
use crate::driver::HardwareOps;
use crate::gc::GraphicsContext;
use crate::rect::{Point, Rect};
use crate::widget::{Widget, WidgetArena, WidgetId};

/// Device context bound to a widget.
pub struct ClientDc<'a> {
    arena: &'a mut WidgetArena,
    owner: WidgetId,
    driver: &'a mut dyn HardwareOps,
}

impl<'a> ClientDc<'a> {
    /// Bind a DC to `owner`.
    ///
    /// Fails when the widget is unknown or has no top-level container.
    pub fn create(
        arena: &'a mut WidgetArena,
        owner: WidgetId,
        driver: &'a mut dyn HardwareOps,
    ) -> Option<Self> {
        match arena.get(owner) {
            Some(widget) if widget.toplevel.is_some() => Some(Self { arena, owner, driver }),
            Some(_) => {
                log::debug!("client dc refused: widget {:?} is not attached", owner);
                None
            }
            None => {
                log::debug!("client dc refused: no widget {:?}", owner);
                None
            }
        }
    }

    /// Id of the widget this DC draws on.
    pub fn owner_id(&self) -> WidgetId {
        self.owner
    }

    /// The owning widget.
    pub fn owner(&self) -> &Widget {
        &self.arena[self.owner]
    }

    /// Resolve the owner and the driver for one primitive.
    #[inline]
    fn resolve(&mut self) -> (&Widget, &mut (dyn HardwareOps + 'a)) {
        (&self.arena[self.owner], &mut *self.driver)
    }

    /// Push the visible part of the owner to the panel.
    pub(crate) fn update_display(&mut self) {
        let (owner, driver) = self.resolve();
        let visible = owner.clip.extents().intersect(&owner.extent);
        if !visible.is_empty() {
            driver.update(&visible);
        }
    }
}

impl<'a> DeviceContext for ClientDc<'a> {
    fn kind(&self) -> DcKind {
        DcKind::Client
    }

    fn gc(&self) -> &GraphicsContext {
        &self.owner().gc
    }

    fn gc_mut(&mut self) -> &mut GraphicsContext {
        &mut self.arena[self.owner].gc
    }

    fn is_visible(&self) -> bool {
        self.owner().is_dc_visible()
    }

    fn rect(&self) -> Rect {
        self.owner().logical_rect()
    }

    fn origin(&self) -> Point {
        let extent = self.owner().extent;
        Point::new(extent.x1, extent.y1)
    }

    fn bits_per_pixel(&self) -> u8 {
        self.driver.bits_per_pixel()
    }

    fn draw_point(&mut self, x: i32, y: i32) {
        let (owner, driver) = self.resolve();
        if !owner.is_dc_visible() {
            return;
        }
        let (x, y) = device(owner, x, y);
        if owner.clip.contains_point(x, y).is_some() {
            driver.set_pixel(owner.gc.foreground, x, y);
        }
    }

    fn draw_color_point(&mut self, x: i32, y: i32, color: Color) {
        let (owner, driver) = self.resolve();
        if !owner.is_dc_visible() {
            return;
        }
        let (x, y) = device(owner, x, y);
        if owner.clip.contains_point(x, y).is_some() {
            driver.set_pixel(color, x, y);
        }
    }

    fn draw_vline(&mut self, x: i32, y1: i32, y2: i32) {
        let (owner, driver) = self.resolve();
        if !owner.is_dc_visible() {
            return;
        }
        let (x, y1) = device(owner, x, y1);
        let y2 = y2.saturating_add(owner.extent.y1);
        let color = owner.gc.foreground;
        for span in owner.clip.clip_vline(x, y1, y2) {
            driver.draw_vline(color, x, span.start, span.end);
        }
    }

    fn draw_hline(&mut self, x1: i32, x2: i32, y: i32) {
        let (owner, driver) = self.resolve();
        if !owner.is_dc_visible() {
            return;
        }
        let (x1, y) = device(owner, x1, y);
        let x2 = x2.saturating_add(owner.extent.x1);
        let color = owner.gc.foreground;
        for span in owner.clip.clip_hline(x1, x2, y) {
            driver.draw_hline(color, span.start, span.end, y);
        }
    }

    fn fill_rect(&mut self, rect: &Rect) {
        fill_rect_by_rows(self, rect);
    }

    fn blit_line(&mut self, x1: i32, x2: i32, y: i32, line: &[u8]) {
        let (owner, driver) = self.resolve();
        if !owner.is_dc_visible() {
            return;
        }
        let bpp = driver.bytes_per_pixel();
        if bpp == 0 {
            return;
        }
        let (x1, y) = device(owner, x1, y);
        let (x1, x2) = normalize(x1, x2.saturating_add(owner.extent.x1));

        for span in owner.clip.clip_hline(x1, x2, y) {
            let Some(offset) = span.skipped.checked_mul(bpp).filter(|&o| o < line.len()) else {
                continue;
            };
            // Never hand the driver more columns than the source holds.
            let available = i32::try_from((line.len() - offset) / bpp).unwrap_or(i32::MAX);
            let end = span.end.min(span.start.saturating_add(available));
            if end > span.start {
                driver.draw_raw_hline(&line[offset..], span.start, end, y);
            }
        }
    }

    fn blit(&mut self, _origin: Point, _dest: &mut dyn DeviceContext, _rect: &Rect) {
        // Client surfaces are composed while drawing, never copied.
        log::trace!("blit from client dc of widget {:?} ignored", self.owner);
    }

    fn finalize(&mut self) -> bool {
        if self.kind() != DcKind::Client || self.arena.get(self.owner).is_none() {
            log::warn!("finalize on invalid client dc {:?}", self.owner);
            return false;
        }
        true
    }
}

/// Logical to device coordinates of `owner`, saturating at the `i32` range.
#[inline]
fn device(owner: &Widget, x: i32, y: i32) -> (i32, i32) {
    (x.saturating_add(owner.extent.x1), y.saturating_add(owner.extent.y1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dc::{begin_drawing, end_drawing, DcExt};
    use crate::driver::Framebuffer;
    use crate::region::ClipRegion;
    use crate::testing::{Op, RecordingDriver};
    use crate::widget::WidgetFlags;
    use crate::PixelFormat;
    use alloc::collections::BTreeSet;
    use alloc::vec;
    use alloc::vec::Vec;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const FG: Color = Color::RED;
    const BG: Color = Color::BLUE;

    fn arena_with(extent: Rect, clip: ClipRegion) -> (WidgetArena, WidgetId) {
        let mut arena = WidgetArena::new();
        let win = arena.insert_toplevel(Widget::new(Rect::new(0, 0, 320, 240)));
        let id = arena.insert_child(
            win,
            Widget::new(extent)
                .with_clip(clip)
                .with_gc(GraphicsContext::new(FG, BG)),
        );
        (arena, id)
    }

    #[test]
    fn test_unattached_widget_has_no_dc() {
        let mut arena = WidgetArena::new();
        let orphan = arena.insert(Widget::new(Rect::new(0, 0, 10, 10)));
        let mut driver = RecordingDriver::new(100, 100, 16);
        assert!(begin_drawing(&mut arena, orphan, &mut driver).is_none());
        assert!(begin_drawing(&mut arena, WidgetId(42), &mut driver).is_none());
    }

    #[test]
    fn test_point_at_origin_maps_to_extent() {
        let (mut arena, id) = arena_with(Rect::new(37, 12, 80, 40), ClipRegion::flat(Rect::new(0, 0, 320, 240)));
        let mut driver = RecordingDriver::new(320, 240, 16);
        let mut dc = begin_drawing(&mut arena, id, &mut driver).unwrap();
        dc.draw_point(0, 0);
        dc.draw_color_point(2, 3, Color::GREEN);
        assert_eq!(dc.logic_to_device(Point::new(1, 1)), Point::new(38, 13));
        assert!(end_drawing(dc, false));
        assert_eq!(
            driver.ops,
            vec![
                Op::Pixel { color: FG, x: 37, y: 12 },
                Op::Pixel { color: Color::GREEN, x: 39, y: 15 },
            ]
        );
    }

    #[test]
    fn test_hline_clipped_to_flat_region() {
        let (mut arena, id) = arena_with(Rect::new(10, 10, 110, 60), ClipRegion::flat(Rect::new(10, 10, 60, 60)));
        let mut driver = RecordingDriver::new(320, 240, 16);
        let mut dc = begin_drawing(&mut arena, id, &mut driver).unwrap();
        dc.draw_hline(0, 200, 5);
        drop(dc);
        assert_eq!(driver.ops, vec![Op::HLine { color: FG, x1: 10, x2: 60, y: 15 }]);
        assert!(driver.written_pixels().iter().all(|&(x, _)| x < 60));
    }

    #[test]
    fn test_extreme_coordinates_clamp_to_clip() {
        let (mut arena, id) = arena_with(Rect::new(10, 10, 110, 60), ClipRegion::flat(Rect::new(0, 0, 320, 240)));
        let mut driver = RecordingDriver::new(320, 240, 16);
        let mut dc = begin_drawing(&mut arena, id, &mut driver).unwrap();
        dc.draw_hline(i32::MIN, 10, 5);
        dc.draw_hline(0, i32::MAX, 5);
        dc.draw_vline(3, i32::MAX, i32::MIN);
        dc.draw_point(i32::MAX, i32::MAX);
        dc.draw_color_point(i32::MIN, i32::MIN, BG);
        dc.blit_line(i32::MIN, i32::MAX, 0, &[0; 8]);
        dc.fill_rect(&Rect::new(i32::MIN, 0, i32::MAX, 1));
        drop(dc);

        assert_eq!(
            driver.ops,
            vec![
                Op::HLine { color: FG, x1: 0, x2: 20, y: 15 },
                Op::HLine { color: FG, x1: 10, x2: 320, y: 15 },
                Op::VLine { color: FG, x: 13, y1: 0, y2: 240 },
                Op::HLine { color: BG, x1: 0, x2: 320, y: 10 },
            ]
        );
    }

    #[test]
    fn test_vline_split_by_list_region() {
        let clip = ClipRegion::from_rects(&[Rect::new(0, 0, 50, 20), Rect::new(0, 30, 50, 50)]).unwrap();
        let (mut arena, id) = arena_with(Rect::new(0, 0, 50, 50), clip);
        let mut driver = RecordingDriver::new(320, 240, 16);
        let mut dc = begin_drawing(&mut arena, id, &mut driver).unwrap();
        dc.draw_vline(5, 45, 10);
        drop(dc);
        assert_eq!(
            driver.ops,
            vec![
                Op::VLine { color: FG, x: 5, y1: 10, y2: 20 },
                Op::VLine { color: FG, x: 5, y1: 30, y2: 45 },
            ]
        );
    }

    #[test]
    fn test_invisible_widget_draws_nothing() {
        let (mut arena, id) = arena_with(Rect::new(0, 0, 50, 50), ClipRegion::flat(Rect::new(0, 0, 50, 50)));
        arena[id].flags.remove(WidgetFlags::DC_VISIBLE);
        let mut driver = RecordingDriver::new(320, 240, 16);
        let mut dc = begin_drawing(&mut arena, id, &mut driver).unwrap();
        dc.draw_point(1, 1);
        dc.draw_color_point(1, 1, FG);
        dc.draw_hline(0, 10, 1);
        dc.draw_vline(1, 0, 10);
        dc.fill_rect(&Rect::new(0, 0, 10, 10));
        dc.blit_line(0, 2, 0, &[0; 4]);
        assert!(end_drawing(dc, true));
        assert!(driver.ops.is_empty());
    }

    #[test]
    fn test_fill_rect_matches_background_hlines() {
        let clip = ClipRegion::from_rects(&[Rect::new(5, 5, 20, 12), Rect::new(25, 0, 40, 30)]).unwrap();
        let rect = Rect::new(-3, 2, 35, 9);

        let (mut arena, id) = arena_with(Rect::new(3, 1, 60, 40), clip.clone());
        let mut filled = RecordingDriver::new(320, 240, 16);
        let mut dc = begin_drawing(&mut arena, id, &mut filled).unwrap();
        dc.fill_rect(&rect);
        assert_eq!(dc.gc().foreground, FG);
        drop(dc);

        let (mut arena, id) = arena_with(Rect::new(3, 1, 60, 40), clip);
        arena[id].gc.foreground = BG;
        let mut lined = RecordingDriver::new(320, 240, 16);
        let mut dc = begin_drawing(&mut arena, id, &mut lined).unwrap();
        for y in rect.y1..rect.y2 {
            dc.draw_hline(rect.x1, rect.x2, y);
        }
        drop(dc);

        assert!(!filled.ops.is_empty());
        assert_eq!(filled.ops, lined.ops);
    }

    #[test]
    fn test_blit_line_advances_source_by_trimmed_pixels() {
        // 16 bpp: two bytes per pixel, pixel i holds [i, i]
        let line: Vec<u8> = (0..40u8).flat_map(|i| [i, i]).collect();
        let (mut arena, id) = arena_with(Rect::new(10, 10, 110, 60), ClipRegion::flat(Rect::new(17, 10, 30, 60)));
        let mut driver = RecordingDriver::new(320, 240, 16);
        let mut dc = begin_drawing(&mut arena, id, &mut driver).unwrap();
        dc.blit_line(0, 40, 0, &line);
        drop(dc);

        // 7 pixels trimmed on the left
        let Op::RawHLine { x1, x2, y, data } = &driver.ops[0] else {
            panic!("expected a raw hline, got {:?}", driver.ops);
        };
        assert_eq!((*x1, *x2, *y), (17, 30, 10));
        assert_eq!(data[0], 7);
        assert_eq!(data.len(), 13 * 2);
    }

    #[test]
    fn test_blit_line_offsets_per_list_rect() {
        let line: Vec<u8> = (0..30u8).collect();
        let clip = ClipRegion::from_rects(&[Rect::new(20, 0, 25, 10), Rect::new(3, 0, 6, 10)]).unwrap();
        let (mut arena, id) = arena_with(Rect::new(0, 0, 30, 10), clip);
        let mut driver = RecordingDriver::new(320, 240, 8);
        let mut dc = begin_drawing(&mut arena, id, &mut driver).unwrap();
        dc.blit_line(0, 30, 4, &line);
        drop(dc);
        assert_eq!(
            driver.ops,
            vec![
                Op::RawHLine { x1: 20, x2: 25, y: 4, data: vec![20, 21, 22, 23, 24] },
                Op::RawHLine { x1: 3, x2: 6, y: 4, data: vec![3, 4, 5] },
            ]
        );
    }

    #[test]
    fn test_blit_line_short_source_is_truncated() {
        let (mut arena, id) = arena_with(Rect::new(0, 0, 30, 10), ClipRegion::flat(Rect::new(0, 0, 30, 10)));
        let mut driver = RecordingDriver::new(320, 240, 16);
        let mut dc = begin_drawing(&mut arena, id, &mut driver).unwrap();
        dc.blit_line(0, 10, 0, &[1, 1, 2, 2, 3]);
        drop(dc);
        assert_eq!(driver.ops, vec![Op::RawHLine { x1: 0, x2: 2, y: 0, data: vec![1, 1, 2, 2] }]);
    }

    #[test]
    fn test_end_drawing_updates_visible_part() {
        let (mut arena, id) = arena_with(Rect::new(10, 10, 110, 60), ClipRegion::flat(Rect::new(0, 0, 60, 100)));
        let mut driver = RecordingDriver::new(320, 240, 16);
        let dc = begin_drawing(&mut arena, id, &mut driver).unwrap();
        assert!(end_drawing(dc, true));
        assert_eq!(driver.ops, vec![Op::Update { rect: Rect::new(10, 10, 60, 60) }]);
    }

    #[test]
    fn test_client_blit_is_noop() {
        let (mut arena, id) = arena_with(Rect::new(0, 0, 10, 10), ClipRegion::flat(Rect::new(0, 0, 10, 10)));
        let mut driver = RecordingDriver::new(320, 240, 16);
        let mut other = RecordingDriver::new(320, 240, 16);
        let mut dest = crate::dc::HardwareDc::new(&mut other, GraphicsContext::default());
        let mut dc = begin_drawing(&mut arena, id, &mut driver).unwrap();
        dc.blit(Point::new(0, 0), &mut dest, &Rect::new(0, 0, 10, 10));
        drop(dc);
        drop(dest);
        assert!(driver.ops.is_empty());
        assert!(other.ops.is_empty());
    }

    #[test]
    fn test_renders_into_framebuffer() {
        let (mut arena, id) = arena_with(Rect::new(2, 2, 8, 8), ClipRegion::flat(Rect::new(2, 2, 5, 8)));
        let mut fb = Framebuffer::new(10, 10, PixelFormat::Argb8888);
        let mut dc = begin_drawing(&mut arena, id, &mut fb).unwrap();
        dc.fill_rect(&Rect::new(0, 0, 6, 6));
        dc.draw_rect(&Rect::new(0, 0, 6, 6));
        drop(dc);

        assert_eq!(fb.pixel(2, 2), Some(FG));
        assert_eq!(fb.pixel(3, 3), Some(BG));
        assert_eq!(fb.pixel(4, 7), Some(FG));
        assert_eq!(fb.pixel(5, 3), Some(Color(0)));
        assert_eq!(fb.pixel(7, 7), Some(Color(0)));
    }

    fn random_rect(rng: &mut StdRng, max: i32) -> Rect {
        let x1 = rng.random_range(0..max);
        let y1 = rng.random_range(0..max);
        Rect::new(x1, y1, x1 + rng.random_range(0..max / 2), y1 + rng.random_range(0..max / 2))
    }

    fn random_region(rng: &mut StdRng) -> ClipRegion {
        if rng.random_bool(0.3) {
            return ClipRegion::flat(random_rect(rng, 120));
        }
        let mut rects: Vec<Rect> = Vec::new();
        for _ in 0..rng.random_range(0..6) {
            let candidate = random_rect(rng, 120);
            if rects.iter().all(|r| !r.is_intersect(&candidate)) {
                rects.push(candidate);
            }
        }
        ClipRegion::from_rects(&rects).unwrap()
    }

    fn draw_random_primitive(dc: &mut dyn DeviceContext, rng: &mut StdRng, line: &[u8]) {
        let a = rng.random_range(-40..160);
        let b = rng.random_range(-40..160);
        let c = rng.random_range(-40..160);
        match rng.random_range(0..6) {
            0 => dc.draw_point(a, b),
            1 => dc.draw_color_point(a, b, Color::GREEN),
            2 => dc.draw_vline(a, b, c),
            3 => dc.draw_hline(a, b, c),
            4 => dc.fill_rect(&Rect::new(a.min(b), c, a.max(b), c + rng.random_range(0..20))),
            _ => dc.blit_line(a, b, c, line),
        }
    }

    #[test]
    fn test_random_primitives_stay_inside_clip() {
        let mut rng = StdRng::seed_from_u64(0x6b70_696f);
        let line = vec![0xA5u8; 400];

        for _ in 0..300 {
            let clip = random_region(&mut rng);
            let extent = random_rect(&mut rng, 100);
            let (mut arena, id) = arena_with(extent, clip.clone());
            let mut driver = RecordingDriver::new(320, 240, 16);
            let mut dc = begin_drawing(&mut arena, id, &mut driver).unwrap();
            for _ in 0..20 {
                draw_random_primitive(&mut dc, &mut rng, &line);
            }
            drop(dc);

            for (x, y) in driver.written_pixels() {
                assert!(
                    clip.contains_point(x, y).is_some(),
                    "pixel ({}, {}) outside {:?}",
                    x,
                    y,
                    clip
                );
            }
        }
    }

    #[test]
    fn test_random_flat_and_single_list_agree() {
        let mut rng = StdRng::seed_from_u64(7);
        let line = vec![0x5Au8; 400];

        for _ in 0..200 {
            let rect = random_rect(&mut rng, 120);
            let extent = random_rect(&mut rng, 100);
            let seed = rng.random::<u64>();

            let mut outputs: Vec<Vec<Op>> = Vec::new();
            for clip in [ClipRegion::flat(rect), ClipRegion::from_rects(&[rect]).unwrap()] {
                let (mut arena, id) = arena_with(extent, clip);
                let mut driver = RecordingDriver::new(320, 240, 16);
                let mut dc = begin_drawing(&mut arena, id, &mut driver).unwrap();
                let mut prims = StdRng::seed_from_u64(seed);
                for _ in 0..10 {
                    draw_random_primitive(&mut dc, &mut prims, &line);
                }
                drop(dc);
                outputs.push(driver.ops);
            }
            assert_eq!(outputs[0], outputs[1]);
        }
    }

    #[test]
    fn test_list_pixels_match_union_of_flat_pieces() {
        let rects = [Rect::new(0, 0, 10, 10), Rect::new(10, 0, 20, 5), Rect::new(30, 30, 40, 40)];
        let (mut arena, id) = arena_with(Rect::new(0, 0, 50, 50), ClipRegion::from_rects(&rects).unwrap());
        let mut driver = RecordingDriver::new(320, 240, 16);
        let mut dc = begin_drawing(&mut arena, id, &mut driver).unwrap();
        dc.fill_rect(&Rect::new(0, 0, 50, 50));
        drop(dc);

        let expected: BTreeSet<(i32, i32)> = rects
            .iter()
            .flat_map(|r| (r.y1..r.y2).flat_map(move |y| (r.x1..r.x2).map(move |x| (x, y))))
            .collect();
        assert_eq!(driver.written_pixels(), expected);
    }
}

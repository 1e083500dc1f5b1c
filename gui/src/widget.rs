//! Widget arena.
//!
//! The widget layer (hierarchy, layout, z-order) lives outside this crate.
//! What the rasterizer needs from a widget is kept here: its absolute
//! extent, its precomputed clip region, its graphics context, visibility,
//! and whether it is attached to a top-level container. Device contexts
//! refer to their owner by [`WidgetId`] instead of holding a pointer.

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::gc::GraphicsContext;
use crate::rect::Rect;
use crate::region::ClipRegion;

/// Index of a widget in a [`WidgetArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(pub usize);

bitflags::bitflags! {
    /// Widget state flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WidgetFlags: u32 {
        /// Widget is shown.
        const SHOWN = 1 << 0;
        /// Widget accepts drawing (cleared while a window is being moved).
        const DC_VISIBLE = 1 << 1;
    }
}

/// What a device context reads from its owning widget.
#[derive(Debug, Clone)]
pub struct Widget {
    /// Absolute device rectangle of the widget.
    pub extent: Rect,
    /// Visible part of the widget, in device coordinates.
    pub clip: ClipRegion,
    /// Drawing state.
    pub gc: GraphicsContext,
    /// State flags.
    pub flags: WidgetFlags,
    /// Enclosing top-level container, if attached.
    pub toplevel: Option<WidgetId>,
}

impl Widget {
    /// A shown, unobscured widget: the clip region is its whole extent.
    pub fn new(extent: Rect) -> Self {
        Self {
            extent,
            clip: ClipRegion::flat(extent),
            gc: GraphicsContext::default(),
            flags: WidgetFlags::SHOWN | WidgetFlags::DC_VISIBLE,
            toplevel: None,
        }
    }

    pub fn with_clip(mut self, clip: ClipRegion) -> Self {
        self.clip = clip;
        self
    }

    pub fn with_gc(mut self, gc: GraphicsContext) -> Self {
        self.gc = gc;
        self
    }

    /// Whether drawing on this widget currently has any effect.
    pub fn is_dc_visible(&self) -> bool {
        self.flags.contains(WidgetFlags::SHOWN | WidgetFlags::DC_VISIBLE)
    }

    /// Logical rectangle of the widget: its extent moved to the origin.
    pub fn logical_rect(&self) -> Rect {
        Rect::new(0, 0, self.extent.width(), self.extent.height())
    }
}

/// Storage for widgets, addressed by [`WidgetId`].
#[derive(Debug, Default)]
pub struct WidgetArena {
    widgets: Vec<Widget>,
}

impl WidgetArena {
    pub fn new() -> Self {
        Self { widgets: Vec::new() }
    }

    /// Add a widget and return its id.
    pub fn insert(&mut self, widget: Widget) -> WidgetId {
        let id = WidgetId(self.widgets.len());
        self.widgets.push(widget);
        id
    }

    /// Add a top-level container. It is its own top-level.
    pub fn insert_toplevel(&mut self, mut widget: Widget) -> WidgetId {
        let id = WidgetId(self.widgets.len());
        widget.toplevel = Some(id);
        self.widgets.push(widget);
        id
    }

    /// Add a widget attached to the top-level container of `parent`.
    pub fn insert_child(&mut self, parent: WidgetId, mut widget: Widget) -> WidgetId {
        widget.toplevel = self.get(parent).and_then(|p| p.toplevel);
        self.insert(widget)
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id.0)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl Index<WidgetId> for WidgetArena {
    type Output = Widget;

    fn index(&self, id: WidgetId) -> &Widget {
        &self.widgets[id.0]
    }
}

impl IndexMut<WidgetId> for WidgetArena {
    fn index_mut(&mut self, id: WidgetId) -> &mut Widget {
        &mut self.widgets[id.0]
    }
}

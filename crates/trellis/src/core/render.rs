//! Paint traversal and the drawing backend interface.

use std::time::Duration;

use tracing::trace;

use super::{
    context::CoreView, dispose::GpuResource, error::Result, id::NodeId, options::Color,
    world::Core,
};
use crate::geom::{Insets, Point, Rect, Size};

/// Drawing primitives supplied by the host. All coordinates are in root
/// space; the backend clips to the most recent [`DrawBackend::set_clip`].
pub trait DrawBackend {
    /// Restrict subsequent drawing to `clip`.
    fn set_clip(&mut self, clip: Rect);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a run of text with its top-left corner at `origin`.
    fn draw_text(&mut self, origin: Point, text: &str, color: Color);

    /// Release a resource queued on the [`Disposer`](crate::Disposer).
    fn release(&mut self, _resource: GpuResource) {}
}

/// A widget's drawing surface: local coordinates relative to the node's
/// outer origin, clipped to the visible part of the node.
pub struct Frame<'a> {
    /// Destination.
    backend: &'a mut dyn DrawBackend,
    /// Root-space position of the node's outer origin.
    origin: Point,
    /// Outer size of the node.
    size: Size,
    /// Root-space clip in effect.
    clip: Rect,
    /// Time since the previous frame.
    delta: Duration,
}

impl<'a> Frame<'a> {
    /// Construct a frame for one node.
    pub(crate) fn new(
        backend: &'a mut dyn DrawBackend,
        origin: Point,
        size: Size,
        clip: Rect,
        delta: Duration,
    ) -> Self {
        Self {
            backend,
            origin,
            size,
            clip,
            delta,
        }
    }

    /// The node's area in local coordinates.
    pub fn area(&self) -> Rect {
        Rect::from_parts(Point::zero(), self.size)
    }

    /// Root-space position of the local origin.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Root-space clip in effect.
    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// Time since the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Fill a local rectangle. Invisible colors draw nothing.
    pub fn fill(&mut self, rect: Rect, color: Color) {
        if color.is_visible() && !rect.is_empty() {
            self.backend.fill_rect(rect.translate(self.origin), color);
        }
    }

    /// Fill the whole node.
    pub fn fill_all(&mut self, color: Color) {
        self.fill(self.area(), color);
    }

    /// Paint a border ring of the given widths around a background.
    pub fn panel(&mut self, border: Insets, border_color: Color, background: Color) {
        let area = self.area();
        if border.size() != Size::zero() {
            self.fill(area, border_color);
        }
        self.fill(area.deflate(border), background);
    }

    /// Draw text with its top-left corner at a local point.
    pub fn text(&mut self, at: Point, text: &str, color: Color) {
        if color.is_visible() && !text.is_empty() {
            self.backend.draw_text(at + self.origin, text, color);
        }
    }
}

/// Paint the attached tree, back to front.
pub(crate) fn render_tree(
    core: &mut Core,
    backend: &mut dyn DrawBackend,
    delta: Duration,
) -> Result<()> {
    let root = core.root;
    let clip = core.node(root)?.outer;
    render_node(core, backend, root, Point::zero(), clip, delta)
}

/// Paint one node and its children. `origin` is the root-space position of
/// the parent's content origin.
fn render_node(
    core: &mut Core,
    backend: &mut dyn DrawBackend,
    id: NodeId,
    origin: Point,
    clip: Rect,
    delta: Duration,
) -> Result<()> {
    let node = core.node(id)?;
    let outer = node.outer.translate(origin);
    let inner = node.inner.translate(outer.tl);
    let Some(visible) = clip.intersect(&outer) else {
        trace!(node = %node.name, "render skipped: clipped");
        return Ok(());
    };

    backend.set_clip(visible);
    core.with_widget_mut(id, |widget, core| {
        let mut frame = Frame::new(&mut *backend, outer.tl, outer.size(), visible, delta);
        widget.render(&mut frame, &CoreView::new(core, id))
    })??;

    let Some(content_clip) = visible.intersect(&inner) else {
        return Ok(());
    };
    let children = core.node(id)?.children.clone();
    for child in children.into_iter().rev() {
        render_node(core, backend, child, inner.tl, content_clip, delta)?;
    }
    Ok(())
}

//! Layout invalidation and the anchor cascade.
//!
//! A node's layout pass runs its widget's `layout`, and if the content
//! rectangle changed, delivers [`Event::Resize`] and re-anchors the
//! children. After the pass, an autosizing or reflowing parent is
//! invalidated in turn.

use scopeguard::guard;
use tracing::trace;

use super::{
    context::CoreContext,
    error::{Error, Result},
    event::Event,
    id::NodeId,
    node::{LayoutState, Node},
    options::Options,
    text::TextEngine,
    world::Core,
};
use crate::geom::{Insets, Point, Rect, Size};

/// Increment the suspension depth.
pub(crate) fn suspend(core: &mut Core) {
    core.suspended += 1;
    trace!(depth = core.suspended, "layout suspended");
}

/// Decrement the suspension depth.
pub(crate) fn resume(core: &mut Core) -> Result<()> {
    if core.suspended == 0 {
        return Err(Error::InvalidOperation(
            "resume_layout without a matching suspend_layout".into(),
        ));
    }
    core.suspended -= 1;
    trace!(depth = core.suspended, "layout resumed");
    Ok(())
}

/// Recompute a node's layout, then propagate to its parent when the parent
/// depends on its children.
///
/// While layout is suspended the request is recorded on the node. A node
/// that is mid-pass ignores requests on itself. While the node's widget is
/// checked out for an event, the request is held until the widget returns.
pub(crate) fn invalidate(core: &mut Core, id: NodeId) -> Result<()> {
    let suspended = core.suspended > 0;
    let node = core.node_mut(id)?;
    if suspended {
        node.dirty = true;
        trace!(node = %node.name, "invalidation deferred: suspended");
        return Ok(());
    }
    if node.state == LayoutState::Computing {
        trace!(node = %node.name, "invalidation ignored: re-entrant");
        return Ok(());
    }
    if node.widget.is_none() {
        node.layout_pending = true;
        return Ok(());
    }
    pass(core, id)?;
    propagate(core, id)
}

/// Invalidate the parent if it sizes or positions from its children.
fn propagate(core: &mut Core, id: NodeId) -> Result<()> {
    let Some(parent) = core.node(id)?.parent else {
        return Ok(());
    };
    let p = core.node(parent)?;
    if p.auto_size || p.reflow {
        invalidate(core, parent)?;
    }
    Ok(())
}

/// A single layout pass.
fn pass(core: &mut Core, id: NodeId) -> Result<()> {
    let node = core.node_mut(id)?;
    node.state = LayoutState::Computing;
    node.dirty = false;
    let before = node.inner;

    let mut guarded = guard(core, move |core| {
        if let Some(node) = core.nodes.get_mut(id) {
            node.state = LayoutState::Idle;
        }
    });
    let core: &mut Core = &mut **guarded;
    core.with_widget_mut(id, |widget, core| -> Result<()> {
        widget.layout(&mut LayoutCtx::new(core, id))?;
        let node = core.node_mut(id)?;
        node.layout_passes += 1;
        let after = node.inner;
        let auto_size = node.auto_size;
        trace!(node = %node.name, outer = ?node.outer, inner = ?after, "layout");
        if after != before {
            widget.on_event(&Event::Resize, &mut CoreContext::new(core, id))?;
            // An autosizing node follows its children, so re-anchoring them
            // to its new size would feed back into the next measurement.
            if !auto_size {
                cascade(core, id, after.size().delta(before.size()))?;
            }
        }
        Ok(())
    })?
}

/// Apply a content-size delta to every child according to its anchors.
fn cascade(core: &mut Core, id: NodeId, delta: (i32, i32)) -> Result<()> {
    if delta == (0, 0) {
        return Ok(());
    }
    let children = core.node(id)?.children.clone();
    for child in children {
        let node = core.node_mut(child)?;
        let rect = node.anchor.resize(node.outer, delta, &mut node.subpixel);
        core.set_outer(child, rect)?;
    }
    Ok(())
}

/// Lay out nodes under `id` whose invalidation was deferred, deepest first,
/// then invalidate `id` once.
pub(crate) fn relayout(core: &mut Core, id: NodeId) -> Result<()> {
    if core.suspended > 0 {
        core.node_mut(id)?.dirty = true;
        return Ok(());
    }
    for n in core.subtree_post_order(id) {
        if n == id {
            continue;
        }
        let Some(node) = core.nodes.get_mut(n) else {
            continue;
        };
        if !node.dirty {
            continue;
        }
        if node.widget.is_none() {
            node.dirty = false;
            node.layout_pending = true;
            continue;
        }
        pass(core, n)?;
        if let Some(parent) = core.parent(n)
            && parent != id
        {
            let p = core.node_mut(parent)?;
            p.dirty |= p.auto_size || p.reflow;
        }
    }
    invalidate(core, id)
}

/// Layout access for a widget computing its own node.
///
/// Size and content-rectangle setters write directly to the node without
/// triggering invalidation. Placing children goes through the tree and
/// invalidates them normally.
pub struct LayoutCtx<'a> {
    /// Tree being laid out.
    core: &'a mut Core,
    /// Node being computed.
    id: NodeId,
}

impl<'a> LayoutCtx<'a> {
    /// Construct a context for a node.
    pub(crate) fn new(core: &'a mut Core, id: NodeId) -> Self {
        Self { core, id }
    }

    /// The node being computed.
    fn this(&self) -> Option<&Node> {
        self.core.nodes.get(self.id)
    }

    /// The node being computed, mutably.
    fn this_mut(&mut self) -> Option<&mut Node> {
        self.core.nodes.get_mut(self.id)
    }

    /// Id of the node being computed.
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// Current outer rectangle.
    pub fn outer(&self) -> Rect {
        self.this().map_or_else(Rect::zero, |n| n.outer)
    }

    /// Current content rectangle.
    pub fn inner(&self) -> Rect {
        self.this().map_or_else(Rect::zero, |n| n.inner)
    }

    /// Is the node autosizing?
    pub fn auto_size(&self) -> bool {
        self.this().is_some_and(|n| n.auto_size)
    }

    /// Minimum outer size.
    pub fn size_min(&self) -> Size {
        self.this().map_or_else(Size::zero, |n| n.size_min)
    }

    /// Maximum outer size.
    pub fn size_max(&self) -> Size {
        self.this().map_or(Size::MAX, |n| n.size_max)
    }

    /// Is the node on the focus chain?
    pub fn has_focus(&self) -> bool {
        self.this().is_some_and(|n| n.has_focus)
    }

    /// Children, front to back.
    pub fn children(&self) -> Vec<NodeId> {
        self.this().map(|n| n.children.clone()).unwrap_or_default()
    }

    /// A node's outer rectangle.
    pub fn outer_of(&self, node: NodeId) -> Result<Rect> {
        Ok(self.core.node(node)?.outer)
    }

    /// Content rectangle of the parent, if attached.
    pub fn parent_inner(&self) -> Option<Rect> {
        let parent = self.this()?.parent?;
        self.core.nodes.get(parent).map(|p| p.inner)
    }

    /// Largest right and bottom edge among this node's children, measured
    /// from the content origin. Zero when there are no children.
    pub fn children_extent(&self) -> Size {
        self.extent_of(self.id).unwrap_or_default()
    }

    /// Largest right and bottom edge among another node's children.
    pub fn extent_of(&self, node: NodeId) -> Result<Size> {
        let mut extent = Size::zero();
        for child in &self.core.node(node)?.children {
            let outer = self.core.node(*child)?.outer;
            extent.w = extent.w.max(outer.right().max(0) as u32);
            extent.h = extent.h.max(outer.bottom().max(0) as u32);
        }
        Ok(extent)
    }

    /// Bounding box of all children, or `None` without children.
    pub fn children_bounds(&self) -> Option<Rect> {
        let node = self.this()?;
        node.children
            .iter()
            .filter_map(|c| self.core.nodes.get(*c).map(|n| n.outer))
            .reduce(|a, b| a.union(&b))
    }

    /// Set the outer size, clamped to the node's limits.
    pub fn set_size(&mut self, size: Size) {
        if let Some(node) = self.this_mut() {
            node.outer = node.outer.with_size(size.clamp(node.size_min, node.size_max));
        }
    }

    /// Set the outer rectangle as computed, without clamping to the size
    /// limits.
    pub fn set_outer(&mut self, outer: Rect) {
        if let Some(node) = self.this_mut() {
            node.outer = outer;
        }
    }

    /// Set the content rectangle, relative to the outer origin. The
    /// rectangle is clipped to the outer bounds.
    pub fn set_inner(&mut self, inner: Rect) {
        if let Some(node) = self.this_mut() {
            let bounds = node.outer.at(Point::zero());
            node.inner = inner.intersect(&bounds).unwrap_or_else(|| {
                let x = inner.tl.x.clamp(0, bounds.right());
                let y = inner.tl.y.clamp(0, bounds.bottom());
                Rect::new(x, y, 0, 0)
            });
        }
    }

    /// The default policy: when autosizing, size to the children extent
    /// plus insets; clamp; content rectangle is the outer area minus insets.
    pub fn standard_layout(&mut self, insets: Insets) {
        if self.auto_size() {
            let extent = self.children_extent();
            self.set_size(Size::new(
                extent.w.saturating_add(insets.horizontal()),
                extent.h.saturating_add(insets.vertical()),
            ));
        } else {
            let size = self.outer().size();
            self.set_size(size);
        }
        let outer = self.outer();
        self.set_inner(outer.at(Point::zero()).deflate(insets));
    }

    /// Set a child's outer rectangle, invalidating it.
    pub fn place(&mut self, child: NodeId, rect: Rect) -> Result<()> {
        self.core.set_outer(child, rect)
    }

    /// Request a layout pass for a node. A request for the node being
    /// computed is ignored.
    pub fn invalidate(&mut self, node: NodeId) -> Result<()> {
        invalidate(self.core, node)
    }

    /// Move a child, keeping its size.
    pub fn move_child(&mut self, child: NodeId, tl: Point) -> Result<()> {
        self.core.set_position(child, tl)
    }

    /// The installed text engine.
    pub fn text(&self) -> Option<&dyn TextEngine> {
        self.core.text_engine()
    }

    /// Shared settings.
    pub fn options(&self) -> &Options {
        &self.core.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geom::Anchor,
        testing::probe::Probe,
        widget::Widget,
        widgets::{Group, Root},
    };

    fn tree() -> Result<Core> {
        Core::new(Size::new(400, 300), Options::default())
    }

    #[test]
    fn inner_defaults_to_outer_area() -> Result<()> {
        let mut core = tree()?;
        let root = core.root();
        let p = core.build(Probe::new())?.outer(Rect::new(5, 5, 30, 20)).attach(root)?;
        let n = core.node(p)?;
        assert_eq!(n.inner(), Rect::new(0, 0, 30, 20));
        Ok(())
    }

    #[test]
    fn base_autosize_uses_extent_from_origin() -> Result<()> {
        let mut core = tree()?;
        let root = core.root();
        let holder = core.build(Probe::new())?.auto_size(true).attach(root)?;
        core.build(Probe::new())?.outer(Rect::new(10, 20, 30, 40)).attach(holder)?;
        core.build(Probe::new())?.outer(Rect::new(50, 5, 10, 10)).attach(holder)?;
        assert_eq!(core.node(holder)?.outer().size(), Size::new(60, 60));

        let empty = core.build(Probe::new())?.outer(Rect::new(0, 0, 99, 99)).auto_size(true).done()?;
        assert_eq!(core.node(empty)?.outer().size(), Size::zero());
        Ok(())
    }

    #[test]
    fn autosize_clamps_to_limits() -> Result<()> {
        let mut core = tree()?;
        let root = core.root();
        let holder = core
            .build(Probe::new())?
            .size_min(20, 20)
            .size_max(50, 50)
            .auto_size(true)
            .attach(root)?;
        assert_eq!(core.node(holder)?.outer().size(), Size::new(20, 20));
        core.build(Probe::new())?.outer(Rect::new(0, 0, 80, 30)).attach(holder)?;
        assert_eq!(core.node(holder)?.outer().size(), Size::new(50, 30));
        Ok(())
    }

    #[test]
    fn anchored_stretch_and_slide() -> Result<()> {
        let mut core = tree()?;
        let root = core.root();
        let holder = core.build(Probe::new())?.outer(Rect::new(0, 0, 200, 100)).attach(root)?;
        let all = core
            .build(Probe::new())?
            .outer(Rect::new(10, 10, 50, 50))
            .anchor(Anchor::ALL)
            .attach(holder)?;
        let near = core.build(Probe::new())?.outer(Rect::new(10, 10, 40, 40)).attach(holder)?;
        let far = core
            .build(Probe::new())?
            .outer(Rect::new(10, 10, 40, 40))
            .anchor(Anchor::RIGHT | Anchor::BOTTOM)
            .attach(holder)?;

        core.set_size(holder, Size::new(300, 150))?;
        assert_eq!(core.node(all)?.outer(), Rect::new(10, 10, 150, 100));
        assert_eq!(core.node(near)?.outer(), Rect::new(10, 10, 40, 40));
        assert_eq!(core.node(far)?.outer(), Rect::new(110, 60, 40, 40));
        Ok(())
    }

    #[test]
    fn anchor_cascade_recurses() -> Result<()> {
        let mut core = tree()?;
        let root = core.root();
        let outer = core
            .build(Probe::new())?
            .outer(Rect::new(0, 0, 100, 100))
            .attach(root)?;
        let mid = core
            .build(Probe::new())?
            .outer(Rect::new(0, 0, 100, 100))
            .anchor(Anchor::ALL)
            .attach(outer)?;
        let leaf = core
            .build(Probe::new())?
            .outer(Rect::new(0, 0, 10, 10))
            .anchor(Anchor::RIGHT)
            .attach(mid)?;
        core.set_size(outer, Size::new(120, 100))?;
        assert_eq!(core.node(mid)?.outer(), Rect::new(0, 0, 120, 100));
        assert_eq!(core.node(leaf)?.outer(), Rect::new(20, 0, 10, 10));
        Ok(())
    }

    #[test]
    fn group_autosize_propagates_upwards() -> Result<()> {
        let mut core = tree()?;
        let root = core.root();
        let outer = core.build(Group::new())?.auto_size(true).attach(root)?;
        let inner = core.build(Group::new())?.auto_size(true).attach(outer)?;
        let leaf = core.build(Probe::new())?.outer(Rect::new(0, 0, 10, 10)).attach(inner)?;
        let border = core.options().skin.group_layout.border.horizontal();
        assert_eq!(core.node(outer)?.outer().w, 10 + 2 * border);

        core.set_size(leaf, Size::new(30, 10))?;
        assert_eq!(core.node(inner)?.outer().w, 30 + border);
        assert_eq!(core.node(outer)?.outer().w, 30 + 2 * border);
        Ok(())
    }

    #[test]
    fn resize_event_precedes_cascade() -> Result<()> {
        let mut core = tree()?;
        let root = core.root();
        let holder = core.build(Probe::new())?.outer(Rect::new(0, 0, 50, 50)).attach(root)?;
        let child = core
            .build(Probe::new())?
            .outer(Rect::new(0, 0, 50, 50))
            .anchor(Anchor::ALL)
            .attach(holder)?;
        core.widget_mut::<Probe>(holder)?.clear();
        core.widget_mut::<Probe>(child)?.clear();

        core.set_size(holder, Size::new(60, 60))?;
        let probe = core.widget::<Probe>(holder)?;
        assert_eq!(probe.resizes(), 1);
        let at = probe.resize_seen_child_outer[0];
        assert_eq!(at, Some(Rect::new(0, 0, 50, 50)));
        assert_eq!(core.widget::<Probe>(child)?.resizes(), 1);
        Ok(())
    }

    #[test]
    fn suspension_defers_and_counts() -> Result<()> {
        let mut core = tree()?;
        let root = core.root();
        assert!(core.resume_layout().is_err());
        core.suspend_layout();
        core.suspend_layout();
        let p = core.create(Probe::new())?;
        assert_eq!(core.node(p)?.layout_passes(), 0);
        core.resume_layout()?;
        core.invalidate(p)?;
        assert_eq!(core.node(p)?.layout_passes(), 0);
        core.resume_layout()?;
        assert!(!core.layout_suspended());
        core.relayout(root)?;
        assert_eq!(core.node(p)?.layout_passes(), 0);
        core.relayout(p)?;
        assert_eq!(core.node(p)?.layout_passes(), 1);
        assert_eq!(core.widget::<Root>(root)?.kind(), "Root");
        Ok(())
    }
}

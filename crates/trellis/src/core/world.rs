use std::{any::type_name, collections::HashSet, mem, time::Duration};

use slotmap::SlotMap;
use tracing::debug;

use super::{
    builder::NodeBuilder,
    context::CoreContext,
    dispatch,
    error::{Error, Result},
    event::{Cursor, KeyEvent, MouseEvent},
    id::{NodeId, TypedId},
    layout,
    node::Node,
    options::Options,
    render::{self, DrawBackend},
    text::TextEngine,
};
use crate::{
    Context,
    geom::{Anchor, Point, Rect, Size},
    widget::{self, Widget},
    widgets::Root,
};

/// The control tree: an arena of nodes, the root, layout suspension and the
/// live popup.
pub struct Core {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Root node id.
    pub(crate) root: NodeId,
    /// Layout suspension depth.
    pub(crate) suspended: usize,
    /// Popup currently attached to the root.
    pub(crate) popup: Option<NodeId>,
    /// Shared settings and skin.
    pub(crate) options: Options,
    /// Installed text engine.
    pub(crate) text: Option<Box<dyn TextEngine>>,
    /// Pointer shape requested by the hovered widget.
    pub(crate) cursor: Cursor,
    /// Counter used to name new nodes.
    next_name: u64,
}

impl Core {
    /// Create a tree whose root covers the given client area.
    pub fn new(client: Size, options: Options) -> Result<Self> {
        let mut core = Self {
            nodes: SlotMap::with_key(),
            root: NodeId::default(),
            suspended: 0,
            popup: None,
            options,
            text: None,
            cursor: Cursor::Default,
            next_name: 0,
        };
        let root = core.insert(Box::new(Root));
        core.root = root;
        core.node_mut(root)?.outer = Rect::from_parts(Point::zero(), client);
        layout::invalidate(&mut core, root)?;
        Ok(core)
    }

    /// Return the root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrow a node.
    pub fn node(&self, id: impl Into<NodeId>) -> Result<&Node> {
        let id = id.into();
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Borrow a node mutably.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Borrow a node if it exists.
    pub fn get(&self, id: impl Into<NodeId>) -> Option<&Node> {
        self.nodes.get(id.into())
    }

    /// Does the arena hold this node?
    pub fn contains(&self, id: impl Into<NodeId>) -> bool {
        self.nodes.contains_key(id.into())
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the arena empty? Never true: the root always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Name of a node, for messages.
    pub fn name_of(&self, id: NodeId) -> String {
        self.nodes
            .get(id)
            .map_or_else(|| format!("{id:?}"), |n| n.name.clone())
    }

    /// Shared settings.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace the settings and lay out the whole tree again.
    pub fn set_options(&mut self, options: Options) -> Result<()> {
        self.options = options;
        for node in self.nodes.values_mut() {
            node.dirty = true;
        }
        layout::relayout(self, self.root)
    }

    /// Install a text engine.
    pub fn set_text_engine(&mut self, engine: impl TextEngine + 'static) {
        self.text = Some(Box::new(engine));
    }

    /// The installed text engine.
    pub fn text_engine(&self) -> Option<&dyn TextEngine> {
        self.text.as_deref()
    }

    /// Insert a node without laying it out.
    fn insert(&mut self, widget: Box<dyn Widget>) -> NodeId {
        let name = format!("{}{}", widget.kind(), self.next_name);
        self.next_name += 1;
        self.nodes.insert(Node::new(widget, name))
    }

    /// Create a detached node and run its first layout pass.
    pub fn create(&mut self, widget: impl Into<Box<dyn Widget>>) -> Result<NodeId> {
        let id = self.insert(widget.into());
        layout::invalidate(self, id)?;
        Ok(id)
    }

    /// Create a detached node and return its typed id.
    pub fn create_typed<W: Widget>(&mut self, widget: W) -> Result<TypedId<W>> {
        Ok(TypedId::new(self.create(widget)?))
    }

    /// Create a node and configure it fluently.
    pub fn build(&mut self, widget: impl Into<Box<dyn Widget>>) -> Result<NodeBuilder<'_>> {
        let id = self.create(widget)?;
        Ok(NodeBuilder::new(self, id))
    }

    /// Configure an existing node fluently.
    pub fn configure(&mut self, id: impl Into<NodeId>) -> NodeBuilder<'_> {
        NodeBuilder::new(self, id.into())
    }

    /// Create a node and attach it to `parent`.
    pub fn add_new(
        &mut self,
        parent: impl Into<NodeId>,
        widget: impl Into<Box<dyn Widget>>,
    ) -> Result<NodeId> {
        let child = self.create(widget)?;
        self.add(parent, child)
    }

    /// Attach a detached node as a child of `parent`.
    ///
    /// Overlay-kind nodes are inserted at the front of the child list, all
    /// others are appended. A parent that forwards its children (a scroll
    /// view) attaches to its content node instead. Fails if the child
    /// already has a parent, if the attachment would create a cycle, or if
    /// the parent is full. The tree is unchanged on failure.
    pub fn add(&mut self, parent: impl Into<NodeId>, child: impl Into<NodeId>) -> Result<NodeId> {
        let (parent, child) = (parent.into(), child.into());
        let target = self.node(parent)?.content_target.unwrap_or(parent);
        let target_node = self.node(target)?;
        let child_node = self.node(child)?;
        if let Some(current) = child_node.parent {
            return Err(Error::AlreadyAttached {
                child: child_node.name.clone(),
                parent: self.name_of(current),
            });
        }
        if child == self.root {
            return Err(Error::InvalidOperation(
                "the root cannot be attached".into(),
            ));
        }
        if child == target || self.is_ancestor(child, target) {
            return Err(Error::WouldCreateCycle {
                child: child_node.name.clone(),
                parent: target_node.name.clone(),
            });
        }
        if let Some(limit) = target_node.max_children
            && target_node.children.len() >= limit
        {
            return Err(Error::ChildLimit {
                parent: target_node.name.clone(),
                limit,
            });
        }

        let overlay = child_node.overlay;
        let node = self.node_mut(target)?;
        if overlay {
            node.children.insert(0, child);
        } else {
            node.children.push(child);
        }
        self.node_mut(child)?.parent = Some(target);
        debug!(
            child = %self.name_of(child),
            parent = %self.name_of(target),
            overlay,
            "attach"
        );
        layout::invalidate(self, child)?;
        Ok(child)
    }

    /// Detach `child` from `parent`. The child stays in the arena and can
    /// be attached again. Fails if `child` is not a child of `parent`.
    pub fn remove(&mut self, parent: impl Into<NodeId>, child: impl Into<NodeId>) -> Result<()> {
        let (parent, child) = (parent.into(), child.into());
        let recorded = self.node(child)?.parent;
        let owner = match self.node(parent)?.content_target {
            Some(content) if recorded == Some(content) => content,
            _ => parent,
        };
        if recorded != Some(owner) {
            return Err(Error::NotAChild {
                child: self.name_of(child),
                parent: self.name_of(parent),
            });
        }
        self.detach_from(owner, child)
    }

    /// Detach a node from whatever parent it has. A no-op for detached
    /// nodes.
    pub fn detach(&mut self, child: impl Into<NodeId>) -> Result<()> {
        let child = child.into();
        match self.node(child)?.parent {
            Some(parent) => self.detach_from(parent, child),
            None => Ok(()),
        }
    }

    /// Detach all children of `parent` with a single layout pass.
    pub fn clear(&mut self, parent: impl Into<NodeId>) -> Result<()> {
        let parent = parent.into();
        let target = self.node(parent)?.content_target.unwrap_or(parent);
        let children = self.node(target)?.children.clone();
        debug!(parent = %self.name_of(target), count = children.len(), "clear");
        layout::suspend(self);
        let detached = children
            .into_iter()
            .try_for_each(|child| self.detach_from(target, child));
        layout::resume(self)?;
        detached?;
        layout::invalidate(self, target)
    }

    /// Unlink a child. The caller has validated the relationship.
    fn detach_from(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let node = self.node_mut(parent)?;
        node.children.retain(|c| *c != child);
        if node.hover_child == Some(child) {
            node.hover_child = None;
        }
        if node.focused_child == Some(child) {
            node.focused_child = None;
        }
        let reflow = node.auto_size || node.reflow;

        // Detached nodes carry no interaction state.
        for id in self.subtree_pre_order(child) {
            if let Some(n) = self.nodes.get_mut(id) {
                n.has_focus = false;
                n.dragged = false;
                n.hover_child = None;
                n.focused_child = None;
            }
        }
        self.node_mut(child)?.parent = None;
        if self.popup == Some(child) {
            self.popup = None;
        }
        debug!(child = %self.name_of(child), parent = %self.name_of(parent), "detach");
        if reflow {
            layout::invalidate(self, parent)?;
        }
        Ok(())
    }

    /// Remove a node and its subtree from the arena. Context menus owned by
    /// the subtree are destroyed as well unless another node still refers
    /// to them.
    pub fn destroy(&mut self, id: impl Into<NodeId>) -> Result<()> {
        let id = id.into();
        if id == self.root {
            return Err(Error::InvalidOperation("the root cannot be destroyed".into()));
        }
        self.detach(id)?;
        let doomed = self.subtree_post_order(id);
        let doomed_set: HashSet<NodeId> = doomed.iter().copied().collect();
        let menus: Vec<NodeId> = doomed
            .iter()
            .filter_map(|n| self.nodes.get(*n).and_then(|n| n.context_menu))
            .filter(|m| !doomed_set.contains(m))
            .collect();
        debug!(node = %self.name_of(id), count = doomed.len(), "destroy");
        for n in &doomed {
            self.nodes.remove(*n);
        }
        if self.popup.is_some_and(|p| doomed_set.contains(&p)) {
            self.popup = None;
        }
        for menu in menus {
            let shared = self.nodes.values().any(|n| n.context_menu == Some(menu));
            if !shared && self.nodes.contains_key(menu) {
                self.destroy(menu)?;
            }
        }
        Ok(())
    }

    /// Parent of a node.
    pub fn parent(&self, id: impl Into<NodeId>) -> Option<NodeId> {
        self.nodes.get(id.into()).and_then(|n| n.parent)
    }

    /// Children of a node, front to back.
    pub fn children(&self, id: impl Into<NodeId>) -> Result<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// Is `ancestor` equal to `node` or one of its ancestors?
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Return true if the node is attached to the root.
    pub fn is_attached(&self, id: impl Into<NodeId>) -> bool {
        self.is_ancestor(self.root, id.into())
    }

    /// Collect a subtree in pre-order, including the root.
    pub fn subtree_pre_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            out.push(node_id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Collect a subtree in post-order, including the root.
    pub fn subtree_post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((node_id, visited)) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            if visited {
                out.push(node_id);
                continue;
            }
            stack.push((node_id, true));
            for child in node.children.iter().rev() {
                stack.push((*child, false));
            }
        }
        out
    }

    /// Set a node's outer rectangle, clamped to its size limits.
    pub fn set_outer(&mut self, id: impl Into<NodeId>, rect: Rect) -> Result<()> {
        let id = id.into();
        let node = self.node_mut(id)?;
        let rect = rect.with_size(rect.size().clamp(node.size_min, node.size_max));
        if node.outer == rect {
            return Ok(());
        }
        node.outer = rect;
        layout::invalidate(self, id)
    }

    /// Move a node within its parent's content space.
    pub fn set_position(&mut self, id: impl Into<NodeId>, tl: Point) -> Result<()> {
        let id = id.into();
        let outer = self.node(id)?.outer;
        self.set_outer(id, outer.at(tl))
    }

    /// Resize a node, keeping its position.
    pub fn set_size(&mut self, id: impl Into<NodeId>, size: Size) -> Result<()> {
        let id = id.into();
        let outer = self.node(id)?.outer;
        self.set_outer(id, outer.with_size(size))
    }

    /// Set a node's anchor flags.
    pub fn set_anchor(&mut self, id: impl Into<NodeId>, anchor: Anchor) -> Result<()> {
        let id = id.into();
        self.node_mut(id)?.anchor = anchor;
        layout::invalidate(self, id)
    }

    /// Enable or disable autosizing.
    pub fn set_auto_size(&mut self, id: impl Into<NodeId>, auto_size: bool) -> Result<()> {
        let id = id.into();
        self.node_mut(id)?.auto_size = auto_size;
        layout::invalidate(self, id)
    }

    /// Set the minimum outer size.
    pub fn set_size_min(&mut self, id: impl Into<NodeId>, size: Size) -> Result<()> {
        let id = id.into();
        let node = self.node_mut(id)?;
        node.size_min = size;
        node.outer = node.outer.with_size(node.outer.size().clamp(size, node.size_max));
        layout::invalidate(self, id)
    }

    /// Set the maximum outer size.
    pub fn set_size_max(&mut self, id: impl Into<NodeId>, size: Size) -> Result<()> {
        let id = id.into();
        let node = self.node_mut(id)?;
        node.size_max = size;
        node.outer = node.outer.with_size(node.outer.size().clamp(node.size_min, size));
        layout::invalidate(self, id)
    }

    /// Rename a node.
    pub fn set_name(&mut self, id: impl Into<NodeId>, name: impl Into<String>) -> Result<()> {
        self.node_mut(id.into())?.name = name.into();
        Ok(())
    }

    /// Attach a popup that opens on right click.
    pub fn set_context_menu(
        &mut self,
        id: impl Into<NodeId>,
        menu: Option<NodeId>,
    ) -> Result<()> {
        let id = id.into();
        if let Some(menu) = menu {
            self.node(menu)?;
        }
        self.node_mut(id)?.context_menu = menu;
        Ok(())
    }

    /// Resize the client area.
    pub fn set_client_size(&mut self, size: Size) -> Result<()> {
        self.set_outer(self.root, Rect::from_parts(Point::zero(), size))
    }

    /// Offset from a node's outer space to root space.
    fn root_offset(&self, id: NodeId) -> Result<Point> {
        let node = self.node(id)?;
        let mut offset = node.outer.tl;
        let mut current = node.parent;
        while let Some(pid) = current {
            let p = self.node(pid)?;
            offset = offset + p.outer.tl + p.inner.tl;
            current = p.parent;
        }
        Ok(offset)
    }

    /// Map a point in a node's outer space to root space.
    pub fn to_root(&self, id: impl Into<NodeId>, p: Point) -> Result<Point> {
        Ok(p + self.root_offset(id.into())?)
    }

    /// Map a root-space point into a node's outer space.
    pub fn from_root(&self, id: impl Into<NodeId>, p: Point) -> Result<Point> {
        Ok(p - self.root_offset(id.into())?)
    }

    /// A node's outer rectangle in root space.
    pub fn root_rect(&self, id: impl Into<NodeId>) -> Result<Rect> {
        let id = id.into();
        Ok(self.node(id)?.outer.at(self.root_offset(id)?))
    }

    /// Borrow a widget by concrete type.
    pub fn widget<W: Widget>(&self, id: impl Into<NodeId>) -> Result<&W> {
        let id = id.into();
        let slot = self
            .node(id)?
            .widget
            .as_deref()
            .ok_or(Error::ReentrantWidgetBorrow(id))?;
        widget::downcast_ref::<W>(slot).ok_or(Error::WidgetType {
            node: id,
            expected: type_name::<W>(),
        })
    }

    /// Mutably borrow a widget by concrete type. Changes that affect layout
    /// need an explicit [`Core::invalidate`].
    pub fn widget_mut<W: Widget>(&mut self, id: impl Into<NodeId>) -> Result<&mut W> {
        let id = id.into();
        let slot = self
            .node_mut(id)?
            .widget
            .as_deref_mut()
            .ok_or(Error::ReentrantWidgetBorrow(id))?;
        widget::downcast_mut::<W>(slot).ok_or(Error::WidgetType {
            node: id,
            expected: type_name::<W>(),
        })
    }

    /// Run a closure against a typed widget with a mutable context.
    pub fn with_widget<W, R>(
        &mut self,
        id: impl Into<NodeId>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget,
    {
        let id = id.into();
        self.with_widget_mut(id, |w, core| {
            let w = widget::downcast_mut::<W>(w).ok_or(Error::WidgetType {
                node: id,
                expected: type_name::<W>(),
            })?;
            let mut ctx = CoreContext::new(core, id);
            f(w, &mut ctx)
        })?
    }

    /// Check a widget out of its slot for the duration of a call.
    ///
    /// Invalidations of the node that arrive while its widget is out are
    /// held and run once the widget is back.
    pub(crate) fn with_widget_mut<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> R,
    ) -> Result<R> {
        let mut widget = self
            .node_mut(id)?
            .widget
            .take()
            .ok_or(Error::ReentrantWidgetBorrow(id))?;
        let out = f(widget.as_mut(), self);
        let pending = match self.nodes.get_mut(id) {
            Some(node) => {
                node.widget = Some(widget);
                mem::take(&mut node.layout_pending)
            }
            None => false,
        };
        if pending {
            layout::invalidate(self, id)?;
        }
        Ok(out)
    }

    /// Increment the layout suspension depth.
    pub fn suspend_layout(&mut self) {
        layout::suspend(self);
    }

    /// Decrement the layout suspension depth. Does not lay anything out;
    /// follow with [`Core::relayout`] or use [`Core::batch`].
    pub fn resume_layout(&mut self) -> Result<()> {
        layout::resume(self)
    }

    /// Is layout currently suspended?
    pub fn layout_suspended(&self) -> bool {
        self.suspended > 0
    }

    /// Recompute a node's layout and propagate to autosizing ancestors.
    pub fn invalidate(&mut self, id: impl Into<NodeId>) -> Result<()> {
        layout::invalidate(self, id.into())
    }

    /// Run layout for nodes under `id` whose invalidation was deferred by
    /// suspension, then recompute `id` itself once.
    pub fn relayout(&mut self, id: impl Into<NodeId>) -> Result<()> {
        layout::relayout(self, id.into())
    }

    /// Run `f` with layout suspended, then lay out `id` once.
    pub fn batch<R>(
        &mut self,
        id: impl Into<NodeId>,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let id = id.into();
        layout::suspend(self);
        let out = f(self);
        layout::resume(self)?;
        let out = out?;
        if self.suspended == 0 {
            layout::relayout(self, id)?;
        }
        Ok(out)
    }

    /// Route a root-space mouse event. Returns whether a widget handled it.
    pub fn mouse(&mut self, event: MouseEvent) -> Result<bool> {
        dispatch::mouse(self, event)
    }

    /// Route a key event along the focus chain.
    pub fn key(&mut self, event: KeyEvent) -> Result<bool> {
        dispatch::key(self, event)
    }

    /// Route text input along the focus chain.
    pub fn char(&mut self, c: char) -> Result<bool> {
        dispatch::char(self, c)
    }

    /// Put a node and its ancestors on the focus chain.
    pub fn focus(&mut self, id: impl Into<NodeId>) -> Result<()> {
        dispatch::focus(self, id.into())
    }

    /// Pointer shape requested by the tree.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The popup currently open, if any.
    pub fn popup(&self) -> Option<NodeId> {
        self.popup
    }

    /// Open a popup at a root-space position, closing any other.
    pub fn open_popup(&mut self, menu: impl Into<NodeId>, at: Point) -> Result<()> {
        dispatch::open_popup(self, menu.into(), at)
    }

    /// Close the open popup. Returns whether one was open.
    pub fn close_popup(&mut self) -> Result<bool> {
        dispatch::close_popup(self)
    }

    /// Paint the tree.
    pub fn render(&mut self, backend: &mut dyn DrawBackend, delta: Duration) -> Result<()> {
        render::render_tree(self, backend, delta)
    }

    /// Check structural invariants, reporting the first violation.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(Error::InvalidOperation(msg));
        if self.nodes.get(self.root).is_none_or(|r| r.parent.is_some()) {
            return fail("root missing or parented".into());
        }
        for (id, node) in &self.nodes {
            let mut seen = HashSet::with_capacity(node.children.len());
            let mut overlays_done = false;
            for child in &node.children {
                if !seen.insert(*child) {
                    return fail(format!("duplicate child {child:?} under {}", node.name));
                }
                let Some(c) = self.nodes.get(*child) else {
                    return fail(format!("missing child {child:?} under {}", node.name));
                };
                if c.parent != Some(id) {
                    return fail(format!("{} has a stale parent link", c.name));
                }
                if c.overlay && overlays_done {
                    return fail(format!("overlay {} behind a normal sibling", c.name));
                }
                overlays_done |= !c.overlay;
            }
            if let Some(p) = node.parent
                && !self.nodes.get(p).is_some_and(|p| p.children.contains(&id))
            {
                return fail(format!("{} missing from its parent", node.name));
            }
            if node.inner.w > node.outer.w || node.inner.h > node.outer.h {
                return fail(format!("{} inner exceeds outer", node.name));
            }
        }
        Ok(())
    }
}

use super::{
    dispatch,
    error::Result,
    event::Cursor,
    id::NodeId,
    node::Node,
    options::Options,
    text::TextEngine,
    world::Core,
};
use crate::geom::{Anchor, Point, Rect};

/// Read-only context available to widgets during render and event handling.
pub trait ViewContext {
    /// The node the widget belongs to.
    fn node_id(&self) -> NodeId;

    /// Look up any node in the tree.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Shared settings and skin.
    fn options(&self) -> &Options;

    /// The installed text engine.
    fn text(&self) -> Option<&dyn TextEngine>;

    /// The popup currently open, if any.
    fn popup(&self) -> Option<NodeId>;

    /// Map a point in this node's outer space to root space.
    fn to_root(&self, p: Point) -> Point;

    /// Outer rectangle of the current node.
    fn outer(&self) -> Rect {
        self.node(self.node_id()).map_or_else(Rect::zero, Node::outer)
    }

    /// Content rectangle of the current node.
    fn inner(&self) -> Rect {
        self.node(self.node_id()).map_or_else(Rect::zero, Node::inner)
    }

    /// Is the current node on the focus chain?
    fn has_focus(&self) -> bool {
        self.node(self.node_id()).is_some_and(Node::has_focus)
    }

    /// Does the current node hold the mouse capture?
    fn is_dragged(&self) -> bool {
        self.node(self.node_id()).is_some_and(Node::dragged)
    }

    /// Parent of the current node.
    fn parent(&self) -> Option<NodeId> {
        self.node(self.node_id()).and_then(Node::parent)
    }

    /// Content rectangle of the parent.
    fn parent_inner(&self) -> Option<Rect> {
        self.node(self.parent()?).map(Node::inner)
    }

    /// Children of the current node, front to back.
    fn children(&self) -> Vec<NodeId> {
        self.node(self.node_id())
            .map(|n| n.children().to_vec())
            .unwrap_or_default()
    }
}

/// Mutable context available to widgets during event handling.
pub trait Context: ViewContext {
    /// Set a node's outer rectangle.
    fn set_outer(&mut self, node: NodeId, rect: Rect) -> Result<()>;

    /// Set a node's anchor flags.
    fn set_anchor(&mut self, node: NodeId, anchor: Anchor) -> Result<()>;

    /// Request a layout pass for a node.
    fn invalidate(&mut self, node: NodeId) -> Result<()>;

    /// Take or release the mouse capture for the current node.
    fn set_dragged(&mut self, dragged: bool) -> Result<()>;

    /// Put a node on the focus chain.
    fn focus(&mut self, node: NodeId) -> Result<()>;

    /// Open a popup at a root-space position.
    fn open_popup(&mut self, menu: NodeId, at: Point) -> Result<()>;

    /// Close the open popup. Returns whether one was open.
    fn close_popup(&mut self) -> Result<bool>;

    /// Request a pointer shape. Entering any node resets it.
    fn set_cursor(&mut self, cursor: Cursor);

    /// Request a layout pass for the current node.
    fn invalidate_self(&mut self) -> Result<()> {
        let id = self.node_id();
        self.invalidate(id)
    }

    /// Set the current node's outer rectangle.
    fn set_own_outer(&mut self, rect: Rect) -> Result<()> {
        let id = self.node_id();
        self.set_outer(id, rect)
    }
}

/// Mutable context backed by the tree.
pub(crate) struct CoreContext<'a> {
    /// Tree.
    core: &'a mut Core,
    /// Current node.
    id: NodeId,
}

impl<'a> CoreContext<'a> {
    /// Construct a context for a node.
    pub(crate) fn new(core: &'a mut Core, id: NodeId) -> Self {
        Self { core, id }
    }
}

impl ViewContext for CoreContext<'_> {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.core.get(id)
    }

    fn options(&self) -> &Options {
        self.core.options()
    }

    fn text(&self) -> Option<&dyn TextEngine> {
        self.core.text_engine()
    }

    fn popup(&self) -> Option<NodeId> {
        self.core.popup()
    }

    fn to_root(&self, p: Point) -> Point {
        self.core.to_root(self.id, p).unwrap_or(p)
    }
}

impl Context for CoreContext<'_> {
    fn set_outer(&mut self, node: NodeId, rect: Rect) -> Result<()> {
        self.core.set_outer(node, rect)
    }

    fn set_anchor(&mut self, node: NodeId, anchor: Anchor) -> Result<()> {
        self.core.set_anchor(node, anchor)
    }

    fn invalidate(&mut self, node: NodeId) -> Result<()> {
        self.core.invalidate(node)
    }

    fn set_dragged(&mut self, dragged: bool) -> Result<()> {
        self.core.node_mut(self.id)?.dragged = dragged;
        Ok(())
    }

    fn focus(&mut self, node: NodeId) -> Result<()> {
        dispatch::focus(self.core, node)
    }

    fn open_popup(&mut self, menu: NodeId, at: Point) -> Result<()> {
        dispatch::open_popup(self.core, menu, at)
    }

    fn close_popup(&mut self) -> Result<bool> {
        dispatch::close_popup(self.core)
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.core.cursor = cursor;
    }
}

/// Read-only context backed by the tree, used while painting.
pub(crate) struct CoreView<'a> {
    /// Tree.
    core: &'a Core,
    /// Current node.
    id: NodeId,
}

impl<'a> CoreView<'a> {
    /// Construct a view for a node.
    pub(crate) fn new(core: &'a Core, id: NodeId) -> Self {
        Self { core, id }
    }
}

impl ViewContext for CoreView<'_> {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.core.get(id)
    }

    fn options(&self) -> &Options {
        self.core.options()
    }

    fn text(&self) -> Option<&dyn TextEngine> {
        self.core.text_engine()
    }

    fn popup(&self) -> Option<NodeId> {
        self.core.popup()
    }

    fn to_root(&self, p: Point) -> Point {
        self.core.to_root(self.id, p).unwrap_or(p)
    }
}

use super::{error::Result, id::NodeId, world::Core};
use crate::{
    error::Error,
    geom::{Anchor, Point, Rect, Size},
};

/// Fluent builder for node geometry and hierarchy.
///
/// Each step is applied immediately. The first failure is kept and
/// returned from [`NodeBuilder::done`] or [`NodeBuilder::attach`]; later
/// steps are skipped.
pub struct NodeBuilder<'a> {
    /// Tree being modified.
    core: &'a mut Core,
    /// Node being configured.
    id: NodeId,
    /// First failure, if any.
    error: Option<Error>,
}

impl<'a> NodeBuilder<'a> {
    /// Start configuring a node.
    pub(crate) fn new(core: &'a mut Core, id: NodeId) -> Self {
        Self {
            core,
            id,
            error: None,
        }
    }

    /// Apply one step unless an earlier one failed.
    fn step(mut self, f: impl FnOnce(&mut Core, NodeId) -> Result<()>) -> Self {
        if self.error.is_none()
            && let Err(e) = f(&mut *self.core, self.id)
        {
            self.error = Some(e);
        }
        self
    }

    /// Set the outer rectangle.
    pub fn outer(self, rect: Rect) -> Self {
        self.step(|core, id| core.set_outer(id, rect))
    }

    /// Set the position within the parent's content space.
    pub fn at(self, x: i32, y: i32) -> Self {
        self.step(|core, id| core.set_position(id, Point::new(x, y)))
    }

    /// Set the outer size.
    pub fn size(self, w: u32, h: u32) -> Self {
        self.step(|core, id| core.set_size(id, Size::new(w, h)))
    }

    /// Set the anchor flags.
    pub fn anchor(self, anchor: Anchor) -> Self {
        self.step(|core, id| core.set_anchor(id, anchor))
    }

    /// Enable or disable autosizing.
    pub fn auto_size(self, auto_size: bool) -> Self {
        self.step(|core, id| core.set_auto_size(id, auto_size))
    }

    /// Set the minimum outer size.
    pub fn size_min(self, w: u32, h: u32) -> Self {
        self.step(|core, id| core.set_size_min(id, Size::new(w, h)))
    }

    /// Set the maximum outer size.
    pub fn size_max(self, w: u32, h: u32) -> Self {
        self.step(|core, id| core.set_size_max(id, Size::new(w, h)))
    }

    /// Override the generated name.
    pub fn name(self, name: &str) -> Self {
        self.step(|core, id| core.set_name(id, name))
    }

    /// Attach a popup opened on right click.
    pub fn context_menu(self, menu: NodeId) -> Self {
        self.step(|core, id| core.set_context_menu(id, Some(menu)))
    }

    /// Add a child to this node.
    pub fn child(self, child: NodeId) -> Self {
        self.step(|core, id| core.add(id, child).map(drop))
    }

    /// Finish and return the node id.
    pub fn done(self) -> Result<NodeId> {
        self.finish().map(|(_, id)| id)
    }

    /// Attach the node to a parent and return its id.
    pub fn attach(self, parent: impl Into<NodeId>) -> Result<NodeId> {
        let (core, id) = self.finish()?;
        core.add(parent, id)
    }

    /// Finish, keeping the core borrow.
    fn finish(self) -> Result<(&'a mut Core, NodeId)> {
        match self.error {
            Some(e) => Err(e),
            None => Ok((self.core, self.id)),
        }
    }
}

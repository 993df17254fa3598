//! Widget trait and event outcome types.

use std::any::{Any, type_name};

use crate::{
    Context, ViewContext,
    core::{layout::LayoutCtx, render::Frame},
    error::Result,
    event::Event,
    geom::{Insets, Size},
};

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Event was handled and should stop propagation.
    Handle,
    /// Event was consumed without further action.
    Consume,
    /// Event was ignored.
    Ignore,
}

impl EventOutcome {
    /// Did the widget claim the event?
    pub fn is_handled(self) -> bool {
        !matches!(self, Self::Ignore)
    }
}

/// Behavior for a node in the control tree.
///
/// The tree owns placement, invalidation and routing. A widget decides how
/// its node is sized, what it paints and how it reacts to input.
pub trait Widget: Any + Send {
    /// Overlay-kind widgets are inserted at the front of their parent's
    /// child list and promoted back to the front when clicked.
    fn overlay(&self) -> bool {
        false
    }

    /// Fixed number of children this widget accepts, if any.
    fn max_children(&self) -> Option<usize> {
        None
    }

    /// Re-run this widget's layout whenever a child completes a layout
    /// pass, even when the node is not autosizing.
    fn reflow_on_child_change(&self) -> bool {
        false
    }

    /// Does a freshly created node size itself from its children?
    fn initial_auto_size(&self) -> bool {
        false
    }

    /// Outer size of a freshly created node.
    fn initial_size(&self) -> Size {
        Size::zero()
    }

    /// Compute this node's size and content rectangle, and position
    /// children if the widget manages them.
    fn layout(&mut self, ctx: &mut LayoutCtx) -> Result<()> {
        ctx.standard_layout(Insets::default());
        Ok(())
    }

    /// Paint this widget. Children are painted by the traversal.
    fn render(&mut self, _frame: &mut Frame, _ctx: &dyn ViewContext) -> Result<()> {
        Ok(())
    }

    /// Handle an event.
    fn on_event(&mut self, _event: &Event, _ctx: &mut dyn Context) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// Name prefix for nodes holding this widget.
    fn kind(&self) -> &'static str {
        let name = type_name::<Self>();
        let base = name.split('<').next().unwrap_or(name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}

/// Downcast a widget to a concrete type.
pub(crate) fn downcast_mut<W: Widget>(widget: &mut dyn Widget) -> Option<&mut W> {
    let any = widget as &mut dyn Any;
    any.downcast_mut::<W>()
}

/// Downcast a widget to a concrete type.
pub(crate) fn downcast_ref<W: Widget>(widget: &dyn Widget) -> Option<&W> {
    let any = widget as &dyn Any;
    any.downcast_ref::<W>()
}

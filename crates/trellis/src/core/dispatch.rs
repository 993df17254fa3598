//! Input routing.
//!
//! Mouse events descend from the root, converting the location into each
//! node's local space. A node holding the mouse capture, or the hovered
//! child on the path to it, receives events regardless of position. Key and
//! text events follow the focus chain.

use tracing::debug;

use super::{
    context::CoreContext,
    error::{Error, Result},
    event::{Cursor, Event, KeyEvent, MouseAction, MouseButton, MouseEvent},
    id::NodeId,
    world::Core,
};
use crate::{geom::Point, widget::EventOutcome};

/// Deliver an event to a node's own widget.
fn notify(core: &mut Core, id: NodeId, event: &Event) -> Result<EventOutcome> {
    core.with_widget_mut(id, |widget, core| {
        widget.on_event(event, &mut CoreContext::new(core, id))
    })?
}

/// Route a root-space mouse event.
pub(crate) fn mouse(core: &mut Core, event: MouseEvent) -> Result<bool> {
    if event.action == MouseAction::Down
        && let Some(popup) = core.popup
        && !core.root_rect(popup)?.contains(event.location)
    {
        close_popup(core)?;
    }
    let root = core.root;
    let local = core.from_root(root, event.location)?;
    route(core, root, event.at(local))
}

/// Does this node or any descendant hold the mouse capture?
fn is_dragged(core: &Core, id: NodeId) -> bool {
    core.subtree_pre_order(id)
        .into_iter()
        .any(|n| core.get(n).is_some_and(|n| n.dragged))
}

/// The front-most child whose outer rectangle contains a content-space
/// point.
fn hit_child(core: &Core, id: NodeId, local: Point) -> Option<NodeId> {
    let node = core.get(id)?;
    node.children
        .iter()
        .copied()
        .find(|c| core.get(*c).is_some_and(|c| c.outer.contains(local)))
}

/// Move the hover to `hit`, sending enter and leave notifications.
fn update_hover(core: &mut Core, id: NodeId, hit: Option<NodeId>) -> Result<()> {
    let hover = core.node(id)?.hover_child;
    if hover == hit {
        return Ok(());
    }
    if let Some(old) = hover {
        mouse_leave(core, old)?;
    }
    core.node_mut(id)?.hover_child = hit;
    if let Some(child) = hit {
        core.cursor = Cursor::Default;
        notify(core, child, &Event::MouseEnter)?;
    }
    Ok(())
}

/// Forward an event to a child, converting to its outer space.
fn forward(core: &mut Core, child: NodeId, event: MouseEvent, local: Point) -> Result<bool> {
    let tl = core.node(child)?.outer.tl;
    route(core, child, event.at(local - tl))
}

/// Route a mouse event whose location is in `id`'s outer space.
fn route(core: &mut Core, id: NodeId, event: MouseEvent) -> Result<bool> {
    let node = core.node(id)?;
    if node.dragged {
        return own(core, id, event);
    }
    let inner = node.inner;
    let local = event.location - inner.tl;

    if let Some(hover) = node.hover_child
        && is_dragged(core, hover)
    {
        return forward(core, hover, event, local);
    }

    if event.action == MouseAction::Down && !core.node(id)?.has_focus {
        core.node_mut(id)?.has_focus = true;
        notify(core, id, &Event::Focus)?;
    }

    let hit = if inner.contains(event.location) {
        hit_child(core, id, local)
    } else {
        None
    };

    match event.action {
        MouseAction::Move => {
            update_hover(core, id, hit)?;
            if let Some(child) = hit {
                return forward(core, child, event, local);
            }
        }
        MouseAction::Down => {
            update_hover(core, id, hit)?;
            if let Some(child) = hit {
                let focused = core.node(id)?.focused_child;
                if focused != Some(child) {
                    if let Some(old) = focused {
                        focus_lost(core, old)?;
                    }
                    core.node_mut(id)?.focused_child = Some(child);
                }
                let handled = forward(core, child, event, local)?;
                promote(core, id, child)?;
                return Ok(handled);
            }
        }
        MouseAction::Wheel => {
            if let Some(child) = hit
                && forward(core, child, event, local)?
            {
                return Ok(true);
            }
        }
        MouseAction::Up | MouseAction::DoubleClick => {
            if let Some(child) = hit {
                return forward(core, child, event, local);
            }
        }
    }
    own(core, id, event)
}

/// Deliver a mouse event to the node's own widget, opening its context
/// menu on a right press.
fn own(core: &mut Core, id: NodeId, event: MouseEvent) -> Result<bool> {
    let handled = notify(core, id, &Event::Mouse(event))?.is_handled();
    if event.is_down(MouseButton::Right)
        && let Some(menu) = core.get(id).and_then(|n| n.context_menu)
    {
        let at = core.to_root(id, event.location)?;
        open_popup(core, menu, at)?;
        return Ok(true);
    }
    Ok(handled)
}

/// Bring a clicked overlay child to the front of its parent.
fn promote(core: &mut Core, parent: NodeId, child: NodeId) -> Result<()> {
    if !core.get(child).is_some_and(|c| c.overlay) {
        return Ok(());
    }
    let Some(node) = core.nodes.get_mut(parent) else {
        return Ok(());
    };
    if let Some(pos) = node.children.iter().position(|c| *c == child)
        && pos > 0
    {
        node.children.remove(pos);
        node.children.insert(0, child);
        debug!(node = %core.name_of(child), "promote overlay");
    }
    Ok(())
}

/// The pointer left a node: clear its hover chain, deepest first.
fn mouse_leave(core: &mut Core, id: NodeId) -> Result<()> {
    if let Some(hover) = core.node_mut(id)?.hover_child.take() {
        mouse_leave(core, hover)?;
    }
    notify(core, id, &Event::MouseLeave)?;
    Ok(())
}

/// Take a node and its focused descendants off the focus chain.
fn focus_lost(core: &mut Core, id: NodeId) -> Result<()> {
    let node = core.node_mut(id)?;
    if node.has_focus {
        node.has_focus = false;
        notify(core, id, &Event::FocusLost)?;
    }
    let children = core.node(id)?.children.clone();
    for child in children {
        if core.get(child).is_some_and(|c| c.has_focus) {
            focus_lost(core, child)?;
        }
    }
    Ok(())
}

/// Route a key event along the focus chain.
pub(crate) fn key(core: &mut Core, event: KeyEvent) -> Result<bool> {
    let root = core.root;
    key_route(core, root, &Event::Key(event))
}

/// Route text input along the focus chain.
pub(crate) fn char(core: &mut Core, c: char) -> Result<bool> {
    let root = core.root;
    key_route(core, root, &Event::Char(c))
}

/// Offer a keyboard event to focused children first, then to the node.
fn key_route(core: &mut Core, id: NodeId, event: &Event) -> Result<bool> {
    let node = core.node(id)?;
    if !node.dragged {
        for child in node.children.clone() {
            if core.get(child).is_some_and(|c| c.has_focus) && key_route(core, child, event)? {
                return Ok(true);
            }
        }
    }
    Ok(notify(core, id, event)?.is_handled())
}

/// Put a node and its ancestors on the focus chain, removing the previous
/// chain where it diverges.
pub(crate) fn focus(core: &mut Core, target: NodeId) -> Result<()> {
    if !core.is_attached(target) {
        return Err(Error::InvalidOperation(format!(
            "cannot focus detached node {}",
            core.name_of(target)
        )));
    }
    let mut chain = vec![target];
    while let Some(parent) = core.parent(chain[chain.len() - 1]) {
        chain.push(parent);
    }
    chain.reverse();

    for pair in chain.windows(2) {
        let (parent, child) = (pair[0], pair[1]);
        let focused = core.node(parent)?.focused_child;
        if focused != Some(child) {
            if let Some(old) = focused {
                focus_lost(core, old)?;
            }
            core.node_mut(parent)?.focused_child = Some(child);
        }
    }
    for id in chain {
        let node = core.node_mut(id)?;
        if !node.has_focus {
            node.has_focus = true;
            notify(core, id, &Event::Focus)?;
        }
    }
    debug!(node = %core.name_of(target), "focus");
    Ok(())
}

/// Attach a popup to the root at a root-space position, closing any popup
/// already open. The popup is kept inside the root's content area.
pub(crate) fn open_popup(core: &mut Core, menu: NodeId, at: Point) -> Result<()> {
    close_popup(core)?;
    let root = core.root;
    core.set_position(menu, at)?;
    core.add(root, menu)?;
    let bounds = core.node(root)?.inner.at(Point::zero());
    let outer = core.node(menu)?.outer;
    let kept = outer.clamp_within(&bounds);
    if kept != outer {
        core.set_outer(menu, kept)?;
    }
    core.popup = Some(menu);
    debug!(menu = %core.name_of(menu), x = at.x, y = at.y, "popup open");
    Ok(())
}

/// Detach the open popup. Returns whether one was open.
pub(crate) fn close_popup(core: &mut Core) -> Result<bool> {
    let Some(menu) = core.popup.take() else {
        return Ok(false);
    };
    if core.contains(menu) {
        core.detach(menu)?;
    }
    debug!(menu = %core.name_of(menu), "popup closed");
    Ok(true)
}

use std::fmt;

use crate::{
    Context, ViewContext,
    error::Result,
    event::{Event, MouseAction, MouseButton},
    geom::{Point, Size},
    layout::LayoutCtx,
    render::Frame,
    text::{MonoText, TextEngine},
    widget::{EventOutcome, Widget},
};

use super::flow::{Flow, FlowDirection};

/// Callback run when a menu item is clicked.
pub type MenuAction = Box<dyn FnMut(&mut dyn Context) -> Result<()> + Send>;

/// A popup panel that stacks its items top to bottom and sizes itself to
/// fit them. Attach one to a node with
/// [`Core::set_context_menu`](crate::Core::set_context_menu) to open it on
/// right click.
#[derive(Debug)]
pub struct ContextMenu {
    /// Item placement.
    flow: Flow,
}

impl Default for ContextMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextMenu {
    /// Construct an empty menu.
    pub fn new() -> Self {
        Self {
            flow: Flow::new(FlowDirection::TopDown),
        }
    }
}

impl Widget for ContextMenu {
    fn overlay(&self) -> bool {
        true
    }

    fn initial_auto_size(&self) -> bool {
        true
    }

    fn reflow_on_child_change(&self) -> bool {
        true
    }

    fn layout(&mut self, ctx: &mut LayoutCtx) -> Result<()> {
        let skin = ctx.options().skin.context_menu;
        self.flow.lay_out(ctx, skin)
    }

    fn render(&mut self, frame: &mut Frame, ctx: &dyn ViewContext) -> Result<()> {
        Flow::paint(frame, &ctx.options().skin.context_menu);
        Ok(())
    }
}

/// A clickable menu entry. Clicking runs the action, then closes the open
/// popup.
pub struct MenuItem {
    /// Label text.
    label: String,
    /// Click callback.
    action: Option<MenuAction>,
    /// Is the pointer over the item?
    hovered: bool,
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("label", &self.label)
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

impl MenuItem {
    /// Construct an item without an action.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: None,
            hovered: false,
        }
    }

    /// Build an item that runs `action` when clicked.
    pub fn with_action(
        mut self,
        action: impl FnMut(&mut dyn Context) -> Result<()> + Send + 'static,
    ) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    /// Label text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Change the label. The node needs a layout pass afterwards.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Is the pointer over the item?
    pub fn hovered(&self) -> bool {
        self.hovered
    }
}

impl Widget for MenuItem {
    fn layout(&mut self, ctx: &mut LayoutCtx) -> Result<()> {
        let padding = ctx.options().skin.menu_item.padding;
        let label = match ctx.text() {
            Some(text) => text.measure(&self.label, None),
            None => MonoText::default().measure(&self.label, None),
        };
        ctx.set_size(Size::new(
            label.w.saturating_add(padding.horizontal()),
            label.h.saturating_add(padding.vertical()),
        ));
        let outer = ctx.outer();
        ctx.set_inner(outer.at(Point::zero()).deflate(padding));
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, ctx: &dyn ViewContext) -> Result<()> {
        let skin = ctx.options().skin.menu_item;
        frame.fill_all(if self.hovered {
            skin.hover_color
        } else {
            skin.background_color
        });
        frame.text(ctx.inner().tl, &self.label, skin.text_color);
        Ok(())
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        match event {
            Event::MouseEnter => {
                self.hovered = true;
                Ok(EventOutcome::Ignore)
            }
            Event::MouseLeave => {
                self.hovered = false;
                Ok(EventOutcome::Ignore)
            }
            Event::Mouse(m) if m.button == Some(MouseButton::Left) => match m.action {
                MouseAction::Down => Ok(EventOutcome::Handle),
                MouseAction::Up => {
                    if let Some(action) = self.action.as_mut() {
                        action(ctx)?;
                    }
                    self.hovered = false;
                    ctx.close_popup()?;
                    Ok(EventOutcome::Handle)
                }
                _ => Ok(EventOutcome::Ignore),
            },
            _ => Ok(EventOutcome::Ignore),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::{
        Core, NodeId,
        event::MouseEvent,
        geom::Rect,
        options::Options,
        testing::probe::Probe,
    };

    /// A root with a 100x100 probe whose context menu holds two items. The
    /// first item bumps the returned counter.
    fn setup() -> Result<(Core, NodeId, NodeId, Arc<AtomicUsize>)> {
        let mut core = Core::new(Size::new(200, 150), Options::default())?;
        let root = core.root();
        let target = core
            .build(Probe::new())?
            .outer(Rect::new(0, 0, 100, 100))
            .attach(root)?;
        let menu = core.create(ContextMenu::new())?;
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&clicks);
        core.add_new(
            menu,
            MenuItem::new("Open").with_action(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )?;
        core.add_new(menu, MenuItem::new("Close window"))?;
        core.set_context_menu(target, Some(menu))?;
        Ok((core, target, menu, clicks))
    }

    #[test]
    fn menu_wraps_items() -> Result<()> {
        let (core, _, menu, _) = setup()?;
        let items = core.children(menu)?;
        // "Open": 4 * 6 + 6 by 10 + 6.
        assert_eq!(core.node(items[0])?.outer(), Rect::new(0, 0, 30, 16));
        // "Close window": 12 * 6 + 6, one pixel of spacing below "Open".
        assert_eq!(core.node(items[1])?.outer(), Rect::new(0, 17, 78, 16));
        // Border 1 and padding 1 on every side.
        assert_eq!(core.node(menu)?.outer().size(), Size::new(82, 37));
        Ok(())
    }

    #[test]
    fn right_click_opens_and_click_runs_action() -> Result<()> {
        let (mut core, _, menu, clicks) = setup()?;
        assert!(core.mouse(MouseEvent::down(MouseButton::Right, (20, 30)))?);
        assert_eq!(core.popup(), Some(menu));
        assert_eq!(core.node(menu)?.outer().tl, Point::new(20, 30));
        assert_eq!(core.children(core.root())?[0], menu);

        // First item spans (22, 32)-(52, 48) in root space.
        core.mouse(MouseEvent::moved((25, 35)))?;
        let first = core.children(menu)?[0];
        assert!(core.widget::<MenuItem>(first)?.hovered());
        core.mouse(MouseEvent::down(MouseButton::Left, (25, 35)))?;
        core.mouse(MouseEvent::up(MouseButton::Left, (25, 35)))?;
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
        assert_eq!(core.popup(), None);
        assert_eq!(core.parent(menu), None);
        core.validate()
    }

    #[test]
    fn press_outside_closes() -> Result<()> {
        let (mut core, target, menu, clicks) = setup()?;
        core.mouse(MouseEvent::down(MouseButton::Right, (20, 30)))?;
        core.mouse(MouseEvent::down(MouseButton::Left, (150, 140)))?;
        assert_eq!(core.popup(), None);
        assert_eq!(core.parent(menu), None);
        assert_eq!(clicks.load(Ordering::SeqCst), 0);
        // The press outside landed on the root, not the probe.
        assert_eq!(core.widget::<Probe>(target)?.mouse_of(MouseAction::Down).len(), 1);
        Ok(())
    }

    #[test]
    fn opening_near_the_edge_stays_inside() -> Result<()> {
        let (mut core, target, menu, _) = setup()?;
        core.set_outer(target, Rect::new(0, 0, 200, 150))?;
        core.mouse(MouseEvent::down(MouseButton::Right, (190, 140)))?;
        assert_eq!(core.node(menu)?.outer(), Rect::new(118, 113, 82, 37));
        Ok(())
    }
}

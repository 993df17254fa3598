use crate::{
    Context, ViewContext,
    error::Result,
    event::{Event, MouseAction, MouseButton, MouseEvent},
    geom::{Insets, Rect, Size},
    layout::LayoutCtx,
    options::Color,
    render::Frame,
    widget::{EventOutcome, Widget},
};

/// A leaf widget that records what happens to it.
#[derive(Debug)]
pub struct Probe {
    /// Events received, oldest first.
    pub events: Vec<Event>,
    /// Outer rectangle of the first child at each resize notification.
    pub resize_seen_child_outer: Vec<Option<Rect>>,
    /// Paint calls received.
    pub renders: usize,
    /// Outcome reported for mouse events.
    pub mouse_outcome: EventOutcome,
    /// Outcome reported for key and text events.
    pub key_outcome: EventOutcome,
    /// Take the mouse capture on a left press and release it on a left
    /// release.
    pub capture: bool,
    /// Fill color painted over the whole node.
    pub paint: Option<Color>,
    /// Report as overlay kind.
    pub overlay: bool,
    /// Size of a freshly created node.
    pub size: Size,
    /// Invalidate the node from inside its own layout pass.
    pub invalidate_in_layout: bool,
}

impl Default for Probe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe {
    /// A probe that ignores everything.
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            resize_seen_child_outer: Vec::new(),
            renders: 0,
            mouse_outcome: EventOutcome::Ignore,
            key_outcome: EventOutcome::Ignore,
            capture: false,
            paint: None,
            overlay: false,
            size: Size::new(10, 10),
            invalidate_in_layout: false,
        }
    }

    /// Claim mouse events.
    pub fn handling(mut self) -> Self {
        self.mouse_outcome = EventOutcome::Handle;
        self
    }

    /// Claim key and text events.
    pub fn handling_keys(mut self) -> Self {
        self.key_outcome = EventOutcome::Handle;
        self
    }

    /// Take the mouse capture while the left button is down.
    pub fn capturing(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Paint the node in a solid color.
    pub fn painted(mut self, color: Color) -> Self {
        self.paint = Some(color);
        self
    }

    /// Ask for another layout pass from inside every layout pass.
    pub fn invalidating_itself(mut self) -> Self {
        self.invalidate_in_layout = true;
        self
    }

    /// Report as overlay kind.
    pub fn as_overlay(mut self) -> Self {
        self.overlay = true;
        self
    }

    /// Forget recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
        self.resize_seen_child_outer.clear();
        self.renders = 0;
    }

    /// Number of resize notifications.
    pub fn resizes(&self) -> usize {
        self.count(&Event::Resize)
    }

    /// Number of times an exact event was received.
    pub fn count(&self, event: &Event) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    /// Mouse events received.
    pub fn mouse(&self) -> Vec<MouseEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Mouse(m) => Some(*m),
                _ => None,
            })
            .collect()
    }

    /// Mouse events with a given action.
    pub fn mouse_of(&self, action: MouseAction) -> Vec<MouseEvent> {
        self.mouse().into_iter().filter(|m| m.action == action).collect()
    }
}

impl Widget for Probe {
    fn overlay(&self) -> bool {
        self.overlay
    }

    fn initial_size(&self) -> Size {
        self.size
    }

    fn layout(&mut self, ctx: &mut LayoutCtx) -> Result<()> {
        ctx.standard_layout(Insets::default());
        if self.invalidate_in_layout {
            let id = ctx.node_id();
            ctx.invalidate(id)?;
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, _ctx: &dyn ViewContext) -> Result<()> {
        self.renders += 1;
        if let Some(color) = self.paint {
            frame.fill_all(color);
        }
        Ok(())
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        self.events.push(*event);
        match event {
            Event::Resize => {
                let first = ctx.children().first().copied();
                let seen = first.and_then(|c| ctx.node(c)).map(|n| n.outer());
                self.resize_seen_child_outer.push(seen);
                Ok(EventOutcome::Ignore)
            }
            Event::Mouse(m) => {
                if self.capture && m.is_down(MouseButton::Left) {
                    ctx.set_dragged(true)?;
                } else if self.capture && m.is_up(MouseButton::Left) {
                    ctx.set_dragged(false)?;
                }
                Ok(self.mouse_outcome)
            }
            Event::Key(_) | Event::Char(_) => Ok(self.key_outcome),
            _ => Ok(EventOutcome::Ignore),
        }
    }
}

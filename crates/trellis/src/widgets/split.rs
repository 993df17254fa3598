use crate::{
    Context, Core, NodeId, ViewContext,
    error::Result,
    event::{Event, MouseAction, MouseButton},
    geom::{Orientation, Point, Rect, Size},
    layout::LayoutCtx,
    options::{Options, SplitLayoutSkin},
    render::Frame,
    widget::{EventOutcome, Widget},
};

/// Two slots separated by a draggable splitter. The first child fills the
/// leading side, the second the trailing side.
#[derive(Debug)]
pub struct Split {
    /// Axis the splitter divides.
    orientation: Orientation,
    /// Splitter position as a fraction of the available length.
    position: f32,
    /// Skin override.
    skin: Option<SplitLayoutSkin>,
    /// Splitter bar, in outer space.
    splitter: Rect,
}

impl Split {
    /// Construct a split. `Vertical` places the slots side by side.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            position: 0.5,
            skin: None,
            splitter: Rect::zero(),
        }
    }

    /// Build a split with an initial splitter position.
    pub fn with_position(mut self, position: f32) -> Self {
        self.set_position(position);
        self
    }

    /// Build a split with its own skin.
    pub fn with_skin(mut self, skin: SplitLayoutSkin) -> Self {
        self.skin = Some(skin);
        self
    }

    /// Axis the splitter divides.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Change the orientation. The node needs a layout pass afterwards.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Splitter position as a fraction in `[0, 1]`.
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Move the splitter. The node needs a layout pass afterwards.
    pub fn set_position(&mut self, position: f32) {
        self.position = if position.is_nan() {
            0.5
        } else {
            position.clamp(0.0, 1.0)
        };
    }

    /// Splitter bar in the node's outer space.
    pub fn splitter(&self) -> Rect {
        self.splitter
    }

    /// The first and second slots of a split node.
    pub fn slots(core: &Core, split: NodeId) -> Result<(Option<NodeId>, Option<NodeId>)> {
        let children = core.children(split)?;
        Ok((children.first().copied(), children.get(1).copied()))
    }

    /// The skin in effect.
    fn skin(&self, options: &Options) -> SplitLayoutSkin {
        self.skin.unwrap_or(options.skin.split_layout)
    }
}

impl Widget for Split {
    fn max_children(&self) -> Option<usize> {
        Some(2)
    }

    fn reflow_on_child_change(&self) -> bool {
        true
    }

    fn initial_size(&self) -> Size {
        Size::new(100, 100)
    }

    fn layout(&mut self, ctx: &mut LayoutCtx) -> Result<()> {
        let size = ctx.outer().size();
        ctx.set_size(size);
        let inner = ctx.outer().at(Point::zero());
        ctx.set_inner(inner);

        let bar = self.skin(ctx.options()).splitter_size;
        let (first, second, splitter) = match self.orientation {
            Orientation::Vertical => {
                let at = (inner.w.saturating_sub(bar) as f32 * self.position) as u32;
                let rest = inner.w.saturating_sub(at).saturating_sub(bar);
                (
                    Rect::new(0, 0, at, inner.h),
                    Rect::new((at + bar) as i32, 0, rest, inner.h),
                    Rect::new(at as i32, 0, bar, inner.h),
                )
            }
            Orientation::Horizontal => {
                let at = (inner.h.saturating_sub(bar) as f32 * self.position) as u32;
                let rest = inner.h.saturating_sub(at).saturating_sub(bar);
                (
                    Rect::new(0, 0, inner.w, at),
                    Rect::new(0, (at + bar) as i32, inner.w, rest),
                    Rect::new(0, at as i32, inner.w, bar),
                )
            }
        };
        self.splitter = splitter;
        let children = ctx.children();
        if let Some(child) = children.first() {
            ctx.place(*child, first)?;
        }
        if let Some(child) = children.get(1) {
            ctx.place(*child, second)?;
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, ctx: &dyn ViewContext) -> Result<()> {
        frame.fill(self.splitter, self.skin(ctx.options()).background_color);
        Ok(())
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        let Event::Mouse(m) = event else {
            return Ok(EventOutcome::Ignore);
        };
        match m.action {
            MouseAction::Down if m.button == Some(MouseButton::Left) => {
                ctx.set_dragged(true)?;
                Ok(EventOutcome::Handle)
            }
            MouseAction::Up if m.button == Some(MouseButton::Left) => {
                ctx.set_dragged(false)?;
                Ok(EventOutcome::Handle)
            }
            MouseAction::Move if ctx.is_dragged() => {
                let inner = ctx.inner();
                let half = (self.skin(ctx.options()).splitter_size / 2) as f32;
                let (at, len) = match self.orientation {
                    Orientation::Vertical => (m.location.x, inner.w),
                    Orientation::Horizontal => (m.location.y, inner.h),
                };
                if len > 0 {
                    self.set_position((at as f32 - half) / len as f32);
                    ctx.invalidate_self()?;
                }
                Ok(EventOutcome::Handle)
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }
}

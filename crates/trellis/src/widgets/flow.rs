use crate::{
    ViewContext,
    error::Result,
    geom::{Point, Size},
    layout::LayoutCtx,
    options::{FlowLayoutSkin, Options},
    render::Frame,
    widget::Widget,
};

/// Direction children are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowDirection {
    /// From the left edge, rightwards.
    #[default]
    LeftToRight,
    /// From the right edge, leftwards.
    RightToLeft,
    /// From the top edge, downwards.
    TopDown,
    /// From the bottom edge, upwards.
    BottomUp,
}

impl FlowDirection {
    /// Does the flow start at the far edge of its axis?
    fn reversed(self) -> bool {
        matches!(self, Self::RightToLeft | Self::BottomUp)
    }
}

/// Places children one after another along an axis, in child-list order,
/// separated by the skin spacing. Children keep their own sizes.
#[derive(Debug, Default)]
pub struct Flow {
    /// Layout direction.
    direction: FlowDirection,
    /// Skin override.
    skin: Option<FlowLayoutSkin>,
}

impl Flow {
    /// Construct a flow in the given direction.
    pub fn new(direction: FlowDirection) -> Self {
        Self {
            direction,
            skin: None,
        }
    }

    /// Build a flow with its own skin.
    pub fn with_skin(mut self, skin: FlowLayoutSkin) -> Self {
        self.skin = Some(skin);
        self
    }

    /// Layout direction.
    pub fn direction(&self) -> FlowDirection {
        self.direction
    }

    /// Change direction. The node needs a layout pass afterwards.
    pub fn set_direction(&mut self, direction: FlowDirection) {
        self.direction = direction;
    }

    /// The skin in effect.
    fn skin(&self, options: &Options) -> FlowLayoutSkin {
        self.skin.unwrap_or(options.skin.flow_layout)
    }

    /// Position children along the axis within the current content
    /// rectangle.
    fn arrange(&self, ctx: &mut LayoutCtx, space: u32) -> Result<()> {
        let inner = ctx.inner();
        let space = i32::try_from(space).unwrap_or(i32::MAX);
        let mut current = match self.direction {
            FlowDirection::RightToLeft => inner.w as i32,
            FlowDirection::BottomUp => inner.h as i32,
            _ => 0,
        };
        for child in ctx.children() {
            let outer = ctx.outer_of(child)?;
            let (w, h) = (outer.w as i32, outer.h as i32);
            let tl = match self.direction {
                FlowDirection::LeftToRight => {
                    let tl = Point::new(current, 0);
                    current = current.saturating_add(w).saturating_add(space);
                    tl
                }
                FlowDirection::RightToLeft => {
                    current = current.saturating_sub(w);
                    let tl = Point::new(current, 0);
                    current = current.saturating_sub(space);
                    tl
                }
                FlowDirection::TopDown => {
                    let tl = Point::new(0, current);
                    current = current.saturating_add(h).saturating_add(space);
                    tl
                }
                FlowDirection::BottomUp => {
                    current = current.saturating_sub(h);
                    let tl = Point::new(0, current);
                    current = current.saturating_sub(space);
                    tl
                }
            };
            ctx.move_child(child, tl)?;
        }
        Ok(())
    }

    /// Lay out with an explicit skin.
    pub(crate) fn lay_out(&self, ctx: &mut LayoutCtx, skin: FlowLayoutSkin) -> Result<()> {
        self.arrange(ctx, skin.space)?;
        let insets = skin.border + skin.padding;
        if ctx.auto_size() {
            let bounds = ctx.children_bounds().map_or_else(Size::zero, |b| b.size());
            ctx.set_size(Size::new(
                bounds.w.saturating_add(insets.horizontal()),
                bounds.h.saturating_add(insets.vertical()),
            ));
        } else {
            let size = ctx.outer().size();
            ctx.set_size(size);
        }
        let outer = ctx.outer();
        ctx.set_inner(outer.at(Point::zero()).deflate(insets));
        // Reversed flows measure from the far edge of the new content area.
        if self.direction.reversed() {
            self.arrange(ctx, skin.space)?;
        }
        Ok(())
    }

    /// Paint with an explicit skin.
    pub(crate) fn paint(frame: &mut Frame, skin: &FlowLayoutSkin) {
        frame.panel(skin.border, skin.border_color, skin.background_color);
    }
}

impl Widget for Flow {
    fn initial_size(&self) -> Size {
        Size::new(100, 100)
    }

    fn reflow_on_child_change(&self) -> bool {
        true
    }

    fn layout(&mut self, ctx: &mut LayoutCtx) -> Result<()> {
        let skin = self.skin(ctx.options());
        self.lay_out(ctx, skin)
    }

    fn render(&mut self, frame: &mut Frame, ctx: &dyn ViewContext) -> Result<()> {
        Self::paint(frame, &self.skin(ctx.options()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Core, NodeId,
        geom::{Insets, Rect},
        options::Color,
        testing::probe::Probe,
    };

    fn skin() -> FlowLayoutSkin {
        FlowLayoutSkin {
            border: Insets::uniform(1),
            padding: Insets::uniform(2),
            space: 4,
            border_color: Color::TRANSPARENT,
            background_color: Color::TRANSPARENT,
        }
    }

    fn flow(direction: FlowDirection, auto: bool) -> Result<(Core, NodeId, Vec<NodeId>)> {
        let mut core = Core::new(Size::new(400, 400), Options::default())?;
        let root = core.root();
        let f = core
            .build(Flow::new(direction).with_skin(skin()))?
            .outer(Rect::new(0, 0, 100, 60))
            .auto_size(auto)
            .attach(root)?;
        let mut kids = Vec::new();
        for w in [10, 20, 30] {
            kids.push(core.build(Probe::new())?.size(w, w).attach(f)?);
        }
        Ok((core, f, kids))
    }

    fn positions(core: &Core, kids: &[NodeId]) -> Result<Vec<Point>> {
        kids.iter().map(|k| Ok(core.node(*k)?.outer().tl)).collect()
    }

    #[test]
    fn left_to_right() -> Result<()> {
        let (core, f, kids) = flow(FlowDirection::LeftToRight, false)?;
        assert_eq!(
            positions(&core, &kids)?,
            vec![Point::new(0, 0), Point::new(14, 0), Point::new(38, 0)]
        );
        assert_eq!(core.node(f)?.inner(), Rect::new(3, 3, 94, 54));
        Ok(())
    }

    #[test]
    fn right_to_left_starts_at_far_edge() -> Result<()> {
        let (core, _, kids) = flow(FlowDirection::RightToLeft, false)?;
        assert_eq!(
            positions(&core, &kids)?,
            vec![Point::new(84, 0), Point::new(60, 0), Point::new(26, 0)]
        );
        Ok(())
    }

    #[test]
    fn vertical_flows() -> Result<()> {
        let (core, _, kids) = flow(FlowDirection::TopDown, false)?;
        assert_eq!(
            positions(&core, &kids)?,
            vec![Point::new(0, 0), Point::new(0, 14), Point::new(0, 38)]
        );
        let (core, _, kids) = flow(FlowDirection::BottomUp, false)?;
        assert_eq!(
            positions(&core, &kids)?,
            vec![Point::new(0, 44), Point::new(0, 20), Point::new(0, -14)]
        );
        Ok(())
    }

    #[test]
    fn autosize_wraps_children_and_reflows() -> Result<()> {
        let (mut core, f, kids) = flow(FlowDirection::LeftToRight, true)?;
        // 10 + 4 + 20 + 4 + 30 wide, 30 high, plus border and padding.
        assert_eq!(core.node(f)?.outer().size(), Size::new(68 + 6, 30 + 6));

        core.set_size(kids[0], Size::new(20, 10))?;
        assert_eq!(core.node(kids[1])?.outer().tl, Point::new(24, 0));
        assert_eq!(core.node(f)?.outer().size(), Size::new(78 + 6, 36));

        core.remove(f, kids[1])?;
        assert_eq!(core.node(kids[2])?.outer().tl, Point::new(24, 0));
        assert_eq!(core.node(f)?.outer().w, 54 + 6);
        Ok(())
    }
}

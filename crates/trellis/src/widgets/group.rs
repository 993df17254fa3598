use crate::{
    ViewContext,
    error::Result,
    geom::{Point, Size},
    layout::LayoutCtx,
    options::{GroupLayoutSkin, Options},
    render::Frame,
    widget::Widget,
};

/// A bordered panel. When autosizing, it wraps the bounding box of its
/// children plus the border.
#[derive(Debug, Default)]
pub struct Group {
    /// Skin override.
    skin: Option<GroupLayoutSkin>,
}

impl Group {
    /// Construct a group using the shared skin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a group with its own skin.
    pub fn with_skin(mut self, skin: GroupLayoutSkin) -> Self {
        self.skin = Some(skin);
        self
    }

    /// The skin in effect.
    fn skin(&self, options: &Options) -> GroupLayoutSkin {
        self.skin.unwrap_or(options.skin.group_layout)
    }
}

impl Widget for Group {
    fn initial_size(&self) -> Size {
        Size::new(100, 100)
    }

    fn layout(&mut self, ctx: &mut LayoutCtx) -> Result<()> {
        let border = self.skin(ctx.options()).border;
        if ctx.auto_size() {
            let bounds = ctx.children_bounds().map_or_else(Size::zero, |b| b.size());
            ctx.set_size(Size::new(
                bounds.w.saturating_add(border.horizontal()),
                bounds.h.saturating_add(border.vertical()),
            ));
        } else {
            let size = ctx.outer().size();
            ctx.set_size(size);
        }
        let outer = ctx.outer();
        ctx.set_inner(outer.at(Point::zero()).deflate(border));
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, ctx: &dyn ViewContext) -> Result<()> {
        let skin = self.skin(ctx.options());
        frame.panel(skin.border, skin.border_color, skin.background_color);
        Ok(())
    }
}

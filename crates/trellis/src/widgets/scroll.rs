use crate::{
    Context, Core, NodeId, ViewContext,
    error::Result,
    event::{Event, MouseAction},
    geom::{Point, Rect, Size},
    layout::LayoutCtx,
    options::{Options, ScrollViewSkin},
    render::Frame,
    widget::{EventOutcome, Widget},
};

/// The scrolled surface inside a [`ScrollView`]. Children added to the
/// view land here; the view reads their extent and positions this node by
/// the scroll offset.
#[derive(Debug, Default)]
pub struct ScrollContent;

impl Widget for ScrollContent {
    fn reflow_on_child_change(&self) -> bool {
        true
    }
}

/// A painted scroll bar: the track and the thumb, in outer space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bar {
    /// Full length of the bar.
    track: Rect,
    /// Visible portion indicator.
    thumb: Rect,
}

/// Place a thumb along a track of `len` pixels.
fn thumb_span(len: u32, visible: u32, total: u32, offset: u32, freedom: u32) -> (u32, u32) {
    if total == 0 || freedom == 0 {
        return (0, len);
    }
    let size = (u64::from(len) * u64::from(visible) / u64::from(total)).clamp(1, u64::from(len));
    let room = u64::from(len) - size;
    let at = room * u64::from(offset) / u64::from(freedom);
    (at as u32, size as u32)
}

/// A bordered viewport onto a content node that can be larger than the
/// view. Bars are painted on axes that can scroll; the wheel scrolls
/// vertically when possible, otherwise horizontally.
#[derive(Debug, Default)]
pub struct ScrollView {
    /// Content node.
    content: Option<NodeId>,
    /// Scroll offset, between zero and `freedom`.
    offset: Point,
    /// How far the content can scroll on each axis.
    freedom: Size,
    /// Horizontal bar, when horizontal scrolling is possible.
    hbar: Option<Bar>,
    /// Vertical bar, when vertical scrolling is possible.
    vbar: Option<Bar>,
    /// Skin override.
    skin: Option<ScrollViewSkin>,
}

impl ScrollView {
    /// Construct a scroll view widget. Use [`ScrollView::install`] to create
    /// the node together with its content node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scroll view with its own skin.
    pub fn with_skin(mut self, skin: ScrollViewSkin) -> Self {
        self.skin = Some(skin);
        self
    }

    /// Create a detached scroll view node and its content node. Children
    /// added to the returned node are redirected to the content node.
    pub fn install(core: &mut Core, view: Self) -> Result<NodeId> {
        let id = core.create(view)?;
        let content = core.create(ScrollContent)?;
        core.add(id, content)?;
        core.node_mut(id)?.content_target = Some(content);
        core.widget_mut::<Self>(id)?.content = Some(content);
        core.invalidate(id)?;
        Ok(id)
    }

    /// The content node.
    pub fn content(&self) -> Option<NodeId> {
        self.content
    }

    /// Current scroll offset.
    pub fn scroll_position(&self) -> Point {
        self.offset
    }

    /// Maximum scroll offset on each axis.
    pub fn scroll_freedom(&self) -> Size {
        self.freedom
    }

    /// Scroll to an offset. The offset is clamped on the next layout pass.
    pub fn scroll_to(&mut self, offset: Point, ctx: &mut dyn Context) -> Result<()> {
        self.offset = offset;
        ctx.invalidate_self()
    }

    /// The skin in effect.
    fn skin(&self, options: &Options) -> ScrollViewSkin {
        self.skin.unwrap_or(options.skin.scroll_view)
    }

    /// Clamp the offset into the scrollable range.
    fn clamp_offset(&mut self) {
        let fx = i32::try_from(self.freedom.w).unwrap_or(i32::MAX);
        let fy = i32::try_from(self.freedom.h).unwrap_or(i32::MAX);
        self.offset = Point::new(self.offset.x.clamp(0, fx), self.offset.y.clamp(0, fy));
    }
}

impl Widget for ScrollView {
    fn reflow_on_child_change(&self) -> bool {
        true
    }

    fn initial_size(&self) -> Size {
        Size::new(32, 32)
    }

    fn layout(&mut self, ctx: &mut LayoutCtx) -> Result<()> {
        let skin = self.skin(ctx.options());
        let size = ctx.outer().size();
        ctx.set_size(size);
        let outer = ctx.outer().at(Point::zero());
        let inner = outer.deflate(skin.border);
        ctx.set_inner(inner);
        let inner = ctx.inner();

        let Some(content) = self.content else {
            return Ok(());
        };
        let total = ctx.extent_of(content)?;
        let bar = skin.bar_size;
        self.freedom = Size::new(
            total.w.saturating_sub(inner.w.saturating_sub(bar)),
            total.h.saturating_sub(inner.h.saturating_sub(bar)),
        );
        self.clamp_offset();
        let vbar = if self.freedom.h > 0 { bar } else { 0 };
        let hbar = if self.freedom.w > 0 { bar } else { 0 };
        let view = Size::new(inner.w.saturating_sub(vbar), inner.h.saturating_sub(hbar));
        let (ox, oy) = (self.offset.x, self.offset.y);
        ctx.place(
            content,
            Rect::new(
                -ox,
                -oy,
                view.w.saturating_add(ox as u32),
                view.h.saturating_add(oy as u32),
            ),
        )?;

        let origin = inner.tl;
        self.vbar = (vbar > 0).then(|| {
            let track = Rect::new(origin.x + view.w as i32, origin.y, bar, view.h);
            let (at, len) = thumb_span(view.h, view.h, total.h, oy as u32, self.freedom.h);
            let thumb = Rect::new(track.tl.x, track.tl.y + at as i32, bar, len);
            Bar { track, thumb }
        });
        self.hbar = (hbar > 0).then(|| {
            let track = Rect::new(origin.x, origin.y + view.h as i32, view.w, bar);
            let (at, len) = thumb_span(view.w, view.w, total.w, ox as u32, self.freedom.w);
            let thumb = Rect::new(track.tl.x + at as i32, track.tl.y, len, bar);
            Bar { track, thumb }
        });
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, ctx: &dyn ViewContext) -> Result<()> {
        let skin = self.skin(ctx.options());
        frame.panel(skin.border, skin.border_color, skin.background_color);
        for bar in [self.vbar, self.hbar].into_iter().flatten() {
            frame.fill(bar.track, skin.bar_color);
            frame.fill(bar.thumb, skin.thumb_color);
        }
        Ok(())
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        let Event::Mouse(m) = event else {
            return Ok(EventOutcome::Ignore);
        };
        if m.action != MouseAction::Wheel || m.wheel == 0 {
            return Ok(EventOutcome::Ignore);
        }
        let step = i32::try_from(ctx.options().wheel_step).unwrap_or(i32::MAX);
        let delta = m.wheel.saturating_mul(step);
        let offset = if self.freedom.h > 0 {
            Point::new(self.offset.x, self.offset.y.saturating_sub(delta))
        } else if self.freedom.w > 0 {
            Point::new(self.offset.x.saturating_sub(delta), self.offset.y)
        } else {
            return Ok(EventOutcome::Ignore);
        };
        self.scroll_to(offset, ctx)?;
        Ok(EventOutcome::Handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event::MouseEvent, testing::probe::Probe};

    /// A 104x104 view (border 2, bar 8) holding a 200x50 child.
    fn setup() -> Result<(Core, NodeId, NodeId)> {
        let mut core = Core::new(Size::new(400, 400), Options::default())?;
        let root = core.root();
        let view = ScrollView::install(&mut core, ScrollView::new())?;
        core.configure(view).outer(Rect::new(0, 0, 104, 104)).attach(root)?;
        let child = core.build(Probe::new())?.size(200, 50).attach(view)?;
        Ok((core, view, child))
    }

    #[test]
    fn children_redirect_to_content() -> Result<()> {
        let (mut core, view, child) = setup()?;
        let content = core.widget::<ScrollView>(view)?.content();
        assert_eq!(core.parent(child), content);
        assert_eq!(core.children(view)?.len(), 1);
        core.remove(view, child)?;
        assert_eq!(core.parent(child), None);
        Ok(())
    }

    #[test]
    fn freedom_and_bars() -> Result<()> {
        let (core, view, _) = setup()?;
        let w = core.widget::<ScrollView>(view)?;
        // 200 - (100 - 8) horizontally; 50 fits vertically.
        assert_eq!(w.scroll_freedom(), Size::new(108, 0));
        assert!(w.hbar.is_some());
        assert!(w.vbar.is_none());
        let content = w.content().map(|c| core.node(c)).transpose()?;
        assert_eq!(content.map(|n| n.outer()), Some(Rect::new(0, 0, 100, 92)));
        Ok(())
    }

    #[test]
    fn wheel_scrolls_horizontally_and_clamps() -> Result<()> {
        let (mut core, view, child) = setup()?;
        let content = core.widget::<ScrollView>(view)?.content();
        // Away from the user: offset would go negative and clamps to zero.
        assert!(core.mouse(MouseEvent::wheel((10, 10), 1))?);
        assert_eq!(core.widget::<ScrollView>(view)?.scroll_position(), Point::zero());

        core.mouse(MouseEvent::wheel((10, 10), -2))?;
        assert_eq!(core.widget::<ScrollView>(view)?.scroll_position(), Point::new(32, 0));
        let content = content.map(|c| core.node(c)).transpose()?;
        assert_eq!(content.map(|n| n.outer().tl), Some(Point::new(-32, 0)));

        core.mouse(MouseEvent::wheel((10, 10), -100))?;
        assert_eq!(core.widget::<ScrollView>(view)?.scroll_position(), Point::new(108, 0));
        // The child never claimed the wheel.
        assert_eq!(core.widget::<Probe>(child)?.mouse_of(MouseAction::Wheel).len(), 3);
        Ok(())
    }

    #[test]
    fn shrinking_content_clamps_offset() -> Result<()> {
        let (mut core, view, child) = setup()?;
        core.mouse(MouseEvent::wheel((10, 10), -100))?;
        core.set_size(child, Size::new(150, 50))?;
        assert_eq!(core.widget::<ScrollView>(view)?.scroll_position(), Point::new(58, 0));
        Ok(())
    }

    #[test]
    fn thumb_proportions() {
        assert_eq!(thumb_span(100, 100, 200, 0, 100), (0, 50));
        assert_eq!(thumb_span(100, 100, 200, 100, 100), (50, 50));
        assert_eq!(thumb_span(100, 100, 0, 0, 0), (0, 100));
    }
}

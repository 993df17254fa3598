use crate::{
    Context, ViewContext,
    error::Result,
    event::{Cursor, Event, MouseAction, MouseButton, MouseEvent},
    geom::{Anchor, Point, Rect, Size},
    layout::LayoutCtx,
    options::{FormSkin, Options},
    render::Frame,
    widget::{EventOutcome, Widget},
};

/// Smallest outer size a form accepts, in addition to the node's limits.
const MIN_SIZE: Size = Size { w: 64, h: 32 };

/// What a left drag on the form does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragOp {
    /// Title bar: move the form.
    Move,
    /// Top-left corner.
    ResizeNW,
    /// Top edge.
    ResizeN,
    /// Top-right corner.
    ResizeNE,
    /// Right edge.
    ResizeE,
    /// Bottom-right corner.
    ResizeSE,
    /// Bottom edge.
    ResizeS,
    /// Bottom-left corner.
    ResizeSW,
    /// Left edge.
    ResizeW,
}

impl DragOp {
    /// Pointer shape shown over the zone.
    fn cursor(self) -> Cursor {
        match self {
            Self::Move => Cursor::Move,
            Self::ResizeNW | Self::ResizeSE => Cursor::ResizeNwSe,
            Self::ResizeNE | Self::ResizeSW => Cursor::ResizeNeSw,
            Self::ResizeN | Self::ResizeS => Cursor::ResizeNs,
            Self::ResizeE | Self::ResizeW => Cursor::ResizeWe,
        }
    }
}

/// Geometry to return to when a maximized form is restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Restore {
    /// Outer rectangle before maximizing.
    outer: Rect,
    /// Anchors before maximizing.
    anchor: Anchor,
}

/// A floating window with a title bar. It stays inside its parent's
/// content area, moves by its title, resizes by its borders and toggles
/// maximized on a title double click.
#[derive(Debug)]
pub struct Form {
    /// Title text.
    title: String,
    /// Skin override used while focused.
    skin_active: Option<FormSkin>,
    /// Skin override used while unfocused.
    skin_inactive: Option<FormSkin>,
    /// Drag in progress.
    drag: Option<DragOp>,
    /// Pointer position when the drag started, in outer space.
    grab: Point,
    /// Title bar, in outer space.
    title_rect: Rect,
    /// Effective minimum size from the last layout.
    min: Size,
    /// Pre-maximize geometry, while maximized.
    restore: Option<Restore>,
}

impl Default for Form {
    fn default() -> Self {
        Self::new("")
    }
}

impl Form {
    /// Construct a form with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            skin_active: None,
            skin_inactive: None,
            drag: None,
            grab: Point::zero(),
            title_rect: Rect::zero(),
            min: MIN_SIZE,
            restore: None,
        }
    }

    /// Build a form with its own skins.
    pub fn with_skins(mut self, active: FormSkin, inactive: FormSkin) -> Self {
        self.skin_active = Some(active);
        self.skin_inactive = Some(inactive);
        self
    }

    /// Title text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the title. The node needs a layout pass afterwards.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Is the form maximized?
    pub fn maximized(&self) -> bool {
        self.restore.is_some()
    }

    /// Title bar in the node's outer space.
    pub fn title_rect(&self) -> Rect {
        self.title_rect
    }

    /// The skin for the current focus state.
    fn skin(&self, options: &Options, focused: bool) -> FormSkin {
        if focused {
            self.skin_active.unwrap_or(options.skin.form_active)
        } else {
            self.skin_inactive.unwrap_or(options.skin.form_inactive)
        }
    }

    /// Maximize to the parent's content area, or restore.
    pub fn set_maximized(&mut self, maximize: bool, ctx: &mut dyn Context) -> Result<()> {
        if maximize == self.maximized() {
            return Ok(());
        }
        let id = ctx.node_id();
        if let Some(restore) = self.restore.take() {
            ctx.set_anchor(id, restore.anchor)?;
            ctx.set_outer(id, restore.outer)?;
            return Ok(());
        }
        let Some(parent) = ctx.parent_inner() else {
            return Ok(());
        };
        let anchor = ctx.node(id).map_or_else(Anchor::default, |n| n.anchor());
        self.restore = Some(Restore {
            outer: ctx.outer(),
            anchor,
        });
        ctx.set_anchor(id, Anchor::ALL)?;
        ctx.set_outer(id, Rect::from_parts(Point::zero(), parent.size()))
    }

    /// Which drag a left press at `p` starts.
    fn hit_op(&self, p: Point, outer: Size, skin: &FormSkin) -> Option<DragOp> {
        if self.title_rect.contains(p) {
            return Some(DragOp::Move);
        }
        let (w, h) = (outer.w as i32, outer.h as i32);
        let b = skin.border;
        let top = p.y < b.top as i32;
        let bottom = p.y >= h - b.bottom as i32;
        if p.x < b.left as i32 {
            Some(if top {
                DragOp::ResizeNW
            } else if bottom {
                DragOp::ResizeSW
            } else {
                DragOp::ResizeW
            })
        } else if p.x >= w - b.right as i32 {
            Some(if top {
                DragOp::ResizeNE
            } else if bottom {
                DragOp::ResizeSE
            } else {
                DragOp::ResizeE
            })
        } else if top {
            Some(DragOp::ResizeN)
        } else if bottom {
            Some(DragOp::ResizeS)
        } else {
            None
        }
    }

    /// Apply a drag step. `p` is the pointer in outer space.
    fn drag_to(&mut self, op: DragOp, p: Point, ctx: &mut dyn Context) -> Result<()> {
        let outer = ctx.outer();
        let p = match ctx.parent_inner() {
            Some(parent) => Point::new(
                (p.x + outer.tl.x).clamp(0, parent.w as i32) - outer.tl.x,
                (p.y + outer.tl.y).clamp(0, parent.h as i32) - outer.tl.y,
            ),
            None => p,
        };
        let dx = p.x - self.grab.x;
        let dy = p.y - self.grab.y;

        if op == DragOp::Move {
            let Some(restore) = self.restore else {
                return ctx.set_own_outer(outer.translate(Point::new(dx, dy)));
            };
            let threshold = ctx.options().maximize_drag_threshold as i32;
            if dx.abs().max(dy.abs()) > threshold {
                // Restore under the pointer, grabbed at the middle of the title.
                self.restore = None;
                self.grab.x = (restore.outer.w / 2) as i32;
                let at = outer.tl + p - self.grab;
                let id = ctx.node_id();
                ctx.set_anchor(id, restore.anchor)?;
                ctx.set_own_outer(restore.outer.at(at))?;
            }
            return Ok(());
        }

        let max = ctx
            .node(ctx.node_id())
            .map_or(Size::MAX, |n| n.size_max());
        let max_w = i32::try_from(max.w).unwrap_or(i32::MAX).max(self.min.w as i32);
        let max_h = i32::try_from(max.h).unwrap_or(i32::MAX).max(self.min.h as i32);
        let (w, h) = (outer.w as i32, outer.h as i32);
        // Near edges move the origin, which keeps the grab point in place.
        // Far edges move under the pointer, so the grab follows them.
        let near_w = (w - dx).clamp(self.min.w as i32, max_w);
        let near_h = (h - dy).clamp(self.min.h as i32, max_h);
        let far_w = (w + dx).clamp(self.min.w as i32, max_w);
        let far_h = (h + dy).clamp(self.min.h as i32, max_h);
        let (x, y) = (outer.tl.x, outer.tl.y);
        let (x, y, nw, nh) = match op {
            DragOp::ResizeNW => (x + w - near_w, y + h - near_h, near_w, near_h),
            DragOp::ResizeN => (x, y + h - near_h, w, near_h),
            DragOp::ResizeNE => (x, y + h - near_h, far_w, near_h),
            DragOp::ResizeE => (x, y, far_w, h),
            DragOp::ResizeSE => (x, y, far_w, far_h),
            DragOp::ResizeS => (x, y, w, far_h),
            DragOp::ResizeSW => (x + w - near_w, y, near_w, far_h),
            DragOp::ResizeW => (x + w - near_w, y, near_w, h),
            DragOp::Move => (x, y, w, h),
        };
        if matches!(op, DragOp::ResizeNE | DragOp::ResizeE | DragOp::ResizeSE) {
            self.grab.x += nw - w;
        }
        if matches!(op, DragOp::ResizeSE | DragOp::ResizeS | DragOp::ResizeSW) {
            self.grab.y += nh - h;
        }
        ctx.set_own_outer(Rect::new(x, y, nw as u32, nh as u32))
    }

    /// Handle a pointer event in outer space.
    /// The drag a left press at `p` would start, if the form allows it.
    fn allowed_op(&self, p: Point, outer: Size, skin: &FormSkin, auto_size: bool) -> Option<DragOp> {
        self.hit_op(p, outer, skin)
            .filter(|op| *op == DragOp::Move || !(auto_size || self.maximized()))
    }

    fn mouse(&mut self, m: &MouseEvent, ctx: &mut dyn Context) -> Result<EventOutcome> {
        if m.button.is_some_and(|b| b != MouseButton::Left) {
            return Ok(EventOutcome::Ignore);
        }
        let auto_size = ctx.node(ctx.node_id()).is_some_and(|n| n.auto_size());
        match m.action {
            MouseAction::Down => {
                let skin = self.skin(ctx.options(), ctx.has_focus());
                let Some(op) = self.hit_op(m.location, ctx.outer().size(), &skin) else {
                    return Ok(EventOutcome::Ignore);
                };
                if (auto_size || self.maximized()) && op != DragOp::Move {
                    return Ok(EventOutcome::Handle);
                }
                ctx.set_cursor(op.cursor());
                self.grab = m.location;
                self.drag = Some(op);
                ctx.set_dragged(true)?;
                Ok(EventOutcome::Handle)
            }
            MouseAction::Up => {
                if self.drag.take().is_some() {
                    ctx.set_dragged(false)?;
                    return Ok(EventOutcome::Handle);
                }
                Ok(EventOutcome::Ignore)
            }
            MouseAction::Move => match self.drag {
                Some(op) => {
                    ctx.set_cursor(op.cursor());
                    self.drag_to(op, m.location, ctx)?;
                    Ok(EventOutcome::Handle)
                }
                None => {
                    let skin = self.skin(ctx.options(), ctx.has_focus());
                    let hover = self.allowed_op(m.location, ctx.outer().size(), &skin, auto_size);
                    ctx.set_cursor(hover.map_or(Cursor::Default, DragOp::cursor));
                    Ok(EventOutcome::Ignore)
                }
            },
            MouseAction::DoubleClick => {
                if self.drag.take().is_some() {
                    ctx.set_dragged(false)?;
                }
                if !auto_size && ctx.parent().is_some() && self.title_rect.contains(m.location) {
                    let maximize = !self.maximized();
                    self.set_maximized(maximize, ctx)?;
                    return Ok(EventOutcome::Handle);
                }
                Ok(EventOutcome::Ignore)
            }
            MouseAction::Wheel => Ok(EventOutcome::Ignore),
        }
    }
}

impl Widget for Form {
    fn overlay(&self) -> bool {
        true
    }

    fn initial_size(&self) -> Size {
        Size::new(100, 100)
    }

    fn layout(&mut self, ctx: &mut LayoutCtx) -> Result<()> {
        let skin = self.skin(ctx.options(), ctx.has_focus());
        let b = skin.border;
        let title_h = match ctx.text() {
            Some(text) => text
                .measure(&self.title, None)
                .h
                .saturating_add(skin.title_padding.vertical()),
            None => skin.title_height,
        };
        // The title bar sits between the top border and a separator of the
        // same width.
        let chrome_h = b.vertical().saturating_add(title_h).saturating_add(b.top);

        let (size_min, size_max) = (ctx.size_min(), ctx.size_max());
        self.min = Size::new(
            size_min.w.max(MIN_SIZE.w),
            size_min.h.max(MIN_SIZE.h).max(chrome_h),
        );
        let mut size = if ctx.auto_size() {
            let extent = ctx.children_extent();
            if ctx.children().is_empty() {
                Size::zero()
            } else {
                Size::new(
                    extent.w.saturating_add(b.horizontal()),
                    extent.h.saturating_add(chrome_h),
                )
            }
        } else {
            ctx.outer().size()
        };
        size = size.clamp(self.min, size_max);

        let mut outer = ctx.outer().with_size(size);
        if let Some(parent) = ctx.parent_inner() {
            let w = outer.w.min(parent.w);
            let h = outer.h.min(parent.h);
            let x = outer.tl.x.min(parent.w as i32 - w as i32).max(0);
            let y = outer.tl.y.min(parent.h as i32 - h as i32).max(0);
            outer = Rect::new(x, y, w, h);
        }
        ctx.set_outer(outer);

        let inner_top = b.top.saturating_add(title_h).saturating_add(b.top);
        ctx.set_inner(Rect::new(
            b.left as i32,
            inner_top as i32,
            outer.w.saturating_sub(b.horizontal()),
            outer.h.saturating_sub(chrome_h),
        ));
        self.title_rect = Rect::new(
            b.left as i32,
            b.top as i32,
            outer.w.saturating_sub(b.horizontal()),
            title_h,
        );
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, ctx: &dyn ViewContext) -> Result<()> {
        let skin = self.skin(ctx.options(), ctx.has_focus());
        frame.fill_all(skin.border_color);
        frame.fill(ctx.inner(), skin.background_color);
        let at = self.title_rect.tl + Point::new(skin.title_padding.left as i32, skin.title_padding.top as i32);
        frame.text(at, &self.title, skin.title_color);
        Ok(())
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        match event {
            Event::Mouse(m) => self.mouse(m, ctx),
            Event::Focus | Event::FocusLost => {
                ctx.invalidate_self()?;
                Ok(EventOutcome::Ignore)
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Core, NodeId, testing::probe::Probe};

    /// A 400x300 root with a form at (100, 100) sized 120x80.
    fn setup() -> Result<(Core, NodeId)> {
        let mut core = Core::new(Size::new(400, 300), Options::default())?;
        let root = core.root();
        let form = core
            .build(Form::new("Tools"))?
            .outer(Rect::new(100, 100, 120, 80))
            .attach(root)?;
        Ok((core, form))
    }

    fn drag(core: &mut Core, from: (i32, i32), to: (i32, i32)) -> Result<()> {
        core.mouse(MouseEvent::down(MouseButton::Left, from))?;
        core.mouse(MouseEvent::moved(to))?;
        core.mouse(MouseEvent::up(MouseButton::Left, to))?;
        Ok(())
    }

    #[test]
    fn chrome_layout() -> Result<()> {
        let (core, form) = setup()?;
        let node = core.node(form)?;
        // Border 2, title 14, separator 2.
        assert_eq!(node.inner(), Rect::new(2, 18, 116, 60));
        assert_eq!(core.widget::<Form>(form)?.title_rect(), Rect::new(2, 2, 116, 14));
        Ok(())
    }

    #[test]
    fn cursor_follows_zones() -> Result<()> {
        let (mut core, form) = setup()?;
        let shape = |core: &mut Core, at: (i32, i32)| -> Result<Cursor> {
            core.mouse(MouseEvent::moved(at))?;
            Ok(core.cursor())
        };
        assert_eq!(shape(&mut core, (50, 50))?, Cursor::Default);
        assert_eq!(shape(&mut core, (110, 105))?, Cursor::Move);
        assert_eq!(shape(&mut core, (219, 179))?, Cursor::ResizeNwSe);
        assert_eq!(shape(&mut core, (219, 100))?, Cursor::ResizeNeSw);
        assert_eq!(shape(&mut core, (150, 100))?, Cursor::ResizeNs);
        assert_eq!(shape(&mut core, (100, 140))?, Cursor::ResizeWe);
        assert_eq!(shape(&mut core, (150, 150))?, Cursor::Default);

        // Entering a child resets the shape.
        core.build(Probe::new())?
            .outer(Rect::new(0, 0, 20, 20))
            .attach(form)?;
        shape(&mut core, (150, 100))?;
        assert_eq!(shape(&mut core, (110, 125))?, Cursor::Default);

        // A drag keeps its shape wherever the pointer goes.
        core.mouse(MouseEvent::moved((100, 140)))?;
        core.mouse(MouseEvent::down(MouseButton::Left, (100, 140)))?;
        assert_eq!(shape(&mut core, (60, 200))?, Cursor::ResizeWe);
        core.mouse(MouseEvent::up(MouseButton::Left, (60, 200)))?;
        Ok(())
    }

    #[test]
    fn autosized_forms_only_offer_the_move_cursor() -> Result<()> {
        let (mut core, form) = setup()?;
        core.set_auto_size(form, true)?;
        let outer = core.node(form)?.outer();
        let corner = outer.tl + Point::new(outer.w as i32 - 1, outer.h as i32 - 1);
        core.mouse(MouseEvent::moved(corner))?;
        assert_eq!(core.cursor(), Cursor::Default);
        core.mouse(MouseEvent::moved(outer.tl + Point::new(10, 5)))?;
        assert_eq!(core.cursor(), Cursor::Move);
        Ok(())
    }

    #[test]
    fn title_drag_moves() -> Result<()> {
        let (mut core, form) = setup()?;
        drag(&mut core, (110, 105), (140, 125))?;
        assert_eq!(core.node(form)?.outer(), Rect::new(130, 120, 120, 80));
        assert!(!core.node(form)?.dragged());
        Ok(())
    }

    #[test]
    fn moving_stays_inside_parent() -> Result<()> {
        let (mut core, form) = setup()?;
        drag(&mut core, (110, 105), (-500, -500))?;
        assert_eq!(core.node(form)?.outer().tl, Point::new(0, 0));
        drag(&mut core, (10, 5), (1000, 1000))?;
        assert_eq!(core.node(form)?.outer().tl, Point::new(280, 220));
        Ok(())
    }

    #[test]
    fn corner_resize_honors_minimum() -> Result<()> {
        let (mut core, form) = setup()?;
        // Bottom-right corner pixel is (219, 179).
        drag(&mut core, (219, 179), (239, 189))?;
        assert_eq!(core.node(form)?.outer(), Rect::new(100, 100, 140, 90));
        drag(&mut core, (239, 189), (101, 101))?;
        assert_eq!(core.node(form)?.outer().size(), Size::new(64, 32));
        Ok(())
    }

    #[test]
    fn left_edge_resize_moves_near_edge() -> Result<()> {
        let (mut core, form) = setup()?;
        drag(&mut core, (100, 140), (80, 140))?;
        assert_eq!(core.node(form)?.outer(), Rect::new(80, 100, 140, 80));
        Ok(())
    }

    #[test]
    fn double_click_maximizes_and_restores() -> Result<()> {
        let (mut core, form) = setup()?;
        let title = (110, 105);
        core.mouse(MouseEvent::down(MouseButton::Left, title))?;
        core.mouse(MouseEvent::double_click(MouseButton::Left, title))?;
        core.mouse(MouseEvent::up(MouseButton::Left, title))?;
        assert!(core.widget::<Form>(form)?.maximized());
        assert_eq!(core.node(form)?.outer(), Rect::new(0, 0, 400, 300));
        assert_eq!(core.node(form)?.anchor(), Anchor::ALL);

        core.set_client_size(Size::new(500, 350))?;
        assert_eq!(core.node(form)?.outer(), Rect::new(0, 0, 500, 350));

        core.mouse(MouseEvent::down(MouseButton::Left, (10, 5)))?;
        core.mouse(MouseEvent::double_click(MouseButton::Left, (10, 5)))?;
        assert!(!core.widget::<Form>(form)?.maximized());
        assert_eq!(core.node(form)?.outer(), Rect::new(100, 100, 120, 80));
        assert_eq!(core.node(form)?.anchor(), Anchor::default());
        Ok(())
    }

    #[test]
    fn dragging_maximized_restores_past_threshold() -> Result<()> {
        let (mut core, form) = setup()?;
        core.with_widget::<Form, _>(form, |f, ctx| f.set_maximized(true, ctx))?;
        core.mouse(MouseEvent::down(MouseButton::Left, (50, 5)))?;
        core.mouse(MouseEvent::moved((55, 8)))?;
        assert!(core.widget::<Form>(form)?.maximized());
        core.mouse(MouseEvent::moved((80, 5)))?;
        assert!(!core.widget::<Form>(form)?.maximized());
        // Pointer at (80, 5), grabbed at the title's middle.
        assert_eq!(core.node(form)?.outer(), Rect::new(20, 0, 120, 80));
        Ok(())
    }

    #[test]
    fn clicking_promotes_to_front() -> Result<()> {
        let (mut core, a) = setup()?;
        let root = core.root();
        let b = core
            .build(Form::new("B"))?
            .outer(Rect::new(150, 120, 100, 100))
            .attach(root)?;
        core.add_new(root, Probe::new())?;
        assert_eq!(core.children(root)?[0], b);

        core.mouse(MouseEvent::down(MouseButton::Left, (200, 200)))?;
        assert!(core.node(b)?.has_focus());
        core.mouse(MouseEvent::down(MouseButton::Left, (105, 150)))?;
        assert_eq!(core.children(root)?[0], a);
        assert!(core.node(a)?.has_focus());
        assert!(!core.node(b)?.has_focus());
        core.validate()
    }

    #[test]
    fn autosized_form_wraps_children_and_only_moves() -> Result<()> {
        let mut core = Core::new(Size::new(400, 300), Options::default())?;
        let root = core.root();
        let form = core
            .build(Form::new("Auto"))?
            .at(10, 10)
            .auto_size(true)
            .attach(root)?;
        core.build(Probe::new())?.outer(Rect::new(0, 0, 100, 50)).attach(form)?;
        // 100 + 4 wide, 50 + 20 of chrome tall.
        assert_eq!(core.node(form)?.outer(), Rect::new(10, 10, 104, 70));

        // The bottom-right corner does nothing.
        drag(&mut core, (113, 79), (150, 120))?;
        assert_eq!(core.node(form)?.outer(), Rect::new(10, 10, 104, 70));
        Ok(())
    }
}

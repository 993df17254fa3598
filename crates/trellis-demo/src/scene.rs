use std::time::{Duration, Instant};

use tracing::info;
use trellis::{
    Core, Gui, HostEvent, NodeId, Options,
    error::{Error, Result},
    event::{MouseButton, key::Ctrl},
    geom::{Anchor, Orientation, Point, Rect, Size},
    options::Color,
    widgets::{ContextMenu, Flow, FlowDirection, Form, Group, MenuItem, ScrollView, Split},
};

use crate::swatch::Swatch;

/// Gap between scripted gestures, wider than any double-click window.
const GESTURE_GAP: u64 = 1000;
/// Gap between the two presses of a double click.
const DOUBLE_GAP: u64 = 100;
/// Where the "Center inspector" menu entry puts the form.
const CENTERED: Rect = Rect {
    tl: Point { x: 160, y: 100 },
    w: 160,
    h: 120,
};

/// Palette for the sample swatches.
const PALETTE: [Color; 4] = [
    Color::rgb(200, 60, 60),
    Color::rgb(60, 160, 60),
    Color::rgb(60, 90, 200),
    Color::rgb(200, 170, 40),
];

/// Center of a rectangle.
fn center(r: Rect) -> Point {
    Point::new(r.tl.x + (r.w / 2) as i32, r.tl.y + (r.h / 2) as i32)
}

/// The sample tree: a bordered group holding a split with a flow on one
/// side and a scroll view on the other, a floating form, and a context
/// menu on the root.
pub struct Scene {
    /// The controller.
    pub gui: Gui,
    /// Bordered group anchored to every edge of the root.
    pub group: NodeId,
    /// Split filling the group.
    pub split: NodeId,
    /// Scroll view in the split's second slot.
    pub scroll: NodeId,
    /// Floating form.
    pub form: NodeId,
    /// Context menu attached to the root.
    pub menu: NodeId,
    /// Swatches in the flow, in order.
    pub swatches: Vec<NodeId>,
    /// Timestamp of the last scripted event.
    now: Instant,
}

impl Scene {
    /// Build the sample tree in a client area of the given size.
    pub fn build(client: Size, options: Options) -> Result<Self> {
        let mut gui = Gui::new(client, options)?;
        let root = gui.root();
        let (group, split, scroll, form, menu, swatches) = gui.batch(|core| {
            let group = core
                .build(Group::new())?
                .outer(Rect::new(8, 8, 300, 200))
                .anchor(Anchor::ALL)
                .attach(root)?;
            core.set_name(group, "workspace")?;
            let inner = core.node(group)?.inner().size();
            let split = core
                .build(Split::new(Orientation::Vertical))?
                .outer(Rect::from_parts(Point::zero(), inner))
                .anchor(Anchor::ALL)
                .attach(group)?;

            let flow = core.add_new(split, Flow::new(FlowDirection::TopDown))?;
            let mut swatches = Vec::new();
            for color in PALETTE {
                swatches.push(core.add_new(flow, Swatch::new(color))?);
            }

            let scroll = ScrollView::install(core, ScrollView::new())?;
            core.add(split, scroll)?;
            for i in 0..12 {
                core.build(Swatch::new(PALETTE[i % PALETTE.len()]))?
                    .at(0, (i * 28) as i32)
                    .attach(scroll)?;
            }

            let form = core
                .build(Form::new("Inspector"))?
                .outer(Rect::new(300, 150, 160, 120))
                .attach(root)?;
            let tools = core.add_new(form, Flow::new(FlowDirection::LeftToRight))?;
            core.add_new(tools, Swatch::new(PALETTE[0]))?;
            core.add_new(tools, Swatch::new(PALETTE[2]))?;

            let menu = context_menu(core, form)?;
            core.set_context_menu(root, Some(menu))?;
            Ok((group, split, scroll, form, menu, swatches))
        })?;
        info!(nodes = gui.core().len(), "scene built");
        Ok(Self {
            gui,
            group,
            split,
            scroll,
            form,
            menu,
            swatches,
            now: Instant::now(),
        })
    }

    /// Deliver one host event `after_ms` after the previous one.
    fn send(&mut self, event: HostEvent, after_ms: u64) -> Result<bool> {
        self.now += Duration::from_millis(after_ms);
        self.gui.event_at(event, self.now)
    }

    /// Press and release the left button at a root-space point.
    fn click(&mut self, p: Point, after_ms: u64) -> Result<bool> {
        self.send(HostEvent::MouseMove(p), after_ms)?;
        let down = self.send(HostEvent::MouseDown(MouseButton::Left, p), 0)?;
        let up = self.send(HostEvent::MouseUp(MouseButton::Left, p), 0)?;
        Ok(down || up)
    }

    /// Press, move by `by` and release.
    fn drag(&mut self, from: Point, by: Point) -> Result<bool> {
        let to = from + by;
        self.send(HostEvent::MouseMove(from), GESTURE_GAP)?;
        let down = self.send(HostEvent::MouseDown(MouseButton::Left, from), 0)?;
        self.send(HostEvent::MouseMove(to), 16)?;
        self.send(HostEvent::MouseUp(MouseButton::Left, to), 16)?;
        Ok(down)
    }

    /// Center of the form's title bar in root space.
    fn form_title(&self) -> Result<Point> {
        let core = self.gui.core();
        let title = core.widget::<Form>(self.form)?.title_rect();
        core.to_root(self.form, center(title))
    }

    /// Replay the demo gesture script. Returns the number of gestures a
    /// widget claimed.
    pub fn replay(&mut self) -> Result<usize> {
        let mut handled = 0;

        let swatch = center(self.gui.core().root_rect(self.swatches[0])?);
        info!(?swatch, "click a swatch twice, clear it, click again");
        handled += usize::from(self.click(swatch, GESTURE_GAP)?);
        handled += usize::from(self.click(swatch, GESTURE_GAP)?);
        handled += usize::from(self.send(HostEvent::KeyDown(Ctrl + 'r'), GESTURE_GAP)?);
        self.send(HostEvent::KeyUp(Ctrl + 'r'), 0)?;
        handled += usize::from(self.click(swatch, GESTURE_GAP)?);

        let core = self.gui.core();
        let bar = core.widget::<Split>(self.split)?.splitter();
        let bar = core.to_root(self.split, center(bar))?;
        info!(?bar, "drag the splitter");
        handled += usize::from(self.drag(bar, Point::new(40, 0))?);

        let view = center(self.gui.core().root_rect(self.scroll)?);
        info!(?view, "scroll the list");
        handled += usize::from(self.send(HostEvent::MouseWheel(view, -3), GESTURE_GAP)?);

        let free = Point::new(self.gui.core().root_rect(self.group)?.right() + 40, 40);
        info!(?free, "open the context menu");
        self.send(HostEvent::MouseMove(free), GESTURE_GAP)?;
        handled += usize::from(self.send(HostEvent::MouseDown(MouseButton::Right, free), 0)?);
        self.send(HostEvent::MouseUp(MouseButton::Right, free), 0)?;
        let item = self
            .gui
            .core()
            .children(self.menu)?
            .first()
            .copied()
            .ok_or_else(|| Error::InvalidOperation("context menu is empty".into()))?;
        let item = center(self.gui.core().root_rect(item)?);
        handled += usize::from(self.click(item, GESTURE_GAP)?);

        let title = self.form_title()?;
        info!(?title, "drag the form");
        handled += usize::from(self.drag(title, Point::new(30, 20))?);

        for _ in 0..2 {
            let title = self.form_title()?;
            info!(?title, "double click the title");
            self.click(title, GESTURE_GAP)?;
            handled += usize::from(self.click(title, DOUBLE_GAP)?);
        }

        let client = self.gui.core().node(self.gui.root())?.outer().size();
        let grown = client.grow(160, 80);
        info!(?grown, "resize the window");
        self.send(HostEvent::Resize(grown), GESTURE_GAP)?;
        Ok(handled)
    }

    /// One line per node: depth-indented name and outer rectangle.
    pub fn outline(&self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        outline(self.gui.core(), self.gui.root(), 0, &mut lines)?;
        Ok(lines)
    }
}

/// The root's context menu.
fn context_menu(core: &mut Core, form: NodeId) -> Result<NodeId> {
    let menu = core.create(ContextMenu::new())?;
    core.add_new(
        menu,
        MenuItem::new("Center inspector").with_action(move |ctx| ctx.set_outer(form, CENTERED)),
    )?;
    core.add_new(menu, MenuItem::new("Dismiss"))?;
    Ok(menu)
}

/// Append `id` and its subtree to `lines`.
fn outline(core: &Core, id: NodeId, depth: usize, lines: &mut Vec<String>) -> Result<()> {
    let node = core.node(id)?;
    let r = node.outer();
    lines.push(format!(
        "{:indent$}{} {},{} {}x{}",
        "",
        node.name(),
        r.tl.x,
        r.tl.y,
        r.w,
        r.h,
        indent = depth * 2
    ));
    for child in node.children() {
        outline(core, *child, depth + 1, lines)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use trellis::testing::backend::RecordingBackend;

    use super::*;

    #[test]
    fn script_exercises_the_scene() -> Result<()> {
        let mut scene = Scene::build(Size::new(480, 320), Options::default())?;
        scene.gui.core().validate()?;
        scene.replay()?;
        let core = scene.gui.core();
        core.validate()?;

        assert_eq!(core.widget::<Swatch>(scene.swatches[0])?.clicks(), 1);
        assert!(core.widget::<Split>(scene.split)?.position() > 0.5);
        assert!(core.widget::<ScrollView>(scene.scroll)?.scroll_position().y > 0);
        assert_eq!(core.popup(), None);

        // Centered by the menu, dragged, then maximized and restored.
        let form = core.widget::<Form>(scene.form)?;
        assert!(!form.maximized());
        assert_eq!(core.node(scene.form)?.outer(), CENTERED.translate(Point::new(30, 20)));

        // The group follows the window on every edge.
        assert_eq!(core.node(scene.group)?.outer(), Rect::new(8, 8, 460, 280));
        Ok(())
    }

    #[test]
    fn outline_lists_every_attached_node() -> Result<()> {
        let mut scene = Scene::build(Size::new(480, 320), Options::default())?;
        let lines = scene.outline()?;
        assert!(lines[0].starts_with("Root"));
        assert!(lines.iter().any(|l| l.trim_start().starts_with("workspace")));
        // The menu is not attached until it opens.
        assert!(!lines.iter().any(|l| l.contains("MenuItem")));

        let mut backend = RecordingBackend::new();
        scene.gui.render(&mut backend)?;
        assert!(!backend.fills().is_empty());
        Ok(())
    }
}

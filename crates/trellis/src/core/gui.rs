use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::{
    dispose::Disposer,
    error::Result,
    event::{Cursor, Key, KeyEvent, MouseButton, MouseEvent},
    id::NodeId,
    options::Options,
    render::DrawBackend,
    text::TextEngine,
    world::Core,
};
use crate::geom::{Point, Size};

/// Input as the host window reports it. Positions are in client space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Pointer moved.
    MouseMove(Point),
    /// Button pressed.
    MouseDown(MouseButton, Point),
    /// Button released.
    MouseUp(MouseButton, Point),
    /// Wheel turned by a number of notches.
    MouseWheel(Point, i32),
    /// Key pressed.
    KeyDown(Key),
    /// Key released.
    KeyUp(Key),
    /// Text input.
    Char(char),
    /// Client area resized.
    Resize(Size),
}

/// Timing for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Time since the previous frame; zero for the first.
    pub delta: Duration,
    /// Time spent in the render traversal.
    pub render_time: Duration,
    /// Resources released before painting.
    pub released: usize,
}

/// The root controller: owns the tree, translates host input, times frames
/// and mediates the single live popup.
pub struct Gui {
    /// The control tree.
    core: Core,
    /// Pending resource releases.
    disposer: Disposer,
    /// Start of the previous frame.
    last_frame: Option<Instant>,
    /// Duration of the previous render traversal.
    last_render: Duration,
    /// Time of the last left press that could start a double click.
    last_click: Option<Instant>,
}

impl Gui {
    /// Construct a controller whose root covers the client area.
    pub fn new(client: Size, options: Options) -> Result<Self> {
        debug!(w = client.w, h = client.h, "gui created");
        Ok(Self {
            core: Core::new(client, options)?,
            disposer: Disposer::new(),
            last_frame: None,
            last_render: Duration::ZERO,
            last_click: None,
        })
    }

    /// The control tree.
    pub fn core(&self) -> &Core {
        &self.core
    }

    /// The control tree, mutably.
    pub fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    /// Root node id.
    pub fn root(&self) -> NodeId {
        self.core.root()
    }

    /// A handle for queueing resource releases from any thread.
    pub fn disposer(&self) -> Disposer {
        self.disposer.clone()
    }

    /// Install a text engine.
    pub fn set_text_engine(&mut self, engine: impl TextEngine + 'static) {
        self.core.set_text_engine(engine);
    }

    /// Pointer shape the host should show.
    pub fn cursor(&self) -> Cursor {
        self.core.cursor()
    }

    /// Duration of the previous render traversal.
    pub fn last_render_time(&self) -> Duration {
        self.last_render
    }

    /// Translate a host event. Returns whether a widget handled it.
    pub fn event(&mut self, event: HostEvent) -> Result<bool> {
        self.event_at(event, Instant::now())
    }

    /// Translate a host event that occurred at `now`.
    pub fn event_at(&mut self, event: HostEvent, now: Instant) -> Result<bool> {
        trace!(?event, "host event");
        match event {
            HostEvent::MouseMove(p) => self.core.mouse(MouseEvent::moved(p)),
            HostEvent::MouseDown(button, p) => {
                let handled = self.core.mouse(MouseEvent::down(button, p))?;
                if button != MouseButton::Left {
                    return Ok(handled);
                }
                let window = Duration::from_millis(self.core.options().double_click);
                match self.last_click.take() {
                    Some(prev) if now.saturating_duration_since(prev) <= window => {
                        let double = self.core.mouse(MouseEvent::double_click(button, p))?;
                        Ok(handled || double)
                    }
                    _ => {
                        self.last_click = Some(now);
                        Ok(handled)
                    }
                }
            }
            HostEvent::MouseUp(button, p) => self.core.mouse(MouseEvent::up(button, p)),
            HostEvent::MouseWheel(p, notches) => self.core.mouse(MouseEvent::wheel(p, notches)),
            HostEvent::KeyDown(key) => self.core.key(KeyEvent::down(key)),
            HostEvent::KeyUp(key) => self.core.key(KeyEvent::up(key)),
            HostEvent::Char(c) => self.core.char(c),
            HostEvent::Resize(size) => {
                self.core.set_client_size(size)?;
                Ok(false)
            }
        }
    }

    /// Paint one frame: release queued resources, then run the render
    /// traversal.
    pub fn render(&mut self, backend: &mut dyn DrawBackend) -> Result<FrameStats> {
        self.render_at(backend, Instant::now())
    }

    /// Paint one frame that starts at `now`.
    pub fn render_at(&mut self, backend: &mut dyn DrawBackend, now: Instant) -> Result<FrameStats> {
        let delta = self
            .last_frame
            .map_or(Duration::ZERO, |prev| now.saturating_duration_since(prev));
        self.last_frame = Some(now);
        let released = self.disposer.drain(backend);
        let start = Instant::now();
        self.core.render(backend, delta)?;
        self.last_render = start.elapsed();
        trace!(?delta, render = ?self.last_render, "frame");
        Ok(FrameStats {
            delta,
            render_time: self.last_render,
            released,
        })
    }

    /// Increment the layout suspension depth.
    pub fn suspend_layout(&mut self) {
        self.core.suspend_layout();
    }

    /// Decrement the layout suspension depth. When it reaches zero the whole
    /// tree is laid out once.
    pub fn resume_layout(&mut self) -> Result<()> {
        self.core.resume_layout()?;
        if !self.core.layout_suspended() {
            let root = self.core.root();
            self.core.relayout(root)?;
        }
        Ok(())
    }

    /// Run `f` with layout suspended, then lay out the tree once.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Core) -> Result<R>) -> Result<R> {
        let root = self.core.root();
        self.core.batch(root, f)
    }

    /// Open a popup at a client-space position, closing any other.
    pub fn open_popup(&mut self, menu: impl Into<NodeId>, at: Point) -> Result<()> {
        self.core.open_popup(menu, at)
    }

    /// Close the open popup. Returns whether one was open.
    pub fn close_popup(&mut self) -> Result<bool> {
        self.core.close_popup()
    }
}

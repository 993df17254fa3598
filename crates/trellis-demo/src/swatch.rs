use trellis::{
    Context, ViewContext,
    error::Result,
    event::{Event, KeyAction, MouseAction, MouseButton, key::Ctrl},
    geom::{Insets, Point, Size},
    options::Color,
    render::Frame,
    widget::{EventOutcome, Widget},
};

/// Outline drawn while the pointer is over a swatch.
const HOVER: Color = Color::rgb(255, 255, 255);

/// A solid block that counts left clicks. Ctrl-R on the focused swatch
/// clears the count.
#[derive(Debug)]
pub struct Swatch {
    /// Fill color.
    color: Color,
    /// Completed left clicks.
    clicks: usize,
    /// Pointer is over the swatch.
    hovered: bool,
}

impl Swatch {
    /// A swatch in the given color.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            clicks: 0,
            hovered: false,
        }
    }

    /// Left clicks received so far.
    pub fn clicks(&self) -> usize {
        self.clicks
    }

    /// Is the pointer over the swatch?
    pub fn hovered(&self) -> bool {
        self.hovered
    }
}

impl Widget for Swatch {
    fn initial_size(&self) -> Size {
        Size::new(40, 24)
    }

    fn render(&mut self, frame: &mut Frame, _ctx: &dyn ViewContext) -> Result<()> {
        if self.hovered {
            frame.fill_all(HOVER);
            let area = frame.area().deflate(Insets::uniform(1));
            frame.fill(area, self.color);
        } else {
            frame.fill_all(self.color);
        }
        if self.clicks > 0 {
            frame.text(Point::new(2, 2), &self.clicks.to_string(), HOVER);
        }
        Ok(())
    }

    fn on_event(&mut self, event: &Event, _ctx: &mut dyn Context) -> Result<EventOutcome> {
        match event {
            Event::MouseEnter => {
                self.hovered = true;
                Ok(EventOutcome::Ignore)
            }
            Event::MouseLeave => {
                self.hovered = false;
                Ok(EventOutcome::Ignore)
            }
            Event::Key(k) if k.action == KeyAction::Down && k.key == Ctrl + 'r' => {
                self.clicks = 0;
                Ok(EventOutcome::Handle)
            }
            Event::Mouse(m) if m.button == Some(MouseButton::Left) => match m.action {
                MouseAction::Down => Ok(EventOutcome::Handle),
                MouseAction::Up => {
                    self.clicks += 1;
                    Ok(EventOutcome::Handle)
                }
                _ => Ok(EventOutcome::Ignore),
            },
            _ => Ok(EventOutcome::Ignore),
        }
    }
}

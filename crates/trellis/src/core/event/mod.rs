//! Events delivered to widgets.

/// Keyboard input.
pub mod key;

use trellis_geom::Point;

pub use key::{Key, KeyAction, KeyCode, KeyEvent, Mods};

/// Mouse buttons.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button, opens context menus.
    Right,
    /// Middle button.
    Middle,
}

/// Pointer shape requested by the tree. The host reads it from
/// [`Gui::cursor`](crate::Gui::cursor) after each event.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub enum Cursor {
    /// The host's normal arrow.
    #[default]
    Default,
    /// Four-way move.
    Move,
    /// Diagonal resize, top-left to bottom-right.
    ResizeNwSe,
    /// Diagonal resize, top-right to bottom-left.
    ResizeNeSw,
    /// Vertical resize.
    ResizeNs,
    /// Horizontal resize.
    ResizeWe,
}

/// What happened to the pointer.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum MouseAction {
    /// Button pressed.
    Down,
    /// Button released.
    Up,
    /// Pointer moved.
    Move,
    /// Wheel turned; see [`MouseEvent::wheel`].
    Wheel,
    /// Second left press inside the double-click window.
    DoubleClick,
}

/// A pointer event. `location` is in the receiving node's outer space:
/// `(0, 0)` is the top-left corner of the node's outer rectangle.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct MouseEvent {
    /// Pointer action.
    pub action: MouseAction,
    /// Button involved, for press, release and double-click.
    pub button: Option<MouseButton>,
    /// Pointer position.
    pub location: Point,
    /// Wheel notches; positive is away from the user.
    pub wheel: i32,
}

impl MouseEvent {
    /// A button press.
    pub fn down(button: MouseButton, location: impl Into<Point>) -> Self {
        Self::with_button(MouseAction::Down, button, location.into())
    }

    /// A button release.
    pub fn up(button: MouseButton, location: impl Into<Point>) -> Self {
        Self::with_button(MouseAction::Up, button, location.into())
    }

    /// A pointer move.
    pub fn moved(location: impl Into<Point>) -> Self {
        Self {
            action: MouseAction::Move,
            button: None,
            location: location.into(),
            wheel: 0,
        }
    }

    /// A wheel turn.
    pub fn wheel(location: impl Into<Point>, notches: i32) -> Self {
        Self {
            action: MouseAction::Wheel,
            button: None,
            location: location.into(),
            wheel: notches,
        }
    }

    /// A double click.
    pub fn double_click(button: MouseButton, location: impl Into<Point>) -> Self {
        Self::with_button(MouseAction::DoubleClick, button, location.into())
    }

    /// Construct a button event.
    fn with_button(action: MouseAction, button: MouseButton, location: Point) -> Self {
        Self {
            action,
            button: Some(button),
            location,
            wheel: 0,
        }
    }

    /// The same event at another location.
    pub fn at(&self, location: Point) -> Self {
        Self { location, ..*self }
    }

    /// Is this a press of the given button?
    pub fn is_down(&self, button: MouseButton) -> bool {
        self.action == MouseAction::Down && self.button == Some(button)
    }

    /// Is this a release of the given button?
    pub fn is_up(&self, button: MouseButton) -> bool {
        self.action == MouseAction::Up && self.button == Some(button)
    }
}

/// Notification delivered to a widget's `on_event`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Event {
    /// A pointer event in the node's outer space.
    Mouse(MouseEvent),
    /// The pointer entered the node.
    MouseEnter,
    /// The pointer left the node.
    MouseLeave,
    /// A key transition along the focus chain.
    Key(KeyEvent),
    /// Text input along the focus chain.
    Char(char),
    /// The node joined the focus chain.
    Focus,
    /// The node left the focus chain.
    FocusLost,
    /// The node's inner rectangle changed. Delivered before children are
    /// re-anchored.
    Resize,
}

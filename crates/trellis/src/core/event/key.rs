//! Keyboard input as delivered by the host window.
use std::ops::Add;

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is active.
    pub shift: bool,
    /// Control is active.
    pub ctrl: bool,
    /// Alt is active.
    pub alt: bool,
}

impl Add<KeyCode> for Mods {
    type Output = Key;

    fn add(self, code: KeyCode) -> Self::Output {
        Key { mods: self, code }
    }
}

impl Add<char> for Mods {
    type Output = Key;

    fn add(self, c: char) -> Self::Output {
        Key {
            mods: self,
            code: KeyCode::Char(c),
        }
    }
}

impl Add<Self> for Mods {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
        }
    }
}

/// No modifiers pressed.
#[allow(non_upper_case_globals)]
pub const Empty: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: false,
};

/// Shift-only modifier state.
#[allow(non_upper_case_globals)]
pub const Shift: Mods = Mods {
    shift: true,
    ctrl: false,
    alt: false,
};

/// Control-only modifier state.
#[allow(non_upper_case_globals)]
pub const Ctrl: Mods = Mods {
    shift: false,
    ctrl: true,
    alt: false,
};

/// Alt-only modifier state.
#[allow(non_upper_case_globals)]
pub const Alt: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: true,
};

/// Key codes reported by the host.
#[derive(Debug, PartialEq, Hash, Eq, Clone, Copy)]
pub enum KeyCode {
    /// Backspace key.
    Backspace,
    /// Enter key.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Tab key.
    Tab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
    /// Function key.
    F(u8),
    /// A character key.
    Char(char),
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

/// A key plus its modifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Key {
    /// Modifier state.
    pub mods: Mods,
    /// Key code.
    pub code: KeyCode,
}

impl PartialEq<KeyCode> for Key {
    fn eq(&self, c: &KeyCode) -> bool {
        self.mods == Empty && *c == self.code
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Empty + c
    }
}

impl From<KeyCode> for Key {
    fn from(c: KeyCode) -> Self {
        Empty + c
    }
}

/// Press or release.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum KeyAction {
    /// Key pressed.
    Down,
    /// Key released.
    Up,
}

/// A key transition.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct KeyEvent {
    /// Press or release.
    pub action: KeyAction,
    /// The key.
    pub key: Key,
}

impl KeyEvent {
    /// A key press.
    pub fn down(key: impl Into<Key>) -> Self {
        Self {
            action: KeyAction::Down,
            key: key.into(),
        }
    }

    /// A key release.
    pub fn up(key: impl Into<Key>) -> Self {
        Self {
            action: KeyAction::Up,
            key: key.into(),
        }
    }
}

//! Interaction settings and skin records.
//!
//! Skins are plain data. The tree engine never interprets them; each
//! container widget reads its own record during layout and paint.

use serde::{Deserialize, Serialize};

use crate::{error::Result, geom::Insets};

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Does drawing with this color have any effect?
    pub fn is_visible(&self) -> bool {
        self.a != 0
    }
}

/// Skin for flow layouts and context menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowLayoutSkin {
    /// Border width per edge.
    pub border: Insets,
    /// Space between border and children.
    pub padding: Insets,
    /// Gap between consecutive children.
    pub space: u32,
    /// Border color.
    pub border_color: Color,
    /// Background color.
    pub background_color: Color,
}

impl Default for FlowLayoutSkin {
    fn default() -> Self {
        Self {
            border: Insets::uniform(0),
            padding: Insets::uniform(2),
            space: 2,
            border_color: Color::TRANSPARENT,
            background_color: Color::TRANSPARENT,
        }
    }
}

/// Skin for group panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupLayoutSkin {
    /// Border width per edge.
    pub border: Insets,
    /// Border color.
    pub border_color: Color,
    /// Background color.
    pub background_color: Color,
}

impl Default for GroupLayoutSkin {
    fn default() -> Self {
        Self {
            border: Insets::uniform(2),
            border_color: Color::rgb(96, 96, 96),
            background_color: Color::rgb(240, 240, 240),
        }
    }
}

/// Skin for split layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitLayoutSkin {
    /// Splitter thickness.
    pub splitter_size: u32,
    /// Splitter color.
    pub background_color: Color,
}

impl Default for SplitLayoutSkin {
    fn default() -> Self {
        Self {
            splitter_size: 2,
            background_color: Color::rgb(192, 192, 192),
        }
    }
}

/// Skin for scroll views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollViewSkin {
    /// Border width per edge.
    pub border: Insets,
    /// Border color.
    pub border_color: Color,
    /// Background color.
    pub background_color: Color,
    /// Scroll bar thickness.
    pub bar_size: u32,
    /// Scroll bar track color.
    pub bar_color: Color,
    /// Scroll bar thumb color.
    pub thumb_color: Color,
}

impl Default for ScrollViewSkin {
    fn default() -> Self {
        Self {
            border: Insets::uniform(2),
            border_color: Color::rgb(96, 96, 96),
            background_color: Color::rgb(240, 240, 240),
            bar_size: 8,
            bar_color: Color::rgb(128, 128, 128),
            thumb_color: Color::rgb(96, 96, 96),
        }
    }
}

/// Skin for forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSkin {
    /// Border width per edge.
    pub border: Insets,
    /// Title bar height when no text engine is installed.
    pub title_height: u32,
    /// Padding around the title text.
    pub title_padding: Insets,
    /// Title text color.
    pub title_color: Color,
    /// Border and title bar color.
    pub border_color: Color,
    /// Content background color.
    pub background_color: Color,
}

impl FormSkin {
    /// Skin for the focused form.
    fn active() -> Self {
        Self {
            border: Insets::uniform(2),
            title_height: 14,
            title_padding: Insets::uniform(2),
            title_color: Color::rgb(240, 240, 240),
            border_color: Color::rgba(96, 96, 96, 192),
            background_color: Color::rgb(240, 240, 240),
        }
    }

    /// Skin for unfocused forms.
    fn inactive() -> Self {
        Self {
            title_color: Color::rgb(160, 160, 160),
            ..Self::active()
        }
    }
}

impl Default for FormSkin {
    fn default() -> Self {
        Self::active()
    }
}

/// Skin for context menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuItemSkin {
    /// Padding around the label.
    pub padding: Insets,
    /// Label color.
    pub text_color: Color,
    /// Background color.
    pub background_color: Color,
    /// Background color under the pointer.
    pub hover_color: Color,
}

impl Default for MenuItemSkin {
    fn default() -> Self {
        Self {
            padding: Insets::uniform(3),
            text_color: Color::rgb(32, 32, 32),
            background_color: Color::TRANSPARENT,
            hover_color: Color::rgb(210, 210, 230),
        }
    }
}

/// Per-kind skin records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skin {
    /// Flow layouts.
    pub flow_layout: FlowLayoutSkin,
    /// Group panels.
    pub group_layout: GroupLayoutSkin,
    /// Split layouts.
    pub split_layout: SplitLayoutSkin,
    /// Scroll views.
    pub scroll_view: ScrollViewSkin,
    /// The focused form.
    pub form_active: FormSkin,
    /// Unfocused forms.
    pub form_inactive: FormSkin,
    /// Context menu panels.
    pub context_menu: FlowLayoutSkin,
    /// Context menu entries.
    pub menu_item: MenuItemSkin,
}

impl Default for Skin {
    fn default() -> Self {
        Self {
            flow_layout: FlowLayoutSkin::default(),
            group_layout: GroupLayoutSkin::default(),
            split_layout: SplitLayoutSkin::default(),
            scroll_view: ScrollViewSkin::default(),
            form_active: FormSkin::active(),
            form_inactive: FormSkin::inactive(),
            context_menu: FlowLayoutSkin {
                border: Insets::uniform(1),
                padding: Insets::uniform(1),
                space: 1,
                border_color: Color::rgb(96, 96, 96),
                background_color: Color::rgb(240, 240, 240),
            },
            menu_item: MenuItemSkin::default(),
        }
    }
}

/// Settings shared by the whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Skin records.
    pub skin: Skin,
    /// Pixels scrolled per wheel notch.
    pub wheel_step: u32,
    /// Maximum interval between two presses of a double click, in
    /// milliseconds.
    pub double_click: u64,
    /// Distance a maximized form must be dragged before it restores.
    pub maximize_drag_threshold: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            skin: Skin::default(),
            wheel_step: 16,
            double_click: 500,
            maximize_drag_threshold: 16,
        }
    }
}

impl Options {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

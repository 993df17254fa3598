//! Text measurement interface.
//!
//! Shaping and font handling live outside the tree engine. Widgets reach
//! the installed engine through [`LayoutCtx::text`](crate::LayoutCtx::text)
//! to size themselves, and ask it for glyph quads when painting.

use crate::geom::{Point, Rect, Size};

/// A positioned glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphQuad {
    /// The character drawn.
    pub glyph: char,
    /// Where it is drawn.
    pub rect: Rect,
}

/// Measures and lays out text.
pub trait TextEngine: Send {
    /// Size of `text` when wrapped to `max_width`, or unwrapped if `None`.
    fn measure(&self, text: &str, max_width: Option<u32>) -> Size;

    /// Glyph quads for `text` with its top-left corner at `origin`.
    fn glyphs(&self, text: &str, origin: Point) -> Vec<GlyphQuad>;
}

/// A fixed-advance engine: every character occupies the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonoText {
    /// Horizontal advance per character.
    pub advance: u32,
    /// Height of one line.
    pub line_height: u32,
}

impl Default for MonoText {
    fn default() -> Self {
        Self {
            advance: 6,
            line_height: 10,
        }
    }
}

impl MonoText {
    /// Characters per line at the given width.
    fn columns(&self, max_width: Option<u32>) -> Option<usize> {
        let width = max_width?;
        let cols = width.checked_div(self.advance).unwrap_or(0).max(1);
        Some(cols as usize)
    }
}

impl TextEngine for MonoText {
    fn measure(&self, text: &str, max_width: Option<u32>) -> Size {
        let cols = self.columns(max_width);
        let mut widest = 0usize;
        let mut lines = 0usize;
        for line in text.split('\n') {
            let n = line.chars().count();
            match cols {
                Some(c) if n > c => {
                    widest = widest.max(c);
                    lines += n.div_ceil(c);
                }
                _ => {
                    widest = widest.max(n);
                    lines += 1;
                }
            }
        }
        Size::new(
            (widest as u32).saturating_mul(self.advance),
            (lines as u32).saturating_mul(self.line_height),
        )
    }

    fn glyphs(&self, text: &str, origin: Point) -> Vec<GlyphQuad> {
        let mut out = Vec::new();
        for (row, line) in text.split('\n').enumerate() {
            let y = origin.y.saturating_add((row as u32 * self.line_height) as i32);
            for (col, glyph) in line.chars().enumerate() {
                let x = origin.x.saturating_add((col as u32 * self.advance) as i32);
                if !glyph.is_whitespace() {
                    out.push(GlyphQuad {
                        glyph,
                        rect: Rect::new(x, y, self.advance, self.line_height),
                    });
                }
            }
        }
        out
    }
}

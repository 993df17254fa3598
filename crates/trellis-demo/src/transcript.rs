use std::io::{self, Write};

use trellis::{
    GpuResource,
    geom::{Point, Rect},
    options::Color,
    render::DrawBackend,
};

/// Format a rectangle as `x,y wxh`.
fn rect(r: Rect) -> String {
    format!("{},{} {}x{}", r.tl.x, r.tl.y, r.w, r.h)
}

/// Format a color as `#rrggbbaa`.
fn color(c: Color) -> String {
    format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
}

/// A backend that keeps one line of text per draw call.
#[derive(Debug, Default)]
pub struct Transcript {
    /// Lines, oldest first.
    lines: Vec<String>,
}

impl Transcript {
    /// Construct an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Write every line to `out`.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        for line in &self.lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

impl DrawBackend for Transcript {
    fn set_clip(&mut self, clip: Rect) {
        self.lines.push(format!("clip {}", rect(clip)));
    }

    fn fill_rect(&mut self, r: Rect, c: Color) {
        self.lines.push(format!("  fill {} {}", rect(r), color(c)));
    }

    fn draw_text(&mut self, origin: Point, text: &str, c: Color) {
        self.lines
            .push(format!("  text {},{} {} {text:?}", origin.x, origin.y, color(c)));
    }

    fn release(&mut self, resource: GpuResource) {
        self.lines.push(format!("release {resource:?}"));
    }
}

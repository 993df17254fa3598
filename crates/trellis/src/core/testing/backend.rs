use crate::{
    dispose::GpuResource,
    geom::{Point, Rect},
    options::Color,
    render::DrawBackend,
};

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    /// Clip rectangle set.
    Clip(Rect),
    /// Rectangle filled.
    Fill(Rect, Color),
    /// Text drawn.
    Text(Point, String, Color),
    /// Resource released.
    Release(GpuResource),
}

/// A draw backend for testing, which records every call in order.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    /// Calls, oldest first.
    pub calls: Vec<DrawCall>,
}

impl RecordingBackend {
    /// Construct an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Filled rectangles, in paint order.
    pub fn fills(&self) -> Vec<(Rect, Color)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Fill(r, color) => Some((*r, *color)),
                _ => None,
            })
            .collect()
    }

    /// Index of the first fill with this color, if any.
    pub fn first_fill_of(&self, color: Color) -> Option<usize> {
        self.fills().iter().position(|(_, c)| *c == color)
    }

    /// Clip rectangles, in order.
    pub fn clips(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Clip(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    /// Drawn text runs.
    pub fn texts(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text(_, s, _) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }
}

impl DrawBackend for RecordingBackend {
    fn set_clip(&mut self, clip: Rect) {
        self.calls.push(DrawCall::Clip(clip));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::Fill(rect, color));
    }

    fn draw_text(&mut self, origin: Point, text: &str, color: Color) {
        self.calls.push(DrawCall::Text(origin, text.to_string(), color));
    }

    fn release(&mut self, resource: GpuResource) {
        self.calls.push(DrawCall::Release(resource));
    }
}

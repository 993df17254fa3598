use crate::widget::Widget;

/// The widget at the base of every tree. Its outer and content rectangles
/// both cover the client area.
pub struct Root;

impl Widget for Root {}

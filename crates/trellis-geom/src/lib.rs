//! Geometry primitives used across trellis.
//!
//! Everything here is a plain value type. Positions are signed so that a
//! child may sit partially outside its parent (scrolled content, a form
//! dragged against an edge); sizes are unsigned and all size arithmetic
//! saturates at zero.

#![warn(missing_docs)]

/// Edge anchoring and the resize rule built on it.
mod anchor;
/// Border and padding insets.
mod insets;
/// Signed point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Width/height size type.
mod size;

pub use anchor::{Anchor, SubPixel};
pub use insets::Insets;
pub use point::Point;
pub use rect::Rect;
pub use size::Size;

/// Layout orientation for two-slot and linear containers.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Slots side by side, split along the X axis.
    #[default]
    Vertical,
    /// Slots stacked, split along the Y axis.
    Horizontal,
}

use bitflags::bitflags;

use crate::Rect;

bitflags! {
    /// Edges of the parent's content area that a child tracks when the
    /// parent is resized.
    ///
    /// Each axis is resolved independently:
    ///
    /// - both edges anchored: the child stretches with the parent;
    /// - only the near edge (left/top): the child keeps its position;
    /// - only the far edge (right/bottom): the child slides by the delta;
    /// - neither: the child moves by half the delta, staying centered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Anchor: u8 {
        /// Track the left edge.
        const LEFT = 0b0001;
        /// Track the top edge.
        const TOP = 0b0010;
        /// Track the right edge.
        const RIGHT = 0b0100;
        /// Track the bottom edge.
        const BOTTOM = 0b1000;
        /// Track every edge.
        const ALL = Self::LEFT.bits() | Self::TOP.bits() | Self::RIGHT.bits() | Self::BOTTOM.bits();
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self::LEFT | Self::TOP
    }
}

/// Per-axis remainder carried between centered resizes.
///
/// Halving an odd delta loses a pixel. The lost half is kept here and
/// folded into the next delta on the same axis, so the accumulated drift of
/// a centered child never exceeds one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubPixel {
    /// Horizontal remainder, in `-1..=1`.
    pub x: i32,
    /// Vertical remainder, in `-1..=1`.
    pub y: i32,
}

impl Anchor {
    /// Apply a parent content-size delta to a child's outer rectangle.
    pub fn resize(self, outer: Rect, delta: (i32, i32), carry: &mut SubPixel) -> Rect {
        let (x, w) = resize_axis(
            outer.tl.x,
            outer.w,
            delta.0,
            (self.contains(Self::LEFT), self.contains(Self::RIGHT)),
            &mut carry.x,
        );
        let (y, h) = resize_axis(
            outer.tl.y,
            outer.h,
            delta.1,
            (self.contains(Self::TOP), self.contains(Self::BOTTOM)),
            &mut carry.y,
        );
        Rect::new(x, y, w, h)
    }
}

/// Resolve one axis of the anchor rule.
fn resize_axis(
    pos: i32,
    len: u32,
    delta: i32,
    (near, far): (bool, bool),
    carry: &mut i32,
) -> (i32, u32) {
    match (near, far) {
        (true, true) => (pos, len.saturating_add_signed(delta)),
        (true, false) => (pos, len),
        (false, true) => (pos.saturating_add(delta), len),
        (false, false) => {
            let d = delta.saturating_add(*carry);
            let half = d / 2;
            *carry = d - half * 2;
            (pos.saturating_add(half), len)
        }
    }
}

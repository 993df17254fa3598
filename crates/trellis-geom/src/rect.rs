use crate::{Insets, Point, Size};

/// A rectangle with a signed origin and unsigned size.
///
/// Rectangles are half-open: a point on the right or bottom edge is not
/// contained.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// Construct a rectangle from an origin and a size.
    pub fn from_parts(tl: Point, size: Size) -> Self {
        Self {
            tl,
            w: size.w,
            h: size.h,
        }
    }

    /// The zero rectangle.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Does this rect cover no area?
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// The size of this rectangle.
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        far_edge(self.tl.x, self.w)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        far_edge(self.tl.y, self.h)
    }

    /// Return a copy with a different origin.
    pub fn at(&self, tl: Point) -> Self {
        Self { tl, ..*self }
    }

    /// Return a copy with a different size.
    pub fn with_size(&self, size: Size) -> Self {
        Self {
            tl: self.tl,
            w: size.w,
            h: size.h,
        }
    }

    /// Shift the rectangle by an offset.
    pub fn translate(&self, offset: Point) -> Self {
        self.at(self.tl + offset)
    }

    /// Does this rectangle contain the point?
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.tl.x && p.y >= self.tl.y && p.x < self.right() && p.y < self.bottom()
    }

    /// Does this rectangle fully enclose another? Empty rectangles are
    /// enclosed by anything whose bounds cover their origin.
    pub fn encloses(&self, other: &Self) -> bool {
        other.tl.x >= self.tl.x
            && other.tl.y >= self.tl.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Intersection of two rectangles, or `None` when they share no area.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.tl.x.max(other.tl.x);
        let top = self.tl.y.max(other.tl.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self::new(left, top, right.abs_diff(left), bottom.abs_diff(top)))
    }

    /// Shrink by insets. The result is anchored at the inset origin and its
    /// size saturates at zero.
    pub fn deflate(&self, insets: Insets) -> Self {
        Self {
            tl: self.tl.scroll(insets.left as i32, insets.top as i32),
            w: self.w.saturating_sub(insets.horizontal()),
            h: self.h.saturating_sub(insets.vertical()),
        }
    }

    /// Grow by insets; the inverse of [`Rect::deflate`] for non-saturated
    /// sizes.
    pub fn inflate(&self, insets: Insets) -> Self {
        Self {
            tl: self.tl.scroll(-(insets.left as i32), -(insets.top as i32)),
            w: self.w.saturating_add(insets.horizontal()),
            h: self.h.saturating_add(insets.vertical()),
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Self) -> Self {
        let left = self.tl.x.min(other.tl.x);
        let top = self.tl.y.min(other.tl.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right.abs_diff(left), bottom.abs_diff(top))
    }

    /// Move this rectangle so that it lies inside `bounds` where possible.
    /// A rectangle larger than the bounds is aligned to the bounds origin.
    pub fn clamp_within(&self, bounds: &Self) -> Self {
        let x = clamp_axis(self.tl.x, self.w, bounds.tl.x, bounds.w);
        let y = clamp_axis(self.tl.y, self.h, bounds.tl.y, bounds.h);
        Self::new(x, y, self.w, self.h)
    }
}

/// Far edge of an axis span, saturated into `i32`.
fn far_edge(origin: i32, len: u32) -> i32 {
    (i64::from(origin) + i64::from(len)).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Clamp one axis of a span into a bounding span.
fn clamp_axis(pos: i32, len: u32, min: i32, bound: u32) -> i32 {
    let max = far_edge(min, bound.saturating_sub(len));
    pos.min(max).max(min)
}

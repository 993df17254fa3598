/// A width/height pair. All arithmetic saturates at zero and `u32::MAX`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Size {
    /// An unbounded size, used as the default maximum clamp.
    pub const MAX: Self = Self {
        w: u32::MAX,
        h: u32::MAX,
    };

    /// Construct a new size.
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// The empty size.
    pub fn zero() -> Self {
        Self { w: 0, h: 0 }
    }

    /// Does this size cover no area?
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Clamp each axis into `[min, max]`. When `min` exceeds `max` on an
    /// axis, the maximum wins.
    pub fn clamp(&self, min: Self, max: Self) -> Self {
        Self {
            w: self.w.max(min.w).min(max.w),
            h: self.h.max(min.h).min(max.h),
        }
    }

    /// Signed per-axis difference `self - other`.
    pub fn delta(&self, other: Self) -> (i32, i32) {
        (signed_diff(self.w, other.w), signed_diff(self.h, other.h))
    }

    /// Apply a signed delta, saturating at zero.
    pub fn grow(&self, dw: i32, dh: i32) -> Self {
        Self {
            w: self.w.saturating_add_signed(dw),
            h: self.h.saturating_add_signed(dh),
        }
    }
}

impl From<(u32, u32)> for Size {
    fn from(v: (u32, u32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}

/// Difference of two unsigned values as a saturated `i32`.
fn signed_diff(a: u32, b: u32) -> i32 {
    let d = i64::from(a) - i64::from(b);
    d.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

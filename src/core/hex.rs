//! Axial Hex Vector
//!
//! Integer hex-grid coordinates `(q, r)` with the implied cube axis
//! `s = -q - r`. Positions and velocities both use this type.

use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Axial coordinates on a pointy-top hex grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HexVector {
    /// Column axis
    pub q: i32,
    /// Row axis
    pub r: i32,
}

/// Neighbour offsets, starting at `(+1, 0)` and proceeding clockwise.
///
/// Base slot indices and gravity-arrow iteration depend on this order.
pub const NEIGHBOUR_OFFSETS: [HexVector; 6] = [
    HexVector::new(1, 0),
    HexVector::new(0, 1),
    HexVector::new(-1, 1),
    HexVector::new(-1, 0),
    HexVector::new(0, -1),
    HexVector::new(1, -1),
];

impl HexVector {
    /// The origin.
    pub const ZERO: Self = Self { q: 0, r: 0 };

    /// Largest magnitude accepted on any cube axis.
    ///
    /// Within this bound neighbour and difference arithmetic stay inside `i32`.
    pub const LIMIT: i32 = i32::MAX / 2;

    /// Create a new vector.
    #[inline]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Derived third cube coordinate.
    ///
    /// Overflows outside [`Self::in_range`].
    #[inline]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// Whether `q`, `r` and `s` all lie within [`Self::LIMIT`].
    pub fn in_range(self) -> bool {
        let limit = i64::from(Self::LIMIT);
        let (q, r) = (i64::from(self.q), i64::from(self.r));
        q.abs() <= limit && r.abs() <= limit && (q + r).abs() <= limit
    }

    /// Hex distance: the largest absolute difference over the three cube axes.
    ///
    /// Saturates at `u32::MAX` for vectors outside [`Self::in_range`].
    #[inline]
    pub fn distance(self, other: Self) -> u32 {
        let (aq, ar) = (i64::from(self.q), i64::from(self.r));
        let (bq, br) = (i64::from(other.q), i64::from(other.r));
        let dq = (aq - bq).abs();
        let dr = (ar - br).abs();
        let ds = ((aq + ar) - (bq + br)).abs();
        u32::try_from(dq.max(dr).max(ds)).unwrap_or(u32::MAX)
    }

    /// Distance from the origin.
    #[inline]
    pub fn length(self) -> u32 {
        self.distance(Self::ZERO)
    }

    /// The six neighbouring hexes in canonical order.
    pub fn adjacent(self) -> [Self; 6] {
        NEIGHBOUR_OFFSETS.map(|offset| self + offset)
    }

    /// Project to screen space for rendering.
    ///
    /// `x = scale * (sqrt(3) * q + sqrt(3) / 2 * r)`, `y = scale * (3 / 2 * r)`.
    pub fn to_screen_space(self, scale: f64) -> (f64, f64) {
        let q = f64::from(self.q);
        let r = f64::from(self.r);
        let sqrt3 = 3f64.sqrt();
        (
            scale * (sqrt3 * q + sqrt3 / 2.0 * r),
            scale * (3.0 / 2.0 * r),
        )
    }
}

impl Add for HexVector {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Sub for HexVector {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.q - rhs.q, self.r - rhs.r)
    }
}

impl Neg for HexVector {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.q, -self.r)
    }
}

impl fmt::Debug for HexVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hex({}, {})", self.q, self.r)
    }
}

impl fmt::Display for HexVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

// =============================================================================
// TESTS
// =============================================================================

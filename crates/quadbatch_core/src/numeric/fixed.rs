//! # 16.16 Fixed-Point
//!
//! Signed fixed-point numbers with 16 fractional bits, the format consumed
//! by fixed-function GPUs through `GL_FIXED` style vertex streams.
//!
//! ## Conversion Rule
//!
//! `to_fixed(v) == round(v * 65536)`, saturating at the `i32` range.
//! Every conversion in the workspace goes through [`to_fixed`] so the float
//! and fixed pipelines can never disagree about a value.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};

/// Number of fractional bits.
pub const FRACTIONAL_BITS: u32 = 16;

/// Scale factor between a real value and its raw fixed representation.
pub const FIXED_ONE: i32 = 1 << FRACTIONAL_BITS;

/// Converts a float to raw 16.16 fixed point.
///
/// Rounds to nearest (ties away from zero). Out-of-range inputs saturate,
/// NaN maps to zero.
#[inline]
#[must_use]
pub fn to_fixed(value: f32) -> i32 {
    (f64::from(value) * f64::from(FIXED_ONE)).round() as i32
}

/// Converts raw 16.16 fixed point back to a float.
#[inline]
#[must_use]
pub fn from_fixed(raw: i32) -> f32 {
    (f64::from(raw) / f64::from(FIXED_ONE)) as f32
}

/// Signed 16.16 fixed-point number.
///
/// Arithmetic wraps on overflow, like the integer vertex streams it feeds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Pod, Zeroable)]
#[repr(transparent)]
pub struct Fixed16(i32);

impl Fixed16 {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// One (65536 raw).
    pub const ONE: Self = Self(FIXED_ONE);

    /// Largest representable value.
    pub const MAX: Self = Self(i32::MAX);

    /// Smallest representable value.
    pub const MIN: Self = Self(i32::MIN);

    /// Creates from a float using [`to_fixed`].
    #[inline]
    #[must_use]
    pub fn from_f32(value: f32) -> Self {
        Self(to_fixed(value))
    }

    /// Creates from a whole number.
    #[inline]
    #[must_use]
    pub const fn from_int(whole: i16) -> Self {
        Self((whole as i32) << FRACTIONAL_BITS)
    }

    /// Creates from the raw scaled integer.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw scaled integer.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Converts back to a float.
    #[inline]
    #[must_use]
    pub fn to_f32(self) -> f32 {
        from_fixed(self.0)
    }

    /// Checked addition. Returns `None` on overflow.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Saturating addition.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Add for Fixed16 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Fixed16 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for Fixed16 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Fixed16 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

impl Neg for Fixed16 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self(self.0.wrapping_neg())
    }
}

impl From<f32> for Fixed16 {
    #[inline]
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl fmt::Debug for Fixed16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed16({} raw={})", self.to_f32(), self.0)
    }
}

impl fmt::Display for Fixed16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_whole_numbers() {
        assert_eq!(to_fixed(0.0), 0);
        assert_eq!(to_fixed(1.0), 65536);
        assert_eq!(to_fixed(-1.0), -65536);
        assert_eq!(to_fixed(64.0), 64 * 65536);
    }

    #[test]
    fn test_to_fixed_rounds() {
        // 0.25 and 0.5 are exact
        assert_eq!(to_fixed(0.25), 16384);
        assert_eq!(to_fixed(0.5), 32768);

        // 1/3 is not; must round, not truncate
        let third = 1.0_f32 / 3.0;
        let expected = (f64::from(third) * 65536.0).round() as i32;
        assert_eq!(to_fixed(third), expected);
        assert_eq!(to_fixed(third), 21845);

        // Value just below a raw step rounds up
        let almost = 0.999_999_9_f32;
        assert_eq!(to_fixed(almost), 65536);
    }

    #[test]
    fn test_to_fixed_matches_formula_for_many_values() {
        for i in -2000..2000 {
            let v = i as f32 * 0.173;
            let expected = (f64::from(v) * 65536.0).round() as i32;
            assert_eq!(to_fixed(v), expected, "value {v}");
        }
    }

    #[test]
    fn test_to_fixed_saturates() {
        assert_eq!(to_fixed(1.0e9), i32::MAX);
        assert_eq!(to_fixed(-1.0e9), i32::MIN);
        assert_eq!(to_fixed(f32::NAN), 0);
    }

    #[test]
    fn test_round_trip() {
        let value = Fixed16::from_f32(12.75);
        assert_eq!(value.to_f32(), 12.75);
        assert_eq!(Fixed16::from_int(3), Fixed16::from_f32(3.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Fixed16::from_f32(1.5);
        let b = Fixed16::from_f32(2.25);
        assert_eq!((a + b).to_f32(), 3.75);
        assert_eq!((b - a).to_f32(), 0.75);
        assert_eq!((-a).to_f32(), -1.5);
    }

    #[test]
    fn test_overflow_wraps_and_checked_detects() {
        assert!(Fixed16::MAX.checked_add(Fixed16::ONE).is_none());
        assert_eq!(Fixed16::MAX.saturating_add(Fixed16::ONE), Fixed16::MAX);
        assert_eq!(Fixed16::MAX + Fixed16::from_raw(1), Fixed16::MIN);
    }

    #[test]
    fn test_pod_layout() {
        assert_eq!(std::mem::size_of::<Fixed16>(), 4);
        let values = [Fixed16::ONE, Fixed16::from_raw(-2)];
        let raw: &[i32] = bytemuck::cast_slice(&values);
        assert_eq!(raw, &[65536, -2]);
    }
}

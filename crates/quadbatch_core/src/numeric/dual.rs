//! Float value with its fixed-point projection kept in lockstep.

use super::fixed::Fixed16;

/// A real value stored in both float and 16.16 fixed form.
///
/// The fixed projection is derived from the float on every mutation. There
/// is no way to set the two independently, so they can never diverge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DualValue {
    float: f32,
    fixed: Fixed16,
}

impl DualValue {
    /// Zero in both representations.
    pub const ZERO: Self = Self {
        float: 0.0,
        fixed: Fixed16::ZERO,
    };

    /// Creates a dual value from a float.
    #[inline]
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self {
            float: value,
            fixed: Fixed16::from_f32(value),
        }
    }

    /// Replaces the value, recomputing the fixed projection.
    #[inline]
    pub fn set(&mut self, value: f32) {
        *self = Self::new(value);
    }

    /// Adds `delta` to the float value and recomputes the fixed projection.
    #[inline]
    pub fn offset(&mut self, delta: f32) {
        self.set(self.float + delta);
    }

    /// Float representation.
    #[inline]
    #[must_use]
    pub const fn float(self) -> f32 {
        self.float
    }

    /// Fixed representation.
    #[inline]
    #[must_use]
    pub const fn fixed(self) -> Fixed16 {
        self.fixed
    }
}

impl From<f32> for DualValue {
    #[inline]
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::to_fixed;

    #[test]
    fn test_new_derives_fixed() {
        let v = DualValue::new(2.5);
        assert_eq!(v.float(), 2.5);
        assert_eq!(v.fixed().raw(), 163_840);
    }

    #[test]
    fn test_set_recomputes() {
        let mut v = DualValue::new(1.0);
        v.set(-7.3);
        assert_eq!(v.float(), -7.3);
        assert_eq!(v.fixed().raw(), to_fixed(-7.3));
    }

    #[test]
    fn test_offset_recomputes_from_float() {
        let mut v = DualValue::new(10.0);
        for _ in 0..100 {
            v.offset(0.1);
        }
        // Fixed always tracks the accumulated float, not a fixed-point sum
        assert_eq!(v.fixed().raw(), to_fixed(v.float()));
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(DualValue::default(), DualValue::ZERO);
    }
}

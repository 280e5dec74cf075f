//! Vertex component scalar abstraction.
//!
//! Geometry containers are generic over [`Scalar`] so the float and fixed
//! pipelines share a single implementation and cannot drift apart.

use std::fmt::Debug;
use std::ops::Add;

use bytemuck::Pod;

use super::dual::DualValue;
use super::fixed::Fixed16;

/// A vertex component type: `f32` or [`Fixed16`].
pub trait Scalar:
    Copy + Default + PartialEq + Debug + Pod + Add<Output = Self> + Send + Sync + 'static
{
    /// Short name used in logs and bench labels.
    const NAME: &'static str;

    /// Converts a float into this representation.
    fn from_f32(value: f32) -> Self;

    /// Picks this representation out of a dual value.
    fn from_dual(value: DualValue) -> Self;

    /// Converts back to a float for inspection.
    fn to_f32(self) -> f32;
}

impl Scalar for f32 {
    const NAME: &'static str = "float";

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn from_dual(value: DualValue) -> Self {
        value.float()
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }
}

impl Scalar for Fixed16 {
    const NAME: &'static str = "fixed";

    #[inline]
    fn from_f32(value: f32) -> Self {
        Fixed16::from_f32(value)
    }

    #[inline]
    fn from_dual(value: DualValue) -> Self {
        value.fixed()
    }

    #[inline]
    fn to_f32(self) -> f32 {
        Fixed16::to_f32(self)
    }
}

//! Screen-space sprite with float and fixed-point spatial state.

use quadbatch_core::{DualValue, Scalar};

use crate::atlas::TextureRegion;
use crate::batch::QuadStagingBuffer;

/// An axis-aligned textured quad with its spatial state.
///
/// Every coordinate is a [`DualValue`], so emitting into a float or a
/// fixed-point staging buffer yields the same geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    /// Left edge.
    pub x: DualValue,
    /// Top edge.
    pub y: DualValue,
    /// Depth.
    pub z: DualValue,
    /// Width.
    pub width: DualValue,
    /// Height.
    pub height: DualValue,
    /// Horizontal velocity. Stored for the simulation; never integrated here.
    pub velocity_x: DualValue,
    /// Vertical velocity. Stored for the simulation; never integrated here.
    pub velocity_y: DualValue,
    region: TextureRegion,
}

impl Sprite {
    /// Creates a stationary sprite at depth zero.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32, region: TextureRegion) -> Self {
        Self {
            x: DualValue::new(x),
            y: DualValue::new(y),
            z: DualValue::ZERO,
            width: DualValue::new(width),
            height: DualValue::new(height),
            velocity_x: DualValue::ZERO,
            velocity_y: DualValue::ZERO,
            region,
        }
    }

    /// Sets the depth.
    #[must_use]
    pub fn with_depth(mut self, z: f32) -> Self {
        self.z.set(z);
        self
    }

    /// Sets the velocity.
    #[must_use]
    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.velocity_x.set(vx);
        self.velocity_y.set(vy);
        self
    }

    /// Moves the top-left corner.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x.set(x);
        self.y.set(y);
    }

    /// Atlas region drawn on this sprite.
    #[must_use]
    pub const fn region(&self) -> &TextureRegion {
        &self.region
    }

    /// Swaps the atlas region, e.g. to the next animation frame.
    pub fn set_region(&mut self, region: TextureRegion) {
        self.region = region;
    }

    /// Appends this sprite's quad in the buffer's representation.
    pub fn emit<S: Scalar>(&self, staging: &mut QuadStagingBuffer<S>) {
        staging.append_quad(
            S::from_dual(self.x),
            S::from_dual(self.y),
            S::from_dual(self.width),
            S::from_dual(self.height),
            S::from_dual(self.z),
            &self.region.coords::<S>(),
        );
    }
}

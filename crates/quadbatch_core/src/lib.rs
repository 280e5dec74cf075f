//! # QUADBATCH Core
//!
//! Building blocks for batched quad rendering on fixed-function style GPUs:
//! - 16.16 fixed-point values kept in lockstep with their float source
//! - Growable vertex storage with step-wise capacity planning
//! - Double-buffered handoff between a producer and a render thread
//!
//! ## Architecture Rules
//!
//! 1. **One conversion rule** - every float becomes fixed through [`to_fixed`]
//! 2. **Capacity only grows** - buffers settle after warm-up, then never allocate
//! 3. **Generic over representation** - containers take a [`Scalar`], never a flag
//!
//! ## Example
//!
//! ```rust,ignore
//! use quadbatch_core::{DualValue, GrowableBuffer, GrowthPolicy};
//!
//! let x = DualValue::new(64.5);
//! let mut positions: GrowableBuffer<f32> = GrowableBuffer::new(200, 3);
//! positions.reserve_vertices(GrowthPolicy::default(), 420);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod memory;
pub mod numeric;
pub mod sync;

pub use memory::{GrowableBuffer, GrowthPolicy};
pub use numeric::{from_fixed, to_fixed, DualValue, Fixed16, Scalar, FIXED_ONE, FRACTIONAL_BITS};
pub use sync::{ConsumerHandle, DoubleBuffer, FrameSync, ProducerHandle};

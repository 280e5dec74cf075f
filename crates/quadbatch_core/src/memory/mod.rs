//! # Memory Management
//!
//! Growable storage for vertex streams.
//!
//! ## Design Philosophy
//!
//! Memory is sized once at startup for the expected maximum. During a frame:
//! - Growth only when a producer outruns its capacity
//! - Growth is whole increments, never a shrink
//! - Contents written before a growth survive it

mod growable;

pub use growable::{GrowableBuffer, GrowthPolicy};

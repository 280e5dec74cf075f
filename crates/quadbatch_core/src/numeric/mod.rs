//! # Numeric Formats
//!
//! Float and 16.16 fixed-point representations used side by side.
//!
//! ## Rules
//!
//! 1. One conversion function ([`to_fixed`]) for the whole workspace
//! 2. Spatial state lives in [`DualValue`], never in two loose fields
//! 3. Containers are generic over [`Scalar`]

mod dual;
mod fixed;
mod scalar;

pub use dual::DualValue;
pub use fixed::{from_fixed, to_fixed, Fixed16, FIXED_ONE, FRACTIONAL_BITS};
pub use scalar::Scalar;

//! # Frame Handoff Between Threads
//!
//! ## The Problem
//!
//! ```text
//! Thread 1 (Simulation):  APPENDS quads into staging buffers
//! Thread 2 (Render):      MERGES staging buffers and submits draws
//!
//! Shared staging: both threads touch the same cursor → torn frames
//! ```
//!
//! ## The Solution: Double Buffering
//!
//! ```text
//! Frame N:
//!   Simulation fills slot A
//!   Render drains slot B (last frame's quads)
//!
//! Frame N+1:
//!   SWAP (atomic index flip)
//!   Simulation fills slot B
//!   Render drains slot A
//! ```
//!
//! Each staging buffer is owned by exactly one side for the whole frame.

mod double_buffer;

pub use double_buffer::{ConsumerHandle, DoubleBuffer, FrameSync, ProducerHandle};

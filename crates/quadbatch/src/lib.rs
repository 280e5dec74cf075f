//! # QUADBATCH
//!
//! Batched quad rendering, integrating both layers.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          QUADBATCH                            │
//! ├───────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────┐        ┌─────────────────────────┐  │
//! │  │   quadbatch_core     │───────>│   quadbatch_rendering   │  │
//! │  │                      │        │                         │  │
//! │  │  • Fixed16/DualValue │        │  • Staging buffers      │  │
//! │  │  • Growable storage  │        │  • Shared geometry      │  │
//! │  │  • Double buffer     │        │  • Draw groups / plan   │  │
//! │  └──────────────────────┘        │  • Atlas / config       │  │
//! │                                  └─────────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `sprite_bench` binary drives both from two threads.

#![deny(missing_docs)]
#![deny(unsafe_code)]

// Re-export the layers
pub use quadbatch_core as core;
pub use quadbatch_rendering as rendering;

// Re-export commonly used types
pub use quadbatch_core::{DoubleBuffer, DualValue, Fixed16, GrowthPolicy, Scalar};
pub use quadbatch_rendering::{
    BatchConfig, BatchError, BatchResult, BatchStats, DrawBackend, FrameStats, QuadBatcher,
    QuadStagingBuffer, RecordingBackend, Sprite, TextureAtlas, TextureRegion,
};

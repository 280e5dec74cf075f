//! # QUADBATCH Rendering
//!
//! Batched quad geometry for fixed-function style GPUs, designed for:
//! - Thousands of sprites in a handful of draw calls
//! - Float and 16.16 fixed-point vertex streams from the same code
//! - Zero allocations per frame once buffer capacity has settled
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       FRAME PIPELINE                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Sprite.emit → QuadStagingBuffer (per group)                 │
//! │       ↓                                                      │
//! │  SharedGeometryBuffer.merge_all → VertexRange per group      │
//! │       ↓                                                      │
//! │  DrawPlan → DrawBackend (bind, upload, one draw per group)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - One staging buffer per draw group, merged in group order
//! - Each buffer belongs to one thread per frame; handoff happens at the
//!   frame boundary (see [`quadbatch_core::DoubleBuffer`])
//! - 16-bit indices: at most 65 536 vertices per merged frame

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod atlas;
pub mod batch;
pub mod config;
pub mod error;
pub mod layout;
pub mod sprite;
pub mod stats;
pub mod submit;

pub use atlas::{AtlasDescription, RegionDescription, TextureAtlas, TextureRegion};
pub use batch::{
    DrawDescriptor, DrawGroup, DrawPlan, GroupState, QuadBatcher, QuadIndexBuffer,
    QuadStagingBuffer, RenderPath, SharedGeometryBuffer, TextureId, VertexRange,
};
pub use config::{BatchConfig, GroupConfig};
pub use error::{BatchError, BatchResult};
pub use layout::GpuScalar;
pub use sprite::Sprite;
pub use stats::{BatchStats, FrameStats};
pub use submit::{DrawBackend, DrawCommand, GeometryView, RecordingBackend};

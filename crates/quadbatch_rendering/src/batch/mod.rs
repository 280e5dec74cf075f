//! # Quad Batching
//!
//! Many sprites, few draw calls.
//!
//! ## Frame Flow
//!
//! ```text
//! producer                       consumer
//! ────────                       ────────
//! append_quad ─▶ QuadStagingBuffer (one per group)
//!                      │
//!                      ▼ merge_all (resets staging)
//!               SharedGeometryBuffer ──▶ VertexRange per group
//!                      │                        │
//!                      ▼                        ▼
//!               bind_pointers_once        DrawPlan.assign_ranges
//!                      │                        │
//!               upload_pending                  │
//!                      │                        │
//!                      └──────────┬─────────────┘
//!                                 ▼
//!                    one indexed draw per non-empty group
//! ```
//!
//! Every container is generic over [`Scalar`](quadbatch_core::Scalar):
//! the float and fixed-point pipelines run the same code.

mod batcher;
mod draw;
mod indices;
mod shared;
mod staging;

pub use batcher::QuadBatcher;
pub use draw::{DrawDescriptor, DrawGroup, DrawPlan, GroupState, RenderPath, TextureId};
pub use indices::{
    fill_quad_indices, QuadIndexBuffer, INDICES_PER_QUAD, MAX_INDEXED_VERTICES, VERTICES_PER_QUAD,
};
pub use shared::{SharedGeometryBuffer, VertexRange};
pub use staging::{QuadStagingBuffer, POSITION_COMPONENTS, REGION_COMPONENTS, TEX_COORD_COMPONENTS};

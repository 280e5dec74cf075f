//! # Draw Submission
//!
//! The graphics layer only binds pointers and issues the draws it is told
//! to. Everything it sees goes through [`DrawBackend`].
//!
//! ```text
//! QuadBatcher::draw
//!   ├── bind_geometry    (only after the shared buffer reallocated)
//!   ├── upload_vertices  (slots merged since the last upload)
//!   └── per non-empty group:
//!         ├── set_blend / bind_texture   (textured path)
//!         └── draw_indexed
//! ```
//!
//! Views are borrowed, so a backend copies what it needs. `bind_geometry`
//! sizes its storage and takes the indices; the vertex data of every merged
//! frame arrives through `upload_vertices` before that frame's draws.

mod recording;

pub use recording::{DrawCommand, RecordingBackend};

use quadbatch_core::Scalar;

use crate::batch::{TextureId, POSITION_COMPONENTS};

/// Pointers into the shared geometry buffer, valid until the next merge.
#[derive(Debug, Clone, Copy)]
pub struct GeometryView<'a, S: Scalar> {
    /// Position components, 3 per vertex slot, over the whole capacity.
    pub positions: &'a [S],
    /// Texture coordinate components, 2 per vertex slot, over the whole capacity.
    pub tex_coords: &'a [S],
    /// Triangle-list indices covering every vertex slot.
    pub indices: &'a [u16],
}

impl<S: Scalar> GeometryView<'_, S> {
    /// Vertex slots visible through this view.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }

    /// Position data as bytes.
    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.positions)
    }

    /// Texture coordinate data as bytes.
    #[must_use]
    pub fn tex_coord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.tex_coords)
    }

    /// Index data as bytes.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.indices)
    }
}

/// Receiver of batched draw work.
///
/// Implemented by a real graphics backend, or by [`RecordingBackend`] in
/// tests and headless runs.
pub trait DrawBackend<S: Scalar> {
    /// Binds the position, texture coordinate and index arrays.
    ///
    /// Called when the shared buffer was reallocated. Capacity and indices
    /// stay valid until the next call.
    fn bind_geometry(&mut self, geometry: GeometryView<'_, S>);

    /// Copies merged vertex data starting at vertex slot `first_vertex`.
    fn upload_vertices(&mut self, first_vertex: usize, positions: &[S], tex_coords: &[S]);

    /// Enables or disables alpha blending.
    fn set_blend(&mut self, enabled: bool);

    /// Binds a texture for the following draws.
    fn bind_texture(&mut self, texture: TextureId);

    /// Draws `index_count` indices starting at `first_index` as a triangle list.
    fn draw_indexed(&mut self, first_index: u32, index_count: u32);
}

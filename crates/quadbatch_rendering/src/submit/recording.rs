//! Backend that records commands instead of talking to a GPU.

use quadbatch_core::Scalar;

use super::{DrawBackend, GeometryView};
use crate::batch::{TextureId, POSITION_COMPONENTS};

/// One recorded backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    /// Geometry pointers were bound.
    BindGeometry {
        /// Vertex slots visible through the binding.
        vertices: usize,
        /// Indices visible through the binding.
        indices: usize,
    },
    /// Vertex data copied.
    UploadVertices {
        /// First vertex slot written.
        first_vertex: usize,
        /// Vertices copied.
        vertices: usize,
    },
    /// Blend state changed.
    SetBlend(bool),
    /// Texture bound.
    BindTexture(TextureId),
    /// Indexed triangle-list draw.
    DrawIndexed {
        /// First index.
        first_index: u32,
        /// Number of indices.
        index_count: u32,
    },
}

/// Records every call for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    commands: Vec<DrawCommand>,
}

impl RecordingBackend {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded commands in call order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Only the draw calls, as `(first_index, index_count)`.
    #[must_use]
    pub fn draw_calls(&self) -> Vec<(u32, u32)> {
        self.commands
            .iter()
            .filter_map(|command| match *command {
                DrawCommand::DrawIndexed {
                    first_index,
                    index_count,
                } => Some((first_index, index_count)),
                _ => None,
            })
            .collect()
    }

    /// Number of geometry bindings recorded.
    #[must_use]
    pub fn bind_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::BindGeometry { .. }))
            .count()
    }

    /// Total vertices uploaded.
    #[must_use]
    pub fn uploaded_vertices(&self) -> usize {
        self.commands
            .iter()
            .map(|command| match *command {
                DrawCommand::UploadVertices { vertices, .. } => vertices,
                _ => 0,
            })
            .sum()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl<S: Scalar> DrawBackend<S> for RecordingBackend {
    fn bind_geometry(&mut self, geometry: GeometryView<'_, S>) {
        self.commands.push(DrawCommand::BindGeometry {
            vertices: geometry.vertex_count(),
            indices: geometry.indices.len(),
        });
    }

    fn upload_vertices(&mut self, first_vertex: usize, positions: &[S], _tex_coords: &[S]) {
        self.commands.push(DrawCommand::UploadVertices {
            first_vertex,
            vertices: positions.len() / POSITION_COMPONENTS,
        });
    }

    fn set_blend(&mut self, enabled: bool) {
        self.commands.push(DrawCommand::SetBlend(enabled));
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.commands.push(DrawCommand::BindTexture(texture));
    }

    fn draw_indexed(&mut self, first_index: u32, index_count: u32) {
        self.commands.push(DrawCommand::DrawIndexed {
            first_index,
            index_count,
        });
    }
}

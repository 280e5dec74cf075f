//! WGPU pipeline descriptors for the shared geometry streams.
//!
//! Positions and texture coordinates are two non-interleaved vertex
//! buffers; indices are 16-bit triangle lists. Blending is pipeline state
//! in WGPU, so a backend builds one pipeline per distinct [`RenderPath`].

use quadbatch_core::{Fixed16, Scalar};

use crate::batch::{RenderPath, POSITION_COMPONENTS, TEX_COORD_COMPONENTS};

/// Shader location of the position attribute.
pub const POSITION_LOCATION: u32 = 0;

/// Shader location of the texture coordinate attribute.
pub const TEX_COORD_LOCATION: u32 = 1;

/// A [`Scalar`] with a GPU vertex format.
pub trait GpuScalar: Scalar {
    /// Position attribute (3 components).
    const POSITION_ATTRIBS: &'static [wgpu::VertexAttribute];

    /// Texture coordinate attribute (2 components).
    const TEX_COORD_ATTRIBS: &'static [wgpu::VertexAttribute];

    /// Layout of the position buffer.
    fn position_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: (POSITION_COMPONENTS * std::mem::size_of::<Self>()) as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::POSITION_ATTRIBS,
        }
    }

    /// Layout of the texture coordinate buffer.
    fn tex_coord_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: (TEX_COORD_COMPONENTS * std::mem::size_of::<Self>()) as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::TEX_COORD_ATTRIBS,
        }
    }

    /// Both vertex buffer layouts in binding order.
    fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
        [Self::position_layout(), Self::tex_coord_layout()]
    }
}

impl GpuScalar for f32 {
    const POSITION_ATTRIBS: &'static [wgpu::VertexAttribute] =
        &wgpu::vertex_attr_array![POSITION_LOCATION => Float32x3];
    const TEX_COORD_ATTRIBS: &'static [wgpu::VertexAttribute] =
        &wgpu::vertex_attr_array![TEX_COORD_LOCATION => Float32x2];
}

impl GpuScalar for Fixed16 {
    // Raw 16.16 integers; the shader scales by 1 / 65536.
    const POSITION_ATTRIBS: &'static [wgpu::VertexAttribute] =
        &wgpu::vertex_attr_array![POSITION_LOCATION => Sint32x3];
    const TEX_COORD_ATTRIBS: &'static [wgpu::VertexAttribute] =
        &wgpu::vertex_attr_array![TEX_COORD_LOCATION => Sint32x2];
}

/// Index format of the shared index buffer.
pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint16;

/// Primitive state for quad batches.
#[must_use]
pub fn primitive_state() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        ..Default::default()
    }
}

/// Blend state for a render path.
#[must_use]
pub const fn blend_state(path: RenderPath) -> Option<wgpu::BlendState> {
    if path.blend() {
        Some(wgpu::BlendState::ALPHA_BLENDING)
    } else {
        None
    }
}

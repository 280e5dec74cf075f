//! Triangle-list index topology for quads.
//!
//! Every quad uses 4 vertices in winding order TL, BL, TR, BR and is drawn
//! as triangles (v0, v1, v2) and (v2, v1, v3).

/// Unique vertices per quad.
pub const VERTICES_PER_QUAD: usize = 4;

/// Indices per quad (two triangles).
pub const INDICES_PER_QUAD: usize = 6;

/// Number of vertices a 16-bit index can address.
pub const MAX_INDEXED_VERTICES: usize = u16::MAX as usize + 1;

/// Fills `out` with the quad pattern, numbering from `first_vertex`.
///
/// # Panics
///
/// Panics if `out` is not whole quads, or if a vertex number does not fit
/// in 16 bits.
pub fn fill_quad_indices(out: &mut [u16], first_vertex: usize) {
    assert_eq!(out.len() % INDICES_PER_QUAD, 0, "index range must be whole quads");
    let quads = out.len() / INDICES_PER_QUAD;
    assert!(
        first_vertex + quads * VERTICES_PER_QUAD <= MAX_INDEXED_VERTICES,
        "quad indices exceed the 16-bit range"
    );

    for (quad, chunk) in out.chunks_exact_mut(INDICES_PER_QUAD).enumerate() {
        let v = (first_vertex + quad * VERTICES_PER_QUAD) as u16;
        chunk.copy_from_slice(&[v, v + 1, v + 2, v + 2, v + 1, v + 3]);
    }
}

/// Index buffer covering every vertex slot of a geometry buffer.
///
/// Always holds exactly `vertex_capacity * 6 / 4` valid indices. Growing
/// only fills the new tail; existing indices are never rewritten.
#[derive(Debug, Clone, Default)]
pub struct QuadIndexBuffer {
    indices: Vec<u16>,
}

impl QuadIndexBuffer {
    /// Creates indices for `vertices` vertex slots.
    ///
    /// # Panics
    ///
    /// Panics if `vertices` is not a multiple of 4 or exceeds
    /// [`MAX_INDEXED_VERTICES`].
    #[must_use]
    pub fn with_capacity(vertices: usize) -> Self {
        let mut buffer = Self::default();
        buffer.extend_to(vertices);
        buffer
    }

    /// Extends coverage to `vertices` vertex slots.
    ///
    /// Returns the number of indices added (zero if already covered).
    ///
    /// # Panics
    ///
    /// Panics if `vertices` is not a multiple of 4 or exceeds
    /// [`MAX_INDEXED_VERTICES`].
    pub fn extend_to(&mut self, vertices: usize) -> usize {
        assert_eq!(vertices % VERTICES_PER_QUAD, 0, "index capacity must be whole quads");

        let old_len = self.indices.len();
        let new_len = vertices / VERTICES_PER_QUAD * INDICES_PER_QUAD;
        if new_len <= old_len {
            return 0;
        }

        self.indices.resize(new_len, 0);
        let first_vertex = old_len / INDICES_PER_QUAD * VERTICES_PER_QUAD;
        fill_quad_indices(&mut self.indices[old_len..], first_vertex);
        new_len - old_len
    }

    /// Vertex slots covered.
    #[inline]
    #[must_use]
    pub fn vertex_capacity(&self) -> usize {
        self.indices.len() / INDICES_PER_QUAD * VERTICES_PER_QUAD
    }

    /// Number of indices.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no vertex slots are covered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// All indices.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.indices
    }

    /// Indices as bytes for GPU upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_quad_pattern() {
        let indices = QuadIndexBuffer::with_capacity(8);
        assert_eq!(indices.as_slice(), &[0, 1, 2, 2, 1, 3, 4, 5, 6, 6, 5, 7]);
        assert_eq!(indices.vertex_capacity(), 8);
    }

    #[test]
    fn test_incremental_matches_from_scratch() {
        let mut grown = QuadIndexBuffer::with_capacity(8);
        let before = grown.as_slice().to_vec();

        assert_eq!(grown.extend_to(16), 12);

        let direct = QuadIndexBuffer::with_capacity(16);
        assert_eq!(grown.as_slice(), direct.as_slice());
        assert_eq!(&grown.as_slice()[..12], before.as_slice());
        assert_eq!(&grown.as_slice()[12..18], &[8, 9, 10, 10, 9, 11]);
    }

    #[test]
    fn test_extend_to_smaller_is_noop() {
        let mut indices = QuadIndexBuffer::with_capacity(16);
        assert_eq!(indices.extend_to(8), 0);
        assert_eq!(indices.len(), 24);
    }

    #[test]
    fn test_full_16_bit_range() {
        let indices = QuadIndexBuffer::with_capacity(MAX_INDEXED_VERTICES);
        let tail = &indices.as_slice()[indices.len() - 6..];
        assert_eq!(tail, &[65532, 65533, 65534, 65534, 65533, 65535]);
    }

    #[test]
    fn test_fill_from_offset() {
        let mut out = [0_u16; 6];
        fill_quad_indices(&mut out, 200);
        assert_eq!(out, [200, 201, 202, 202, 201, 203]);
    }

    #[test]
    fn test_empty() {
        let indices = QuadIndexBuffer::with_capacity(0);
        assert!(indices.is_empty());
        assert_eq!(indices.as_bytes().len(), 0);
    }

    #[test]
    #[should_panic(expected = "quad indices exceed the 16-bit range")]
    fn test_overflow_panics() {
        let _ = QuadIndexBuffer::with_capacity(MAX_INDEXED_VERTICES + 4);
    }
}

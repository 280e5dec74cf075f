//! Per-group quad accumulator.
//!
//! Producers append quads here during a frame; the consumer merges and
//! resets it at the frame boundary.

use quadbatch_core::{GrowableBuffer, GrowthPolicy, Scalar};

use super::indices::VERTICES_PER_QUAD;

/// Position components per vertex (x, y, z).
pub const POSITION_COMPONENTS: usize = 3;

/// Texture coordinate components per vertex (u, v).
pub const TEX_COORD_COMPONENTS: usize = 2;

/// Texture coordinate components per quad: 4 × (u, v).
pub const REGION_COMPONENTS: usize = VERTICES_PER_QUAD * TEX_COORD_COMPONENTS;

/// Accumulates quad geometry for one draw group.
///
/// Vertices are written in a fixed winding order: top-left, bottom-left,
/// top-right, bottom-right. The shared index pattern depends on it.
///
/// Capacity only grows. [`reset`](Self::reset) rewinds the cursor and keeps
/// the storage, so a buffer that has seen its busiest frame never allocates
/// again.
#[derive(Debug, Clone)]
pub struct QuadStagingBuffer<S: Scalar> {
    positions: GrowableBuffer<S>,
    tex_coords: GrowableBuffer<S>,
    used: usize,
    policy: GrowthPolicy,
}

impl<S: Scalar> QuadStagingBuffer<S> {
    /// Creates a buffer with room for `initial_vertices` and the default growth step.
    #[must_use]
    pub fn new(initial_vertices: usize) -> Self {
        Self::with_policy(initial_vertices, GrowthPolicy::default())
    }

    /// Creates a buffer with an explicit growth policy.
    #[must_use]
    pub fn with_policy(initial_vertices: usize, policy: GrowthPolicy) -> Self {
        Self {
            positions: GrowableBuffer::new(initial_vertices, POSITION_COMPONENTS),
            tex_coords: GrowableBuffer::new(initial_vertices, TEX_COORD_COMPONENTS),
            used: 0,
            policy,
        }
    }

    /// Appends one axis-aligned quad.
    ///
    /// `region` holds 4 × (u, v) in winding order and is copied verbatim.
    /// Zero or negative sizes are accepted and produce a degenerate quad.
    ///
    /// # Panics
    ///
    /// Panics if `region` is not exactly 8 values.
    pub fn append_quad(&mut self, left: S, top: S, width: S, height: S, z: S, region: &[S]) {
        assert_eq!(
            region.len(),
            REGION_COMPONENTS,
            "texture region must hold 4 (u, v) pairs"
        );

        let right = left + width;
        let bottom = top + height;

        self.reserve(self.used + VERTICES_PER_QUAD);

        let first = self.used;
        let positions = self.positions.vertices_mut(first, VERTICES_PER_QUAD);
        positions.copy_from_slice(&[
            left, top, z, //
            left, bottom, z, //
            right, top, z, //
            right, bottom, z,
        ]);
        self.tex_coords
            .vertices_mut(first, VERTICES_PER_QUAD)
            .copy_from_slice(region);

        self.used += VERTICES_PER_QUAD;
    }

    /// Appends raw vertices, which need not form whole quads.
    ///
    /// # Panics
    ///
    /// Panics if `positions` is not a whole number of (x, y, z) triples, or
    /// if `tex_coords` does not hold one (u, v) pair per position.
    pub fn append_vertices(&mut self, positions: &[S], tex_coords: &[S]) {
        assert_eq!(
            positions.len() % POSITION_COMPONENTS,
            0,
            "positions must be whole (x, y, z) triples"
        );
        let count = positions.len() / POSITION_COMPONENTS;
        assert_eq!(
            tex_coords.len(),
            count * TEX_COORD_COMPONENTS,
            "one (u, v) pair required per vertex"
        );
        if count == 0 {
            return;
        }

        self.reserve(self.used + count);
        self.positions
            .vertices_mut(self.used, count)
            .copy_from_slice(positions);
        self.tex_coords
            .vertices_mut(self.used, count)
            .copy_from_slice(tex_coords);
        self.used += count;
    }

    /// Logically clears the buffer. Capacity and stale contents are kept.
    #[inline]
    pub fn reset(&mut self) {
        self.used = 0;
    }

    /// Vertices written since the last reset.
    #[inline]
    #[must_use]
    pub const fn used_vertices(&self) -> usize {
        self.used
    }

    /// Whether nothing has been written since the last reset.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Capacity in vertices.
    #[inline]
    #[must_use]
    pub fn capacity_vertices(&self) -> usize {
        self.positions.capacity()
    }

    /// Number of times the storage has grown.
    #[inline]
    #[must_use]
    pub fn growth_count(&self) -> u64 {
        self.positions.generation()
    }

    /// Growth policy.
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Written position components, 3 per vertex.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[S] {
        self.positions.vertices(0, self.used)
    }

    /// Written texture coordinate components, 2 per vertex.
    #[inline]
    #[must_use]
    pub fn tex_coords(&self) -> &[S] {
        self.tex_coords.vertices(0, self.used)
    }

    fn reserve(&mut self, required: usize) {
        let old = self.positions.capacity();
        if let Some(new) = self.positions.reserve_vertices(self.policy, required) {
            self.tex_coords.grow_to(new);
            tracing::debug!(
                scalar = S::NAME,
                old_capacity = old,
                new_capacity = new,
                "staging buffer grown"
            );
        }
    }
}

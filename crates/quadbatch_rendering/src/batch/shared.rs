//! # Shared Geometry Buffer
//!
//! Consolidates every staging buffer of a frame into one set of contiguous
//! position, texture coordinate and index arrays.
//!
//! ## Layout After a Merge
//!
//! ```text
//! vertex slot:  0 ......... 12 ..................... 32 .. capacity
//!               [ group 0  ][ group 2 (group 1 empty)][unused]
//! ranges:       (0, 12)     (12, 0) (12, 20)
//! indices:      valid for every slot in [0, capacity)
//! ```
//!
//! Each range starts on a quad boundary. A group whose vertex count is not
//! a multiple of 4 is followed by padding slots that no range references.

use quadbatch_core::{GrowableBuffer, GrowthPolicy, Scalar};

use super::indices::{QuadIndexBuffer, MAX_INDEXED_VERTICES, VERTICES_PER_QUAD};
use super::staging::{QuadStagingBuffer, POSITION_COMPONENTS, TEX_COORD_COMPONENTS};
use crate::error::{BatchError, BatchResult};
use crate::submit::{DrawBackend, GeometryView};

/// A group's slice of the shared buffer, in vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexRange {
    /// First vertex slot.
    pub offset: usize,
    /// Number of vertices.
    pub count: usize,
}

impl VertexRange {
    /// Empty range at slot zero.
    pub const EMPTY: Self = Self { offset: 0, count: 0 };

    /// Whether the range holds no vertices.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.count == 0
    }

    /// One past the last vertex slot.
    #[inline]
    #[must_use]
    pub const fn end(self) -> usize {
        self.offset + self.count
    }
}

/// Consumer-owned merged geometry.
///
/// The write cursor restarts at zero on every [`merge_all`](Self::merge_all),
/// so the buffer holds exactly one frame. The read cursor trails it and
/// marks how much of that frame the backend already holds. Storage only
/// grows and is capped at what 16-bit indices can address.
#[derive(Debug, Clone)]
pub struct SharedGeometryBuffer<S: Scalar> {
    positions: GrowableBuffer<S>,
    tex_coords: GrowableBuffer<S>,
    indices: QuadIndexBuffer,
    policy: GrowthPolicy,
    /// Vertex slots written by the last merge, padding included.
    write_cursor: usize,
    /// Vertex slots already uploaded to the backend.
    read_cursor: usize,
    ranges: Vec<VertexRange>,
    /// Storage generation the backend's pointers refer to.
    bound_generation: Option<u64>,
}

impl<S: Scalar> SharedGeometryBuffer<S> {
    /// Creates a buffer with the default growth step.
    ///
    /// `initial_vertices` is rounded up to whole quads and capped at the
    /// 16-bit index range.
    #[must_use]
    pub fn new(initial_vertices: usize) -> Self {
        Self::with_policy(initial_vertices, GrowthPolicy::default())
    }

    /// Creates a buffer with an explicit growth policy.
    ///
    /// # Panics
    ///
    /// Panics if the policy step is not whole quads.
    #[must_use]
    pub fn with_policy(initial_vertices: usize, policy: GrowthPolicy) -> Self {
        assert_eq!(
            policy.step() % VERTICES_PER_QUAD,
            0,
            "shared growth step must be whole quads"
        );
        let capacity = initial_vertices
            .next_multiple_of(VERTICES_PER_QUAD)
            .min(MAX_INDEXED_VERTICES);

        Self {
            positions: GrowableBuffer::new(capacity, POSITION_COMPONENTS),
            tex_coords: GrowableBuffer::new(capacity, TEX_COORD_COMPONENTS),
            indices: QuadIndexBuffer::with_capacity(capacity),
            policy,
            write_cursor: 0,
            read_cursor: 0,
            ranges: Vec::new(),
            bound_generation: None,
        }
    }

    /// Merges every staging buffer, in order, and resets them.
    ///
    /// Returns one range per staging buffer. Empty staging buffers get a
    /// zero-length range at the current cursor and copy nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::IndexCapacityExceeded`] if the frame would not
    /// fit in 16-bit indices. Nothing is copied and no staging buffer is
    /// reset in that case.
    pub fn merge_all(&mut self, staging: &mut [QuadStagingBuffer<S>]) -> BatchResult<&[VertexRange]> {
        let required: usize = staging
            .iter()
            .map(|buffer| buffer.used_vertices().next_multiple_of(VERTICES_PER_QUAD))
            .sum();
        if required > MAX_INDEXED_VERTICES {
            tracing::warn!(
                scalar = S::NAME,
                required,
                limit = MAX_INDEXED_VERTICES,
                "merge rejected: frame exceeds 16-bit index range"
            );
            return Err(BatchError::IndexCapacityExceeded {
                required,
                limit: MAX_INDEXED_VERTICES,
            });
        }

        self.reserve(required);
        self.write_cursor = 0;
        self.read_cursor = 0;
        self.ranges.clear();

        for buffer in staging.iter_mut() {
            let offset = self.write_cursor;
            let count = buffer.used_vertices();
            if count > 0 {
                self.positions
                    .vertices_mut(offset, count)
                    .copy_from_slice(buffer.positions());
                self.tex_coords
                    .vertices_mut(offset, count)
                    .copy_from_slice(buffer.tex_coords());
                self.write_cursor = (offset + count).next_multiple_of(VERTICES_PER_QUAD);
            }
            buffer.reset();
            self.ranges.push(VertexRange { offset, count });
        }

        tracing::trace!(
            scalar = S::NAME,
            groups = self.ranges.len(),
            vertices = self.write_cursor,
            capacity = self.capacity_vertices(),
            "staging buffers merged"
        );
        Ok(&self.ranges)
    }

    /// Moves the read cursor back to the first vertex slot.
    ///
    /// Merged data and the write cursor are untouched. The next
    /// [`upload_pending`](Self::upload_pending) resends the whole frame, e.g.
    /// after the backend lost its copy.
    #[inline]
    pub fn rewind_for_draw(&mut self) {
        self.read_cursor = 0;
    }

    /// Binds geometry pointers unless the current storage is already bound.
    ///
    /// Pointers go stale only when storage is reallocated or the buffer is
    /// [`reset`](Self::reset). Returns whether a bind happened.
    pub fn bind_pointers_once<B: DrawBackend<S> + ?Sized>(&mut self, backend: &mut B) -> bool {
        let generation = self.generation();
        if self.bound_generation == Some(generation) {
            return false;
        }

        backend.bind_geometry(self.view());
        self.bound_generation = Some(generation);
        // Fresh backend storage holds none of the frame yet
        self.read_cursor = 0;
        tracing::debug!(
            scalar = S::NAME,
            generation,
            capacity = self.capacity_vertices(),
            "geometry pointers bound"
        );
        true
    }

    /// Uploads vertex slots merged since the last upload.
    ///
    /// Sends `[read_cursor, write_cursor)` and advances the read cursor to
    /// the write cursor. Returns the number of vertex slots sent; drawing
    /// the same merge twice uploads nothing the second time.
    pub fn upload_pending<B: DrawBackend<S> + ?Sized>(&mut self, backend: &mut B) -> usize {
        let start = self.read_cursor;
        let count = self.write_cursor.saturating_sub(start);
        if count == 0 {
            return 0;
        }

        backend.upload_vertices(
            start,
            self.positions.vertices(start, count),
            self.tex_coords.vertices(start, count),
        );
        self.read_cursor = self.write_cursor;
        count
    }

    /// Full reset: cursors, ranges and the bound-pointers flag.
    pub fn reset(&mut self) {
        self.write_cursor = 0;
        self.read_cursor = 0;
        self.ranges.clear();
        self.bound_generation = None;
    }

    /// Pointers over the whole capacity.
    #[must_use]
    pub fn view(&self) -> GeometryView<'_, S> {
        let slots = self.capacity_vertices();
        GeometryView {
            positions: self.positions.vertices(0, slots),
            tex_coords: self.tex_coords.vertices(0, slots),
            indices: self.indices.as_slice(),
        }
    }

    /// Ranges produced by the last merge.
    #[inline]
    #[must_use]
    pub fn ranges(&self) -> &[VertexRange] {
        &self.ranges
    }

    /// Vertex slots used by the last merge, padding included.
    #[inline]
    #[must_use]
    pub const fn total_used_vertices(&self) -> usize {
        self.write_cursor
    }

    /// Vertex slots of the current frame already uploaded.
    #[inline]
    #[must_use]
    pub const fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    /// Capacity in vertex slots.
    #[inline]
    #[must_use]
    pub fn capacity_vertices(&self) -> usize {
        self.positions.capacity()
    }

    /// Storage generation; bumps on every reallocation.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.positions.generation()
    }

    /// Merged position components, 3 per used vertex slot.
    #[must_use]
    pub fn positions(&self) -> &[S] {
        self.positions.vertices(0, self.write_cursor)
    }

    /// Merged texture coordinate components, 2 per used vertex slot.
    #[must_use]
    pub fn tex_coords(&self) -> &[S] {
        self.tex_coords.vertices(0, self.write_cursor)
    }

    /// Index sequence covering the whole capacity.
    #[must_use]
    pub fn indices(&self) -> &QuadIndexBuffer {
        &self.indices
    }

    /// Used positions as bytes for upload.
    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.positions())
    }

    /// Used texture coordinates as bytes for upload.
    #[must_use]
    pub fn tex_coord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.tex_coords())
    }

    fn reserve(&mut self, required: usize) {
        let old = self.capacity_vertices();
        let Some(planned) = self.policy.plan(old, required) else {
            return;
        };
        let new = planned.min(MAX_INDEXED_VERTICES);

        self.positions.grow_to(new);
        self.tex_coords.grow_to(new);
        let added = self.indices.extend_to(new);
        tracing::debug!(
            scalar = S::NAME,
            old_capacity = old,
            new_capacity = new,
            indices_added = added,
            "shared geometry buffer grown"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::{DrawCommand, RecordingBackend};

    const REGION: [f32; 8] = [0.0, 0.25, 0.0, 0.0, 1.0, 0.25, 1.0, 0.0];

    fn staging_with_quads(quads: &[usize]) -> Vec<QuadStagingBuffer<f32>> {
        quads
            .iter()
            .map(|&n| {
                let mut buffer = QuadStagingBuffer::new(8);
                for i in 0..n {
                    buffer.append_quad(i as f32, 1.0, 2.0, 2.0, 0.0, &REGION);
                }
                buffer
            })
            .collect()
    }

    #[test]
    fn test_merge_offsets() {
        let mut shared = SharedGeometryBuffer::<f32>::new(200);
        let mut staging = staging_with_quads(&[3, 0, 5]);

        let ranges = shared.merge_all(&mut staging).unwrap().to_vec();
        assert_eq!(
            ranges,
            vec![
                VertexRange { offset: 0, count: 12 },
                VertexRange { offset: 12, count: 0 },
                VertexRange { offset: 12, count: 20 },
            ]
        );
        assert_eq!(shared.total_used_vertices(), 32);
        assert!(staging.iter().all(QuadStagingBuffer::is_empty));
    }

    #[test]
    fn test_merge_copies_contents() {
        let mut shared = SharedGeometryBuffer::<f32>::new(200);
        let mut staging = staging_with_quads(&[1, 2]);
        let expected_positions: Vec<f32> = staging
            .iter()
            .flat_map(|buffer| buffer.positions().to_vec())
            .collect();

        shared.merge_all(&mut staging).unwrap();
        assert_eq!(shared.positions(), expected_positions.as_slice());
        assert_eq!(&shared.tex_coords()[8..16], &REGION);
    }

    #[test]
    fn test_partial_quad_padding() {
        let mut shared = SharedGeometryBuffer::<f32>::new(200);
        let mut first = QuadStagingBuffer::new(16);
        first.append_vertices(&[0.0; 30], &[0.0; 20]);
        let mut staging = vec![first, staging_with_quads(&[1]).remove(0)];

        let ranges = shared.merge_all(&mut staging).unwrap();
        assert_eq!(ranges[0], VertexRange { offset: 0, count: 10 });
        assert_eq!(ranges[1], VertexRange { offset: 12, count: 4 });
        assert_eq!(shared.total_used_vertices(), 16);
    }

    #[test]
    fn test_empty_merge_changes_nothing() {
        let mut shared = SharedGeometryBuffer::<f32>::new(200);
        let mut staging = staging_with_quads(&[0, 0]);
        staging[0].reset();
        staging[0].reset();

        let ranges = shared.merge_all(&mut staging).unwrap();
        assert_eq!(ranges, &[VertexRange::EMPTY, VertexRange::EMPTY]);
        assert_eq!(shared.total_used_vertices(), 0);
        assert_eq!(shared.capacity_vertices(), 200);
        assert_eq!(shared.generation(), 0);
    }

    #[test]
    fn test_growth_extends_indices() {
        let mut shared = SharedGeometryBuffer::<f32>::with_policy(8, GrowthPolicy::quads(2));
        let before = shared.indices().as_slice().to_vec();

        let mut staging = staging_with_quads(&[3, 2]);
        shared.merge_all(&mut staging).unwrap();

        assert_eq!(shared.capacity_vertices(), 24);
        assert_eq!(shared.indices().len(), 36);
        assert_eq!(&shared.indices().as_slice()[..12], before.as_slice());
        assert_eq!(
            shared.indices().as_slice(),
            QuadIndexBuffer::with_capacity(24).as_slice()
        );
    }

    #[test]
    fn test_bind_only_after_growth() {
        let mut shared = SharedGeometryBuffer::<f32>::with_policy(8, GrowthPolicy::quads(2));
        let mut backend = RecordingBackend::new();

        assert!(shared.bind_pointers_once(&mut backend));
        assert!(!shared.bind_pointers_once(&mut backend));

        let mut staging = staging_with_quads(&[1]);
        shared.merge_all(&mut staging).unwrap();
        shared.rewind_for_draw();
        assert!(!shared.bind_pointers_once(&mut backend));

        let mut staging = staging_with_quads(&[4]);
        shared.merge_all(&mut staging).unwrap();
        assert!(shared.bind_pointers_once(&mut backend));
        assert_eq!(backend.bind_count(), 2);

        shared.reset();
        assert_eq!(shared.total_used_vertices(), 0);
        assert!(shared.ranges().is_empty());
        assert!(shared.bind_pointers_once(&mut backend));
    }

    #[test]
    fn test_upload_follows_read_cursor() {
        let mut shared = SharedGeometryBuffer::<f32>::new(200);
        let mut backend = RecordingBackend::new();
        shared.bind_pointers_once(&mut backend);

        let mut staging = staging_with_quads(&[2, 1]);
        shared.merge_all(&mut staging).unwrap();
        assert_eq!(shared.read_cursor(), 0);
        assert_eq!(shared.upload_pending(&mut backend), 12);
        assert_eq!(shared.read_cursor(), 12);
        assert_eq!(shared.upload_pending(&mut backend), 0);

        shared.rewind_for_draw();
        assert_eq!(shared.read_cursor(), 0);
        assert_eq!(shared.total_used_vertices(), 12);
        assert_eq!(shared.upload_pending(&mut backend), 12);

        // A new merge invalidates what the backend holds
        let mut staging = staging_with_quads(&[1]);
        shared.merge_all(&mut staging).unwrap();
        assert_eq!(shared.upload_pending(&mut backend), 4);
        assert_eq!(
            &backend.commands()[1..],
            &[
                DrawCommand::UploadVertices { first_vertex: 0, vertices: 12 },
                DrawCommand::UploadVertices { first_vertex: 0, vertices: 12 },
                DrawCommand::UploadVertices { first_vertex: 0, vertices: 4 },
            ]
        );
    }

    #[test]
    fn test_rebind_resends_frame() {
        let mut shared = SharedGeometryBuffer::<f32>::with_policy(8, GrowthPolicy::quads(2));
        let mut backend = RecordingBackend::new();
        let mut staging = staging_with_quads(&[1]);
        shared.merge_all(&mut staging).unwrap();
        shared.bind_pointers_once(&mut backend);
        shared.upload_pending(&mut backend);

        shared.reset();
        let mut staging = staging_with_quads(&[2]);
        shared.merge_all(&mut staging).unwrap();
        assert_eq!(shared.upload_pending(&mut backend), 8);

        // Re-binding drops the backend's copy; the frame goes again
        assert!(shared.bind_pointers_once(&mut backend));
        assert_eq!(shared.read_cursor(), 0);
        assert_eq!(shared.upload_pending(&mut backend), 8);
        assert_eq!(backend.uploaded_vertices(), 20);
    }

    #[test]
    fn test_view_covers_capacity() {
        let mut shared = SharedGeometryBuffer::<f32>::new(16);
        let mut staging = staging_with_quads(&[1]);
        shared.merge_all(&mut staging).unwrap();

        let view = shared.view();
        assert_eq!(view.vertex_count(), 16);
        assert_eq!(view.tex_coords.len(), 32);
        assert_eq!(view.indices.len(), 24);
        assert_eq!(&view.positions[..12], shared.positions());
    }

    #[test]
    fn test_capacity_capped_at_index_range() {
        let mut shared = SharedGeometryBuffer::<f32>::new(MAX_INDEXED_VERTICES - 100);
        assert_eq!(shared.capacity_vertices(), MAX_INDEXED_VERTICES - 100);

        let mut buffer = QuadStagingBuffer::new(MAX_INDEXED_VERTICES);
        buffer.append_vertices(
            &vec![0.0; MAX_INDEXED_VERTICES * 3],
            &vec![0.0; MAX_INDEXED_VERTICES * 2],
        );
        let mut staging = vec![buffer];
        shared.merge_all(&mut staging).unwrap();
        assert_eq!(shared.capacity_vertices(), MAX_INDEXED_VERTICES);
        assert_eq!(*shared.indices().as_slice().last().unwrap(), u16::MAX);
    }

    #[test]
    fn test_index_range_exceeded() {
        let mut shared = SharedGeometryBuffer::<f32>::new(200);
        let mut buffer = QuadStagingBuffer::new(MAX_INDEXED_VERTICES + 4);
        buffer.append_vertices(
            &vec![0.0; (MAX_INDEXED_VERTICES + 1) * 3],
            &vec![0.0; (MAX_INDEXED_VERTICES + 1) * 2],
        );
        let mut staging = vec![buffer];

        let err = shared.merge_all(&mut staging).unwrap_err();
        assert!(matches!(
            err,
            BatchError::IndexCapacityExceeded { required, limit }
                if required == MAX_INDEXED_VERTICES + 4 && limit == MAX_INDEXED_VERTICES
        ));
        assert_eq!(staging[0].used_vertices(), MAX_INDEXED_VERTICES + 1);
        assert_eq!(shared.capacity_vertices(), 200);
    }
}

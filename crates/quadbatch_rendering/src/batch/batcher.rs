//! Frame-level batching: merge, then draw.

use quadbatch_core::Scalar;

use super::draw::DrawPlan;
use super::shared::{SharedGeometryBuffer, VertexRange};
use super::staging::QuadStagingBuffer;
use crate::config::BatchConfig;
use crate::error::BatchResult;
use crate::stats::{BatchStats, FrameStats};
use crate::submit::DrawBackend;

/// Owns the shared geometry buffer and the draw plan.
///
/// ## Usage
///
/// ```rust,ignore
/// let config = BatchConfig::default();
/// let mut batcher = QuadBatcher::<f32>::new(&config)?;
/// let mut staging = config.staging_buffers::<f32>();
///
/// loop {
///     sprite.emit(&mut staging[1]);
///     batcher.merge(&mut staging)?;
///     batcher.draw(&mut backend);
/// }
/// ```
#[derive(Debug)]
pub struct QuadBatcher<S: Scalar> {
    shared: SharedGeometryBuffer<S>,
    plan: DrawPlan,
    stats: BatchStats,
}

impl<S: Scalar> QuadBatcher<S> {
    /// Creates a batcher for the configured groups.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidConfig`](crate::BatchError::InvalidConfig)
    /// if the configuration does not validate.
    pub fn new(config: &BatchConfig) -> BatchResult<Self> {
        config.validate()?;
        let plan = config.draw_plan()?;
        let shared =
            SharedGeometryBuffer::with_policy(config.initial_vertex_capacity, config.growth_policy());
        tracing::debug!(
            scalar = S::NAME,
            groups = plan.len(),
            capacity = shared.capacity_vertices(),
            "quad batcher created"
        );
        Ok(Self {
            shared,
            plan,
            stats: BatchStats::default(),
        })
    }

    /// Merges this frame's staging buffers and assigns group ranges.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::IndexCapacityExceeded`](crate::BatchError::IndexCapacityExceeded)
    /// if the frame does not fit in 16-bit indices; the previous frame's
    /// ranges stay assigned.
    ///
    /// # Panics
    ///
    /// Panics if there is not exactly one staging buffer per group.
    pub fn merge(&mut self, staging: &mut [QuadStagingBuffer<S>]) -> BatchResult<()> {
        assert_eq!(
            staging.len(),
            self.plan.len(),
            "one staging buffer required per draw group"
        );
        let ranges = self.shared.merge_all(staging)?;
        self.plan.assign_ranges(ranges);
        Ok(())
    }

    /// Draws the last merged frame.
    ///
    /// Re-binds after a reallocation, uploads whatever the backend does not
    /// hold yet, then issues one draw per non-empty group.
    pub fn draw<B: DrawBackend<S> + ?Sized>(&mut self, backend: &mut B) -> FrameStats {
        let rebound = self.shared.bind_pointers_once(backend);
        let uploaded = self.shared.upload_pending(backend);
        let mut frame = self.plan.submit::<S, B>(backend);
        frame.rebound = rebound;
        frame.uploaded_vertices = uploaded as u64;

        self.stats.record(
            frame,
            self.shared.capacity_vertices(),
            self.shared.generation(),
        );
        frame
    }

    /// Drops merged data and forces a re-bind on the next draw.
    pub fn reset(&mut self) {
        self.shared.reset();
        let empty = vec![VertexRange::EMPTY; self.plan.len()];
        self.plan.assign_ranges(&empty);
    }

    /// Shared geometry buffer.
    #[must_use]
    pub fn shared(&self) -> &SharedGeometryBuffer<S> {
        &self.shared
    }

    /// Draw plan.
    #[must_use]
    pub fn plan(&self) -> &DrawPlan {
        &self.plan
    }

    /// Running statistics.
    #[must_use]
    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{GroupState, TextureId};
    use crate::submit::{DrawCommand, RecordingBackend};

    const REGION: [f32; 8] = [0.0, 0.25, 0.0, 0.0, 1.0, 0.25, 1.0, 0.0];

    #[test]
    fn test_merge_then_draw() {
        let config = BatchConfig::default();
        let mut batcher = QuadBatcher::<f32>::new(&config).unwrap();
        let mut staging = config.staging_buffers::<f32>();
        staging[1].append_quad(0.0, 0.0, 64.0, 64.0, 0.0, &REGION);

        batcher.merge(&mut staging).unwrap();
        let mut backend = RecordingBackend::new();
        let frame = batcher.draw(&mut backend);

        assert_eq!(frame.draw_calls, 1);
        assert_eq!(frame.skipped_groups, 1);
        assert!(frame.rebound);
        assert_eq!(frame.uploaded_vertices, 4);
        assert_eq!(
            &backend.commands()[1..],
            &[
                DrawCommand::UploadVertices { first_vertex: 0, vertices: 4 },
                DrawCommand::SetBlend(true),
                DrawCommand::BindTexture(TextureId(2)),
                DrawCommand::DrawIndexed { first_index: 0, index_count: 6 },
            ]
        );
        assert_eq!(batcher.plan().groups()[0].state(), GroupState::Idle);
        assert_eq!(batcher.plan().groups()[1].state(), GroupState::Issued);
    }

    #[test]
    fn test_redraw_without_rebind() {
        let config = BatchConfig::default();
        let mut batcher = QuadBatcher::<f32>::new(&config).unwrap();
        let mut staging = config.staging_buffers::<f32>();
        staging[0].append_quad(0.0, 0.0, 320.0, 240.0, 0.0, &REGION);
        batcher.merge(&mut staging).unwrap();

        let mut backend = RecordingBackend::new();
        batcher.draw(&mut backend);
        let second = batcher.draw(&mut backend);

        assert!(!second.rebound);
        assert_eq!(second.uploaded_vertices, 0);
        assert_eq!(backend.bind_count(), 1);
        assert_eq!(backend.uploaded_vertices(), 4);
        assert_eq!(backend.draw_calls(), vec![(0, 6), (0, 6)]);
        assert_eq!(batcher.stats().frames, 2);
        assert_eq!(batcher.stats().rebinds, 1);
    }

    #[test]
    fn test_every_merge_is_uploaded() {
        let config = BatchConfig::default();
        let mut batcher = QuadBatcher::<f32>::new(&config).unwrap();
        let mut staging = config.staging_buffers::<f32>();
        let mut backend = RecordingBackend::new();

        for quads in [1_usize, 3, 2] {
            for i in 0..quads {
                staging[1].append_quad(i as f32, 0.0, 8.0, 8.0, 0.0, &REGION);
            }
            batcher.merge(&mut staging).unwrap();
            let frame = batcher.draw(&mut backend);
            assert_eq!(frame.uploaded_vertices, quads as u64 * 4);
        }

        assert_eq!(backend.bind_count(), 1);
        assert_eq!(backend.uploaded_vertices(), 24);
        assert_eq!(batcher.stats().uploaded_vertices, 24);
    }

    #[test]
    fn test_reset_clears_ranges() {
        let config = BatchConfig::default();
        let mut batcher = QuadBatcher::<f32>::new(&config).unwrap();
        let mut staging = config.staging_buffers::<f32>();
        staging[0].append_quad(0.0, 0.0, 1.0, 1.0, 0.0, &REGION);
        batcher.merge(&mut staging).unwrap();

        batcher.reset();
        let mut backend = RecordingBackend::new();
        let frame = batcher.draw(&mut backend);
        assert_eq!(frame.draw_calls, 0);
        assert!(frame.rebound);
    }

    #[test]
    fn test_oversized_growth_step_rejected() {
        let config = BatchConfig {
            growth_step_quads: usize::MAX / 2,
            ..BatchConfig::default()
        };
        assert!(matches!(
            QuadBatcher::<f32>::new(&config),
            Err(crate::BatchError::InvalidConfig(_))
        ));
    }

    #[test]
    #[should_panic(expected = "one staging buffer required per draw group")]
    fn test_group_count_mismatch_panics() {
        let mut batcher = QuadBatcher::<f32>::new(&BatchConfig::default()).unwrap();
        let mut staging = vec![QuadStagingBuffer::<f32>::new(4)];
        let _ = batcher.merge(&mut staging);
    }
}

//! Batching statistics.

/// Statistics from one draw submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Draw calls issued.
    pub draw_calls: u32,
    /// Groups skipped because they held no whole quad.
    pub skipped_groups: u32,
    /// Vertices covered by the issued draw calls.
    pub vertices: u64,
    /// Vertex slots uploaded to the backend this frame.
    pub uploaded_vertices: u64,
    /// Whether geometry pointers were re-bound this frame.
    pub rebound: bool,
}

impl FrameStats {
    /// Quads covered by the issued draw calls.
    #[inline]
    #[must_use]
    pub const fn quads(&self) -> u64 {
        self.vertices / 4
    }
}

/// Running totals across frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchStats {
    /// Frames submitted.
    pub frames: u64,
    /// Draw calls issued.
    pub draw_calls: u64,
    /// Groups skipped because they were empty.
    pub skipped_groups: u64,
    /// Vertices submitted.
    pub vertices: u64,
    /// Vertex slots uploaded.
    pub uploaded_vertices: u64,
    /// Geometry pointer re-binds.
    pub rebinds: u64,
    /// Shared buffer reallocations.
    pub growths: u64,
    /// Shared buffer capacity after the last frame, in vertices.
    pub capacity_vertices: usize,
    /// The most recent frame.
    pub last_frame: FrameStats,
}

impl BatchStats {
    /// Adds one frame to the totals.
    pub fn record(&mut self, frame: FrameStats, capacity_vertices: usize, growths: u64) {
        self.frames += 1;
        self.draw_calls += u64::from(frame.draw_calls);
        self.skipped_groups += u64::from(frame.skipped_groups);
        self.vertices += frame.vertices;
        self.uploaded_vertices += frame.uploaded_vertices;
        self.rebinds += u64::from(frame.rebound);
        self.growths = growths;
        self.capacity_vertices = capacity_vertices;
        self.last_frame = frame;
    }

    /// Average draw calls per frame.
    #[must_use]
    pub fn draw_calls_per_frame(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.draw_calls as f64 / self.frames as f64
        }
    }

    /// Average quads per draw call.
    #[must_use]
    pub fn quads_per_draw(&self) -> f64 {
        if self.draw_calls == 0 {
            0.0
        } else {
            (self.vertices / 4) as f64 / self.draw_calls as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates() {
        let mut stats = BatchStats::default();
        let frame = FrameStats {
            draw_calls: 2,
            skipped_groups: 1,
            vertices: 40,
            uploaded_vertices: 40,
            rebound: true,
        };
        stats.record(frame, 200, 0);
        stats.record(
            FrameStats {
                rebound: false,
                uploaded_vertices: 0,
                ..frame
            },
            400,
            1,
        );

        assert_eq!(stats.frames, 2);
        assert_eq!(stats.draw_calls, 4);
        assert_eq!(stats.skipped_groups, 2);
        assert_eq!(stats.rebinds, 1);
        assert_eq!(stats.uploaded_vertices, 40);
        assert_eq!(stats.growths, 1);
        assert_eq!(stats.capacity_vertices, 400);
        assert!((stats.draw_calls_per_frame() - 2.0).abs() < f64::EPSILON);
        assert!((stats.quads_per_draw() - 5.0).abs() < f64::EPSILON);
        assert_eq!(stats.last_frame.quads(), 10);
    }

    #[test]
    fn test_empty_averages() {
        let stats = BatchStats::default();
        assert!(stats.draw_calls_per_frame().abs() < f64::EPSILON);
        assert!(stats.quads_per_draw().abs() < f64::EPSILON);
    }
}

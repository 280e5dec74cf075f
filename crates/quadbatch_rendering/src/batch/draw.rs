//! # Draw Groups
//!
//! A draw group pairs a render path (texture and blend state) with a vertex
//! range of the shared geometry buffer. The ordered groups of a
//! [`DrawPlan`] are one frame's submission.
//!
//! ## Per-Group Lifecycle
//!
//! ```text
//! Idle ──merge──▶ Ranged ──render──▶ Issued ──merge──▶ Ranged ...
//!                    │
//!                    └──render (empty)──▶ Idle
//! ```

use quadbatch_core::Scalar;
use serde::{Deserialize, Serialize};

use super::indices::{INDICES_PER_QUAD, VERTICES_PER_QUAD};
use super::shared::VertexRange;
use crate::error::{BatchError, BatchResult};
use crate::stats::FrameStats;
use crate::submit::DrawBackend;

/// Opaque texture handle owned by the graphics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureId(pub u32);

/// How a group's geometry is drawn. Chosen once when the plan is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPath {
    /// Draw with whatever state the backend currently has.
    Untextured,
    /// Set blend state and bind a texture, then draw.
    Textured {
        /// Texture to bind.
        texture: TextureId,
        /// Whether alpha blending is enabled.
        blend: bool,
    },
}

impl RenderPath {
    /// Bound texture, if any.
    #[inline]
    #[must_use]
    pub const fn texture(self) -> Option<TextureId> {
        match self {
            Self::Untextured => None,
            Self::Textured { texture, .. } => Some(texture),
        }
    }

    /// Whether blending is enabled for this path.
    #[inline]
    #[must_use]
    pub const fn blend(self) -> bool {
        match self {
            Self::Untextured => false,
            Self::Textured { blend, .. } => blend,
        }
    }
}

/// What the graphics layer needs to issue one group's draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawDescriptor {
    /// Texture to bind, `None` for the untextured path.
    pub texture: Option<TextureId>,
    /// Blend state.
    pub blend: bool,
    /// First index in the shared index buffer.
    pub index_offset: u32,
    /// Number of indices.
    pub index_count: u32,
}

/// Where a group is in its per-frame lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupState {
    /// No range assigned, or skipped because empty.
    #[default]
    Idle,
    /// Range assigned by the last merge.
    Ranged,
    /// Draw call issued.
    Issued,
}

/// A render path plus its vertex range in the shared buffer.
#[derive(Debug, Clone)]
pub struct DrawGroup {
    name: String,
    path: RenderPath,
    range: VertexRange,
    state: GroupState,
}

impl DrawGroup {
    /// Creates an idle group with an empty range.
    #[must_use]
    pub fn new(name: impl Into<String>, path: RenderPath) -> Self {
        Self {
            name: name.into(),
            path,
            range: VertexRange::EMPTY,
            state: GroupState::Idle,
        }
    }

    /// Group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render path.
    #[inline]
    #[must_use]
    pub const fn path(&self) -> RenderPath {
        self.path
    }

    /// Vertex range from the last merge.
    #[inline]
    #[must_use]
    pub const fn range(&self) -> VertexRange {
        self.range
    }

    /// Lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> GroupState {
        self.state
    }

    /// Assigns this frame's vertex range.
    pub fn assign(&mut self, range: VertexRange) {
        self.range = range;
        self.state = GroupState::Ranged;
    }

    /// Vertices the draw call covers: the range cut down to whole quads.
    #[inline]
    #[must_use]
    pub const fn drawn_vertices(&self) -> usize {
        self.range.count / VERTICES_PER_QUAD * VERTICES_PER_QUAD
    }

    /// Draw descriptor, or `None` if the group holds no whole quad.
    ///
    /// A trailing partial quad is left out: a triangle list needs whole
    /// triangles, and its missing corners are padding slots.
    #[must_use]
    pub fn descriptor(&self) -> Option<DrawDescriptor> {
        let index_count = self.drawn_vertices() / VERTICES_PER_QUAD * INDICES_PER_QUAD;
        if index_count == 0 {
            return None;
        }
        Some(DrawDescriptor {
            texture: self.path.texture(),
            blend: self.path.blend(),
            index_offset: (self.range.offset / VERTICES_PER_QUAD * INDICES_PER_QUAD) as u32,
            index_count: index_count as u32,
        })
    }

    /// Issues this group's draw call.
    ///
    /// Empty groups are skipped without touching the backend. Returns
    /// whether a draw call was issued.
    pub fn render<S: Scalar, B: DrawBackend<S> + ?Sized>(&mut self, backend: &mut B) -> bool {
        let Some(descriptor) = self.descriptor() else {
            self.state = GroupState::Idle;
            return false;
        };

        if let RenderPath::Textured { texture, blend } = self.path {
            backend.set_blend(blend);
            backend.bind_texture(texture);
        }
        backend.draw_indexed(descriptor.index_offset, descriptor.index_count);
        self.state = GroupState::Issued;
        true
    }
}

/// Ordered draw groups, one per staging buffer.
#[derive(Debug, Clone, Default)]
pub struct DrawPlan {
    groups: Vec<DrawGroup>,
}

impl DrawPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a group and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidConfig`] if the name is already taken.
    pub fn push(&mut self, name: impl Into<String>, path: RenderPath) -> BatchResult<usize> {
        let name = name.into();
        if self.groups.iter().any(|group| group.name == name) {
            return Err(BatchError::InvalidConfig(format!(
                "duplicate draw group: {name}"
            )));
        }
        self.groups.push(DrawGroup::new(name, path));
        Ok(self.groups.len() - 1)
    }

    /// Number of groups.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the plan has no groups.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in submission order.
    #[must_use]
    pub fn groups(&self) -> &[DrawGroup] {
        &self.groups
    }

    /// Position of the named group.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::UnknownGroup`] if no group has that name.
    pub fn index_of(&self, name: &str) -> BatchResult<usize> {
        self.groups
            .iter()
            .position(|group| group.name == name)
            .ok_or_else(|| BatchError::UnknownGroup(name.to_owned()))
    }

    /// The named group.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::UnknownGroup`] if no group has that name.
    pub fn group(&self, name: &str) -> BatchResult<&DrawGroup> {
        self.index_of(name).map(|index| &self.groups[index])
    }

    /// Assigns merge output to the groups, in order.
    ///
    /// # Panics
    ///
    /// Panics if `ranges` does not hold exactly one range per group.
    pub fn assign_ranges(&mut self, ranges: &[VertexRange]) {
        assert_eq!(
            ranges.len(),
            self.groups.len(),
            "one vertex range required per draw group"
        );
        for (group, &range) in self.groups.iter_mut().zip(ranges) {
            group.assign(range);
        }
    }

    /// Descriptors of the groups that would issue a draw call.
    pub fn descriptors(&self) -> impl Iterator<Item = DrawDescriptor> + '_ {
        self.groups.iter().filter_map(DrawGroup::descriptor)
    }

    /// Renders every group in order.
    pub fn submit<S: Scalar, B: DrawBackend<S> + ?Sized>(&mut self, backend: &mut B) -> FrameStats {
        let mut frame = FrameStats::default();
        for group in &mut self.groups {
            if group.render::<S, B>(backend) {
                frame.draw_calls += 1;
                frame.vertices += group.drawn_vertices() as u64;
            } else {
                frame.skipped_groups += 1;
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::{DrawCommand, RecordingBackend};

    fn sprites() -> RenderPath {
        RenderPath::Textured {
            texture: TextureId(2),
            blend: true,
        }
    }

    #[test]
    fn test_descriptor_index_range() {
        let mut group = DrawGroup::new("sprites", sprites());
        group.assign(VertexRange { offset: 12, count: 20 });

        let descriptor = group.descriptor().unwrap();
        assert_eq!(descriptor.index_offset, 18);
        assert_eq!(descriptor.index_count, 30);
        assert_eq!(descriptor.texture, Some(TextureId(2)));
        assert!(descriptor.blend);
    }

    #[test]
    fn test_empty_group_skipped() {
        let mut group = DrawGroup::new("background", RenderPath::Untextured);
        group.assign(VertexRange { offset: 12, count: 0 });
        assert_eq!(group.state(), GroupState::Ranged);

        let mut backend = RecordingBackend::new();
        assert!(!group.render::<f32, _>(&mut backend));
        assert!(backend.commands().is_empty());
        assert_eq!(group.state(), GroupState::Idle);
    }

    #[test]
    fn test_textured_path_sets_state_before_draw() {
        let mut group = DrawGroup::new("sprites", sprites());
        group.assign(VertexRange { offset: 0, count: 4 });

        let mut backend = RecordingBackend::new();
        assert!(group.render::<f32, _>(&mut backend));
        assert_eq!(group.state(), GroupState::Issued);
        assert_eq!(
            backend.commands(),
            &[
                DrawCommand::SetBlend(true),
                DrawCommand::BindTexture(TextureId(2)),
                DrawCommand::DrawIndexed { first_index: 0, index_count: 6 },
            ]
        );
    }

    #[test]
    fn test_untextured_path_only_draws() {
        let mut group = DrawGroup::new("plain", RenderPath::Untextured);
        group.assign(VertexRange { offset: 8, count: 8 });

        let mut backend = RecordingBackend::new();
        group.render::<f32, _>(&mut backend);
        assert_eq!(backend.draw_calls(), vec![(12, 12)]);
        assert_eq!(backend.commands().len(), 1);
    }

    #[test]
    fn test_plan_submit_counts() {
        let mut plan = DrawPlan::new();
        plan.push("a", RenderPath::Untextured).unwrap();
        plan.push("b", sprites()).unwrap();
        plan.push("c", sprites()).unwrap();
        plan.assign_ranges(&[
            VertexRange { offset: 0, count: 12 },
            VertexRange { offset: 12, count: 0 },
            VertexRange { offset: 12, count: 20 },
        ]);

        assert_eq!(plan.descriptors().count(), 2);

        let mut backend = RecordingBackend::new();
        let frame = plan.submit::<f32, _>(&mut backend);
        assert_eq!(frame.draw_calls, 2);
        assert_eq!(frame.skipped_groups, 1);
        assert_eq!(frame.vertices, 32);
        assert_eq!(backend.draw_calls(), vec![(0, 18), (18, 30)]);
    }

    #[test]
    fn test_partial_quad_not_drawn_or_counted() {
        let mut plan = DrawPlan::new();
        plan.push("raw", RenderPath::Untextured).unwrap();
        plan.push("tiny", sprites()).unwrap();
        plan.assign_ranges(&[
            VertexRange { offset: 0, count: 10 },
            VertexRange { offset: 12, count: 3 },
        ]);
        assert_eq!(plan.groups()[0].drawn_vertices(), 8);

        let mut backend = RecordingBackend::new();
        let frame = plan.submit::<f32, _>(&mut backend);
        assert_eq!(backend.draw_calls(), vec![(0, 12)]);
        assert_eq!(frame.vertices, 8);
        assert_eq!(frame.skipped_groups, 1);
    }

    #[test]
    fn test_plan_lookup() {
        let mut plan = DrawPlan::new();
        plan.push("background", RenderPath::Untextured).unwrap();
        assert_eq!(plan.index_of("background").unwrap(), 0);
        assert!(matches!(
            plan.group("missing"),
            Err(BatchError::UnknownGroup(name)) if name == "missing"
        ));
        assert!(matches!(
            plan.push("background", sprites()),
            Err(BatchError::InvalidConfig(_))
        ));
    }

    #[test]
    #[should_panic(expected = "one vertex range required per draw group")]
    fn test_mismatched_ranges_panic() {
        let mut plan = DrawPlan::new();
        plan.push("a", RenderPath::Untextured).unwrap();
        plan.assign_ranges(&[]);
    }
}

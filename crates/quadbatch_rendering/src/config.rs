//! # Batch Configuration
//!
//! Loaded once at startup from TOML.
//!
//! ```toml
//! initial_vertex_capacity = 200
//! growth_step_quads = 50
//!
//! [[groups]]
//! name = "background"
//! texture = 1
//!
//! [[groups]]
//! name = "sprites"
//! texture = 2
//! blend = true
//! ```
//!
//! Group order is submission order: earlier groups are drawn first.

use std::collections::HashSet;
use std::path::Path;

use quadbatch_core::{GrowthPolicy, Scalar};
use serde::{Deserialize, Serialize};

use crate::batch::{
    DrawPlan, QuadStagingBuffer, RenderPath, TextureId, MAX_INDEXED_VERTICES, VERTICES_PER_QUAD,
};
use crate::error::{BatchError, BatchResult};

/// Largest growth step a 16-bit index range can use.
const MAX_GROWTH_STEP_QUADS: usize = MAX_INDEXED_VERTICES / VERTICES_PER_QUAD;

/// One draw group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Unique group name.
    pub name: String,
    /// Texture to bind. Omitted for the untextured path.
    #[serde(default)]
    pub texture: Option<TextureId>,
    /// Alpha blending. Requires a texture.
    #[serde(default)]
    pub blend: bool,
}

impl GroupConfig {
    /// Creates a textured group.
    #[must_use]
    pub fn textured(name: impl Into<String>, texture: TextureId, blend: bool) -> Self {
        Self {
            name: name.into(),
            texture: Some(texture),
            blend,
        }
    }

    /// Creates an untextured group.
    #[must_use]
    pub fn untextured(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture: None,
            blend: false,
        }
    }

    /// Render path selected by this group's settings.
    #[must_use]
    pub fn render_path(&self) -> RenderPath {
        match self.texture {
            Some(texture) => RenderPath::Textured {
                texture,
                blend: self.blend,
            },
            None => RenderPath::Untextured,
        }
    }
}

/// Capacity settings and draw groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Starting capacity of every buffer, in vertices.
    pub initial_vertex_capacity: usize,
    /// Growth increment, in quads.
    pub growth_step_quads: usize,
    /// Draw groups in submission order.
    pub groups: Vec<GroupConfig>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            initial_vertex_capacity: GrowthPolicy::DEFAULT_STEP_VERTICES,
            growth_step_quads: GrowthPolicy::DEFAULT_STEP_VERTICES / VERTICES_PER_QUAD,
            groups: vec![
                GroupConfig::textured("background", TextureId(1), false),
                GroupConfig::textured("sprites", TextureId(2), true),
            ],
        }
    }
}

impl BatchConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Parse`] for malformed TOML and
    /// [`BatchError::InvalidConfig`] if validation fails.
    pub fn from_toml_str(text: &str) -> BatchResult<Self> {
        Self::parse(text, Path::new("<inline>"))
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> BatchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| BatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text, path)?;
        tracing::info!(
            path = %path.display(),
            groups = config.groups.len(),
            initial_vertex_capacity = config.initial_vertex_capacity,
            "batch config loaded"
        );
        Ok(config)
    }

    fn parse(text: &str, path: &Path) -> BatchResult<Self> {
        let config: Self = toml::from_str(text).map_err(|source| BatchError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks capacity settings and group names.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> BatchResult<()> {
        if self.growth_step_quads == 0 {
            return Err(BatchError::InvalidConfig(
                "growth_step_quads must be greater than zero".to_owned(),
            ));
        }
        if self.growth_step_quads > MAX_GROWTH_STEP_QUADS {
            return Err(BatchError::InvalidConfig(format!(
                "growth_step_quads {} exceeds the 16-bit index range ({MAX_GROWTH_STEP_QUADS} quads)",
                self.growth_step_quads
            )));
        }
        if self.initial_vertex_capacity > MAX_INDEXED_VERTICES {
            return Err(BatchError::InvalidConfig(format!(
                "initial_vertex_capacity {} exceeds the 16-bit index range ({MAX_INDEXED_VERTICES})",
                self.initial_vertex_capacity
            )));
        }
        if self.groups.is_empty() {
            return Err(BatchError::InvalidConfig(
                "at least one draw group is required".to_owned(),
            ));
        }

        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.name.is_empty() {
                return Err(BatchError::InvalidConfig(
                    "draw group name must not be empty".to_owned(),
                ));
            }
            if !seen.insert(group.name.as_str()) {
                return Err(BatchError::InvalidConfig(format!(
                    "duplicate draw group: {}",
                    group.name
                )));
            }
            if group.blend && group.texture.is_none() {
                return Err(BatchError::InvalidConfig(format!(
                    "draw group {} enables blending without a texture",
                    group.name
                )));
            }
        }
        Ok(())
    }

    /// Growth policy shared by staging and shared buffers.
    ///
    /// # Panics
    ///
    /// Panics if `growth_step_quads` is zero; call [`validate`](Self::validate) first.
    #[must_use]
    pub fn growth_policy(&self) -> GrowthPolicy {
        GrowthPolicy::quads(self.growth_step_quads)
    }

    /// Builds the draw plan, one group per entry in order.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidConfig`] on duplicate group names.
    pub fn draw_plan(&self) -> BatchResult<DrawPlan> {
        let mut plan = DrawPlan::new();
        for group in &self.groups {
            plan.push(group.name.clone(), group.render_path())?;
        }
        Ok(plan)
    }

    /// One empty staging buffer per group, in group order.
    #[must_use]
    pub fn staging_buffers<S: Scalar>(&self) -> Vec<QuadStagingBuffer<S>> {
        let policy = self.growth_policy();
        self.groups
            .iter()
            .map(|_| QuadStagingBuffer::with_policy(self.initial_vertex_capacity, policy))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_groups() {
        let config = BatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_vertex_capacity, 200);
        assert_eq!(config.growth_policy().step(), 200);

        let plan = config.draw_plan().unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(
            plan.groups()[0].path(),
            RenderPath::Textured {
                texture: TextureId(1),
                blend: false
            }
        );
        assert!(plan.groups()[1].path().blend());
    }

    #[test]
    fn test_parse_toml() {
        let config = BatchConfig::from_toml_str(
            r#"
            initial_vertex_capacity = 64
            growth_step_quads = 8

            [[groups]]
            name = "debug"

            [[groups]]
            name = "hud"
            texture = 7
            blend = true
            "#,
        )
        .unwrap();

        assert_eq!(config.initial_vertex_capacity, 64);
        assert_eq!(config.groups[0].render_path(), RenderPath::Untextured);
        assert_eq!(config.groups[1], GroupConfig::textured("hud", TextureId(7), true));

        let staging = config.staging_buffers::<f32>();
        assert_eq!(staging.len(), 2);
        assert_eq!(staging[0].capacity_vertices(), 64);
        assert_eq!(staging[0].policy().step(), 32);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = BatchConfig::from_toml_str("growth_step_quads = 10").unwrap();
        assert_eq!(config.initial_vertex_capacity, 200);
        assert_eq!(config.groups, BatchConfig::default().groups);
    }

    #[test]
    fn test_rejects_invalid() {
        let cases = [
            "growth_step_quads = 0",
            "growth_step_quads = 16385",
            "growth_step_quads = 4611686018427387904",
            "initial_vertex_capacity = 70000",
            "groups = []",
            "[[groups]]\nname = \"a\"\n[[groups]]\nname = \"a\"",
            "[[groups]]\nname = \"a\"\nblend = true",
            "[[groups]]\nname = \"\"",
        ];
        for case in cases {
            assert!(
                matches!(BatchConfig::from_toml_str(case), Err(BatchError::InvalidConfig(_))),
                "accepted: {case}"
            );
        }
    }

    #[test]
    fn test_largest_growth_step_builds() {
        let config = BatchConfig::from_toml_str("growth_step_quads = 16384").unwrap();
        assert_eq!(config.growth_policy().step(), MAX_INDEXED_VERTICES);
        assert_eq!(config.staging_buffers::<f32>().len(), 2);
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = BatchConfig::from_toml_str("growth_step_quads = \"many\"").unwrap_err();
        assert!(matches!(err, BatchError::Parse { ref path, .. } if path == Path::new("<inline>")));
    }

    #[test]
    fn test_load_missing_file() {
        let err = BatchConfig::load("/nonexistent/quadbatch.toml").unwrap_err();
        assert!(matches!(err, BatchError::Io { .. }));
    }
}

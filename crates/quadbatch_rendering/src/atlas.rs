//! # Texture Atlas
//!
//! Named sub-images of one composite texture, as normalized coordinates.
//!
//! Each region stores its 4 (u, v) pairs in quad winding order (TL, BL,
//! TR, BR) as [`DualValue`]s, so the fixed-point coordinates are computed
//! once at load time.
//!
//! ## Description Format
//!
//! ```toml
//! [regions.skate1]
//! rect = [0.0, 0.0, 1.0, 0.25]    # u0, v0, u1, v1
//!
//! [regions.custom]
//! uv = [0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0]
//! ```
//!
//! `rect` expands to `u0,v1  u0,v0  u1,v1  u1,v0`: the top of the quad
//! samples `v1`, matching images stored bottom-up.

use std::collections::BTreeMap;
use std::path::Path;

use quadbatch_core::{DualValue, Fixed16, Scalar};
use serde::{Deserialize, Serialize};

use crate::batch::REGION_COMPONENTS;
use crate::error::{BatchError, BatchResult};

/// Texture coordinates of one sub-image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRegion {
    uv: [DualValue; REGION_COMPONENTS],
}

impl TextureRegion {
    /// Creates a region from 4 (u, v) pairs in winding order.
    #[must_use]
    pub fn from_uv(uv: [f32; REGION_COMPONENTS]) -> Self {
        Self {
            uv: uv.map(DualValue::new),
        }
    }

    /// Creates a region from a `[u0, v0, u1, v1]` rectangle.
    #[must_use]
    pub fn from_rect(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        Self::from_uv([u0, v1, u0, v0, u1, v1, u1, v0])
    }

    /// Coordinates in the requested representation.
    #[inline]
    #[must_use]
    pub fn coords<S: Scalar>(&self) -> [S; REGION_COMPONENTS] {
        self.uv.map(S::from_dual)
    }

    /// Float coordinates.
    #[must_use]
    pub fn float(&self) -> [f32; REGION_COMPONENTS] {
        self.coords()
    }

    /// Fixed-point coordinates.
    #[must_use]
    pub fn fixed(&self) -> [Fixed16; REGION_COMPONENTS] {
        self.coords()
    }
}

/// How one region is written in an atlas description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionDescription {
    /// Explicit coordinates: 4 (u, v) pairs in winding order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv: Option<Vec<f32>>,
    /// Shorthand rectangle `[u0, v0, u1, v1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<[f32; 4]>,
}

impl RegionDescription {
    /// Resolves to a region, checking shape and range.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidRegion`] unless exactly one of `uv` and
    /// `rect` is set, `uv` holds 8 values, and every value is in `[0, 1]`.
    pub fn resolve(&self, name: &str) -> BatchResult<TextureRegion> {
        let invalid = |reason: String| BatchError::InvalidRegion {
            name: name.to_owned(),
            reason,
        };

        let uv: [f32; REGION_COMPONENTS] = match (&self.uv, self.rect) {
            (Some(uv), None) => uv.as_slice().try_into().map_err(|_| {
                invalid(format!(
                    "uv must hold {REGION_COMPONENTS} values, got {}",
                    uv.len()
                ))
            })?,
            (None, Some([u0, v0, u1, v1])) => TextureRegion::from_rect(u0, v0, u1, v1).float(),
            (Some(_), Some(_)) => return Err(invalid("set either uv or rect, not both".to_owned())),
            (None, None) => return Err(invalid("one of uv or rect is required".to_owned())),
        };

        if let Some(bad) = uv.iter().find(|c| !(0.0..=1.0).contains(*c)) {
            return Err(invalid(format!("coordinate {bad} is outside [0, 1]")));
        }
        Ok(TextureRegion::from_uv(uv))
    }
}

/// Atlas description file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AtlasDescription {
    /// Regions by name.
    #[serde(default)]
    pub regions: BTreeMap<String, RegionDescription>,
}

/// Regions keyed by content name.
#[derive(Debug, Clone, Default)]
pub struct TextureAtlas {
    regions: BTreeMap<String, TextureRegion>,
}

impl TextureAtlas {
    /// Creates an empty atlas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in atlas: a full-texture `background` and three sprite
    /// frames stacked vertically in quarters.
    #[must_use]
    pub fn builtin() -> Self {
        let regions = [
            ("background", TextureRegion::from_rect(0.0, 0.0, 1.0, 1.0)),
            ("skate1", TextureRegion::from_rect(0.0, 0.0, 1.0, 0.25)),
            ("skate2", TextureRegion::from_rect(0.0, 0.25, 1.0, 0.5)),
            ("skate3", TextureRegion::from_rect(0.0, 0.5, 1.0, 0.75)),
        ];
        Self {
            regions: regions
                .into_iter()
                .map(|(name, region)| (name.to_owned(), region))
                .collect(),
        }
    }

    /// Builds an atlas from a parsed description.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidRegion`] for the first malformed region.
    pub fn from_description(description: &AtlasDescription) -> BatchResult<Self> {
        let mut atlas = Self::new();
        for (name, region) in &description.regions {
            atlas.insert(name.clone(), region.resolve(name)?)?;
        }
        Ok(atlas)
    }

    /// Parses a TOML atlas description.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Parse`] for malformed TOML, otherwise as
    /// [`from_description`](Self::from_description).
    pub fn from_toml_str(text: &str) -> BatchResult<Self> {
        Self::parse(text, Path::new("<inline>"))
    }

    /// Reads and parses a TOML atlas description file.
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
        let atlas = Self::parse(&text, path)?;
        tracing::info!(path = %path.display(), regions = atlas.len(), "texture atlas loaded");
        Ok(atlas)
    }

    fn parse(text: &str, path: &Path) -> BatchResult<Self> {
        let description: AtlasDescription =
            toml::from_str(text).map_err(|source| BatchError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_description(&description)
    }

    /// Adds a region.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::DuplicateRegion`] if the name is taken.
    pub fn insert(&mut self, name: impl Into<String>, region: TextureRegion) -> BatchResult<()> {
        let name = name.into();
        if self.regions.contains_key(&name) {
            return Err(BatchError::DuplicateRegion(name));
        }
        self.regions.insert(name, region);
        Ok(())
    }

    /// Looks up a region.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::UnknownRegion`] if no region has that name.
    pub fn region(&self, name: &str) -> BatchResult<&TextureRegion> {
        self.regions
            .get(name)
            .ok_or_else(|| BatchError::UnknownRegion(name.to_owned()))
    }

    /// Whether a region exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.regions.contains_key(name)
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the atlas has no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }
}

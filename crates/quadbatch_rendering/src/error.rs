//! # Batch Error Types
//!
//! Runtime failures of the batching system.
//!
//! Caller bugs (a texture region that is not 8 values, a range list that
//! does not match the draw plan) are assertions, not errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or merging batches.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Merged geometry would not be addressable with 16-bit indices.
    #[error("index capacity exceeded: need {required} vertices, 16-bit indices address {limit}")]
    IndexCapacityExceeded {
        /// Vertices the merge needs, padding included.
        required: usize,
        /// Largest addressable vertex count.
        limit: usize,
    },

    /// Texture region not found in the atlas.
    #[error("texture region not found: {0}")]
    UnknownRegion(String),

    /// Texture region registered twice.
    #[error("duplicate texture region: {0}")]
    DuplicateRegion(String),

    /// Texture region description is malformed.
    #[error("invalid texture region {name}: {reason}")]
    InvalidRegion {
        /// Region name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Draw group not found in the plan.
    #[error("draw group not found: {0}")]
    UnknownGroup(String),

    /// Invalid batch configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config or atlas file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Config or atlas file is not valid TOML for its schema.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: toml::de::Error,
    },
}

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

//! Error taxonomy for config parsing, asset loading, and GPU uploads.
//!
//! Everything here is fatal at initialization time; at steady state the
//! renderer only logs (see [`crate::layer`]). Variants stay distinct so a
//! host can tell a bad config document from a bad asset from a GPU limit.

use std::path::PathBuf;

use thiserror::Error;

/// The models config document could not be read or has the wrong shape.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("can't read config file ({path})")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Covers both invalid JSON and a `models` key that is not an array.
    #[error("config is not a valid models document")]
    Parse(#[from] serde_json::Error),
}

/// A single mesh asset failed to load. No partial asset is ever returned.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("can't read model file ({path})")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model container")]
    Container(#[from] gltf::Error),
    #[error("model has no mesh at index {index}")]
    MissingMesh { index: usize },
    #[error("mesh primitive has no POSITION attribute")]
    MissingPositions,
    #[error("mesh declares an image but no texture coordinates")]
    MissingTexCoords,
    #[error("attribute {attribute} has {actual} entries for {expected} vertices")]
    AttributeCountMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("index {index} does not fit in 16 bits")]
    OversizedIndex { index: u32 },
    #[error("index {index} references a vertex outside the {vertices} loaded")]
    IndexOutOfBounds { index: u16, vertices: usize },
    #[error("buffer uri scheme is not supported ({uri})")]
    UnsupportedUri { uri: String },
    #[error("embedded image view reaches past its buffer")]
    ImageViewOutOfBounds,
    #[error("can't decode embedded image")]
    Image(#[from] image::ImageError),
}

/// GPU resource creation failed. There is no fallback path.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("packed buffer of {size} bytes exceeds device limit of {max}")]
    BufferTooLarge { size: u64, max: u64 },
}

/// Composite error surfaced through the host lifecycle contract.
#[derive(Debug, Error)]
pub enum LayerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Keeps the offending config entry's path, in the upstream wording.
    #[error("can't load model ({path})")]
    Asset {
        path: String,
        #[source]
        source: AssetError,
    },
    #[error(transparent)]
    Build(#[from] BuildError),
}

//! The models config document: which meshes to load and where to anchor them.
//!
//! ```json
//! {
//!     "models": [
//!         {
//!             "path": "assets/tower.glb",
//!             "latitude": 52.52,
//!             "longitude": 13.405,
//!             "rotation": { "x": 90.0 },
//!             "flipY": true,
//!             "cw_orient": false,
//!             "model_index": 0
//!         }
//!     ]
//! }
//! ```
//!
//! A document whose `models` key is missing or not an array fails to parse;
//! the layer treats that as fatal before any asset is touched.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level config document.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelsConfig {
    pub models: Vec<ModelEntry>,
}

/// One mesh to load and place.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelEntry {
    /// Path to a `.glb` or `.gltf` file, resolved by the loader as given.
    pub path: String,
    /// Anchor latitude in degrees.
    pub latitude: f64,
    /// Anchor longitude in degrees.
    pub longitude: f64,
    /// Local rotation in degrees per axis, applied X then Y then Z.
    #[serde(default)]
    pub rotation: Option<Rotation>,
    /// Flip every texture V coordinate once at load time.
    #[serde(default, rename = "flipY")]
    pub flip_y: bool,
    /// The mesh was authored with clockwise front faces.
    #[serde(default)]
    pub cw_orient: bool,
    /// Which mesh of the container to read (first primitive of it).
    #[serde(default)]
    pub model_index: usize,
}

/// Euler rotation in degrees; missing axes stay zero.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Rotation {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl ModelsConfig {
    pub fn from_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&text)
    }
}

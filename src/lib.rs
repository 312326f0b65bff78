//! mesh-layer
//!
//! A custom map layer that renders geo-referenced glTF meshes as a 3D
//! overlay inside tile-based map views. Each mesh is anchored at a
//! latitude/longitude, projected into normalized Mercator world space,
//! transformed by the host camera's projection, frustum-culled against it,
//! and drawn with per-vertex texturing and diffuse lighting. Culled meshes
//! have their GPU data evicted and rebuilt from the retained parsed asset
//! when they come back into view.
//!
//! High-level modules
//! - `camera`: per-frame camera parameters handed over by the host
//! - `config`: the models config document (what to load, where to anchor)
//! - `culling`: frustum plane derivation and bounding-sphere visibility
//! - `data_structures`: mesh assets, placed models, buffer layout, textures
//! - `error`: config/asset/build error taxonomy
//! - `geo`: normalized Mercator projection and map constants
//! - `layer`: the host lifecycle contract and the mesh layer itself
//! - `pipelines`: render pipeline variants (lit/unlit, winding, shadows)
//! - `render`: per-mesh frame rendering and draw submission
//! - `resources`: loading mesh assets from glTF files into placed models
//!

pub mod camera;
pub mod config;
pub mod culling;
pub mod data_structures;
pub mod error;
pub mod geo;
pub mod layer;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use wgpu::*;

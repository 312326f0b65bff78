//! Engine data structures: parsed assets, placed models, buffer layout,
//! textures.
//!
//! - `model` contains the parsed mesh asset, the placed instance, and its
//!   GPU residency
//! - `layout` derives the packed buffer's segment offsets in one place
//! - `texture` contains the GPU texture wrapper and upload utilities

pub mod layout;
pub mod model;
pub mod texture;

//! Per-frame camera parameters handed over by the map host.

use cgmath::Matrix4;

use crate::geo::LatLng;

/// Snapshot of the host camera for one frame.
///
/// Owned by the host and read-only here; nothing in this crate retains it
/// across frames. The projection matrix is the host's full map projection in
/// double precision (wgpu convention, z in [0, 1]); it is combined with each
/// mesh's world and model matrices and only truncated to `f32` at the
/// uniform-upload boundary.
#[derive(Clone, Copy, Debug)]
pub struct CameraFrame {
    /// Viewport size in physical pixels, needed for the depth-range viewport.
    pub width: u32,
    pub height: u32,
    /// Where the camera currently sits, in degrees.
    pub center: LatLng,
    /// Map zoom level; world size is `2^zoom * TILE_SIZE`.
    pub zoom: f64,
    pub projection: Matrix4<f64>,
    /// Smallest depth value the host still resolves. Used as the upper bound
    /// of the depth range; the host's own depth epsilon is too tight for
    /// meshes that extend well above the map plane.
    pub depth_min: f32,
}

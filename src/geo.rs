//! Geographic projection for placing meshes in map world space.
//!
//! The map host uses normalized spherical Mercator: the whole world maps to
//! the unit square, scaled per frame by `2^zoom * TILE_SIZE`. Everything in
//! this module is a pure function so placement math can be tested without a
//! GPU or a host.

use cgmath::Point2;

/// Equatorial Earth radius in meters (WGS84 semi-major axis).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Side length of one map tile in world units at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

/// Degrees to radians.
pub const DEG2RAD: f64 = std::f64::consts::PI / 180.0;

/// Full turn, `2π`.
pub const M2PI: f64 = std::f64::consts::TAU;

/// A geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Project a geographic coordinate onto the normalized Mercator unit square.
///
/// `x` grows eastward from the antimeridian, `y` grows southward from the
/// north pole; the equator sits at `y = 0.5`. Latitudes approaching the poles
/// diverge, as Mercator does; the host clamps its camera well inside ±90°.
pub fn project(coord: LatLng) -> Point2<f64> {
    let x = (180.0 + coord.longitude) / 360.0;
    let y = (180.0
        - (180.0 / std::f64::consts::PI)
            * (std::f64::consts::FRAC_PI_4 + coord.latitude * std::f64::consts::PI / 360.0)
                .tan()
                .ln())
        / 360.0;
    Point2::new(x, y)
}

/// World-space size of the unit square at the given zoom level.
pub fn world_size(zoom: f64) -> f64 {
    2f64.powf(zoom) * TILE_SIZE
}

/// Scale factor converting model-space meters to world units at a latitude.
///
/// Mercator stretches distances away from the equator; a mesh authored in
/// meters has to shrink by the local circumference of its parallel to keep
/// its real-world footprint.
pub fn mercator_prescale(latitude: f64) -> f64 {
    1.0 / ((latitude * DEG2RAD).cos() * M2PI * EARTH_RADIUS_M)
}

use mesh_layer::geo::{self, LatLng};

#[test]
fn equator_and_prime_meridian_map_to_center() {
    let world = geo::project(LatLng::new(0.0, 0.0));
    assert!((world.x - 0.5).abs() < 1e-12);
    assert!((world.y - 0.5).abs() < 1e-12);
}

#[test]
fn longitude_spans_the_unit_interval() {
    assert!((geo::project(LatLng::new(0.0, -180.0)).x - 0.0).abs() < 1e-12);
    assert!((geo::project(LatLng::new(0.0, 180.0)).x - 1.0).abs() < 1e-12);
}

#[test]
fn y_decreases_as_latitude_increases() {
    let mut latitude = -85.0;
    let mut previous = geo::project(LatLng::new(latitude, 0.0)).y;
    while latitude < 85.0 {
        latitude += 5.0;
        let y = geo::project(LatLng::new(latitude, 0.0)).y;
        assert!(
            y < previous,
            "y must fall while latitude climbs (lat {latitude}: {y} vs {previous})"
        );
        previous = y;
    }
}

#[test]
fn northern_latitudes_sit_above_the_equator() {
    assert!(geo::project(LatLng::new(45.0, 0.0)).y < 0.5);
    assert!(geo::project(LatLng::new(-45.0, 0.0)).y > 0.5);
}

#[test]
fn world_size_doubles_per_zoom_level() {
    assert_eq!(geo::world_size(0.0), geo::TILE_SIZE);
    assert_eq!(geo::world_size(1.0), 2.0 * geo::TILE_SIZE);
    assert_eq!(geo::world_size(4.0), 16.0 * geo::TILE_SIZE);
    let fractional = geo::world_size(0.5);
    assert!((fractional - geo::TILE_SIZE * 2f64.sqrt()).abs() < 1e-9);
}

#[test]
fn prescale_matches_the_local_parallel() {
    let equator = geo::mercator_prescale(0.0);
    assert!((equator - 1.0 / (geo::M2PI * geo::EARTH_RADIUS_M)).abs() < 1e-24);

    // cos(60 deg) is one half, so meshes there shrink half as much.
    let at_60 = geo::mercator_prescale(60.0);
    assert!((at_60 / equator - 2.0).abs() < 1e-9);
}

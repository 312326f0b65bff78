//! Frustum derivation and bounding-sphere visibility tests.
//!
//! The camera frustum is recovered per mesh from the inverse of the combined
//! `projection * world * model` matrix: the eight corners of the wgpu NDC box
//! (x, y in [-1, 1], z in [0, 1], column-major, post-multiplied transforms)
//! are unprojected into the mesh's local space and the six clip planes are
//! rebuilt from them. Plane normals point out of the frustum; orientation is
//! fixed against the corner centroid rather than trusting corner winding.

use cgmath::{InnerSpace, Matrix4, Vector3, Vector4};

/// A clip plane as `ax + by + cz + d = 0`, normal `(a, b, c)` pointing out of
/// the frustum.
pub type Plane = [f64; 4];

/// NDC corners of the view volume; z spans [0, 1] per the wgpu convention.
const NDC_CORNERS: [[f64; 3]; 8] = [
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Corner triples spanning each face: near, far, left, right, bottom, top.
const PLANE_CORNERS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [4, 5, 6],
    [0, 2, 4],
    [1, 3, 5],
    [0, 1, 4],
    [2, 3, 6],
];

/// Derive the six frustum planes from an inverted combined matrix.
///
/// Returns `None` when the matrix maps some NDC corner to infinity (w ~ 0)
/// or a face degenerates; callers treat that as "don't cull".
pub fn frustum_planes(inv_combined: &Matrix4<f64>) -> Option<[Plane; 6]> {
    let mut corners = [Vector3::new(0.0, 0.0, 0.0); 8];
    for (corner, ndc) in corners.iter_mut().zip(NDC_CORNERS) {
        let v = inv_combined * Vector4::new(ndc[0], ndc[1], ndc[2], 1.0);
        if v.w.abs() < 1e-12 {
            return None;
        }
        *corner = v.truncate() / v.w;
    }

    let centroid = corners
        .iter()
        .fold(Vector3::new(0.0, 0.0, 0.0), |acc, c| acc + c)
        / 8.0;

    let mut planes = [[0.0; 4]; 6];
    for (plane, [a, b, c]) in planes.iter_mut().zip(PLANE_CORNERS) {
        let cross = (corners[b] - corners[a]).cross(corners[c] - corners[a]);
        if cross.magnitude2() < 1e-24 {
            return None;
        }
        let mut normal = cross.normalize();
        let mut d = -normal.dot(corners[a]);
        // The interior must land on the negative side.
        if normal.dot(centroid) + d > 0.0 {
            normal = -normal;
            d = -d;
        }
        *plane = [normal.x, normal.y, normal.z, d];
    }
    Some(planes)
}

/// Signed distance from a point to a plane.
fn distance(plane: &Plane, point: [f64; 3]) -> f64 {
    plane[0] * point[0] + plane[1] * point[1] + plane[2] * point[2] + plane[3]
}

/// Sphere-vs-frustum visibility, matching the upstream layer's test exactly.
///
/// A sphere passes one plane when it is fully inside (`dist < -r`) or
/// straddles it (`|dist| < r`); the straddle branch keeps flat bounding
/// shapes visible even though the plane set was derived for a 3D volume. The
/// first failing plane wins and the mesh is culled.
pub fn sphere_visible(planes: &[Plane; 6], center: [f64; 3], radius: f64) -> bool {
    planes.iter().all(|plane| {
        let dist = distance(plane, center);
        dist < -radius || dist.abs() < radius
    })
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Force shading: the normal force follows the vertex normals interpolated
//! at the contact point instead of the flat face normal.

use haptic_core::math::{Vec3, SMALL};
use haptic_geom::ShadingTriangle;

/// Barycentric weights of `point` (projected onto the triangle's plane).
fn barycentric(positions: &[Vec3; 3], point: &Vec3) -> Option<[f64; 3]> {
    let [a, b, c] = *positions;
    let e0 = b - a;
    let e1 = c - a;
    let ep = *point - a;
    let d00 = e0.dot(&e0);
    let d01 = e0.dot(&e1);
    let d11 = e1.dot(&e1);
    let d20 = ep.dot(&e0);
    let d21 = ep.dot(&e1);
    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < SMALL {
        return None;
    }
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    Some([1.0 - v - w, v, w])
}

/// Unit vertex normal interpolated at `point`, `None` for degenerate
/// triangles or when the mesh carries no vertex normals.
pub(crate) fn shaded_normal(triangle: &ShadingTriangle, point: &Vec3) -> Option<Vec3> {
    let weights = barycentric(&triangle.positions, point)?;
    let mut normal = Vec3::ZERO;
    for (weight, vertex_normal) in weights.iter().zip(&triangle.normals) {
        normal += vertex_normal.scale(*weight);
    }
    let normal = normal.normalize();
    (normal != Vec3::ZERO).then_some(normal)
}

/// Re-aims `normal_force` along `shaded` when the shaded normal is within
/// `threshold` radians of the contact normal.
pub(crate) fn shade_normal_force(
    normal_force: Vec3,
    contact_normal: &Vec3,
    shaded: &Vec3,
    threshold: f64,
) -> Vec3 {
    let angle = shaded.dot(contact_normal).clamp(-1.0, 1.0).acos();
    if angle > threshold {
        return normal_force;
    }
    shaded.scale(normal_force.dot(contact_normal))
}

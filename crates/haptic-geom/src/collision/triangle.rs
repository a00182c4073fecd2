// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Segment versus triangle, optionally with a swept sphere.
//!
//! With radius 0 this is a plain Möller–Trumbore segment test. With a
//! radius the triangle is treated as its offset shell: the two faces moved
//! along the normal by the radius, a cylinder around each edge and a sphere
//! at each corner. The entering hit with the smallest parameter wins.

use haptic_core::math::{Vec3, SMALL};

use super::CollisionSettings;
use crate::mesh::face_normal;

/// Nearest contact of a segment with one triangle, in the triangle's frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriangleHit {
    /// Segment parameter in `[0, 1]`.
    pub t: f64,
    /// Point on the segment at contact (swept-sphere centre).
    pub position: Vec3,
    /// Unit normal pointing from the surface toward `position`.
    pub normal: Vec3,
    /// Squared distance from the segment start to `position`.
    pub squared_distance: f64,
}

/// Tests the segment `a → b` against the triangle `corners`.
///
/// Returns `None` for a degenerate segment, when nothing is hit, or when
/// only back faces are hit and `check_both_sides_of_triangle` is off.
pub fn segment_triangle(
    corners: &[Vec3; 3],
    a: &Vec3,
    b: &Vec3,
    settings: &CollisionSettings,
) -> Option<TriangleHit> {
    let dir = *b - *a;
    if dir.length_squared() <= SMALL * SMALL {
        return None;
    }
    let normal = face_normal(&corners[0], &corners[1], &corners[2]);
    let both_sides = settings.check_both_sides_of_triangle;
    let radius = settings.collision_radius;

    let mut best: Option<(f64, Vec3)> = None;
    let mut keep = |t: f64, n: Vec3| {
        if best.is_none_or(|(bt, _)| t < bt) {
            best = Some((t, n));
        }
    };

    if radius <= 0.0 {
        if normal == Vec3::ZERO {
            return None;
        }
        let side = if dir.dot(&normal) < 0.0 {
            Some(normal)
        } else if both_sides {
            Some(-normal)
        } else {
            None
        };
        if let Some(side) = side {
            if let Some(t) = segment_face(a, &dir, corners) {
                keep(t, side);
            }
        }
    } else {
        if normal != Vec3::ZERO {
            let sides = [Some(normal), both_sides.then_some(-normal)];
            for side in sides.into_iter().flatten() {
                if dir.dot(&side) >= 0.0 {
                    continue;
                }
                let offset = side.scale(radius);
                let shell = [corners[0] + offset, corners[1] + offset, corners[2] + offset];
                if let Some(t) = segment_face(a, &dir, &shell) {
                    keep(t, side);
                }
            }
        }

        let accept = |n: &Vec3| both_sides || normal == Vec3::ZERO || n.dot(&normal) >= 0.0;
        for (i, j) in [(0, 1), (1, 2), (2, 0)] {
            if let Some((t, n)) = segment_cylinder(a, &dir, &corners[i], &corners[j], radius) {
                if accept(&n) {
                    keep(t, n);
                }
            }
        }
        for corner in corners {
            if let Some((t, n)) = segment_sphere(a, &dir, corner, radius) {
                if accept(&n) {
                    keep(t, n);
                }
            }
        }
    }

    best.map(|(t, n)| {
        let step = dir.scale(t);
        TriangleHit {
            t,
            position: *a + step,
            normal: n,
            squared_distance: step.length_squared(),
        }
    })
}

/// Möller–Trumbore against either face; returns the segment parameter.
fn segment_face(a: &Vec3, dir: &Vec3, corners: &[Vec3; 3]) -> Option<f64> {
    let e1 = corners[1] - corners[0];
    let e2 = corners[2] - corners[0];
    let h = dir.cross(&e2);
    let det = e1.dot(&h);
    if det.abs() <= SMALL * e1.length() * e2.length() * dir.length() {
        return None;
    }
    let inv = 1.0 / det;
    let s = *a - corners[0];
    let u = inv * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(&e1);
    let v = inv * dir.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = inv * e2.dot(&q);
    (0.0..=1.0).contains(&t).then_some(t)
}

/// Entering hit against the finite cylinder of `radius` around `p → q`.
fn segment_cylinder(a: &Vec3, dir: &Vec3, p: &Vec3, q: &Vec3, radius: f64) -> Option<(f64, Vec3)> {
    let axis = *q - *p;
    let len = axis.length();
    if len <= SMALL {
        return None;
    }
    let u = axis.scale(1.0 / len);
    let w = *a - *p;
    let d_perp = *dir - u.scale(dir.dot(&u));
    let w_perp = w - u.scale(w.dot(&u));
    let qa = d_perp.length_squared();
    if qa <= SMALL * SMALL {
        return None;
    }
    let qb = 2.0 * w_perp.dot(&d_perp);
    let qc = w_perp.length_squared() - radius * radius;
    let t = entering_root(qa, qb, qc)?;
    let hit = *a + dir.scale(t);
    let along = (hit - *p).dot(&u);
    if !(0.0..=len).contains(&along) {
        return None;
    }
    let n = (hit - (*p + u.scale(along))).normalize();
    Some((t, n))
}

/// Entering hit against the sphere of `radius` around `center`.
fn segment_sphere(a: &Vec3, dir: &Vec3, center: &Vec3, radius: f64) -> Option<(f64, Vec3)> {
    let w = *a - *center;
    let qa = dir.length_squared();
    let qb = 2.0 * w.dot(dir);
    let qc = w.length_squared() - radius * radius;
    let t = entering_root(qa, qb, qc)?;
    let hit = *a + dir.scale(t);
    Some((t, (hit - *center).normalize()))
}

/// Smaller root of `qa t² + qb t + qc` when it lies in `[0, 1]`.
///
/// A start already inside the surface (`qc < 0`) is not an entering hit.
fn entering_root(qa: f64, qb: f64, qc: f64) -> Option<f64> {
    if qc < 0.0 {
        return None;
    }
    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return None;
    }
    let t = (-qb - disc.sqrt()) / (2.0 * qa);
    (0.0..=1.0).contains(&t).then_some(t)
}

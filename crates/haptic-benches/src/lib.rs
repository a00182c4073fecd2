// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared fixtures for the haptic benchmarks.

use haptic_core::math::Vec3;
use haptic_geom::{Material, Mesh};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A `cells × cells` bumpy terrain over the unit square, two triangles per
/// cell, heights jittered by up to `roughness` with a fixed seed.
pub fn terrain(cells: usize, roughness: f64, seed: u64) -> Mesh {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut mesh = Mesh::with_material(Material::new(1000.0, 0.3, 0.2));
    let step = 1.0 / cells as f64;
    let side = cells + 1;
    let mut ids = Vec::with_capacity(side * side);
    for j in 0..side {
        for i in 0..side {
            let z = if roughness > 0.0 {
                rng.gen_range(-roughness..roughness)
            } else {
                0.0
            };
            let p = Vec3::new(i as f64 * step - 0.5, j as f64 * step - 0.5, z);
            // Positions are finite by construction.
            if let Ok(id) = mesh.new_vertex(p) {
                ids.push(id);
            }
        }
    }
    for j in 0..cells {
        for i in 0..cells {
            let a = ids[j * side + i];
            let b = ids[j * side + i + 1];
            let c = ids[(j + 1) * side + i];
            let d = ids[(j + 1) * side + i + 1];
            let _ = mesh.new_triangle(a, b, d);
            let _ = mesh.new_triangle(a, d, c);
        }
    }
    mesh.compute_all_normals();
    mesh
}

/// `count` random segments crossing the terrain from above to below.
pub fn plunging_segments(count: usize, seed: u64) -> Vec<(Vec3, Vec3)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let a = Vec3::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5), 0.5);
            let b = Vec3::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5), -0.5);
            (a, b)
        })
        .collect()
}

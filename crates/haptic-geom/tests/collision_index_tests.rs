#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! AABB tree build and query behaviour.

use haptic_core::math::Vec3;
use haptic_geom::collision::segment_triangle;
use haptic_geom::{
    AxisAlignedBox, CollisionIndex, CollisionRecorder, CollisionSettings, Mesh, NodeKind,
    TriangleSource,
};
use proptest::prelude::*;

/// A row of `n` small floor triangles along x, one unit apart.
fn strip(n: usize) -> Mesh {
    let mut mesh = Mesh::new();
    for i in 0..n {
        let x = i as f64;
        mesh.add_triangle(
            Vec3::new(x, 0.0, 0.0),
            Vec3::new(x + 0.5, 0.0, 0.0),
            Vec3::new(x, 0.5, 0.0),
        )
        .unwrap();
    }
    mesh
}

fn union_of_leaves(index: &CollisionIndex) -> AxisAlignedBox {
    let mut bbox = AxisAlignedBox::empty();
    for id in index.leaves() {
        bbox = bbox.union(index.node(*id).unwrap().bbox());
    }
    bbox
}

#[test]
fn empty_mesh_builds_empty_tree() {
    let mut mesh = Mesh::new();
    mesh.create_collision_index(0.0).unwrap();
    let index = mesh.collision_index().unwrap();
    assert!(index.root().is_none());
    assert_eq!(index.triangle_count(), 0);
    let mut recorder = CollisionRecorder::new();
    let hit = mesh.compute_collision(
        &Vec3::new(0.0, 0.0, 1.0),
        &Vec3::new(0.0, 0.0, -1.0),
        &mut recorder,
        &CollisionSettings::default(),
    );
    assert!(!hit);
    assert!(recorder.nearest.is_none());
}

#[test]
fn single_triangle_leaf_is_root() {
    let mut mesh = strip(1);
    mesh.create_collision_index(0.0).unwrap();
    let index = mesh.collision_index().unwrap();
    let root = index.root().unwrap();
    let node = index.node(root).unwrap();
    assert!(node.is_leaf());
    assert_eq!(node.depth(), 0);
    assert_eq!(node.parent(), None);
    assert_eq!(index.node_count(), 1);
}

#[test]
fn build_has_one_leaf_per_triangle_and_root_is_union() {
    for n in [2usize, 3, 7, 16, 33] {
        let mut mesh = strip(n);
        mesh.create_collision_index(0.01).unwrap();
        let index = mesh.collision_index().unwrap();
        assert_eq!(index.leaves().len(), n);
        assert_eq!(index.triangle_count(), n);
        assert_eq!(index.node_count(), 2 * n - 1);
        let root = index.node(index.root().unwrap()).unwrap();
        assert_eq!(*root.bbox(), union_of_leaves(index));
        for t in 0..n {
            assert!(index.contains_triangle(index.root().unwrap(), t));
        }
        assert!(!index.contains_triangle(index.root().unwrap(), n));
    }
}

#[test]
fn parents_and_depths_are_consistent() {
    let mut mesh = strip(12);
    mesh.create_collision_index(0.0).unwrap();
    let index = mesh.collision_index().unwrap();
    let root = index.root().unwrap();
    assert_eq!(index.node(root).unwrap().parent(), None);
    for (i, node) in index.nodes().iter().enumerate() {
        if let NodeKind::Internal { left, right } = node.kind() {
            for child in [left, right] {
                let c = index.node(child).unwrap();
                assert_eq!(c.parent().map(|p| p.0), Some(i));
                assert_eq!(c.depth(), node.depth() + 1);
            }
        }
    }
    // A strip of 12 splits evenly enough to stay shallow.
    assert!(index.depth() <= 5, "depth {}", index.depth());
}

#[test]
fn coincident_triangles_fall_back_to_even_split() {
    let mut mesh = Mesh::new();
    for _ in 0..5 {
        mesh.add_triangle(Vec3::ZERO, Vec3::UNIT_X, Vec3::UNIT_Y).unwrap();
    }
    mesh.create_collision_index(0.0).unwrap();
    let index = mesh.collision_index().unwrap();
    assert_eq!(index.leaves().len(), 5);
    assert_eq!(index.node_count(), 9);
    assert!(index.depth() <= 3);
}

#[test]
fn radius_fattens_leaf_boxes_by_twice_the_radius() {
    let r = 0.125;
    let mut thin = strip(1);
    let mut fat = strip(1);
    thin.create_collision_index(0.0).unwrap();
    fat.create_collision_index(r).unwrap();
    let thin_box = *thin.collision_index().unwrap().nodes()[0].bbox();
    let fat_box = *fat.collision_index().unwrap().nodes()[0].bbox();
    for axis in 0..3 {
        assert_eq!(fat_box.min().component(axis), thin_box.min().component(axis) - 2.0 * r);
        assert_eq!(fat_box.max().component(axis), thin_box.max().component(axis) + 2.0 * r);
    }
}

#[test]
fn removed_triangles_are_skipped_until_rebuild() {
    let mut mesh = strip(3);
    mesh.create_collision_index(0.0).unwrap();
    mesh.remove_triangle(1).unwrap();
    let index = mesh.collision_index().unwrap();
    // Still in the tree...
    assert_eq!(index.triangle_count(), 3);
    assert!(index.contains_triangle(index.root().unwrap(), 1));
    // ...but no longer reported.
    let mut recorder = CollisionRecorder::new();
    let hit = mesh.compute_collision(
        &Vec3::new(1.1, 0.1, 1.0),
        &Vec3::new(1.1, 0.1, -1.0),
        &mut recorder,
        &CollisionSettings::default(),
    );
    assert!(!hit);

    mesh.create_collision_index(0.0).unwrap();
    let rebuilt = mesh.collision_index().unwrap();
    assert_eq!(rebuilt.triangle_count(), 2);
    assert!(!rebuilt.contains_triangle(rebuilt.root().unwrap(), 1));
}

#[test]
fn nearest_hit_wins_across_stacked_triangles() {
    let mut mesh = Mesh::new();
    for z in [0.0, 0.5, -0.5] {
        mesh.add_triangle(
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(1.0, -1.0, z),
            Vec3::new(0.0, 1.0, z),
        )
        .unwrap();
    }
    mesh.create_collision_index(0.0).unwrap();
    let settings = CollisionSettings {
        check_for_nearest_collision_only: false,
        ..CollisionSettings::default()
    };
    let mut recorder = CollisionRecorder::new();
    assert!(mesh.compute_collision(
        &Vec3::new(0.0, 0.0, 2.0),
        &Vec3::new(0.0, 0.0, -2.0),
        &mut recorder,
        &settings
    ));
    assert_eq!(recorder.events.len(), 3);
    let nearest = recorder.nearest.unwrap();
    assert_eq!(nearest.triangle.triangle, 1);
    assert!((nearest.squared_distance - 2.25).abs() < 1e-12);
}

#[test]
fn refit_follows_moved_geometry() {
    struct Soup(Vec<[Vec3; 3]>);
    impl TriangleSource for Soup {
        fn triangle_count(&self) -> usize {
            self.0.len()
        }
        fn is_allocated(&self, _: usize) -> bool {
            true
        }
        fn triangle_positions(&self, index: usize) -> [Vec3; 3] {
            self.0[index]
        }
    }
    let tri = |x: f64| [Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 0.0, 0.0), Vec3::new(x, 1.0, 0.0)];
    let mut soup = Soup(vec![tri(0.0), tri(5.0)]);
    let mut index = CollisionIndex::new();
    index.initialize(&soup, 0.0);
    soup.0[1] = tri(50.0);
    index.refit(&soup);
    let root = index.node(index.root().unwrap()).unwrap();
    assert_eq!(root.bbox().max().x(), 51.0);
    assert_eq!(*root.bbox(), union_of_leaves(&index));
}

fn arb_point() -> impl Strategy<Value = Vec3> {
    (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn arb_soup() -> impl Strategy<Value = Vec<[Vec3; 3]>> {
    prop::collection::vec((arb_point(), arb_point(), arb_point()).prop_map(|(a, b, c)| [a, b, c]), 1..50)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn tree_query_matches_brute_force(
        soup in arb_soup(),
        a in arb_point(),
        b in arb_point(),
        radius in prop::sample::select(vec![0.0, 0.05]),
        both in any::<bool>(),
    ) {
        let mut mesh = Mesh::new();
        for [p, q, r] in &soup {
            mesh.add_triangle(*p, *q, *r).unwrap();
        }
        mesh.create_collision_index(radius).unwrap();
        let settings = CollisionSettings {
            collision_radius: radius,
            check_both_sides_of_triangle: both,
            ..CollisionSettings::default()
        };

        let brute: Vec<f64> = soup
            .iter()
            .filter_map(|tri| segment_triangle(tri, &a, &b, &settings))
            .map(|h| h.squared_distance)
            .collect();

        let mut recorder = CollisionRecorder::new();
        let hit = mesh.compute_collision(&a, &b, &mut recorder, &settings);
        prop_assert_eq!(hit, !brute.is_empty());
        if let Some(min) = brute.iter().copied().reduce(f64::min) {
            let nearest = recorder.nearest.unwrap();
            prop_assert!((nearest.squared_distance - min).abs() <= 1e-12);
        } else {
            prop_assert!(recorder.nearest.is_none());
        }
    }
}

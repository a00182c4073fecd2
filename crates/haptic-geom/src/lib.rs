// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry layer for haptic proxy rendering.

This crate provides:
- Axis-aligned bounding boxes (`AxisAlignedBox`) with the separating-axis
  and slab predicates used to prune queries.
- Triangle meshes with materials, local poses and vertex normals (`Mesh`).
- The segment collision contract: settings, events and the nearest-hit
  recorder (`collision`).
- A static AABB tree per mesh (`CollisionIndex`), stored as an arena.
- A multi-mesh `World` that fans segment queries out across meshes.

Design notes:
- Trees are read-only after `initialize`; rebuilding while a query runs is
  ruled out by `&mut` access.
- Queries never fail: an empty tree or a mesh without an index reports
  no collision.
"]
#![forbid(unsafe_code)]

/// Segment collision contract: settings, events, recorder, triangle tests.
pub mod collision;
mod error;
/// Triangle meshes, vertices and materials.
pub mod mesh;
/// The AABB tree and collision index.
pub mod tree;
/// Foundational geometric types.
pub mod types;
/// Multi-mesh scene queried by force algorithms.
pub mod world;

pub use collision::{CollisionEvent, CollisionRecorder, CollisionSettings, TriangleRef};
pub use error::GeomError;
pub use mesh::{Material, Mesh, MeshId, Triangle, TriangleSource, Vertex};
pub use tree::{CollisionIndex, NodeId, NodeKind};
pub use types::aabb::AxisAlignedBox;
pub use world::{CollisionWorld, ShadingTriangle, World};

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Static AABB tree over a mesh's triangles.
//!
//! Storage contract:
//! - All nodes live in one arena owned by the [`CollisionIndex`]; children
//!   and parents are referenced by [`NodeId`].
//! - Leaf nodes occupy the first slots (one per allocated triangle, in
//!   source order); internal nodes follow in post-order, so every child
//!   precedes its parent.
//! - The tree is rebuilt from scratch by `initialize`; triangles removed
//!   afterwards stay in the tree until the next rebuild.

mod index;
mod node;

pub use index::CollisionIndex;
pub use node::{Node, NodeId, NodeKind};

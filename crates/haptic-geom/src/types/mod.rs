// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core geometry types used by the collision index.
//!
//! Containment semantics:
//! - `contains` is strict on every face; a point on a face is outside.
//! - `intersect` is inclusive on faces so touching boxes still pair, which
//!   keeps a segment grazing a leaf box from being pruned.

#[doc = "Axis-aligned bounding boxes with union, containment and slab tests."]
pub mod aabb;

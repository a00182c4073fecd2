// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Segment collision contract shared by triangles, the AABB tree and the world.
//!
//! A query walks a segment `a → b` against geometry and funnels every
//! triangle hit into one [`CollisionRecorder`] owned by the top-level caller.
//! The recorder keeps the nearest hit by squared distance from `a`, and
//! optionally the full list of hits.

use haptic_core::math::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use crate::mesh::MeshId;

mod triangle;

pub use triangle::{segment_triangle, TriangleHit};

/// Knobs for a segment query.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSettings {
    /// Radius of the swept sphere; must match the radius the tree was built with.
    pub collision_radius: f64,
    /// Keep only the nearest hit (skip filling [`CollisionRecorder::events`]).
    pub check_for_nearest_collision_only: bool,
    /// Count hits on back faces too.
    pub check_both_sides_of_triangle: bool,
    /// Record the segment start in the hit mesh's local frame so a caller can
    /// re-anchor a proxy on a moving mesh.
    pub adjust_object_motion: bool,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            collision_radius: 0.0,
            check_for_nearest_collision_only: true,
            check_both_sides_of_triangle: false,
            adjust_object_motion: false,
        }
    }
}

/// Identifies one triangle of one mesh.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TriangleRef {
    /// Owning mesh.
    pub mesh: MeshId,
    /// Triangle slot inside the mesh.
    pub triangle: usize,
}

/// Rigid pose of a mesh, used to lift local hits into the world frame.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MeshFrame {
    /// Mesh the frame belongs to.
    pub mesh: MeshId,
    /// World position of the local origin.
    pub position: Vec3,
    /// Local-to-world rotation.
    pub rotation: Mat3,
}

impl MeshFrame {
    /// Local point → world point.
    pub fn point_to_global(&self, p: &Vec3) -> Vec3 {
        self.rotation.transform(p) + self.position
    }

    /// Local direction → world direction.
    pub fn direction_to_global(&self, d: &Vec3) -> Vec3 {
        self.rotation.transform(d)
    }
}

/// One segment/triangle contact.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CollisionEvent {
    /// Triangle that was hit.
    pub triangle: TriangleRef,
    /// Swept-sphere centre at contact, mesh frame.
    pub local_pos: Vec3,
    /// Swept-sphere centre at contact, world frame.
    pub global_pos: Vec3,
    /// Unit contact normal (surface → centre), mesh frame.
    pub local_normal: Vec3,
    /// Unit contact normal (surface → centre), world frame.
    pub global_normal: Vec3,
    /// Squared distance from the segment start to `local_pos`.
    pub squared_distance: f64,
    /// Segment start in the mesh frame; set when
    /// [`CollisionSettings::adjust_object_motion`] is on.
    pub adjusted_segment_a: Option<Vec3>,
}

/// Accumulator threaded through one query.
#[derive(Debug, Clone, Default)]
pub struct CollisionRecorder {
    /// Closest hit seen so far.
    pub nearest: Option<CollisionEvent>,
    /// Every hit, when the settings ask for more than the nearest.
    pub events: Vec<CollisionEvent>,
}

impl CollisionRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets all recorded hits.
    pub fn clear(&mut self) {
        self.nearest = None;
        self.events.clear();
    }

    /// Squared distance of the nearest hit, or `+inf`.
    pub fn nearest_squared_distance(&self) -> f64 {
        self.nearest.map_or(f64::INFINITY, |e| e.squared_distance)
    }

    /// Folds `event` into the recorder.
    ///
    /// The nearest slot is replaced only by a strictly closer hit, so the
    /// first of several equidistant hits is kept.
    pub fn record(&mut self, event: CollisionEvent, settings: &CollisionSettings) {
        if event.squared_distance < self.nearest_squared_distance() {
            self.nearest = Some(event);
        }
        if !settings.check_for_nearest_collision_only {
            self.events.push(event);
        }
    }

    /// Lifts a local triangle hit into an event and records it.
    pub(crate) fn record_hit(
        &mut self,
        hit: &TriangleHit,
        triangle: usize,
        frame: &MeshFrame,
        segment_a: &Vec3,
        settings: &CollisionSettings,
    ) {
        let event = CollisionEvent {
            triangle: TriangleRef {
                mesh: frame.mesh,
                triangle,
            },
            local_pos: hit.position,
            global_pos: frame.point_to_global(&hit.position),
            local_normal: hit.normal,
            global_normal: frame.direction_to_global(&hit.normal),
            squared_distance: hit.squared_distance,
            adjusted_segment_a: settings.adjust_object_motion.then_some(*segment_a),
        };
        self.record(event, settings);
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Triangle meshes consumed by the collision index and the force algorithm.
//!
//! A mesh stores geometry in its local frame and carries a rigid pose
//! (`position`, `rotation`) mapping local coordinates to the world frame.
//! Removing a triangle only marks it deallocated; an already built
//! [`CollisionIndex`] keeps referring to it until rebuilt.

use haptic_core::math::{Mat3, Vec3, SMALL};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collision::{CollisionRecorder, CollisionSettings, MeshFrame};
use crate::error::GeomError;
use crate::tree::CollisionIndex;

/// Opaque identifier of a mesh inside a [`crate::World`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MeshId(pub usize);

/// Haptic surface properties consumed by the force model.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Spring constant in N/m.
    pub stiffness: f64,
    /// Static friction coefficient (sticking cone).
    pub static_friction: f64,
    /// Dynamic friction coefficient (slipping cone).
    pub dynamic_friction: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            stiffness: 1000.0,
            static_friction: 0.0,
            dynamic_friction: 0.0,
        }
    }
}

impl Material {
    /// Builds a material from its stiffness and friction coefficients.
    pub fn new(stiffness: f64, static_friction: f64, dynamic_friction: f64) -> Self {
        Self {
            stiffness,
            static_friction,
            dynamic_friction,
        }
    }

    /// Checks that every coefficient is finite and non-negative.
    pub fn validate(&self) -> Result<(), GeomError> {
        let fields = [
            ("stiffness", self.stiffness),
            ("static_friction", self.static_friction),
            ("dynamic_friction", self.dynamic_friction),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(GeomError::InvalidMaterial(format!("{name} = {value}")));
            }
        }
        Ok(())
    }
}

/// Mesh vertex: local position and (optional, zero when unset) normal.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vertex {
    /// Local-frame position.
    pub position: Vec3,
    /// Local-frame unit normal used for force shading.
    pub normal: Vec3,
}

/// Triangle referencing three vertices by index.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Triangle {
    vertices: [usize; 3],
    allocated: bool,
}

impl Triangle {
    /// Vertex indices in counter-clockwise (front-facing) order.
    pub fn vertices(&self) -> [usize; 3] {
        self.vertices
    }

    /// `false` once the triangle has been removed from its mesh.
    pub fn is_allocated(&self) -> bool {
        self.allocated
    }
}

/// Read access to a triangle store, as seen by the collision index.
///
/// Indices are stable: deallocated triangles keep their slot.
pub trait TriangleSource {
    /// Number of triangle slots, allocated or not.
    fn triangle_count(&self) -> usize;
    /// Whether slot `index` currently holds a live triangle.
    fn is_allocated(&self, index: usize) -> bool;
    /// Local-frame corner positions of triangle `index`.
    fn triangle_positions(&self, index: usize) -> [Vec3; 3];
    /// Pose used to report hits in world coordinates.
    fn frame(&self) -> MeshFrame {
        MeshFrame::default()
    }
}

/// A rigidly posed triangle mesh with a material and an optional collision index.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    id: MeshId,
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
    material: Material,
    position: Vec3,
    rotation: Mat3,
    index: Option<CollisionIndex>,
}

impl Mesh {
    /// Creates an empty mesh at the world origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with `material`.
    pub fn with_material(material: Material) -> Self {
        Self {
            material,
            ..Self::default()
        }
    }

    /// Identifier assigned by the owning world.
    pub fn id(&self) -> MeshId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: MeshId) {
        self.id = id;
    }

    /// Surface material.
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Replaces the surface material after validating it.
    pub fn set_material(&mut self, material: Material) -> Result<(), GeomError> {
        material.validate()?;
        self.material = material;
        Ok(())
    }

    /// World-frame position of the local origin.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local-to-world rotation.
    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    /// Moves the mesh. The collision index lives in the local frame and
    /// stays valid.
    pub fn set_pose(&mut self, position: Vec3, rotation: Mat3) {
        self.position = position;
        self.rotation = rotation;
    }

    /// Converts a local point to the world frame.
    pub fn to_global(&self, local: &Vec3) -> Vec3 {
        self.rotation.transform(local) + self.position
    }

    /// Converts a world point to the local frame.
    pub fn to_local(&self, global: &Vec3) -> Vec3 {
        self.rotation.transform_transposed(&(*global - self.position))
    }

    /// Appends a vertex and returns its index.
    pub fn new_vertex(&mut self, position: Vec3) -> Result<usize, GeomError> {
        if !position.is_finite() {
            return Err(GeomError::NonFinite(position.to_array()));
        }
        self.vertices.push(Vertex {
            position,
            normal: Vec3::ZERO,
        });
        Ok(self.vertices.len() - 1)
    }

    /// Overrides the normal of vertex `index` (normalised on store).
    pub fn set_vertex_normal(&mut self, index: usize, normal: Vec3) -> Result<(), GeomError> {
        if !normal.is_finite() {
            return Err(GeomError::NonFinite(normal.to_array()));
        }
        let count = self.vertices.len();
        let vertex = self
            .vertices
            .get_mut(index)
            .ok_or(GeomError::VertexOutOfRange { index, count })?;
        vertex.normal = normal.normalize();
        Ok(())
    }

    /// Appends a triangle over three existing vertices and returns its index.
    pub fn new_triangle(&mut self, v0: usize, v1: usize, v2: usize) -> Result<usize, GeomError> {
        let count = self.vertices.len();
        for index in [v0, v1, v2] {
            if index >= count {
                return Err(GeomError::VertexOutOfRange { index, count });
            }
        }
        self.triangles.push(Triangle {
            vertices: [v0, v1, v2],
            allocated: true,
        });
        Ok(self.triangles.len() - 1)
    }

    /// Convenience: appends three fresh vertices and a triangle over them.
    pub fn add_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) -> Result<usize, GeomError> {
        let v0 = self.new_vertex(a)?;
        let v1 = self.new_vertex(b)?;
        let v2 = self.new_vertex(c)?;
        self.new_triangle(v0, v1, v2)
    }

    /// Marks triangle `index` as deallocated.
    ///
    /// The collision index is not updated; call
    /// [`Mesh::create_collision_index`] to reflect the edit.
    pub fn remove_triangle(&mut self, index: usize) -> Result<(), GeomError> {
        let count = self.triangles.len();
        let triangle = self
            .triangles
            .get_mut(index)
            .ok_or(GeomError::TriangleOutOfRange { index, count })?;
        triangle.allocated = false;
        Ok(())
    }

    /// Vertex store.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangle store, including deallocated slots.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of allocated triangles.
    pub fn allocated_triangle_count(&self) -> usize {
        self.triangles.iter().filter(|t| t.allocated).count()
    }

    /// Vertex records of triangle `index`, if it exists.
    pub fn triangle_vertices(&self, index: usize) -> Option<[Vertex; 3]> {
        let triangle = self.triangles.get(index)?;
        let [a, b, c] = triangle.vertices;
        Some([self.vertices[a], self.vertices[b], self.vertices[c]])
    }

    /// Local-frame unit face normal (counter-clockwise winding), zero when degenerate.
    pub fn triangle_normal(&self, index: usize) -> Option<Vec3> {
        let [a, b, c] = self.triangle_vertices(index)?;
        Some(face_normal(&a.position, &b.position, &c.position))
    }

    /// Recomputes every vertex normal as the area-weighted average of the
    /// normals of the allocated triangles that share it.
    pub fn compute_all_normals(&mut self) {
        let mut sums = vec![Vec3::ZERO; self.vertices.len()];
        for triangle in self.triangles.iter().filter(|t| t.allocated) {
            let [a, b, c] = triangle.vertices;
            let p0 = self.vertices[a].position;
            let p1 = self.vertices[b].position;
            let p2 = self.vertices[c].position;
            // Unnormalised cross product weights by twice the area.
            let weighted = (p1 - p0).cross(&(p2 - p0));
            for index in triangle.vertices {
                sums[index] += weighted;
            }
        }
        for (vertex, sum) in self.vertices.iter_mut().zip(sums) {
            vertex.normal = sum.normalize();
        }
    }

    /// Builds (or rebuilds) the collision index with proxy radius `radius`.
    pub fn create_collision_index(&mut self, radius: f64) -> Result<(), GeomError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeomError::InvalidRadius(radius));
        }
        let mut index = self.index.take().unwrap_or_default();
        index.initialize(&*self, radius);
        debug!(
            mesh = self.id.0,
            triangles = index.triangle_count(),
            nodes = index.node_count(),
            depth = index.depth(),
            "collision index built"
        );
        self.index = Some(index);
        Ok(())
    }

    /// The collision index, once built.
    pub fn collision_index(&self) -> Option<&CollisionIndex> {
        self.index.as_ref()
    }

    /// Drops the collision index; queries then report no collision.
    pub fn clear_collision_index(&mut self) {
        self.index = None;
    }

    /// Tests the world-frame segment `a → b` against this mesh.
    ///
    /// The segment is moved into the local frame, the index is queried, and
    /// every recorded event carries both local and global coordinates.
    pub fn compute_collision(
        &self,
        a: &Vec3,
        b: &Vec3,
        recorder: &mut CollisionRecorder,
        settings: &CollisionSettings,
    ) -> bool {
        let Some(index) = self.index.as_ref() else {
            return false;
        };
        let local_a = self.to_local(a);
        let local_b = self.to_local(b);
        index.compute_collision(self, &local_a, &local_b, recorder, settings)
    }
}

impl TriangleSource for Mesh {
    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn is_allocated(&self, index: usize) -> bool {
        self.triangles.get(index).is_some_and(|t| t.allocated)
    }

    fn triangle_positions(&self, index: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[index].vertices;
        [
            self.vertices[a].position,
            self.vertices[b].position,
            self.vertices[c].position,
        ]
    }

    fn frame(&self) -> MeshFrame {
        MeshFrame {
            mesh: self.id,
            position: self.position,
            rotation: self.rotation,
        }
    }
}

/// Unit normal of the triangle `a, b, c` (counter-clockwise front face).
pub(crate) fn face_normal(a: &Vec3, b: &Vec3, c: &Vec3) -> Vec3 {
    let n = (*b - *a).cross(&(*c - *a));
    if n.length() <= SMALL {
        return Vec3::ZERO;
    }
    n.normalize()
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! A scene of posed meshes queried by force algorithms.

use haptic_core::math::Vec3;

use crate::collision::{CollisionRecorder, CollisionSettings, TriangleRef};
use crate::error::GeomError;
use crate::mesh::{Material, Mesh, MeshId};

/// World-frame corners and vertex normals of one triangle, for force shading.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadingTriangle {
    /// Corner positions.
    pub positions: [Vec3; 3],
    /// Unit vertex normals (zero when the mesh never computed them).
    pub normals: [Vec3; 3],
    /// Unit face normal.
    pub face_normal: Vec3,
}

/// What a force algorithm needs from its environment.
///
/// [`World`] is the standard implementation; references and shared
/// pointers to a world implement it too.
pub trait CollisionWorld {
    /// Tests the world-frame segment `a → b` against every mesh.
    fn compute_collision_detection(
        &self,
        a: &Vec3,
        b: &Vec3,
        recorder: &mut CollisionRecorder,
        settings: &CollisionSettings,
    ) -> bool;

    /// Material of the mesh owning `triangle`.
    fn material(&self, triangle: TriangleRef) -> Option<Material>;

    /// Shading data for `triangle`.
    fn shading_triangle(&self, triangle: TriangleRef) -> Option<ShadingTriangle>;

    /// World point → `mesh` frame.
    fn to_local(&self, mesh: MeshId, global: &Vec3) -> Option<Vec3>;

    /// `mesh` frame point → world.
    fn to_global(&self, mesh: MeshId, local: &Vec3) -> Option<Vec3>;
}

/// Owns the meshes of a scene.
#[derive(Debug, Clone, Default)]
pub struct World {
    meshes: Vec<Mesh>,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `mesh` and returns its id.
    pub fn add_mesh(&mut self, mut mesh: Mesh) -> MeshId {
        let id = MeshId(self.meshes.len());
        mesh.set_id(id);
        self.meshes.push(mesh);
        id
    }

    /// Mesh by id.
    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    /// Mutable mesh by id.
    pub fn mesh_mut(&mut self, id: MeshId) -> Result<&mut Mesh, GeomError> {
        self.meshes.get_mut(id.0).ok_or(GeomError::UnknownMesh(id))
    }

    /// All meshes in insertion order.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Total allocated triangles across meshes.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::allocated_triangle_count).sum()
    }

    /// Rebuilds every mesh's collision index with `radius`.
    pub fn build_collision_indices(&mut self, radius: f64) -> Result<(), GeomError> {
        for mesh in &mut self.meshes {
            mesh.create_collision_index(radius)?;
        }
        Ok(())
    }
}

impl CollisionWorld for World {
    fn compute_collision_detection(
        &self,
        a: &Vec3,
        b: &Vec3,
        recorder: &mut CollisionRecorder,
        settings: &CollisionSettings,
    ) -> bool {
        let mut hit = false;
        for mesh in &self.meshes {
            hit |= mesh.compute_collision(a, b, recorder, settings);
        }
        hit
    }

    fn material(&self, triangle: TriangleRef) -> Option<Material> {
        self.mesh(triangle.mesh).map(|m| *m.material())
    }

    fn shading_triangle(&self, triangle: TriangleRef) -> Option<ShadingTriangle> {
        let mesh = self.mesh(triangle.mesh)?;
        let vertices = mesh.triangle_vertices(triangle.triangle)?;
        let face = mesh.triangle_normal(triangle.triangle)?;
        let rotation = mesh.rotation();
        Some(ShadingTriangle {
            positions: vertices.map(|v| mesh.to_global(&v.position)),
            normals: vertices.map(|v| rotation.transform(&v.normal)),
            face_normal: rotation.transform(&face),
        })
    }

    fn to_local(&self, mesh: MeshId, global: &Vec3) -> Option<Vec3> {
        self.mesh(mesh).map(|m| m.to_local(global))
    }

    fn to_global(&self, mesh: MeshId, local: &Vec3) -> Option<Vec3> {
        self.mesh(mesh).map(|m| m.to_global(local))
    }
}

impl<W: CollisionWorld + ?Sized> CollisionWorld for &W {
    fn compute_collision_detection(
        &self,
        a: &Vec3,
        b: &Vec3,
        recorder: &mut CollisionRecorder,
        settings: &CollisionSettings,
    ) -> bool {
        (**self).compute_collision_detection(a, b, recorder, settings)
    }

    fn material(&self, triangle: TriangleRef) -> Option<Material> {
        (**self).material(triangle)
    }

    fn shading_triangle(&self, triangle: TriangleRef) -> Option<ShadingTriangle> {
        (**self).shading_triangle(triangle)
    }

    fn to_local(&self, mesh: MeshId, global: &Vec3) -> Option<Vec3> {
        (**self).to_local(mesh, global)
    }

    fn to_global(&self, mesh: MeshId, local: &Vec3) -> Option<Vec3> {
        (**self).to_global(mesh, local)
    }
}

impl<W: CollisionWorld + ?Sized> CollisionWorld for std::sync::Arc<W> {
    fn compute_collision_detection(
        &self,
        a: &Vec3,
        b: &Vec3,
        recorder: &mut CollisionRecorder,
        settings: &CollisionSettings,
    ) -> bool {
        (**self).compute_collision_detection(a, b, recorder, settings)
    }

    fn material(&self, triangle: TriangleRef) -> Option<Material> {
        (**self).material(triangle)
    }

    fn shading_triangle(&self, triangle: TriangleRef) -> Option<ShadingTriangle> {
        (**self).shading_triangle(triangle)
    }

    fn to_local(&self, mesh: MeshId, global: &Vec3) -> Option<Vec3> {
        (**self).to_local(mesh, global)
    }

    fn to_global(&self, mesh: MeshId, local: &Vec3) -> Option<Vec3> {
        (**self).to_global(mesh, local)
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use thiserror::Error;

use crate::mesh::MeshId;

/// Errors raised while building or editing geometry.
///
/// Queries never produce these; they only guard construction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeomError {
    /// A triangle referenced a vertex that does not exist.
    #[error("vertex index {index} out of range (mesh has {count} vertices)")]
    VertexOutOfRange {
        /// Offending vertex index.
        index: usize,
        /// Number of vertices in the mesh.
        count: usize,
    },
    /// A triangle index did not refer to an existing triangle.
    #[error("triangle index {index} out of range (mesh has {count} triangles)")]
    TriangleOutOfRange {
        /// Offending triangle index.
        index: usize,
        /// Number of triangles in the mesh.
        count: usize,
    },
    /// A position or normal had NaN or infinite components.
    #[error("non-finite coordinates: {0:?}")]
    NonFinite([f64; 3]),
    /// Collision radius must be finite and non-negative.
    #[error("invalid collision radius: {0}")]
    InvalidRadius(f64),
    /// Material coefficients must be finite and non-negative.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),
    /// The world holds no mesh with this id.
    #[error("unknown mesh {0:?}")]
    UnknownMesh(MeshId),
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use haptic_core::math::Vec3;

use crate::types::aabb::AxisAlignedBox;

/// Index of a node inside its [`crate::CollisionIndex`] arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// Leaf or internal node payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Wraps one triangle (slot index into the source mesh).
    Leaf {
        /// Triangle slot.
        triangle: usize,
    },
    /// Wraps the union of two subtrees.
    Internal {
        /// Subtree over the lower partition.
        left: NodeId,
        /// Subtree over the upper partition.
        right: NodeId,
    },
}

/// One arena node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Node {
    pub(crate) bbox: AxisAlignedBox,
    pub(crate) depth: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub(crate) fn leaf(triangle: usize, corners: &[Vec3; 3], radius: f64) -> Self {
        let mut node = Self {
            bbox: AxisAlignedBox::empty(),
            depth: 0,
            parent: None,
            kind: NodeKind::Leaf { triangle },
        };
        node.fit_leaf(corners, radius);
        node
    }

    /// Encloses the triangle corners, then fattens every face by `2 * radius`
    /// so a point query still reaches a probe of that radius.
    pub(crate) fn fit_leaf(&mut self, corners: &[Vec3; 3], radius: f64) {
        self.bbox.set_empty();
        for corner in corners {
            self.bbox.enclose_point(corner);
        }
        self.bbox = self.bbox.inflated(2.0 * radius);
    }

    /// Bounding box.
    pub fn bbox(&self) -> &AxisAlignedBox {
        &self.bbox
    }

    /// Distance from the root (root = 0).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Parent node, `None` at the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Leaf/internal payload.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// `true` for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use haptic_core::math::Vec3;

use super::node::{Node, NodeId, NodeKind};
use crate::collision::{segment_triangle, CollisionRecorder, CollisionSettings, MeshFrame};
use crate::mesh::TriangleSource;
use crate::types::aabb::AxisAlignedBox;

/// AABB tree over the allocated triangles of one mesh.
///
/// Build: every leaf wraps one triangle's box fattened by the proxy radius;
/// internal nodes split their slice of leaves around their own box centre on
/// the longest axis, falling back to an even split when that partition
/// leaves one side empty.
///
/// Query: [`CollisionIndex::compute_collision`] prunes subtrees whose box
/// misses the query segment's box (and, optionally, the segment itself) and
/// visits both children of every surviving node so the recorder sees every
/// candidate and keeps the globally nearest hit.
#[derive(Debug, Clone)]
pub struct CollisionIndex {
    nodes: Vec<Node>,
    leaves: Vec<NodeId>,
    root: Option<NodeId>,
    triangle_count: usize,
    radius: f64,
    depth: u32,
    test_line_box: bool,
}

impl Default for CollisionIndex {
    fn default() -> Self {
        Self::new()
    }
}

struct Query<'q, S: ?Sized> {
    source: &'q S,
    frame: MeshFrame,
    a: &'q Vec3,
    b: &'q Vec3,
    line_box: AxisAlignedBox,
    settings: &'q CollisionSettings,
}

impl CollisionIndex {
    /// Creates an empty index; queries report no collision until built.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            leaves: Vec::new(),
            root: None,
            triangle_count: 0,
            radius: 0.0,
            depth: 0,
            test_line_box: true,
        }
    }

    /// Discards any previous tree and builds a new one over the allocated
    /// triangles of `source`, fattening leaf boxes by `radius`.
    pub fn initialize<S: TriangleSource + ?Sized>(&mut self, source: &S, radius: f64) {
        self.nodes.clear();
        self.leaves.clear();
        self.root = None;
        self.depth = 0;
        self.radius = radius;

        let allocated: Vec<usize> = (0..source.triangle_count())
            .filter(|&t| source.is_allocated(t))
            .collect();
        self.triangle_count = allocated.len();
        if allocated.is_empty() {
            return;
        }

        self.nodes.reserve(2 * allocated.len() - 1);
        for &triangle in &allocated {
            self.nodes
                .push(Node::leaf(triangle, &source.triangle_positions(triangle), radius));
        }

        let mut order: Vec<NodeId> = (0..allocated.len()).map(NodeId).collect();
        let root = if order.len() >= 2 {
            self.build_internal(&mut order, 0)
        } else {
            NodeId(0)
        };
        self.leaves = order;
        self.root = Some(root);
        self.set_parent(root, None, true);
    }

    /// Builds an internal node over `slice` (at least two leaves).
    fn build_internal(&mut self, slice: &mut [NodeId], depth: u32) -> NodeId {
        let mut bbox = AxisAlignedBox::empty();
        for id in slice.iter() {
            bbox = bbox.union(&self.nodes[id.0].bbox);
        }

        let axis = bbox.longest_axis();
        let pivot = bbox.center().component(axis);

        // Single-pass swap partition: centres below the pivot go first.
        let length = slice.len();
        let mut i = 0;
        let mut mid = length;
        while i < mid {
            if self.nodes[slice[i].0].bbox.center().component(axis) < pivot {
                i += 1;
            } else {
                mid -= 1;
                slice.swap(i, mid);
            }
        }
        if mid == 0 || mid == length {
            mid = length / 2;
        }

        let (lower, upper) = slice.split_at_mut(mid);
        let left = self.build_child(lower, depth + 1);
        let right = self.build_child(upper, depth + 1);

        self.depth = self.depth.max(depth);
        self.nodes.push(Node {
            bbox,
            depth,
            parent: None,
            kind: NodeKind::Internal { left, right },
        });
        NodeId(self.nodes.len() - 1)
    }

    fn build_child(&mut self, slice: &mut [NodeId], depth: u32) -> NodeId {
        if slice.len() >= 2 {
            return self.build_internal(slice, depth);
        }
        let id = slice[0];
        self.nodes[id.0].depth = depth;
        self.depth = self.depth.max(depth);
        id
    }

    /// Sets `node`'s parent; with `recursive`, rewires the whole subtree so
    /// each child points at its own parent.
    pub fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>, recursive: bool) {
        let Some(entry) = self.nodes.get_mut(node.0) else {
            return;
        };
        entry.parent = parent;
        if !recursive {
            return;
        }
        if let NodeKind::Internal { left, right } = entry.kind {
            self.set_parent(left, Some(node), true);
            self.set_parent(right, Some(node), true);
        }
    }

    /// Recomputes an internal node's box as the union of its children's
    /// current boxes. Leaves are left untouched.
    pub fn fit_bbox(&mut self, node: NodeId) {
        let Some(entry) = self.nodes.get(node.0) else {
            return;
        };
        if let NodeKind::Internal { left, right } = entry.kind {
            let mut bbox = AxisAlignedBox::empty();
            bbox.enclose_boxes(&self.nodes[left.0].bbox, &self.nodes[right.0].bbox);
            self.nodes[node.0].bbox = bbox;
        }
    }

    /// Refits every box after vertices moved without a topology change.
    ///
    /// Leaves are refitted from `source` with the build radius, then internal
    /// nodes bottom-up.
    pub fn refit<S: TriangleSource + ?Sized>(&mut self, source: &S) {
        for i in 0..self.nodes.len() {
            let kind = self.nodes[i].kind;
            match kind {
                NodeKind::Leaf { triangle } => {
                    if triangle < source.triangle_count() {
                        let corners = source.triangle_positions(triangle);
                        self.nodes[i].fit_leaf(&corners, self.radius);
                    }
                }
                NodeKind::Internal { .. } => self.fit_bbox(NodeId(i)),
            }
        }
    }

    /// `true` when the subtree under `node` wraps `triangle`.
    pub fn contains_triangle(&self, node: NodeId, triangle: usize) -> bool {
        match self.nodes.get(node.0).map(|n| n.kind) {
            Some(NodeKind::Leaf { triangle: t }) => t == triangle,
            Some(NodeKind::Internal { left, right }) => {
                self.contains_triangle(left, triangle) || self.contains_triangle(right, triangle)
            }
            None => false,
        }
    }

    /// Tests the local-frame segment `a → b` against the tree.
    ///
    /// Hits are folded into `recorder`; returns whether any triangle was hit.
    /// An empty tree always returns `false`.
    pub fn compute_collision<S: TriangleSource + ?Sized>(
        &self,
        source: &S,
        a: &Vec3,
        b: &Vec3,
        recorder: &mut CollisionRecorder,
        settings: &CollisionSettings,
    ) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let mut line_box = AxisAlignedBox::empty();
        line_box.enclose_point(a);
        line_box.enclose_point(b);
        let query = Query {
            source,
            frame: source.frame(),
            a,
            b,
            line_box,
            settings,
        };
        self.node_collision(root, &query, recorder)
    }

    fn node_collision<S: TriangleSource + ?Sized>(
        &self,
        id: NodeId,
        query: &Query<'_, S>,
        recorder: &mut CollisionRecorder,
    ) -> bool {
        let node = &self.nodes[id.0];
        match node.kind {
            NodeKind::Leaf { triangle } => Self::leaf_collision(triangle, query, recorder),
            NodeKind::Internal { left, right } => {
                if !AxisAlignedBox::intersect(&node.bbox, &query.line_box) {
                    return false;
                }
                if self.test_line_box
                    && !AxisAlignedBox::hit_bounding_box(
                        &node.bbox.min(),
                        &node.bbox.max(),
                        query.a,
                        query.b,
                    )
                {
                    return false;
                }
                let hit_left = self.node_collision(left, query, recorder);
                let hit_right = self.node_collision(right, query, recorder);
                hit_left || hit_right
            }
        }
    }

    fn leaf_collision<S: TriangleSource + ?Sized>(
        triangle: usize,
        query: &Query<'_, S>,
        recorder: &mut CollisionRecorder,
    ) -> bool {
        if triangle >= query.source.triangle_count() || !query.source.is_allocated(triangle) {
            return false;
        }
        let corners = query.source.triangle_positions(triangle);
        let Some(hit) = segment_triangle(&corners, query.a, query.b, query.settings) else {
            return false;
        };
        recorder.record_hit(&hit, triangle, &query.frame, query.a, query.settings);
        true
    }

    /// Root node, `None` for an empty tree.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// The whole arena (leaves first).
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Leaf ids in partitioned order.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Number of allocated triangles at the last build.
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Number of arena nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest node depth (0 for a single leaf or an empty tree).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Radius baked into the leaf boxes.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Enables or disables the precise segment/box filter on internal nodes.
    pub fn set_test_line_box(&mut self, enabled: bool) {
        self.test_line_box = enabled;
    }
}

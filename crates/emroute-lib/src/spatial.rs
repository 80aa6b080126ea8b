//! KD-tree index for nearest-node snapping.
//!
//! Nodes are indexed by their position on the unit sphere. Chord length on
//! the sphere grows monotonically with great-circle distance, so the
//! Euclidean nearest neighbour in the tree is also the haversine nearest
//! node, without the distortion a raw lat/lon tree would have.

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::info;

use crate::geo_math::{haversine_m, GeoPoint};
use crate::graph::{NodeId, RoadGraph};

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Static nearest-node index built from a graph's node positions.
///
/// Node positions never change after loading, so the index stays valid while
/// damage is applied and reset.
pub struct NodeIndex {
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    nodes: Vec<(NodeId, GeoPoint)>,
}

impl NodeIndex {
    /// Index every node of `graph`.
    pub fn build<G: RoadGraph>(graph: &G) -> Self {
        let nodes: Vec<(NodeId, GeoPoint)> = graph
            .node_ids()
            .filter_map(|id| graph.node_position(id).map(|position| (id, position)))
            .collect();

        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        for (index, (_, position)) in nodes.iter().enumerate() {
            tree.add(&position.unit_sphere(), index);
        }

        info!(node_count = nodes.len(), "built node index");

        Self { tree, nodes }
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Closest node to `point` and its great-circle distance in meters.
    pub fn nearest(&self, point: GeoPoint) -> Option<(NodeId, f64)> {
        if self.nodes.is_empty() {
            return None;
        }
        let neighbour = self
            .tree
            .nearest_n::<SquaredEuclidean>(&point.unit_sphere(), 1)
            .into_iter()
            .next()?;
        let (id, position) = self.nodes[neighbour.item];
        Some((id, haversine_m(point, position)))
    }
}

impl std::fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeIndex")
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

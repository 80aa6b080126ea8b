use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo_math::GeoPoint;

/// Numeric identifier for a road network node (OSM node ids fit in an `i64`).
pub type NodeId = i64;

/// Identifier of one directed edge: endpoints plus the parallel index that
/// distinguishes separate physical ways between the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EdgeKey {
    pub source: NodeId,
    pub target: NodeId,
    pub key: u32,
}

impl EdgeKey {
    pub const fn new(source: NodeId, target: NodeId, key: u32) -> Self {
        Self {
            source,
            target,
            key,
        }
    }

    /// Same parallel index travelled in the opposite direction.
    pub const fn reversed(self) -> Self {
        Self::new(self.target, self.source, self.key)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}#{}", self.source, self.target, self.key)
    }
}

/// Cost values captured the first time an edge is blocked.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CostSnapshot {
    length: Option<f64>,
    weight: Option<f64>,
}

/// Mutable attributes of a directed edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    /// Base traversal cost in meters.
    pub length: Option<f64>,
    /// Override cost; takes precedence over `length` when present.
    pub weight: Option<f64>,
    pub blocked: bool,
    /// Polyline from source to target. `None` means a straight segment.
    pub geometry: Option<Vec<GeoPoint>>,
    snapshot: Option<CostSnapshot>,
}

impl EdgeRecord {
    pub fn new(length: f64) -> Self {
        Self {
            length: Some(length),
            weight: None,
            blocked: false,
            geometry: None,
            snapshot: None,
        }
    }

    /// Edge without any cost information; resolves to a unit cost.
    pub fn unmeasured() -> Self {
        let mut record = Self::new(0.0);
        record.length = None;
        record
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_geometry(mut self, geometry: Vec<GeoPoint>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_blocked(mut self, blocked: bool) -> Self {
        self.blocked = blocked;
        self
    }

    /// Length preserved when the edge was first blocked, if any.
    pub fn orig_length(&self) -> Option<f64> {
        self.snapshot.and_then(|snapshot| snapshot.length)
    }

    /// Whether block-time costs were captured and are waiting to be restored.
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Cost of this edge alone, or `None` when it is impassable.
    ///
    /// With `ignore_damage` a blocked edge is costed as it was before it was
    /// blocked.
    pub fn cost(&self, ignore_damage: bool) -> Option<f64> {
        if self.blocked {
            if !ignore_damage {
                return None;
            }
            return Some(self.undamaged_cost());
        }
        let cost = self.weight.or(self.length).unwrap_or(1.0);
        cost.is_finite().then_some(cost)
    }

    fn undamaged_cost(&self) -> f64 {
        match self.snapshot {
            Some(snapshot) => snapshot.weight.or(snapshot.length).or(self.length),
            None => self.weight.filter(|w| w.is_finite()).or(self.length),
        }
        .unwrap_or(1.0)
    }

    /// Mark the edge impassable. Returns `true` when it was not blocked before.
    ///
    /// Original costs are captured only once; repeated blocking keeps the
    /// first snapshot until [`EdgeRecord::restore`] runs.
    pub fn block(&mut self) -> bool {
        if self.snapshot.is_none() {
            self.snapshot = Some(CostSnapshot {
                length: self.length,
                weight: self.weight.filter(|w| w.is_finite()),
            });
        }
        let newly_blocked = !self.blocked;
        self.blocked = true;
        self.weight = Some(f64::INFINITY);
        newly_blocked
    }

    /// Clear damage and restore captured costs bit-for-bit.
    ///
    /// Edges without a snapshot keep their length and only lose a
    /// non-finite override weight.
    pub fn restore(&mut self) {
        self.blocked = false;
        match self.snapshot.take() {
            Some(snapshot) => {
                if snapshot.length.is_some() {
                    self.length = snapshot.length;
                }
                self.weight = snapshot.weight;
            }
            None => {
                if self.weight.is_some_and(|w| !w.is_finite()) {
                    self.weight = None;
                }
            }
        }
    }
}

/// Read/write view of a road network required by the routing core.
///
/// Implemented by [`RoadNetwork`]; other data sources can provide their own
/// adapter. Iteration order must be stable so seeded operations reproduce.
pub trait RoadGraph {
    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    /// All node identifiers in a stable order.
    fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_;

    fn node_position(&self, node: NodeId) -> Option<GeoPoint>;

    fn contains_node(&self, node: NodeId) -> bool {
        self.node_position(node).is_some()
    }

    /// Distinct outgoing neighbours of `node`.
    fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_;

    /// Every parallel edge from `source` to `target`.
    fn parallel_edges(
        &self,
        source: NodeId,
        target: NodeId,
    ) -> impl Iterator<Item = (EdgeKey, &EdgeRecord)> + '_;

    /// All edge keys in a stable order.
    fn edge_keys(&self) -> impl Iterator<Item = EdgeKey> + '_;

    fn edge(&self, key: EdgeKey) -> Option<&EdgeRecord>;

    fn edge_mut(&mut self, key: EdgeKey) -> Option<&mut EdgeRecord>;
}

/// In-memory road network with ordered node and edge storage.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    nodes: BTreeMap<NodeId, GeoPoint>,
    edges: BTreeMap<EdgeKey, EdgeRecord>,
    adjacency: HashMap<NodeId, Vec<NodeId>>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or move a node.
    pub fn add_node(&mut self, id: NodeId, position: GeoPoint) {
        self.nodes.insert(id, position);
        self.adjacency.entry(id).or_default();
    }

    /// Insert a directed edge using the next free parallel index.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        record: EdgeRecord,
    ) -> Result<EdgeKey> {
        let key = self.next_parallel_index(source, target);
        self.insert_edge(EdgeKey::new(source, target, key), record)
    }

    /// Insert a directed edge at an explicit key, replacing any existing record.
    pub fn insert_edge(&mut self, key: EdgeKey, record: EdgeRecord) -> Result<EdgeKey> {
        for node in [key.source, key.target] {
            if !self.nodes.contains_key(&node) {
                return Err(Error::invalid_network(format!(
                    "edge {key} references unknown node {node}"
                )));
            }
        }
        if let Some(geometry) = &record.geometry {
            if geometry.iter().any(|point| !point.is_finite()) {
                return Err(Error::invalid_network(format!(
                    "edge {key} has a non-finite geometry coordinate"
                )));
            }
        }

        let neighbours = self.adjacency.entry(key.source).or_default();
        if !neighbours.contains(&key.target) {
            neighbours.push(key.target);
        }
        self.edges.insert(key, record);
        Ok(key)
    }

    /// Insert a two-way street: both directions share the parallel index and
    /// the reverse direction gets the reversed geometry.
    pub fn add_way(
        &mut self,
        a: NodeId,
        b: NodeId,
        record: EdgeRecord,
    ) -> Result<(EdgeKey, EdgeKey)> {
        let key = self
            .next_parallel_index(a, b)
            .max(self.next_parallel_index(b, a));
        let mut reverse = record.clone();
        if let Some(geometry) = reverse.geometry.as_mut() {
            geometry.reverse();
        }
        let forward = self.insert_edge(EdgeKey::new(a, b, key), record)?;
        let backward = self.insert_edge(EdgeKey::new(b, a, key), reverse)?;
        Ok((forward, backward))
    }

    fn next_parallel_index(&self, source: NodeId, target: NodeId) -> u32 {
        self.edges
            .range(EdgeKey::new(source, target, 0)..=EdgeKey::new(source, target, u32::MAX))
            .next_back()
            .map(|(key, _)| key.key.saturating_add(1))
            .unwrap_or(0)
    }

    /// Node positions of an edge's endpoints.
    pub fn endpoints(&self, key: EdgeKey) -> Option<(GeoPoint, GeoPoint)> {
        Some((*self.nodes.get(&key.source)?, *self.nodes.get(&key.target)?))
    }
}

impl RoadGraph for RoadNetwork {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    fn node_position(&self, node: NodeId) -> Option<GeoPoint> {
        self.nodes.get(&node).copied()
    }

    fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    fn parallel_edges(
        &self,
        source: NodeId,
        target: NodeId,
    ) -> impl Iterator<Item = (EdgeKey, &EdgeRecord)> + '_ {
        self.edges
            .range(EdgeKey::new(source, target, 0)..=EdgeKey::new(source, target, u32::MAX))
            .map(|(key, record)| (*key, record))
    }

    fn edge_keys(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edges.keys().copied()
    }

    fn edge(&self, key: EdgeKey) -> Option<&EdgeRecord> {
        self.edges.get(&key)
    }

    fn edge_mut(&mut self, key: EdgeKey) -> Option<&mut EdgeRecord> {
        self.edges.get_mut(&key)
    }
}

/// Polyline of an edge: its own geometry, or the straight segment between
/// its endpoints.
pub(crate) fn edge_polyline<G: RoadGraph>(graph: &G, key: EdgeKey) -> Option<Vec<GeoPoint>> {
    let record = graph.edge(key)?;
    match &record.geometry {
        Some(geometry) if geometry.len() >= 2 => Some(geometry.clone()),
        _ => Some(vec![
            graph.node_position(key.source)?,
            graph.node_position(key.target)?,
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_network() -> RoadNetwork {
        let mut network = RoadNetwork::new();
        network.add_node(1, GeoPoint::new(0.0, 0.0));
        network.add_node(2, GeoPoint::new(0.0, 0.001));
        network
    }

    #[test]
    fn parallel_edges_get_increasing_keys() {
        let mut network = two_node_network();
        let first = network.add_edge(1, 2, EdgeRecord::new(100.0)).unwrap();
        let second = network.add_edge(1, 2, EdgeRecord::new(80.0)).unwrap();
        assert_eq!(first.key, 0);
        assert_eq!(second.key, 1);
        assert_eq!(network.parallel_edges(1, 2).count(), 2);
        assert_eq!(network.neighbors(1).collect::<Vec<_>>(), vec![2]);
        assert_eq!(network.parallel_edges(2, 1).count(), 0);
    }

    #[test]
    fn edge_to_unknown_node_is_rejected() {
        let mut network = two_node_network();
        let err = network.add_edge(1, 9, EdgeRecord::new(1.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidNetwork { .. }));
    }

    #[test]
    fn way_reverses_geometry() {
        let mut network = two_node_network();
        let geometry = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0005, 0.0005),
            GeoPoint::new(0.0, 0.001),
        ];
        let (forward, backward) = network
            .add_way(1, 2, EdgeRecord::new(120.0).with_geometry(geometry.clone()))
            .unwrap();
        assert_eq!(backward, forward.reversed());
        let reversed = network.edge(backward).unwrap().geometry.clone().unwrap();
        assert_eq!(reversed.first(), geometry.last());
    }

    #[test]
    fn block_captures_original_costs_once() {
        let mut record = EdgeRecord::new(42.0).with_weight(40.0);
        assert!(record.block());
        assert_eq!(record.orig_length(), Some(42.0));
        assert_eq!(record.weight, Some(f64::INFINITY));

        record.length = Some(999.0);
        assert!(!record.block(), "second block is not a transition");
        assert_eq!(record.orig_length(), Some(42.0));

        record.restore();
        assert!(!record.blocked);
        assert_eq!(record.length, Some(42.0));
        assert_eq!(record.weight, Some(40.0));
        assert!(!record.has_snapshot());
    }

    #[test]
    fn restore_drops_stale_infinite_weight_without_snapshot() {
        let mut record = EdgeRecord::unmeasured().with_weight(f64::INFINITY);
        record.blocked = true;
        record.restore();
        assert_eq!(record.weight, None);
        assert_eq!(record.cost(false), Some(1.0));
    }

    #[test]
    fn cost_prefers_weight_then_length_then_unit() {
        assert_eq!(EdgeRecord::new(10.0).cost(false), Some(10.0));
        assert_eq!(EdgeRecord::new(10.0).with_weight(3.0).cost(false), Some(3.0));
        assert_eq!(EdgeRecord::unmeasured().cost(false), Some(1.0));
    }

    #[test]
    fn blocked_cost_depends_on_ignore_damage() {
        let mut record = EdgeRecord::new(25.0);
        record.block();
        assert_eq!(record.cost(false), None);
        assert_eq!(record.cost(true), Some(25.0));
    }
}

use crate::graph::{NodeId, RoadGraph};

/// Traversal cost from `source` to `target` under the current block state.
///
/// Considers every parallel edge and returns the cheapest passable one.
/// Returns `f64::INFINITY` when all parallel edges are blocked or the pair
/// has no edge at all.
pub fn resolve_weight<G: RoadGraph>(
    graph: &G,
    source: NodeId,
    target: NodeId,
    ignore_damage: bool,
) -> f64 {
    graph
        .parallel_edges(source, target)
        .filter_map(|(_, record)| record.cost(ignore_damage))
        .fold(f64::INFINITY, f64::min)
}

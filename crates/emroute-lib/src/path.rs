use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use tracing::{debug, trace, warn};

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::geo_math::{planar_distance, METERS_PER_DEGREE};
use crate::graph::{NodeId, RoadGraph};
use crate::routing::RouteAlgorithm;
use crate::weight::resolve_weight;

/// Options shared by both search algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Treat blocked edges as passable at their pre-damage cost.
    pub ignore_damage: bool,
    /// Meters per degree for the planar heuristic.
    pub heuristic_scale: f64,
    /// Trace progress every this many settled nodes (zero disables).
    pub progress_interval: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            ignore_damage: false,
            heuristic_scale: METERS_PER_DEGREE,
            progress_interval: 1000,
        }
    }
}

impl SearchOptions {
    pub fn from_config(config: &SearchConfig, ignore_damage: bool) -> Self {
        Self {
            ignore_damage,
            heuristic_scale: config.heuristic_scale,
            progress_interval: config.progress_interval,
        }
    }

    pub fn ignoring_damage(mut self, ignore_damage: bool) -> Self {
        self.ignore_damage = ignore_damage;
        self
    }
}

/// Outcome of a single search.
#[derive(Debug, Clone, Serialize)]
pub struct RouteResult {
    pub algorithm: RouteAlgorithm,
    /// Nodes from start to the reached node; empty when nothing was reachable.
    pub path: Vec<NodeId>,
    /// Number of nodes settled by the search.
    pub visited_count: usize,
    /// Sum of resolved edge weights along `path`. Infinite when `path` is empty.
    pub total_cost: f64,
    /// `true` when the true target was reached, `false` for a fallback route.
    pub success: bool,
    /// Peak frontier size during the search.
    pub max_frontier: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl RouteResult {
    /// Number of edges in the path.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Last node of the path: the target on success, the fallback otherwise.
    pub fn reached(&self) -> Option<NodeId> {
        self.path.last().copied()
    }
}

fn serialize_millis<S: Serializer>(value: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64() * 1000.0)
}

/// Run Dijkstra's algorithm from `start` to `target`.
///
/// An unreachable target yields a fallback route to the settled node that
/// is closest to the target in straight-line distance.
pub fn dijkstra_search<G: RoadGraph>(
    graph: &G,
    start: NodeId,
    target: NodeId,
    options: &SearchOptions,
) -> Result<RouteResult> {
    run_search(graph, start, target, options, RouteAlgorithm::Dijkstra)
}

/// Run A* search with a scaled planar heuristic.
///
/// Termination and fallback behaviour match [`dijkstra_search`].
pub fn astar_search<G: RoadGraph>(
    graph: &G,
    start: NodeId,
    target: NodeId,
    options: &SearchOptions,
) -> Result<RouteResult> {
    run_search(graph, start, target, options, RouteAlgorithm::AStar)
}

fn run_search<G: RoadGraph>(
    graph: &G,
    start: NodeId,
    target: NodeId,
    options: &SearchOptions,
    algorithm: RouteAlgorithm,
) -> Result<RouteResult> {
    for node in [start, target] {
        if !graph.contains_node(node) {
            return Err(Error::UnknownNode { node });
        }
    }

    let started = Instant::now();
    let heuristic = |node: NodeId| match algorithm {
        RouteAlgorithm::Dijkstra => 0.0,
        RouteAlgorithm::AStar => heuristic_distance(graph, node, target, options.heuristic_scale),
    };

    let mut distances: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut settled_order: Vec<NodeId> = Vec::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0.0);
    queue.push(QueueEntry::new(start, heuristic(start)));
    let mut max_frontier = queue.len();
    let mut success = false;

    while let Some(entry) = queue.pop() {
        if !visited.insert(entry.node) {
            continue;
        }
        settled_order.push(entry.node);

        if options.progress_interval > 0 && settled_order.len() % options.progress_interval == 0 {
            trace!(
                algorithm = %algorithm,
                settled = settled_order.len(),
                frontier = queue.len(),
                "search in progress"
            );
        }

        if entry.node == target {
            success = true;
            break;
        }

        let current_distance = distances.get(&entry.node).copied().unwrap_or(f64::INFINITY);
        for next in graph.neighbors(entry.node) {
            if visited.contains(&next) {
                continue;
            }
            let weight = resolve_weight(graph, entry.node, next, options.ignore_damage);
            if weight.is_infinite() {
                continue;
            }

            let candidate = current_distance + weight;
            if candidate < *distances.get(&next).unwrap_or(&f64::INFINITY) {
                distances.insert(next, candidate);
                parents.insert(next, entry.node);
                queue.push(QueueEntry::new(next, candidate + heuristic(next)));
            }
        }
        max_frontier = max_frontier.max(queue.len());
    }

    let visited_count = settled_order.len();
    let (path, total_cost) = if success {
        (
            reconstruct_path(&parents, start, target),
            distances.get(&target).copied().unwrap_or(f64::INFINITY),
        )
    } else if visited_count <= 1 {
        (Vec::new(), f64::INFINITY)
    } else {
        let fallback = settled_order
            .iter()
            .copied()
            .min_by(|a, b| {
                let da = heuristic_distance(graph, *a, target, options.heuristic_scale);
                let db = heuristic_distance(graph, *b, target, options.heuristic_scale);
                da.total_cmp(&db)
            })
            .unwrap_or(start);
        warn!(
            algorithm = %algorithm,
            start,
            target,
            fallback,
            "target unreachable; routing to closest reachable node"
        );
        (
            reconstruct_path(&parents, start, fallback),
            distances.get(&fallback).copied().unwrap_or(f64::INFINITY),
        )
    };

    let elapsed = started.elapsed();
    debug!(
        algorithm = %algorithm,
        start,
        target,
        success,
        visited = visited_count,
        max_frontier,
        cost = total_cost,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "search finished"
    );

    Ok(RouteResult {
        algorithm,
        path,
        visited_count,
        total_cost,
        success,
        max_frontier,
        elapsed,
    })
}

/// Straight-line estimate between two nodes in meters. Zero when either
/// position is unknown.
pub fn heuristic_distance<G: RoadGraph>(graph: &G, from: NodeId, to: NodeId, scale: f64) -> f64 {
    match (graph.node_position(from), graph.node_position(to)) {
        (Some(a), Some(b)) => planar_distance(a, b, scale),
        _ => 0.0,
    }
}

fn reconstruct_path(parents: &HashMap<NodeId, NodeId>, start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match parents.get(&current) {
            Some(&parent) => {
                path.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    priority: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeId, priority: f64) -> Self {
        Self {
            node,
            priority: FloatOrd(priority),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by priority.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

//! Route planning strategies.
//!
//! Each algorithm is wrapped in a planner implementing [`RoutePlanner`], so
//! callers pick a strategy once and the orchestration in
//! [`plan_route`](super::plan_route) stays algorithm-agnostic.

use crate::error::Result;
use crate::graph::{NodeId, RoadGraph};
use crate::path::{astar_search, dijkstra_search, RouteResult, SearchOptions};

use super::RouteAlgorithm;

/// Trait for route planning strategies over a graph type `G`.
pub trait RoutePlanner<G: RoadGraph> {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Execute the search. Unreachable targets produce a fallback result,
    /// not an error.
    fn find_path(
        &self,
        graph: &G,
        start: NodeId,
        goal: NodeId,
        options: &SearchOptions,
    ) -> Result<RouteResult>;

    /// Whether the planner reads node positions to guide the search.
    fn uses_heuristic(&self) -> bool {
        false
    }
}

/// Uninformed lowest-cost search.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraPlanner;

impl<G: RoadGraph> RoutePlanner<G> for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_path(
        &self,
        graph: &G,
        start: NodeId,
        goal: NodeId,
        options: &SearchOptions,
    ) -> Result<RouteResult> {
        dijkstra_search(graph, start, goal, options)
    }
}

/// Heuristic-guided search using straight-line distance to the goal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarPlanner;

impl<G: RoadGraph> RoutePlanner<G> for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn find_path(
        &self,
        graph: &G,
        start: NodeId,
        goal: NodeId,
        options: &SearchOptions,
    ) -> Result<RouteResult> {
        astar_search(graph, start, goal, options)
    }

    fn uses_heuristic(&self) -> bool {
        true
    }
}

/// Select the planner for an algorithm.
pub fn select_planner<G: RoadGraph>(algorithm: RouteAlgorithm) -> Box<dyn RoutePlanner<G>> {
    match algorithm {
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
        RouteAlgorithm::AStar => Box::new(AStarPlanner),
    }
}

//! Route planning over a (possibly damaged) road network.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported routing algorithms (Dijkstra, A*)
//! - [`RouteRequest`] - Start/goal plus search options
//! - [`plan_route`] / [`find_route`] - Main entry points for computing routes
//! - [`compare_algorithms`] - Run both algorithms and report search effort
//!
//! # Example
//!
//! ```ignore
//! use emroute_lib::{find_route, load_network, RouteAlgorithm};
//!
//! let network = load_network("city.json".as_ref())?;
//! let result = find_route(&network, 1, 42, RouteAlgorithm::AStar, false)?;
//! println!("{} hops, {:.1} m", result.hop_count(), result.total_cost);
//! ```

mod planner;

pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::{NodeId, RoadGraph};
use crate::path::{RouteResult, SearchOptions};

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm (uninformed, lowest cost).
    Dijkstra,
    /// A* search (heuristic guided).
    #[default]
    #[serde(rename = "a-star")]
    AStar,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            "a-star" | "astar" | "a*" => Ok(RouteAlgorithm::AStar),
            other => Err(format!("unknown routing algorithm '{other}'")),
        }
    }
}

/// High-level route planning request.
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest {
    pub start: NodeId,
    pub goal: NodeId,
    pub algorithm: RouteAlgorithm,
    pub options: SearchOptions,
}

impl RouteRequest {
    /// Request with default search options.
    pub fn new(start: NodeId, goal: NodeId, algorithm: RouteAlgorithm) -> Self {
        Self {
            start,
            goal,
            algorithm,
            options: SearchOptions::default(),
        }
    }

    pub fn ignoring_damage(mut self, ignore_damage: bool) -> Self {
        self.options.ignore_damage = ignore_damage;
        self
    }
}

/// Compute a route for a request.
///
/// Only missing endpoints are errors; an unreachable goal produces a
/// fallback [`RouteResult`] with `success == false`.
pub fn plan_route<G: RoadGraph>(graph: &G, request: &RouteRequest) -> Result<RouteResult> {
    let planner = select_planner::<G>(request.algorithm);
    planner.find_path(graph, request.start, request.goal, &request.options)
}

/// Compute a route with default options.
pub fn find_route<G: RoadGraph>(
    graph: &G,
    start: NodeId,
    goal: NodeId,
    algorithm: RouteAlgorithm,
    ignore_damage: bool,
) -> Result<RouteResult> {
    let request = RouteRequest::new(start, goal, algorithm).ignoring_damage(ignore_damage);
    plan_route(graph, &request)
}

/// Side-by-side search effort of both algorithms on the same query.
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmComparison {
    pub dijkstra: RouteResult,
    pub a_star: RouteResult,
}

impl AlgorithmComparison {
    /// Meters of route per settled node for `result`. Zero when nothing was
    /// settled or no finite route exists.
    pub fn efficiency(result: &RouteResult) -> f64 {
        if result.visited_count == 0 || !result.total_cost.is_finite() {
            return 0.0;
        }
        result.total_cost / result.visited_count as f64
    }

    /// Whether both searches found routes of the same cost.
    pub fn costs_agree(&self) -> bool {
        let (a, b) = (self.dijkstra.total_cost, self.a_star.total_cost);
        if a.is_infinite() || b.is_infinite() {
            return a == b;
        }
        (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
    }

    /// Settled nodes A* saved relative to Dijkstra (negative if it settled more).
    pub fn visited_saving(&self) -> i64 {
        self.dijkstra.visited_count as i64 - self.a_star.visited_count as i64
    }
}

/// Run Dijkstra and A* on the same query.
pub fn compare_algorithms<G: RoadGraph>(
    graph: &G,
    start: NodeId,
    goal: NodeId,
    options: &SearchOptions,
) -> Result<AlgorithmComparison> {
    let dijkstra = DijkstraPlanner.find_path(graph, start, goal, options)?;
    let a_star = AStarPlanner.find_path(graph, start, goal, options)?;
    tracing::info!(
        start,
        goal,
        dijkstra_visited = dijkstra.visited_count,
        a_star_visited = a_star.visited_count,
        "compared routing algorithms"
    );
    Ok(AlgorithmComparison { dijkstra, a_star })
}

//! Emergency routing library entry points.
//!
//! This crate loads a road network into memory, snaps raw coordinates onto
//! it, simulates road damage, and runs Dijkstra or A* over whatever is left
//! passable. Higher-level consumers (the CLI) should only depend on the
//! functions exported here instead of reimplementing behavior.
//!

pub mod anchor;
pub mod config;
pub mod damage;
pub mod error;
pub mod geo_math;
pub mod graph;
pub mod network;
pub mod output;
pub mod path;
pub mod routing;
pub mod session;
pub mod spatial;
pub mod weight;

pub use anchor::{
    nearest_edge_point, nearest_node, nearest_node_indexed, project_onto_polyline,
    resolve_anchor, resolve_anchor_with, Anchor, EdgePoint, NodeMatch,
};
pub use config::{AnchorConfig, DamageConfig, EngineConfig, SearchConfig};
pub use damage::{
    apply_damage, apply_damage_circle, blocked_edge_count, is_damaged, reset_damage,
    simulate_disaster, simulate_scattered_damage, simulate_scattered_damage_with, DamageEvent,
};
pub use error::{Error, Result};
pub use geo_math::{haversine_m, planar_distance, GeoPoint, EARTH_RADIUS_M, METERS_PER_DEGREE};
pub use graph::{EdgeKey, EdgeRecord, NodeId, RoadGraph, RoadNetwork};
pub use network::load_network;
pub use output::{RouteRenderMode, RouteStep, RouteSummary, WalkingLegs};
pub use path::{astar_search, dijkstra_search, heuristic_distance, RouteResult, SearchOptions};
pub use routing::{
    compare_algorithms, find_route, plan_route, AlgorithmComparison, RouteAlgorithm,
    RouteRequest,
};
pub use session::{EmergencySession, TripPlan};
pub use spatial::NodeIndex;
pub use weight::resolve_weight;

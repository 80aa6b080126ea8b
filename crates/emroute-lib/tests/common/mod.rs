//! Common test utilities and fixture helpers.
//!
//! Shared road networks for integration tests: the downtown grid fixture on
//! disk plus small programmatic graphs.

use std::path::PathBuf;

use emroute_lib::{
    haversine_m, load_network, EdgeRecord, GeoPoint, NodeId, RoadGraph, RoadNetwork,
};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// The 4x4 downtown grid fixture (node ids 100..=115).
#[allow(dead_code)]
pub fn downtown_grid() -> RoadNetwork {
    load_network(&fixtures_dir().join("downtown_grid.json")).expect("fixture network loads")
}

/// Node id of `(row, col)` in a grid built by [`grid`].
#[allow(dead_code)]
pub fn grid_id(cols: usize, row: usize, col: usize) -> NodeId {
    (row * cols + col) as NodeId + 1
}

/// Two-way street grid near the equator with haversine edge lengths, so the
/// planar heuristic stays admissible.
#[allow(dead_code)]
pub fn grid(rows: usize, cols: usize, spacing_deg: f64) -> RoadNetwork {
    let mut network = RoadNetwork::new();
    for row in 0..rows {
        for col in 0..cols {
            network.add_node(
                grid_id(cols, row, col),
                GeoPoint::new(row as f64 * spacing_deg, col as f64 * spacing_deg),
            );
        }
    }
    let mut connect = |a: NodeId, b: NodeId| {
        let (pa, pb) = (
            network.node_position(a).expect("node"),
            network.node_position(b).expect("node"),
        );
        network
            .add_way(a, b, EdgeRecord::new(haversine_m(pa, pb)))
            .expect("grid edge");
    };
    for row in 0..rows {
        for col in 0..cols {
            if col + 1 < cols {
                connect(grid_id(cols, row, col), grid_id(cols, row, col + 1));
            }
            if row + 1 < rows {
                connect(grid_id(cols, row, col), grid_id(cols, row + 1, col));
            }
        }
    }
    network
}

/// Square `A(1) - B(2) - C(3) - D(4) - A`, ~111 m per side.
///
/// ```text
/// D ---- C
/// |      |
/// A ---- B
/// ```
#[allow(dead_code)]
pub fn square() -> RoadNetwork {
    let mut network = RoadNetwork::new();
    network.add_node(1, GeoPoint::new(0.0, 0.0));
    network.add_node(2, GeoPoint::new(0.0, 0.001));
    network.add_node(3, GeoPoint::new(0.001, 0.001));
    network.add_node(4, GeoPoint::new(0.001, 0.0));
    for (a, b) in [(1, 2), (2, 3), (3, 4), (4, 1)] {
        network
            .add_way(a, b, EdgeRecord::new(111.2))
            .expect("square edge");
    }
    network
}

//! Loading road networks from node-link JSON files.
//!
//! The file format mirrors what a map-data export produces once geometries
//! have been attached:
//!
//! ```json
//! {
//!   "nodes": [{ "id": 1, "lat": 41.0, "lon": 29.0 }],
//!   "edges": [{ "source": 1, "target": 2, "length": 84.2,
//!               "geometry": [[41.0, 29.0], [41.0007, 29.0004]] }]
//! }
//! ```
//!
//! `key`, `weight`, `blocked`, and `geometry` are optional. Edges are
//! directed; two-way streets list both directions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geo_math::GeoPoint;
use crate::graph::{EdgeKey, EdgeRecord, NodeId, RoadGraph, RoadNetwork};

#[derive(Debug, Deserialize)]
struct NetworkFile {
    nodes: Vec<NodeRow>,
    #[serde(default)]
    edges: Vec<EdgeRow>,
}

#[derive(Debug, Deserialize)]
struct NodeRow {
    id: NodeId,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct EdgeRow {
    source: NodeId,
    target: NodeId,
    key: Option<u32>,
    length: Option<f64>,
    weight: Option<f64>,
    #[serde(default)]
    blocked: bool,
    geometry: Option<Vec<GeoPoint>>,
}

impl EdgeRow {
    fn into_record(self) -> EdgeRecord {
        let mut record = EdgeRecord::unmeasured().with_blocked(self.blocked);
        record.length = self.length;
        record.weight = self.weight;
        record.geometry = self.geometry;
        record
    }
}

/// Load a road network from a JSON file on disk.
pub fn load_network(path: &Path) -> Result<RoadNetwork> {
    debug!(path = %path.display(), "loading road network");
    let contents = fs::read_to_string(path)?;
    let network = RoadNetwork::from_json_str(&contents)?;
    info!(
        path = %path.display(),
        nodes = network.node_count(),
        edges = network.edge_count(),
        "loaded road network"
    );
    Ok(network)
}

impl RoadNetwork {
    /// Parse and validate a node-link JSON document.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let file: NetworkFile = serde_json::from_str(contents)?;
        let mut network = RoadNetwork::new();

        for node in file.nodes {
            let position = GeoPoint::new(node.lat, node.lon);
            if !position.is_finite() {
                return Err(Error::invalid_network(format!(
                    "node {} has a non-finite coordinate",
                    node.id
                )));
            }
            network.add_node(node.id, position);
        }

        for row in file.edges {
            for value in [row.length, row.weight].into_iter().flatten() {
                if value.is_nan() || value < 0.0 {
                    return Err(Error::invalid_network(format!(
                        "edge {}->{} has an invalid cost {value}",
                        row.source, row.target
                    )));
                }
            }
            match row.key {
                Some(key) => {
                    let edge_key = EdgeKey::new(row.source, row.target, key);
                    network.insert_edge(edge_key, row.into_record())?;
                }
                None => {
                    let (source, target) = (row.source, row.target);
                    network.add_edge(source, target, row.into_record())?;
                }
            }
        }

        Ok(network)
    }
}

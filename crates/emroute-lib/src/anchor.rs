//! Resolving raw map coordinates to routing anchors.
//!
//! A click rarely lands on a node. [`nearest_edge_point`] projects it onto
//! the closest road instead and picks the edge endpoint nearest to that
//! projection, which keeps the short walk to the road separate from the
//! driven part of the route.

use geo::{Closest, ClosestPoint, Coord, LineString};
use serde::Serialize;
use tracing::debug;

use crate::config::AnchorConfig;
use crate::error::{Error, Result};
use crate::geo_math::{haversine_m, GeoPoint};
use crate::graph::{edge_polyline, EdgeKey, NodeId, RoadGraph};
use crate::spatial::NodeIndex;

/// Node snapped from a query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeMatch {
    pub node: NodeId,
    pub distance_m: f64,
}

/// Projection of a query point onto its nearest edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgePoint {
    pub edge: EdgeKey,
    /// Closest point on the edge's polyline.
    pub projected: GeoPoint,
    /// Edge endpoint closest to `projected`.
    pub node: NodeId,
    /// Great-circle distance from the query point to `projected`.
    pub distance_m: f64,
}

/// Route endpoint derived from a raw coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anchor {
    pub click: GeoPoint,
    pub projected: GeoPoint,
    pub node: NodeId,
    pub edge: EdgeKey,
}

impl Anchor {
    /// Walking leg: click to road, then along the road to the anchor node.
    pub fn walking_distance<G: RoadGraph>(&self, graph: &G) -> f64 {
        let to_road = haversine_m(self.click, self.projected);
        let along_road = graph
            .node_position(self.node)
            .map(|node| haversine_m(self.projected, node))
            .unwrap_or(0.0);
        to_road + along_road
    }
}

/// Closest node by linear scan, rejected when farther than `max_distance`.
pub fn nearest_node<G: RoadGraph>(
    graph: &G,
    lat: f64,
    lon: f64,
    max_distance: f64,
) -> Result<NodeMatch> {
    let query = GeoPoint::new(lat, lon);
    let best = graph
        .node_ids()
        .filter_map(|id| graph.node_position(id).map(|p| (id, haversine_m(query, p))))
        .min_by(|a, b| a.1.total_cmp(&b.1));
    accept_node(best, max_distance)
}

/// Closest node using a prebuilt [`NodeIndex`]; same rejection rule as
/// [`nearest_node`].
pub fn nearest_node_indexed(
    index: &NodeIndex,
    lat: f64,
    lon: f64,
    max_distance: f64,
) -> Result<NodeMatch> {
    accept_node(index.nearest(GeoPoint::new(lat, lon)), max_distance)
}

fn accept_node(best: Option<(NodeId, f64)>, max_distance: f64) -> Result<NodeMatch> {
    let Some((node, distance_m)) = best else {
        return Err(Error::NodeNotFound {
            distance: f64::INFINITY,
            max_distance,
        });
    };
    if distance_m > max_distance {
        return Err(Error::NodeNotFound {
            distance: distance_m,
            max_distance,
        });
    }
    Ok(NodeMatch { node, distance_m })
}

/// Project `point` onto a polyline in degree space.
///
/// Returns the projected point and its great-circle distance from `point`.
pub fn project_onto_polyline(point: GeoPoint, polyline: &[GeoPoint]) -> Option<(GeoPoint, f64)> {
    let first = *polyline.first()?;
    let line = LineString::new(
        polyline
            .iter()
            .map(|p| Coord { x: p.lon, y: p.lat })
            .collect(),
    );
    let projected = match line.closest_point(&point.to_geo()) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => GeoPoint::from_geo(p),
        Closest::Indeterminate => first,
    };
    Some((projected, haversine_m(point, projected)))
}

/// Nearest edge to the query point, its projection, and the endpoint closest
/// to that projection (ties go to the source node).
pub fn nearest_edge_point<G: RoadGraph>(graph: &G, lat: f64, lon: f64) -> Result<EdgePoint> {
    let query = GeoPoint::new(lat, lon);
    let mut best: Option<(EdgeKey, GeoPoint, f64)> = None;

    for key in graph.edge_keys() {
        let Some(polyline) = edge_polyline(graph, key) else {
            continue;
        };
        let Some((projected, distance)) = project_onto_polyline(query, &polyline) else {
            continue;
        };
        if best.map_or(true, |(_, _, current)| distance < current) {
            best = Some((key, projected, distance));
        }
    }

    let Some((edge, projected, distance_m)) = best else {
        return Err(Error::edge_not_found("the road network has no edges"));
    };

    let (Some(source), Some(target)) = (
        graph.node_position(edge.source),
        graph.node_position(edge.target),
    ) else {
        return Err(Error::edge_not_found(format!(
            "edge {edge} has an endpoint without coordinates"
        )));
    };
    let node = if haversine_m(projected, source) <= haversine_m(projected, target) {
        edge.source
    } else {
        edge.target
    };

    Ok(EdgePoint {
        edge,
        projected,
        node,
        distance_m,
    })
}

/// Resolve a click to an anchor with the default limits.
pub fn resolve_anchor<G: RoadGraph>(graph: &G, lat: f64, lon: f64) -> Result<Anchor> {
    resolve_anchor_with(graph, GeoPoint::new(lat, lon), &AnchorConfig::default())
}

/// Resolve a click to an anchor, rejecting points too far from any road.
pub fn resolve_anchor_with<G: RoadGraph>(
    graph: &G,
    click: GeoPoint,
    config: &AnchorConfig,
) -> Result<Anchor> {
    let hit = nearest_edge_point(graph, click.lat, click.lon)?;
    if let Some(limit) = config.max_edge_distance_m {
        if hit.distance_m > limit {
            return Err(Error::edge_not_found(format!(
                "nearest road is {:.1} m away (limit {:.1} m)",
                hit.distance_m, limit
            )));
        }
    }
    debug!(
        click = %click,
        projected = %hit.projected,
        node = hit.node,
        edge = %hit.edge,
        offset_m = hit.distance_m,
        "resolved anchor"
    );
    Ok(Anchor {
        click,
        projected: hit.projected,
        node: hit.node,
        edge: hit.edge,
    })
}

//! Blocking and restoring road edges.
//!
//! This is the only code that writes `blocked`, `weight`, or the captured
//! original costs of an edge. Callers must not run a search concurrently
//! with any function here; [`crate::EmergencySession`] enforces that
//! through `&mut self`.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::anchor::project_onto_polyline;
use crate::config::{check_distance, DamageConfig};
use crate::error::Result;
use crate::geo_math::{haversine_m, GeoPoint};
use crate::graph::{EdgeKey, RoadGraph};

/// One damage circle and the edges it blocked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageEvent {
    pub center: GeoPoint,
    pub radius_m: f64,
    pub blocked: Vec<EdgeKey>,
}

/// Distance from `center` to an edge: to the nearest point of its geometry
/// when it has one, else to the midpoint of its endpoints.
fn distance_to_edge<G: RoadGraph>(graph: &G, key: EdgeKey, center: GeoPoint) -> Option<f64> {
    let record = graph.edge(key)?;
    match record.geometry.as_deref() {
        Some(geometry) if geometry.len() >= 2 => {
            project_onto_polyline(center, geometry).map(|(_, distance)| distance)
        }
        _ => {
            let source = graph.node_position(key.source)?;
            let target = graph.node_position(key.target)?;
            Some(haversine_m(center, source.midpoint(&target)))
        }
    }
}

/// Block every edge within `radius_m` of `center`, plus its reverse
/// direction. Returns the affected edge keys in ascending order.
pub fn apply_damage<G: RoadGraph>(
    graph: &mut G,
    center: GeoPoint,
    radius_m: f64,
) -> Result<Vec<EdgeKey>> {
    check_distance("damage radius", radius_m)?;

    let mut affected = BTreeSet::new();
    for key in graph.edge_keys() {
        let Some(distance) = distance_to_edge(graph, key, center) else {
            continue;
        };
        if distance <= radius_m {
            affected.insert(key);
            let reverse = key.reversed();
            if graph.edge(reverse).is_some() {
                affected.insert(reverse);
            }
        }
    }

    let mut newly_blocked = 0usize;
    for key in &affected {
        if let Some(record) = graph.edge_mut(*key) {
            if record.block() {
                newly_blocked += 1;
            }
        }
    }

    info!(
        center = %center,
        radius_m,
        affected = affected.len(),
        newly_blocked,
        "applied damage"
    );
    Ok(affected.into_iter().collect())
}

/// Convenience wrapper taking raw coordinates.
pub fn apply_damage_circle<G: RoadGraph>(
    graph: &mut G,
    lat: f64,
    lon: f64,
    radius_m: f64,
) -> Result<Vec<EdgeKey>> {
    apply_damage(graph, GeoPoint::new(lat, lon), radius_m)
}

/// Clear all damage and restore captured costs. Returns the number of edges
/// that were blocked before the reset.
pub fn reset_damage<G: RoadGraph>(graph: &mut G) -> usize {
    let keys: Vec<EdgeKey> = graph.edge_keys().collect();
    let mut cleared = 0usize;
    for key in keys {
        if let Some(record) = graph.edge_mut(key) {
            if record.blocked {
                cleared += 1;
            }
            record.restore();
        }
    }
    info!(cleared, "reset damage");
    cleared
}

/// Number of edges currently blocked.
pub fn blocked_edge_count<G: RoadGraph>(graph: &G) -> usize {
    graph
        .edge_keys()
        .filter(|key| graph.edge(*key).is_some_and(|record| record.blocked))
        .count()
}

/// Whether any edge is blocked.
pub fn is_damaged<G: RoadGraph>(graph: &G) -> bool {
    blocked_edge_count(graph) > 0
}

/// Point halfway along a polyline, measured in degree space.
fn polyline_midpoint(polyline: &[GeoPoint]) -> Option<GeoPoint> {
    let segment = |a: &GeoPoint, b: &GeoPoint| (b.lat - a.lat).hypot(b.lon - a.lon);
    let total: f64 = polyline.windows(2).map(|w| segment(&w[0], &w[1])).sum();
    let mut remaining = total / 2.0;
    for pair in polyline.windows(2) {
        let length = segment(&pair[0], &pair[1]);
        if length > 0.0 && remaining <= length {
            let t = remaining / length;
            return Some(GeoPoint::new(
                pair[0].lat + (pair[1].lat - pair[0].lat) * t,
                pair[0].lon + (pair[1].lon - pair[0].lon) * t,
            ));
        }
        remaining -= length;
    }
    polyline.first().copied()
}

fn edge_midpoint<G: RoadGraph>(graph: &G, key: EdgeKey) -> Option<GeoPoint> {
    let record = graph.edge(key)?;
    match record.geometry.as_deref() {
        Some(geometry) if geometry.len() >= 2 => polyline_midpoint(geometry),
        _ => {
            let source = graph.node_position(key.source)?;
            let target = graph.node_position(key.target)?;
            Some(source.midpoint(&target))
        }
    }
}

/// Scatter small debris pockets with the default radius range.
pub fn simulate_scattered_damage<G: RoadGraph, R: Rng + ?Sized>(
    graph: &mut G,
    count: usize,
    rng: &mut R,
) -> Result<Vec<DamageEvent>> {
    simulate_scattered_damage_with(graph, count, rng, &DamageConfig::default())
}

/// Pick `count` random edges (all of them if fewer exist) and damage a circle
/// around each edge's midpoint with a radius drawn from the configured range.
pub fn simulate_scattered_damage_with<G: RoadGraph, R: Rng + ?Sized>(
    graph: &mut G,
    count: usize,
    rng: &mut R,
    config: &DamageConfig,
) -> Result<Vec<DamageEvent>> {
    let (min, max) = (config.scatter_radius_min_m, config.scatter_radius_max_m);
    check_distance("damage.scatter_radius_min_m", min)?;
    check_distance("damage.scatter_radius_max_m", max)?;

    let keys: Vec<EdgeKey> = graph.edge_keys().collect();
    let chosen: Vec<EdgeKey> = keys
        .choose_multiple(rng, count.min(keys.len()))
        .copied()
        .collect();

    let mut events = Vec::with_capacity(chosen.len());
    for key in chosen {
        let Some(center) = edge_midpoint(graph, key) else {
            debug!(edge = %key, "skipping edge without a resolvable midpoint");
            continue;
        };
        let radius_m = if min < max {
            rng.gen_range(min..=max)
        } else {
            min
        };
        let blocked = apply_damage(graph, center, radius_m)?;
        events.push(DamageEvent {
            center,
            radius_m,
            blocked,
        });
    }

    info!(
        requested = count,
        events = events.len(),
        blocked = blocked_edge_count(graph),
        "simulated scattered damage"
    );
    Ok(events)
}

/// Seeded disaster simulation; the same seed on the same graph reproduces
/// the same events.
pub fn simulate_disaster<G: RoadGraph>(
    graph: &mut G,
    count: usize,
    seed: u64,
) -> Result<Vec<DamageEvent>> {
    let mut rng = StdRng::seed_from_u64(seed);
    simulate_scattered_damage(graph, count, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::graph::{EdgeRecord, RoadNetwork};

    /// Two parallel east-west streets ~111 m apart.
    fn two_streets() -> RoadNetwork {
        let mut network = RoadNetwork::new();
        network.add_node(1, GeoPoint::new(0.0, 0.0));
        network.add_node(2, GeoPoint::new(0.0, 0.002));
        network.add_node(3, GeoPoint::new(0.001, 0.0));
        network.add_node(4, GeoPoint::new(0.001, 0.002));
        network.add_way(1, 2, EdgeRecord::new(222.0)).unwrap();
        network.add_way(3, 4, EdgeRecord::new(222.0)).unwrap();
        network
    }

    #[test]
    fn damage_blocks_both_directions_inside_radius() {
        let mut network = two_streets();
        let affected = apply_damage(&mut network, GeoPoint::new(0.0, 0.001), 20.0).unwrap();
        assert_eq!(affected, vec![EdgeKey::new(1, 2, 0), EdgeKey::new(2, 1, 0)]);
        assert!(network.edge(EdgeKey::new(1, 2, 0)).unwrap().blocked);
        assert!(!network.edge(EdgeKey::new(3, 4, 0)).unwrap().blocked);
        assert_eq!(blocked_edge_count(&network), 2);
    }

    #[test]
    fn one_way_reverse_is_not_invented() {
        let mut network = RoadNetwork::new();
        network.add_node(1, GeoPoint::new(0.0, 0.0));
        network.add_node(2, GeoPoint::new(0.0, 0.001));
        network.add_edge(1, 2, EdgeRecord::new(111.0)).unwrap();
        let affected = apply_damage(&mut network, GeoPoint::new(0.0, 0.0005), 5.0).unwrap();
        assert_eq!(affected, vec![EdgeKey::new(1, 2, 0)]);
        assert_eq!(network.edge_count(), 1);
    }

    #[test]
    fn straight_edges_use_midpoint_distance() {
        let mut network = two_streets();
        // Near node 1 but ~111 m from the street midpoint.
        let affected = apply_damage(&mut network, GeoPoint::new(0.0, 0.0), 50.0).unwrap();
        assert!(affected.is_empty());
    }

    #[test]
    fn negative_radius_is_rejected() {
        let mut network = two_streets();
        let err = apply_damage(&mut network, GeoPoint::new(0.0, 0.0), -1.0).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn reset_reports_cleared_edges() {
        let mut network = two_streets();
        apply_damage(&mut network, GeoPoint::new(0.0, 0.001), 20.0).unwrap();
        assert!(is_damaged(&network));
        assert_eq!(reset_damage(&mut network), 2);
        assert!(!is_damaged(&network));
        assert_eq!(reset_damage(&mut network), 0);
    }

    #[test]
    fn polyline_midpoint_walks_half_the_length() {
        let midpoint = polyline_midpoint(&[
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.003, 0.001),
        ])
        .unwrap();
        assert!((midpoint.lat - 0.001).abs() < 1e-12);
        assert!((midpoint.lon - 0.001).abs() < 1e-12);
    }

    #[test]
    fn scatter_radius_stays_in_range() {
        let mut network = two_streets();
        let events = simulate_disaster(&mut network, 10, 7).unwrap();
        assert_eq!(events.len(), network.edge_count());
        for event in &events {
            assert!((15.0..=20.0).contains(&event.radius_m));
            assert!(!event.blocked.is_empty());
        }
    }
}

//! Stateful routing session over one road network.
//!
//! [`EmergencySession`] is the single writer for damage state: anything that
//! mutates edges takes `&mut self`, so a search can never observe a
//! half-applied damage event.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::anchor::{nearest_node_indexed, resolve_anchor_with, Anchor, NodeMatch};
use crate::config::EngineConfig;
use crate::damage::{self, DamageEvent};
use crate::error::{Error, Result};
use crate::geo_math::GeoPoint;
use crate::graph::{RoadGraph, RoadNetwork};
use crate::network::load_network;
use crate::path::{RouteResult, SearchOptions};
use crate::routing::{compare_algorithms, plan_route, AlgorithmComparison, RouteAlgorithm, RouteRequest};
use crate::spatial::NodeIndex;

/// Result of planning a trip between two raw coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    pub origin: Anchor,
    pub destination: Anchor,
    /// Walk from the origin click to its anchor node.
    pub walk_start_m: f64,
    /// Walk from the destination anchor node to the destination click.
    pub walk_end_m: f64,
    /// Route under the current damage.
    pub route: RouteResult,
    /// Route ignoring damage; only computed while damage is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<RouteResult>,
}

impl TripPlan {
    /// Walking start + driven cost + walking end.
    pub fn total_distance(&self) -> f64 {
        self.walk_start_m + self.route.total_cost + self.walk_end_m
    }

    /// Extra driven meters caused by damage, when a baseline exists and both
    /// routes reached the destination.
    pub fn detour_m(&self) -> Option<f64> {
        let baseline = self.baseline.as_ref()?;
        (baseline.success && self.route.success)
            .then(|| self.route.total_cost - baseline.total_cost)
    }
}

/// Routing session: owns the network, its node index, the engine config, and
/// the damage applied so far.
#[derive(Debug)]
pub struct EmergencySession<G: RoadGraph = RoadNetwork> {
    config: EngineConfig,
    network: Option<G>,
    index: Option<NodeIndex>,
    events: Vec<DamageEvent>,
}

impl<G: RoadGraph> Default for EmergencySession<G> {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            network: None,
            index: None,
            events: Vec::new(),
        }
    }
}

impl<G: RoadGraph> EmergencySession<G> {
    /// Empty session with a validated config.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Install a network, replacing any previous one and its damage log.
    pub fn load(&mut self, network: G) -> Result<()> {
        if network.node_count() == 0 {
            return Err(Error::invalid_network("network has no nodes"));
        }
        let index = NodeIndex::build(&network);
        info!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "session network loaded"
        );
        self.network = Some(network);
        self.index = Some(index);
        self.events.clear();
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.network.is_some()
    }

    pub fn network(&self) -> Result<&G> {
        self.network.as_ref().ok_or(Error::GraphUnavailable)
    }

    fn network_mut(&mut self) -> Result<&mut G> {
        self.network.as_mut().ok_or(Error::GraphUnavailable)
    }

    /// Damage events applied since load or the last reset.
    pub fn damage_events(&self) -> Result<&[DamageEvent]> {
        self.network()?;
        Ok(&self.events)
    }

    pub fn damage_active(&self) -> bool {
        !self.events.is_empty()
    }

    /// Block edges around `center`. `radius_m` defaults to the configured
    /// radius.
    pub fn apply_damage_at(&mut self, center: GeoPoint, radius_m: Option<f64>) -> Result<DamageEvent> {
        let radius_m = radius_m.unwrap_or(self.config.damage.default_radius_m);
        let blocked = damage::apply_damage(self.network_mut()?, center, radius_m)?;
        let event = DamageEvent {
            center,
            radius_m,
            blocked,
        };
        self.events.push(event.clone());
        Ok(event)
    }

    /// Seeded scatter of `count` debris pockets using the configured radius
    /// range. Returns the new events.
    pub fn simulate_disaster(&mut self, count: usize, seed: u64) -> Result<&[DamageEvent]> {
        let damage_config = self.config.damage;
        let mut rng = StdRng::seed_from_u64(seed);
        let events =
            damage::simulate_scattered_damage_with(self.network_mut()?, count, &mut rng, &damage_config)?;
        let first_new = self.events.len();
        self.events.extend(events);
        Ok(&self.events[first_new..])
    }

    /// Restore every edge and forget the damage log.
    pub fn reset_damage(&mut self) -> Result<usize> {
        let cleared = damage::reset_damage(self.network_mut()?);
        self.events.clear();
        Ok(cleared)
    }

    /// Nearest node within the configured snap distance.
    pub fn nearest_node(&self, point: GeoPoint) -> Result<NodeMatch> {
        let index = self.index.as_ref().ok_or(Error::GraphUnavailable)?;
        nearest_node_indexed(
            index,
            point.lat,
            point.lon,
            self.config.anchor.max_node_distance_m,
        )
    }

    /// Resolve a click to its routing anchor.
    pub fn resolve(&self, point: GeoPoint) -> Result<Anchor> {
        resolve_anchor_with(self.network()?, point, &self.config.anchor)
    }

    fn search_options(&self, ignore_damage: bool) -> SearchOptions {
        SearchOptions::from_config(&self.config.search, ignore_damage)
    }

    /// Plan a trip between two clicks.
    ///
    /// Takes `&mut self` because a session without recorded damage first
    /// clears any blocked edges left on the network.
    pub fn plan_trip(&mut self, from: GeoPoint, to: GeoPoint, algorithm: RouteAlgorithm) -> Result<TripPlan> {
        let damage_active = self.damage_active();
        if !damage_active {
            let stale = damage::reset_damage(self.network_mut()?);
            if stale > 0 {
                warn!(stale, "cleared blocked edges not recorded by this session");
            }
        }

        let origin = self.resolve(from)?;
        let destination = self.resolve(to)?;
        let network = self.network()?;

        let mut request = RouteRequest::new(origin.node, destination.node, algorithm);
        request.options = self.search_options(false);
        let route = plan_route(network, &request)?;

        let baseline = if damage_active {
            request.options.ignore_damage = true;
            Some(plan_route(network, &request)?)
        } else {
            None
        };

        let plan = TripPlan {
            walk_start_m: origin.walking_distance(network),
            walk_end_m: destination.walking_distance(network),
            origin,
            destination,
            route,
            baseline,
        };
        debug!(
            algorithm = %algorithm,
            success = plan.route.success,
            total_m = plan.total_distance(),
            "planned trip"
        );
        Ok(plan)
    }

    /// Run both algorithms between two clicks under the current damage.
    pub fn compare(&self, from: GeoPoint, to: GeoPoint) -> Result<AlgorithmComparison> {
        let origin = self.resolve(from)?;
        let destination = self.resolve(to)?;
        compare_algorithms(
            self.network()?,
            origin.node,
            destination.node,
            &self.search_options(false),
        )
    }
}

impl EmergencySession<RoadNetwork> {
    /// Load a JSON node-link file into the session.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let network = load_network(path)?;
        self.load(network)
    }
}

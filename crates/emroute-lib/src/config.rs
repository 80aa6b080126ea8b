//! Tunable parameters for snapping, damage, and search.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo_math::METERS_PER_DEGREE;

/// Limits applied when resolving a raw coordinate to the network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// Maximum distance between a query point and the snapped node.
    pub max_node_distance_m: f64,
    /// Maximum distance between a query point and its projection onto the
    /// nearest edge. `None` accepts any distance.
    pub max_edge_distance_m: Option<f64>,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            max_node_distance_m: 100.0,
            max_edge_distance_m: Some(250.0),
        }
    }
}

/// Damage circle sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    /// Radius used for a single manually placed damage circle.
    pub default_radius_m: f64,
    pub scatter_radius_min_m: f64,
    pub scatter_radius_max_m: f64,
    /// Number of debris pockets a simulated disaster scatters.
    pub scatter_count: usize,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            default_radius_m: 50.0,
            scatter_radius_min_m: 15.0,
            scatter_radius_max_m: 20.0,
            scatter_count: 10,
        }
    }
}

/// Search heuristics and progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Meters per degree used to scale the planar A* heuristic.
    pub heuristic_scale: f64,
    /// Emit a trace event every this many settled nodes. Zero disables it.
    pub progress_interval: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            heuristic_scale: METERS_PER_DEGREE,
            progress_interval: 1000,
        }
    }
}

/// Engine-wide configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub anchor: AnchorConfig,
    pub damage: DamageConfig,
    pub search: SearchConfig,
}

impl EngineConfig {
    /// Load a JSON configuration file. Missing fields keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_distance("anchor.max_node_distance_m", self.anchor.max_node_distance_m)?;
        if let Some(limit) = self.anchor.max_edge_distance_m {
            check_distance("anchor.max_edge_distance_m", limit)?;
        }
        check_distance("damage.default_radius_m", self.damage.default_radius_m)?;
        check_distance("damage.scatter_radius_min_m", self.damage.scatter_radius_min_m)?;
        check_distance("damage.scatter_radius_max_m", self.damage.scatter_radius_max_m)?;
        if self.damage.scatter_radius_min_m > self.damage.scatter_radius_max_m {
            return Err(Error::invalid_config(format!(
                "damage scatter range is inverted ({} > {})",
                self.damage.scatter_radius_min_m, self.damage.scatter_radius_max_m
            )));
        }
        if !(self.search.heuristic_scale.is_finite() && self.search.heuristic_scale > 0.0) {
            return Err(Error::invalid_config(format!(
                "search.heuristic_scale must be positive, got {}",
                self.search.heuristic_scale
            )));
        }
        Ok(())
    }
}

pub(crate) fn check_distance(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_config(format!(
            "{name} must be a finite non-negative distance, got {value}"
        )))
    }
}

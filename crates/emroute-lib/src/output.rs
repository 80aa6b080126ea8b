use std::fmt::Write;

use serde::Serialize;

use crate::error::Result;
use crate::geo_math::GeoPoint;
use crate::graph::{NodeId, RoadGraph};
use crate::path::RouteResult;
use crate::routing::RouteAlgorithm;
use crate::session::TripPlan;

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    Json,
}

/// Node visited along a route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub node: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPoint>,
}

/// Walking legs attached to a summary built from a [`TripPlan`].
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct WalkingLegs {
    pub start_m: f64,
    pub end_m: f64,
}

/// Structured representation of a route that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub algorithm: RouteAlgorithm,
    pub success: bool,
    pub hops: usize,
    /// Driven cost in meters; `None` when no route exists.
    pub cost_m: Option<f64>,
    pub visited_count: usize,
    pub max_frontier: usize,
    pub elapsed_ms: f64,
    pub steps: Vec<RouteStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walking: Option<WalkingLegs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_distance_m: Option<f64>,
    /// Cost of the same trip ignoring damage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_cost_m: Option<f64>,
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl RouteSummary {
    /// Summarise a bare search result, attaching node coordinates.
    pub fn from_result<G: RoadGraph>(graph: &G, result: &RouteResult) -> Self {
        let steps = result
            .path
            .iter()
            .enumerate()
            .map(|(index, node)| RouteStep {
                index,
                node: *node,
                position: graph.node_position(*node),
            })
            .collect();

        Self {
            algorithm: result.algorithm,
            success: result.success,
            hops: result.hop_count(),
            cost_m: finite(result.total_cost),
            visited_count: result.visited_count,
            max_frontier: result.max_frontier,
            elapsed_ms: result.elapsed.as_secs_f64() * 1000.0,
            steps,
            walking: None,
            total_distance_m: None,
            baseline_cost_m: None,
        }
    }

    /// Summarise a trip. With `ignore_damage` the baseline route (if any) is
    /// the one reported.
    pub fn from_trip<G: RoadGraph>(graph: &G, plan: &TripPlan, ignore_damage: bool) -> Self {
        let (shown, baseline) = match (&plan.baseline, ignore_damage) {
            (Some(baseline), true) => (baseline, None),
            (baseline, _) => (&plan.route, baseline.as_ref()),
        };
        let mut summary = Self::from_result(graph, shown);
        summary.walking = Some(WalkingLegs {
            start_m: plan.walk_start_m,
            end_m: plan.walk_end_m,
        });
        summary.total_distance_m =
            finite(plan.walk_start_m + shown.total_cost + plan.walk_end_m);
        summary.baseline_cost_m = baseline.and_then(|route| finite(route.total_cost));
        summary
    }

    /// Render the summary using the requested mode.
    pub fn render(&self, mode: RouteRenderMode) -> Result<String> {
        match mode {
            RouteRenderMode::PlainText => Ok(self.render_plain()),
            RouteRenderMode::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        if self.steps.is_empty() {
            let _ = writeln!(
                buffer,
                "no route ({} settled {} nodes)",
                self.algorithm, self.visited_count
            );
            return buffer;
        }

        let status = if self.success { "reached" } else { "partial" };
        let _ = writeln!(
            buffer,
            "Route {status}: {} hops, {:.1} m (algorithm: {}, settled: {}, peak frontier: {})",
            self.hops,
            self.cost_m.unwrap_or(f64::INFINITY),
            self.algorithm,
            self.visited_count,
            self.max_frontier
        );
        if let Some(walking) = self.walking {
            let _ = writeln!(
                buffer,
                "Walking: {:.1} m to start, {:.1} m from end",
                walking.start_m, walking.end_m
            );
        }
        if let Some(total) = self.total_distance_m {
            let _ = writeln!(buffer, "Total distance: {total:.1} m");
        }
        if let Some(baseline) = self.baseline_cost_m {
            let _ = writeln!(buffer, "Undamaged route: {baseline:.1} m");
        }
        for step in &self.steps {
            match step.position {
                Some(position) => {
                    let _ = writeln!(buffer, "{:>3}: {} ({position})", step.index, step.node);
                }
                None => {
                    let _ = writeln!(buffer, "{:>3}: {}", step.index, step.node);
                }
            }
        }
        buffer
    }
}

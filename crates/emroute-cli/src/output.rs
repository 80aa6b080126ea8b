//! Output formatting for command results.
//!
//! Text output is meant for people; JSON output is a single pretty-printed
//! document on stdout.

use std::fmt::Write as _;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use emroute_lib::{AlgorithmComparison, Anchor, DamageEvent, NodeMatch, RouteResult};

/// Supported stdout formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Write `value` as pretty JSON followed by a newline.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// One-line damage status, or `None` when nothing was damaged.
pub fn damage_status(events: &[DamageEvent]) -> Option<String> {
    if events.is_empty() {
        return None;
    }
    let blocked: usize = events.iter().map(|event| event.blocked.len()).sum();
    Some(format!(
        "Damage: {} event(s), {} edge block(s)",
        events.len(),
        blocked
    ))
}

/// Table of damage events.
pub fn format_events(events: &[DamageEvent]) -> String {
    let mut buffer = String::new();
    if events.is_empty() {
        let _ = writeln!(buffer, "No damage applied.");
        return buffer;
    }
    let _ = writeln!(buffer, "{:>3}  {:<24} {:>9}  {:>7}", "#", "center", "radius_m", "blocked");
    for (index, event) in events.iter().enumerate() {
        let _ = writeln!(
            buffer,
            "{:>3}  {:<24} {:>9.1}  {:>7}",
            index + 1,
            event.center.to_string(),
            event.radius_m,
            event.blocked.len()
        );
    }
    if let Some(status) = damage_status(events) {
        let _ = writeln!(buffer, "{status}");
    }
    buffer
}

fn format_cost(cost: f64) -> String {
    if cost.is_finite() {
        format!("{cost:.1}")
    } else {
        "-".to_string()
    }
}

fn comparison_row(buffer: &mut String, result: &RouteResult) {
    let _ = writeln!(
        buffer,
        "{:<10} {:>8} {:>14} {:>10} {:>10.2} {:>10.3} {}",
        result.algorithm.to_string(),
        result.visited_count,
        result.max_frontier,
        format_cost(result.total_cost),
        AlgorithmComparison::efficiency(result),
        result.elapsed.as_secs_f64() * 1000.0,
        if result.success { "reached" } else { "partial" }
    );
}

/// Side-by-side table for `compare`.
pub fn format_comparison(comparison: &AlgorithmComparison) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "{:<10} {:>8} {:>14} {:>10} {:>10} {:>10} status",
        "algorithm", "settled", "peak frontier", "cost_m", "m/settled", "time_ms"
    );
    comparison_row(&mut buffer, &comparison.dijkstra);
    comparison_row(&mut buffer, &comparison.a_star);
    let agreement = if comparison.costs_agree() { "yes" } else { "no" };
    let _ = writeln!(
        buffer,
        "Costs agree: {agreement}; A* settled {} fewer node(s)",
        comparison.visited_saving()
    );
    buffer
}

/// JSON shape for `compare`.
#[derive(Debug, Serialize)]
pub struct ComparisonReport<'a> {
    #[serde(flatten)]
    pub comparison: &'a AlgorithmComparison,
    pub costs_agree: bool,
    pub dijkstra_efficiency: f64,
    pub a_star_efficiency: f64,
    pub damage: &'a [DamageEvent],
}

impl<'a> ComparisonReport<'a> {
    pub fn new(comparison: &'a AlgorithmComparison, damage: &'a [DamageEvent]) -> Self {
        Self {
            comparison,
            costs_agree: comparison.costs_agree(),
            dijkstra_efficiency: AlgorithmComparison::efficiency(&comparison.dijkstra),
            a_star_efficiency: AlgorithmComparison::efficiency(&comparison.a_star),
            damage,
        }
    }
}

/// Snap result printed by `snap`.
#[derive(Debug, Serialize)]
pub struct SnapReport {
    pub anchor: Anchor,
    pub walking_distance_m: f64,
    /// Nearest node within the configured snap distance, if any.
    pub nearest_node: Option<NodeMatch>,
}

impl SnapReport {
    pub fn render_text(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "Click:      {}", self.anchor.click);
        let _ = writeln!(
            buffer,
            "Projected:  {} on edge {}",
            self.anchor.projected, self.anchor.edge
        );
        let _ = writeln!(buffer, "Anchor node: {}", self.anchor.node);
        let _ = writeln!(buffer, "Walking:    {:.1} m", self.walking_distance_m);
        match self.nearest_node {
            Some(hit) => {
                let _ = writeln!(
                    buffer,
                    "Nearest node: {} ({:.1} m)",
                    hit.node, hit.distance_m
                );
            }
            None => {
                let _ = writeln!(buffer, "Nearest node: none within snap distance");
            }
        }
        buffer
    }
}

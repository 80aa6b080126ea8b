//! Route command handler for planning trips between two coordinates.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use emroute_cli::args::DamageArgs;
use emroute_cli::output::{damage_status, print_json, OutputFormat};
use emroute_lib::{
    DamageEvent, EmergencySession, GeoPoint, RouteAlgorithm, RouteRenderMode, RouteSummary,
};

/// Arguments for the route command.
#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    /// Origin as LAT,LON.
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub from: GeoPoint,

    /// Destination as LAT,LON.
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub to: GeoPoint,

    /// Search algorithm: dijkstra or a-star.
    #[arg(long, default_value_t = RouteAlgorithm::AStar)]
    pub algorithm: RouteAlgorithm,

    #[command(flatten)]
    pub damage: DamageArgs,

    /// Report the route as if no road were damaged.
    #[arg(long)]
    pub ignore_damage: bool,
}

#[derive(Serialize)]
struct RouteReport<'a> {
    route: &'a RouteSummary,
    damage: &'a [DamageEvent],
}

/// Handle the route subcommand.
pub fn handle_route_command(
    session: &mut EmergencySession,
    args: &RouteArgs,
    format: OutputFormat,
) -> Result<()> {
    args.damage
        .apply(session)
        .context("failed to apply damage")?;

    let plan = session
        .plan_trip(args.from, args.to, args.algorithm)
        .with_context(|| format!("failed to plan a trip from {} to {}", args.from, args.to))?;
    let summary = RouteSummary::from_trip(session.network()?, &plan, args.ignore_damage);
    let events = session.damage_events()?;

    match format {
        OutputFormat::Text => {
            if let Some(status) = damage_status(events) {
                println!("{status}");
            }
            print!("{}", summary.render(RouteRenderMode::PlainText)?);
        }
        OutputFormat::Json => print_json(&RouteReport {
            route: &summary,
            damage: events,
        })?,
    }
    Ok(())
}

//! Compare command handler: Dijkstra vs A* on one trip.

use anyhow::{Context, Result};
use clap::Args;

use emroute_cli::args::DamageArgs;
use emroute_cli::output::{
    damage_status, format_comparison, print_json, ComparisonReport, OutputFormat,
};
use emroute_lib::{EmergencySession, GeoPoint};

/// Arguments for the compare command.
#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Origin as LAT,LON.
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub from: GeoPoint,

    /// Destination as LAT,LON.
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub to: GeoPoint,

    #[command(flatten)]
    pub damage: DamageArgs,
}

pub fn handle_compare_command(
    session: &mut EmergencySession,
    args: &CompareArgs,
    format: OutputFormat,
) -> Result<()> {
    args.damage
        .apply(session)
        .context("failed to apply damage")?;
    let comparison = session
        .compare(args.from, args.to)
        .with_context(|| format!("failed to compare routes from {} to {}", args.from, args.to))?;
    let events = session.damage_events()?;

    match format {
        OutputFormat::Text => {
            if let Some(status) = damage_status(events) {
                println!("{status}");
            }
            print!("{}", format_comparison(&comparison));
        }
        OutputFormat::Json => print_json(&ComparisonReport::new(&comparison, events))?,
    }
    Ok(())
}

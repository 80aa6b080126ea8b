use anyhow::{Context, Result};
use clap::Args;

use emroute_cli::output::{print_json, OutputFormat, SnapReport};
use emroute_lib::{EmergencySession, GeoPoint};

/// Arguments for the snap command.
#[derive(Args, Debug, Clone)]
pub struct SnapArgs {
    /// Point to snap as LAT,LON.
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub at: GeoPoint,
}

pub fn handle_snap_command(
    session: &EmergencySession,
    args: &SnapArgs,
    format: OutputFormat,
) -> Result<()> {
    let anchor = session
        .resolve(args.at)
        .with_context(|| format!("failed to snap {} onto the road network", args.at))?;
    let report = SnapReport {
        walking_distance_m: anchor.walking_distance(session.network()?),
        nearest_node: session.nearest_node(args.at).ok(),
        anchor,
    };

    match format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

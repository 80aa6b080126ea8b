use anyhow::{Context, Result};
use clap::Args;

use emroute_cli::output::{format_events, print_json, OutputFormat};
use emroute_lib::EmergencySession;

/// Arguments for the simulate command.
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Number of debris pockets (defaults to the configured scatter count).
    #[arg(long)]
    pub count: Option<usize>,

    /// Random seed; the same seed on the same network reproduces the events.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

pub fn handle_simulate_command(
    session: &mut EmergencySession,
    args: &SimulateArgs,
    format: OutputFormat,
) -> Result<()> {
    let count = args
        .count
        .unwrap_or(session.config().damage.scatter_count);
    let events = session
        .simulate_disaster(count, args.seed)
        .context("failed to simulate damage")?;

    match format {
        OutputFormat::Text => print!("{}", format_events(events)),
        OutputFormat::Json => print_json(&events)?,
    }
    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use emroute_cli::logging::{init_logging, LogFormat, LoggingConfig};
use emroute_cli::output::OutputFormat;
use emroute_lib::{EmergencySession, EngineConfig};

mod commands;

use commands::compare::CompareArgs;
use commands::route::RouteArgs;
use commands::simulate::SimulateArgs;
use commands::snap::SnapArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Damage-aware emergency routing over road networks")]
struct Cli {
    /// Road network JSON file (node-link format).
    #[arg(long, value_name = "FILE")]
    network: PathBuf,

    /// Engine configuration JSON file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log format on stderr (overrides LOG_FORMAT).
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Output format on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a trip between two coordinates, optionally after damaging roads.
    Route(RouteArgs),
    /// Run Dijkstra and A* on the same trip and compare search effort.
    Compare(CompareArgs),
    /// Show how a coordinate snaps onto the road network.
    Snap(SnapArgs),
    /// Scatter seeded random damage and list the events.
    Simulate(SimulateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig::from_env().with_format(cli.log_format));

    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let mut session: EmergencySession = EmergencySession::with_config(config)?;
    session
        .load_path(&cli.network)
        .with_context(|| format!("failed to load road network from {}", cli.network.display()))?;

    match &cli.command {
        Command::Route(args) => commands::route::handle_route_command(&mut session, args, cli.format),
        Command::Compare(args) => {
            commands::compare::handle_compare_command(&mut session, args, cli.format)
        }
        Command::Snap(args) => commands::snap::handle_snap_command(&session, args, cli.format),
        Command::Simulate(args) => {
            commands::simulate::handle_simulate_command(&mut session, args, cli.format)
        }
    }
}

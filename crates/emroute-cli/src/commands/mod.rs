// Module exports for CLI subcommands
//
// Each module handles a specific CLI subcommand. main.rs parses arguments,
// loads the session, and dispatches to these handlers.

pub mod compare;
pub mod route;
pub mod simulate;
pub mod snap;

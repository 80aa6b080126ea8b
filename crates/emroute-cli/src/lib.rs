//! emroute CLI library.
//!
//! Argument types, logging setup, and output formatting shared by the
//! `emroute` binary's subcommands.

pub mod args;
pub mod logging;
pub mod output;

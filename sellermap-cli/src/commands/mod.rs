//! CLI subcommands.

pub mod config;
pub mod output;
pub mod sellers;
pub mod watch;

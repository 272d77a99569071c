//! SellerMap CLI - Command-line interface
//!
//! Headless driver for the SellerMap library: one-shot seller queries, a
//! stdin-driven viewport session, and configuration management.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use console::style;

use commands::config::ConfigCommands;
use commands::sellers::SellersArgs;
use commands::watch::WatchArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "sellermap")]
#[command(version, about = "Find nearby sellers from the command line", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the sellers around a point once
    Sellers {
        /// Latitude of the search center
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude of the search center
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Search radius in meters (default: covers the default map region)
        #[arg(long)]
        radius: Option<u32>,

        /// Backend base URL (overrides api.base_url)
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Run the viewport orchestrator on viewports read from stdin
    Watch {
        /// Simulated device latitude
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Simulated device longitude
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Simulate a refused location permission
        #[arg(long)]
        deny_location: bool,

        /// Debounce window in milliseconds (overrides map.debounce_ms)
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Backend base URL (overrides api.base_url)
        #[arg(long)]
        api_url: Option<String>,
    },

    /// View and modify configuration settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Sellers {
            lat,
            lon,
            radius,
            api_url,
        } => commands::sellers::run(SellersArgs {
            lat,
            lon,
            radius,
            api_url,
            verbose: cli.verbose,
        }),

        Commands::Watch {
            lat,
            lon,
            deny_location,
            debounce_ms,
            api_url,
        } => commands::watch::run(WatchArgs {
            lat,
            lon,
            deny_location,
            debounce_ms,
            api_url,
            verbose: cli.verbose,
        }),

        Commands::Config(command) => commands::config::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sellers_with_negative_longitude() {
        let cli = Cli::try_parse_from([
            "sellermap", "sellers", "--lat", "37.78", "--lon", "-122.43", "--radius", "800",
        ])
        .unwrap();

        match cli.command {
            Commands::Sellers { lat, lon, radius, .. } => {
                assert_eq!(lat, 37.78);
                assert_eq!(lon, -122.43);
                assert_eq!(radius, Some(800));
            }
            _ => panic!("expected sellers command"),
        }
    }

    #[test]
    fn test_parse_watch_flags() {
        let cli =
            Cli::try_parse_from(["sellermap", "-v", "watch", "--deny-location", "--debounce-ms", "250"])
                .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Watch {
                deny_location,
                debounce_ms,
                lat,
                ..
            } => {
                assert!(deny_location);
                assert_eq!(debounce_ms, Some(250));
                assert_eq!(lat, None);
            }
            _ => panic!("expected watch command"),
        }
    }

    #[test]
    fn test_parse_config_set() {
        let cli =
            Cli::try_parse_from(["sellermap", "config", "set", "map.debounce_ms", "500"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Set { .. })
        ));
    }
}

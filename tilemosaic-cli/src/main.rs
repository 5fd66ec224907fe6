//! TileMosaic CLI - Command-line interface
//!
//! Plans and extracts georeferenced basemap mosaics from XYZ tile sources.

mod commands;
mod error;
mod progress;

use clap::{Parser, Subcommand};
use tilemosaic::logging::{default_log_dir, default_log_file, init_logging};

use commands::common::AreaArgs;
use commands::config::ConfigCommands;
use commands::extract::ExtractArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "tilemosaic")]
#[command(version = tilemosaic::VERSION)]
#[command(about = "Extract georeferenced basemap mosaics from slippy-map tile servers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tile grid covering an area, without downloading
    Plan(AreaArgs),

    /// Download an area and write the mosaic plus its world file
    Extract(ExtractArgs),

    /// View or modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Config commands print plain values and skip the session log
    let _logging = match cli.command {
        Commands::Config { .. } => None,
        _ => Some(
            init_logging(&default_log_dir(), default_log_file())
                .map_err(|e| CliError::LoggingInit(e.to_string()))?,
        ),
    };

    match cli.command {
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Extract(args) => commands::extract::run(args),
        Commands::Config { command } => commands::config::run(command),
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
    fn test_parse_extract() {
        let cli = Cli::try_parse_from([
            "tilemosaic",
            "extract",
            "--bbox",
            "-20000,6000000,20000,5990000",
            "--zoom",
            "14",
            "--suffix",
            "@2x.jpg?key=abc",
            "--tiles-only",
            "tiles",
        ])
        .unwrap();

        match cli.command {
            Commands::Extract(args) => {
                assert_eq!(args.area.zoom, 14);
                assert_eq!(args.area.bbox.west, -20000.0);
                assert_eq!(args.suffix.as_deref(), Some("@2x.jpg?key=abc"));
                assert!(args.tiles_only.is_some());
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_zoom_out_of_range_rejected() {
        let result = Cli::try_parse_from([
            "tilemosaic",
            "plan",
            "--bbox",
            "0,1,1,0",
            "--zoom",
            "30",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from(["tilemosaic", "config", "set", "source.url", "https://t"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Set { .. }
            }
        ));
    }
}

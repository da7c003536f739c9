//! OrthoMagic CLI - Command-line interface
//!
//! Places Ortho4XP texture layers of a document directory on the texture
//! grid and exports them again as per-texture JPEGs.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::{GuidesArg, PlacementArg};
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "orthomagic")]
#[command(version, about = "Place and export Ortho4XP texture tiles", long_about = None)]
struct Cli {
    /// Config file (default: ~/.orthomagic/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resize the canvas to the texture grid and move every texture into place
    Import {
        /// Document directory, named like +33+126_17
        document: PathBuf,

        /// Draw guides along the texture grid
        #[arg(long, value_enum)]
        guides: Option<GuidesArg>,

        /// Placement formula for textures above the base zoom
        #[arg(long, value_enum)]
        placement: Option<PlacementArg>,
    },

    /// Export every texture as a JPEG below orthomagic4ps/
    Export {
        /// Document directory, named like +33+126_17
        document: PathBuf,

        /// Write orthomagic4ps/ below this directory instead of next to the document
        #[arg(long)]
        output_root: Option<PathBuf>,
    },

    /// Write a config file with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Init { force } => commands::init::run(cli.config.as_deref(), force),
        Commands::Import {
            document,
            guides,
            placement,
        } => {
            let runner = CliRunner::new(cli.config.as_deref(), cli.verbose)?;
            commands::import::run(
                &runner,
                commands::import::ImportArgs {
                    document,
                    guides,
                    placement,
                },
            )
        }
        Commands::Export {
            document,
            output_root,
        } => {
            let runner = CliRunner::new(cli.config.as_deref(), cli.verbose)?;
            commands::export::run(
                &runner,
                commands::export::ExportArgs {
                    document,
                    output_root,
                },
            )
        }
    }
}

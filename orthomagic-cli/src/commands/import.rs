//! Import command - place texture layers on the canvas grid.

use std::path::PathBuf;

use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use orthomagic::workflow::{run_import, ImportOptions, GUIDES_TITLE};
use tracing::warn;

use super::common::{open_document, resolve_guides, resolve_placement, GuidesArg, PlacementArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the import command.
pub struct ImportArgs {
    pub document: PathBuf,
    pub guides: Option<GuidesArg>,
    pub placement: Option<PlacementArg>,
}

/// Run the import command.
pub fn run(runner: &CliRunner, args: ImportArgs) -> Result<(), CliError> {
    runner.log_startup("import");
    let config = runner.config();

    let options = ImportOptions {
        placement: resolve_placement(args.placement, config),
        guides: resolve_guides(args.guides, config),
    };

    let mut canvas = open_document(&args.document)?;
    let theme = ColorfulTheme::default();
    let mut ask = |prompt: &str| {
        Confirm::with_theme(&theme)
            .with_prompt(format!("{} {}", style(GUIDES_TITLE).cyan(), prompt))
            .default(true)
            .interact()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Guide prompt failed, not drawing guides");
                false
            })
    };

    let summary = run_import(&mut canvas, &options, &mut ask)?;

    canvas.save().map_err(|error| CliError::Save {
        path: args.document.clone(),
        error,
    })?;

    println!("{}", style("Operation finished.").green().bold());
    println!();
    println!("{}", summary);
    if summary.scaled > 0 {
        println!("Scaled Layers: {}", summary.scaled);
    }
    println!(
        "Canvas: {} x {} px",
        summary.canvas_size.0, summary.canvas_size.1
    );
    if summary.guides_drawn {
        println!("Guides drawn along the texture grid.");
    }
    Ok(())
}

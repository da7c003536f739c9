//! Export command - write every texture layer as a JPEG.

use std::path::PathBuf;

use console::style;
use orthomagic::workflow::{run_export, ExportSettings};

use super::common::{open_document, resolve_output_root};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the export command.
pub struct ExportArgs {
    pub document: PathBuf,
    pub output_root: Option<PathBuf>,
}

/// Run the export command.
pub fn run(runner: &CliRunner, args: ExportArgs) -> Result<(), CliError> {
    runner.log_startup("export");

    let settings = ExportSettings {
        output_root: resolve_output_root(args.output_root, runner.config()),
    };

    let mut canvas = open_document(&args.document)?;
    let summary = run_export(&mut canvas, &settings)?;

    println!("{}", style("Operation finished.").green().bold());
    println!();
    println!("Exported Textures: {}", summary.exported.len());
    println!("Covered by finer textures: {}", summary.skipped_occluded);
    if summary.ignored_layers > 0 {
        println!("Ignored Layers: {}", summary.ignored_layers);
    }
    if let Some(first) = summary.exported.first() {
        if let Some(dir) = first.parent().and_then(|p| p.parent()) {
            println!();
            println!("Output: {}", style(dir.display()).cyan());
        }
    }
    Ok(())
}

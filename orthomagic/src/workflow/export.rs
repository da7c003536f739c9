//! The export run: write every visible texture as its own JPEG.

use std::path::PathBuf;

use tracing::{debug, info};

use super::{ensure_dir, with_run_scope, RUN_SNAPSHOT};
use crate::canvas::{Canvas, ExportOptions};
use crate::error::{OrthoError, PreconditionError};
use crate::naming::{ortho4xp_name, parse_document_name, strip_extension};
use crate::planner::{ExportDecision, ExportPlanner};

/// Options for [`run_export`].
#[derive(Debug, Clone, Default)]
pub struct ExportSettings {
    /// Directory the `orthomagic4ps` tree is written below.
    ///
    /// Defaults to the document's own directory.
    pub output_root: Option<PathBuf>,
}

/// Outcome of an export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Written files, in processing order
    pub exported: Vec<PathBuf>,
    /// Textures left out because a finer texture overlaps them
    pub skipped_occluded: usize,
    /// Layers that are not textures
    pub ignored_layers: usize,
}

/// Export every texture layer of the document.
///
/// The document must be open, saved and free of a background layer. The
/// document is returned to its state from before the run afterwards, also
/// when the run fails halfway.
pub fn run_export<C>(
    canvas: &mut C,
    settings: &ExportSettings,
) -> Result<ExportSummary, OrthoError>
where
    C: Canvas + ?Sized,
{
    check_preconditions(canvas, settings)?;

    with_run_scope(canvas, |canvas, scope| {
        let document_name = strip_extension(canvas.document_name()).to_string();
        let cell = parse_document_name(&document_name)?;
        let root = settings
            .output_root
            .clone()
            .or_else(|| canvas.document_dir())
            .ok_or(PreconditionError::Unsaved)?;

        let layers = canvas.list_layers();
        let planner = ExportPlanner::new(cell, ortho4xp_name(&document_name));
        let groups = planner.group(&layers);
        let decisions = planner.plan(&layers);
        info!(
            document = %document_name,
            cell = %cell,
            textures = groups.tile_count(),
            root = %root.display(),
            "Starting export"
        );

        let mut summary = ExportSummary {
            ignored_layers: groups.ignored_count(),
            ..ExportSummary::default()
        };
        let options = ExportOptions::default();

        scope.take_snapshot(canvas, RUN_SNAPSHOT)?;

        for decision in decisions {
            let job = match decision {
                ExportDecision::Skip {
                    layer, occluded_by, ..
                } => {
                    debug!(
                        layer = %layer.name,
                        occluded_by = %occluded_by,
                        "Covered by finer texture, skipping"
                    );
                    summary.skipped_occluded += 1;
                    continue;
                }
                ExportDecision::Export(job) => job,
            };

            for id in &job.hide {
                canvas.set_visible(*id, false)?;
            }
            canvas.delete_all_hidden()?;
            canvas.crop_to(job.crop)?;
            if let Some(factor) = job.resize_factor {
                canvas.resize_image(factor)?;
            }

            let path = root.join(&job.relative_path);
            if let Some(dir) = path.parent() {
                ensure_dir(dir)?;
            }
            canvas.export_image(&path, &options)?;
            debug!(
                layer = %job.layer.name,
                zoom = job.zoom,
                path = %path.display(),
                "Exported texture"
            );
            summary.exported.push(path);

            scope.rollback(canvas)?;
        }

        info!(
            exported = summary.exported.len(),
            skipped = summary.skipped_occluded,
            ignored = summary.ignored_layers,
            "Export finished"
        );
        Ok(summary)
    })
}

fn check_preconditions<C: Canvas + ?Sized>(
    canvas: &C,
    settings: &ExportSettings,
) -> Result<(), PreconditionError> {
    if !canvas.has_document() {
        return Err(PreconditionError::NoDocument);
    }
    if !canvas.is_saved() || (settings.output_root.is_none() && canvas.document_dir().is_none()) {
        return Err(PreconditionError::Unsaved);
    }
    if canvas.has_background_layer() {
        return Err(PreconditionError::BackgroundLayer);
    }
    Ok(())
}

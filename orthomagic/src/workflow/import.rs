//! The import run: size the canvas and move every texture into place.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, warn};

use super::{with_run_scope, Confirm};
use crate::canvas::Canvas;
use crate::error::{OrthoError, PreconditionError};
use crate::naming::{parse_document_name, parse_layer_name, strip_extension};
use crate::planner::{ImportPlanner, PlacementMode};

/// Question asked before drawing texture guides.
pub const GUIDES_PROMPT: &str = "Draw guides?";

/// Title of the guide question dialog.
pub const GUIDES_TITLE: &str = "Magic Guides";

/// Whether to draw guides along the texture grid after import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuidePolicy {
    /// Ask through [`Confirm`].
    #[default]
    Ask,
    Always,
    Never,
}

impl GuidePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuidePolicy::Ask => "ask",
            GuidePolicy::Always => "always",
            GuidePolicy::Never => "never",
        }
    }
}

impl fmt::Display for GuidePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GuidePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ask" => Ok(GuidePolicy::Ask),
            "always" | "yes" => Ok(GuidePolicy::Always),
            "never" | "no" => Ok(GuidePolicy::Never),
            other => Err(format!(
                "unknown guide policy '{}' (expected ask, always or never)",
                other
            )),
        }
    }
}

/// Options for [`run_import`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub placement: PlacementMode,
    pub guides: GuidePolicy,
}

/// Outcome of an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Texture layers translated to a new offset
    pub moved: usize,
    /// Layers already in place, plus layers that are not textures
    pub skipped: usize,
    /// Texture layers shrunk onto the base grid
    pub scaled: usize,
    pub guides_drawn: bool,
    /// Canvas size after the run
    pub canvas_size: (u32, u32),
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Moved Layers: {}\nSkipped Layers: {}",
            self.moved, self.skipped
        )
    }
}

/// Resize the canvas to the cell's texture grid and place every texture.
///
/// Fails with a [`PreconditionError`] before touching the document when no
/// document is open or it has a background layer. Running the import twice
/// is harmless: layers already in place count as skipped and layers that
/// were already shrunk are not shrunk again.
pub fn run_import<C, F>(
    canvas: &mut C,
    options: &ImportOptions,
    confirm: &mut F,
) -> Result<ImportSummary, OrthoError>
where
    C: Canvas + ?Sized,
    F: Confirm + ?Sized,
{
    check_preconditions(canvas)?;

    with_run_scope(canvas, |canvas, _scope| {
        let document_name = strip_extension(canvas.document_name()).to_string();
        let cell = parse_document_name(&document_name)?;
        let planner = ImportPlanner::new(cell, options.placement);
        info!(
            document = %document_name,
            cell = %cell,
            placement = %options.placement,
            "Starting import"
        );

        let (width, height) = planner.canvas_size();
        canvas.resize_canvas(width, height)?;
        debug!(width, height, "Resized canvas to texture grid");

        let mut summary = ImportSummary {
            canvas_size: (width, height),
            ..ImportSummary::default()
        };

        for layer in canvas.list_layers() {
            let Some(address) = parse_layer_name(&layer.name, cell.base_zoom) else {
                debug!(layer = %layer.name, "Not a texture layer, skipping");
                summary.skipped += 1;
                continue;
            };

            let Some(placement) = planner.plan_layer(&address) else {
                warn!(layer = %layer.name, "Texture lies outside any placeable grid, skipping");
                summary.skipped += 1;
                continue;
            };
            match planner.plan_move(&placement, &layer.bounds) {
                Some((dx, dy)) => {
                    canvas.translate_layer(layer.id, dx, dy)?;
                    summary.moved += 1;
                    debug!(layer = %layer.name, dx, dy, "Moved texture");
                }
                None => {
                    summary.skipped += 1;
                    debug!(layer = %layer.name, "Texture already in place");
                }
            }

            if placement.needs_scaling(layer.bounds.width()) {
                canvas.scale_layer(layer.id, placement.scale_factor())?;
                summary.scaled += 1;
                debug!(
                    layer = %layer.name,
                    factor = placement.scale_factor(),
                    "Scaled texture onto base grid"
                );
            }
        }

        let draw_guides = match options.guides {
            GuidePolicy::Always => true,
            GuidePolicy::Never => false,
            GuidePolicy::Ask => confirm.confirm(GUIDES_PROMPT),
        };
        if draw_guides {
            canvas.clear_guides()?;
            for (orientation, position) in planner.guide_positions() {
                canvas.add_guide(orientation, position)?;
            }
            summary.guides_drawn = true;
        }

        info!(
            moved = summary.moved,
            skipped = summary.skipped,
            scaled = summary.scaled,
            guides = summary.guides_drawn,
            "Import finished"
        );
        Ok(summary)
    })
}

fn check_preconditions<C: Canvas + ?Sized>(canvas: &C) -> Result<(), PreconditionError> {
    if !canvas.has_document() {
        return Err(PreconditionError::NoDocument);
    }
    if canvas.has_background_layer() {
        return Err(PreconditionError::BackgroundLayer);
    }
    Ok(())
}

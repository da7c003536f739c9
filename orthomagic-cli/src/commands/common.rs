//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use orthomagic::canvas::MemoryCanvas;
use orthomagic::config::ConfigFile;
use orthomagic::planner::PlacementMode;
use orthomagic::workflow::GuidePolicy;

use crate::error::CliError;

/// Guide drawing selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum GuidesArg {
    /// Ask after placing the textures
    Ask,
    /// Always draw guides
    Always,
    /// Never draw guides
    Never,
}

impl From<GuidesArg> for GuidePolicy {
    fn from(arg: GuidesArg) -> Self {
        match arg {
            GuidesArg::Ask => GuidePolicy::Ask,
            GuidesArg::Always => GuidePolicy::Always,
            GuidesArg::Never => GuidePolicy::Never,
        }
    }
}

/// Placement formula selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PlacementArg {
    /// Tile step scaled with the zoom difference
    Scaled,
    /// Scaled, shifted south for two or more levels above the base zoom
    OffsetCorrected,
    /// Tile step of 16 for every zoom level
    Uniform,
}

impl From<PlacementArg> for PlacementMode {
    fn from(arg: PlacementArg) -> Self {
        match arg {
            PlacementArg::Scaled => PlacementMode::Scaled,
            PlacementArg::OffsetCorrected => PlacementMode::ScaledWithOffsetCorrection,
            PlacementArg::Uniform => PlacementMode::Uniform,
        }
    }
}

/// Resolve the guide policy; the CLI takes precedence over config.
pub fn resolve_guides(cli: Option<GuidesArg>, config: &ConfigFile) -> GuidePolicy {
    cli.map(GuidePolicy::from).unwrap_or(config.import.guides)
}

/// Resolve the placement mode; the CLI takes precedence over config.
pub fn resolve_placement(cli: Option<PlacementArg>, config: &ConfigFile) -> PlacementMode {
    cli.map(PlacementMode::from)
        .unwrap_or(config.import.placement)
}

/// Resolve the export root; the CLI takes precedence over config.
pub fn resolve_output_root(cli: Option<PathBuf>, config: &ConfigFile) -> Option<PathBuf> {
    cli.or_else(|| config.export.output_root.clone())
}

/// Open a document directory.
pub fn open_document(path: &Path) -> Result<MemoryCanvas, CliError> {
    MemoryCanvas::open(path).map_err(|error| CliError::Open {
        path: path.to_path_buf(),
        error,
    })
}

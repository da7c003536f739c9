//! OrthoMagic - Ortho4XP texture placement and export
//!
//! This library arranges Ortho4XP texture tiles on a layered canvas and
//! extracts them again. A document covers one 1°×1° WGS84 cell at a base
//! zoom level; each layer holds one 4096×4096 texture named
//! `{row}_{col}_{provider}{zoom}`.
//!
//! - [`workflow::run_import`] resizes the canvas to the cell's texture grid
//!   and moves every texture layer to its pixel offset.
//! - [`workflow::run_export`] writes every texture back out as an isolated
//!   JPEG, skipping coarse textures covered by finer ones.
//!
//! The host document is reached only through the [`canvas::Canvas`] trait.
//! [`canvas::MemoryCanvas`] is the bundled in-memory implementation.

pub mod canvas;
pub mod config;
pub mod coord;
pub mod error;
pub mod logging;
pub mod naming;
pub mod planner;
pub mod workflow;

pub use error::{OrthoError, PreconditionError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

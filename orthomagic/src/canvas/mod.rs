//! Canvas abstraction for the host document.
//!
//! Import and export never touch a concrete document model. Everything they
//! need from the host (layers, canvas geometry, guides, snapshots, image
//! export and the ruler-unit preference) goes through the [`Canvas`] trait.
//!
//! ```text
//! ┌──────────────────────┐
//! │ run_import/run_export│
//! │    &mut impl Canvas  │
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │   Canvas (trait)     │
//! └──────────┬───────────┘
//!       ┌────┴─────┐
//!       ▼          ▼
//! ┌──────────┐ ┌──────────┐
//! │ Memory   │ │  Host    │
//! │ Canvas   │ │ bindings │
//! └──────────┘ └──────────┘
//! ```

mod error;
pub mod memory;
mod types;

pub use error::CanvasError;
pub use memory::MemoryCanvas;
pub use types::{
    Bounds, ExportFormat, ExportOptions, GuideOrientation, LayerId, LayerInfo, RulerUnits,
    EXPORT_JPEG_QUALITY,
};

use std::path::{Path, PathBuf};

/// Operations the import and export runs need from a layered document.
///
/// Layer order in [`Canvas::list_layers`] is document order, topmost first.
/// All operations are synchronous and are called strictly one after another.
pub trait Canvas {
    /// Whether a document is open at all.
    fn has_document(&self) -> bool;

    /// Full document name, possibly including an extension.
    fn document_name(&self) -> &str;

    /// Directory export output is written below, if the document has one.
    fn document_dir(&self) -> Option<PathBuf>;

    /// Whether the document has no unsaved changes.
    fn is_saved(&self) -> bool;

    /// Whether the document has a flattened background layer.
    fn has_background_layer(&self) -> bool;

    /// Current ruler-unit preference.
    fn ruler_units(&self) -> RulerUnits;

    /// Change the ruler-unit preference.
    fn set_ruler_units(&mut self, units: RulerUnits);

    /// Current canvas size in pixels.
    fn canvas_size(&self) -> (u32, u32);

    /// All top-level layers in document order.
    fn list_layers(&self) -> Vec<LayerInfo>;

    /// Show or hide a layer.
    fn set_visible(&mut self, layer: LayerId, visible: bool) -> Result<(), CanvasError>;

    /// Move a layer by a pixel delta.
    fn translate_layer(&mut self, layer: LayerId, dx: i64, dy: i64) -> Result<(), CanvasError>;

    /// Scale a layer by `factor`, keeping its top-left corner fixed.
    fn scale_layer(&mut self, layer: LayerId, factor: f64) -> Result<(), CanvasError>;

    /// Delete every hidden layer in one operation.
    fn delete_all_hidden(&mut self) -> Result<(), CanvasError>;

    /// Resize the canvas without scaling content, anchored top-left.
    fn resize_canvas(&mut self, width: u32, height: u32) -> Result<(), CanvasError>;

    /// Crop the canvas to `bounds`.
    fn crop_to(&mut self, bounds: Bounds) -> Result<(), CanvasError>;

    /// Resample the whole image by `factor` along both axes.
    fn resize_image(&mut self, factor: f64) -> Result<(), CanvasError>;

    /// Remove all guides.
    fn clear_guides(&mut self) -> Result<(), CanvasError>;

    /// Add a guide at `position` pixels.
    fn add_guide(
        &mut self,
        orientation: GuideOrientation,
        position: u32,
    ) -> Result<(), CanvasError>;

    /// Write the visible canvas to `path`.
    fn export_image(&mut self, path: &Path, options: &ExportOptions) -> Result<(), CanvasError>;

    /// Record the current document state under `name`.
    fn take_snapshot(&mut self, name: &str) -> Result<(), CanvasError>;

    /// Return the document to the state recorded under `name`.
    fn restore_snapshot(&mut self, name: &str) -> Result<(), CanvasError>;

    /// Forget the snapshot recorded under `name`.
    fn delete_snapshot(&mut self, name: &str) -> Result<(), CanvasError>;
}

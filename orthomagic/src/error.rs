//! Error types for import and export runs.
//!
//! Only fatal conditions are errors. A layer that is not a texture tile, a
//! layer that is already in place, or a texture hidden under a finer one are
//! normal outcomes reported through the planners' return values.

use std::path::PathBuf;

use thiserror::Error;

use crate::canvas::CanvasError;

/// Conditions checked before a run touches the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// No document is open in the host.
    #[error("No document to work with.")]
    NoDocument,

    /// The document has a flattened background layer.
    #[error("Documents with a background layer are not supported.")]
    BackgroundLayer,

    /// The document has unsaved changes (export only).
    #[error("Please save your document first before starting the export.")]
    Unsaved,
}

/// Errors that abort an import or export run.
#[derive(Debug, Error)]
pub enum OrthoError {
    /// The document cannot be worked on.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// The document name does not decode to a geo cell.
    #[error(
        "Could not parse needed info from document name '{0}'. \
         Make sure it is named like \"+33+126_17\"."
    )]
    MalformedDocumentName(String),

    /// A canvas operation failed.
    #[error("Canvas operation failed: {0}")]
    Canvas(#[from] CanvasError),

    /// An export output directory could not be created.
    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OrthoError {
    /// Returns true if the run was rejected before any document mutation.
    pub fn is_precondition(&self) -> bool {
        matches!(self, OrthoError::Precondition(_))
    }
}

//! Errors raised by canvas implementations.

use std::path::PathBuf;

use thiserror::Error;

use super::LayerId;

/// Errors that can occur while operating on a canvas.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// No document is open.
    #[error("No document is open")]
    NoDocument,

    /// A layer id does not name a layer of the document.
    #[error("Unknown layer: {0}")]
    UnknownLayer(LayerId),

    /// No snapshot with this name exists.
    #[error("Unknown snapshot: {0}")]
    UnknownSnapshot(String),

    /// A geometry argument is unusable.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Reading or writing a file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Decoding or encoding image data failed.
    #[error("Image error on '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The layer layout file could not be read or written.
    #[error("Layout file error: {0}")]
    Layout(#[from] serde_json::Error),
}

impl CanvasError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CanvasError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        CanvasError::Image {
            path: path.into(),
            source,
        }
    }
}

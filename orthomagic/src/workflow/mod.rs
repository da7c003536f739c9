//! Import and export runs against a [`Canvas`].
//!
//! A run checks its preconditions, switches the host ruler units to pixels,
//! carries out the planner's decisions and restores the host state on every
//! exit path:
//!
//! ```text
//! preconditions ──► RunScope::enter ──► body ──► RunScope::close
//!      │                                  │            ▲
//!      ▼                                  └── error ───┘
//!  Precondition error
//!  (document untouched)
//! ```

mod export;
mod import;

pub use export::{run_export, ExportSettings, ExportSummary};
pub use import::{
    run_import, GuidePolicy, ImportOptions, ImportSummary, GUIDES_PROMPT, GUIDES_TITLE,
};

use std::path::Path;

use tracing::{debug, warn};

use crate::canvas::{Canvas, CanvasError, RulerUnits};
use crate::error::OrthoError;

/// Snapshot holding the document state from before the export run.
pub const RUN_SNAPSHOT: &str = "PROCSTART";

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Host state a run has to put back when it ends.
#[derive(Debug)]
pub struct RunScope {
    saved_units: RulerUnits,
    snapshot: Option<&'static str>,
}

impl RunScope {
    /// Remember the current ruler units and switch to pixels.
    pub fn enter<C: Canvas + ?Sized>(canvas: &mut C) -> Self {
        let saved_units = canvas.ruler_units();
        canvas.set_ruler_units(RulerUnits::Pixels);
        Self {
            saved_units,
            snapshot: None,
        }
    }

    /// Record the run snapshot. It is restored and deleted on close.
    pub fn take_snapshot<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        name: &'static str,
    ) -> Result<(), CanvasError> {
        canvas.take_snapshot(name)?;
        self.snapshot = Some(name);
        Ok(())
    }

    /// Return the document to the run snapshot, if one was taken.
    pub fn rollback<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<(), CanvasError> {
        match self.snapshot {
            Some(name) => canvas.restore_snapshot(name),
            None => Ok(()),
        }
    }

    /// Restore the ruler units and drop the run snapshot.
    ///
    /// The units are restored even when the snapshot cleanup fails.
    pub fn close<C: Canvas + ?Sized>(self, canvas: &mut C) -> Result<(), CanvasError> {
        let snapshot_result = match self.snapshot {
            Some(name) => canvas
                .restore_snapshot(name)
                .and_then(|()| canvas.delete_snapshot(name)),
            None => Ok(()),
        };
        canvas.set_ruler_units(self.saved_units);
        debug!(units = ?self.saved_units, "Restored ruler units");
        snapshot_result
    }
}

/// Run `body` inside a [`RunScope`].
///
/// When both the body and the cleanup fail, the cleanup error is logged and
/// the body's error is returned.
pub fn with_run_scope<C, T, F>(canvas: &mut C, body: F) -> Result<T, OrthoError>
where
    C: Canvas + ?Sized,
    F: FnOnce(&mut C, &mut RunScope) -> Result<T, OrthoError>,
{
    let mut scope = RunScope::enter(canvas);
    let result = body(canvas, &mut scope);
    let cleanup = scope.close(canvas);

    match (result, cleanup) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(cleanup_error)) => {
            warn!(error = %cleanup_error, "Cleanup after failed run also failed");
            Err(e)
        }
    }
}

/// Create `dir` and its parents if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), OrthoError> {
    std::fs::create_dir_all(dir).map_err(|source| OrthoError::OutputDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

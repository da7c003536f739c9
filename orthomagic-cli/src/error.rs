//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use orthomagic::canvas::CanvasError;
use orthomagic::config::ConfigFileError;
use orthomagic::{OrthoError, PreconditionError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Failed to open a document directory
    Open { path: PathBuf, error: CanvasError },
    /// Failed to save a document after import
    Save { path: PathBuf, error: CanvasError },
    /// Import or export run failed
    Run(OrthoError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Run(OrthoError::MalformedDocumentName(_)) => {
                eprintln!();
                eprintln!("The document directory must be named after its Ortho4XP tile:");
                eprintln!("  +LAT+LON_ZOOM, for example +33+126_17 or -08+115_16");
            }
            CliError::Run(OrthoError::Precondition(PreconditionError::BackgroundLayer)) => {
                eprintln!();
                eprintln!("Remove the background entry from layout.json, or convert the");
                eprintln!("background into a regular layer, and try again.");
            }
            CliError::Run(OrthoError::Precondition(PreconditionError::Unsaved)) => {
                eprintln!();
                eprintln!("Run 'orthomagic import' first, or pass --output-root to choose");
                eprintln!("where the orthomagic4ps directory is written.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Open { path, error } => {
                write!(f, "Failed to open document '{}': {}", path.display(), error)
            }
            CliError::Save { path, error } => {
                write!(f, "Failed to save document '{}': {}", path.display(), error)
            }
            CliError::Run(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Open { error, .. } => Some(error),
            CliError::Save { error, .. } => Some(error),
            CliError::Run(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<OrthoError> for CliError {
    fn from(e: OrthoError) -> Self {
        CliError::Run(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_run_error_displays_library_message() {
        let err = CliError::from(OrthoError::from(PreconditionError::NoDocument));
        assert_eq!(err.to_string(), "No document to work with.");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_open_error_names_path() {
        let err = CliError::Open {
            path: PathBuf::from("/data/+33+126_17"),
            error: CanvasError::NoDocument,
        };
        assert!(err.to_string().contains("/data/+33+126_17"));
    }

    #[test]
    fn test_logging_error_has_no_source() {
        let err = CliError::LoggingInit("denied".to_string());
        assert!(err.source().is_none());
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_every_variant_has_message() {
        let errors = [
            CliError::LoggingInit("denied".to_string()),
            CliError::Config(ConfigFileError::WriteError("read-only".to_string())),
            CliError::Open {
                path: PathBuf::from("a"),
                error: CanvasError::NoDocument,
            },
            CliError::Save {
                path: PathBuf::from("b"),
                error: CanvasError::NoDocument,
            },
            CliError::Run(OrthoError::MalformedDocumentName("x".to_string())),
        ];
        for err in &errors {
            let sourced = match err {
                CliError::LoggingInit(_) => false,
                CliError::Config(_)
                | CliError::Open { .. }
                | CliError::Save { .. }
                | CliError::Run(_) => true,
            };
            assert!(!err.to_string().is_empty());
            assert_eq!(err.source().is_some(), sourced);
        }
    }
}

//! CLI runner for common setup.
//!
//! Loads the config file and initializes logging for every command that
//! works on a document.

use std::path::Path;

use orthomagic::config::ConfigFile;
use orthomagic::logging::{init_logging, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Keeps logging alive and holds the loaded configuration.
pub struct CliRunner {
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Load config from `config_path` (or the default path) and start logging.
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("OrthoMagic v{}", orthomagic::VERSION);
        info!(log = %self.config.logging.path().display(), "OrthoMagic CLI: {} command", command);
    }
}

//! Settings structs, one per `[section]` of the config file.

use std::path::PathBuf;

use crate::planner::PlacementMode;
use crate::workflow::GuidePolicy;

/// Default log file name inside the log directory.
pub const DEFAULT_LOG_FILE: &str = "orthomagic.log";

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub import: ImportSettings,
    pub export: ExportConfig,
    pub logging: LoggingSettings,
}

/// `[import]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSettings {
    /// Whether to draw texture guides after import
    pub guides: GuidePolicy,
    /// Placement formula for textures above the base zoom
    pub placement: PlacementMode,
}

/// `[export]` section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportConfig {
    /// Write `orthomagic4ps/` below this directory instead of the document's
    pub output_root: Option<PathBuf>,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Directory the log file is written to
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: crate::logging::default_log_dir(),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl LoggingSettings {
    /// Full path of the log file.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file)
    }
}

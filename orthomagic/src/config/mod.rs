//! User configuration in `~/.orthomagic/config.ini`.
//!
//! Settings structs live in [`settings`], parsing in `parser` and
//! serialization in `writer`. Command-line flags override file values.
//!
//! # Example
//!
//! ```
//! use orthomagic::config::ConfigFile;
//! use orthomagic::workflow::GuidePolicy;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.import.guides, GuidePolicy::Ask);
//! assert!(config.export.output_root.is_none());
//! ```

mod file;
mod parser;
pub mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError, CONFIG_FILE_NAME};
pub use settings::{ConfigFile, ExportConfig, ImportSettings, LoggingSettings};

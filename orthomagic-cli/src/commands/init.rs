//! Init command - initialize configuration file.

use std::path::Path;

use orthomagic::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command.
///
/// An existing config file is kept unless `force` is set.
pub fn run(config_path: Option<&Path>, force: bool) -> Result<(), CliError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);

    if path.exists() && !force {
        println!("Configuration file already exists: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    ConfigFile::default().save_to(&path)?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Edit this file to customize OrthoMagic settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}

//! INI parsing, `Ini` → [`ConfigFile`].
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [import] section
    if let Some(section) = ini.section(Some("import")) {
        if let Some(v) = section.get("guides") {
            config.import.guides = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "import".to_string(),
                key: "guides".to_string(),
                value: v.to_string(),
                reason: "must be one of: ask, always, never".to_string(),
            })?;
        }
        if let Some(v) = section.get("placement") {
            config.import.placement = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "import".to_string(),
                key: "placement".to_string(),
                value: v.to_string(),
                reason: "must be one of: scaled, offset_corrected, uniform".to_string(),
            })?;
        }
    }

    // [export] section
    if let Some(section) = ini.section(Some("export")) {
        if let Some(v) = section.get("output_root") {
            let v = v.trim();
            if !v.is_empty() {
                config.export.output_root = Some(expand_tilde(v));
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if v.contains('/') || v.contains('\\') {
                return Err(ConfigFileError::InvalidValue {
                    section: "logging".to_string(),
                    key: "file".to_string(),
                    value: v.to_string(),
                    reason: "must be a file name, set the directory with 'directory'".to_string(),
                });
            }
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

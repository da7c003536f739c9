//! INI serialization, [`ConfigFile`] → commented INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let output_root = config
        .export
        .output_root
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[import]
; Draw guides along the texture grid after import:
;   ask    - ask every time (default)
;   always - draw without asking
;   never  - never draw
guides = {}
; Placement of textures above the base zoom level:
;   scaled           - tile step scaled with the zoom difference (default)
;   offset_corrected - as scaled, shifted south for two or more levels above base
;   uniform          - tile step of 16 for every zoom level
placement = {}

[export]
; Directory the orthomagic4ps/ tree is written to.
; If empty, textures are written next to the document.
output_root = {}

[logging]
; Directory for the log file
directory = {}
; Log file name, cleared at the start of every session
file = {}
"#,
        config.import.guides,
        config.import.placement,
        output_root,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Collapse the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

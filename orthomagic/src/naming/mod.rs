//! Document and layer name parsing.
//!
//! Documents are named after the Ortho4XP tile they cover:
//! `{lat}{lon}_{zoom}[.ext]`, e.g. `+33+126_17.psd`.
//!
//! Texture layers keep their Ortho4XP texture names:
//! `{row}_{col}_{provider}{zoom}`, e.g. `52352_111408_BI17`.
//!
//! A document name that does not decode is fatal for a run. A layer name that
//! does not decode only means the layer is not a texture and is left alone.

use regex::Regex;
use std::sync::OnceLock;

use crate::coord::{GeoCell, MAX_ZOOM};
use crate::error::OrthoError;

/// Decoded texture layer name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileAddress {
    /// Tile row of the texture's north-west tile
    pub tile_y: i64,
    /// Tile column of the texture's north-west tile
    pub tile_x: i64,
    /// Zoom level the texture was generated at
    pub zoom: u8,
    /// Imagery provider tag (e.g. "BI", "GO2"), kept verbatim
    pub provider: String,
    /// The two zoom characters exactly as they appear in the name
    pub zoom_digits: String,
}

impl TileAddress {
    /// Directory name Ortho4XP files this texture's provider/zoom under.
    ///
    /// # Examples
    ///
    /// ```
    /// use orthomagic::naming::parse_layer_name;
    ///
    /// let address = parse_layer_name("52352_111408_BI17", 17).unwrap();
    /// assert_eq!(address.provider_directory(), "BI_17");
    /// ```
    pub fn provider_directory(&self) -> String {
        format!("{}_{}", self.provider, self.zoom_digits)
    }
}

/// Signed one to three digit integers, e.g. `+33`, `-8`, `+126`.
fn lat_lon_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[+-]\d{1,3}").unwrap())
}

/// Returns everything before the first `.`.
pub fn strip_extension(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Returns the Ortho4XP tile name part of a document name.
///
/// This is the token before the first `_`, e.g. `+33+126` for
/// `+33+126_17.psd`.
pub fn ortho4xp_name(document_name: &str) -> &str {
    let stem = strip_extension(document_name);
    stem.split('_').next().unwrap_or(stem)
}

/// Parse a document name into the geo cell it covers.
///
/// The first two signed integers are latitude and longitude; any further ones
/// are ignored. The zoom is read from the leading digits of the token after the
/// first `_`.
///
/// # Errors
///
/// [`OrthoError::MalformedDocumentName`] if fewer than two signed integers are
/// present or no numeric zoom token follows an underscore.
///
/// # Examples
///
/// ```
/// use orthomagic::naming::parse_document_name;
///
/// let cell = parse_document_name("+33+126_17.psd").unwrap();
/// assert_eq!((cell.lat, cell.lon, cell.base_zoom), (33, 126, 17));
///
/// assert!(parse_document_name("noise").is_err());
/// ```
pub fn parse_document_name(raw: &str) -> Result<GeoCell, OrthoError> {
    let malformed = || OrthoError::MalformedDocumentName(raw.to_string());
    let stem = strip_extension(raw);

    let mut tokens = lat_lon_pattern().find_iter(stem);
    let lat = tokens
        .next()
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .ok_or_else(malformed)?;
    let lon = tokens
        .next()
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .ok_or_else(malformed)?;

    let zoom_token = stem.split('_').nth(1).ok_or_else(malformed)?;
    let digits_end = zoom_token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(zoom_token.len());
    let base_zoom = zoom_token[..digits_end]
        .parse::<u8>()
        .map_err(|_| malformed())?;

    Ok(GeoCell::new(lat, lon, base_zoom))
}

/// Parse a texture layer name.
///
/// Returns `None` when the layer is not a texture of this document: the name
/// does not have exactly three `_`-separated parts, row or column is not an
/// integer, the last two characters of the third part are not digits, or the
/// zoom lies outside `min_zoom..=19`.
///
/// # Examples
///
/// ```
/// use orthomagic::naming::parse_layer_name;
///
/// let address = parse_layer_name("1024_2048_BING17", 17).unwrap();
/// assert_eq!((address.tile_y, address.tile_x, address.zoom), (1024, 2048, 17));
/// assert_eq!(address.provider, "BING");
///
/// assert!(parse_layer_name("a_b_c", 17).is_none());
/// assert!(parse_layer_name("1_2_X16", 17).is_none());
/// ```
pub fn parse_layer_name(raw: &str, min_zoom: u8) -> Option<TileAddress> {
    let parts: Vec<&str> = raw.split('_').collect();
    let [row, col, tail] = parts.as_slice() else {
        return None;
    };

    let tile_y = row.parse::<i64>().ok()?;
    let tile_x = col.parse::<i64>().ok()?;

    let split = tail.len().checked_sub(2)?;
    if !tail.is_char_boundary(split) {
        return None;
    }
    let (provider, zoom_digits) = tail.split_at(split);
    if !zoom_digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let zoom = zoom_digits.parse::<u8>().ok()?;

    if zoom < min_zoom || zoom > MAX_ZOOM {
        return None;
    }

    Some(TileAddress {
        tile_y,
        tile_x,
        zoom,
        provider: provider.to_string(),
        zoom_digits: zoom_digits.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_name_basic() {
        let cell = parse_document_name("+33+126_17").unwrap();
        assert_eq!(cell, GeoCell::new(33, 126, 17));
    }

    #[test]
    fn test_parse_document_name_strips_extension() {
        let cell = parse_document_name("-08-035_16.psd").unwrap();
        assert_eq!(cell, GeoCell::new(-8, -35, 16));
    }

    #[test]
    fn test_parse_document_name_ignores_extra_tokens() {
        let cell = parse_document_name("+47+008_18_+99").unwrap();
        assert_eq!(cell, GeoCell::new(47, 8, 18));
    }

    #[test]
    fn test_parse_document_name_zoom_leading_digits() {
        let cell = parse_document_name("+10+20_15 copy").unwrap();
        assert_eq!(cell.base_zoom, 15);
    }

    #[test]
    fn test_parse_document_name_rejects_noise() {
        let result = parse_document_name("noise");
        assert!(matches!(
            result.unwrap_err(),
            OrthoError::MalformedDocumentName(name) if name == "noise"
        ));
    }

    #[test]
    fn test_parse_document_name_requires_two_coordinates() {
        assert!(parse_document_name("+33_17").is_err());
    }

    #[test]
    fn test_parse_document_name_requires_zoom_token() {
        assert!(parse_document_name("+33+126").is_err());
        assert!(parse_document_name("+33+126_").is_err());
        assert!(parse_document_name("+33+126_zl").is_err());
    }

    #[test]
    fn test_parse_document_name_zoom_after_extension_is_ignored() {
        assert!(parse_document_name("+33+126.tar_17").is_err());
    }

    #[test]
    fn test_ortho4xp_name() {
        assert_eq!(ortho4xp_name("+33+126_17.psd"), "+33+126");
        assert_eq!(ortho4xp_name("+33+126"), "+33+126");
    }

    #[test]
    fn test_parse_layer_name_basic() {
        let address = parse_layer_name("1024_2048_BING17", 17).unwrap();
        assert_eq!(address.tile_y, 1024);
        assert_eq!(address.tile_x, 2048);
        assert_eq!(address.zoom, 17);
        assert_eq!(address.provider, "BING");
        assert_eq!(address.zoom_digits, "17");
    }

    #[test]
    fn test_parse_layer_name_provider_with_digits() {
        let address = parse_layer_name("52352_111408_GO218", 17).unwrap();
        assert_eq!(address.provider, "GO2");
        assert_eq!(address.zoom, 18);
        assert_eq!(address.provider_directory(), "GO2_18");
    }

    #[test]
    fn test_parse_layer_name_rejects_non_numeric() {
        assert!(parse_layer_name("a_b_c", 17).is_none());
        assert!(parse_layer_name("12x_2048_BI17", 17).is_none());
        assert!(parse_layer_name("1024_2048_BI1x", 17).is_none());
    }

    #[test]
    fn test_parse_layer_name_rejects_wrong_token_count() {
        assert!(parse_layer_name("Layer 1", 17).is_none());
        assert!(parse_layer_name("1024_2048", 17).is_none());
        assert!(parse_layer_name("1024_2048_BI17_copy", 17).is_none());
    }

    #[test]
    fn test_parse_layer_name_zoom_range() {
        assert!(parse_layer_name("1_2_X16", 17).is_none());
        assert!(parse_layer_name("1_2_X20", 17).is_none());
        assert!(parse_layer_name("1_2_X19", 17).is_some());
        assert!(parse_layer_name("1_2_X17", 17).is_some());
    }

    #[test]
    fn test_parse_layer_name_short_zoom_token() {
        assert!(parse_layer_name("1_2_7", 0).is_none());
        assert!(parse_layer_name("1_2_17", 17).is_some());
    }

    #[test]
    fn test_parse_layer_name_non_ascii_provider() {
        let address = parse_layer_name("1_2_Ä17", 17).unwrap();
        assert_eq!(address.provider, "Ä");
        assert!(parse_layer_name("1_2_1Ä", 0).is_none());
    }
}

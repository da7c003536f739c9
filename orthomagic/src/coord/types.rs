//! Types shared by the coordinate conversions.

use std::fmt;

/// Highest zoom level a texture layer may carry.
pub const MAX_ZOOM: u8 = 19;

/// Edge length of one texture in pixels.
pub const TEXTURE_SIZE: u32 = 4096;

/// Number of slippy-map tiles along one texture edge at the texture's own zoom.
pub const TEXTURE_TILE_SPAN: i64 = 16;

/// Edge length of one slippy-map tile in pixels.
pub const TILE_PIXELS: f64 = 256.0;

/// A one-degree WGS84 cell, identified by its south-west corner.
///
/// This is what an Ortho4XP document name such as `+33+126_17` decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeoCell {
    /// Latitude of the southern edge in whole degrees
    pub lat: i32,
    /// Longitude of the western edge in whole degrees
    pub lon: i32,
    /// Zoom level the document's base texture grid is built at
    pub base_zoom: u8,
}

impl GeoCell {
    pub fn new(lat: i32, lon: i32, base_zoom: u8) -> Self {
        Self {
            lat,
            lon,
            base_zoom,
        }
    }
}

impl fmt::Display for GeoCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+03}{:+04}_{}", self.lat, self.lon, self.base_zoom)
    }
}

/// A tile index pair, snapped to a texture boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilePoint {
    /// Column (increases eastward)
    pub x: i64,
    /// Row (increases southward)
    pub y: i64,
}

/// Tile-index bounding box of a [`GeoCell`] at one zoom level.
///
/// `left`/`top` come from the north-west corner, `right`/`bottom` from the
/// south-east corner. Both corners are snapped down to the same divisor, so
/// `right` and `bottom` name the first tile of the last texture row/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileBBox {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl TileBBox {
    /// Number of textures along each axis, counting both ends.
    ///
    /// `span` is the divisor the box was snapped to.
    pub fn texture_counts(&self, span: i64) -> (i64, i64) {
        // saturating: a pole corner sits at i64::MAX
        (
            self.right.saturating_sub(self.left) / span + 1,
            self.bottom.saturating_sub(self.top) / span + 1,
        )
    }
}

//! Coordinate conversion module
//!
//! Converts WGS84 positions into the snapped tile indices used by Ortho4XP
//! texture names, and computes the tile-index box a [`GeoCell`] spans at a
//! given zoom level.
//!
//! A texture at zoom `z` covers 16×16 slippy-map tiles of zoom `z`. When a
//! document's base grid is built at `base_zoom`, a texture of a finer zoom
//! covers a proportionally smaller area, so positions for finer zooms are
//! snapped and scaled by [`position_divider`].

mod types;

pub use types::{
    GeoCell, TileBBox, TilePoint, MAX_ZOOM, TEXTURE_SIZE, TEXTURE_TILE_SPAN, TILE_PIXELS,
};

use std::f64::consts::PI;

/// Converts a WGS84 position into tile indices snapped to `divisor`.
///
/// The world is `2^(zoom+7)` pixels across per half-turn of longitude. Pixel
/// coordinates are turned into 256 px tile indices and then rounded down to
/// the nearest multiple of `divisor`.
///
/// Latitudes of exactly ±90° are outside the Mercator domain. They do not
/// panic; the result saturates instead.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees
/// * `lon` - Longitude in degrees
/// * `zoom` - Zoom level of the tile grid
/// * `divisor` - Snapping step in tiles, must be positive
#[inline]
pub fn forward_mercator(lat: f64, lon: f64, zoom: u8, divisor: i64) -> TilePoint {
    debug_assert!(divisor > 0, "divisor must be positive");

    let ratio_x = lon / 180.0;
    let ratio_y = ((90.0 + lat) * PI / 360.0).tan().ln() / PI;

    let world = 2.0_f64.powi(zoom as i32 + 7);
    let pixel_x = (ratio_x + 1.0) * world;
    let pixel_y = (1.0 - ratio_y) * world;

    // `as` saturates on overflow and maps NaN to 0
    let raw_x = (pixel_x / TILE_PIXELS).floor() as i64;
    let raw_y = (pixel_y / TILE_PIXELS).floor() as i64;

    TilePoint {
        x: snap_down(raw_x, divisor),
        y: snap_down(raw_y, divisor),
    }
}

#[inline]
fn snap_down(value: i64, divisor: i64) -> i64 {
    value.div_euclid(divisor) * divisor
}

/// Computes the snapped tile-index box of `cell` at `zoom`.
///
/// The north-west corner `(lat + 1, lon)` gives `left`/`top`; the south-east
/// corner `(lat, lon + 1)` gives `right`/`bottom`.
pub fn cell_bbox(cell: &GeoCell, zoom: u8, divisor: i64) -> TileBBox {
    let north_west = forward_mercator(f64::from(cell.lat + 1), f64::from(cell.lon), zoom, divisor);
    let south_east = forward_mercator(f64::from(cell.lat), f64::from(cell.lon + 1), zoom, divisor);

    TileBBox {
        left: north_west.x,
        top: north_west.y,
        right: south_east.x,
        bottom: south_east.y,
    }
}

/// Returns `2^(zoom - base_zoom)`.
///
/// A texture `n` zoom levels finer than the base covers `1/2^n` of a base
/// texture along each axis. Zooms at or below the base yield 1.
#[inline]
pub fn scale_multiplier(zoom: u8, base_zoom: u8) -> i64 {
    1_i64 << zoom.saturating_sub(base_zoom)
}

/// Returns the tile step between base-grid textures at `zoom`.
///
/// This is `16 × 2^(zoom - base_zoom)`: one base texture spans 16 tiles at the
/// base zoom and twice as many tiles for every finer zoom level.
#[inline]
pub fn position_divider(zoom: u8, base_zoom: u8) -> i64 {
    TEXTURE_TILE_SPAN * scale_multiplier(zoom, base_zoom)
}

//! Canvas sizing and texture placement for the import run.
//!
//! The canvas of a document is a grid of 4096 px textures at the base zoom.
//! A texture's grid position is its tile offset from the cell's north-west
//! texture divided by the tile step between base textures at the texture's
//! zoom. Textures of finer zooms land on fractional grid positions and are
//! shrunk by `2^(zoom - base_zoom)`.

use std::fmt;
use std::str::FromStr;

use crate::canvas::{Bounds, GuideOrientation};
use crate::coord::{self, GeoCell, TileBBox, TEXTURE_SIZE, TEXTURE_TILE_SPAN};
use crate::naming::TileAddress;

/// Most textures along one canvas edge whose pixel width still fits `u32`.
pub const MAX_TEXTURES_PER_EDGE: u32 = u32::MAX / TEXTURE_SIZE;

/// Largest pixel offset a placement may have on either axis.
const MAX_PIXEL_OFFSET: f64 = u32::MAX as f64;

/// Which placement formula to use.
///
/// Two formulas have been used for Ortho4XP documents. They agree at the base
/// zoom and differ for finer textures, so the choice is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementMode {
    /// Tile step scaled by `2^(zoom - base_zoom)`.
    #[default]
    Scaled,
    /// As [`PlacementMode::Scaled`], plus a `1/2^(zoom - base_zoom)` texture
    /// shift southward for textures two or more zoom levels above the base.
    ///
    /// Empirical correction observed in the field; it has not been verified
    /// against a reference data set.
    ScaledWithOffsetCorrection,
    /// Tile step of 16 for every zoom.
    Uniform,
}

impl PlacementMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementMode::Scaled => "scaled",
            PlacementMode::ScaledWithOffsetCorrection => "offset_corrected",
            PlacementMode::Uniform => "uniform",
        }
    }
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scaled" => Ok(PlacementMode::Scaled),
            "offset_corrected" => Ok(PlacementMode::ScaledWithOffsetCorrection),
            "uniform" => Ok(PlacementMode::Uniform),
            other => Err(format!(
                "unknown placement mode '{}' (expected scaled, offset_corrected or uniform)",
                other
            )),
        }
    }
}

/// Where one texture layer belongs on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerPlacement {
    /// Column in base-texture units
    pub x: f64,
    /// Row in base-texture units
    pub y: f64,
    /// `2^(zoom - base_zoom)`
    pub scale_multiplier: i64,
}

impl LayerPlacement {
    /// Target top-left corner in pixels.
    pub fn pixel_offset(&self) -> (i64, i64) {
        let size = f64::from(TEXTURE_SIZE);
        ((self.x * size).round() as i64, (self.y * size).round() as i64)
    }

    /// Factor a full-size texture is scaled by to fit the base grid.
    pub fn scale_factor(&self) -> f64 {
        1.0 / self.scale_multiplier as f64
    }

    /// Whether a layer `current_width` pixels wide still has to be shrunk.
    ///
    /// Only layers at exactly one unscaled texture width are scaled, so a
    /// second import leaves already-shrunk layers alone.
    pub fn needs_scaling(&self, current_width: i64) -> bool {
        self.scale_multiplier != 1 && current_width == i64::from(TEXTURE_SIZE)
    }
}

/// Computes canvas size and texture placement for one document.
#[derive(Debug, Clone)]
pub struct ImportPlanner {
    cell: GeoCell,
    mode: PlacementMode,
}

impl ImportPlanner {
    pub fn new(cell: GeoCell, mode: PlacementMode) -> Self {
        Self { cell, mode }
    }

    pub fn cell(&self) -> &GeoCell {
        &self.cell
    }

    pub fn mode(&self) -> PlacementMode {
        self.mode
    }

    /// Tile step between base-grid textures at `zoom`.
    pub fn position_divider(&self, zoom: u8) -> i64 {
        match self.mode {
            PlacementMode::Uniform => TEXTURE_TILE_SPAN,
            PlacementMode::Scaled | PlacementMode::ScaledWithOffsetCorrection => {
                coord::position_divider(zoom, self.cell.base_zoom)
            }
        }
    }

    /// Tile box of the cell at `zoom`, snapped to this planner's divider.
    pub fn bbox(&self, zoom: u8) -> TileBBox {
        coord::cell_bbox(&self.cell, zoom, self.position_divider(zoom))
    }

    /// Number of base textures along x and y.
    ///
    /// Capped at [`MAX_TEXTURES_PER_EDGE`]; a cell touching a pole has an
    /// unbounded grid.
    pub fn texture_counts(&self) -> (u32, u32) {
        let (x, y) = self
            .bbox(self.cell.base_zoom)
            .texture_counts(TEXTURE_TILE_SPAN);
        (clamp_count(x), clamp_count(y))
    }

    /// Canvas size in pixels that fits the texture grid exactly.
    pub fn canvas_size(&self) -> (u32, u32) {
        let (x, y) = self.texture_counts();
        (x * TEXTURE_SIZE, y * TEXTURE_SIZE)
    }

    /// Grid position and scale of a texture layer.
    ///
    /// Returns `None` when the texture lies so far outside the cell that its
    /// pixel offset cannot be represented on a canvas.
    pub fn plan_layer(&self, address: &TileAddress) -> Option<LayerPlacement> {
        let bbox = self.bbox(address.zoom);
        let divider = self.position_divider(address.zoom) as f64;
        let scale_multiplier = coord::scale_multiplier(address.zoom, self.cell.base_zoom);

        let x = address.tile_x.checked_sub(bbox.left)? as f64 / divider;
        let mut y = address.tile_y.checked_sub(bbox.top)? as f64 / divider;

        if self.mode == PlacementMode::ScaledWithOffsetCorrection
            && address.zoom.saturating_sub(self.cell.base_zoom) >= 2
        {
            y += 1.0 / scale_multiplier as f64;
        }

        let size = f64::from(TEXTURE_SIZE);
        if (x * size).abs() > MAX_PIXEL_OFFSET || (y * size).abs() > MAX_PIXEL_OFFSET {
            return None;
        }

        Some(LayerPlacement {
            x,
            y,
            scale_multiplier,
        })
    }

    /// Pixel delta that moves a layer at `current` to its placement.
    ///
    /// Returns `None` when the layer is already in place.
    pub fn plan_move(&self, placement: &LayerPlacement, current: &Bounds) -> Option<(i64, i64)> {
        let (target_x, target_y) = placement.pixel_offset();
        let (dx, dy) = (
            target_x.saturating_sub(current.left),
            target_y.saturating_sub(current.top),
        );
        if dx == 0 && dy == 0 {
            None
        } else {
            Some((dx, dy))
        }
    }

    /// Guide lines along every inner texture boundary.
    pub fn guide_positions(&self) -> Vec<(GuideOrientation, u32)> {
        let (count_x, count_y) = self.texture_counts();
        let vertical = (1..count_x).map_while(|i| {
            i.checked_mul(TEXTURE_SIZE)
                .map(|p| (GuideOrientation::Vertical, p))
        });
        let horizontal = (1..count_y).map_while(|i| {
            i.checked_mul(TEXTURE_SIZE)
                .map(|p| (GuideOrientation::Horizontal, p))
        });
        vertical.chain(horizontal).collect()
    }
}

fn clamp_count(count: i64) -> u32 {
    u32::try_from(count.max(1))
        .unwrap_or(u32::MAX)
        .min(MAX_TEXTURES_PER_EDGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::parse_layer_name;

    fn korea() -> ImportPlanner {
        ImportPlanner::new(GeoCell::new(33, 126, 17), PlacementMode::Scaled)
    }

    fn address(name: &str) -> TileAddress {
        parse_layer_name(name, 17).unwrap()
    }

    #[test]
    fn test_canvas_size_fits_texture_grid() {
        let planner = korea();
        assert_eq!(planner.texture_counts(), (23, 28));
        assert_eq!(planner.canvas_size(), (23 * 4096, 28 * 4096));
    }

    #[test]
    fn test_canvas_size_equator_cell() {
        let planner = ImportPlanner::new(GeoCell::new(10, 20, 15), PlacementMode::Scaled);
        assert_eq!(planner.canvas_size(), (7 * 4096, 6 * 4096));
    }

    #[test]
    fn test_place_north_west_texture_at_origin() {
        let placement = korea().plan_layer(&address("52352_111408_BI17")).unwrap();
        assert_eq!(placement.x, 0.0);
        assert_eq!(placement.y, 0.0);
        assert_eq!(placement.scale_multiplier, 1);
        assert_eq!(placement.pixel_offset(), (0, 0));
    }

    #[test]
    fn test_place_base_texture() {
        let placement = korea().plan_layer(&address("52384_111440_BI17")).unwrap();
        assert_eq!(placement.pixel_offset(), (2 * 4096, 2 * 4096));
        assert!(!placement.needs_scaling(4096));
    }

    #[test]
    fn test_place_finer_texture_on_half_grid() {
        // ZL18 box starts at (222816, 104704) with a step of 32 tiles
        let placement = korea().plan_layer(&address("104720_222832_BI18")).unwrap();
        assert_eq!(placement.x, 0.5);
        assert_eq!(placement.y, 0.5);
        assert_eq!(placement.scale_multiplier, 2);
        assert_eq!(placement.pixel_offset(), (2048, 2048));
        assert_eq!(placement.scale_factor(), 0.5);
    }

    #[test]
    fn test_scaling_only_for_unscaled_width() {
        let placement = korea().plan_layer(&address("104720_222832_BI18")).unwrap();
        assert!(placement.needs_scaling(4096));
        assert!(!placement.needs_scaling(2048));
    }

    #[test]
    fn test_offset_correction_only_from_two_levels() {
        let planner = ImportPlanner::new(
            GeoCell::new(33, 126, 17),
            PlacementMode::ScaledWithOffsetCorrection,
        );
        let zl18 = planner.plan_layer(&address("104720_222832_BI18")).unwrap();
        assert_eq!(zl18.y, 0.5);

        // ZL19 box starts at (445632, 209408) with a step of 64 tiles
        let zl19 = planner.plan_layer(&address("209472_445696_BI19")).unwrap();
        assert_eq!(zl19.x, 1.0);
        assert_eq!(zl19.y, 1.0 + 0.25);

        let plain = korea().plan_layer(&address("209472_445696_BI19")).unwrap();
        assert_eq!(plain.y, 1.0);
    }

    #[test]
    fn test_uniform_mode_uses_fixed_divider() {
        let planner = ImportPlanner::new(GeoCell::new(33, 126, 17), PlacementMode::Uniform);
        assert_eq!(planner.position_divider(17), 16);
        assert_eq!(planner.position_divider(19), 16);
        assert_eq!(planner.canvas_size(), korea().canvas_size());
    }

    #[test]
    fn test_plan_move_zero_delta_is_none() {
        let planner = korea();
        let placement = planner.plan_layer(&address("52368_111424_BI17")).unwrap();
        let in_place = Bounds::from_origin(4096, 4096, 4096, 4096);
        assert_eq!(planner.plan_move(&placement, &in_place), None);

        let at_origin = Bounds::from_origin(0, 0, 4096, 4096);
        assert_eq!(planner.plan_move(&placement, &at_origin), Some((4096, 4096)));
    }

    #[test]
    fn test_guide_positions_on_inner_boundaries() {
        let planner = ImportPlanner::new(GeoCell::new(10, 20, 15), PlacementMode::Scaled);
        let guides = planner.guide_positions();
        let vertical: Vec<u32> = guides
            .iter()
            .filter(|(o, _)| *o == GuideOrientation::Vertical)
            .map(|(_, p)| *p)
            .collect();
        let horizontal = guides.len() - vertical.len();
        assert_eq!(vertical.len(), 6);
        assert_eq!(horizontal, 5);
        assert_eq!(vertical.first(), Some(&4096));
        assert_eq!(vertical.last(), Some(&(6 * 4096)));
    }

    #[test]
    fn test_placement_mode_parse_and_display() {
        for mode in [
            PlacementMode::Scaled,
            PlacementMode::ScaledWithOffsetCorrection,
            PlacementMode::Uniform,
        ] {
            assert_eq!(mode.to_string().parse::<PlacementMode>(), Ok(mode));
        }
        assert!("diagonal".parse::<PlacementMode>().is_err());
        assert_eq!(" Scaled ".parse::<PlacementMode>(), Ok(PlacementMode::Scaled));
    }

    #[test]
    fn test_pole_cell_grid_is_capped() {
        let planner = ImportPlanner::new(GeoCell::new(-90, 0, 17), PlacementMode::Scaled);
        let (count_x, count_y) = planner.texture_counts();
        assert!(count_x < MAX_TEXTURES_PER_EDGE);
        assert_eq!(count_y, MAX_TEXTURES_PER_EDGE);

        let (_, height) = planner.canvas_size();
        assert_eq!(height, MAX_TEXTURES_PER_EDGE * TEXTURE_SIZE);
    }

    #[test]
    fn test_pole_cell_guides_stay_in_range() {
        let planner = ImportPlanner::new(GeoCell::new(-90, 0, 17), PlacementMode::Scaled);
        let guides = planner.guide_positions();
        let (count_x, count_y) = planner.texture_counts();

        assert_eq!(guides.len(), (count_x - 1 + count_y - 1) as usize);
        let last = guides.last().unwrap();
        assert_eq!(*last, (GuideOrientation::Horizontal, (count_y - 1) * TEXTURE_SIZE));
    }

    #[test]
    fn test_unrepresentable_texture_has_no_placement() {
        let planner = korea();
        let far_west = address("0_-9223372036854775808_BI17");
        let far_south = address("9223372036854775807_111408_BI17");
        assert_eq!(planner.plan_layer(&far_west), None);
        assert_eq!(planner.plan_layer(&far_south), None);

        // outside the cell, but still on a canvas
        let neighbour = planner.plan_layer(&address("52352_111392_BI17")).unwrap();
        assert_eq!(neighbour.pixel_offset(), (-4096, 0));
    }

    #[test]
    fn test_plan_move_saturates_on_extreme_bounds() {
        let planner = korea();
        let placement = planner.plan_layer(&address("52384_111440_BI17")).unwrap();
        let far_away = Bounds::new(i64::MIN, i64::MIN, i64::MIN + 4096, i64::MIN + 4096);
        assert_eq!(
            planner.plan_move(&placement, &far_away),
            Some((i64::MAX, i64::MAX))
        );
    }
}

//! Export decisions for every texture layer of a document.
//!
//! Zoom levels are walked from the base zoom up to [`MAX_ZOOM`]. Within a
//! zoom level layers keep document order. A texture is skipped when any
//! texture of a finer zoom overlaps it: the finer texture already describes
//! that area and exporting the coarse one as well would produce duplicate,
//! blurrier scenery.
//!
//! Every decision is computed from the layer list captured before the run
//! touched the document, so the outcome for one layer never depends on what
//! was done for an earlier one.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::canvas::{Bounds, ExportFormat, LayerId, LayerInfo};
use crate::coord::{self, GeoCell, MAX_ZOOM};
use crate::naming::{parse_layer_name, TileAddress};

/// Top-level output directory below the document location.
pub const EXPORT_DIR: &str = "orthomagic4ps";

/// A layer whose name decoded to a texture address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    pub layer: LayerInfo,
    pub address: TileAddress,
}

/// Texture layers grouped by zoom level, in document order within a group.
#[derive(Debug, Clone, Default)]
pub struct ZoomGroups {
    groups: BTreeMap<u8, Vec<TileLayer>>,
    ignored: usize,
}

impl ZoomGroups {
    /// Group the texture layers of `layers`.
    ///
    /// Layers that are not textures of a zoom in `base_zoom..=19` are counted
    /// as ignored and left out.
    pub fn from_layers(layers: &[LayerInfo], base_zoom: u8) -> Self {
        let mut groups: BTreeMap<u8, Vec<TileLayer>> = BTreeMap::new();
        let mut ignored = 0;

        for layer in layers {
            match parse_layer_name(&layer.name, base_zoom) {
                Some(address) => groups.entry(address.zoom).or_default().push(TileLayer {
                    layer: layer.clone(),
                    address,
                }),
                None => ignored += 1,
            }
        }

        Self { groups, ignored }
    }

    /// Layers at `zoom`, empty if there are none.
    pub fn get(&self, zoom: u8) -> &[TileLayer] {
        self.groups.get(&zoom).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Zoom levels that have at least one layer, ascending.
    pub fn zooms(&self) -> impl Iterator<Item = u8> + '_ {
        self.groups.keys().copied()
    }

    /// All texture layers at zooms strictly finer than `zoom`.
    pub fn finer_than(&self, zoom: u8) -> impl Iterator<Item = &TileLayer> + '_ {
        self.groups
            .range(zoom.saturating_add(1)..)
            .flat_map(|(_, layers)| layers.iter())
    }

    /// Number of texture layers.
    pub fn tile_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Number of layers that were not textures.
    pub fn ignored_count(&self) -> usize {
        self.ignored
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Everything needed to export one texture layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub layer: LayerInfo,
    /// Zoom level the layer is processed at
    pub zoom: u8,
    /// Layers to hide (and then delete) so only this layer remains
    pub hide: Vec<LayerId>,
    /// Canvas crop, the layer's bounds
    pub crop: Bounds,
    /// Image resize applied after cropping, `None` at the base zoom
    pub resize_factor: Option<f64>,
    /// Output path relative to the document location
    pub relative_path: PathBuf,
}

/// What happens to one texture layer during export.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportDecision {
    /// A finer texture overlaps this one.
    Skip {
        layer: LayerInfo,
        zoom: u8,
        occluded_by: LayerId,
    },
    Export(ExportJob),
}

impl ExportDecision {
    pub fn layer(&self) -> &LayerInfo {
        match self {
            ExportDecision::Skip { layer, .. } => layer,
            ExportDecision::Export(job) => &job.layer,
        }
    }

    pub fn is_export(&self) -> bool {
        matches!(self, ExportDecision::Export(_))
    }
}

/// Plans the export of all texture layers of one document.
#[derive(Debug, Clone)]
pub struct ExportPlanner {
    cell: GeoCell,
    ortho4xp_name: String,
    format: ExportFormat,
}

impl ExportPlanner {
    /// `ortho4xp_name` is the tile part of the document name, e.g. `+33+126`.
    pub fn new(cell: GeoCell, ortho4xp_name: impl Into<String>) -> Self {
        Self {
            cell,
            ortho4xp_name: ortho4xp_name.into(),
            format: ExportFormat::default(),
        }
    }

    pub fn cell(&self) -> &GeoCell {
        &self.cell
    }

    /// Group `layers` by zoom.
    pub fn group(&self, layers: &[LayerInfo]) -> ZoomGroups {
        ZoomGroups::from_layers(layers, self.cell.base_zoom)
    }

    /// Decide, in processing order, what happens to every texture layer.
    pub fn plan(&self, layers: &[LayerInfo]) -> Vec<ExportDecision> {
        let groups = self.group(layers);
        let mut decisions = Vec::with_capacity(groups.tile_count());

        for zoom in self.cell.base_zoom..=MAX_ZOOM {
            for tile in groups.get(zoom) {
                let decision = match find_occluder(tile, zoom, &groups) {
                    Some(occluder) => ExportDecision::Skip {
                        layer: tile.layer.clone(),
                        zoom,
                        occluded_by: occluder.layer.id,
                    },
                    None => ExportDecision::Export(self.job(tile, zoom, layers)),
                };
                decisions.push(decision);
            }
        }

        decisions
    }

    fn job(&self, tile: &TileLayer, zoom: u8, layers: &[LayerInfo]) -> ExportJob {
        let resize_factor = (zoom != self.cell.base_zoom)
            .then(|| coord::scale_multiplier(zoom, self.cell.base_zoom) as f64);

        ExportJob {
            layer: tile.layer.clone(),
            zoom,
            hide: hidden_layers(&tile.layer, layers),
            crop: tile.layer.bounds,
            resize_factor,
            relative_path: self.relative_path(&tile.layer.name, &tile.address),
        }
    }

    /// `orthomagic4ps/<ortho4xp name>/<provider>_<zz>/<layer name>.jpg`
    ///
    /// The provider directory comes from the layer's own name, not from the
    /// zoom level it is processed at.
    pub fn relative_path(&self, layer_name: &str, address: &TileAddress) -> PathBuf {
        PathBuf::from(EXPORT_DIR)
            .join(&self.ortho4xp_name)
            .join(address.provider_directory())
            .join(format!("{}.{}", layer_name, self.format.extension()))
    }
}

/// First texture of a finer zoom that overlaps `tile`, if any.
pub fn find_occluder<'a>(
    tile: &TileLayer,
    zoom: u8,
    groups: &'a ZoomGroups,
) -> Option<&'a TileLayer> {
    groups
        .finer_than(zoom)
        .filter(|other| other.layer.id != tile.layer.id)
        .find(|other| tile.layer.bounds.overlaps(&other.layer.bounds))
}

/// Every layer except `target`, plus all linked layers, in document order.
fn hidden_layers(target: &LayerInfo, layers: &[LayerInfo]) -> Vec<LayerId> {
    let mut hide: Vec<LayerId> = Vec::new();
    let mut push = |id: LayerId| {
        if id != target.id && !hide.contains(&id) {
            hide.push(id);
        }
    };

    for layer in layers {
        push(layer.id);
        for &linked in &layer.linked {
            push(linked);
        }
    }
    hide
}

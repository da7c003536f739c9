//! Shared fixtures for the workflow integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use orthomagic::canvas::{
    Bounds, Canvas, CanvasError, ExportOptions, GuideOrientation, LayerId, LayerInfo, RulerUnits,
};

/// One call made against a [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    SetRulerUnits(RulerUnits),
    SetVisible(LayerId, bool),
    Translate(LayerId, i64, i64),
    Scale(LayerId, f64),
    DeleteAllHidden,
    ResizeCanvas(u32, u32),
    Crop(Bounds),
    ResizeImage(f64),
    ClearGuides,
    AddGuide(GuideOrientation, u32),
    Export(PathBuf),
    TakeSnapshot(String),
    RestoreSnapshot(String),
    DeleteSnapshot(String),
}

#[derive(Debug, Clone)]
struct State {
    width: u32,
    height: u32,
    layers: Vec<LayerInfo>,
    guides: Vec<(GuideOrientation, u32)>,
}

/// A canvas that tracks geometry only and records every call.
///
/// Layers have bounds but no pixels, so full 4096 px textures cost nothing.
#[derive(Debug)]
pub struct RecordingCanvas {
    pub open: bool,
    pub name: String,
    pub dir: Option<PathBuf>,
    pub saved: bool,
    pub background: bool,
    pub units: RulerUnits,
    /// Fail every `export_image` call after this many successful ones
    pub fail_export_after: Option<usize>,
    pub ops: Vec<Op>,
    state: State,
    snapshots: HashMap<String, State>,
    next_id: u32,
}

impl RecordingCanvas {
    /// An open, saved document without a location.
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            open: true,
            name: name.to_string(),
            dir: None,
            saved: true,
            background: false,
            units: RulerUnits::Inches,
            fail_export_after: None,
            ops: Vec::new(),
            state: State {
                width,
                height,
                layers: Vec::new(),
                guides: Vec::new(),
            },
            snapshots: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn with_dir(mut self, dir: &Path) -> Self {
        self.dir = Some(dir.to_path_buf());
        self
    }

    /// Add a layer below the existing ones.
    pub fn add_layer(&mut self, name: &str, bounds: Bounds) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.state.layers.push(LayerInfo {
            id,
            name: name.to_string(),
            bounds,
            linked: Vec::new(),
            visible: true,
        });
        id
    }

    /// Add a full-size texture layer with its top-left corner at (x, y).
    pub fn add_texture(&mut self, name: &str, x: i64, y: i64) -> LayerId {
        self.add_layer(name, Bounds::from_origin(x, y, 4096, 4096))
    }

    pub fn link(&mut self, a: LayerId, b: LayerId) {
        for (from, to) in [(a, b), (b, a)] {
            if let Some(layer) = self.state.layers.iter_mut().find(|l| l.id == from) {
                layer.linked.push(to);
            }
        }
    }

    /// Ids of all layers in document order.
    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.state.layers.iter().map(|l| l.id).collect()
    }

    pub fn layer(&self, id: LayerId) -> Option<&LayerInfo> {
        self.state.layers.iter().find(|l| l.id == id)
    }

    pub fn guides(&self) -> &[(GuideOrientation, u32)] {
        &self.state.guides
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Recorded calls other than ruler-unit changes.
    pub fn document_ops(&self) -> Vec<Op> {
        self.ops
            .iter()
            .filter(|op| !matches!(op, Op::SetRulerUnits(_)))
            .cloned()
            .collect()
    }

    pub fn exported(&self) -> Vec<PathBuf> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Export(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut LayerInfo, CanvasError> {
        self.state
            .layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(CanvasError::UnknownLayer(id))
    }

    fn touch(&mut self, op: Op) {
        self.ops.push(op);
        self.saved = false;
    }
}

fn scale_bounds(bounds: Bounds, factor: f64) -> Bounds {
    let scale = |v: i64| (v as f64 * factor).round() as i64;
    Bounds::new(
        scale(bounds.left),
        scale(bounds.top),
        scale(bounds.right),
        scale(bounds.bottom),
    )
}

impl Canvas for RecordingCanvas {
    fn has_document(&self) -> bool {
        self.open
    }

    fn document_name(&self) -> &str {
        &self.name
    }

    fn document_dir(&self) -> Option<PathBuf> {
        self.dir.clone()
    }

    fn is_saved(&self) -> bool {
        self.saved
    }

    fn has_background_layer(&self) -> bool {
        self.background
    }

    fn ruler_units(&self) -> RulerUnits {
        self.units
    }

    fn set_ruler_units(&mut self, units: RulerUnits) {
        self.ops.push(Op::SetRulerUnits(units));
        self.units = units;
    }

    fn canvas_size(&self) -> (u32, u32) {
        (self.state.width, self.state.height)
    }

    fn list_layers(&self) -> Vec<LayerInfo> {
        self.state.layers.clone()
    }

    fn set_visible(&mut self, layer: LayerId, visible: bool) -> Result<(), CanvasError> {
        self.layer_mut(layer)?.visible = visible;
        self.touch(Op::SetVisible(layer, visible));
        Ok(())
    }

    fn translate_layer(&mut self, layer: LayerId, dx: i64, dy: i64) -> Result<(), CanvasError> {
        let info = self.layer_mut(layer)?;
        info.bounds = Bounds::new(
            info.bounds.left + dx,
            info.bounds.top + dy,
            info.bounds.right + dx,
            info.bounds.bottom + dy,
        );
        self.touch(Op::Translate(layer, dx, dy));
        Ok(())
    }

    fn scale_layer(&mut self, layer: LayerId, factor: f64) -> Result<(), CanvasError> {
        let info = self.layer_mut(layer)?;
        let b = info.bounds;
        let width = (b.width() as f64 * factor).round() as i64;
        let height = (b.height() as f64 * factor).round() as i64;
        info.bounds = Bounds::new(b.left, b.top, b.left + width, b.top + height);
        self.touch(Op::Scale(layer, factor));
        Ok(())
    }

    fn delete_all_hidden(&mut self) -> Result<(), CanvasError> {
        self.state.layers.retain(|l| l.visible);
        self.touch(Op::DeleteAllHidden);
        Ok(())
    }

    fn resize_canvas(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        self.state.width = width;
        self.state.height = height;
        self.touch(Op::ResizeCanvas(width, height));
        Ok(())
    }

    fn crop_to(&mut self, bounds: Bounds) -> Result<(), CanvasError> {
        for layer in &mut self.state.layers {
            let b = layer.bounds;
            layer.bounds = Bounds::new(
                b.left - bounds.left,
                b.top - bounds.top,
                b.right - bounds.left,
                b.bottom - bounds.top,
            );
        }
        self.state.width = bounds.width() as u32;
        self.state.height = bounds.height() as u32;
        self.touch(Op::Crop(bounds));
        Ok(())
    }

    fn resize_image(&mut self, factor: f64) -> Result<(), CanvasError> {
        for layer in &mut self.state.layers {
            layer.bounds = scale_bounds(layer.bounds, factor);
        }
        self.state.width = (f64::from(self.state.width) * factor).round() as u32;
        self.state.height = (f64::from(self.state.height) * factor).round() as u32;
        self.touch(Op::ResizeImage(factor));
        Ok(())
    }

    fn clear_guides(&mut self) -> Result<(), CanvasError> {
        self.state.guides.clear();
        self.touch(Op::ClearGuides);
        Ok(())
    }

    fn add_guide(
        &mut self,
        orientation: GuideOrientation,
        position: u32,
    ) -> Result<(), CanvasError> {
        self.state.guides.push((orientation, position));
        self.touch(Op::AddGuide(orientation, position));
        Ok(())
    }

    fn export_image(&mut self, path: &Path, _options: &ExportOptions) -> Result<(), CanvasError> {
        if let Some(limit) = self.fail_export_after {
            if self.exported().len() >= limit {
                return Err(CanvasError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
        }
        self.ops.push(Op::Export(path.to_path_buf()));
        Ok(())
    }

    fn take_snapshot(&mut self, name: &str) -> Result<(), CanvasError> {
        self.snapshots.insert(name.to_string(), self.state.clone());
        self.ops.push(Op::TakeSnapshot(name.to_string()));
        Ok(())
    }

    fn restore_snapshot(&mut self, name: &str) -> Result<(), CanvasError> {
        let state = self
            .snapshots
            .get(name)
            .cloned()
            .ok_or_else(|| CanvasError::UnknownSnapshot(name.to_string()))?;
        self.state = state;
        self.ops.push(Op::RestoreSnapshot(name.to_string()));
        Ok(())
    }

    fn delete_snapshot(&mut self, name: &str) -> Result<(), CanvasError> {
        self.snapshots
            .remove(name)
            .ok_or_else(|| CanvasError::UnknownSnapshot(name.to_string()))?;
        self.ops.push(Op::DeleteSnapshot(name.to_string()));
        Ok(())
    }
}

//! In-memory layered canvas backed by the `image` crate.
//!
//! A document is a directory named after its Ortho4XP tile (e.g.
//! `+33+126_17/`). Layer rasters and their placement are stored as PNG files
//! plus a `layout.json`:
//!
//! ```text
//! +33+126_17/
//! ├── layout.json
//! └── layers/
//!     ├── 0000.png
//!     └── 0001.png
//! ```
//!
//! A directory without `layout.json` is opened by taking every PNG/JPEG in it
//! as a layer at the origin, sorted by file name. This is how freshly
//! generated Ortho4XP textures are brought in before the first import.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    Bounds, Canvas, CanvasError, ExportFormat, ExportOptions, GuideOrientation, LayerId,
    LayerInfo, RulerUnits,
};

/// Name of the layout file inside a document directory.
pub const LAYOUT_FILE: &str = "layout.json";

/// Directory inside a document directory holding layer rasters.
pub const LAYERS_DIR: &str = "layers";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Resampling filter for layer and image scaling.
const RESAMPLE_FILTER: FilterType = FilterType::CatmullRom;

/// Pixel buffers are shared between the live state and snapshots; an
/// operation that changes pixels swaps in a new buffer.
#[derive(Debug, Clone)]
struct MemoryLayer {
    id: LayerId,
    name: String,
    image: Arc<RgbaImage>,
    x: i64,
    y: i64,
    visible: bool,
    linked: Vec<LayerId>,
}

impl MemoryLayer {
    fn bounds(&self) -> Bounds {
        Bounds::from_origin(self.x, self.y, self.image.width(), self.image.height())
    }
}

/// Everything a snapshot restores.
#[derive(Debug, Clone)]
struct DocumentState {
    width: u32,
    height: u32,
    layers: Vec<MemoryLayer>,
    background: Option<Arc<RgbaImage>>,
    guides: Vec<(GuideOrientation, u32)>,
    saved: bool,
}

#[derive(Debug)]
struct Document {
    name: String,
    /// Directory the document itself is stored in
    source: Option<PathBuf>,
    /// Directory the document lives in; export output goes below it
    location: Option<PathBuf>,
    state: DocumentState,
    snapshots: HashMap<String, DocumentState>,
    next_id: u32,
}

/// A layered RGBA document held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryCanvas {
    document: Option<Document>,
    ruler_units: RulerUnits,
}

#[derive(Debug, Serialize, Deserialize)]
struct Layout {
    width: u32,
    height: u32,
    #[serde(default)]
    background: Option<String>,
    #[serde(default)]
    guides: Vec<LayoutGuide>,
    layers: Vec<LayoutLayer>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LayoutLayer {
    name: String,
    file: String,
    x: i64,
    y: i64,
    #[serde(default = "default_visible")]
    visible: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    linked: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LayoutGuide {
    orientation: GuideOrientation,
    position: u32,
}

fn default_visible() -> bool {
    true
}

impl MemoryCanvas {
    /// A host with no open document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A new, unsaved document of the given size without layers.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            document: Some(Document {
                name: name.into(),
                source: None,
                location: None,
                state: DocumentState {
                    width,
                    height,
                    layers: Vec::new(),
                    background: None,
                    guides: Vec::new(),
                    saved: false,
                },
                snapshots: HashMap::new(),
                next_id: 0,
            }),
            ruler_units: RulerUnits::default(),
        }
    }

    /// Open a document directory.
    ///
    /// The directory name becomes the document name and its parent directory
    /// the document location.
    pub fn open(dir: &Path) -> Result<Self, CanvasError> {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                CanvasError::InvalidGeometry(format!(
                    "'{}' does not name a document directory",
                    dir.display()
                ))
            })?;

        let layout_path = dir.join(LAYOUT_FILE);
        let mut canvas = if layout_path.exists() {
            Self::open_layout(&name, dir, &layout_path)?
        } else {
            Self::open_scan(&name, dir)?
        };

        if let Some(document) = canvas.document.as_mut() {
            document.source = Some(dir.to_path_buf());
            document.location = dir.parent().map(Path::to_path_buf);
            document.state.saved = true;
        }
        Ok(canvas)
    }

    fn open_layout(name: &str, dir: &Path, layout_path: &Path) -> Result<Self, CanvasError> {
        let text =
            fs::read_to_string(layout_path).map_err(|e| CanvasError::io(layout_path, e))?;
        let layout: Layout = serde_json::from_str(&text)?;

        let mut canvas = Self::new(name, layout.width, layout.height);
        if let Some(file) = &layout.background {
            canvas.add_background_layer(load_rgba(&dir.join(file))?);
        }

        let mut ids_by_name: HashMap<String, LayerId> = HashMap::new();
        for entry in &layout.layers {
            let image = load_rgba(&dir.join(&entry.file))?;
            let id = canvas.add_layer(entry.name.clone(), image, entry.x, entry.y);
            if !entry.visible {
                canvas.set_visible(id, false)?;
            }
            ids_by_name.entry(entry.name.clone()).or_insert(id);
        }

        for entry in &layout.layers {
            let Some(&id) = ids_by_name.get(&entry.name) else {
                continue;
            };
            for linked_name in &entry.linked {
                match ids_by_name.get(linked_name) {
                    Some(&other) => canvas.link_layers(id, other)?,
                    None => warn!(
                        layer = %entry.name,
                        linked = %linked_name,
                        "Ignoring link to unknown layer"
                    ),
                }
            }
        }

        for guide in layout.guides {
            canvas.add_guide(guide.orientation, guide.position)?;
        }

        Ok(canvas)
    }

    fn open_scan(name: &str, dir: &Path) -> Result<Self, CanvasError> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| CanvasError::io(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && has_image_extension(path))
            .collect();
        files.sort();

        let mut layers = Vec::with_capacity(files.len());
        let (mut width, mut height) = (0, 0);
        for path in &files {
            let image = load_rgba(path)?;
            width = width.max(image.width());
            height = height.max(image.height());
            let layer_name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            layers.push((layer_name, image));
        }

        debug!(document = name, layers = layers.len(), "Scanned document directory");

        let mut canvas = Self::new(name, width, height);
        for (layer_name, image) in layers {
            canvas.add_layer(layer_name, image, 0, 0);
        }
        Ok(canvas)
    }

    /// Write the document back to the directory it was opened from.
    pub fn save(&mut self) -> Result<(), CanvasError> {
        let document = self.document.as_mut().ok_or(CanvasError::NoDocument)?;
        let dir = document
            .source
            .clone()
            .ok_or_else(|| CanvasError::InvalidGeometry("document has no location".into()))?;
        let layers_dir = dir.join(LAYERS_DIR);

        if layers_dir.exists() {
            fs::remove_dir_all(&layers_dir).map_err(|e| CanvasError::io(&layers_dir, e))?;
        }
        fs::create_dir_all(&layers_dir).map_err(|e| CanvasError::io(&layers_dir, e))?;

        let state = &document.state;
        let names: HashMap<LayerId, &str> = state
            .layers
            .iter()
            .map(|l| (l.id, l.name.as_str()))
            .collect();

        let mut entries = Vec::with_capacity(state.layers.len());
        for (index, layer) in state.layers.iter().enumerate() {
            let file = format!("{}/{:04}.png", LAYERS_DIR, index);
            let path = dir.join(&file);
            layer
                .image
                .save(&path)
                .map_err(|e| CanvasError::image(&path, e))?;
            entries.push(LayoutLayer {
                name: layer.name.clone(),
                file,
                x: layer.x,
                y: layer.y,
                visible: layer.visible,
                linked: layer
                    .linked
                    .iter()
                    .filter_map(|id| names.get(id).map(|n| n.to_string()))
                    .collect(),
            });
        }

        let background = match &state.background {
            Some(image) => {
                let file = format!("{}/background.png", LAYERS_DIR);
                let path = dir.join(&file);
                image.save(&path).map_err(|e| CanvasError::image(&path, e))?;
                Some(file)
            }
            None => None,
        };

        let layout = Layout {
            width: state.width,
            height: state.height,
            background,
            guides: state
                .guides
                .iter()
                .map(|&(orientation, position)| LayoutGuide {
                    orientation,
                    position,
                })
                .collect(),
            layers: entries,
        };
        let layout_path = dir.join(LAYOUT_FILE);
        fs::write(&layout_path, serde_json::to_string_pretty(&layout)?)
            .map_err(|e| CanvasError::io(&layout_path, e))?;

        document.state.saved = true;
        debug!(path = %dir.display(), "Saved document");
        Ok(())
    }

    /// Set the directory the document lives in.
    pub fn set_location(&mut self, dir: impl Into<PathBuf>) {
        if let Some(document) = self.document.as_mut() {
            document.location = Some(dir.into());
        }
    }

    /// Mark the document as having no unsaved changes.
    pub fn mark_saved(&mut self) {
        if let Some(document) = self.document.as_mut() {
            document.state.saved = true;
        }
    }

    /// Add a layer below all existing layers.
    ///
    /// Does nothing and returns `LayerId(0)` if no document is open.
    pub fn add_layer(
        &mut self,
        name: impl Into<String>,
        image: RgbaImage,
        x: i64,
        y: i64,
    ) -> LayerId {
        let Some(document) = self.document.as_mut() else {
            return LayerId(0);
        };
        let id = LayerId(document.next_id);
        document.next_id += 1;
        document.state.layers.push(MemoryLayer {
            id,
            name: name.into(),
            image: Arc::new(image),
            x,
            y,
            visible: true,
            linked: Vec::new(),
        });
        document.state.saved = false;
        id
    }

    /// Give the document a flattened background layer.
    pub fn add_background_layer(&mut self, image: RgbaImage) {
        if let Some(document) = self.document.as_mut() {
            document.state.background = Some(Arc::new(image));
            document.state.saved = false;
        }
    }

    /// Link two layers with each other.
    pub fn link_layers(&mut self, a: LayerId, b: LayerId) -> Result<(), CanvasError> {
        let state = self.state_mut()?;
        for (from, to) in [(a, b), (b, a)] {
            let layer = find_layer_mut(state, from)?;
            if !layer.linked.contains(&to) {
                layer.linked.push(to);
            }
        }
        Ok(())
    }

    /// Guides currently set on the document.
    pub fn guides(&self) -> Vec<(GuideOrientation, u32)> {
        self.document
            .as_ref()
            .map(|d| d.state.guides.clone())
            .unwrap_or_default()
    }

    /// Names of the snapshots currently recorded.
    pub fn snapshot_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .document
            .as_ref()
            .map(|d| d.snapshots.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Pixels of one layer.
    pub fn layer_image(&self, layer: LayerId) -> Option<&RgbaImage> {
        self.document
            .as_ref()?
            .state
            .layers
            .iter()
            .find(|l| l.id == layer)
            .map(|l| &*l.image)
    }

    /// Composite all visible content onto white.
    ///
    /// Layers are drawn from the bottom of the list to the top.
    pub fn flatten(&self) -> RgbaImage {
        let Some(document) = self.document.as_ref() else {
            return RgbaImage::new(0, 0);
        };
        let state = &document.state;
        let white = Rgba([255, 255, 255, 255]);
        let mut canvas = RgbaImage::from_pixel(state.width, state.height, white);

        if let Some(background) = &state.background {
            imageops::overlay(&mut canvas, &**background, 0, 0);
        }
        for layer in state.layers.iter().rev().filter(|l| l.visible) {
            imageops::overlay(&mut canvas, &*layer.image, layer.x, layer.y);
        }
        canvas
    }

    fn document_mut(&mut self) -> Result<&mut Document, CanvasError> {
        self.document.as_mut().ok_or(CanvasError::NoDocument)
    }

    /// Mutable state of the open document, marked as modified.
    fn state_mut(&mut self) -> Result<&mut DocumentState, CanvasError> {
        let state = &mut self.document_mut()?.state;
        state.saved = false;
        Ok(state)
    }
}

fn find_layer_mut(
    state: &mut DocumentState,
    id: LayerId,
) -> Result<&mut MemoryLayer, CanvasError> {
    state
        .layers
        .iter_mut()
        .find(|l| l.id == id)
        .ok_or(CanvasError::UnknownLayer(id))
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn load_rgba(path: &Path) -> Result<RgbaImage, CanvasError> {
    Ok(image::open(path)
        .map_err(|e| CanvasError::image(path, e))?
        .to_rgba8())
}

fn scaled(value: u32, factor: f64) -> u32 {
    ((f64::from(value) * factor).round() as u32).max(1)
}

fn check_factor(factor: f64) -> Result<(), CanvasError> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(CanvasError::InvalidGeometry(format!(
            "scale factor must be positive, got {}",
            factor
        )))
    }
}

impl Canvas for MemoryCanvas {
    fn has_document(&self) -> bool {
        self.document.is_some()
    }

    fn document_name(&self) -> &str {
        self.document.as_ref().map(|d| d.name.as_str()).unwrap_or("")
    }

    fn document_dir(&self) -> Option<PathBuf> {
        self.document.as_ref()?.location.clone()
    }

    fn is_saved(&self) -> bool {
        self.document.as_ref().is_some_and(|d| d.state.saved)
    }

    fn has_background_layer(&self) -> bool {
        self.document
            .as_ref()
            .is_some_and(|d| d.state.background.is_some())
    }

    fn ruler_units(&self) -> RulerUnits {
        self.ruler_units
    }

    fn set_ruler_units(&mut self, units: RulerUnits) {
        self.ruler_units = units;
    }

    fn canvas_size(&self) -> (u32, u32) {
        self.document
            .as_ref()
            .map(|d| (d.state.width, d.state.height))
            .unwrap_or((0, 0))
    }

    fn list_layers(&self) -> Vec<LayerInfo> {
        let Some(document) = self.document.as_ref() else {
            return Vec::new();
        };
        document
            .state
            .layers
            .iter()
            .map(|layer| LayerInfo {
                id: layer.id,
                name: layer.name.clone(),
                bounds: layer.bounds(),
                linked: layer.linked.clone(),
                visible: layer.visible,
            })
            .collect()
    }

    fn set_visible(&mut self, layer: LayerId, visible: bool) -> Result<(), CanvasError> {
        find_layer_mut(self.state_mut()?, layer)?.visible = visible;
        Ok(())
    }

    fn translate_layer(&mut self, layer: LayerId, dx: i64, dy: i64) -> Result<(), CanvasError> {
        let layer = find_layer_mut(self.state_mut()?, layer)?;
        layer.x = layer.x.saturating_add(dx);
        layer.y = layer.y.saturating_add(dy);
        Ok(())
    }

    fn scale_layer(&mut self, layer: LayerId, factor: f64) -> Result<(), CanvasError> {
        check_factor(factor)?;
        let layer = find_layer_mut(self.state_mut()?, layer)?;
        let width = scaled(layer.image.width(), factor);
        let height = scaled(layer.image.height(), factor);
        layer.image = Arc::new(imageops::resize(&*layer.image, width, height, RESAMPLE_FILTER));
        Ok(())
    }

    fn delete_all_hidden(&mut self) -> Result<(), CanvasError> {
        let state = self.state_mut()?;
        state.layers.retain(|l| l.visible);
        let remaining: Vec<LayerId> = state.layers.iter().map(|l| l.id).collect();
        for layer in &mut state.layers {
            layer.linked.retain(|id| remaining.contains(id));
        }
        Ok(())
    }

    fn resize_canvas(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        let state = self.state_mut()?;
        state.width = width;
        state.height = height;
        if let Some(background) = state.background.as_mut() {
            let mut extended = RgbaImage::new(width, height);
            imageops::overlay(&mut extended, &**background, 0, 0);
            *background = Arc::new(extended);
        }
        Ok(())
    }

    fn crop_to(&mut self, bounds: Bounds) -> Result<(), CanvasError> {
        let (width, height) = (bounds.width(), bounds.height());
        if width <= 0 || height <= 0 {
            return Err(CanvasError::InvalidGeometry(format!(
                "cannot crop to empty bounds {}",
                bounds
            )));
        }
        let width = u32::try_from(width)
            .map_err(|_| CanvasError::InvalidGeometry(format!("crop too wide: {}", bounds)))?;
        let height = u32::try_from(height)
            .map_err(|_| CanvasError::InvalidGeometry(format!("crop too tall: {}", bounds)))?;

        let state = self.state_mut()?;
        for layer in &mut state.layers {
            layer.x -= bounds.left;
            layer.y -= bounds.top;
        }
        if let Some(background) = state.background.as_mut() {
            let mut cropped = RgbaImage::new(width, height);
            imageops::overlay(&mut cropped, &**background, -bounds.left, -bounds.top);
            *background = Arc::new(cropped);
        }
        state.guides.retain_mut(|(orientation, position)| {
            let (offset, limit) = match orientation {
                GuideOrientation::Vertical => (bounds.left, width),
                GuideOrientation::Horizontal => (bounds.top, height),
            };
            let shifted = i64::from(*position) - offset;
            match u32::try_from(shifted) {
                Ok(p) if p <= limit => {
                    *position = p;
                    true
                }
                _ => false,
            }
        });
        state.width = width;
        state.height = height;
        Ok(())
    }

    fn resize_image(&mut self, factor: f64) -> Result<(), CanvasError> {
        check_factor(factor)?;
        let state = self.state_mut()?;
        let width = scaled(state.width, factor);
        let height = scaled(state.height, factor);

        for layer in &mut state.layers {
            let layer_width = scaled(layer.image.width(), factor);
            let layer_height = scaled(layer.image.height(), factor);
            layer.image = Arc::new(imageops::resize(
                &*layer.image,
                layer_width,
                layer_height,
                RESAMPLE_FILTER,
            ));
            layer.x = (layer.x as f64 * factor).round() as i64;
            layer.y = (layer.y as f64 * factor).round() as i64;
        }
        if let Some(background) = state.background.as_mut() {
            *background = Arc::new(imageops::resize(&**background, width, height, RESAMPLE_FILTER));
        }
        for (_, position) in &mut state.guides {
            *position = (f64::from(*position) * factor).round() as u32;
        }
        state.width = width;
        state.height = height;
        Ok(())
    }

    fn clear_guides(&mut self) -> Result<(), CanvasError> {
        self.state_mut()?.guides.clear();
        Ok(())
    }

    fn add_guide(
        &mut self,
        orientation: GuideOrientation,
        position: u32,
    ) -> Result<(), CanvasError> {
        self.state_mut()?.guides.push((orientation, position));
        Ok(())
    }

    fn export_image(&mut self, path: &Path, options: &ExportOptions) -> Result<(), CanvasError> {
        if self.document.is_none() {
            return Err(CanvasError::NoDocument);
        }
        let rgb = DynamicImage::ImageRgba8(self.flatten()).to_rgb8();

        match options.format {
            ExportFormat::BaselineJpeg => {
                let file = File::create(path).map_err(|e| CanvasError::io(path, e))?;
                let mut writer = BufWriter::new(file);
                JpegEncoder::new_with_quality(&mut writer, options.quality)
                    .write_image(
                        rgb.as_raw(),
                        rgb.width(),
                        rgb.height(),
                        ExtendedColorType::Rgb8,
                    )
                    .map_err(|e| CanvasError::image(path, e))?;
            }
        }
        Ok(())
    }

    fn take_snapshot(&mut self, name: &str) -> Result<(), CanvasError> {
        let document = self.document_mut()?;
        let state = document.state.clone();
        document.snapshots.insert(name.to_string(), state);
        Ok(())
    }

    fn restore_snapshot(&mut self, name: &str) -> Result<(), CanvasError> {
        let document = self.document_mut()?;
        let state = document
            .snapshots
            .get(name)
            .cloned()
            .ok_or_else(|| CanvasError::UnknownSnapshot(name.to_string()))?;
        document.state = state;
        Ok(())
    }

    fn delete_snapshot(&mut self, name: &str) -> Result<(), CanvasError> {
        self.document_mut()?
            .snapshots
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CanvasError::UnknownSnapshot(name.to_string()))
    }
}

//! Value types exchanged with a canvas.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a layer within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pixel rectangle, `right` and `bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl Bounds {
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle of `width`×`height` pixels with its top-left at `(x, y)`.
    pub fn from_origin(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self::new(x, y, x + i64::from(width), y + i64::from(height))
    }

    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// Whether the interiors of both rectangles intersect.
    ///
    /// Rectangles that only share an edge do not overlap. The test is
    /// symmetric.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Snapshot of one layer as reported by [`super::Canvas::list_layers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    pub id: LayerId,
    pub name: String,
    pub bounds: Bounds,
    /// Layers linked to this one (e.g. clipping masks)
    pub linked: Vec<LayerId>,
    pub visible: bool,
}

/// Ruler unit preference of the host.
///
/// Runs switch to [`RulerUnits::Pixels`] and restore the previous value when
/// they finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RulerUnits {
    #[default]
    Pixels,
    Inches,
    Centimeters,
    Millimeters,
    Points,
    Picas,
    Percent,
}

/// Direction of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideOrientation {
    Horizontal,
    Vertical,
}

/// Encoded image format for exported textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Standard baseline JPEG without alpha
    #[default]
    BaselineJpeg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::BaselineJpeg => "jpg",
        }
    }
}

/// JPEG quality used for exported textures.
pub const EXPORT_JPEG_QUALITY: u8 = 90;

/// Options passed to [`super::Canvas::export_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Encoder quality, 1-100
    pub quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::BaselineJpeg,
            quality: EXPORT_JPEG_QUALITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_origin() {
        let bounds = Bounds::from_origin(4096, 2048, 4096, 4096);
        assert_eq!(bounds, Bounds::new(4096, 2048, 8192, 6144));
        assert_eq!(bounds.width(), 4096);
        assert_eq!(bounds.height(), 4096);
    }

    #[test]
    fn test_bounds_overlap_partial() {
        let a = Bounds::new(0, 0, 100, 100);
        let b = Bounds::new(50, 50, 150, 150);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_bounds_touching_edges_do_not_overlap() {
        let a = Bounds::new(0, 0, 100, 100);
        let right = Bounds::new(100, 0, 200, 100);
        let below = Bounds::new(0, 100, 100, 200);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_bounds_containment_overlaps() {
        let outer = Bounds::new(0, 0, 4096, 4096);
        let inner = Bounds::new(1024, 1024, 2048, 2048);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_export_options_default() {
        let options = ExportOptions::default();
        assert_eq!(options.format, ExportFormat::BaselineJpeg);
        assert_eq!(options.quality, EXPORT_JPEG_QUALITY);
        assert_eq!(options.format.extension(), "jpg");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn bounds() -> impl Strategy<Value = Bounds> {
            (-5000i64..5000, -5000i64..5000, 1i64..5000, 1i64..5000)
                .prop_map(|(x, y, w, h)| Bounds::new(x, y, x + w, y + h))
        }

        proptest! {
            #[test]
            fn test_overlap_is_symmetric(a in bounds(), b in bounds()) {
                prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            }

            #[test]
            fn test_non_empty_bounds_overlap_themselves(a in bounds()) {
                prop_assert!(a.overlaps(&a));
            }
        }
    }
}

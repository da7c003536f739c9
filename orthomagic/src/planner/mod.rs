//! Placement and export planning.
//!
//! Planners are pure: they read a [`GeoCell`](crate::coord::GeoCell) and the
//! layer list captured at the start of a run and decide what should happen to
//! each layer. Carrying out those decisions against a canvas is the job of
//! [`crate::workflow`].

pub mod export;
pub mod import;

pub use export::{ExportDecision, ExportJob, ExportPlanner, TileLayer, ZoomGroups, EXPORT_DIR};
pub use import::{ImportPlanner, LayerPlacement, PlacementMode, MAX_TEXTURES_PER_EDGE};

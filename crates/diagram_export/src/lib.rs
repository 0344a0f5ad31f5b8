//! Diagram Export - SVG, native presentation, and raster output
//!
//! This crate turns a diagram into files: SVG markup built from shape
//! geometry, a single-slide PPTX with editable DrawingML shapes, and PNG/JPEG
//! bitmaps captured from the canvas renderer. It also owns the persisted
//! application settings.

mod error;
mod exporter;
mod file_name;
mod guard;
pub mod pptx;
pub mod raster;
pub mod settings;
pub mod svg;

pub use error::*;
pub use exporter::*;
pub use file_name::*;
pub use guard::*;
pub use pptx::{export_pptx, PptxExportReport, PptxExporter, SkippedShape};
pub use raster::{RasterFormat, Snapshot, SnapshotRenderer};
pub use settings::{AppSettings, ExportSettings, SettingsManager};
pub use svg::export_svg;

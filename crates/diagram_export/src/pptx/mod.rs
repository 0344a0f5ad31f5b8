//! Native presentation export
//!
//! The diagram becomes a one-slide PPTX whose shapes are real DrawingML
//! objects, so they stay editable in presentation software. Canvas units map
//! to EMU through a single factor, `slide width / canvas width`.

mod package;
mod presets;
mod slide_writer;

pub use package::{PptxWriter, SlideSize};
pub use presets::{
    map_shape, EmuRect, Frame, Outline, Paragraph, SlideObject, SlideObjectKind, SolidColor,
    TextStyle,
};
pub use slide_writer::SlideWriter;

use crate::settings::ExportSettings;
use crate::{ExportError, Result};
use diagram_model::{Diagram, ShapeId};
use std::io::Cursor;

/// A shape left out of the presentation
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedShape {
    pub id: ShapeId,
    pub shape_type: String,
    pub reason: String,
}

/// What a PPTX export produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PptxExportReport {
    pub exported: usize,
    pub skipped: Vec<SkippedShape>,
}

impl PptxExportReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// PPTX exporter configured with a slide size
#[derive(Debug, Clone, Copy)]
pub struct PptxExporter {
    slide: SlideSize,
}

impl Default for PptxExporter {
    fn default() -> Self {
        Self::from_settings(&ExportSettings::default())
    }
}

impl PptxExporter {
    pub fn new(slide: SlideSize) -> Self {
        Self { slide }
    }

    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self::new(SlideSize {
            cx: settings.slide_width_emu,
            cy: settings.slide_height_emu,
        })
    }

    /// EMU per canvas unit
    pub fn scale(&self, diagram: &Diagram) -> f64 {
        self.slide.cx as f64 / diagram.canvas.width
    }

    /// Map every shape; failures are logged and reported instead of aborting
    pub fn slide_objects(&self, diagram: &Diagram) -> (Vec<SlideObject>, PptxExportReport) {
        let scale = self.scale(diagram);
        let mut objects = Vec::with_capacity(diagram.len());
        let mut report = PptxExportReport::default();

        for (index, shape) in diagram.shapes().iter().enumerate() {
            match map_shape(shape, scale, index) {
                Ok(object) => objects.push(object),
                Err(e) => {
                    tracing::warn!("Skipping shape {} ({}) in PPTX export: {}", shape.id, shape.type_name(), e);
                    let reason = match e {
                        ExportError::UnsupportedShape(_, reason) => reason,
                        other => other.to_string(),
                    };
                    report.skipped.push(SkippedShape {
                        id: shape.id.clone(),
                        shape_type: shape.type_name().to_string(),
                        reason,
                    });
                }
            }
        }
        report.exported = objects.len();
        (objects, report)
    }

    /// Build the complete `.pptx` package
    pub fn export(&self, diagram: &Diagram) -> Result<(Vec<u8>, PptxExportReport)> {
        let (objects, report) = self.slide_objects(diagram);
        let background = diagram
            .canvas
            .background
            .resolve()
            .and_then(presets::solid_color);
        let slide_xml = SlideWriter::new().with_background(background).write(&objects)?;

        let buffer = PptxWriter::new(Cursor::new(Vec::new())).write(&slide_xml, self.slide)?;
        tracing::debug!(
            "Exported {} shapes to PPTX ({} skipped)",
            report.exported,
            report.skipped.len()
        );
        Ok((buffer.into_inner(), report))
    }
}

/// Export with the default 16:9 slide
pub fn export_pptx(diagram: &Diagram) -> Result<(Vec<u8>, PptxExportReport)> {
    PptxExporter::default().export(diagram)
}

//! Export entry point
//!
//! Wraps each format behind the per-target guard, so a second request for an
//! export that is still running fails fast instead of queueing.

use crate::pptx::{PptxExportReport, PptxExporter};
use crate::raster::{self, RasterFormat, SnapshotRenderer};
use crate::settings::ExportSettings;
use crate::{export_file_name, svg, ExportGuard, ExportTarget, Result};
use diagram_model::Diagram;

/// Bytes of one finished export plus the name to save them under
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutput {
    pub target: ExportTarget,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportOutput {
    fn new(diagram: &Diagram, target: ExportTarget, bytes: Vec<u8>) -> Self {
        Self {
            target,
            file_name: export_file_name(&diagram.title, target),
            bytes,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.target.mime_type()
    }
}

/// Runs exports with shared settings and in-progress tracking
#[derive(Debug, Clone, Default)]
pub struct DiagramExporter {
    settings: ExportSettings,
    guard: ExportGuard,
}

impl DiagramExporter {
    pub fn new(settings: ExportSettings) -> Self {
        Self {
            settings,
            guard: ExportGuard::new(),
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn guard(&self) -> &ExportGuard {
        &self.guard
    }

    pub fn export_svg(&self, diagram: &Diagram) -> Result<ExportOutput> {
        let _ticket = self.guard.begin(ExportTarget::Svg)?;
        let markup = svg::export_svg(diagram, self.settings.svg_padding);
        Ok(ExportOutput::new(diagram, ExportTarget::Svg, markup.into_bytes()))
    }

    pub fn export_pptx(&self, diagram: &Diagram) -> Result<(ExportOutput, PptxExportReport)> {
        let _ticket = self.guard.begin(ExportTarget::Pptx)?;
        let (bytes, report) = PptxExporter::from_settings(&self.settings).export(diagram)?;
        Ok((ExportOutput::new(diagram, ExportTarget::Pptx, bytes), report))
    }

    /// The ticket is held across the renderer awaits
    pub async fn export_raster<R: SnapshotRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        diagram: &Diagram,
        format: RasterFormat,
    ) -> Result<ExportOutput> {
        let target = ExportTarget::from(format);
        let _ticket = self.guard.begin(target)?;
        let bytes = raster::export_raster(renderer, diagram, format, &self.settings).await?;
        Ok(ExportOutput::new(diagram, target, bytes))
    }

    pub async fn thumbnail<R: SnapshotRenderer + ?Sized>(&self, renderer: &mut R) -> Result<String> {
        raster::thumbnail_data_url(renderer, &self.settings).await
    }
}

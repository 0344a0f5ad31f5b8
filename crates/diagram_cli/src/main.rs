//! `diagram-export`: render a saved diagram record to SVG or PPTX
//!
//! Raster formats need the live canvas renderer and are only available from
//! the editor.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use diagram_export::{export_file_name, DiagramExporter, ExportSettings, ExportTarget, SettingsManager};
use diagram_model::DiagramRecord;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Svg,
    Pptx,
}

impl From<Format> for ExportTarget {
    fn from(format: Format) -> Self {
        match format {
            Format::Svg => ExportTarget::Svg,
            Format::Pptx => ExportTarget::Pptx,
        }
    }
}

/// Export a saved diagram without opening the editor
#[derive(Parser, Debug)]
#[command(name = "diagram-export")]
#[command(version, about, long_about = None)]
struct Args {
    /// Diagram record (JSON) to export
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output format
    #[arg(long, short, value_enum, default_value = "svg")]
    format: Format,

    /// Output path; defaults to a name derived from the diagram title, next to the input
    #[arg(long, short, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Directory holding settings.json
    #[arg(long, value_name = "DIR")]
    settings: Option<PathBuf>,

    /// Override the SVG padding around the drawing
    #[arg(long)]
    padding: Option<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let diagram = DiagramRecord::load_from_path(&args.input)
        .and_then(DiagramRecord::into_diagram)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let mut settings = load_settings(args.settings.as_deref())?;
    if let Some(padding) = args.padding {
        settings.svg_padding = padding;
    }
    let exporter = DiagramExporter::new(settings);

    let output = match args.format {
        Format::Svg => exporter.export_svg(&diagram)?,
        Format::Pptx => {
            let (output, report) = exporter.export_pptx(&diagram)?;
            for skipped in &report.skipped {
                tracing::warn!("{} ({}) was not exported: {}", skipped.id, skipped.shape_type, skipped.reason);
            }
            output
        }
    };

    let path = args.out.unwrap_or_else(|| {
        let name = export_file_name(&diagram.title, args.format.into());
        args.input.with_file_name(name)
    });
    fs::write(&path, &output.bytes).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("Wrote {} ({} bytes)", path.display(), output.bytes.len());
    Ok(())
}

fn load_settings(dir: Option<&Path>) -> Result<ExportSettings> {
    let Some(dir) = dir else {
        return Ok(ExportSettings::default());
    };
    let mut manager = SettingsManager::new(dir);
    let settings = manager
        .load_sync()
        .with_context(|| format!("failed to read settings from {}", dir.display()))?;
    Ok(settings.export.clone())
}

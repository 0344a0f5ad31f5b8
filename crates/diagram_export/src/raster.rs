//! Raster export (PNG, JPEG, thumbnails)
//!
//! Drawing is delegated to the canvas renderer: the exporter waits until the
//! renderer has its fonts and images loaded, asks for a snapshot at a pixel
//! ratio, and only encodes the pixels it gets back.

use crate::settings::ExportSettings;
use crate::{ExportError, ExportTarget, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use diagram_model::{Diagram, ShapeColor};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// RGBA8 pixels captured from the renderer, row-major, not premultiplied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Snapshot {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self { width, height, pixels }
    }

    fn into_image(self) -> Result<RgbaImage> {
        if self.width == 0 || self.height == 0 || self.pixels.is_empty() {
            return Err(ExportError::EmptySnapshot);
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.pixels.len() != expected {
            return Err(ExportError::Renderer(format!(
                "snapshot is {}x{} but carries {} bytes, expected {}",
                self.width,
                self.height,
                self.pixels.len(),
                expected
            )));
        }
        RgbaImage::from_raw(self.width, self.height, self.pixels).ok_or(ExportError::EmptySnapshot)
    }
}

/// The canvas renderer's snapshot capability
#[async_trait]
pub trait SnapshotRenderer: Send {
    /// Resolves once pending fonts and images have loaded
    async fn ready(&mut self) -> Result<()>;

    /// Capture the current drawing at `pixel_ratio` device pixels per canvas unit
    async fn snapshot(&mut self, pixel_ratio: f64) -> Result<Snapshot>;
}

/// Bitmap output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl From<RasterFormat> for ExportTarget {
    fn from(format: RasterFormat) -> Self {
        match format {
            RasterFormat::Png => ExportTarget::Png,
            RasterFormat::Jpeg => ExportTarget::Jpeg,
        }
    }
}

/// Snapshot the renderer and encode the result
pub async fn export_raster<R: SnapshotRenderer + ?Sized>(
    renderer: &mut R,
    diagram: &Diagram,
    format: RasterFormat,
    settings: &ExportSettings,
) -> Result<Vec<u8>> {
    let ratio = settings.raster_ratio();
    let snapshot = capture(renderer, ratio).await?;
    let (width, height) = (snapshot.width, snapshot.height);

    let bytes = match format {
        RasterFormat::Png => encode_png(snapshot)?,
        RasterFormat::Jpeg => {
            let background = jpeg_background(diagram, settings);
            encode_jpeg(snapshot, background, settings.jpeg_quality())?
        }
    };
    tracing::debug!(
        "Exported {}x{} {} at {}x ({} bytes)",
        width,
        height,
        ExportTarget::from(format),
        ratio,
        bytes.len()
    );
    Ok(bytes)
}

/// Small PNG preview as a `data:` URL, for the stored `thumbnailDataUrl`
pub async fn thumbnail_data_url<R: SnapshotRenderer + ?Sized>(
    renderer: &mut R,
    settings: &ExportSettings,
) -> Result<String> {
    let ratio = if settings.thumbnail_ratio > 0.0 && settings.thumbnail_ratio.is_finite() {
        settings.thumbnail_ratio
    } else {
        ExportSettings::default().thumbnail_ratio
    };
    let snapshot = capture(renderer, ratio).await?;
    let png = encode_png(snapshot)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

async fn capture<R: SnapshotRenderer + ?Sized>(renderer: &mut R, ratio: f64) -> Result<Snapshot> {
    renderer.ready().await?;
    renderer.snapshot(ratio).await
}

// =============================================================================
// Encoding
// =============================================================================

pub fn encode_png(snapshot: Snapshot) -> Result<Vec<u8>> {
    let image = DynamicImage::ImageRgba8(snapshot.into_image()?);
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// JPEG has no alpha channel, so pixels are composited onto `background` first
pub fn encode_jpeg(snapshot: Snapshot, background: ShapeColor, quality: u8) -> Result<Vec<u8>> {
    let flat = flatten(&snapshot.into_image()?, background);
    let mut buffer = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    encoder.encode_image(&flat)?;
    Ok(buffer.into_inner())
}

/// Source-over composite of every pixel onto an opaque color
pub fn flatten(image: &RgbaImage, background: ShapeColor) -> RgbImage {
    let bg = [background.r, background.g, background.b];
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let px = image.get_pixel(x, y).0;
        let alpha = u32::from(px[3]);
        let blend = |c: u8, b: u8| ((u32::from(c) * alpha + u32::from(b) * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(px[0], bg[0]), blend(px[1], bg[1]), blend(px[2], bg[2])])
    })
}

/// Canvas background when it is opaque, else the configured fallback, else white
fn jpeg_background(diagram: &Diagram, settings: &ExportSettings) -> ShapeColor {
    let opaque = |color: ShapeColor| (color.a == 255).then_some(color);
    diagram
        .canvas
        .background
        .resolve()
        .and_then(opaque)
        .or_else(|| settings.jpeg_background.resolve().and_then(opaque))
        .unwrap_or(ShapeColor::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_model::{Canvas, Paint};

    /// Renderer that paints an 8x4 canvas scaled by the pixel ratio
    #[derive(Default)]
    struct FakeRenderer {
        ready_calls: usize,
        ratios: Vec<f64>,
        fail_ready: bool,
    }

    #[async_trait]
    impl SnapshotRenderer for FakeRenderer {
        async fn ready(&mut self) -> Result<()> {
            self.ready_calls += 1;
            if self.fail_ready {
                return Err(ExportError::Renderer("font load failed".to_string()));
            }
            Ok(())
        }

        async fn snapshot(&mut self, pixel_ratio: f64) -> Result<Snapshot> {
            self.ratios.push(pixel_ratio);
            let width = (8.0 * pixel_ratio).round().max(1.0) as u32;
            let height = (4.0 * pixel_ratio).round().max(1.0) as u32;
            let mut pixels = Vec::new();
            for i in 0..width * height {
                // left half opaque red, right half transparent
                if i % width < width / 2 {
                    pixels.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    pixels.extend_from_slice(&[0, 0, 0, 0]);
                }
            }
            Ok(Snapshot::new(width, height, pixels))
        }
    }

    fn diagram() -> Diagram {
        Diagram::new("Raster", Canvas::new(8.0, 4.0))
    }

    #[tokio::test]
    async fn test_png_export_waits_for_ready() {
        let mut renderer = FakeRenderer::default();
        let bytes = export_raster(&mut renderer, &diagram(), RasterFormat::Png, &ExportSettings::default())
            .await
            .unwrap();
        assert_eq!(renderer.ready_calls, 1);
        assert_eq!(renderer.ratios, vec![1.0]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
    }

    #[tokio::test]
    async fn test_double_pixel_ratio() {
        let mut renderer = FakeRenderer::default();
        let settings = ExportSettings { pixel_ratio: 2.0, ..Default::default() };
        let bytes = export_raster(&mut renderer, &diagram(), RasterFormat::Png, &settings)
            .await
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[tokio::test]
    async fn test_jpeg_is_flattened() {
        let mut renderer = FakeRenderer::default();
        let mut d = diagram();
        d.canvas.background = Paint::none();
        let settings = ExportSettings {
            jpeg_background: Paint::from_color(ShapeColor::rgb(0, 0, 255)),
            ..Default::default()
        };
        let bytes = export_raster(&mut renderer, &d, RasterFormat::Jpeg, &settings)
            .await
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        // the transparent half takes the blue fallback, the opaque half stays red
        let left = decoded.get_pixel(0, 2).0;
        let right = decoded.get_pixel(7, 2).0;
        assert!(left[0] > left[2], "unexpected pixel {:?}", left);
        assert!(right[2] > right[0], "unexpected pixel {:?}", right);
    }

    #[tokio::test]
    async fn test_ready_failure_propagates() {
        let mut renderer = FakeRenderer { fail_ready: true, ..Default::default() };
        let result = export_raster(&mut renderer, &diagram(), RasterFormat::Png, &ExportSettings::default()).await;
        assert!(matches!(result, Err(ExportError::Renderer(_))));
        assert!(renderer.ratios.is_empty());
    }

    #[tokio::test]
    async fn test_thumbnail_data_url() {
        let mut renderer = FakeRenderer::default();
        let url = thumbnail_data_url(&mut renderer, &ExportSettings::default()).await.unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(renderer.ratios, vec![0.25]);
        let payload = url.trim_start_matches("data:image/png;base64,");
        let png = STANDARD.decode(payload).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2, 1));
    }

    #[test]
    fn test_empty_snapshot_rejected() {
        assert!(matches!(encode_png(Snapshot::new(0, 0, vec![])), Err(ExportError::EmptySnapshot)));
        assert!(matches!(
            encode_png(Snapshot::new(2, 2, vec![0; 3])),
            Err(ExportError::Renderer(_))
        ));
    }

    #[test]
    fn test_flatten_blends() {
        let image = RgbaImage::from_raw(2, 1, vec![255, 255, 255, 255, 255, 255, 255, 0]).unwrap();
        let flat = flatten(&image, ShapeColor::BLACK);
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(flat.get_pixel(1, 0).0, [0, 0, 0]);

        let half = RgbaImage::from_raw(1, 1, vec![255, 0, 0, 128]).unwrap();
        assert_eq!(flatten(&half, ShapeColor::BLACK).get_pixel(0, 0).0, [128, 0, 0]);
    }

    #[test]
    fn test_jpeg_background_prefers_opaque_canvas() {
        let d = diagram();
        assert_eq!(jpeg_background(&d, &ExportSettings::default()), ShapeColor::WHITE);
        let mut tinted = diagram();
        tinted.canvas.background = Paint::new("#102030");
        assert_eq!(jpeg_background(&tinted, &ExportSettings::default()), ShapeColor::rgb(16, 32, 48));
    }
}

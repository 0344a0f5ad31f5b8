//! Canvas (artboard) settings

use crate::geometry::Bounds;
use crate::{Paint, ShapeColor};
use serde::{Deserialize, Serialize};

/// Smallest zoom factor the view accepts
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom factor the view accepts
pub const MAX_ZOOM: f64 = 8.0;

/// Drawing surface; size is in canvas units and independent of zoom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub background: Paint,
    /// View-only magnification; stored coordinates never depend on it
    pub zoom: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: Paint::from_color(ShapeColor::WHITE),
            zoom: 1.0,
        }
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: crate::clamp_dimension(width),
            height: crate::clamp_dimension(height),
            ..Default::default()
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom.is_finite() { zoom.clamp(MIN_ZOOM, MAX_ZOOM) } else { 1.0 };
    }

    /// The whole canvas as a box
    pub fn bounds(&self) -> Bounds {
        Bounds::new(0.0, 0.0, self.width, self.height)
    }

    /// Map canvas-space bounds into screen space under the current zoom
    pub fn to_screen(&self, b: &Bounds) -> Bounds {
        b.scaled(self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_is_clamped() {
        let mut canvas = Canvas::default();
        canvas.set_zoom(100.0);
        assert_eq!(canvas.zoom, MAX_ZOOM);
        canvas.set_zoom(f64::NAN);
        assert_eq!(canvas.zoom, 1.0);
    }

    #[test]
    fn test_to_screen_scales_by_zoom() {
        let mut canvas = Canvas::new(400.0, 300.0);
        canvas.set_zoom(2.0);
        let screen = canvas.to_screen(&Bounds::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(screen, Bounds::new(20.0, 40.0, 60.0, 80.0));
        assert_eq!(canvas.bounds().width, 400.0);
    }
}

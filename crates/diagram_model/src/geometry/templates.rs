//! Fixed path templates for shapes too irregular to regenerate on resize
//!
//! A templated shape stores only its box; renderers and exporters scale the
//! template's viewBox onto that box. The path itself never changes.

use crate::geometry::Bounds;
use crate::shape::ShapeKind;

/// SVG path drawn inside a fixed viewBox
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathTemplate {
    pub path: &'static str,
    pub view_width: f64,
    pub view_height: f64,
}

/// Translate-then-scale mapping from template space to canvas space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl TemplateTransform {
    /// Render as an SVG `transform` attribute value
    pub fn to_svg(&self) -> String {
        format!(
            "translate({} {}) scale({} {})",
            fmt_num(self.translate_x),
            fmt_num(self.translate_y),
            fmt_num(self.scale_x),
            fmt_num(self.scale_y)
        )
    }
}

impl PathTemplate {
    /// Transform that stretches this template's viewBox over `target`
    pub fn transform_into(&self, target: &Bounds) -> TemplateTransform {
        TemplateTransform {
            translate_x: target.x,
            translate_y: target.y,
            scale_x: target.width / self.view_width,
            scale_y: target.height / self.view_height,
        }
    }
}

pub const CYLINDER_TEMPLATE: PathTemplate = PathTemplate {
    path: "M0,12 A50,12 0 0,1 100,12 L100,88 A50,12 0 0,1 0,88 Z M0,12 A50,12 0 0,0 100,12",
    view_width: 100.0,
    view_height: 100.0,
};

pub const DOCUMENT_TEMPLATE: PathTemplate = PathTemplate {
    path: "M0,0 L100,0 L100,86 C80,74 60,78 45,88 C30,98 12,98 0,90 Z",
    view_width: 100.0,
    view_height: 100.0,
};

pub const CLOUD_TEMPLATE: PathTemplate = PathTemplate {
    path: "M24,70 A16,16 0 0,1 14,42 A20,20 0 0,1 40,18 A24,24 0 0,1 80,22 A18,18 0 0,1 92,56 \
           A16,16 0 0,1 70,76 A20,20 0 0,1 40,78 A14,14 0 0,1 24,70 Z \
           M22,86 A5,5 0 1,0 32,86 A5,5 0 1,0 22,86 Z \
           M8,96 A3,3 0 1,0 14,96 A3,3 0 1,0 8,96 Z",
    view_width: 100.0,
    view_height: 100.0,
};

/// Speech balloon with its tail at the lower left, drawn in a 231x156 box
pub const CALLOUT_OVAL_TEMPLATE: PathTemplate = PathTemplate {
    path: "M115.5,2 C178,2 229,30 229,65 C229,100 178,128 115.5,128 C105,128 95,127.5 86,126 \
           L58,154 L66,123 C30,114 2,92 2,65 C2,30 53,2 115.5,2 Z",
    view_width: 231.0,
    view_height: 156.0,
};

/// Default template for a templated shape kind
pub fn template_for(kind: &ShapeKind) -> Option<&'static PathTemplate> {
    match kind {
        ShapeKind::Cylinder(_) => Some(&CYLINDER_TEMPLATE),
        ShapeKind::Document(_) => Some(&DOCUMENT_TEMPLATE),
        ShapeKind::CalloutCloud(_) => Some(&CLOUD_TEMPLATE),
        ShapeKind::CalloutOval(c) if c.path_data.is_some() => Some(&CALLOUT_OVAL_TEMPLATE),
        _ => None,
    }
}

/// Path data to draw for a templated shape: the stored template, else the default
pub fn template_path(kind: &ShapeKind) -> Option<&str> {
    let stored = match kind {
        ShapeKind::Cylinder(t) | ShapeKind::Document(t) | ShapeKind::CalloutCloud(t) => {
            t.path_data.as_deref()
        }
        ShapeKind::CalloutOval(c) => c.path_data.as_deref(),
        _ => None,
    };
    stored.or_else(|| template_for(kind).map(|t| t.path))
}

/// Format a coordinate without trailing zeros
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{:.3}", rounded);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

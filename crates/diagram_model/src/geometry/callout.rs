//! Callout balloon outlines

use crate::geometry::templates::{fmt_num, template_path, TemplateTransform};
use crate::geometry::bounds::callout_oval_template_transform;
use crate::shape::{CalloutOval, CalloutRect, Shape, ShapeKind, TailDirection};
use std::fmt::Write;

/// Half-angle, in degrees, of the tail base on an oval balloon
const OVAL_TAIL_HALF_ANGLE: f64 = 12.0;

/// How a callout oval should be drawn
#[derive(Debug, Clone, PartialEq)]
pub enum OvalPath {
    /// Precomputed balloon; draw `path` under `transform`
    Template { path: String, transform: TemplateTransform },
    /// Generated outline in canvas coordinates
    Analytic(String),
}

/// Rounded body with a triangular tail, in coordinates local to the shape's `x,y`.
///
/// The corner radius is clamped to a quarter of the smaller body side so the
/// arcs can never overlap the tail or each other.
pub fn callout_rect_path(callout: &CalloutRect) -> String {
    let w = callout.width;
    let h = callout.height;
    let r = callout.corner_radius.max(0.0).min(w.min(h) / 4.0);
    let t = callout.tail_size.max(0.0);
    let dir = callout.tail_direction;

    let edge = if matches!(dir, TailDirection::Top | TailDirection::Bottom) { w } else { h };
    let base = t.min((edge - 2.0 * r) / 2.0).max(0.0);
    let mid_x = w / 2.0;
    let mid_y = h / 2.0;

    let mut d = String::new();
    let line = |d: &mut String, x: f64, y: f64| {
        let _ = write!(d, " L{},{}", fmt_num(x), fmt_num(y));
    };
    let arc = |d: &mut String, x: f64, y: f64| {
        if r > 0.0 {
            let _ = write!(d, " A{},{} 0 0,1 {},{}", fmt_num(r), fmt_num(r), fmt_num(x), fmt_num(y));
        } else {
            let _ = write!(d, " L{},{}", fmt_num(x), fmt_num(y));
        }
    };

    let _ = write!(d, "M{},0", fmt_num(r));
    if dir == TailDirection::Top && base > 0.0 {
        line(&mut d, mid_x - base / 2.0, 0.0);
        line(&mut d, mid_x - base / 2.0, -t);
        line(&mut d, mid_x + base / 2.0, 0.0);
    }
    line(&mut d, w - r, 0.0);
    arc(&mut d, w, r);
    if dir == TailDirection::Right && base > 0.0 {
        line(&mut d, w, mid_y - base / 2.0);
        line(&mut d, w + t, mid_y - base / 2.0);
        line(&mut d, w, mid_y + base / 2.0);
    }
    line(&mut d, w, h - r);
    arc(&mut d, w - r, h);
    if dir == TailDirection::Bottom && base > 0.0 {
        line(&mut d, mid_x + base / 2.0, h);
        line(&mut d, mid_x - base / 2.0, h + t);
        line(&mut d, mid_x - base / 2.0, h);
    }
    line(&mut d, r, h);
    arc(&mut d, 0.0, h - r);
    if dir == TailDirection::Left && base > 0.0 {
        line(&mut d, 0.0, mid_y + base / 2.0);
        line(&mut d, -t, mid_y + base / 2.0);
        line(&mut d, 0.0, mid_y - base / 2.0);
    }
    line(&mut d, 0.0, r);
    arc(&mut d, r, 0.0);
    d.push_str(" Z");
    d
}

/// Outline for a callout oval shape; `None` for any other kind
pub fn callout_oval_path(shape: &Shape) -> Option<OvalPath> {
    let ShapeKind::CalloutOval(oval) = &shape.kind else {
        return None;
    };
    if let (Some(path), Some(transform)) = (template_path(&shape.kind), callout_oval_template_transform(shape)) {
        return Some(OvalPath::Template { path: path.to_string(), transform });
    }
    Some(OvalPath::Analytic(analytic_oval_path(shape.x, shape.y, oval)))
}

/// Ellipse centered on `(cx, cy)` with a triangular tail cut into the outline
fn analytic_oval_path(cx: f64, cy: f64, oval: &CalloutOval) -> String {
    let rx = oval.width / 2.0;
    let ry = oval.height / 2.0;
    let facing: f64 = match oval.tail_direction {
        TailDirection::Right => 0.0,
        TailDirection::Bottom => 90.0,
        TailDirection::Left => 180.0,
        TailDirection::Top => 270.0,
    };
    let on_ellipse = |deg: f64| {
        let (sin, cos) = deg.to_radians().sin_cos();
        (cx + rx * cos, cy + ry * sin)
    };
    let (sx, sy) = on_ellipse(facing + OVAL_TAIL_HALF_ANGLE);
    let (ex, ey) = on_ellipse(facing - OVAL_TAIL_HALF_ANGLE);
    let (sin, cos) = facing.to_radians().sin_cos();
    let tip_x = cx + (rx + oval.tail_size) * cos;
    let tip_y = cy + (ry + oval.tail_size) * sin;

    format!(
        "M{},{} A{},{} 0 1,1 {},{} L{},{} Z",
        fmt_num(sx),
        fmt_num(sy),
        fmt_num(rx),
        fmt_num(ry),
        fmt_num(ex),
        fmt_num(ey),
        fmt_num(tip_x),
        fmt_num(tip_y)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::templates::CALLOUT_OVAL_TEMPLATE;

    #[test]
    fn test_callout_rect_bottom_tail() {
        let callout = CalloutRect {
            width: 100.0,
            height: 60.0,
            corner_radius: 0.0,
            tail_direction: TailDirection::Bottom,
            tail_size: 20.0,
        };
        let d = callout_rect_path(&callout);
        assert!(d.starts_with("M0,0"));
        assert!(d.contains("L40,80"), "tail tip missing in {}", d);
        assert!(d.ends_with('Z'));
        assert!(!d.contains('A'));
    }

    #[test]
    fn test_corner_radius_clamped_to_quarter() {
        let callout = CalloutRect {
            width: 100.0,
            height: 40.0,
            corner_radius: 50.0,
            tail_direction: TailDirection::Left,
            tail_size: 10.0,
        };
        let d = callout_rect_path(&callout);
        assert!(d.starts_with("M10,0"));
        assert!(d.contains("A10,10"));
        assert!(d.contains("L-10,"));
    }

    #[test]
    fn test_oval_uses_template_when_present() {
        let oval = CalloutOval {
            width: 231.0,
            height: 128.0,
            tail_size: 28.0,
            path_data: Some(CALLOUT_OVAL_TEMPLATE.path.to_string()),
            ..Default::default()
        };
        let shape = Shape::new(ShapeKind::CalloutOval(oval), 115.5, 64.0);
        match callout_oval_path(&shape) {
            Some(OvalPath::Template { transform, .. }) => {
                assert_eq!(transform.scale_x, 1.0);
                assert_eq!(transform.scale_y, 1.0);
                assert_eq!(transform.translate_x, 0.0);
            }
            other => panic!("expected template, got {:?}", other),
        }
    }

    #[test]
    fn test_oval_analytic_fallback() {
        let oval = CalloutOval { width: 100.0, height: 50.0, tail_size: 20.0, ..Default::default() };
        let shape = Shape::new(ShapeKind::CalloutOval(oval), 0.0, 0.0);
        match callout_oval_path(&shape) {
            Some(OvalPath::Analytic(d)) => {
                assert!(d.contains("A50,25 0 1,1"));
                assert!(d.contains("L0,45 Z"));
            }
            other => panic!("expected analytic path, got {:?}", other),
        }
    }

    #[test]
    fn test_non_oval_has_no_oval_path() {
        assert!(callout_oval_path(&crate::factory::rect(0.0, 0.0)).is_none());
    }
}

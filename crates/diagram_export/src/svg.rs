//! SVG export
//!
//! Every shape becomes one SVG primitive (two for arrows: the line and its
//! head). The document's viewBox is the union of all shape bounds grown by a
//! fixed padding, so exports crop to the drawing rather than the canvas.

use diagram_model::geometry::templates::fmt_num;
use diagram_model::geometry::{
    self, bounds, callout_oval_path, callout_rect_path, template_for, template_path, Bounds,
    OvalPath, TEXT_LINE_HEIGHT,
};
use diagram_model::{ArrowGeometry, Diagram, Paint, Shape, ShapeKind, TextAlign, TextGeometry};

/// Margin added around the drawing when no setting overrides it
pub const DEFAULT_SVG_PADDING: f64 = 20.0;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Render the diagram as a standalone SVG document
pub fn export_svg(diagram: &Diagram, padding: f64) -> String {
    let view = view_box(diagram, padding);
    let mut parts: Vec<String> = Vec::with_capacity(diagram.len() + 3);

    parts.push(format!(
        r#"<svg xmlns="{}" width="{}" height="{}" viewBox="{} {} {} {}">"#,
        SVG_NS,
        fmt_num(view.width),
        fmt_num(view.height),
        fmt_num(view.x),
        fmt_num(view.y),
        fmt_num(view.width),
        fmt_num(view.height)
    ));

    let background = &diagram.canvas.background;
    if !background.is_none() {
        parts.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            fmt_num(view.x),
            fmt_num(view.y),
            fmt_num(view.width),
            fmt_num(view.height),
            escape_xml(background.as_css())
        ));
    }

    for shape in diagram.shapes() {
        parts.push(render_shape(shape));
    }

    parts.push("</svg>".to_string());
    tracing::debug!("Exported {} shapes to SVG", diagram.len());
    parts.join("\n")
}

/// Drawing bounds plus padding; the whole canvas when there is nothing to draw
fn view_box(diagram: &Diagram, padding: f64) -> Bounds {
    let padding = if padding.is_finite() { padding.max(0.0) } else { DEFAULT_SVG_PADDING };
    match geometry::union_bounds(diagram.shapes()) {
        Some(b) => b.inflate(padding),
        None => diagram.canvas.bounds(),
    }
}

// =============================================================================
// Shapes
// =============================================================================

/// SVG markup for one shape
pub fn render_shape(shape: &Shape) -> String {
    let rotate = rotation_transform(shape);
    let paint = paint_attrs(shape);
    let (x, y) = (shape.x, shape.y);

    match &shape.kind {
        ShapeKind::Rect(b) => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}{}/>"#,
            fmt_num(x),
            fmt_num(y),
            fmt_num(b.width),
            fmt_num(b.height),
            paint,
            transform_attr(&rotate, None)
        ),
        ShapeKind::RoundedRect(b) => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{r}" ry="{r}"{}{}/>"#,
            fmt_num(x),
            fmt_num(y),
            fmt_num(b.width),
            fmt_num(b.height),
            paint,
            transform_attr(&rotate, None),
            r = fmt_num(b.corner_radius.max(0.0))
        ),
        ShapeKind::Circle(c) => format!(
            r#"<circle cx="{}" cy="{}" r="{}"{}{}/>"#,
            fmt_num(x + c.radius),
            fmt_num(y + c.radius),
            fmt_num(c.radius),
            paint,
            transform_attr(&rotate, None)
        ),
        ShapeKind::Triangle(p)
        | ShapeKind::Pentagon(p)
        | ShapeKind::Hexagon(p)
        | ShapeKind::Octagon(p)
        | ShapeKind::Diamond(p) => {
            let sides = shape.kind.polygon_sides().unwrap_or(3);
            let points = geometry::regular_polygon_points(sides, p.radius);
            polygon(x, y, &points, &paint, &rotate)
        }
        ShapeKind::Star(s) => {
            let points = geometry::star_points(s.num_points, s.outer_radius, s.inner_radius);
            polygon(x, y, &points, &paint, &rotate)
        }
        ShapeKind::Parallelogram(p) | ShapeKind::RectCut(p) => {
            polygon(x, y, &p.points, &paint, &rotate)
        }
        ShapeKind::BlockArrowRight(a)
        | ShapeKind::BlockArrowLeft(a)
        | ShapeKind::BlockArrowUp(a)
        | ShapeKind::BlockArrowDown(a) => {
            let direction = match shape.kind.block_arrow() {
                Some((direction, _)) => direction,
                None => diagram_model::ArrowDirection::Right,
            };
            let points = geometry::block_arrow_points(
                direction,
                a.shaft_length,
                a.pointer_length,
                a.pointer_width,
            );
            polygon(x, y, &points, &paint, &rotate)
        }
        ShapeKind::Cylinder(_) | ShapeKind::Document(_) | ShapeKind::CalloutCloud(_) => {
            templated(shape, &paint, &rotate)
        }
        ShapeKind::CalloutRect(c) => {
            let local = format!("translate({} {})", fmt_num(x), fmt_num(y));
            format!(
                r#"<path d="{}"{}{}/>"#,
                escape_xml(&callout_rect_path(c)),
                paint,
                transform_attr(&rotate, Some(&local))
            )
        }
        ShapeKind::CalloutOval(_) => match callout_oval_path(shape) {
            Some(OvalPath::Template { path, transform }) => format!(
                r#"<path d="{}"{}{}/>"#,
                escape_xml(&path),
                paint,
                transform_attr(&rotate, Some(&transform.to_svg()))
            ),
            Some(OvalPath::Analytic(d)) => format!(
                r#"<path d="{}"{}{}/>"#,
                escape_xml(&d),
                paint,
                transform_attr(&rotate, None)
            ),
            None => String::new(),
        },
        ShapeKind::Arrow(a) => render_arrow(shape, a, &rotate),
        ShapeKind::Text(t) => render_text(shape, t, &rotate),
    }
}

fn polygon(x: f64, y: f64, offsets: &[f64], paint: &str, rotate: &Option<String>) -> String {
    format!(
        r#"<polygon points="{}"{}{}/>"#,
        points_attr(x, y, offsets),
        paint,
        transform_attr(rotate, None)
    )
}

/// Template path scaled from its viewBox onto the shape's bounds
fn templated(shape: &Shape, paint: &str, rotate: &Option<String>) -> String {
    let (Some(path), Some(template)) = (template_path(&shape.kind), template_for(&shape.kind)) else {
        return String::new();
    };
    let transform = template.transform_into(&bounds(shape)).to_svg();
    format!(
        r#"<path d="{}"{}{}/>"#,
        escape_xml(path),
        paint,
        transform_attr(rotate, Some(&transform))
    )
}

/// Line (or polyline) with a filled triangular head at the last point
fn render_arrow(shape: &Shape, arrow: &ArrowGeometry, rotate: &Option<String>) -> String {
    let stroke = paint_value(&shape.stroke);
    let width = fmt_num(shape.stroke_width);
    let transform = transform_attr(rotate, None);
    let pairs: Vec<(f64, f64)> = arrow
        .points
        .chunks_exact(2)
        .map(|p| (shape.x + p[0], shape.y + p[1]))
        .collect();
    if pairs.len() < 2 {
        return String::new();
    }

    let body = if pairs.len() == 2 {
        format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"{}/>"#,
            fmt_num(pairs[0].0),
            fmt_num(pairs[0].1),
            fmt_num(pairs[1].0),
            fmt_num(pairs[1].1),
            stroke,
            width,
            transform
        )
    } else {
        let points: Vec<String> = pairs
            .iter()
            .map(|(px, py)| format!("{},{}", fmt_num(*px), fmt_num(*py)))
            .collect();
        format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}"{}/>"#,
            points.join(" "),
            stroke,
            width,
            transform
        )
    };

    let from = pairs[pairs.len() - 2];
    let to = pairs[pairs.len() - 1];
    match arrowhead(from, to, arrow.pointer_length, arrow.pointer_width) {
        Some(head) => {
            let points: Vec<String> = head
                .iter()
                .map(|(px, py)| format!("{},{}", fmt_num(*px), fmt_num(*py)))
                .collect();
            format!(
                "{}\n<polygon points=\"{}\" fill=\"{}\"{}/>",
                body,
                points.join(" "),
                stroke,
                transform
            )
        }
        None => body,
    }
}

/// Tip and two base corners of an arrowhead pointing from `from` to `to`
pub fn arrowhead(
    from: (f64, f64),
    to: (f64, f64),
    length: f64,
    width: f64,
) -> Option<[(f64, f64); 3]> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let segment = dx.hypot(dy);
    if segment == 0.0 || !segment.is_finite() {
        return None;
    }
    let (ux, uy) = (dx / segment, dy / segment);
    let base = (to.0 - ux * length, to.1 - uy * length);
    let half = width / 2.0;
    Some([
        to,
        (base.0 - uy * half, base.1 + ux * half),
        (base.0 + uy * half, base.1 - ux * half),
    ])
}

/// Multi-line text; one `<tspan>` per line, baseline one font size below the top
fn render_text(shape: &Shape, text: &TextGeometry, rotate: &Option<String>) -> String {
    let (width, _) = geometry::text_extent(text);
    let (anchor_x, anchor) = match text.align {
        TextAlign::Left => (shape.x, "start"),
        TextAlign::Center => (shape.x + width / 2.0, "middle"),
        TextAlign::Right => (shape.x + width, "end"),
    };
    let line_step = text.font_size * TEXT_LINE_HEIGHT;

    let spans: Vec<String> = text
        .text
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let dy = if i == 0 { text.font_size } else { line_step };
            format!(
                r#"<tspan x="{}" dy="{}">{}</tspan>"#,
                fmt_num(anchor_x),
                fmt_num(dy),
                escape_xml(line)
            )
        })
        .collect();

    format!(
        r#"<text x="{}" y="{}" font-size="{}" font-family="{}" text-anchor="{}" fill="{}"{}>{}</text>"#,
        fmt_num(anchor_x),
        fmt_num(shape.y),
        fmt_num(text.font_size),
        escape_xml(&text.font_family),
        anchor,
        paint_value(&shape.fill),
        transform_attr(rotate, None),
        spans.join("")
    )
}

// =============================================================================
// Attributes
// =============================================================================

fn paint_attrs(shape: &Shape) -> String {
    format!(
        r#" fill="{}" stroke="{}" stroke-width="{}""#,
        paint_value(&shape.fill),
        paint_value(&shape.stroke),
        fmt_num(shape.stroke_width)
    )
}

fn paint_value(paint: &Paint) -> String {
    if paint.is_none() {
        "none".to_string()
    } else {
        escape_xml(paint.as_css())
    }
}

/// `rotate(deg cx cy)` about the shape's own bounds center, if rotated
fn rotation_transform(shape: &Shape) -> Option<String> {
    if shape.rotation == 0.0 || !shape.rotation.is_finite() {
        return None;
    }
    let center = bounds(shape).center();
    Some(format!(
        "rotate({} {} {})",
        fmt_num(shape.rotation),
        fmt_num(center.x),
        fmt_num(center.y)
    ))
}

/// Rotation applies after any local placement transform
fn transform_attr(rotate: &Option<String>, local: Option<&str>) -> String {
    match (rotate, local) {
        (None, None) => String::new(),
        (Some(r), None) => format!(r#" transform="{}""#, r),
        (None, Some(l)) => format!(r#" transform="{}""#, l),
        (Some(r), Some(l)) => format!(r#" transform="{} {}""#, r, l),
    }
}

fn points_attr(x: f64, y: f64, offsets: &[f64]) -> String {
    offsets
        .chunks_exact(2)
        .map(|p| format!("{},{}", fmt_num(x + p[0]), fmt_num(y + p[1])))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape the five XML special characters
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_model::{factory, Canvas, ShapeColor};

    fn diagram(shapes: Vec<Shape>) -> Diagram {
        Diagram::with_shapes("Test", Canvas::new(800.0, 600.0), shapes).unwrap()
    }

    #[test]
    fn test_empty_diagram_uses_canvas() {
        let svg = export_svg(&diagram(vec![]), 20.0);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 800 600""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_view_box_pads_union() {
        let shapes = vec![factory::rect(10.0, 10.0), factory::rect(200.0, 50.0)];
        let svg = export_svg(&diagram(shapes), 20.0);
        // union (10,10)-(300,150), padded by 20
        assert!(svg.contains(r#"viewBox="-10 -10 330 180""#));
    }

    #[test]
    fn test_view_box_holds_callout_tail() {
        let svg = export_svg(&diagram(vec![factory::callout_rect(0.0, 0.0)]), 20.0);
        // 160 x 100 body with a 24 unit tail below it
        assert!(svg.contains(r#"viewBox="-20 -20 200 164""#));
        assert!(svg.contains("L68,124"));
    }

    #[test]
    fn test_rect_primitive() {
        let shape = factory::rect(5.0, 6.0).with_fill(ShapeColor::rgb(192, 0, 0));
        let out = render_shape(&shape);
        assert!(out.starts_with(r#"<rect x="5" y="6" width="100" height="100""#));
        assert!(out.contains(r##"fill="#C00000""##));
        assert!(!out.contains("transform"));
    }

    #[test]
    fn test_circle_center_from_box_anchor() {
        let out = render_shape(&factory::circle(0.0, 0.0));
        assert!(out.contains(r#"cx="50" cy="50" r="50""#));
    }

    #[test]
    fn test_rotation_about_own_center() {
        let shape = factory::rect(0.0, 0.0).with_rotation(45.0);
        let out = render_shape(&shape);
        assert!(out.contains(r#"transform="rotate(45 50 50)""#));
    }

    #[test]
    fn test_polygons_and_block_arrows() {
        assert!(render_shape(&factory::hexagon(100.0, 100.0)).starts_with("<polygon"));
        assert!(render_shape(&factory::star(100.0, 100.0)).starts_with("<polygon"));
        assert!(render_shape(&factory::parallelogram(0.0, 0.0)).starts_with("<polygon"));
        let block = factory::block_arrow(0.0, 0.0, diagram_model::ArrowDirection::Up);
        let out = render_shape(&block);
        assert!(out.starts_with("<polygon"));
        assert_eq!(out.matches(',').count(), 7);
    }

    #[test]
    fn test_templates_and_callouts_are_paths() {
        let cylinder = render_shape(&factory::cylinder(10.0, 20.0));
        assert!(cylinder.starts_with("<path"));
        assert!(cylinder.contains("translate(10 20) scale(1 1.2)"));
        assert!(render_shape(&factory::callout_rect(0.0, 0.0)).contains("translate(0 0)"));
        assert!(render_shape(&factory::callout_oval(200.0, 200.0)).starts_with("<path"));
        assert!(render_shape(&factory::callout_cloud(0.0, 0.0)).starts_with("<path"));
    }

    #[test]
    fn test_arrow_line_and_head() {
        let out = render_shape(&factory::arrow(0.0, 0.0, 100.0, 0.0));
        assert!(out.contains(r#"<line x1="0" y1="0" x2="100" y2="0""#));
        assert!(out.contains(r#"<polygon points="100,0 90,5 90,-5""#));
    }

    #[test]
    fn test_arrowhead_degenerate_segment() {
        assert!(arrowhead((1.0, 1.0), (1.0, 1.0), 10.0, 10.0).is_none());
        let head = arrowhead((0.0, 0.0), (0.0, 50.0), 10.0, 6.0).unwrap();
        assert_eq!(head[0], (0.0, 50.0));
        assert_eq!(head[1], (-3.0, 40.0));
        assert_eq!(head[2], (3.0, 40.0));
    }

    #[test]
    fn test_text_escaped_with_tspans() {
        let shape = factory::text(0.0, 0.0, "a < b & \"c\"\n'd'");
        let out = render_shape(&shape);
        assert!(out.contains("a &lt; b &amp; &quot;c&quot;"));
        assert!(out.contains("&#39;d&#39;"));
        assert_eq!(out.matches("<tspan").count(), 2);
        assert!(out.contains(r#"text-anchor="start""#));
    }

    #[test]
    fn test_text_center_anchor() {
        let mut shape = factory::text(0.0, 0.0, "abcd");
        if let ShapeKind::Text(t) = &mut shape.kind {
            t.align = TextAlign::Center;
            t.width = Some(200.0);
        }
        let out = render_shape(&shape);
        assert!(out.contains(r#"<text x="100""#));
        assert!(out.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn test_transparent_paint_is_none() {
        let shape = factory::rect(0.0, 0.0).with_fill(Paint::none());
        assert!(render_shape(&shape).contains(r#"fill="none""#));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"<&>"'"#), "&lt;&amp;&gt;&quot;&#39;");
    }
}

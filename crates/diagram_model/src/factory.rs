//! Shape factory: one constructor per shape type with editor defaults

use crate::geometry::{self, templates};
use crate::shape::*;
use crate::{Paint, ShapeColor};
use serde::{Deserialize, Serialize};

/// Toolbar tool that creates a shape on click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeTool {
    Rect,
    RoundedRect,
    Circle,
    Triangle,
    Pentagon,
    Hexagon,
    Octagon,
    Diamond,
    Star,
    Parallelogram,
    RectCut,
    Cylinder,
    Document,
    BlockArrowRight,
    BlockArrowLeft,
    BlockArrowUp,
    BlockArrowDown,
    CalloutRect,
    CalloutOval,
    CalloutCloud,
    Arrow,
    Text,
}

/// Create the default shape for `tool` at a clicked canvas position
pub fn create(tool: ShapeTool, x: f64, y: f64) -> Shape {
    match tool {
        ShapeTool::Rect => rect(x, y),
        ShapeTool::RoundedRect => rounded_rect(x, y),
        ShapeTool::Circle => circle(x, y),
        ShapeTool::Triangle => triangle(x, y),
        ShapeTool::Pentagon => pentagon(x, y),
        ShapeTool::Hexagon => hexagon(x, y),
        ShapeTool::Octagon => octagon(x, y),
        ShapeTool::Diamond => diamond(x, y),
        ShapeTool::Star => star(x, y),
        ShapeTool::Parallelogram => parallelogram(x, y),
        ShapeTool::RectCut => rect_cut(x, y),
        ShapeTool::Cylinder => cylinder(x, y),
        ShapeTool::Document => document(x, y),
        ShapeTool::BlockArrowRight => block_arrow(x, y, ArrowDirection::Right),
        ShapeTool::BlockArrowLeft => block_arrow(x, y, ArrowDirection::Left),
        ShapeTool::BlockArrowUp => block_arrow(x, y, ArrowDirection::Up),
        ShapeTool::BlockArrowDown => block_arrow(x, y, ArrowDirection::Down),
        ShapeTool::CalloutRect => callout_rect(x, y),
        ShapeTool::CalloutOval => callout_oval(x, y),
        ShapeTool::CalloutCloud => callout_cloud(x, y),
        ShapeTool::Arrow => arrow(x, y, x + 100.0, y),
        ShapeTool::Text => text(x, y, "Text"),
    }
}

// =============================================================================
// Box Shapes
// =============================================================================

pub fn rect(x: f64, y: f64) -> Shape {
    Shape::new(ShapeKind::Rect(BoxGeometry::default()), x, y)
}

pub fn rounded_rect(x: f64, y: f64) -> Shape {
    Shape::new(ShapeKind::RoundedRect(RoundedBox::default()), x, y)
}

/// Circle whose bounding box starts at `(x, y)`
pub fn circle(x: f64, y: f64) -> Shape {
    Shape::new(ShapeKind::Circle(CircleGeometry::default()), x, y)
}

// =============================================================================
// Regular Polygons and Stars (centered)
// =============================================================================

pub fn triangle(cx: f64, cy: f64) -> Shape {
    Shape::new(ShapeKind::Triangle(RegularPolygon::default()), cx, cy)
}

pub fn pentagon(cx: f64, cy: f64) -> Shape {
    Shape::new(ShapeKind::Pentagon(RegularPolygon::default()), cx, cy)
}

pub fn hexagon(cx: f64, cy: f64) -> Shape {
    Shape::new(ShapeKind::Hexagon(RegularPolygon::default()), cx, cy)
}

pub fn octagon(cx: f64, cy: f64) -> Shape {
    Shape::new(ShapeKind::Octagon(RegularPolygon::default()), cx, cy)
}

pub fn diamond(cx: f64, cy: f64) -> Shape {
    Shape::new(ShapeKind::Diamond(RegularPolygon::default()), cx, cy)
}

pub fn star(cx: f64, cy: f64) -> Shape {
    Shape::new(ShapeKind::Star(StarGeometry::default()), cx, cy).with_fill(ShapeColor::YELLOW)
}

// =============================================================================
// Point Shapes
// =============================================================================

pub fn parallelogram(x: f64, y: f64) -> Shape {
    let points = geometry::parallelogram_points(120.0, 80.0, 20.0);
    Shape::new(ShapeKind::Parallelogram(PointPolygon { points }), x, y)
}

pub fn rect_cut(x: f64, y: f64) -> Shape {
    let points = geometry::cut_rect_points(100.0, 100.0, 20.0);
    Shape::new(ShapeKind::RectCut(PointPolygon { points }), x, y)
}

// =============================================================================
// Templated Shapes
// =============================================================================

pub fn cylinder(x: f64, y: f64) -> Shape {
    let geometry = TemplateBox {
        width: 100.0,
        height: 120.0,
        path_data: Some(templates::CYLINDER_TEMPLATE.path.to_string()),
    };
    Shape::new(ShapeKind::Cylinder(geometry), x, y)
}

pub fn document(x: f64, y: f64) -> Shape {
    let geometry = TemplateBox {
        width: 120.0,
        height: 100.0,
        path_data: Some(templates::DOCUMENT_TEMPLATE.path.to_string()),
    };
    Shape::new(ShapeKind::Document(geometry), x, y)
}

pub fn callout_cloud(x: f64, y: f64) -> Shape {
    let geometry = TemplateBox {
        width: 160.0,
        height: 120.0,
        path_data: Some(templates::CLOUD_TEMPLATE.path.to_string()),
    };
    Shape::new(ShapeKind::CalloutCloud(geometry), x, y).with_fill(ShapeColor::WHITE)
}

// =============================================================================
// Callouts and Arrows
// =============================================================================

pub fn callout_rect(x: f64, y: f64) -> Shape {
    Shape::new(ShapeKind::CalloutRect(CalloutRect::default()), x, y).with_fill(ShapeColor::WHITE)
}

/// Oval balloon drawn from the 231x156 template, centered on `(cx, cy)`
pub fn callout_oval(cx: f64, cy: f64) -> Shape {
    let geometry = CalloutOval {
        width: 231.0,
        height: 128.0,
        tail_direction: TailDirection::Bottom,
        tail_size: 28.0,
        path_data: Some(templates::CALLOUT_OVAL_TEMPLATE.path.to_string()),
    };
    Shape::new(ShapeKind::CalloutOval(geometry), cx, cy).with_fill(ShapeColor::WHITE)
}

pub fn block_arrow(x: f64, y: f64, direction: ArrowDirection) -> Shape {
    let geometry = BlockArrow::default();
    let kind = match direction {
        ArrowDirection::Right => ShapeKind::BlockArrowRight(geometry),
        ArrowDirection::Left => ShapeKind::BlockArrowLeft(geometry),
        ArrowDirection::Up => ShapeKind::BlockArrowUp(geometry),
        ArrowDirection::Down => ShapeKind::BlockArrowDown(geometry),
    };
    Shape::new(kind, x, y)
}

/// Line arrow from `(x0, y0)` to `(x1, y1)`; the shape is anchored at the start
pub fn arrow(x0: f64, y0: f64, x1: f64, y1: f64) -> Shape {
    let geometry = ArrowGeometry {
        points: vec![0.0, 0.0, x1 - x0, y1 - y0],
        ..Default::default()
    };
    Shape::new(ShapeKind::Arrow(geometry), x0, y0)
        .with_fill(ShapeColor::BLACK)
        .with_stroke(ShapeColor::BLACK, 2.0)
}

// =============================================================================
// Text
// =============================================================================

pub fn text(x: f64, y: f64, content: &str) -> Shape {
    let geometry = TextGeometry {
        text: content.to_string(),
        ..Default::default()
    };
    Shape::new(ShapeKind::Text(geometry), x, y)
        .with_fill(ShapeColor::BLACK)
        .with_stroke(Paint::none(), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bounds;

    const ALL_TOOLS: [ShapeTool; 22] = [
        ShapeTool::Rect,
        ShapeTool::RoundedRect,
        ShapeTool::Circle,
        ShapeTool::Triangle,
        ShapeTool::Pentagon,
        ShapeTool::Hexagon,
        ShapeTool::Octagon,
        ShapeTool::Diamond,
        ShapeTool::Star,
        ShapeTool::Parallelogram,
        ShapeTool::RectCut,
        ShapeTool::Cylinder,
        ShapeTool::Document,
        ShapeTool::BlockArrowRight,
        ShapeTool::BlockArrowLeft,
        ShapeTool::BlockArrowUp,
        ShapeTool::BlockArrowDown,
        ShapeTool::CalloutRect,
        ShapeTool::CalloutOval,
        ShapeTool::CalloutCloud,
        ShapeTool::Arrow,
        ShapeTool::Text,
    ];

    #[test]
    fn test_every_tool_creates_visible_shape() {
        for tool in ALL_TOOLS {
            let shape = create(tool, 10.0, 10.0);
            let b = bounds(&shape);
            assert!(b.width > 0.0, "{:?} has zero width", tool);
            if tool != ShapeTool::Arrow {
                assert!(b.height > 0.0, "{:?} has zero height", tool);
            }
        }
    }

    #[test]
    fn test_factory_shapes_are_already_normalized() {
        for tool in ALL_TOOLS {
            let shape = create(tool, 0.0, 0.0);
            assert_eq!(shape.clone().normalized(), shape, "{:?}", tool);
        }
    }

    #[test]
    fn test_fresh_ids() {
        assert_ne!(rect(0.0, 0.0).id, rect(0.0, 0.0).id);
    }

    #[test]
    fn test_arrow_is_relative_to_start() {
        let shape = arrow(10.0, 20.0, 110.0, 20.0);
        assert_eq!((shape.x, shape.y), (10.0, 20.0));
        match shape.kind {
            ShapeKind::Arrow(a) => assert_eq!(a.points, vec![0.0, 0.0, 100.0, 0.0]),
            _ => unreachable!(),
        }
    }
}

//! Shape types for the diagram canvas
//!
//! A `Shape` carries the fields every element shares (id, position,
//! rotation, paint) and a `ShapeKind` holding the variant-specific geometry.
//! The JSON produced by serde is the flat `{ "type": "rect", "x": .., ... }`
//! object the editor persists, so this module is also the wire format.

use crate::{Paint, ShapeColor, ShapeId};
use serde::{Deserialize, Serialize};

/// Smallest extent any dimension may take after a mutation
pub const MIN_DIMENSION: f64 = 1.0;

/// Smallest font size a text shape may take
pub const MIN_FONT_SIZE: f64 = 1.0;

// =============================================================================
// Enumerations
// =============================================================================

/// Edge of a callout body the tail protrudes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailDirection {
    Top,
    Right,
    Bottom,
    Left,
}

impl Default for TailDirection {
    fn default() -> Self {
        Self::Bottom
    }
}

/// Horizontal alignment of text inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl Default for TextAlign {
    fn default() -> Self {
        Self::Left
    }
}

/// Direction a block arrow points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowDirection {
    Right,
    Left,
    Up,
    Down,
}

impl ArrowDirection {
    /// Whether the principal axis runs horizontally
    pub fn is_horizontal(&self) -> bool {
        matches!(self, ArrowDirection::Right | ArrowDirection::Left)
    }
}

// =============================================================================
// Variant Geometry
// =============================================================================

/// Plain width/height box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoxGeometry {
    pub width: f64,
    pub height: f64,
}

impl Default for BoxGeometry {
    fn default() -> Self {
        Self { width: 100.0, height: 100.0 }
    }
}

/// Box with rounded corners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoundedBox {
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
}

impl Default for RoundedBox {
    fn default() -> Self {
        Self { width: 100.0, height: 100.0, corner_radius: 10.0 }
    }
}

/// Circle stored by radius; the shape's `x,y` is the top-left of its box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CircleGeometry {
    pub radius: f64,
}

impl Default for CircleGeometry {
    fn default() -> Self {
        Self { radius: 50.0 }
    }
}

/// Regular polygon centered on the shape's `x,y`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegularPolygon {
    pub radius: f64,
    /// Explicit side count; when absent the variant decides (triangle = 3, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sides: Option<u32>,
}

impl Default for RegularPolygon {
    fn default() -> Self {
        Self { radius: 50.0, sides: None }
    }
}

/// Star centered on the shape's `x,y`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StarGeometry {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub num_points: u32,
}

impl Default for StarGeometry {
    fn default() -> Self {
        Self { inner_radius: 20.0, outer_radius: 50.0, num_points: 5 }
    }
}

/// Free-form polygon, flat `[x0, y0, x1, y1, ...]` offsets from `x,y`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PointPolygon {
    pub points: Vec<f64>,
}

/// Box drawn from a fixed path template scaled to `width x height`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateBox {
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_data: Option<String>,
}

impl Default for TemplateBox {
    fn default() -> Self {
        Self { width: 100.0, height: 100.0, path_data: None }
    }
}

/// Filled block arrow with independently sized shaft and head
///
/// The shaft thickness is a fixed fraction of the head width, so the head
/// proportions alone decide the silhouette across the principal axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockArrow {
    /// Length of the shaft along the principal axis
    pub shaft_length: f64,
    /// Head length along the principal axis
    pub pointer_length: f64,
    /// Head width across the principal axis
    pub pointer_width: f64,
}

impl Default for BlockArrow {
    fn default() -> Self {
        Self { shaft_length: 80.0, pointer_length: 40.0, pointer_width: 60.0 }
    }
}

/// Rounded-rectangle speech balloon with a triangular tail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalloutRect {
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub tail_direction: TailDirection,
    pub tail_size: f64,
}

impl Default for CalloutRect {
    fn default() -> Self {
        Self {
            width: 160.0,
            height: 100.0,
            corner_radius: 12.0,
            tail_direction: TailDirection::Bottom,
            tail_size: 24.0,
        }
    }
}

/// Oval speech balloon; the shape's `x,y` is the center of the ellipse body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalloutOval {
    pub width: f64,
    pub height: f64,
    pub tail_direction: TailDirection,
    pub tail_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_data: Option<String>,
}

impl Default for CalloutOval {
    fn default() -> Self {
        Self {
            width: 160.0,
            height: 100.0,
            tail_direction: TailDirection::Bottom,
            tail_size: 24.0,
            path_data: None,
        }
    }
}

const DEFAULT_ARROW_LENGTH: f64 = 100.0;

/// Thin line arrow from `points[0..2]` to `points[2..4]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArrowGeometry {
    pub points: Vec<f64>,
    pub pointer_length: f64,
    pub pointer_width: f64,
}

impl Default for ArrowGeometry {
    fn default() -> Self {
        Self {
            points: vec![0.0, 0.0, DEFAULT_ARROW_LENGTH, 0.0],
            pointer_length: 10.0,
            pointer_width: 10.0,
        }
    }
}

impl ArrowGeometry {
    /// Start point offset; `(0, 0)` when the point list is too short
    pub fn start(&self) -> (f64, f64) {
        self.pair(0).unwrap_or((0.0, 0.0))
    }

    /// End point offset; the default arrow's end when the list is too short
    pub fn end(&self) -> (f64, f64) {
        self.pair(2).unwrap_or_else(|| {
            let (x0, y0) = self.start();
            (x0 + DEFAULT_ARROW_LENGTH, y0)
        })
    }

    fn pair(&self, index: usize) -> Option<(f64, f64)> {
        match self.points.get(index..index + 2) {
            Some(&[x, y]) => Some((x, y)),
            _ => None,
        }
    }

    pub fn length(&self) -> f64 {
        let (x0, y0) = self.start();
        let (x1, y1) = self.end();
        (x1 - x0).hypot(y1 - y0)
    }
}

/// Text block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextGeometry {
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub align: TextAlign,
    /// Wrapping width; estimated from the content when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

impl Default for TextGeometry {
    fn default() -> Self {
        Self {
            text: "Text".to_string(),
            font_size: 24.0,
            font_family: "Arial".to_string(),
            align: TextAlign::Left,
            width: None,
        }
    }
}

// =============================================================================
// Shape Kind
// =============================================================================

/// Variant-specific geometry, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShapeKind {
    Rect(BoxGeometry),
    RoundedRect(RoundedBox),
    Circle(CircleGeometry),
    Triangle(RegularPolygon),
    Pentagon(RegularPolygon),
    Hexagon(RegularPolygon),
    Octagon(RegularPolygon),
    Diamond(RegularPolygon),
    Star(StarGeometry),
    Parallelogram(PointPolygon),
    RectCut(PointPolygon),
    Cylinder(TemplateBox),
    Document(TemplateBox),
    BlockArrowRight(BlockArrow),
    BlockArrowLeft(BlockArrow),
    BlockArrowUp(BlockArrow),
    BlockArrowDown(BlockArrow),
    CalloutRect(CalloutRect),
    CalloutOval(CalloutOval),
    CalloutCloud(TemplateBox),
    Arrow(ArrowGeometry),
    Text(TextGeometry),
}

impl ShapeKind {
    /// The `type` tag used on the wire
    pub fn type_name(&self) -> &'static str {
        match self {
            ShapeKind::Rect(_) => "rect",
            ShapeKind::RoundedRect(_) => "roundedRect",
            ShapeKind::Circle(_) => "circle",
            ShapeKind::Triangle(_) => "triangle",
            ShapeKind::Pentagon(_) => "pentagon",
            ShapeKind::Hexagon(_) => "hexagon",
            ShapeKind::Octagon(_) => "octagon",
            ShapeKind::Diamond(_) => "diamond",
            ShapeKind::Star(_) => "star",
            ShapeKind::Parallelogram(_) => "parallelogram",
            ShapeKind::RectCut(_) => "rectCut",
            ShapeKind::Cylinder(_) => "cylinder",
            ShapeKind::Document(_) => "document",
            ShapeKind::BlockArrowRight(_) => "blockArrowRight",
            ShapeKind::BlockArrowLeft(_) => "blockArrowLeft",
            ShapeKind::BlockArrowUp(_) => "blockArrowUp",
            ShapeKind::BlockArrowDown(_) => "blockArrowDown",
            ShapeKind::CalloutRect(_) => "calloutRect",
            ShapeKind::CalloutOval(_) => "calloutOval",
            ShapeKind::CalloutCloud(_) => "calloutCloud",
            ShapeKind::Arrow(_) => "arrow",
            ShapeKind::Text(_) => "text",
        }
    }

    /// Side count for regular polygon variants
    pub fn polygon_sides(&self) -> Option<u32> {
        let (poly, fallback) = match self {
            ShapeKind::Triangle(p) => (p, 3),
            ShapeKind::Diamond(p) => (p, 4),
            ShapeKind::Pentagon(p) => (p, 5),
            ShapeKind::Hexagon(p) => (p, 6),
            ShapeKind::Octagon(p) => (p, 8),
            _ => return None,
        };
        Some(poly.sides.unwrap_or(fallback).max(3))
    }

    /// Block arrow geometry together with its direction
    pub fn block_arrow(&self) -> Option<(ArrowDirection, &BlockArrow)> {
        match self {
            ShapeKind::BlockArrowRight(a) => Some((ArrowDirection::Right, a)),
            ShapeKind::BlockArrowLeft(a) => Some((ArrowDirection::Left, a)),
            ShapeKind::BlockArrowUp(a) => Some((ArrowDirection::Up, a)),
            ShapeKind::BlockArrowDown(a) => Some((ArrowDirection::Down, a)),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ShapeKind::Text(_))
    }

    pub fn is_arrow(&self) -> bool {
        matches!(self, ShapeKind::Arrow(_))
    }
}

// =============================================================================
// Shape
// =============================================================================

fn default_stroke() -> Paint {
    Paint::from_color(ShapeColor::BLACK)
}

fn default_stroke_width() -> f64 {
    2.0
}

/// A single diagram element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Unique shape ID
    #[serde(default)]
    pub id: ShapeId,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Rotation in degrees (clockwise)
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub fill: Paint,
    #[serde(default = "default_stroke")]
    pub stroke: Paint,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Variant geometry
    #[serde(flatten)]
    pub kind: ShapeKind,
}

impl Shape {
    /// Create a shape at a position with default paint
    pub fn new(kind: ShapeKind, x: f64, y: f64) -> Self {
        Self {
            id: ShapeId::new(),
            x,
            y,
            rotation: 0.0,
            fill: Paint::default(),
            stroke: default_stroke(),
            stroke_width: default_stroke_width(),
            kind,
        }
    }

    /// Replace the id (builder style)
    pub fn with_id(mut self, id: impl Into<ShapeId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_fill(mut self, fill: impl Into<Paint>) -> Self {
        self.fill = fill.into();
        self
    }

    pub fn with_stroke(mut self, stroke: impl Into<Paint>, width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = width.max(0.0);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Move the shape by a delta; every anchor convention is translation-invariant
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Clamp degenerate or malformed values to usable ones.
    ///
    /// Applied to shapes read from storage so NaN or zero extents never reach
    /// bounds or export math.
    pub fn normalized(mut self) -> Self {
        self.x = finite_or(self.x, 0.0);
        self.y = finite_or(self.y, 0.0);
        self.rotation = finite_or(self.rotation, 0.0);
        self.stroke_width = finite_or(self.stroke_width, default_stroke_width()).max(0.0);

        match &mut self.kind {
            ShapeKind::Rect(b) => {
                b.width = clamp_dimension(b.width);
                b.height = clamp_dimension(b.height);
            }
            ShapeKind::RoundedRect(b) => {
                b.width = clamp_dimension(b.width);
                b.height = clamp_dimension(b.height);
                b.corner_radius = finite_or(b.corner_radius, 0.0).max(0.0);
            }
            ShapeKind::Circle(c) => c.radius = clamp_dimension(c.radius),
            ShapeKind::Triangle(p)
            | ShapeKind::Pentagon(p)
            | ShapeKind::Hexagon(p)
            | ShapeKind::Octagon(p)
            | ShapeKind::Diamond(p) => {
                p.radius = clamp_dimension(p.radius);
                if let Some(sides) = p.sides.as_mut() {
                    *sides = (*sides).max(3);
                }
            }
            ShapeKind::Star(s) => {
                s.outer_radius = clamp_dimension(s.outer_radius);
                s.inner_radius = clamp_dimension(s.inner_radius).min(s.outer_radius);
                s.num_points = s.num_points.max(3);
            }
            ShapeKind::Parallelogram(p) => {
                if !valid_points(&p.points, 6) {
                    p.points = crate::geometry::parallelogram_points(120.0, 80.0, 20.0);
                }
            }
            ShapeKind::RectCut(p) => {
                if !valid_points(&p.points, 6) {
                    p.points = crate::geometry::cut_rect_points(100.0, 100.0, 20.0);
                }
            }
            ShapeKind::Cylinder(t) | ShapeKind::Document(t) | ShapeKind::CalloutCloud(t) => {
                t.width = clamp_dimension(t.width);
                t.height = clamp_dimension(t.height);
            }
            ShapeKind::BlockArrowRight(a)
            | ShapeKind::BlockArrowLeft(a)
            | ShapeKind::BlockArrowUp(a)
            | ShapeKind::BlockArrowDown(a) => {
                a.shaft_length = clamp_dimension(a.shaft_length);
                a.pointer_length = clamp_dimension(a.pointer_length);
                a.pointer_width = clamp_dimension(a.pointer_width);
            }
            ShapeKind::CalloutRect(c) => {
                c.width = clamp_dimension(c.width);
                c.height = clamp_dimension(c.height);
                c.corner_radius = finite_or(c.corner_radius, 0.0).max(0.0);
                c.tail_size = finite_or(c.tail_size, 0.0).max(0.0);
            }
            ShapeKind::CalloutOval(c) => {
                c.width = clamp_dimension(c.width);
                c.height = clamp_dimension(c.height);
                c.tail_size = finite_or(c.tail_size, 0.0).max(0.0);
            }
            ShapeKind::Arrow(a) => {
                if !valid_points(&a.points, 4) {
                    a.points = ArrowGeometry::default().points;
                }
                a.points.truncate(4);
                a.pointer_length = finite_or(a.pointer_length, 10.0).max(0.0);
                a.pointer_width = finite_or(a.pointer_width, 10.0).max(0.0);
            }
            ShapeKind::Text(t) => {
                t.font_size = finite_or(t.font_size, 24.0).max(MIN_FONT_SIZE);
                if let Some(w) = t.width.as_mut() {
                    *w = clamp_dimension(*w);
                }
            }
        }
        self
    }
}

/// Floor a dimension at `MIN_DIMENSION`, mapping NaN to the floor
pub fn clamp_dimension(value: f64) -> f64 {
    if value.is_finite() {
        value.max(MIN_DIMENSION)
    } else {
        MIN_DIMENSION
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn valid_points(points: &[f64], min_len: usize) -> bool {
    points.len() >= min_len && points.len() % 2 == 0 && points.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format_is_flat() {
        let shape = Shape::new(ShapeKind::Rect(BoxGeometry { width: 10.0, height: 20.0 }), 1.0, 2.0)
            .with_id("r1");
        let value = serde_json::to_value(&shape).unwrap();
        assert_eq!(value["type"], "rect");
        assert_eq!(value["id"], "r1");
        assert_eq!(value["width"], 10.0);
        assert_eq!(value["strokeWidth"], 2.0);
    }

    #[test]
    fn test_variant_tags() {
        let value = json!({"type": "blockArrowUp", "id": "a", "x": 0, "y": 0});
        let shape: Shape = serde_json::from_value(value).unwrap();
        assert_eq!(shape.type_name(), "blockArrowUp");
        assert!(shape.kind.block_arrow().is_some());

        let value = json!({"type": "rectCut", "id": "b", "x": 0, "y": 0});
        let shape: Shape = serde_json::from_value(value).unwrap();
        assert_eq!(shape.type_name(), "rectCut");
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let value = json!({"type": "circle", "id": "c1", "x": 5, "y": 5});
        let shape: Shape = serde_json::from_value(value).unwrap();
        match shape.kind {
            ShapeKind::Circle(c) => assert_eq!(c.radius, 50.0),
            other => panic!("unexpected kind {:?}", other),
        }
        assert_eq!(shape.stroke_width, 2.0);
        assert_eq!(shape.rotation, 0.0);
    }

    #[test]
    fn test_polygon_sides_follow_variant() {
        assert_eq!(ShapeKind::Hexagon(RegularPolygon::default()).polygon_sides(), Some(6));
        assert_eq!(ShapeKind::Diamond(RegularPolygon::default()).polygon_sides(), Some(4));
        let custom = RegularPolygon { radius: 10.0, sides: Some(7) };
        assert_eq!(ShapeKind::Pentagon(custom).polygon_sides(), Some(7));
        assert_eq!(ShapeKind::Rect(BoxGeometry::default()).polygon_sides(), None);
    }

    #[test]
    fn test_normalized_clamps_degenerate_geometry() {
        let shape = Shape::new(ShapeKind::Rect(BoxGeometry { width: 0.0, height: -5.0 }), f64::NAN, 3.0);
        let shape = shape.normalized();
        assert_eq!(shape.x, 0.0);
        match shape.kind {
            ShapeKind::Rect(b) => {
                assert_eq!(b.width, MIN_DIMENSION);
                assert_eq!(b.height, MIN_DIMENSION);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_normalized_repairs_arrow_points() {
        let arrow = ArrowGeometry { points: vec![1.0, 2.0], pointer_length: 10.0, pointer_width: 10.0 };
        let shape = Shape::new(ShapeKind::Arrow(arrow), 0.0, 0.0).normalized();
        match shape.kind {
            ShapeKind::Arrow(a) => assert_eq!(a.points, vec![0.0, 0.0, 100.0, 0.0]),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_short_arrow_points_have_endpoints() {
        let arrow = ArrowGeometry { points: vec![5.0, 5.0], ..Default::default() };
        assert_eq!(arrow.start(), (5.0, 5.0));
        assert_eq!(arrow.end(), (105.0, 5.0));
        assert_eq!(arrow.length(), 100.0);

        let empty = ArrowGeometry { points: vec![], ..Default::default() };
        assert_eq!(empty.start(), (0.0, 0.0));
        assert_eq!(empty.end(), (100.0, 0.0));
    }

    #[test]
    fn test_star_inner_never_exceeds_outer() {
        let star = StarGeometry { inner_radius: 80.0, outer_radius: 40.0, num_points: 1 };
        let shape = Shape::new(ShapeKind::Star(star), 0.0, 0.0).normalized();
        match shape.kind {
            ShapeKind::Star(s) => {
                assert_eq!(s.inner_radius, 40.0);
                assert_eq!(s.num_points, 3);
            }
            _ => unreachable!(),
        }
    }
}

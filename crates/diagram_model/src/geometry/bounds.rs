//! Axis-aligned bounds derived from shapes

use crate::geometry::templates::{CALLOUT_OVAL_TEMPLATE, TemplateTransform};
use crate::shape::{ArrowDirection, BlockArrow, Shape, ShapeKind, TailDirection, TextGeometry};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Average glyph advance as a fraction of the font size
pub const TEXT_CHAR_WIDTH_RATIO: f64 = 0.6;

/// Line height as a multiple of the font size
pub const TEXT_LINE_HEIGHT: f64 = 1.2;

/// Shaft thickness of a block arrow as a fraction of its head width
pub const BLOCK_ARROW_SHAFT_RATIO: f64 = 0.5;

/// Point in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Rotate this point around `center` by `degrees` (clockwise in y-down space)
    pub fn rotated_around(&self, center: Point, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Box spanning two corners given in any order
    pub fn from_points(p1: Point, p2: Point) -> Self {
        let x = p1.x.min(p2.x);
        let y = p1.y.min(p2.y);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Whether the two boxes overlap or touch
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Bounds::new(x, y, x2 - x, y2 - y)
    }

    /// Grow on every side by `amount`
    pub fn inflate(&self, amount: f64) -> Bounds {
        Bounds::new(
            self.x - amount,
            self.y - amount,
            (self.width + 2.0 * amount).max(0.0),
            (self.height + 2.0 * amount).max(0.0),
        )
    }

    pub fn scaled(&self, factor: f64) -> Bounds {
        Bounds::new(self.x * factor, self.y * factor, self.width * factor, self.height * factor)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

// =============================================================================
// Shape Bounds
// =============================================================================

/// Bounding box of a shape, ignoring rotation
pub fn bounds(shape: &Shape) -> Bounds {
    let (x, y) = (shape.x, shape.y);
    let raw = match &shape.kind {
        ShapeKind::Rect(b) => Bounds::new(x, y, b.width, b.height),
        ShapeKind::RoundedRect(b) => Bounds::new(x, y, b.width, b.height),
        ShapeKind::Circle(c) => Bounds::new(x, y, 2.0 * c.radius, 2.0 * c.radius),
        ShapeKind::Triangle(p)
        | ShapeKind::Pentagon(p)
        | ShapeKind::Hexagon(p)
        | ShapeKind::Octagon(p)
        | ShapeKind::Diamond(p) => centered_square(x, y, p.radius),
        ShapeKind::Star(s) => centered_square(x, y, s.outer_radius),
        ShapeKind::Parallelogram(p) | ShapeKind::RectCut(p) => points_bounds(x, y, &p.points),
        ShapeKind::Cylinder(t) | ShapeKind::Document(t) | ShapeKind::CalloutCloud(t) => {
            Bounds::new(x, y, t.width, t.height)
        }
        ShapeKind::BlockArrowRight(a) => block_arrow_bounds(x, y, ArrowDirection::Right, a),
        ShapeKind::BlockArrowLeft(a) => block_arrow_bounds(x, y, ArrowDirection::Left, a),
        ShapeKind::BlockArrowUp(a) => block_arrow_bounds(x, y, ArrowDirection::Up, a),
        ShapeKind::BlockArrowDown(a) => block_arrow_bounds(x, y, ArrowDirection::Down, a),
        ShapeKind::CalloutRect(c) => {
            extend_toward(Bounds::new(x, y, c.width, c.height), c.tail_direction, c.tail_size)
        }
        ShapeKind::CalloutOval(c) => {
            let body = Bounds::new(x - c.width / 2.0, y - c.height / 2.0, c.width, c.height);
            extend_toward(body, c.tail_direction, c.tail_size)
        }
        ShapeKind::Arrow(a) => points_bounds(x, y, &a.points),
        ShapeKind::Text(t) => {
            let (width, height) = text_extent(t);
            Bounds::new(x, y, width, height)
        }
    };
    non_negative(raw)
}

/// Union of all shape bounds, `None` for an empty list
pub fn union_bounds<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Option<Bounds> {
    shapes
        .into_iter()
        .map(bounds)
        .reduce(|acc, b| acc.union(&b))
}

/// Estimated width and height of a text block
pub fn text_extent(text: &TextGeometry) -> (f64, f64) {
    let lines: Vec<&str> = text.text.split('\n').collect();
    let longest = lines
        .iter()
        .map(|line| line.graphemes(true).count())
        .max()
        .unwrap_or(0);
    let width = text
        .width
        .unwrap_or(text.font_size * TEXT_CHAR_WIDTH_RATIO * longest as f64);
    let height = lines.len() as f64 * text.font_size * TEXT_LINE_HEIGHT;
    (width, height)
}

/// Length along and thickness across the principal axis of a block arrow
pub fn block_arrow_extent(arrow: &BlockArrow) -> (f64, f64) {
    // The shaft is always narrower than the head, so the head decides the thickness.
    (arrow.shaft_length + arrow.pointer_length, arrow.pointer_width)
}

/// Where a templated callout oval's path lands: its bounds, mapped from the template viewBox
pub fn callout_oval_template_transform(shape: &Shape) -> Option<TemplateTransform> {
    match &shape.kind {
        ShapeKind::CalloutOval(c) if c.path_data.is_some() => {
            let b = bounds(shape);
            Some(CALLOUT_OVAL_TEMPLATE.transform_into(&b))
        }
        _ => None,
    }
}

fn block_arrow_bounds(x: f64, y: f64, direction: ArrowDirection, arrow: &BlockArrow) -> Bounds {
    let (length, thickness) = block_arrow_extent(arrow);
    if direction.is_horizontal() {
        Bounds::new(x, y, length, thickness)
    } else {
        Bounds::new(x, y, thickness, length)
    }
}

fn centered_square(cx: f64, cy: f64, radius: f64) -> Bounds {
    Bounds::new(cx - radius, cy - radius, 2.0 * radius, 2.0 * radius)
}

fn points_bounds(x: f64, y: f64, points: &[f64]) -> Bounds {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for pair in points.chunks_exact(2) {
        min_x = min_x.min(pair[0]);
        max_x = max_x.max(pair[0]);
        min_y = min_y.min(pair[1]);
        max_y = max_y.max(pair[1]);
    }
    if !min_x.is_finite() || !min_y.is_finite() {
        return Bounds::new(x, y, 0.0, 0.0);
    }
    Bounds::new(x + min_x, y + min_y, max_x - min_x, max_y - min_y)
}

fn extend_toward(body: Bounds, direction: TailDirection, amount: f64) -> Bounds {
    let amount = amount.max(0.0);
    match direction {
        TailDirection::Bottom => Bounds::new(body.x, body.y, body.width, body.height + amount),
        TailDirection::Top => Bounds::new(body.x, body.y - amount, body.width, body.height + amount),
        TailDirection::Right => Bounds::new(body.x, body.y, body.width + amount, body.height),
        TailDirection::Left => Bounds::new(body.x - amount, body.y, body.width + amount, body.height),
    }
}

fn non_negative(b: Bounds) -> Bounds {
    let clean = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
    Bounds::new(b.x, b.y, clean(b.width), clean(b.height))
}

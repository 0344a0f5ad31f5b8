//! Transform controller
//!
//! The renderer reports a finished gesture (final node position, scale
//! factors, rotation, grabbed handle); this module turns it into a new shape.
//! Scale never survives into the model: every shape category folds the scale
//! into its own geometry with a named rule, so stroke widths, arrowheads, and
//! glyph metrics stay undistorted.

use crate::{EditError, Result};
use diagram_model::geometry::{text_extent, Point};
use diagram_model::{
    ArrowDirection, ArrowGeometry, BlockArrow, CircleGeometry, PointPolygon, RegularPolygon,
    Shape, ShapeId, ShapeKind, StarGeometry, TextGeometry, MIN_DIMENSION,
};
use serde::{Deserialize, Serialize};

/// Floor applied to resized extents and radii
pub const MIN_RESIZE_EXTENT: f64 = 5.0;

/// Floor applied to a resized star's inner radius
pub const MIN_STAR_INNER_RADIUS: f64 = 2.0;

/// Floor applied to the font size of a corner-resized text shape
pub const MIN_TEXT_FONT_SIZE: f64 = 8.0;

// =============================================================================
// Gestures
// =============================================================================

/// Resize handle grabbed on the renderer's transformer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleRight,
    BottomRight,
    BottomCenter,
    BottomLeft,
    MiddleLeft,
}

impl ResizeHandle {
    /// Corner handles scale both axes; edge handles scale one
    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft
                | ResizeHandle::TopRight
                | ResizeHandle::BottomRight
                | ResizeHandle::BottomLeft
        )
    }
}

/// What the user did to a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GestureKind {
    Drag,
    Resize(ResizeHandle),
    Rotate,
}

fn unit_scale() -> f64 {
    1.0
}

/// A finished gesture as reported by the renderer.
///
/// `x,y` is the renderer's node position: the stored anchor for every shape
/// except circles, whose node position is the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gesture {
    pub shape_id: ShapeId,
    pub kind: GestureKind,
    pub x: f64,
    pub y: f64,
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    #[serde(default = "unit_scale")]
    pub scale_y: f64,
    /// Absent when the gesture did not report an angle
    #[serde(default)]
    pub rotation: Option<f64>,
}

impl Gesture {
    /// Shape dropped at a new node position
    pub fn drag(shape_id: impl Into<ShapeId>, x: f64, y: f64) -> Self {
        Self {
            shape_id: shape_id.into(),
            kind: GestureKind::Drag,
            x,
            y,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: None,
        }
    }

    /// Transformer released after scaling from `handle`
    pub fn resize(
        shape_id: impl Into<ShapeId>,
        handle: ResizeHandle,
        position: Point,
        scale_x: f64,
        scale_y: f64,
    ) -> Self {
        Self {
            shape_id: shape_id.into(),
            kind: GestureKind::Resize(handle),
            x: position.x,
            y: position.y,
            scale_x,
            scale_y,
            rotation: None,
        }
    }

    /// Transformer released after rotating
    pub fn rotate(shape_id: impl Into<ShapeId>, rotation: f64) -> Self {
        Self {
            shape_id: shape_id.into(),
            kind: GestureKind::Rotate,
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: Some(rotation),
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    fn validate(&self) -> Result<()> {
        let values = [self.x, self.y, self.scale_x, self.scale_y, self.rotation.unwrap_or(0.0)];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EditError::InvalidGesture(format!(
                "non-finite value in gesture for {}",
                self.shape_id
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Gesture Application
// =============================================================================

/// Apply a finished gesture, returning the shape to store.
///
/// The input shape is never modified; on error the caller keeps the old one.
/// - Drag moves the anchor to the reported position.
/// - Rotate stores the reported angle verbatim. Rotation is about the shape
///   center, so the anchor does not move.
/// - Resize folds the scale into the geometry with the category's rule, moves
///   the anchor, and stores the reported rotation if there is one.
pub fn apply_gesture(shape: &Shape, gesture: &Gesture) -> Result<Shape> {
    gesture.validate()?;
    if gesture.shape_id != shape.id {
        return Err(EditError::InvalidGesture(format!(
            "gesture for {} applied to {}",
            gesture.shape_id, shape.id
        )));
    }

    let mut next = shape.clone();
    match gesture.kind {
        GestureKind::Drag => place_at_reported(&mut next, gesture.x, gesture.y),
        GestureKind::Rotate => next.rotation = gesture.rotation.unwrap_or(shape.rotation),
        GestureKind::Resize(handle) => {
            next.kind = resize_kind(&shape.kind, handle, gesture.scale_x, gesture.scale_y);
            place_at_reported(&mut next, gesture.x, gesture.y);
            if let Some(rotation) = gesture.rotation {
                next.rotation = rotation;
            }
        }
    }

    tracing::debug!(
        "Applied {:?} to {} ({})",
        gesture.kind,
        shape.id,
        shape.type_name()
    );
    Ok(next)
}

/// Renderer node position of a shape (inverse of the gesture anchoring)
pub fn reported_position(shape: &Shape) -> Point {
    match &shape.kind {
        ShapeKind::Circle(c) => Point::new(shape.x + c.radius, shape.y + c.radius),
        _ => Point::new(shape.x, shape.y),
    }
}

fn place_at_reported(shape: &mut Shape, x: f64, y: f64) {
    match &shape.kind {
        // Stored top-left; the renderer reports the center
        ShapeKind::Circle(c) => {
            shape.x = x - c.radius;
            shape.y = y - c.radius;
        }
        _ => {
            shape.x = x;
            shape.y = y;
        }
    }
}

fn resize_kind(kind: &ShapeKind, handle: ResizeHandle, sx: f64, sy: f64) -> ShapeKind {
    let mut next = kind.clone();
    match &mut next {
        ShapeKind::Rect(b) => (b.width, b.height) = resize_box(b.width, b.height, sx, sy),
        ShapeKind::RoundedRect(b) => (b.width, b.height) = resize_box(b.width, b.height, sx, sy),
        ShapeKind::CalloutRect(c) => (c.width, c.height) = resize_box(c.width, c.height, sx, sy),
        ShapeKind::Circle(c) => *c = resize_circle(c, sx),
        ShapeKind::Triangle(p)
        | ShapeKind::Pentagon(p)
        | ShapeKind::Hexagon(p)
        | ShapeKind::Octagon(p)
        | ShapeKind::Diamond(p) => *p = resize_regular_polygon(p, sx),
        ShapeKind::Star(s) => *s = resize_star(s, sx),
        ShapeKind::Parallelogram(p) | ShapeKind::RectCut(p) => *p = resize_point_shape(p, sx, sy),
        ShapeKind::Cylinder(t) | ShapeKind::Document(t) | ShapeKind::CalloutCloud(t) => {
            (t.width, t.height) = resize_path_template(t.width, t.height, sx, sy)
        }
        ShapeKind::CalloutOval(c) => {
            (c.width, c.height) = resize_path_template(c.width, c.height, sx, sy)
        }
        ShapeKind::BlockArrowRight(a) => *a = resize_block_arrow(ArrowDirection::Right, a, sx, sy),
        ShapeKind::BlockArrowLeft(a) => *a = resize_block_arrow(ArrowDirection::Left, a, sx, sy),
        ShapeKind::BlockArrowUp(a) => *a = resize_block_arrow(ArrowDirection::Up, a, sx, sy),
        ShapeKind::BlockArrowDown(a) => *a = resize_block_arrow(ArrowDirection::Down, a, sx, sy),
        ShapeKind::Arrow(a) => *a = resize_arrow(a, sx, sy),
        ShapeKind::Text(t) => *t = resize_text(t, handle, sx, sy),
    }
    next
}

// =============================================================================
// Per-Category Scale Rules
// =============================================================================

/// Box-like shapes (rect, roundedRect, calloutRect); corner radius is untouched
pub fn resize_box(width: f64, height: f64, sx: f64, sy: f64) -> (f64, f64) {
    (
        (width * sx).max(MIN_RESIZE_EXTENT),
        (height * sy).max(MIN_RESIZE_EXTENT),
    )
}

/// Circles stay circles: only `sx` counts
pub fn resize_circle(circle: &CircleGeometry, sx: f64) -> CircleGeometry {
    CircleGeometry {
        radius: (circle.radius * sx).max(MIN_RESIZE_EXTENT),
    }
}

/// Regular polygons and diamonds keep a single radius; `sy` is ignored
pub fn resize_regular_polygon(polygon: &RegularPolygon, sx: f64) -> RegularPolygon {
    RegularPolygon {
        radius: (polygon.radius * sx).max(MIN_RESIZE_EXTENT),
        sides: polygon.sides,
    }
}

pub fn resize_star(star: &StarGeometry, sx: f64) -> StarGeometry {
    let outer_radius = (star.outer_radius * sx).max(MIN_RESIZE_EXTENT);
    let inner_radius = (star.inner_radius * sx)
        .max(MIN_STAR_INNER_RADIUS)
        .min(outer_radius);
    StarGeometry {
        inner_radius,
        outer_radius,
        num_points: star.num_points,
    }
}

/// Text grows its glyphs from a corner and reflows from an edge.
///
/// A corner handle scales `font_size` (and any explicit width) by the mean of
/// both factors. An edge handle changes only the wrap width, starting from the
/// estimated width when none is stored.
pub fn resize_text(text: &TextGeometry, handle: ResizeHandle, sx: f64, sy: f64) -> TextGeometry {
    let mut next = text.clone();
    if handle.is_corner() {
        let factor = (sx + sy) / 2.0;
        next.font_size = (text.font_size * factor).max(MIN_TEXT_FONT_SIZE);
        next.width = text.width.map(|w| (w * factor).max(MIN_RESIZE_EXTENT));
    } else {
        let current = text.width.unwrap_or_else(|| text_extent(text).0);
        next.width = Some((current * sx).max(MIN_RESIZE_EXTENT));
    }
    next
}

/// Line arrows keep their direction and arrowhead; only the length changes.
///
/// The new length is the scaled delta's magnitude, laid out from the start
/// point along the original unit direction.
pub fn resize_arrow(arrow: &ArrowGeometry, sx: f64, sy: f64) -> ArrowGeometry {
    let (x0, y0) = arrow.start();
    let (x1, y1) = arrow.end();
    let dx = x1 - x0;
    let dy = y1 - y0;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return arrow.clone();
    }
    let new_length = (dx * sx).hypot(dy * sy).max(MIN_DIMENSION);
    let ux = dx / length;
    let uy = dy / length;
    ArrowGeometry {
        points: vec![x0, y0, x0 + ux * new_length, y0 + uy * new_length],
        pointer_length: arrow.pointer_length,
        pointer_width: arrow.pointer_width,
    }
}

/// Block arrows stretch their shaft along the principal axis; the head is fixed
pub fn resize_block_arrow(
    direction: ArrowDirection,
    arrow: &BlockArrow,
    sx: f64,
    sy: f64,
) -> BlockArrow {
    let factor = if direction.is_horizontal() { sx } else { sy };
    BlockArrow {
        shaft_length: (arrow.shaft_length * factor).max(MIN_RESIZE_EXTENT),
        pointer_length: arrow.pointer_length,
        pointer_width: arrow.pointer_width,
    }
}

/// Free-point polygons scale every point; each axis extent is floored at `MIN_DIMENSION`
pub fn resize_point_shape(shape: &PointPolygon, sx: f64, sy: f64) -> PointPolygon {
    let (extent_x, extent_y) = point_extent(&shape.points);
    let sx = floor_factor(sx, extent_x);
    let sy = floor_factor(sy, extent_y);
    let points = shape
        .points
        .chunks_exact(2)
        .flat_map(|pair| [pair[0] * sx, pair[1] * sy])
        .collect();
    PointPolygon { points }
}

/// Templated shapes (cylinder, document, cloud, oval balloon) store only their box
pub fn resize_path_template(width: f64, height: f64, sx: f64, sy: f64) -> (f64, f64) {
    (
        (width * sx).max(MIN_RESIZE_EXTENT),
        (height * sy).max(MIN_RESIZE_EXTENT),
    )
}

fn point_extent(points: &[f64]) -> (f64, f64) {
    let xs = points.iter().step_by(2).copied();
    let ys = points.iter().skip(1).step_by(2).copied();
    (span(xs), span(ys))
}

fn span(values: impl Iterator<Item = f64>) -> f64 {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min.is_finite() {
        max - min
    } else {
        0.0
    }
}

fn floor_factor(factor: f64, extent: f64) -> f64 {
    if extent > 0.0 && (extent * factor).abs() < MIN_DIMENSION {
        MIN_DIMENSION / extent * factor.signum()
    } else {
        factor
    }
}

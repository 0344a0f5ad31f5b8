//! Alignment and distribution of selected shapes
//!
//! Both operations are pure: they return moved copies of the affected shapes
//! and the editor swaps them in at once. Shapes move by translating their
//! anchor, so the same code serves top-left, centered, and circle anchors.

use diagram_model::geometry::{bounds, Bounds};
use diagram_model::{Canvas, Shape, ShapeId, ShapeKind, TextAlign};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    CenterHorizontal,
    CenterVertical,
}

impl Alignment {
    /// Text alignment matching a horizontal position anchor
    fn text_align(&self) -> Option<TextAlign> {
        match self {
            Alignment::Left => Some(TextAlign::Left),
            Alignment::Right => Some(TextAlign::Right),
            Alignment::CenterHorizontal => Some(TextAlign::Center),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistributeDirection {
    Horizontal,
    Vertical,
}

fn selected<'a>(shapes: &'a [Shape], selection: &BTreeSet<ShapeId>) -> Vec<&'a Shape> {
    shapes.iter().filter(|s| selection.contains(&s.id)).collect()
}

/// Align the selected shapes.
///
/// One selected shape aligns to the canvas; several align to the extremes
/// (edges) or the mean center of the group as it was before the call.
pub fn align(
    shapes: &[Shape],
    selection: &BTreeSet<ShapeId>,
    canvas: &Canvas,
    alignment: Alignment,
) -> Vec<Shape> {
    let targets = selected(shapes, selection);
    if targets.is_empty() {
        return Vec::new();
    }
    let boxes: Vec<Bounds> = targets.iter().map(|s| bounds(s)).collect();

    let reference = if targets.len() == 1 {
        canvas_reference(canvas, alignment)
    } else {
        group_reference(&boxes, alignment)
    };

    targets
        .into_iter()
        .zip(boxes)
        .map(|(shape, b)| {
            let mut moved = shape.clone();
            let (dx, dy) = offset_to(&b, alignment, reference);
            moved.translate(dx, dy);
            if let (ShapeKind::Text(text), Some(align)) = (&mut moved.kind, alignment.text_align()) {
                text.align = align;
            }
            moved
        })
        .collect()
}

/// Target coordinate for a single shape aligned against the canvas
fn canvas_reference(canvas: &Canvas, alignment: Alignment) -> f64 {
    match alignment {
        Alignment::Left | Alignment::Top => 0.0,
        Alignment::Right => canvas.width,
        Alignment::Bottom => canvas.height,
        Alignment::CenterHorizontal => canvas.width / 2.0,
        Alignment::CenterVertical => canvas.height / 2.0,
    }
}

/// Target coordinate for a group: min/max edge or mean center
fn group_reference(boxes: &[Bounds], alignment: Alignment) -> f64 {
    let count = boxes.len() as f64;
    match alignment {
        Alignment::Left => boxes.iter().map(|b| b.x).fold(f64::INFINITY, f64::min),
        Alignment::Top => boxes.iter().map(|b| b.y).fold(f64::INFINITY, f64::min),
        Alignment::Right => boxes.iter().map(|b| b.right()).fold(f64::NEG_INFINITY, f64::max),
        Alignment::Bottom => boxes.iter().map(|b| b.bottom()).fold(f64::NEG_INFINITY, f64::max),
        Alignment::CenterHorizontal => boxes.iter().map(|b| b.center().x).sum::<f64>() / count,
        Alignment::CenterVertical => boxes.iter().map(|b| b.center().y).sum::<f64>() / count,
    }
}

/// Translation that puts the aligned edge or center of `b` on `reference`
fn offset_to(b: &Bounds, alignment: Alignment, reference: f64) -> (f64, f64) {
    match alignment {
        Alignment::Left => (reference - b.x, 0.0),
        Alignment::Right => (reference - b.right(), 0.0),
        Alignment::CenterHorizontal => (reference - b.center().x, 0.0),
        Alignment::Top => (0.0, reference - b.y),
        Alignment::Bottom => (0.0, reference - b.bottom()),
        Alignment::CenterVertical => (0.0, reference - b.center().y),
    }
}

/// Space three or more selected shapes evenly.
///
/// The outermost two stay put; the inner shapes move so the gaps between
/// consecutive bounds are equal. Fewer than three shapes are left alone.
pub fn distribute(
    shapes: &[Shape],
    selection: &BTreeSet<ShapeId>,
    direction: DistributeDirection,
) -> Vec<Shape> {
    let mut targets: Vec<(&Shape, f64, f64)> = selected(shapes, selection)
        .into_iter()
        .map(|s| {
            let (start, extent) = axis(&bounds(s), direction);
            (s, start, extent)
        })
        .collect();
    if targets.len() < 3 {
        return Vec::new();
    }
    targets.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));

    let (_, first_start, first_extent) = targets[0];
    let (_, last_start, last_extent) = targets[targets.len() - 1];
    let span = last_start + last_extent - first_start;
    let occupied: f64 = targets.iter().map(|(_, _, extent)| extent).sum();
    let gap = (span - occupied) / (targets.len() - 1) as f64;

    let mut cursor = first_start + first_extent + gap;
    let mut moved = Vec::with_capacity(targets.len() - 2);
    for (shape, start, extent) in &targets[1..targets.len() - 1] {
        let delta = cursor - start;
        let mut next = (*shape).clone();
        match direction {
            DistributeDirection::Horizontal => next.translate(delta, 0.0),
            DistributeDirection::Vertical => next.translate(0.0, delta),
        }
        moved.push(next);
        cursor += extent + gap;
    }
    moved
}

/// Leading coordinate and extent of a box along the distribution axis
fn axis(b: &Bounds, direction: DistributeDirection) -> (f64, f64) {
    match direction {
        DistributeDirection::Horizontal => (b.x, b.width),
        DistributeDirection::Vertical => (b.y, b.height),
    }
}

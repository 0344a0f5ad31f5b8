//! Block arrow outlines

use crate::geometry::bounds::BLOCK_ARROW_SHAFT_RATIO;
use crate::shape::ArrowDirection;

/// Outline of a block arrow as flat offsets from the top-left of its bounds.
///
/// Each long edge contributes three vertices (tail corner, shaft/head
/// junction, head shoulder) and the head contributes its tip. Shaft and head
/// are sized independently, so changing `shaft_length` never alters the head.
pub fn block_arrow_points(
    direction: ArrowDirection,
    shaft_length: f64,
    head_length: f64,
    head_width: f64,
) -> Vec<f64> {
    let shaft_width = head_width * BLOCK_ARROW_SHAFT_RATIO;
    let length = shaft_length + head_length;
    let mid = head_width / 2.0;
    let shaft_top = mid - shaft_width / 2.0;
    let shaft_bottom = mid + shaft_width / 2.0;

    // Right-pointing outline as (along, across) pairs
    let outline = [
        (0.0, shaft_top),
        (shaft_length, shaft_top),
        (shaft_length, 0.0),
        (length, mid),
        (shaft_length, head_width),
        (shaft_length, shaft_bottom),
        (0.0, shaft_bottom),
    ];

    let mut points = Vec::with_capacity(outline.len() * 2);
    for (along, across) in outline {
        let (x, y) = match direction {
            ArrowDirection::Right => (along, across),
            ArrowDirection::Left => (length - along, across),
            ArrowDirection::Down => (across, along),
            ArrowDirection::Up => (across, length - along),
        };
        points.push(x);
        points.push(y);
    }
    points
}

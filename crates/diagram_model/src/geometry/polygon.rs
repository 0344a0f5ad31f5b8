//! Point generators for polygonal shapes
//!
//! Regular polygons and stars are generated around their center (the
//! shape's `x,y`); the first vertex points straight up.

/// Angular offset that puts the first vertex at twelve o'clock
const START_ANGLE_DEG: f64 = -90.0;

/// Vertices of a regular polygon as flat `[x0, y0, x1, y1, ...]` offsets from the center
pub fn regular_polygon_points(sides: u32, radius: f64) -> Vec<f64> {
    let sides = sides.max(3);
    let step = 360.0 / f64::from(sides);
    let mut points = Vec::with_capacity(sides as usize * 2);
    for i in 0..sides {
        let angle = (START_ANGLE_DEG + step * f64::from(i)).to_radians();
        points.push(radius * angle.cos());
        points.push(radius * angle.sin());
    }
    points
}

/// Vertices of a star, alternating outer and inner radius
pub fn star_points(num_points: u32, outer_radius: f64, inner_radius: f64) -> Vec<f64> {
    let num_points = num_points.max(3);
    let vertices = num_points * 2;
    let step = 360.0 / f64::from(vertices);
    let mut points = Vec::with_capacity(vertices as usize * 2);
    for i in 0..vertices {
        let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
        let angle = (START_ANGLE_DEG + step * f64::from(i)).to_radians();
        points.push(radius * angle.cos());
        points.push(radius * angle.sin());
    }
    points
}

/// Parallelogram leaning right by `skew`, anchored at its top-left
pub fn parallelogram_points(width: f64, height: f64, skew: f64) -> Vec<f64> {
    let skew = skew.clamp(0.0, width);
    vec![skew, 0.0, width, 0.0, width - skew, height, 0.0, height]
}

/// Rectangle with its top-right corner cut off diagonally by `cut`
pub fn cut_rect_points(width: f64, height: f64, cut: f64) -> Vec<f64> {
    let cut = cut.clamp(0.0, width.min(height));
    vec![0.0, 0.0, width - cut, 0.0, width, cut, width, height, 0.0, height]
}

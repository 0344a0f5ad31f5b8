//! Shape to DrawingML mapping
//!
//! Each diagram shape maps to one slide object: a preset-geometry shape, a
//! text box, or a line connector. Mapping is pure and fallible per shape so
//! that one bad shape can be skipped without touching the others.

use crate::{ExportError, Result};
use diagram_model::geometry::{self, Bounds};
use diagram_model::{ArrowDirection, Paint, Shape, ShapeColor, ShapeKind, TailDirection, TextAlign};

/// EMU per typographic point
pub const EMU_PER_POINT: f64 = 12_700.0;

/// DrawingML angles are in 60000ths of a degree
const ANGLE_UNIT: f64 = 60_000.0;

/// Full turn in DrawingML angle units
const FULL_TURN: i64 = 21_600_000;

/// Star presets DrawingML defines
const STAR_PRESETS: [u32; 10] = [4, 5, 6, 7, 8, 10, 12, 16, 24, 32];

// =============================================================================
// Slide Objects
// =============================================================================

/// Position and size in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmuRect {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// `a:xfrm` contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub rect: EmuRect,
    /// Rotation in 60000ths of a degree, in `0..21600000`
    pub rot: i64,
    pub flip_h: bool,
    pub flip_v: bool,
}

/// Solid color with alpha in DrawingML percent units (100000 = opaque)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidColor {
    pub rgb: String,
    pub alpha: Option<i64>,
}

/// Outline of a slide object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    /// Width in EMU
    pub width: i64,
    pub color: Option<SolidColor>,
    /// Triangle arrowhead at the end of the line
    pub tail_end: bool,
}

/// One text paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
}

/// Character formatting shared by all paragraphs of a text box
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Size in hundredths of a point
    pub size: i64,
    pub typeface: String,
    /// `l`, `ctr`, or `r`
    pub align: &'static str,
    pub color: Option<SolidColor>,
}

/// What kind of slide object a shape becomes
#[derive(Debug, Clone, PartialEq)]
pub enum SlideObjectKind {
    /// `p:sp` with `a:prstGeom`
    Preset {
        preset: &'static str,
        /// `a:gd` guides as `(name, value)`
        adjust: Vec<(&'static str, i64)>,
    },
    /// `p:sp` text box
    TextBox {
        paragraphs: Vec<Paragraph>,
        style: TextStyle,
    },
    /// `p:cxnSp` straight line
    Connector,
}

/// A fully mapped slide object, ready for XML
#[derive(Debug, Clone, PartialEq)]
pub struct SlideObject {
    pub name: String,
    pub frame: Frame,
    pub fill: Option<SolidColor>,
    pub outline: Option<Outline>,
    pub kind: SlideObjectKind,
}

// =============================================================================
// Mapping
// =============================================================================

/// Map one shape; `scale` converts canvas units to EMU
pub fn map_shape(shape: &Shape, scale: f64, index: usize) -> Result<SlideObject> {
    let unsupported = |reason: &str| ExportError::UnsupportedShape(shape.id.clone(), reason.to_string());
    let name = format!("{} {}", shape.type_name(), index + 1);

    if !shape.x.is_finite() || !shape.y.is_finite() {
        return Err(unsupported("non-finite position"));
    }

    if let ShapeKind::Arrow(arrow) = &shape.kind {
        let pairs: Vec<(f64, f64)> = arrow.points.chunks_exact(2).map(|p| (p[0], p[1])).collect();
        let (Some(&start), Some(&end)) = (pairs.first(), pairs.last()) else {
            return Err(unsupported("arrow has no points"));
        };
        if pairs.len() < 2 {
            return Err(unsupported("arrow needs two points"));
        }
        let (x0, y0) = (shape.x + start.0, shape.y + start.1);
        let (x1, y1) = (shape.x + end.0, shape.y + end.1);
        let b = Bounds::from_points(
            geometry::Point::new(x0, y0),
            geometry::Point::new(x1, y1),
        );
        let frame = Frame {
            rect: to_emu(&b, scale),
            rot: rotation(shape.rotation),
            flip_h: x1 < x0,
            flip_v: y1 < y0,
        };
        return Ok(SlideObject {
            name,
            frame,
            fill: None,
            outline: Some(Outline {
                width: emu(shape.stroke_width.max(0.0), scale),
                color: solid(&shape.stroke).map_err(|_| unsupported("unrecognized stroke color"))?,
                tail_end: true,
            }),
            kind: SlideObjectKind::Connector,
        });
    }

    if let ShapeKind::Text(text) = &shape.kind {
        let b = geometry::bounds(shape);
        let style = TextStyle {
            size: (emu(text.font_size, scale) as f64 / EMU_PER_POINT * 100.0).round() as i64,
            typeface: text.font_family.clone(),
            align: match text.align {
                TextAlign::Left => "l",
                TextAlign::Center => "ctr",
                TextAlign::Right => "r",
            },
            color: solid(&shape.fill).map_err(|_| unsupported("unrecognized text color"))?,
        };
        let paragraphs = text
            .text
            .split('\n')
            .map(|line| Paragraph { text: line.to_string() })
            .collect();
        return Ok(SlideObject {
            name,
            frame: Frame {
                rect: to_emu(&b, scale),
                rot: rotation(shape.rotation),
                flip_h: false,
                flip_v: false,
            },
            fill: None,
            outline: None,
            kind: SlideObjectKind::TextBox { paragraphs, style },
        });
    }

    let b = preset_frame(shape);
    if !(b.width.is_finite() && b.height.is_finite()) {
        return Err(unsupported("non-finite geometry"));
    }
    let (preset, adjust) = preset_for(shape, &b).map_err(|reason| unsupported(&reason))?;
    let fill = solid(&shape.fill).map_err(|_| unsupported("unrecognized fill color"))?;
    let stroke = solid(&shape.stroke).map_err(|_| unsupported("unrecognized stroke color"))?;
    let outline = Outline {
        width: emu(shape.stroke_width.max(0.0), scale),
        color: stroke,
        tail_end: false,
    };

    Ok(SlideObject {
        name,
        frame: Frame {
            rect: to_emu(&b, scale),
            rot: rotation(shape.rotation),
            flip_h: false,
            flip_v: false,
        },
        fill,
        outline: Some(outline),
        kind: SlideObjectKind::Preset { preset, adjust },
    })
}

/// Box the preset is stretched over; callouts use the balloon body, not the tail
fn preset_frame(shape: &Shape) -> Bounds {
    match &shape.kind {
        ShapeKind::CalloutRect(c) => Bounds::new(shape.x, shape.y, c.width, c.height),
        ShapeKind::CalloutOval(c) => Bounds::new(
            shape.x - c.width / 2.0,
            shape.y - c.height / 2.0,
            c.width,
            c.height,
        ),
        _ => geometry::bounds(shape),
    }
}

/// Preset name and adjust guides for a non-text, non-arrow shape
pub fn preset_for(shape: &Shape, frame: &Bounds) -> std::result::Result<(&'static str, Vec<(&'static str, i64)>), String> {
    let short_side = frame.width.min(frame.height);
    let ratio = |part: f64, whole: f64| -> i64 {
        if whole > 0.0 {
            (part / whole * 100_000.0).round() as i64
        } else {
            0
        }
    };

    let mapped = match &shape.kind {
        ShapeKind::Rect(_) => ("rect", vec![]),
        ShapeKind::RoundedRect(r) => ("roundRect", vec![("adj", ratio(r.corner_radius, short_side))]),
        ShapeKind::Circle(_) => ("ellipse", vec![]),
        ShapeKind::Triangle(_)
        | ShapeKind::Pentagon(_)
        | ShapeKind::Hexagon(_)
        | ShapeKind::Octagon(_)
        | ShapeKind::Diamond(_) => {
            let sides = shape.kind.polygon_sides().unwrap_or(3);
            (polygon_preset(&shape.kind, sides)?, vec![])
        }
        ShapeKind::Star(s) => {
            if !STAR_PRESETS.contains(&s.num_points) {
                return Err(format!("no star preset with {} points", s.num_points));
            }
            (star_preset(s.num_points), vec![])
        }
        ShapeKind::Parallelogram(_) => ("parallelogram", vec![]),
        ShapeKind::RectCut(_) => ("snip1Rect", vec![]),
        ShapeKind::Cylinder(_) => ("can", vec![]),
        ShapeKind::Document(_) => ("flowChartDocument", vec![]),
        ShapeKind::BlockArrowRight(a)
        | ShapeKind::BlockArrowLeft(a)
        | ShapeKind::BlockArrowUp(a)
        | ShapeKind::BlockArrowDown(a) => {
            let preset = match shape.kind.block_arrow().map(|(d, _)| d) {
                Some(ArrowDirection::Left) => "leftArrow",
                Some(ArrowDirection::Up) => "upArrow",
                Some(ArrowDirection::Down) => "downArrow",
                _ => "rightArrow",
            };
            let shaft = (geometry::BLOCK_ARROW_SHAFT_RATIO * 100_000.0).round() as i64;
            (preset, vec![("adj1", shaft), ("adj2", ratio(a.pointer_length, short_side))])
        }
        ShapeKind::CalloutRect(c) => (
            "wedgeRoundRectCallout",
            tail_adjust(c.tail_direction, c.tail_size, frame),
        ),
        ShapeKind::CalloutOval(c) => (
            "wedgeEllipseCallout",
            tail_adjust(c.tail_direction, c.tail_size, frame),
        ),
        ShapeKind::CalloutCloud(_) => ("cloudCallout", vec![]),
        ShapeKind::Arrow(_) | ShapeKind::Text(_) => {
            return Err(format!("{} has no preset geometry", shape.type_name()))
        }
    };
    Ok(mapped)
}

fn polygon_preset(kind: &ShapeKind, sides: u32) -> std::result::Result<&'static str, String> {
    match (kind, sides) {
        (ShapeKind::Diamond(_), 4) => Ok("diamond"),
        (_, 3) => Ok("triangle"),
        (_, 4) => Ok("diamond"),
        (_, 5) => Ok("pentagon"),
        (_, 6) => Ok("hexagon"),
        (_, 7) => Ok("heptagon"),
        (_, 8) => Ok("octagon"),
        (_, 10) => Ok("decagon"),
        (_, 12) => Ok("dodecagon"),
        (_, n) => Err(format!("no polygon preset with {} sides", n)),
    }
}

fn star_preset(points: u32) -> &'static str {
    match points {
        4 => "star4",
        5 => "star5",
        6 => "star6",
        7 => "star7",
        8 => "star8",
        10 => "star10",
        12 => "star12",
        16 => "star16",
        24 => "star24",
        _ => "star32",
    }
}

/// Tail tip as offsets from the body center, in percent of the body size
fn tail_adjust(direction: TailDirection, tail: f64, frame: &Bounds) -> Vec<(&'static str, i64)> {
    let reach = |extent: f64| {
        if extent > 0.0 {
            (50_000.0 + tail.max(0.0) / extent * 100_000.0).round() as i64
        } else {
            50_000
        }
    };
    let (adj1, adj2) = match direction {
        TailDirection::Bottom => (0, reach(frame.height)),
        TailDirection::Top => (0, -reach(frame.height)),
        TailDirection::Right => (reach(frame.width), 0),
        TailDirection::Left => (-reach(frame.width), 0),
    };
    vec![("adj1", adj1), ("adj2", adj2)]
}

// =============================================================================
// Units
// =============================================================================

pub fn emu(value: f64, scale: f64) -> i64 {
    (value * scale).round() as i64
}

pub fn to_emu(b: &Bounds, scale: f64) -> EmuRect {
    EmuRect {
        x: emu(b.x, scale),
        y: emu(b.y, scale),
        cx: emu(b.width.max(0.0), scale),
        cy: emu(b.height.max(0.0), scale),
    }
}

/// Clockwise degrees to DrawingML angle units in `0..21600000`
pub fn rotation(degrees: f64) -> i64 {
    if !degrees.is_finite() {
        return 0;
    }
    ((degrees * ANGLE_UNIT).round() as i64).rem_euclid(FULL_TURN)
}

/// Resolve a paint; `Ok(None)` means draw nothing
fn solid(paint: &Paint) -> std::result::Result<Option<SolidColor>, ()> {
    let color = paint.resolve().ok_or(())?;
    Ok(solid_color(color))
}

pub fn solid_color(color: ShapeColor) -> Option<SolidColor> {
    if color.is_transparent() {
        return None;
    }
    let alpha = (color.a < 255).then(|| (color.opacity() * 100_000.0).round() as i64);
    Some(SolidColor {
        rgb: color.to_rgb_hex(),
        alpha,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_model::{factory, RegularPolygon};

    const SCALE: f64 = 12_700.0;

    fn preset_name(shape: &Shape) -> &'static str {
        match map_shape(shape, SCALE, 0).unwrap().kind {
            SlideObjectKind::Preset { preset, .. } => preset,
            other => panic!("expected preset, got {:?}", other),
        }
    }

    #[test]
    fn test_preset_table() {
        assert_eq!(preset_name(&factory::rect(0.0, 0.0)), "rect");
        assert_eq!(preset_name(&factory::rounded_rect(0.0, 0.0)), "roundRect");
        assert_eq!(preset_name(&factory::circle(0.0, 0.0)), "ellipse");
        assert_eq!(preset_name(&factory::triangle(50.0, 50.0)), "triangle");
        assert_eq!(preset_name(&factory::pentagon(50.0, 50.0)), "pentagon");
        assert_eq!(preset_name(&factory::hexagon(50.0, 50.0)), "hexagon");
        assert_eq!(preset_name(&factory::octagon(50.0, 50.0)), "octagon");
        assert_eq!(preset_name(&factory::diamond(50.0, 50.0)), "diamond");
        assert_eq!(preset_name(&factory::star(50.0, 50.0)), "star5");
        assert_eq!(preset_name(&factory::parallelogram(0.0, 0.0)), "parallelogram");
        assert_eq!(preset_name(&factory::rect_cut(0.0, 0.0)), "snip1Rect");
        assert_eq!(preset_name(&factory::cylinder(0.0, 0.0)), "can");
        assert_eq!(preset_name(&factory::document(0.0, 0.0)), "flowChartDocument");
        assert_eq!(preset_name(&factory::block_arrow(0.0, 0.0, ArrowDirection::Right)), "rightArrow");
        assert_eq!(preset_name(&factory::block_arrow(0.0, 0.0, ArrowDirection::Left)), "leftArrow");
        assert_eq!(preset_name(&factory::block_arrow(0.0, 0.0, ArrowDirection::Up)), "upArrow");
        assert_eq!(preset_name(&factory::block_arrow(0.0, 0.0, ArrowDirection::Down)), "downArrow");
        assert_eq!(preset_name(&factory::callout_rect(0.0, 0.0)), "wedgeRoundRectCallout");
        assert_eq!(preset_name(&factory::callout_oval(200.0, 200.0)), "wedgeEllipseCallout");
        assert_eq!(preset_name(&factory::callout_cloud(0.0, 0.0)), "cloudCallout");
    }

    #[test]
    fn test_frame_scaled() {
        let object = map_shape(&factory::rect(10.0, 20.0), SCALE, 0).unwrap();
        assert_eq!(
            object.frame.rect,
            EmuRect { x: 127_000, y: 254_000, cx: 1_270_000, cy: 1_270_000 }
        );
        assert_eq!(object.name, "rect 1");
    }

    #[test]
    fn test_callout_rect_framed_by_body() {
        let object = map_shape(&factory::callout_rect(10.0, 20.0), 1.0, 0).unwrap();
        assert_eq!(object.frame.rect, EmuRect { x: 10, y: 20, cx: 160, cy: 100 });
    }

    #[test]
    fn test_centered_shapes_use_bounds() {
        let object = map_shape(&factory::hexagon(100.0, 100.0), 1.0, 0).unwrap();
        assert_eq!(object.frame.rect, EmuRect { x: 50, y: 50, cx: 100, cy: 100 });
    }

    #[test]
    fn test_arrow_is_connector_with_tail() {
        let object = map_shape(&factory::arrow(100.0, 50.0, 0.0, 50.0), 1.0, 0).unwrap();
        assert_eq!(object.kind, SlideObjectKind::Connector);
        assert!(object.frame.flip_h);
        assert!(!object.frame.flip_v);
        assert_eq!(object.frame.rect, EmuRect { x: 0, y: 50, cx: 100, cy: 0 });
        assert!(object.outline.unwrap().tail_end);
    }

    #[test]
    fn test_text_box_style() {
        let object = map_shape(&factory::text(0.0, 0.0, "one\ntwo"), SCALE, 0).unwrap();
        match object.kind {
            SlideObjectKind::TextBox { paragraphs, style } => {
                assert_eq!(paragraphs.len(), 2);
                // 24 canvas units at one point per unit
                assert_eq!(style.size, 2400);
                assert_eq!(style.align, "l");
            }
            other => panic!("expected text box, got {:?}", other),
        }
    }

    #[test]
    fn test_unmappable_shapes_fail() {
        let mut star = factory::star(50.0, 50.0);
        if let ShapeKind::Star(s) = &mut star.kind {
            s.num_points = 9;
        }
        assert!(matches!(map_shape(&star, SCALE, 0), Err(ExportError::UnsupportedShape(_, _))));

        let nonagon = Shape::new(
            ShapeKind::Hexagon(RegularPolygon { radius: 50.0, sides: Some(9) }),
            50.0,
            50.0,
        );
        assert!(map_shape(&nonagon, SCALE, 0).is_err());

        let bad_color = factory::rect(0.0, 0.0).with_fill("not-a-color");
        assert!(map_shape(&bad_color, SCALE, 0).is_err());
    }

    #[test]
    fn test_rotation_units() {
        assert_eq!(rotation(45.0), 2_700_000);
        assert_eq!(rotation(-90.0), 16_200_000);
        assert_eq!(rotation(360.0), 0);
        assert_eq!(rotation(f64::NAN), 0);
    }

    #[test]
    fn test_solid_color_alpha() {
        assert_eq!(solid_color(ShapeColor::TRANSPARENT), None);
        let half = solid_color(ShapeColor::rgba(255, 0, 0, 51)).unwrap();
        assert_eq!(half.rgb, "FF0000");
        assert_eq!(half.alpha, Some(20_000));
        assert_eq!(solid_color(ShapeColor::WHITE).unwrap().alpha, None);
    }

    #[test]
    fn test_callout_tail_adjust() {
        let frame = Bounds::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(tail_adjust(TailDirection::Bottom, 50.0, &frame), vec![("adj1", 0), ("adj2", 100_000)]);
        assert_eq!(tail_adjust(TailDirection::Left, 100.0, &frame), vec![("adj1", -100_000), ("adj2", 0)]);
    }
}

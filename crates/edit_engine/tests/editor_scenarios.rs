//! End-to-end editing scenarios
//!
//! Each test drives a `DiagramEditor` the way the canvas host does: pointer
//! input, renderer gestures, keyboard events, and toolbar commands.

use diagram_model::geometry::{bounds, Bounds, Point};
use diagram_model::{factory, Canvas, Diagram, Shape, ShapeId, ShapeKind, ShapeTool};
use edit_engine::{
    Alignment, DiagramEditor, DistributeDirection, Gesture, InteractionState, Key, KeyAction,
    KeyEvent, ResizeHandle,
};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

fn editor_with(shapes: Vec<Shape>) -> DiagramEditor {
    let diagram = Diagram::with_shapes("Scenario", Canvas::new(1000.0, 800.0), shapes).unwrap();
    DiagramEditor::new(diagram)
}

fn id(s: &str) -> ShapeId {
    ShapeId::from(s)
}

fn rect(name: &str, x: f64, y: f64, w: f64, h: f64) -> Shape {
    let mut shape = factory::rect(x, y).with_id(name);
    if let ShapeKind::Rect(b) = &mut shape.kind {
        b.width = w;
        b.height = h;
    }
    shape
}

#[test]
fn test_rect_scaled_two_by_one() {
    let mut editor = editor_with(vec![]);
    let rect_id = editor.create_shape(ShapeTool::Rect, 100.0, 100.0).unwrap();
    let gesture = Gesture::resize(rect_id.clone(), ResizeHandle::MiddleRight, Point::new(100.0, 100.0), 2.0, 1.0);
    editor.apply_gesture(&gesture, Instant::now()).unwrap();
    let shape = editor.shape(&rect_id).unwrap();
    assert_eq!(bounds(shape), Bounds::new(100.0, 100.0, 200.0, 100.0));
}

#[test]
fn test_arrow_rescaled_to_fifty() {
    let mut editor = editor_with(vec![factory::arrow(0.0, 0.0, 100.0, 0.0).with_id("arrow")]);
    editor.click_shape(id("arrow"), false);
    let gesture = Gesture::resize("arrow", ResizeHandle::MiddleRight, Point::ORIGIN, 0.5, 1.0);
    editor.apply_gesture(&gesture, Instant::now()).unwrap();
    match &editor.shape(&id("arrow")).unwrap().kind {
        ShapeKind::Arrow(a) => {
            assert_eq!(a.points, vec![0.0, 0.0, 50.0, 0.0]);
            assert_eq!((a.pointer_length, a.pointer_width), (10.0, 10.0));
        }
        other => panic!("unexpected kind {:?}", other),
    }
}

#[test]
fn test_align_right_two_rects() {
    let mut editor = editor_with(vec![
        rect("a", 50.0, 0.0, 50.0, 50.0),
        rect("b", 150.0, 100.0, 50.0, 50.0),
    ]);
    editor.click_shape(id("a"), false);
    editor.click_shape(id("b"), true);
    editor.align(Alignment::Right).unwrap();
    for shape in editor.shapes() {
        assert_eq!(bounds(shape).right(), 200.0);
    }
}

#[test]
fn test_align_left_and_center_on_group() {
    let mut editor = editor_with(vec![
        rect("a", 40.0, 0.0, 20.0, 20.0),
        rect("b", 300.0, 50.0, 60.0, 20.0),
        factory::hexagon(500.0, 300.0).with_id("c"),
    ]);
    editor.select_all();

    editor.align(Alignment::Left).unwrap();
    for shape in editor.shapes() {
        assert_eq!(bounds(shape).x, 40.0);
    }

    let centers: Vec<f64> = editor.shapes().iter().map(|s| bounds(s).center().x).collect();
    let mean = centers.iter().sum::<f64>() / centers.len() as f64;
    editor.align(Alignment::CenterHorizontal).unwrap();
    for shape in editor.shapes() {
        assert!((bounds(shape).center().x - mean).abs() < 1e-9);
    }
}

#[test]
fn test_marquee_partial_overlap_selects() {
    let mut editor = editor_with(vec![
        rect("inside", 10.0, 10.0, 20.0, 20.0),
        rect("edge", 90.0, 90.0, 50.0, 50.0),
        rect("away", 400.0, 400.0, 20.0, 20.0),
    ]);
    editor.begin_marquee(Point::new(0.0, 0.0), false);
    editor.update_marquee(Point::new(100.0, 100.0));
    assert!(editor.state().marquee_rect().is_some());
    let selected = editor.finish_marquee();
    assert_eq!(selected, BTreeSet::from([id("inside"), id("edge")]));
}

#[test]
fn test_delete_three_selected() {
    let mut editor = editor_with(vec![
        rect("a", 0.0, 0.0, 10.0, 10.0),
        rect("b", 20.0, 0.0, 10.0, 10.0),
        rect("c", 40.0, 0.0, 10.0, 10.0),
        rect("d", 60.0, 0.0, 10.0, 10.0),
    ]);
    editor.click_shape(id("a"), false);
    editor.click_shape(id("c"), true);
    editor.click_shape(id("d"), true);

    let action = editor.handle_key(&KeyEvent::new(Key::Delete)).unwrap();
    assert_eq!(action, KeyAction::DeleteSelection);
    let remaining: Vec<&str> = editor.shapes().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(remaining, vec!["b"]);
    assert_eq!(editor.state(), &InteractionState::Idle);
}

#[test]
fn test_drag_then_click_keeps_selection() {
    let mut editor = editor_with(vec![rect("a", 0.0, 0.0, 50.0, 50.0), rect("b", 100.0, 0.0, 50.0, 50.0)]);
    editor.select_all();
    let start = Instant::now();
    assert!(editor.begin_drag(Point::new(10.0, 10.0)));
    editor.drag_to(Point::new(30.0, 15.0));
    editor.end_drag(start);

    assert_eq!(editor.shape(&id("a")).map(|s| (s.x, s.y)), Some((20.0, 5.0)));
    assert_eq!(editor.shape(&id("b")).map(|s| (s.x, s.y)), Some((120.0, 5.0)));

    // the pointer-up that ended the drag must not deselect
    assert!(!editor.click_canvas(start + Duration::from_millis(2)));
    assert_eq!(editor.selected_ids().len(), 2);
    assert!(editor.click_canvas(start + Duration::from_millis(50)));
    assert!(editor.selected_ids().is_empty());
}

#[test]
fn test_distribute_and_record_roundtrip() {
    let mut editor = editor_with(vec![
        rect("a", 0.0, 0.0, 10.0, 10.0),
        rect("b", 12.0, 0.0, 10.0, 10.0),
        rect("c", 90.0, 0.0, 10.0, 10.0),
    ]);
    editor.select_all();
    editor.distribute(DistributeDirection::Horizontal).unwrap();
    assert_eq!(editor.shape(&id("b")).unwrap().x, 45.0);

    let record = editor.to_record(None);
    let restored = diagram_model::DiagramRecord::from_json(&record.to_json().unwrap()).unwrap();
    assert_eq!(restored.canvas_data, editor.shapes().to_vec());
}

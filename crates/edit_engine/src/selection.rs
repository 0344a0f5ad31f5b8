//! Selection and interaction state machine
//!
//! Every pointer interaction the editor cares about is one variant of
//! `InteractionState`, so combinations such as marquee-selecting while
//! dragging cannot be represented.

use diagram_model::geometry::{bounds, Bounds, Point};
use diagram_model::{Shape, ShapeId};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Current interaction with the canvas
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// Nothing selected
    #[default]
    Idle,
    SingleSelected(ShapeId),
    MultiSelected(BTreeSet<ShapeId>),
    /// Rubber-band drag from empty canvas; `prior` is kept on release
    MarqueeSelecting {
        origin: Point,
        current: Point,
        prior: BTreeSet<ShapeId>,
    },
    /// Inline text edit in progress; `original_text` is restored on cancel
    TextEditing { id: ShapeId, original_text: String },
    /// Selection being dragged; shapes move once, on release
    DraggingSelection {
        ids: BTreeSet<ShapeId>,
        origin: Point,
        last: Point,
    },
}

impl InteractionState {
    /// Resting state for a set of selected ids
    pub fn from_selection(ids: BTreeSet<ShapeId>) -> Self {
        let mut iter = ids.iter();
        match (iter.next(), iter.next()) {
            (None, _) => InteractionState::Idle,
            (Some(id), None) => InteractionState::SingleSelected(id.clone()),
            _ => InteractionState::MultiSelected(ids),
        }
    }

    /// Ids the rest of the editor should treat as selected
    pub fn selected_ids(&self) -> BTreeSet<ShapeId> {
        match self {
            InteractionState::Idle => BTreeSet::new(),
            InteractionState::SingleSelected(id) => BTreeSet::from([id.clone()]),
            InteractionState::MultiSelected(ids) => ids.clone(),
            InteractionState::MarqueeSelecting { prior, .. } => prior.clone(),
            InteractionState::TextEditing { id, .. } => BTreeSet::from([id.clone()]),
            InteractionState::DraggingSelection { ids, .. } => ids.clone(),
        }
    }

    /// Marquee rectangle while one is being dragged
    pub fn marquee_rect(&self) -> Option<Bounds> {
        match self {
            InteractionState::MarqueeSelecting { origin, current, .. } => {
                Some(Bounds::from_points(*origin, *current))
            }
            _ => None,
        }
    }

    pub fn is_text_editing(&self) -> bool {
        matches!(self, InteractionState::TextEditing { .. })
    }
}

/// Suppresses the deselecting click that the pointer-up ending a drag produces
#[derive(Debug, Clone, Copy)]
pub struct DragGuard {
    window: Duration,
    until: Option<Instant>,
}

impl DragGuard {
    pub fn new(window: Duration) -> Self {
        Self { window, until: None }
    }

    pub fn arm(&mut self, now: Instant) {
        self.until = Some(now + self.window);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }
}

/// Selection state plus the transitions between interaction states
#[derive(Debug, Clone)]
pub struct SelectionState {
    state: InteractionState,
    drag_guard: DragGuard,
}

impl SelectionState {
    pub fn new(drag_guard_window: Duration) -> Self {
        Self {
            state: InteractionState::Idle,
            drag_guard: DragGuard::new(drag_guard_window),
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selected_ids(&self) -> BTreeSet<ShapeId> {
        self.state.selected_ids()
    }

    pub fn is_selected(&self, id: &ShapeId) -> bool {
        self.selected_ids().contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected_ids().is_empty()
    }

    /// Replace the selection outright
    pub fn select(&mut self, ids: BTreeSet<ShapeId>) {
        self.state = InteractionState::from_selection(ids);
    }

    pub fn clear(&mut self) {
        self.state = InteractionState::Idle;
    }

    // =========================================================================
    // Clicks
    // =========================================================================

    /// Plain or shift click on a shape
    pub fn click_shape(&mut self, id: ShapeId, shift: bool) {
        if !shift {
            self.state = InteractionState::SingleSelected(id);
            return;
        }
        let mut ids = self.selected_ids();
        if ids.remove(&id) {
            self.state = InteractionState::from_selection(ids);
        } else {
            ids.insert(id);
            self.state = InteractionState::MultiSelected(ids);
        }
    }

    /// Click on empty canvas. Returns whether the selection was cleared.
    ///
    /// Ignored while a marquee is in progress or inside the drag guard window.
    pub fn click_empty(&mut self, now: Instant) -> bool {
        if matches!(self.state, InteractionState::MarqueeSelecting { .. })
            || self.drag_guard.is_active(now)
        {
            return false;
        }
        self.state = InteractionState::Idle;
        true
    }

    // =========================================================================
    // Marquee
    // =========================================================================

    /// Start a marquee; without `shift` the prior selection is dropped
    pub fn begin_marquee(&mut self, origin: Point, shift: bool) {
        let prior = if shift { self.selected_ids() } else { BTreeSet::new() };
        self.state = InteractionState::MarqueeSelecting {
            origin,
            current: origin,
            prior,
        };
    }

    pub fn update_marquee(&mut self, point: Point) {
        if let InteractionState::MarqueeSelecting { current, .. } = &mut self.state {
            *current = point;
        }
    }

    /// Release the marquee: every shape whose bounds touch the rectangle joins
    /// the prior selection. Returns the resulting selection.
    pub fn finish_marquee(&mut self, shapes: &[Shape]) -> BTreeSet<ShapeId> {
        let InteractionState::MarqueeSelecting { origin, current, prior } = &self.state else {
            return self.selected_ids();
        };
        let rect = Bounds::from_points(*origin, *current);
        let mut ids = prior.clone();
        ids.extend(
            shapes
                .iter()
                .filter(|shape| bounds(shape).intersects(&rect))
                .map(|shape| shape.id.clone()),
        );
        self.state = InteractionState::from_selection(ids.clone());
        ids
    }

    /// Abandon the marquee, keeping whatever was selected before it
    pub fn cancel_marquee(&mut self) {
        if let InteractionState::MarqueeSelecting { prior, .. } = &self.state {
            self.state = InteractionState::from_selection(prior.clone());
        }
    }

    // =========================================================================
    // Dragging
    // =========================================================================

    /// Start dragging the current selection. Returns false with nothing selected.
    pub fn begin_drag(&mut self, origin: Point) -> bool {
        let ids = self.selected_ids();
        if ids.is_empty() || self.state.is_text_editing() {
            return false;
        }
        self.state = InteractionState::DraggingSelection {
            ids,
            origin,
            last: origin,
        };
        true
    }

    pub fn drag_to(&mut self, point: Point) {
        if let InteractionState::DraggingSelection { last, .. } = &mut self.state {
            *last = point;
        }
    }

    /// Finish a drag, arming the drag guard. Returns the dragged ids and the
    /// total delta, or `None` when no drag was in progress.
    pub fn end_drag(&mut self, now: Instant) -> Option<(BTreeSet<ShapeId>, f64, f64)> {
        let InteractionState::DraggingSelection { ids, origin, last } = &self.state else {
            return None;
        };
        let result = (ids.clone(), last.x - origin.x, last.y - origin.y);
        self.state = InteractionState::from_selection(ids.clone());
        self.drag_guard.arm(now);
        Some(result)
    }

    /// Arm the guard for a drag the renderer carried out on its own
    pub fn note_drag_finished(&mut self, now: Instant) {
        self.drag_guard.arm(now);
    }

    // =========================================================================
    // Text Editing
    // =========================================================================

    pub fn begin_text_edit(&mut self, id: ShapeId, original_text: String) {
        self.state = InteractionState::TextEditing { id, original_text };
    }

    /// Leave text editing, selecting the edited shape. Returns the shape id and
    /// its pre-edit text.
    pub fn end_text_edit(&mut self) -> Option<(ShapeId, String)> {
        let InteractionState::TextEditing { id, original_text } = &self.state else {
            return None;
        };
        let ended = (id.clone(), original_text.clone());
        self.state = InteractionState::SingleSelected(ended.0.clone());
        Some(ended)
    }

    // =========================================================================
    // Pruning
    // =========================================================================

    /// Drop ids of shapes that no longer exist
    pub fn prune(&mut self, removed: &BTreeSet<ShapeId>) {
        let keep = |ids: &BTreeSet<ShapeId>| -> BTreeSet<ShapeId> {
            ids.iter().filter(|id| !removed.contains(*id)).cloned().collect()
        };
        self.state = match std::mem::take(&mut self.state) {
            InteractionState::MarqueeSelecting { origin, current, prior } => {
                InteractionState::MarqueeSelecting {
                    origin,
                    current,
                    prior: keep(&prior),
                }
            }
            InteractionState::TextEditing { id, .. } if removed.contains(&id) => {
                InteractionState::Idle
            }
            editing @ InteractionState::TextEditing { .. } => editing,
            InteractionState::DraggingSelection { ids, origin, last } => {
                let ids = keep(&ids);
                if ids.is_empty() {
                    InteractionState::Idle
                } else {
                    InteractionState::DraggingSelection { ids, origin, last }
                }
            }
            other => InteractionState::from_selection(keep(&other.selected_ids())),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_model::factory;

    fn id(s: &str) -> ShapeId {
        ShapeId::from(s)
    }

    fn ids(list: &[&str]) -> BTreeSet<ShapeId> {
        list.iter().map(|s| id(s)).collect()
    }

    fn state() -> SelectionState {
        SelectionState::new(Duration::from_millis(10))
    }

    #[test]
    fn test_click_selects_single() {
        let mut sel = state();
        sel.click_shape(id("a"), false);
        assert_eq!(sel.state(), &InteractionState::SingleSelected(id("a")));
        sel.click_shape(id("b"), false);
        assert_eq!(sel.state(), &InteractionState::SingleSelected(id("b")));
    }

    #[test]
    fn test_shift_click_toggles() {
        let mut sel = state();
        sel.click_shape(id("a"), false);
        sel.click_shape(id("b"), true);
        assert_eq!(sel.state(), &InteractionState::MultiSelected(ids(&["a", "b"])));

        sel.click_shape(id("a"), true);
        assert_eq!(sel.state(), &InteractionState::SingleSelected(id("b")));

        sel.click_shape(id("b"), true);
        assert_eq!(sel.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_shift_click_addition_is_always_multi() {
        let mut sel = state();
        sel.click_shape(id("a"), true);
        assert_eq!(sel.state(), &InteractionState::MultiSelected(ids(&["a"])));
    }

    #[test]
    fn test_click_empty_clears() {
        let mut sel = state();
        sel.click_shape(id("a"), false);
        assert!(sel.click_empty(Instant::now()));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_drag_guard_keeps_selection() {
        let mut sel = state();
        sel.click_shape(id("a"), false);
        let start = Instant::now();
        assert!(sel.begin_drag(Point::new(0.0, 0.0)));
        sel.drag_to(Point::new(15.0, -5.0));
        let (dragged, dx, dy) = sel.end_drag(start).unwrap();
        assert_eq!(dragged, ids(&["a"]));
        assert_eq!((dx, dy), (15.0, -5.0));

        assert!(!sel.click_empty(start + Duration::from_millis(3)));
        assert!(sel.is_selected(&id("a")));
        assert!(sel.click_empty(start + Duration::from_millis(11)));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_begin_drag_needs_selection() {
        let mut sel = state();
        assert!(!sel.begin_drag(Point::ORIGIN));
        assert!(sel.end_drag(Instant::now()).is_none());
    }

    #[test]
    fn test_marquee_selects_intersecting() {
        let shapes = vec![
            factory::rect(0.0, 0.0).with_id("inside"),
            factory::rect(90.0, 90.0).with_id("partial"),
            factory::rect(500.0, 500.0).with_id("outside"),
        ];
        let mut sel = state();
        sel.click_shape(id("outside"), false);
        sel.begin_marquee(Point::new(-10.0, -10.0), false);
        assert!(sel.is_empty());
        sel.update_marquee(Point::new(120.0, 120.0));
        assert_eq!(sel.state().marquee_rect(), Some(Bounds::new(-10.0, -10.0, 130.0, 130.0)));

        let selected = sel.finish_marquee(&shapes);
        assert_eq!(selected, ids(&["inside", "partial"]));
        assert_eq!(sel.state(), &InteractionState::MultiSelected(ids(&["inside", "partial"])));
    }

    #[test]
    fn test_shift_marquee_extends() {
        let shapes = vec![
            factory::rect(0.0, 0.0).with_id("a"),
            factory::rect(500.0, 500.0).with_id("b"),
        ];
        let mut sel = state();
        sel.click_shape(id("b"), false);
        sel.begin_marquee(Point::new(-5.0, -5.0), true);
        sel.update_marquee(Point::new(5.0, 5.0));
        assert_eq!(sel.finish_marquee(&shapes), ids(&["a", "b"]));
    }

    #[test]
    fn test_click_empty_ignored_during_marquee() {
        let mut sel = state();
        sel.begin_marquee(Point::ORIGIN, false);
        assert!(!sel.click_empty(Instant::now()));
        assert!(sel.state().marquee_rect().is_some());
    }

    #[test]
    fn test_marquee_selecting_nothing_goes_idle() {
        let mut sel = state();
        sel.begin_marquee(Point::new(1000.0, 1000.0), false);
        sel.update_marquee(Point::new(1100.0, 1100.0));
        assert!(sel.finish_marquee(&[factory::rect(0.0, 0.0)]).is_empty());
        assert_eq!(sel.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_text_edit_round_trip() {
        let mut sel = state();
        sel.begin_text_edit(id("t"), "before".to_string());
        assert!(sel.state().is_text_editing());
        assert!(!sel.begin_drag(Point::ORIGIN));
        assert_eq!(sel.end_text_edit(), Some((id("t"), "before".to_string())));
        assert_eq!(sel.state(), &InteractionState::SingleSelected(id("t")));
        assert_eq!(sel.end_text_edit(), None);
    }

    #[test]
    fn test_prune_collapses_selection() {
        let mut sel = state();
        sel.select(ids(&["a", "b", "c"]));
        sel.prune(&ids(&["a", "c"]));
        assert_eq!(sel.state(), &InteractionState::SingleSelected(id("b")));
        sel.prune(&ids(&["b"]));
        assert_eq!(sel.state(), &InteractionState::Idle);
    }
}

//! Diagram editor: the diagram plus its interaction state
//!
//! Every mutating call either applies its whole patch or returns an error
//! with the diagram untouched.

use crate::align::{self, Alignment, DistributeDirection};
use crate::keyboard::{key_action, KeyAction, KeyEvent};
use crate::selection::{InteractionState, SelectionState};
use crate::settings::EditorSettings;
use crate::text_edit::{RecordingOverlay, TextEditOverlay, TextEditRequest};
use crate::transform::{apply_gesture, Gesture, GestureKind};
use crate::{EditError, Result};
use diagram_model::factory::{self, ShapeTool};
use diagram_model::geometry::{bounds, shape_at, Point};
use diagram_model::{
    Diagram, DiagramRecord, Paint, Shape, ShapeId, ShapeKind, MIN_FONT_SIZE,
};
use std::collections::BTreeSet;
use std::time::Instant;

/// Smallest point count a star may have
pub const MIN_STAR_POINTS: u32 = 3;

/// Smallest side count a regular polygon may have
pub const MIN_POLYGON_SIDES: u32 = 3;

/// Editing session over one diagram
#[derive(Debug)]
pub struct DiagramEditor<O: TextEditOverlay = RecordingOverlay> {
    diagram: Diagram,
    selection: SelectionState,
    settings: EditorSettings,
    overlay: O,
}

impl DiagramEditor<RecordingOverlay> {
    /// Create an editor without a host text overlay
    pub fn new(diagram: Diagram) -> Self {
        Self::with_overlay(diagram, EditorSettings::default(), RecordingOverlay::default())
    }
}

impl<O: TextEditOverlay> DiagramEditor<O> {
    pub fn with_overlay(diagram: Diagram, settings: EditorSettings, overlay: O) -> Self {
        let selection = SelectionState::new(settings.drag_guard());
        Self {
            diagram,
            selection,
            settings,
            overlay,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn shapes(&self) -> &[Shape] {
        self.diagram.shapes()
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.diagram.get(id)
    }

    pub fn state(&self) -> &InteractionState {
        self.selection.state()
    }

    pub fn selected_ids(&self) -> BTreeSet<ShapeId> {
        self.selection.selected_ids()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Snapshot for persistence
    pub fn to_record(&self, thumbnail_data_url: Option<String>) -> DiagramRecord {
        DiagramRecord::from_diagram(&self.diagram, thumbnail_data_url)
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Add a shape on top and select it
    pub fn add_shape(&mut self, shape: Shape) -> Result<ShapeId> {
        let id = self.diagram.add_shape(shape.normalized())?;
        self.selection.click_shape(id.clone(), false);
        Ok(id)
    }

    /// Create the tool's default shape at a canvas position
    pub fn create_shape(&mut self, tool: ShapeTool, x: f64, y: f64) -> Result<ShapeId> {
        self.add_shape(factory::create(tool, x, y))
    }

    // =========================================================================
    // Pointer Input
    // =========================================================================

    /// Click at a canvas point: selects the topmost shape there, or clears
    /// the selection on empty canvas
    pub fn click_at(&mut self, point: Point, shift: bool, now: Instant) {
        match shape_at(self.diagram.shapes(), point, self.settings.hit_tolerance).cloned() {
            Some(id) => self.click_shape(id, shift),
            None => {
                self.click_canvas(now);
            }
        }
    }

    pub fn click_shape(&mut self, id: ShapeId, shift: bool) {
        if !self.diagram.contains(&id) {
            return;
        }
        self.finish_open_text_edit();
        self.selection.click_shape(id, shift);
    }

    /// Returns whether the selection was cleared
    pub fn click_canvas(&mut self, now: Instant) -> bool {
        self.finish_open_text_edit();
        self.selection.click_empty(now)
    }

    pub fn begin_marquee(&mut self, origin: Point, shift: bool) {
        self.finish_open_text_edit();
        self.selection.begin_marquee(origin, shift);
    }

    pub fn update_marquee(&mut self, point: Point) {
        self.selection.update_marquee(point);
    }

    pub fn finish_marquee(&mut self) -> BTreeSet<ShapeId> {
        self.selection.finish_marquee(self.diagram.shapes())
    }

    pub fn begin_drag(&mut self, origin: Point) -> bool {
        self.selection.begin_drag(origin)
    }

    pub fn drag_to(&mut self, point: Point) {
        self.selection.drag_to(point);
    }

    /// Release a selection drag, moving every dragged shape by the total delta
    pub fn end_drag(&mut self, now: Instant) {
        if let Some((ids, dx, dy)) = self.selection.end_drag(now) {
            self.translate_shapes(&ids, dx, dy);
        }
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Apply a finished renderer gesture.
    ///
    /// Dragging one member of a multi-selection moves the whole selection by
    /// the same delta. Resizing or rotating a multi-selection is rejected.
    pub fn apply_gesture(&mut self, gesture: &Gesture, now: Instant) -> Result<()> {
        let shape = self
            .diagram
            .get(&gesture.shape_id)
            .ok_or_else(|| EditError::ShapeNotFound(gesture.shape_id.clone()))?;
        let next = apply_gesture(shape, gesture)?;

        let selected = self.selection.selected_ids();
        let in_group = selected.len() > 1 && selected.contains(&gesture.shape_id);
        match gesture.kind {
            GestureKind::Drag if in_group => {
                let (dx, dy) = (next.x - shape.x, next.y - shape.y);
                self.translate_shapes(&selected, dx, dy);
            }
            GestureKind::Resize(_) | GestureKind::Rotate if in_group => {
                return Err(EditError::UnsupportedMultiTransform(selected.len()));
            }
            _ => {
                self.diagram.replace_shape(next)?;
            }
        }
        if gesture.kind == GestureKind::Drag {
            self.selection.note_drag_finished(now);
        }
        Ok(())
    }

    fn translate_shapes(&mut self, ids: &BTreeSet<ShapeId>, dx: f64, dy: f64) {
        for id in ids {
            if let Some(shape) = self.diagram.get_mut(id) {
                shape.translate(dx, dy);
            }
        }
        tracing::debug!("Moved {} shapes by ({}, {})", ids.len(), dx, dy);
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Handle a key press, returning the action taken
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<KeyAction> {
        let action = key_action(event, self.selection.state(), &self.settings);
        match action {
            KeyAction::None => {}
            KeyAction::DeleteSelection => {
                self.delete_selection();
            }
            KeyAction::Nudge { dx, dy } => self.nudge(dx, dy),
            KeyAction::CommitText => self.commit_text_edit(None)?,
            KeyAction::CancelText => self.cancel_text_edit()?,
        }
        Ok(action)
    }

    /// Remove every selected shape and return to idle
    pub fn delete_selection(&mut self) -> Vec<Shape> {
        let ids = self.selection.selected_ids();
        if ids.is_empty() {
            return Vec::new();
        }
        let removed = self.diagram.remove_shapes(&ids);
        self.selection.clear();
        tracing::debug!("Deleted {} shapes", removed.len());
        removed
    }

    /// Remove one shape (the trash action), pruning it from the selection
    pub fn remove_shape(&mut self, id: &ShapeId) -> Result<Shape> {
        let removed = self.diagram.remove_shape(id)?;
        self.selection.prune(&BTreeSet::from([id.clone()]));
        Ok(removed)
    }

    pub fn nudge(&mut self, dx: f64, dy: f64) {
        let ids = self.selection.selected_ids();
        self.translate_shapes(&ids, dx, dy);
    }

    // =========================================================================
    // Text Editing
    // =========================================================================

    /// Double click: opens the text overlay on text shapes, otherwise selects
    pub fn double_click_shape(&mut self, id: &ShapeId) -> Result<()> {
        let shape = self
            .diagram
            .get(id)
            .ok_or_else(|| EditError::ShapeNotFound(id.clone()))?;
        let ShapeKind::Text(text) = &shape.kind else {
            self.finish_open_text_edit();
            self.selection.click_shape(id.clone(), false);
            return Ok(());
        };
        let request = TextEditRequest {
            shape_id: id.clone(),
            screen_rect: self.diagram.canvas.to_screen(&bounds(shape)),
            text: text.text.clone(),
            font_size: text.font_size,
            font_family: text.font_family.clone(),
            align: text.align,
        };
        self.finish_open_text_edit();
        self.selection.begin_text_edit(id.clone(), request.text.clone());
        self.overlay.open(request);
        Ok(())
    }

    /// Live update from the overlay while typing
    pub fn preview_text(&mut self, text: &str) -> Result<()> {
        let id = self.editing_id()?;
        self.write_text(&id, text)
    }

    /// Commit the edit (Enter or blur). `text` is the overlay's final value;
    /// `None` keeps whatever was last previewed.
    pub fn commit_text_edit(&mut self, text: Option<&str>) -> Result<()> {
        let id = self.editing_id()?;
        if let Some(text) = text {
            self.write_text(&id, text)?;
        }
        self.selection.end_text_edit();
        self.overlay.close();
        Ok(())
    }

    /// Cancel the edit (Escape), restoring the pre-edit text
    pub fn cancel_text_edit(&mut self) -> Result<()> {
        let (id, original) = self.selection.end_text_edit().ok_or(EditError::NotEditingText)?;
        self.overlay.close();
        self.write_text(&id, &original)
    }

    fn editing_id(&self) -> Result<ShapeId> {
        match self.selection.state() {
            InteractionState::TextEditing { id, .. } => Ok(id.clone()),
            _ => Err(EditError::NotEditingText),
        }
    }

    /// Clicking elsewhere blurs the overlay, which commits
    fn finish_open_text_edit(&mut self) {
        if self.selection.state().is_text_editing() {
            self.selection.end_text_edit();
            self.overlay.close();
        }
    }

    fn write_text(&mut self, id: &ShapeId, text: &str) -> Result<()> {
        let shape = self
            .diagram
            .get_mut(id)
            .ok_or_else(|| EditError::ShapeNotFound(id.clone()))?;
        match &mut shape.kind {
            ShapeKind::Text(t) => {
                t.text = text.to_string();
                Ok(())
            }
            _ => Err(EditError::NotText(id.clone())),
        }
    }

    // =========================================================================
    // Alignment, Order, Selection Helpers
    // =========================================================================

    pub fn align(&mut self, alignment: Alignment) -> Result<()> {
        let moved = align::align(
            self.diagram.shapes(),
            &self.selection.selected_ids(),
            &self.diagram.canvas,
            alignment,
        );
        self.replace_all(moved)
    }

    pub fn distribute(&mut self, direction: DistributeDirection) -> Result<()> {
        let moved = align::distribute(self.diagram.shapes(), &self.selection.selected_ids(), direction);
        self.replace_all(moved)
    }

    fn replace_all(&mut self, shapes: Vec<Shape>) -> Result<()> {
        if let Some(missing) = shapes.iter().find(|s| !self.diagram.contains(&s.id)) {
            return Err(EditError::ShapeNotFound(missing.id.clone()));
        }
        for shape in shapes {
            self.diagram.replace_shape(shape)?;
        }
        Ok(())
    }

    pub fn bring_to_front(&mut self) {
        self.diagram.bring_to_front(&self.selection.selected_ids());
    }

    pub fn send_to_back(&mut self) {
        self.diagram.send_to_back(&self.selection.selected_ids());
    }

    pub fn select_all(&mut self) {
        self.finish_open_text_edit();
        let ids = self.diagram.shapes().iter().map(|s| s.id.clone()).collect();
        self.selection.select(ids);
    }

    /// Copy the selected shapes with fresh ids, offset by the configured
    /// distance, and select the copies
    pub fn duplicate_selection(&mut self) -> Result<Vec<ShapeId>> {
        let selected = self.selection.selected_ids();
        let offset = self.settings.duplicate_offset;
        let copies: Vec<Shape> = self
            .diagram
            .shapes()
            .iter()
            .filter(|s| selected.contains(&s.id))
            .map(|s| {
                let mut copy = s.clone().with_id(ShapeId::new());
                copy.translate(offset, offset);
                copy
            })
            .collect();

        let mut ids = Vec::with_capacity(copies.len());
        for copy in copies {
            ids.push(self.diagram.add_shape(copy)?);
        }
        self.selection.select(ids.iter().cloned().collect());
        Ok(ids)
    }

    // =========================================================================
    // Property Setters
    // =========================================================================

    fn shape_mut(&mut self, id: &ShapeId) -> Result<&mut Shape> {
        self.diagram
            .get_mut(id)
            .ok_or_else(|| EditError::ShapeNotFound(id.clone()))
    }

    pub fn set_fill(&mut self, id: &ShapeId, fill: impl Into<Paint>) -> Result<()> {
        self.shape_mut(id)?.fill = fill.into();
        Ok(())
    }

    pub fn set_stroke(&mut self, id: &ShapeId, stroke: impl Into<Paint>) -> Result<()> {
        self.shape_mut(id)?.stroke = stroke.into();
        Ok(())
    }

    /// Negative or non-finite widths become 0
    pub fn set_stroke_width(&mut self, id: &ShapeId, width: f64) -> Result<()> {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self.shape_mut(id)?.stroke_width = width;
        Ok(())
    }

    pub fn set_text(&mut self, id: &ShapeId, text: &str) -> Result<()> {
        self.write_text(id, text)
    }

    pub fn set_font_size(&mut self, id: &ShapeId, font_size: f64) -> Result<()> {
        let shape = self.shape_mut(id)?;
        match &mut shape.kind {
            ShapeKind::Text(t) => {
                t.font_size = if font_size.is_finite() {
                    font_size.max(MIN_FONT_SIZE)
                } else {
                    t.font_size
                };
                Ok(())
            }
            _ => Err(EditError::NotText(id.clone())),
        }
    }

    /// Rounded rectangles and rectangular callouts only
    pub fn set_corner_radius(&mut self, id: &ShapeId, radius: f64) -> Result<()> {
        let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        let shape = self.shape_mut(id)?;
        match &mut shape.kind {
            ShapeKind::RoundedRect(b) => b.corner_radius = radius,
            ShapeKind::CalloutRect(c) => c.corner_radius = radius,
            other => return Err(unsupported(id, other, "corner radius")),
        }
        Ok(())
    }

    pub fn set_num_points(&mut self, id: &ShapeId, num_points: u32) -> Result<()> {
        let shape = self.shape_mut(id)?;
        match &mut shape.kind {
            ShapeKind::Star(s) => s.num_points = num_points.max(MIN_STAR_POINTS),
            other => return Err(unsupported(id, other, "point count")),
        }
        Ok(())
    }

    pub fn set_sides(&mut self, id: &ShapeId, sides: u32) -> Result<()> {
        let shape = self.shape_mut(id)?;
        match &mut shape.kind {
            ShapeKind::Triangle(p)
            | ShapeKind::Pentagon(p)
            | ShapeKind::Hexagon(p)
            | ShapeKind::Octagon(p)
            | ShapeKind::Diamond(p) => p.sides = Some(sides.max(MIN_POLYGON_SIDES)),
            other => return Err(unsupported(id, other, "side count")),
        }
        Ok(())
    }
}

fn unsupported(id: &ShapeId, kind: &ShapeKind, property: &str) -> EditError {
    EditError::Model(diagram_model::ModelError::InvalidShape(format!(
        "{} ({}) has no {}",
        id,
        kind.type_name(),
        property
    )))
}

//! Inline text editing overlay protocol
//!
//! The editor never draws the edit box itself. It asks an overlay to open over
//! the text shape's screen rectangle and to close when the edit ends; the host
//! UI reports the typed text back through `DiagramEditor::preview_text` and
//! `DiagramEditor::commit_text_edit`.

use diagram_model::geometry::Bounds;
use diagram_model::{ShapeId, TextAlign};

/// Everything an overlay needs to position an edit box over a text shape
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditRequest {
    pub shape_id: ShapeId,
    /// Shape bounds in screen space (canvas bounds times zoom)
    pub screen_rect: Bounds,
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub align: TextAlign,
}

/// Host-provided edit box
pub trait TextEditOverlay {
    fn open(&mut self, request: TextEditRequest);
    fn close(&mut self);
}

/// Overlay that records calls; for hosts without a UI and for tests
#[derive(Debug, Default, Clone)]
pub struct RecordingOverlay {
    pub opened: Vec<TextEditRequest>,
    pub close_count: usize,
}

impl RecordingOverlay {
    pub fn is_open(&self) -> bool {
        self.opened.len() > self.close_count
    }
}

impl TextEditOverlay for RecordingOverlay {
    fn open(&mut self, request: TextEditRequest) {
        self.opened.push(request);
    }

    fn close(&mut self) {
        self.close_count += 1;
    }
}

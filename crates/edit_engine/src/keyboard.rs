//! Keyboard handling: delete, nudge, and text-edit commit/cancel

use crate::selection::InteractionState;
use crate::settings::EditorSettings;
use serde::{Deserialize, Serialize};

/// Where keyboard focus sits when the key arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusTarget {
    /// The canvas or page body
    #[default]
    Canvas,
    /// A text input, textarea, or contenteditable element
    TextInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    Delete,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub focus: FocusTarget,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            focus: FocusTarget::Canvas,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn in_text_input(mut self) -> Self {
        self.focus = FocusTarget::TextInput;
        self
    }
}

/// What a key press should do to the diagram
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    None,
    DeleteSelection,
    Nudge { dx: f64, dy: f64 },
    CommitText,
    CancelText,
}

/// Decide the action for a key press in the given interaction state.
///
/// While a text edit is open only Enter (without Shift) and Escape are
/// handled; every other key belongs to the overlay. Keys typed into any other
/// text field never reach the diagram.
pub fn key_action(event: &KeyEvent, state: &InteractionState, settings: &EditorSettings) -> KeyAction {
    if state.is_text_editing() {
        return match event.key {
            Key::Enter if !event.shift => KeyAction::CommitText,
            Key::Escape => KeyAction::CancelText,
            _ => KeyAction::None,
        };
    }
    if event.focus == FocusTarget::TextInput || state.selected_ids().is_empty() {
        return KeyAction::None;
    }
    if matches!(
        state,
        InteractionState::MarqueeSelecting { .. } | InteractionState::DraggingSelection { .. }
    ) {
        return KeyAction::None;
    }

    let step = if event.shift {
        settings.nudge_step_large
    } else {
        settings.nudge_step
    };
    match event.key {
        Key::Delete | Key::Backspace => KeyAction::DeleteSelection,
        Key::ArrowUp => KeyAction::Nudge { dx: 0.0, dy: -step },
        Key::ArrowDown => KeyAction::Nudge { dx: 0.0, dy: step },
        Key::ArrowLeft => KeyAction::Nudge { dx: -step, dy: 0.0 },
        Key::ArrowRight => KeyAction::Nudge { dx: step, dy: 0.0 },
        _ => KeyAction::None,
    }
}

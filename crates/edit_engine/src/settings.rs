//! Editor interaction settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for pointer and keyboard interaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorSettings {
    /// Arrow-key nudge distance in canvas units
    pub nudge_step: f64,
    /// Nudge distance with Shift held
    pub nudge_step_large: f64,
    /// How long after a drag ends an empty-canvas click is ignored
    pub drag_guard_ms: u64,
    /// Slack, in canvas units, when hit testing pointer positions
    pub hit_tolerance: f64,
    /// Offset applied to duplicated shapes
    pub duplicate_offset: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            drag_guard_ms: 10,
            hit_tolerance: 3.0,
            duplicate_offset: 10.0,
        }
    }
}

impl EditorSettings {
    pub fn drag_guard(&self) -> Duration {
        Duration::from_millis(self.drag_guard_ms)
    }
}

//! Host-agnostic input events.
//!
//! Hosts push [`InputEvent`]s into an [`InputQueue`]; the app drains the
//! queue once per frame, so every scene mutation happens on the frame tick.
//! Events deserialize from JSON for scripted runs:
//!
//! ```json
//! [[{"type": "toggle_select_mode"}, {"type": "click", "x": 400, "y": 300}]]
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::gizmo::TransformMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Cursor position in window pixels
    PointerMoved { x: f32, y: f32 },
    /// Primary button released at window pixels
    Click { x: f32, y: f32 },
    ToggleSelectMode,
    SetTransformMode { mode: TransformMode },
    Resize { width: u32, height: u32 },
    /// Gizmo drag on the current selection: translation, or euler radians
    /// in rotate mode
    DragSelected { delta: [f32; 3] },
}

/// One inner list per frame
pub type InputScript = Vec<Vec<InputEvent>>;

pub fn parse_script(json: &str) -> Result<InputScript, serde_json::Error> {
    serde_json::from_str(json)
}

#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Remove every queued event in arrival order
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, InputEvent> {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Extend<InputEvent> for InputQueue {
    fn extend<I: IntoIterator<Item = InputEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

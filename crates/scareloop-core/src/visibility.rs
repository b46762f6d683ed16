//! Visibility controller.
//!
//! Tracks whether the hosting surface is visible and forwards transitions to
//! the engine: hidden cancels the pending wake-up timer, visible re-arms a
//! fresh random delay when allowed. This component never touches the
//! engine's `active` flag -- an in-flight scare always finishes on its own.

use serde::{Deserialize, Serialize};

use crate::engine::ScareEngine;
use crate::events::Event;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VisibilityController {
    hidden: bool,
}

impl VisibilityController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Apply a visibility transition. Repeated same-state signals are no-ops.
    pub fn set_hidden(
        &mut self,
        hidden: bool,
        engine: &mut ScareEngine,
        safe_mode: bool,
        now_ms: u64,
    ) -> Option<Event> {
        if hidden == self.hidden {
            return None;
        }
        self.hidden = hidden;
        if hidden {
            engine.on_hidden()
        } else {
            engine.on_visible(safe_mode, now_ms)
        }
    }
}

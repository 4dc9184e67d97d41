//! Per-frame input snapshots
//!
//! The host fills one `InputSnapshot` per frame from its key and pointer
//! events. Edges are derived by comparing against the previous frame's
//! snapshot instead of being tracked as mutable press counters.

use glam::DVec2;

use crate::sim::TickInput;

/// Digital inputs the game and editor react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Left arrow: lean left in play, nudge left in the editor
    LeanLeft,
    /// Right arrow: lean right in play, nudge right in the editor
    LeanRight,
    Up,
    Down,
    /// Space: restart after a run ends
    Confirm,
    /// Escape: back to the menu
    Cancel,
    Delete,
    /// Primary pointer button
    Primary,
}

/// Held state of every input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub lean_left: bool,
    pub lean_right: bool,
    pub up: bool,
    pub down: bool,
    pub confirm: bool,
    pub cancel: bool,
    pub delete: bool,
    /// Pointer position in screen space
    pub pointer: DVec2,
    pub primary: bool,
}

impl InputSnapshot {
    pub fn is_down(&self, button: Button) -> bool {
        match button {
            Button::LeanLeft => self.lean_left,
            Button::LeanRight => self.lean_right,
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Confirm => self.confirm,
            Button::Cancel => self.cancel,
            Button::Delete => self.delete,
            Button::Primary => self.primary,
        }
    }

    /// The lean pair fed to every simulation tick this frame
    pub fn lean(&self) -> TickInput {
        TickInput::new(self.lean_left, self.lean_right)
    }

    pub fn with_pointer(mut self, pointer: DVec2) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn pressing(mut self, button: Button) -> Self {
        self.set(button, true);
        self
    }

    pub fn set(&mut self, button: Button, down: bool) {
        let slot = match button {
            Button::LeanLeft => &mut self.lean_left,
            Button::LeanRight => &mut self.lean_right,
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::Confirm => &mut self.confirm,
            Button::Cancel => &mut self.cancel,
            Button::Delete => &mut self.delete,
            Button::Primary => &mut self.primary,
        };
        *slot = down;
    }
}

/// Transitions between two consecutive snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputEdges {
    previous: InputSnapshot,
    current: InputSnapshot,
}

impl InputEdges {
    pub fn between(previous: InputSnapshot, current: InputSnapshot) -> Self {
        Self { previous, current }
    }

    /// Up this frame, down now
    pub fn just_pressed(&self, button: Button) -> bool {
        !self.previous.is_down(button) && self.current.is_down(button)
    }

    pub fn just_released(&self, button: Button) -> bool {
        self.previous.is_down(button) && !self.current.is_down(button)
    }

    pub fn held(&self, button: Button) -> bool {
        self.current.is_down(button)
    }

    pub fn pointer(&self) -> DVec2 {
        self.current.pointer
    }

    pub fn pointer_delta(&self) -> DVec2 {
        self.current.pointer - self.previous.pointer
    }

    pub fn current(&self) -> &InputSnapshot {
        &self.current
    }
}

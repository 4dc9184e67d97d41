//! Editor tool buttons

use glam::DVec2;

use crate::sim::Rect;

/// Action bound to a toolbar button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Hazard,
    Goal,
    Drag,
    Select,
    Reset,
    Play,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Hazard,
        Tool::Goal,
        Tool::Drag,
        Tool::Select,
        Tool::Reset,
        Tool::Play,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Hazard => "obstacle",
            Tool::Goal => "winblock",
            Tool::Drag => "drag",
            Tool::Select => "select",
            Tool::Reset => "reset",
            Tool::Play => "play",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolButton {
    pub tool: Tool,
    /// Screen space
    pub rect: Rect,
}

const BUTTON_X: f64 = 10.0;
const BUTTON_Y: f64 = 10.0;
const BUTTON_WIDTH: f64 = 200.0;
const BUTTON_HEIGHT: f64 = 50.0;
const BUTTON_PITCH: f64 = 60.0;

/// Column of tool buttons in the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct Toolbar {
    buttons: Vec<ToolButton>,
    visible: bool,
}

impl Default for Toolbar {
    fn default() -> Self {
        let buttons = Tool::ALL
            .iter()
            .enumerate()
            .map(|(i, &tool)| ToolButton {
                tool,
                rect: Rect::new(
                    BUTTON_X,
                    BUTTON_Y + BUTTON_PITCH * i as f64,
                    BUTTON_WIDTH,
                    BUTTON_HEIGHT,
                ),
            })
            .collect();
        Self {
            buttons,
            visible: true,
        }
    }
}

impl Toolbar {
    pub fn buttons(&self) -> &[ToolButton] {
        &self.buttons
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Button strictly under a screen point, if the toolbar is shown
    pub fn hit(&self, point: DVec2) -> Option<Tool> {
        if !self.visible {
            return None;
        }
        self.buttons
            .iter()
            .find(|b| b.rect.contains(point))
            .map(|b| b.tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_and_hit() {
        let toolbar = Toolbar::default();
        assert_eq!(toolbar.buttons().len(), 6);
        assert_eq!(toolbar.buttons()[5].rect, Rect::new(10.0, 310.0, 200.0, 50.0));

        assert_eq!(toolbar.hit(DVec2::new(100.0, 35.0)), Some(Tool::Hazard));
        assert_eq!(toolbar.hit(DVec2::new(100.0, 335.0)), Some(Tool::Play));
        // Gap between buttons and exact edges are not on a button
        assert_eq!(toolbar.hit(DVec2::new(100.0, 65.0)), None);
        assert_eq!(toolbar.hit(DVec2::new(10.0, 35.0)), None);
    }

    #[test]
    fn test_hidden_toolbar_never_hits() {
        let mut toolbar = Toolbar::default();
        toolbar.set_visible(false);
        assert_eq!(toolbar.hit(DVec2::new(100.0, 35.0)), None);
    }
}

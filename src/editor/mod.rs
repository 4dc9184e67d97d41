//! Level editor
//!
//! A frame-driven state machine over the editing tools. Each frame the host
//! passes the current input snapshot; the editor derives edges from the
//! previous one, gives the toolbar first claim on the pointer, and otherwise
//! applies the active tool to the level in world space (screen + offset).

pub mod toolbar;

use std::collections::BTreeSet;

use glam::DVec2;

use crate::platform::{Button, InputEdges, InputSnapshot};
use crate::sim::{Level, ObstacleId, ObstacleKind, Rect};

pub use toolbar::{Tool, ToolButton, Toolbar};

/// Active canvas tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    PlaceHazard,
    PlaceGoal,
    /// Move the selection, or pan when nothing is selected
    Drag,
    /// Marquee selection
    Select,
}

impl EditMode {
    fn placing(self) -> Option<ObstacleKind> {
        match self {
            EditMode::PlaceHazard => Some(ObstacleKind::Hazard),
            EditMode::PlaceGoal => Some(ObstacleKind::Goal),
            EditMode::Drag | EditMode::Select => None,
        }
    }
}

/// Requests the editor hands back to the application
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Start a run on a snapshot of the edited level
    Play(Level),
}

/// An obstacle being dragged out; extents may be negative until release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draft {
    pub rect: Rect,
    pub kind: ObstacleKind,
}

/// Every obstacle overlapping `marquee` after sign normalization
pub fn select_in(level: &Level, marquee: Rect) -> BTreeSet<ObstacleId> {
    let area = marquee.normalized();
    level
        .iter()
        .filter(|o| area.overlaps(&o.rect))
        .map(|o| o.id)
        .collect()
}

#[derive(Debug, Clone)]
pub struct Editor {
    level: Level,
    mode: EditMode,
    viewport: DVec2,
    /// World position of the screen's top-left corner
    offset: DVec2,
    toolbar: Toolbar,
    draft: Option<Draft>,
    marquee: Option<Rect>,
    selected: BTreeSet<ObstacleId>,
    /// Last pointer position of an ongoing drag (screen space)
    drag_from: Option<DVec2>,
    /// Where the primary button went down (screen space)
    press_origin: Option<DVec2>,
    previous: InputSnapshot,
}

impl Editor {
    /// Open the editor on `level`, centring the origin in a `viewport`-sized screen
    pub fn new(level: Level, viewport: DVec2) -> Self {
        Self {
            level,
            mode: EditMode::default(),
            viewport,
            offset: -viewport / 2.0,
            toolbar: Toolbar::default(),
            draft: None,
            marquee: None,
            selected: BTreeSet::new(),
            drag_from: None,
            press_origin: None,
            previous: InputSnapshot::default(),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
    }

    pub fn offset(&self) -> DVec2 {
        self.offset
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// Marquee as dragged (extents may be negative)
    pub fn marquee(&self) -> Option<Rect> {
        self.marquee
    }

    pub fn selected(&self) -> &BTreeSet<ObstacleId> {
        &self.selected
    }

    pub fn to_world(&self, screen: DVec2) -> DVec2 {
        screen + self.offset
    }

    /// Drop the level and start an empty unnamed one
    pub fn reset(&mut self) {
        if let Ok(json) = self.level.to_doc().to_json() {
            log::info!("Editor reset, discarding level: {json}");
        }
        let previous = self.previous;
        *self = Self::new(Level::default(), self.viewport);
        self.previous = previous;
    }

    /// Process one frame of input
    pub fn update(&mut self, input: &InputSnapshot) -> Option<EditorEvent> {
        let edges = InputEdges::between(self.previous, *input);
        self.previous = *input;

        if edges.just_pressed(Button::Primary) {
            self.press_origin = Some(edges.pointer());
        }

        let event = if self.on_chrome(&edges) {
            self.handle_toolbar(&edges)
        } else {
            self.handle_canvas(&edges);
            None
        };

        if !edges.held(Button::Primary) {
            self.press_origin = None;
        }
        self.toolbar
            .set_visible(self.draft.is_none() && self.marquee.is_none() && self.drag_from.is_none());

        event
    }

    fn on_chrome(&self, edges: &InputEdges) -> bool {
        self.toolbar.hit(edges.pointer()).is_some()
            || self.press_origin.is_some_and(|p| self.toolbar.hit(p).is_some())
    }

    fn handle_toolbar(&mut self, edges: &InputEdges) -> Option<EditorEvent> {
        if !edges.just_pressed(Button::Primary) {
            return None;
        }
        match self.toolbar.hit(edges.pointer())? {
            Tool::Hazard => self.mode = EditMode::PlaceHazard,
            Tool::Goal => self.mode = EditMode::PlaceGoal,
            Tool::Drag => self.mode = EditMode::Drag,
            Tool::Select => self.mode = EditMode::Select,
            Tool::Reset => self.reset(),
            Tool::Play => {
                log::info!("Playing edited level ({} obstacles)", self.level.len());
                return Some(EditorEvent::Play(self.level.snapshot()));
            }
        }
        log::debug!("Editor mode: {:?}", self.mode);
        None
    }

    fn handle_canvas(&mut self, edges: &InputEdges) {
        self.nudge_and_delete(edges);

        let world = self.to_world(edges.pointer());
        match self.mode {
            EditMode::PlaceHazard | EditMode::PlaceGoal => self.place(edges, world),
            EditMode::Drag => self.drag(edges),
            EditMode::Select => self.select(edges, world),
        }
    }

    /// One unit per arrow key press; delete removes while held
    fn nudge_and_delete(&mut self, edges: &InputEdges) {
        let step = |pos: Button, neg: Button| {
            f64::from(edges.just_pressed(pos)) - f64::from(edges.just_pressed(neg))
        };
        let nudge = DVec2::new(
            step(Button::LeanRight, Button::LeanLeft),
            step(Button::Down, Button::Up),
        );

        if nudge != DVec2::ZERO {
            for &id in &self.selected {
                self.level.move_obstacle(id, nudge);
            }
        }

        if edges.held(Button::Delete) && !self.selected.is_empty() {
            for id in std::mem::take(&mut self.selected) {
                self.level.remove(id);
            }
        }
    }

    fn place(&mut self, edges: &InputEdges, world: DVec2) {
        if edges.held(Button::Primary) {
            if edges.just_pressed(Button::Primary) {
                if let Some(kind) = self.mode.placing() {
                    self.draft = Some(Draft {
                        rect: Rect::at(world),
                        kind,
                    });
                }
            }
            if let Some(draft) = &mut self.draft {
                draft.rect = Rect::spanning(draft.rect.min(), world);
            }
        } else if edges.just_released(Button::Primary) {
            let Some(draft) = self.draft.take() else {
                return;
            };
            if draft.rect.is_degenerate() {
                return;
            }
            let id = self.level.insert(draft.rect.normalized(), draft.kind);
            log::debug!("Placed {:?} {id}", draft.kind);
        }
    }

    fn drag(&mut self, edges: &InputEdges) {
        if !edges.held(Button::Primary) {
            self.drag_from = None;
            return;
        }

        let pointer = edges.pointer();
        let delta = pointer - self.drag_from.unwrap_or(pointer);
        if self.selected.is_empty() {
            self.offset -= delta;
        } else {
            for &id in &self.selected {
                self.level.move_obstacle(id, delta);
            }
        }
        self.drag_from = Some(pointer);
    }

    fn select(&mut self, edges: &InputEdges, world: DVec2) {
        if edges.held(Button::Primary) {
            if edges.just_pressed(Button::Primary) {
                self.marquee = Some(Rect::at(world));
            } else if let Some(marquee) = &mut self.marquee {
                *marquee = Rect::spanning(marquee.min(), world);
                self.selected = select_in(&self.level, *marquee);
            }
        } else if edges.just_released(Button::Primary) {
            self.marquee = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: DVec2 = DVec2::new(800.0, 600.0);

    /// Screen point for a world point with the default offset
    fn screen(x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y) + VIEWPORT / 2.0
    }

    fn idle_at(p: DVec2) -> InputSnapshot {
        InputSnapshot::default().with_pointer(p)
    }

    fn press_at(p: DVec2) -> InputSnapshot {
        idle_at(p).pressing(Button::Primary)
    }

    /// Press at `from`, drag to `to`, release
    fn gesture(editor: &mut Editor, from: DVec2, to: DVec2) {
        editor.update(&idle_at(from));
        editor.update(&press_at(from));
        editor.update(&press_at(to));
        editor.update(&idle_at(to));
    }

    fn editor_with_blocks() -> (Editor, [ObstacleId; 3]) {
        let mut level = Level::new("edit", DVec2::ZERO);
        let a = level.insert(Rect::new(0.0, 0.0, 20.0, 20.0), ObstacleKind::Hazard);
        let b = level.insert(Rect::new(50.0, 0.0, 20.0, 20.0), ObstacleKind::Hazard);
        let c = level.insert(Rect::new(0.0, 100.0, 20.0, 20.0), ObstacleKind::Goal);
        (Editor::new(level, VIEWPORT), [a, b, c])
    }

    #[test]
    fn test_place_normalizes_negative_drag() {
        let mut editor = Editor::new(Level::default(), VIEWPORT);
        gesture(&mut editor, screen(100.0, 100.0), screen(60.0, 70.0));

        let placed: Vec<_> = editor.level().iter().collect();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].rect, Rect::new(60.0, 70.0, 40.0, 30.0));
        assert_eq!(placed[0].kind, ObstacleKind::Hazard);
        assert!(editor.draft().is_none());
        assert!(editor.toolbar().is_visible());
    }

    #[test]
    fn test_zero_area_draft_is_discarded() {
        let mut editor = Editor::new(Level::default(), VIEWPORT);
        gesture(&mut editor, screen(100.0, 100.0), screen(100.0, 150.0));
        assert!(editor.level().is_empty());
    }

    #[test]
    fn test_draft_hides_toolbar() {
        let mut editor = Editor::new(Level::default(), VIEWPORT);
        editor.set_mode(EditMode::PlaceGoal);
        editor.update(&press_at(screen(0.0, 0.0)));
        assert!(!editor.toolbar().is_visible());
        assert_eq!(editor.draft().map(|d| d.kind), Some(ObstacleKind::Goal));
    }

    #[test]
    fn test_toolbar_click_changes_mode_without_placing() {
        let mut editor = Editor::new(Level::default(), VIEWPORT);
        let select_button = DVec2::new(100.0, 215.0);
        gesture(&mut editor, select_button, select_button + DVec2::new(5.0, 5.0));
        assert_eq!(editor.mode(), EditMode::Select);
        assert!(editor.level().is_empty());
    }

    #[test]
    fn test_press_starting_on_chrome_is_ignored_by_canvas() {
        let mut editor = Editor::new(Level::default(), VIEWPORT);
        editor.set_mode(EditMode::Drag);
        // Drag button itself; then move off the toolbar while held
        let origin = DVec2::new(100.0, 155.0);
        gesture(&mut editor, origin, DVec2::new(500.0, 500.0));
        assert_eq!(editor.offset(), -VIEWPORT / 2.0);
    }

    #[test]
    fn test_play_returns_snapshot() {
        let (mut editor, _) = editor_with_blocks();
        let play_button = DVec2::new(100.0, 335.0);
        editor.update(&idle_at(play_button));
        let event = editor.update(&press_at(play_button));
        let Some(EditorEvent::Play(level)) = event else {
            panic!("expected play event, got {event:?}");
        };
        assert_eq!(level.len(), 3);
    }

    #[test]
    fn test_reset_clears_level() {
        let (mut editor, _) = editor_with_blocks();
        let reset_button = DVec2::new(100.0, 275.0);
        editor.update(&press_at(reset_button));
        assert!(editor.level().is_empty());
        assert!(editor.level().is_unnamed());
        assert_eq!(editor.mode(), EditMode::PlaceHazard);
    }

    #[test]
    fn test_marquee_selects_overlapping() {
        let (mut editor, [a, b, _]) = editor_with_blocks();
        editor.set_mode(EditMode::Select);
        gesture(&mut editor, screen(-10.0, -10.0), screen(60.0, 10.0));
        assert_eq!(editor.selected(), &BTreeSet::from([a, b]));
        assert!(editor.marquee().is_none());
    }

    #[test]
    fn test_marquee_touching_edge_selects_nothing() {
        let (editor, _) = editor_with_blocks();
        let touching = Rect::new(20.0, 0.0, 30.0, 20.0);
        assert!(select_in(editor.level(), touching).is_empty());
    }

    #[test]
    fn test_negative_marquee_matches_normalized() {
        let (editor, _) = editor_with_blocks();
        let dragged = Rect::new(60.0, 110.0, -70.0, -120.0);
        let normalized = dragged.normalized();
        assert_eq!(
            select_in(editor.level(), dragged),
            select_in(editor.level(), normalized)
        );
        assert_eq!(select_in(editor.level(), dragged).len(), 3);
    }

    #[test]
    fn test_negative_marquee_gesture() {
        let (mut forward, _) = editor_with_blocks();
        let (mut backward, _) = editor_with_blocks();
        forward.set_mode(EditMode::Select);
        backward.set_mode(EditMode::Select);
        gesture(&mut forward, screen(-5.0, -5.0), screen(30.0, 110.0));
        gesture(&mut backward, screen(30.0, 110.0), screen(-5.0, -5.0));
        assert_eq!(forward.selected(), backward.selected());
        assert_eq!(forward.selected().len(), 2);
    }

    #[test]
    fn test_drag_moves_selection_or_pans() {
        let (mut editor, [a, b, _]) = editor_with_blocks();
        editor.set_mode(EditMode::Drag);
        gesture(&mut editor, screen(300.0, 300.0), screen(320.0, 290.0));
        assert_eq!(editor.offset(), -VIEWPORT / 2.0 - DVec2::new(20.0, -10.0));

        editor.selected = BTreeSet::from([a, b]);
        gesture(&mut editor, screen(300.0, 300.0), screen(305.0, 300.0));
        assert_eq!(editor.level().get(a).map(|o| o.rect.x), Some(5.0));
        assert_eq!(editor.level().get(b).map(|o| o.rect.x), Some(55.0));
    }

    #[test]
    fn test_nudge_once_per_press() {
        let (mut editor, [a, _, c]) = editor_with_blocks();
        editor.selected = BTreeSet::from([a]);
        let away = screen(400.0, 400.0);

        editor.update(&idle_at(away));
        editor.update(&idle_at(away).pressing(Button::LeanRight).pressing(Button::Up));
        editor.update(&idle_at(away).pressing(Button::LeanRight).pressing(Button::Up));
        assert_eq!(editor.level().get(a).map(|o| o.rect.min()), Some(DVec2::new(1.0, -1.0)));
        assert_eq!(editor.level().get(c).map(|o| o.rect.min()), Some(DVec2::new(0.0, 100.0)));
    }

    #[test]
    fn test_delete_removes_selection() {
        let (mut editor, [a, b, c]) = editor_with_blocks();
        editor.selected = BTreeSet::from([a, c]);
        editor.update(&idle_at(screen(400.0, 400.0)).pressing(Button::Delete));
        assert!(editor.selected().is_empty());
        assert!(editor.level().get(a).is_none());
        assert!(editor.level().get(b).is_some());
        assert_eq!(editor.level().len(), 1);
    }
}

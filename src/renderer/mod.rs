//! Drawing seam
//!
//! The game never draws directly. It issues passive requests to a
//! `DrawSurface` in screen space; the host backs it with a canvas, a GPU
//! pipeline or a recorder in tests.

pub mod palette;

use glam::DVec2;

use crate::app::{App, LeaderboardView, Screen, end_message};
use crate::editor::Editor;
use crate::game::Run;
use crate::leaderboard::format_time;
use crate::sim::{ObstacleKind, Rect};

pub use palette::DrawStyle;

/// Where the run clock is drawn
const CLOCK_POS: DVec2 = DVec2::new(30.0, 50.0);

/// Backend receiving draw requests in screen coordinates
pub trait DrawSurface {
    fn clear(&mut self, style: DrawStyle);
    fn fill_rect(&mut self, rect: Rect, style: DrawStyle);
    fn stroke_rect(&mut self, rect: Rect, style: DrawStyle);
    /// Actor sprite centred on `pos`, rotated by `rotation` degrees
    fn draw_actor(&mut self, pos: DVec2, rotation: f64);
    fn draw_text(&mut self, pos: DVec2, text: &str, style: DrawStyle);
}

fn to_screen(rect: Rect, camera: DVec2) -> Rect {
    rect.translated(-camera)
}

fn obstacle_style(kind: ObstacleKind, highlighted: bool) -> DrawStyle {
    match (kind, highlighted) {
        (ObstacleKind::Hazard, false) => DrawStyle::Hazard,
        (ObstacleKind::Hazard, true) => DrawStyle::HazardSelected,
        (ObstacleKind::Goal, false) => DrawStyle::Goal,
        (ObstacleKind::Goal, true) => DrawStyle::GoalSelected,
    }
}

/// Level, actor and clock for a run, with the camera on the actor
pub fn render_run<S: DrawSurface + ?Sized>(surface: &mut S, run: &Run, viewport: DVec2) {
    let camera = run.camera(viewport);
    surface.clear(DrawStyle::Background);
    for obstacle in run.level().iter() {
        surface.fill_rect(to_screen(obstacle.rect, camera), obstacle_style(obstacle.kind, false));
    }
    surface.draw_actor(run.actor().pos - camera, run.actor().rotation);
    surface.draw_text(CLOCK_POS, &format_time(run.elapsed_ms()), DrawStyle::Text);
}

/// Level with selection highlights, the draft, the marquee and the toolbar
pub fn render_editor<S: DrawSurface + ?Sized>(surface: &mut S, editor: &Editor) {
    let camera = editor.offset();
    let level = editor.level();
    surface.clear(DrawStyle::Background);

    for obstacle in level.iter() {
        let selected = editor.selected().contains(&obstacle.id);
        surface.fill_rect(to_screen(obstacle.rect, camera), obstacle_style(obstacle.kind, selected));
    }
    if let Some(draft) = editor.draft() {
        surface.fill_rect(to_screen(draft.rect.normalized(), camera), obstacle_style(draft.kind, false));
    }
    surface.draw_actor(level.player_start() - camera, 0.0);
    if let Some(marquee) = editor.marquee() {
        surface.stroke_rect(to_screen(marquee.normalized(), camera), DrawStyle::Marquee);
    }

    let toolbar = editor.toolbar();
    if toolbar.is_visible() {
        for button in toolbar.buttons() {
            surface.fill_rect(button.rect, DrawStyle::Button);
            let centre = button.rect.min() + DVec2::new(button.rect.width, button.rect.height) / 2.0;
            surface.draw_text(centre, button.tool.label(), DrawStyle::Text);
        }
    }
}

/// End screen: frozen run, outcome text and the leaderboard if any
fn render_ended<S: DrawSurface + ?Sized>(surface: &mut S, app: &App, run: &Run, viewport: DVec2) {
    render_run(surface, run, viewport);
    let centre = viewport / 2.0;
    if let Some((headline, subline)) = end_message(run.outcome()) {
        surface.draw_text(centre - DVec2::new(0.0, 20.0), headline, DrawStyle::Title);
        surface.draw_text(centre + DVec2::new(0.0, 20.0), subline, DrawStyle::Text);
    }

    let origin = DVec2::new(50.0, 50.0);
    match app.leaderboard() {
        Some(LeaderboardView::Ready(board)) => {
            for (i, entry) in board.entries.iter().enumerate() {
                let line = format!("{}. {} {}", i + 1, entry.username, format_time(entry.time_ms));
                surface.draw_text(origin + DVec2::new(0.0, 30.0 * i as f64), &line, DrawStyle::Text);
            }
        }
        Some(LeaderboardView::Loading) => surface.draw_text(origin, "Loading...", DrawStyle::Text),
        Some(LeaderboardView::Unavailable) => {
            surface.draw_text(origin, "Leaderboard unavailable", DrawStyle::Text)
        }
        None => {}
    }
}

/// Draw whatever screen the app is on
pub fn render_app<S: DrawSurface + ?Sized>(surface: &mut S, app: &App) {
    let viewport = app.viewport();
    match app.screen() {
        Screen::MainMenu => surface.clear(DrawStyle::Background),
        Screen::Playing(run) => render_run(surface, run, viewport),
        Screen::Ended { run, .. } => render_ended(surface, app, run, viewport),
        Screen::Editor(editor) => render_editor(surface, editor),
    }
}

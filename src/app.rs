//! Application screens and transitions
//!
//! Each screen owns only what it needs: a run while playing or on the end
//! screen, the editor state while editing. The host calls `frame` once per
//! animation frame and forwards any score submission or leaderboard request
//! to the network layer; results come back later through `apply_leaderboard`.

use std::collections::HashMap;

use glam::DVec2;
use thiserror::Error;

use crate::editor::{Editor, EditorEvent};
use crate::game::Run;
use crate::leaderboard::{Leaderboard, ScoreRecord, ScoreSubmission, SubmitDecision};
use crate::levels;
use crate::persistence::{PersistenceError, SubmitError, SubmitResult};
use crate::platform::{Button, InputEdges, InputSnapshot};
use crate::settings::Settings;
use crate::sim::{Level, Outcome};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("no built-in level named '{0}'")]
    UnknownLevel(String),
}

/// What is on screen
#[derive(Debug, Clone)]
pub enum Screen {
    MainMenu,
    Playing(Run),
    /// A run ended; waiting for restart or cancel
    Ended { run: Run, outcome: Outcome },
    Editor(Editor),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::MainMenu => "menu",
            Screen::Playing(_) => "game",
            Screen::Ended { .. } => "ended",
            Screen::Editor(_) => "editor",
        }
    }
}

/// Leaderboard state for the end screen
#[derive(Debug, Clone, PartialEq)]
pub enum LeaderboardView {
    Loading,
    Ready(Leaderboard),
    /// The score service could not be reached
    Unavailable,
}

/// Requests for the host's network layer; fire-and-forget from the app's side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameRequests {
    pub submission: Option<ScoreSubmission>,
    /// Level id whose leaderboard should be fetched
    pub fetch_leaderboard: Option<String>,
}

/// Headline and sub-line shown when a run ends
pub fn end_message(outcome: Outcome) -> Option<(&'static str, &'static str)> {
    match outcome {
        Outcome::Continue => None,
        Outcome::HazardHit => Some(("You Bonked your head", "Press Space to try again")),
        Outcome::FellOutOfWorld => Some(("You fell out of the world", "Press Space to try again")),
        Outcome::GoalReached => Some(("Yay you made it", "Nice job")),
    }
}

#[derive(Debug)]
pub struct App {
    settings: Settings,
    viewport: DVec2,
    screen: Screen,
    previous: InputSnapshot,
    /// Level being authored; survives leaving the editor until it is reset
    editing: Option<Level>,
    /// Best time per level the score service has confirmed for the player
    known_best: HashMap<String, f64>,
    leaderboard: Option<(String, LeaderboardView)>,
}

impl App {
    pub fn new(settings: Settings, viewport: DVec2) -> Self {
        Self {
            settings,
            viewport,
            screen: Screen::MainMenu,
            previous: InputSnapshot::default(),
            editing: None,
            known_best: HashMap::new(),
            leaderboard: None,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> DVec2 {
        self.viewport
    }

    /// Leaderboard for the level on the end screen, if one was requested
    pub fn leaderboard(&self) -> Option<&LeaderboardView> {
        self.leaderboard.as_ref().map(|(_, view)| view)
    }

    pub fn known_best(&self, level_id: &str) -> Option<f64> {
        self.known_best.get(level_id).copied()
    }

    /// Start a run on `level`
    pub fn play(&mut self, level: &Level, now_ms: f64) {
        self.leaderboard = None;
        self.screen = Screen::Playing(Run::start(level, &self.settings, now_ms));
    }

    /// Start a run on a built-in level
    pub fn play_level(&mut self, id: &str, now_ms: f64) -> Result<(), AppError> {
        let level = levels::by_id(id).ok_or_else(|| AppError::UnknownLevel(id.to_string()))?;
        self.play(&level, now_ms);
        Ok(())
    }

    /// Open the editor on the level last edited, or an empty one
    pub fn open_editor(&mut self) {
        let level = self.editing.clone().unwrap_or_default();
        self.open_editor_with(level);
    }

    /// Open the editor on `level`, replacing whatever was being edited
    pub fn open_editor_with(&mut self, level: Level) {
        log::info!("Opening editor on '{}' ({} obstacles)", level.name, level.len());
        self.leaderboard = None;
        self.editing = Some(level.clone());
        self.screen = Screen::Editor(Editor::new(level, self.viewport));
    }

    /// Level the editor will reopen on
    pub fn editing(&self) -> Option<&Level> {
        self.editing.as_ref()
    }

    /// Process one animation frame
    pub fn frame(&mut self, input: &InputSnapshot, now_ms: f64) -> FrameRequests {
        let edges = InputEdges::between(self.previous, *input);
        self.previous = *input;

        if edges.just_pressed(Button::Cancel) && !matches!(self.screen, Screen::MainMenu) {
            log::info!("Returning to menu from {}", self.screen.name());
            if let Screen::Editor(editor) = &self.screen {
                self.editing = Some(editor.level().clone());
            }
            self.screen = Screen::MainMenu;
            self.leaderboard = None;
            return FrameRequests::default();
        }

        let mut requests = FrameRequests::default();
        let screen = std::mem::replace(&mut self.screen, Screen::MainMenu);
        self.screen = match screen {
            Screen::MainMenu => Screen::MainMenu,
            Screen::Playing(mut run) => match run.advance(now_ms, input.lean()) {
                Some(outcome) => {
                    requests = self.on_run_ended(&run, outcome);
                    Screen::Ended { run, outcome }
                }
                None => Screen::Playing(run),
            },
            Screen::Ended { mut run, outcome } => {
                if edges.just_pressed(Button::Confirm) {
                    run.restart(now_ms);
                    self.leaderboard = None;
                    Screen::Playing(run)
                } else {
                    Screen::Ended { run, outcome }
                }
            }
            Screen::Editor(mut editor) => match editor.update(input) {
                Some(EditorEvent::Play(level)) => {
                    self.editing = Some(editor.level().clone());
                    Screen::Playing(Run::start(&level, &self.settings, now_ms))
                }
                None => Screen::Editor(editor),
            },
        };
        requests
    }

    fn on_run_ended(&mut self, run: &Run, outcome: Outcome) -> FrameRequests {
        let mut requests = FrameRequests::default();
        if outcome != Outcome::GoalReached {
            return requests;
        }
        let Some(finished) = run.finish() else {
            return requests;
        };
        let Some(username) = self.settings.player().map(str::to_string) else {
            log::debug!("Not logged in, skipping score submission");
            return requests;
        };

        let level = run.level();
        let known = self.known_best(&level.name);
        match SubmitDecision::check(Some(username.as_str()), level, finished.time_ms, known) {
            SubmitDecision::Submit => {
                log::info!("Submitting {}ms on '{}'", finished.time_ms, level.name);
                requests.submission = Some(ScoreSubmission {
                    level_id: finished.level_id,
                    username,
                    time_ms: finished.time_ms,
                    replay: finished.replay,
                });
            }
            decision => log::debug!("Score not submitted: {decision:?}"),
        }

        if !level.is_unnamed() {
            self.leaderboard = Some((level.name.clone(), LeaderboardView::Loading));
            requests.fetch_leaderboard = Some(level.name.clone());
        }
        requests
    }

    /// Apply the score service's answer to a submission from `frame`
    ///
    /// Only an accepted submission moves the known best; a failed one leaves
    /// it alone so the next finish is sent again.
    pub fn apply_submission(&mut self, submission: &ScoreSubmission, result: Result<SubmitResult, SubmitError>) {
        match result {
            Ok(result) => {
                log::debug!("Submission on '{}' acknowledged: {result:?}", submission.level_id);
                self.record_best(&submission.level_id, submission.time_ms);
            }
            Err(err) => log::warn!("Submission on '{}' failed: {err}", submission.level_id),
        }
    }

    fn record_best(&mut self, level_id: &str, time_ms: f64) {
        let entry = self.known_best.entry(level_id.to_string()).or_insert(time_ms);
        *entry = entry.min(time_ms);
    }

    /// Apply a leaderboard fetch result; stale results for other levels are dropped
    pub fn apply_leaderboard(&mut self, level_id: &str, result: Result<Vec<ScoreRecord>, PersistenceError>) {
        let Some((pending, _)) = &self.leaderboard else {
            return;
        };
        if pending != level_id {
            log::debug!("Dropping stale leaderboard for '{level_id}'");
            return;
        }

        let new_view = match result {
            Ok(records) => {
                let board = Leaderboard::from_records(level_id, &records, self.settings.leaderboard_rows);
                if let Some(best) = self.settings.player().and_then(|user| best_of(&records, user)) {
                    self.record_best(level_id, best);
                }
                LeaderboardView::Ready(board)
            }
            Err(err) => {
                log::warn!("Leaderboard unavailable for '{level_id}': {err}");
                LeaderboardView::Unavailable
            }
        };
        if let Some((_, view)) = &mut self.leaderboard {
            *view = new_view;
        }
    }
}

fn best_of(records: &[ScoreRecord], username: &str) -> Option<f64> {
    records
        .iter()
        .filter(|r| r.username == username)
        .map(|r| r.time_ms)
        .min_by(f64::total_cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ObstacleKind, Rect, Replay};

    const VIEWPORT: DVec2 = DVec2::new(800.0, 600.0);

    fn drop_level(name: &str) -> Level {
        let mut level = Level::new(name, DVec2::ZERO);
        level.insert(Rect::new(-50.0, 40.0, 100.0, 20.0), ObstacleKind::Goal);
        level
    }

    fn logged_in() -> Settings {
        Settings {
            username: Some("ada".into()),
            ..Settings::default()
        }
    }

    /// Run frames until the run ends, returning the requests of the final frame
    fn play_out(app: &mut App, now: &mut f64) -> FrameRequests {
        let idle = InputSnapshot::default();
        for _ in 0..10_000 {
            *now += 17.0;
            let requests = app.frame(&idle, *now);
            if matches!(app.screen(), Screen::Ended { .. }) {
                return requests;
            }
        }
        panic!("run never ended");
    }

    /// Restart from the end screen and play the run out again
    fn replay_run(app: &mut App, now: &mut f64) -> FrameRequests {
        app.frame(&InputSnapshot::default().pressing(Button::Confirm), *now);
        assert!(matches!(app.screen(), Screen::Playing(_)));
        play_out(app, now)
    }

    #[test]
    fn test_goal_produces_submission() {
        let mut app = App::new(logged_in(), VIEWPORT);
        let mut now = 0.0;
        app.play(&drop_level("drop"), now);

        let requests = play_out(&mut app, &mut now);
        let submission = requests.submission.unwrap();
        assert_eq!(submission.level_id, "drop");
        assert_eq!(submission.username, "ada");
        assert_eq!(submission.time_ms, submission.replay.tick_count() as f64 * 5.0);
        assert_eq!(requests.fetch_leaderboard.as_deref(), Some("drop"));
        assert_eq!(app.leaderboard(), Some(&LeaderboardView::Loading));
        // Nothing is known until the service answers
        assert_eq!(app.known_best("drop"), None);
    }

    #[test]
    fn test_known_best_waits_for_acknowledgement() {
        let mut app = App::new(logged_in(), VIEWPORT);
        let mut now = 0.0;
        app.play(&drop_level("drop"), now);
        let first = play_out(&mut app, &mut now).submission.unwrap();

        // A failed submission is retried on the next finish
        app.apply_submission(
            &first,
            Err(SubmitError::Store(PersistenceError::Unavailable("timeout".into()))),
        );
        assert_eq!(app.known_best("drop"), None);
        let second = replay_run(&mut app, &mut now).submission.unwrap();
        assert_eq!(second.time_ms, first.time_ms);

        // Once accepted, the same time is no longer an improvement
        app.apply_submission(&second, Ok(SubmitResult::Improved));
        assert_eq!(app.known_best("drop"), Some(first.time_ms));
        assert!(replay_run(&mut app, &mut now).submission.is_none());
    }

    #[test]
    fn test_anonymous_and_unnamed_never_submit() {
        let mut app = App::new(Settings::default(), VIEWPORT);
        let mut now = 0.0;
        app.play(&drop_level("drop"), now);
        assert!(play_out(&mut app, &mut now).submission.is_none());

        let mut app = App::new(logged_in(), VIEWPORT);
        app.play(&drop_level(crate::sim::UNNAMED_LEVEL), now);
        let requests = play_out(&mut app, &mut now);
        assert!(requests.submission.is_none());
        assert!(requests.fetch_leaderboard.is_none());
    }

    #[test]
    fn test_fall_ends_without_requests() {
        let mut app = App::new(logged_in(), VIEWPORT);
        let mut now = 0.0;
        app.play(&Level::new("void", DVec2::ZERO), now);
        let requests = play_out(&mut app, &mut now);
        assert_eq!(requests, FrameRequests::default());
        let Screen::Ended { outcome, .. } = app.screen() else {
            panic!("expected end screen");
        };
        assert_eq!(*outcome, Outcome::FellOutOfWorld);
        assert_eq!(end_message(*outcome).map(|m| m.0), Some("You fell out of the world"));
    }

    #[test]
    fn test_cancel_returns_to_menu() {
        let mut app = App::new(Settings::default(), VIEWPORT);
        app.play_level("old1", 0.0).unwrap();
        let cancel = InputSnapshot::default().pressing(Button::Cancel);
        app.frame(&cancel, 5.0);
        assert!(matches!(app.screen(), Screen::MainMenu));

        app.open_editor();
        app.frame(&InputSnapshot::default(), 10.0);
        app.frame(&cancel, 15.0);
        assert!(matches!(app.screen(), Screen::MainMenu));
    }

    #[test]
    fn test_unknown_level() {
        let mut app = App::new(Settings::default(), VIEWPORT);
        assert_eq!(
            app.play_level("nope", 0.0),
            Err(AppError::UnknownLevel("nope".into()))
        );
        assert!(matches!(app.screen(), Screen::MainMenu));
    }

    #[test]
    fn test_editor_play_button_starts_run() {
        let mut app = App::new(Settings::default(), VIEWPORT);
        app.open_editor_with(drop_level("custom"));
        let play_button = InputSnapshot::default().with_pointer(DVec2::new(100.0, 335.0));
        app.frame(&play_button, 0.0);
        app.frame(&play_button.pressing(Button::Primary), 5.0);
        let Screen::Playing(run) = app.screen() else {
            panic!("expected a run");
        };
        assert_eq!(run.level().name, "custom");
    }

    #[test]
    fn test_edited_level_survives_play_and_cancel() {
        let mut app = App::new(Settings::default(), VIEWPORT);
        app.open_editor();
        let at = |x: f64, y: f64| InputSnapshot::default().with_pointer(DVec2::new(x, y));
        let cancel = InputSnapshot::default().pressing(Button::Cancel);
        let mut now = 0.0;
        let mut run = |app: &mut App, frames: &[InputSnapshot]| {
            for frame in frames {
                now += 5.0;
                app.frame(frame, now);
            }
        };

        // Drag out one hazard, then press Play
        run(
            &mut app,
            &[
                at(400.0, 400.0),
                at(400.0, 400.0).pressing(Button::Primary),
                at(500.0, 450.0).pressing(Button::Primary),
                at(500.0, 450.0),
                at(100.0, 335.0),
                at(100.0, 335.0).pressing(Button::Primary),
            ],
        );
        assert!(matches!(app.screen(), Screen::Playing(_)));
        run(&mut app, &[cancel]);
        assert!(matches!(app.screen(), Screen::MainMenu));

        app.open_editor();
        let Screen::Editor(editor) = app.screen() else {
            panic!("expected the editor");
        };
        assert_eq!(editor.level().len(), 1);

        // Reset is the only way to drop the draft
        run(
            &mut app,
            &[
                InputSnapshot::default(),
                at(100.0, 275.0),
                at(100.0, 275.0).pressing(Button::Primary),
                at(100.0, 275.0),
                cancel,
            ],
        );
        assert!(matches!(app.screen(), Screen::MainMenu));
        app.open_editor();
        let Screen::Editor(editor) = app.screen() else {
            panic!("expected the editor");
        };
        assert!(editor.level().is_empty());
    }

    #[test]
    fn test_leaderboard_results() {
        let mut app = App::new(logged_in(), VIEWPORT);
        let mut now = 0.0;
        app.play(&drop_level("drop"), now);
        play_out(&mut app, &mut now);

        let record = |user: &str, time_ms: f64| ScoreRecord {
            level_id: "drop".into(),
            username: user.into(),
            time_ms,
            replay: Replay::new(),
        };
        app.apply_leaderboard("other", Ok(vec![record("bob", 1.0)]));
        assert_eq!(app.leaderboard(), Some(&LeaderboardView::Loading));

        app.apply_leaderboard("drop", Ok(vec![record("bob", 20.0), record("ada", 10.0)]));
        let Some(LeaderboardView::Ready(board)) = app.leaderboard() else {
            panic!("expected a ready leaderboard");
        };
        assert_eq!(board.entries[0].username, "ada");
        assert_eq!(app.known_best("drop"), Some(10.0));

        app.apply_leaderboard(
            "drop",
            Err(PersistenceError::Unavailable("connection refused".into())),
        );
        assert_eq!(app.leaderboard(), Some(&LeaderboardView::Unavailable));
    }
}

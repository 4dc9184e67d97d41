//! A single attempt at a level
//!
//! Owns the level snapshot, the actor and the replay being recorded. The host
//! calls `advance` once per frame; the run catches up on owed ticks and stops
//! at the first terminal outcome.

use glam::DVec2;

use crate::platform::TickClock;
use crate::settings::Settings;
use crate::sim::{Level, Outcome, PogoDude, Replay, SimConfig, TickInput, tick};

/// A run that reached a terminal outcome
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedRun {
    pub level_id: String,
    pub outcome: Outcome,
    pub ticks: u64,
    pub time_ms: f64,
    pub replay: Replay,
}

#[derive(Debug, Clone)]
pub struct Run {
    level: Level,
    actor: PogoDude,
    replay: Replay,
    ticks: u64,
    outcome: Outcome,
    config: SimConfig,
    clock: TickClock,
}

impl Run {
    /// Start on a fresh snapshot of `level`
    pub fn start(level: &Level, settings: &Settings, now_ms: f64) -> Self {
        let level = level.snapshot();
        let config = settings.sim_config();
        log::info!("Starting run on '{}' at {}ms per tick", level.name, config.mspt);
        Self {
            actor: PogoDude::new(level.player_start()),
            level,
            replay: Replay::new(),
            ticks: 0,
            outcome: Outcome::Continue,
            config,
            clock: TickClock::start(now_ms, config.mspt, settings.max_catch_up_ticks),
        }
    }

    /// Back to spawn with an empty replay
    pub fn restart(&mut self, now_ms: f64) {
        log::info!("Restarting run on '{}'", self.level.name);
        self.actor.reset(self.level.player_start());
        self.replay.clear();
        self.ticks = 0;
        self.outcome = Outcome::Continue;
        self.clock.reset(now_ms);
    }

    /// Run exactly one tick, recording its input
    ///
    /// Once the run is over further calls are ignored and return the final outcome.
    pub fn step(&mut self, input: TickInput) -> Outcome {
        if self.outcome.is_terminal() {
            return self.outcome;
        }

        self.replay.push(input);
        self.ticks += 1;
        self.outcome = tick(&self.level, &mut self.actor, input, &self.config);

        if self.outcome.is_terminal() {
            log::info!(
                "Run on '{}' ended with {:?} after {} ticks ({}ms)",
                self.level.name,
                self.outcome,
                self.ticks,
                self.elapsed_ms()
            );
        }
        self.outcome
    }

    /// Catch up to the wall clock; returns the terminal outcome if one was reached
    pub fn advance(&mut self, now_ms: f64, input: TickInput) -> Option<Outcome> {
        if self.outcome.is_terminal() {
            return Some(self.outcome);
        }

        let due = self.clock.due(now_ms);
        for _ in 0..due.ticks {
            let outcome = self.step(input);
            if outcome.is_terminal() {
                return Some(outcome);
            }
        }
        None
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn actor(&self) -> &PogoDude {
        &self.actor
    }

    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Simulated time so far, including a terminal tick
    pub fn elapsed_ms(&self) -> f64 {
        self.config.ticks_to_ms(self.ticks)
    }

    /// World position of the screen's top-left corner, centred on the actor
    pub fn camera(&self, viewport: DVec2) -> DVec2 {
        self.actor.pos - viewport / 2.0
    }

    /// Final result of a run that has ended
    pub fn finish(&self) -> Option<FinishedRun> {
        self.is_over().then(|| FinishedRun {
            level_id: self.level.name.clone(),
            outcome: self.outcome,
            ticks: self.ticks,
            time_ms: self.elapsed_ms(),
            replay: self.replay.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ObstacleKind, Rect, ReplayOutcome, simulate};

    fn drop_level() -> Level {
        let mut level = Level::new("drop", DVec2::ZERO);
        level.insert(Rect::new(-50.0, 40.0, 100.0, 20.0), ObstacleKind::Goal);
        level
    }

    #[test]
    fn test_step_records_and_ends() {
        let settings = Settings::default();
        let mut run = Run::start(&drop_level(), &settings, 0.0);
        let mut outcome = Outcome::Continue;
        for _ in 0..10_000 {
            outcome = run.step(TickInput::default());
            if outcome.is_terminal() {
                break;
            }
        }
        assert_eq!(outcome, Outcome::GoalReached);
        assert_eq!(run.replay().tick_count(), run.ticks());
        assert_eq!(run.elapsed_ms(), run.ticks() as f64 * 5.0);

        // Ended runs ignore further input
        let ticks = run.ticks();
        assert_eq!(run.step(TickInput::new(true, false)), Outcome::GoalReached);
        assert_eq!(run.ticks(), ticks);
    }

    #[test]
    fn test_finished_run_replays_identically() {
        let level = drop_level();
        let settings = Settings::default();
        let mut run = Run::start(&level, &settings, 0.0);
        let mut now = 0.0;
        while run.advance(now, TickInput::new(false, true)).is_none() {
            now += 17.0;
        }

        let finished = run.finish().unwrap();
        let replayed = simulate(&level, &finished.replay, &settings.sim_config());
        assert_eq!(replayed.outcome, ReplayOutcome::Ended(finished.outcome));
        assert_eq!(replayed.ticks, finished.ticks);
        assert_eq!(replayed.elapsed_ms, finished.time_ms);
    }

    #[test]
    fn test_advance_follows_clock() {
        let settings = Settings::default();
        let mut run = Run::start(&Level::new("void", DVec2::ZERO), &settings, 100.0);
        assert_eq!(run.advance(100.0, TickInput::default()), None);
        assert_eq!(run.ticks(), 0);
        assert_eq!(run.advance(117.0, TickInput::default()), None);
        assert_eq!(run.ticks(), 4);
        assert!(run.finish().is_none());
    }

    #[test]
    fn test_restart_clears_replay() {
        let settings = Settings::default();
        let mut run = Run::start(&drop_level(), &settings, 0.0);
        run.step(TickInput::new(true, false));
        run.step(TickInput::new(true, false));
        run.restart(50.0);
        assert_eq!(run.ticks(), 0);
        assert!(run.replay().is_empty());
        assert_eq!(run.actor().pos, DVec2::ZERO);
        assert_eq!(run.outcome(), Outcome::Continue);
    }

    #[test]
    fn test_camera_centres_actor() {
        let run = Run::start(&drop_level(), &Settings::default(), 0.0);
        assert_eq!(run.camera(DVec2::new(800.0, 600.0)), DVec2::new(-400.0, -300.0));
    }
}

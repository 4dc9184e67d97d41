//! Run-length encoded input replays
//!
//! A replay stores one input class per tick, collapsed into maximal runs.
//! Feeding the decoded stream back through `tick` reproduces the run exactly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::level::Level;
use super::state::{PogoDude, SimConfig};
use super::tick::{Outcome, TickInput, tick};

/// Lean input collapsed into one of four symbols
///
/// Serialized as a small integer: bit 0 is left, bit 1 is right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum InputClass {
    None,
    Left,
    Right,
    Both,
}

impl InputClass {
    pub fn classify(input: TickInput) -> Self {
        match (input.lean_left, input.lean_right) {
            (false, false) => InputClass::None,
            (true, false) => InputClass::Left,
            (false, true) => InputClass::Right,
            (true, true) => InputClass::Both,
        }
    }

    pub fn input(self) -> TickInput {
        match self {
            InputClass::None => TickInput::new(false, false),
            InputClass::Left => TickInput::new(true, false),
            InputClass::Right => TickInput::new(false, true),
            InputClass::Both => TickInput::new(true, true),
        }
    }
}

impl From<InputClass> for u8 {
    fn from(class: InputClass) -> u8 {
        match class {
            InputClass::None => 0,
            InputClass::Left => 1,
            InputClass::Right => 2,
            InputClass::Both => 3,
        }
    }
}

impl TryFrom<u8> for InputClass {
    type Error = ReplayError;

    fn try_from(code: u8) -> Result<Self, ReplayError> {
        match code {
            0 => Ok(InputClass::None),
            1 => Ok(InputClass::Left),
            2 => Ok(InputClass::Right),
            3 => Ok(InputClass::Both),
            other => Err(ReplayError::UnknownSymbol(other)),
        }
    }
}

/// Problems with a decoded run list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("unknown input symbol: {0}")]
    UnknownSymbol(u8),
    #[error("run {index} has zero length")]
    EmptyRun { index: usize },
    #[error("runs {index} and {} share input class {class:?}", .index + 1)]
    UnmergedRuns { index: usize, class: InputClass },
}

/// `(class, length)` pair; serialized as `[symbol, length]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayRun(pub InputClass, pub u32);

impl ReplayRun {
    pub fn class(&self) -> InputClass {
        self.0
    }

    pub fn ticks(&self) -> u32 {
        self.1
    }
}

/// Run-length encoded per-tick input log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<ReplayRun>", try_from = "Vec<ReplayRun>")]
pub struct Replay {
    runs: Vec<ReplayRun>,
}

impl Replay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a tick-by-tick input stream
    pub fn encode<I: IntoIterator<Item = TickInput>>(inputs: I) -> Self {
        let mut replay = Self::new();
        for input in inputs {
            replay.push(input);
        }
        replay
    }

    /// Record one tick of input
    pub fn push(&mut self, input: TickInput) {
        let class = InputClass::classify(input);
        match self.runs.last_mut() {
            Some(ReplayRun(last, len)) if *last == class => *len += 1,
            _ => self.runs.push(ReplayRun(class, 1)),
        }
    }

    /// Expand back into one input per tick
    pub fn decode(&self) -> impl Iterator<Item = TickInput> + '_ {
        self.runs
            .iter()
            .flat_map(|run| std::iter::repeat_n(run.class().input(), run.ticks() as usize))
    }

    pub fn runs(&self) -> &[ReplayRun] {
        &self.runs
    }

    /// Total ticks encoded
    pub fn tick_count(&self) -> u64 {
        self.runs.iter().map(|run| u64::from(run.ticks())).sum()
    }

    /// Simulated time covered by the encoded ticks
    pub fn duration_ms(&self, config: &SimConfig) -> f64 {
        config.ticks_to_ms(self.tick_count())
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }
}

impl From<Replay> for Vec<ReplayRun> {
    fn from(replay: Replay) -> Self {
        replay.runs
    }
}

impl TryFrom<Vec<ReplayRun>> for Replay {
    type Error = ReplayError;

    fn try_from(runs: Vec<ReplayRun>) -> Result<Self, ReplayError> {
        if let Some(index) = runs.iter().position(|run| run.ticks() == 0) {
            return Err(ReplayError::EmptyRun { index });
        }
        if let Some(index) = runs.windows(2).position(|w| w[0].class() == w[1].class()) {
            return Err(ReplayError::UnmergedRuns {
                index,
                class: runs[index].class(),
            });
        }
        Ok(Self { runs })
    }
}

/// How a replayed run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayOutcome {
    /// A tick produced a terminal outcome
    Ended(Outcome),
    /// Input ran out before anything terminal happened
    Unfinished,
}

/// Result of replaying a recorded run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayResult {
    pub outcome: ReplayOutcome,
    /// Ticks executed, including the terminal one
    pub ticks: u64,
    pub elapsed_ms: f64,
}

/// Re-run a level from its spawn point using the recorded input
pub fn simulate(level: &Level, replay: &Replay, config: &SimConfig) -> ReplayResult {
    let mut actor = PogoDude::new(level.player_start());
    let mut ticks = 0u64;
    let mut outcome = ReplayOutcome::Unfinished;

    for input in replay.decode() {
        ticks += 1;
        let result = tick(level, &mut actor, input, config);
        if result.is_terminal() {
            outcome = ReplayOutcome::Ended(result);
            break;
        }
    }

    ReplayResult {
        outcome,
        ticks,
        elapsed_ms: config.ticks_to_ms(ticks),
    }
}

//! Replay-driven validation of submitted times
//!
//! A submitted time is only accepted if re-running the submitted replay on the
//! level reaches the goal on exactly the last encoded tick, and the claimed
//! time equals the encoded duration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::leaderboard::ScoreSubmission;
use crate::sim::{Level, Outcome, Replay, ReplayOutcome, SimConfig, simulate};

/// Longest run the verifier will re-simulate (10 minutes of game time)
pub const MAX_RUN_MS: u64 = 10 * 60 * 1000;

/// Tick budget for one verification at the configured tick length
pub fn max_ticks(config: &SimConfig) -> u64 {
    MAX_RUN_MS / u64::from(config.mspt.max(1))
}

/// Why a submission was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerifyError {
    #[error("replay is empty")]
    EmptyReplay,
    #[error("replay encodes {ticks} ticks, more than the {max} allowed")]
    TooLong { ticks: u64, max: u64 },
    #[error("claimed time is not a finite positive number: {claimed}")]
    InvalidTime { claimed: f64 },
    #[error("duration mismatch: claimed={claimed}ms, encoded={encoded}ms")]
    DurationMismatch { claimed: f64, encoded: f64 },
    #[error("replay ended at tick {ended_at} but encodes {encoded} ticks")]
    TrailingInput { ended_at: u64, encoded: u64 },
    #[error("replay exhausted after {ticks} ticks without finishing")]
    Unfinished { ticks: u64 },
    #[error("replay ended with {outcome:?} instead of reaching the goal")]
    NotAGoal { outcome: Outcome },
}

/// A submission whose time was reproduced by simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedRun {
    pub level_id: String,
    pub username: String,
    pub ticks: u64,
    pub time_ms: f64,
}

/// Check a replay against a claimed time on a level
pub fn verify_replay(
    level: &Level,
    replay: &Replay,
    claimed_ms: f64,
    config: &SimConfig,
) -> Result<u64, VerifyError> {
    if replay.is_empty() {
        return Err(VerifyError::EmptyReplay);
    }
    let max = max_ticks(config);
    if replay.tick_count() > max {
        return Err(VerifyError::TooLong {
            ticks: replay.tick_count(),
            max,
        });
    }
    if !claimed_ms.is_finite() || claimed_ms <= 0.0 {
        return Err(VerifyError::InvalidTime {
            claimed: claimed_ms,
        });
    }

    let encoded = replay.duration_ms(config);
    if encoded != claimed_ms {
        return Err(VerifyError::DurationMismatch {
            claimed: claimed_ms,
            encoded,
        });
    }

    let result = simulate(level, replay, config);
    match result.outcome {
        ReplayOutcome::Unfinished => Err(VerifyError::Unfinished {
            ticks: result.ticks,
        }),
        ReplayOutcome::Ended(Outcome::GoalReached) => {
            let encoded_ticks = replay.tick_count();
            if result.ticks != encoded_ticks {
                return Err(VerifyError::TrailingInput {
                    ended_at: result.ticks,
                    encoded: encoded_ticks,
                });
            }
            Ok(result.ticks)
        }
        ReplayOutcome::Ended(outcome) => Err(VerifyError::NotAGoal { outcome }),
    }
}

/// Verify a score submission for `level`
pub fn verify_submission(
    level: &Level,
    submission: &ScoreSubmission,
    config: &SimConfig,
) -> Result<VerifiedRun, VerifyError> {
    let ticks = verify_replay(level, &submission.replay, submission.time_ms, config)?;
    Ok(VerifiedRun {
        level_id: submission.level_id.clone(),
        username: submission.username.clone(),
        ticks,
        time_ms: submission.time_ms,
    })
}

//! Per-level leaderboards and the score submission gate
//!
//! Times are ranked ascending; only a strict improvement on a player's known
//! best is worth sending to the score service.

use serde::{Deserialize, Serialize};

use crate::sim::{Level, Replay};

/// Rows shown on the end screen
pub const DEFAULT_LEADERBOARD_ROWS: usize = 10;

/// A stored best time (owned by the score service)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub level_id: String,
    pub username: String,
    pub time_ms: f64,
    #[serde(default)]
    pub replay: Replay,
}

/// Wire form of a finished run sent to the score service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub level_id: String,
    pub username: String,
    pub time_ms: f64,
    pub replay: Replay,
}

impl ScoreSubmission {
    pub fn into_record(self) -> ScoreRecord {
        ScoreRecord {
            level_id: self.level_id,
            username: self.username,
            time_ms: self.time_ms,
            replay: self.replay,
        }
    }
}

/// Whether a finished run should be submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDecision {
    Submit,
    /// Nobody is logged in
    SkipAnonymous,
    /// Scores are not tracked for the unnamed level
    SkipUnnamedLevel,
    /// Not strictly better than the known best
    SkipNotImproved,
}

impl SubmitDecision {
    /// Decide locally whether to send a run; skipping is normal control flow
    pub fn check(username: Option<&str>, level: &Level, time_ms: f64, known_best: Option<f64>) -> Self {
        if username.is_none_or(str::is_empty) {
            return SubmitDecision::SkipAnonymous;
        }
        if level.is_unnamed() {
            return SubmitDecision::SkipUnnamedLevel;
        }
        match known_best {
            Some(best) if time_ms >= best => SubmitDecision::SkipNotImproved,
            _ => SubmitDecision::Submit,
        }
    }
}

/// One displayed row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub time_ms: f64,
}

/// Sorted, truncated view of a level's best times
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub level_id: String,
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Build from raw records: fastest first, at most `rows` entries
    pub fn from_records(level_id: impl Into<String>, records: &[ScoreRecord], rows: usize) -> Self {
        let mut entries: Vec<LeaderboardEntry> = records
            .iter()
            .filter(|r| r.time_ms.is_finite())
            .map(|r| LeaderboardEntry {
                username: r.username.clone(),
                time_ms: r.time_ms,
            })
            .collect();
        entries.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
        entries.truncate(rows);

        Self {
            level_id: level_id.into(),
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fastest time on the board
    pub fn best_time(&self) -> Option<f64> {
        self.entries.first().map(|e| e.time_ms)
    }

    /// Best time on the board for one player
    pub fn best_for(&self, username: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.username == username)
            .map(|e| e.time_ms)
    }

    /// 1-indexed rank a time would take on this board (None if it would not fit)
    pub fn potential_rank(&self, time_ms: f64, rows: usize) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| time_ms < e.time_ms)
            .unwrap_or(self.entries.len());
        (rank < rows).then_some(rank + 1)
    }
}

/// Render milliseconds as seconds with two decimals
pub fn format_time(time_ms: f64) -> String {
    format!("{:.2}", time_ms / 1000.0)
}

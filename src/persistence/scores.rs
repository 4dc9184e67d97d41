//! Best-time store and the submission acceptor

use std::collections::HashMap;

use thiserror::Error;

use crate::leaderboard::{ScoreRecord, ScoreSubmission};
use crate::sim::{Level, SimConfig};
use crate::verify::{VerifyError, verify_submission};

/// Store failures; callers surface these as "leaderboard unavailable"
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("score store unavailable: {0}")]
    Unavailable(String),
    #[error("score store backend error: {0}")]
    Backend(String),
}

/// Best times keyed uniquely by `(level_id, username)`
pub trait ScoreStore {
    fn get_best(&self, level_id: &str, username: &str) -> Result<Option<ScoreRecord>, PersistenceError>;

    /// Insert or overwrite the stored best
    fn upsert_best(&mut self, record: ScoreRecord) -> Result<(), PersistenceError>;

    /// Every stored best for a level, unordered
    fn records_for_level(&self, level_id: &str) -> Result<Vec<ScoreRecord>, PersistenceError>;
}

/// Process-local store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<(String, String), ScoreRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ScoreStore for MemoryStore {
    fn get_best(&self, level_id: &str, username: &str) -> Result<Option<ScoreRecord>, PersistenceError> {
        Ok(self
            .records
            .get(&(level_id.to_string(), username.to_string()))
            .cloned())
    }

    fn upsert_best(&mut self, record: ScoreRecord) -> Result<(), PersistenceError> {
        let key = (record.level_id.clone(), record.username.clone());
        self.records.insert(key, record);
        Ok(())
    }

    fn records_for_level(&self, level_id: &str) -> Result<Vec<ScoreRecord>, PersistenceError> {
        Ok(self
            .records
            .values()
            .filter(|r| r.level_id == level_id)
            .cloned()
            .collect())
    }
}

/// Outcome of an accepted submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResult {
    /// Stored as the player's new best
    Improved,
    /// Valid, but not better than the stored best
    NotImproved,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("submission is for level '{submitted}', not '{expected}'")]
    WrongLevel { expected: String, submitted: String },
    #[error("scores are not kept for unnamed levels")]
    UnnamedLevel,
    #[error("submission has no username")]
    Anonymous,
    #[error("rejected: {0}")]
    Rejected(#[from] VerifyError),
    #[error(transparent)]
    Store(#[from] PersistenceError),
}

/// Server-side acceptor: verify by replay, then keep only improvements
#[derive(Debug, Clone, Default)]
pub struct ScoreService<S> {
    store: S,
    config: SimConfig,
}

impl<S: ScoreStore> ScoreService<S> {
    pub fn new(store: S, config: SimConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn submit(&mut self, level: &Level, submission: ScoreSubmission) -> Result<SubmitResult, SubmitError> {
        if submission.level_id != level.name {
            return Err(SubmitError::WrongLevel {
                expected: level.name.clone(),
                submitted: submission.level_id,
            });
        }
        if level.is_unnamed() {
            return Err(SubmitError::UnnamedLevel);
        }
        if submission.username.trim().is_empty() {
            return Err(SubmitError::Anonymous);
        }

        let verified = verify_submission(level, &submission, &self.config).inspect_err(|err| {
            log::warn!(
                "Rejected {}ms on '{}' from {}: {err}",
                submission.time_ms,
                submission.level_id,
                submission.username
            );
        })?;

        let current = self.store.get_best(&verified.level_id, &verified.username)?;
        if current.is_some_and(|best| best.time_ms <= verified.time_ms) {
            log::debug!(
                "{} did not improve on '{}' ({}ms)",
                verified.username,
                verified.level_id,
                verified.time_ms
            );
            return Ok(SubmitResult::NotImproved);
        }

        self.store.upsert_best(submission.into_record())?;
        log::info!(
            "New best for {} on '{}': {}ms",
            verified.username,
            verified.level_id,
            verified.time_ms
        );
        Ok(SubmitResult::Improved)
    }

    pub fn records_for_level(&self, level_id: &str) -> Result<Vec<ScoreRecord>, PersistenceError> {
        self.store.records_for_level(level_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ObstacleKind, Rect, Replay, TickInput, simulate};
    use glam::DVec2;

    fn drop_level() -> Level {
        let mut level = Level::new("drop", DVec2::ZERO);
        level.insert(Rect::new(-50.0, 40.0, 100.0, 20.0), ObstacleKind::Goal);
        level
    }

    fn winning_submission(level: &Level, config: &SimConfig, username: &str) -> ScoreSubmission {
        let long_idle = Replay::encode(std::iter::repeat_n(TickInput::default(), 10_000));
        let ticks = simulate(level, &long_idle, config).ticks;
        let replay = Replay::encode(std::iter::repeat_n(TickInput::default(), ticks as usize));
        ScoreSubmission {
            level_id: level.name.clone(),
            username: username.into(),
            time_ms: replay.duration_ms(config),
            replay,
        }
    }

    #[test]
    fn test_memory_store_keyed_by_level_and_user() {
        let mut store = MemoryStore::new();
        let record = |level: &str, user: &str, t: f64| ScoreRecord {
            level_id: level.into(),
            username: user.into(),
            time_ms: t,
            replay: Replay::new(),
        };
        store.upsert_best(record("a", "ada", 10.0)).unwrap();
        store.upsert_best(record("a", "ada", 8.0)).unwrap();
        store.upsert_best(record("a", "bob", 9.0)).unwrap();
        store.upsert_best(record("b", "ada", 1.0)).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.get_best("a", "ada").unwrap().unwrap().time_ms, 8.0);
        assert!(store.get_best("c", "ada").unwrap().is_none());
        assert_eq!(store.records_for_level("a").unwrap().len(), 2);
    }

    #[test]
    fn test_service_keeps_only_improvements() {
        let level = drop_level();
        let config = SimConfig::default();
        let mut service = ScoreService::new(MemoryStore::new(), config);

        let submission = winning_submission(&level, &config, "ada");
        assert_eq!(service.submit(&level, submission.clone()), Ok(SubmitResult::Improved));
        assert_eq!(service.submit(&level, submission), Ok(SubmitResult::NotImproved));
        assert_eq!(service.records_for_level("drop").unwrap().len(), 1);
    }

    #[test]
    fn test_service_rejects_forged_time() {
        let level = drop_level();
        let config = SimConfig::default();
        let mut service = ScoreService::new(MemoryStore::new(), config);

        let mut forged = winning_submission(&level, &config, "eve");
        forged.time_ms -= f64::from(config.mspt);
        let err = service.submit(&level, forged).unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(VerifyError::DurationMismatch { .. })));
        assert!(service.store().is_empty());
    }

    #[test]
    fn test_service_rejects_wrong_level() {
        let level = drop_level();
        let config = SimConfig::default();
        let mut service = ScoreService::new(MemoryStore::new(), config);
        let mut submission = winning_submission(&level, &config, "ada");
        submission.level_id = "other".into();
        assert!(matches!(
            service.submit(&level, submission),
            Err(SubmitError::WrongLevel { .. })
        ));
    }

    #[test]
    fn test_service_rejects_unnamed_level_and_anonymous_player() {
        let config = SimConfig::default();
        let mut service = ScoreService::new(MemoryStore::new(), config);

        let mut unnamed = drop_level();
        unnamed.name = crate::sim::UNNAMED_LEVEL.into();
        let submission = winning_submission(&unnamed, &config, "ada");
        assert_eq!(service.submit(&unnamed, submission), Err(SubmitError::UnnamedLevel));

        let level = drop_level();
        for username in ["", "   "] {
            let submission = winning_submission(&level, &config, username);
            assert_eq!(service.submit(&level, submission), Err(SubmitError::Anonymous));
        }
        assert!(service.store().is_empty());
    }
}

//! Score storage and level files
//!
//! Features:
//! - `ScoreStore` trait for the external best-time store, keyed by (level, user)
//! - In-memory store for tests and the command-line tool
//! - `ScoreService`: replay-verified, improvement-only acceptance of submissions
//! - Level documents on disk

pub mod level_file;
pub mod scores;

pub use level_file::{LevelFileError, load_level, save_level};
pub use scores::{MemoryStore, PersistenceError, ScoreService, ScoreStore, SubmitError, SubmitResult};

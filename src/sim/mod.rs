//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by obstacle id)
//! - No rendering, clock or platform dependencies

pub mod collision;
pub mod level;
pub mod replay;
pub mod state;
pub mod tick;

pub use collision::{Rect, aabb_overlap, point_in_rect};
pub use level::{Level, LevelDoc, Obstacle, ObstacleId, ObstacleKind, RectEntry, UNNAMED_LEVEL};
pub use replay::{InputClass, Replay, ReplayError, ReplayOutcome, ReplayResult, ReplayRun, simulate};
pub use state::{PogoDude, SimConfig};
pub use tick::{Contacts, Outcome, TickInput, probe_contacts, tick};

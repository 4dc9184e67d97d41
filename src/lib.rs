//! Pogoman - A pogo-stick physics platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor physics, contacts, level, replays)
//! - `verify`: Replay-driven validation of submitted times
//! - `editor`: Level editor placement/selection logic
//! - `platform`: Input snapshots and the fixed-step clock
//! - `persistence`: Score store and level files
//! - `renderer`: Passive draw surface abstraction
//! - `game` / `app`: A single run and the screen state machine around it

pub mod app;
pub mod editor;
pub mod game;
pub mod leaderboard;
pub mod levels;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod verify;

pub use leaderboard::{Leaderboard, ScoreSubmission};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default milliseconds per physics tick
    pub const DEFAULT_MSPT: u32 = 5;
    /// Tick length the tuning constants were authored against
    pub const REFERENCE_TICK_MS: f64 = 15.0;
    /// Roughly one 60 Hz frame; used to flag catch-up bursts
    pub const EXPECTED_FRAME_MS: u32 = 17;

    /// Distance from the pivot to either contact point
    pub const STICK_HEIGHT: f64 = 24.0;
    /// Minimum bounce impulse
    pub const JUMP_STRENGTH: f64 = 7.0;

    /// Downward acceleration per reference tick while airborne
    pub const GRAVITY: f64 = 0.15;
    /// Pivot torque applied while grounded (scaled by sin of lean)
    pub const GROUND_TORQUE: f64 = 0.15;
    /// Spin added per reference tick of lean input
    pub const LEAN_ACCEL: f64 = 0.2;
    /// Extra lean authority when countering existing spin
    pub const COUNTER_LEAN_BONUS: f64 = 0.1;
    /// Spin retained per reference tick
    pub const SPIN_DECAY: f64 = 0.99;
    /// Spin clamp (degrees per reference tick)
    pub const MAX_SPIN: f64 = 4.0;

    /// Spin retained on landing
    pub const LANDING_SPIN_DAMPING: f64 = 0.25;
    /// Fraction of landing speed carried into the next bounce
    pub const LANDING_MOMENTUM_RETAIN: f64 = 0.95;
    /// Spin gained per unit of horizontal launch speed
    pub const BOUNCE_SPIN_FACTOR: f64 = 0.75;

    /// Space below the lowest geometry before the actor counts as fallen out
    pub const FALL_MARGIN: f64 = 50.0;
}

/// Normalize an angle in degrees to (-180, 180]
#[inline]
pub fn normalize_degrees(mut angle: f64) -> f64 {
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Unit vector pointing from the pivot toward the head for a rotation in degrees
#[inline]
pub fn up_vector(rotation: f64) -> glam::DVec2 {
    let rad = rotation.to_radians();
    glam::DVec2::new(rad.sin(), -rad.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees_range() {
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(190.0), -170.0);
        assert_eq!(normalize_degrees(-540.0), 180.0);
        assert_eq!(normalize_degrees(45.0), 45.0);
    }

    #[test]
    fn test_up_vector() {
        let up = up_vector(0.0);
        assert!(up.x.abs() < 1e-12);
        assert!((up.y + 1.0).abs() < 1e-12);

        // Leaning right tips the head toward +x
        let right = up_vector(90.0);
        assert!((right.x - 1.0).abs() < 1e-12);
        assert!(right.y.abs() < 1e-12);
    }
}

//! Actor state and per-tick physics
//!
//! The pogo rider is a rigid stick pivoting around `pos`. Its base (spring) and
//! head sit `STICK_HEIGHT` away on either side along the current lean.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{normalize_degrees, up_vector};

/// Simulation timing, fixed for the duration of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Milliseconds per physics tick
    pub mspt: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { mspt: DEFAULT_MSPT }
    }
}

impl SimConfig {
    pub fn new(mspt: u32) -> Self {
        Self { mspt: mspt.max(1) }
    }

    /// Scale factor applied to per-reference-tick constants
    #[inline]
    pub fn fmod(&self) -> f64 {
        f64::from(self.mspt) / REFERENCE_TICK_MS
    }

    /// Simulated time covered by `ticks`
    #[inline]
    pub fn ticks_to_ms(&self, ticks: u64) -> f64 {
        ticks as f64 * f64::from(self.mspt)
    }
}

/// The player's pogo stick rider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PogoDude {
    /// Pivot point (centre of the stick)
    pub pos: DVec2,
    pub vel: DVec2,
    /// Degrees: 0 is up, negative leans left, positive leans right; kept in (-180, 180]
    pub rotation: f64,
    /// Degrees per reference tick
    pub spin: f64,
    pub airborne: bool,
}

impl PogoDude {
    pub fn new(spawn: DVec2) -> Self {
        Self {
            pos: spawn,
            vel: DVec2::ZERO,
            rotation: 0.0,
            spin: 0.0,
            airborne: false,
        }
    }

    /// Put the actor back at a spawn point, at rest and upright
    pub fn reset(&mut self, spawn: DVec2) {
        *self = Self::new(spawn);
    }

    /// Spring contact point
    pub fn base_point(&self) -> DVec2 {
        self.pos - up_vector(self.rotation) * STICK_HEIGHT
    }

    /// Head contact point (antipodal to the base)
    pub fn head_point(&self) -> DVec2 {
        self.pos + up_vector(self.rotation) * STICK_HEIGHT
    }

    /// Advance one fixed tick
    ///
    /// `grounded` means the base point is inside a hazard this tick.
    pub fn step(&mut self, lean_left: bool, lean_right: bool, grounded: bool, config: &SimConfig) {
        let fmod = config.fmod();
        let mut momentum = JUMP_STRENGTH;

        if grounded {
            if self.airborne {
                // Landing: damp spin, rewind half a step so the bounce stays on the contact
                self.spin *= LANDING_SPIN_DAMPING;
                self.pos -= self.vel / 2.0;
                momentum = JUMP_STRENGTH.max(self.vel.length() * LANDING_MOMENTUM_RETAIN);
            }
            self.airborne = false;
            self.vel = DVec2::ZERO;
        } else {
            self.airborne = true;
        }

        self.pos += self.vel * fmod;
        self.rotate(self.spin * fmod);

        if self.airborne {
            self.vel.y += GRAVITY * fmod;
        } else {
            self.spin += GROUND_TORQUE * self.rotation.to_radians().sin();
        }

        if !self.airborne {
            self.airborne = true;
            self.vel = up_vector(self.rotation) * momentum;
            self.pos += 2.0 * self.vel * fmod;
            self.spin += BOUNCE_SPIN_FACTOR * self.vel.x;
        }

        if lean_left {
            let bonus = if self.spin > 0.0 { COUNTER_LEAN_BONUS } else { 0.0 };
            self.spin -= (LEAN_ACCEL + bonus) * fmod;
        }
        if lean_right {
            let bonus = if self.spin < 0.0 { COUNTER_LEAN_BONUS } else { 0.0 };
            self.spin += (LEAN_ACCEL + bonus) * fmod;
        }

        self.spin *= SPIN_DECAY.powf(fmod);
        self.spin = self.spin.clamp(-MAX_SPIN, MAX_SPIN);
    }

    /// Rotate by `degrees`
    ///
    /// While grounded the pivot is swept around the foot so the base point stays put.
    pub fn rotate(&mut self, degrees: f64) {
        let degrees = degrees % 360.0;
        let from = self.rotation;
        let to = from + degrees;
        self.rotation = normalize_degrees(to);

        if !self.airborne {
            self.pos += (up_vector(to) - up_vector(from)) * STICK_HEIGHT;
        }
    }
}

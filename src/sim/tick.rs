//! Fixed timestep simulation tick
//!
//! One call resolves contacts for the actor's current pose, then integrates
//! physics. Live play and replay validation share this function, so identical
//! input streams always produce identical outcomes.

use serde::{Deserialize, Serialize};

use super::level::{Level, ObstacleKind};
use super::state::{PogoDude, SimConfig};

/// Lean input for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickInput {
    pub lean_left: bool,
    pub lean_right: bool,
}

impl TickInput {
    pub const fn new(lean_left: bool, lean_right: bool) -> Self {
        Self {
            lean_left,
            lean_right,
        }
    }
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Continue,
    /// Head point entered a hazard ("bonk")
    HazardHit,
    GoalReached,
    FellOutOfWorld,
}

impl Outcome {
    /// True for every outcome that ends the run
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Continue)
    }
}

/// What the contact points are touching this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Base point inside a hazard (landing surface)
    pub grounded: bool,
    /// Either contact point inside a goal
    pub goal: bool,
    /// Head point inside a hazard
    pub bonk: bool,
}

/// Test both contact points against every obstacle
///
/// The whole level is scanned so the verdict does not depend on iteration order.
pub fn probe_contacts(level: &Level, actor: &PogoDude) -> Contacts {
    let base = actor.base_point();
    let head = actor.head_point();

    let mut contacts = Contacts::default();
    for obstacle in level.iter() {
        let at_base = obstacle.rect.contains(base);
        let at_head = obstacle.rect.contains(head);
        match obstacle.kind {
            ObstacleKind::Goal => contacts.goal |= at_base || at_head,
            ObstacleKind::Hazard => {
                contacts.grounded |= at_base;
                contacts.bonk |= at_head;
            }
        }
    }
    contacts
}

/// Advance the actor by one fixed tick and classify the result
///
/// Goal contact wins over a simultaneous bonk. The fall boundary is checked
/// against the position after this tick's integration.
pub fn tick(level: &Level, actor: &mut PogoDude, input: TickInput, config: &SimConfig) -> Outcome {
    let contacts = probe_contacts(level, actor);
    if contacts.goal {
        return Outcome::GoalReached;
    }
    if contacts.bonk {
        return Outcome::HazardHit;
    }

    actor.step(input.lean_left, input.lean_right, contacts.grounded, config);

    if actor.pos.y > level.fall_boundary() {
        return Outcome::FellOutOfWorld;
    }
    Outcome::Continue
}

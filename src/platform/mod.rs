//! Platform abstraction layer
//!
//! Handles the boundary between the host shell and the simulation:
//! - Input snapshots and edge detection
//! - Wall clock to fixed tick conversion

pub mod input;
pub mod time;

pub use input::{Button, InputEdges, InputSnapshot};
pub use time::{CatchUp, TickClock};

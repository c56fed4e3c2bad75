//! Deterministic simulation module
//!
//! The planner's model of the game lives here. This module must stay pure:
//! - One fixed tick per step
//! - Randomness only through the caller's RNG (tiebreak draws)
//! - No clocks or I/O

pub mod state;
pub mod step;
pub mod track;

pub use state::{Action, VehicleState};
pub use step::{advance, valid_actions};
pub use track::Track;

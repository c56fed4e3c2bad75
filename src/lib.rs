//! Search Race - an anytime beam-search pilot for a checkpoint racing game
//!
//! Core modules:
//! - `sim`: Deterministic vehicle step (physics, checkpoint capture, ranking keys)
//! - `planner`: Time-boxed beam search over the fixed action set
//! - `protocol`: Line-based game I/O (track header, tick lines, commands)
//! - `race`: Offline self-play loop driving the planner against the simulator
//! - `settings`: Planner tuning (beam width, time budget, stop factor, seed)

pub mod error;
pub mod planner;
pub mod protocol;
pub mod race;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use planner::{Decision, Planner};
pub use settings::PlannerConfig;

use glam::DVec2;

/// Game rule constants
pub mod consts {
    /// A checkpoint is captured once the car is this close to it
    pub const CAPTURE_RADIUS: f64 = 600.0;
    /// Velocity multiplier applied after every move
    pub const FRICTION: f64 = 0.85;

    /// Throttle bounds
    pub const MIN_THRUST: i32 = 0;
    pub const MAX_THRUST: i32 = 200;

    /// Steering bounds per tick (degrees)
    pub const MAX_TURN_DEGREES: i32 = 18;
    pub const TURN_STEP_DEGREES: i32 = 6;

    /// The checkpoint list is raced this many times
    pub const LAPS: usize = 3;
    /// Smallest track that makes a race
    pub const MIN_CHECKPOINTS: usize = 2;

    /// Default search tuning
    pub const BEAM_WIDTH: usize = 80;
    pub const TIME_BUDGET_MS: u64 = 50;
    pub const STOP_FACTOR: f64 = 2.0;
}

/// Unit heading vector for an angle in degrees
#[inline]
pub fn heading_from_degrees(degrees: f64) -> DVec2 {
    DVec2::from_angle(degrees.to_radians())
}

/// Heading of a direction vector as whole degrees in [0, 360)
#[inline]
pub fn heading_to_degrees(direction: DVec2) -> i32 {
    let degrees = direction.y.atan2(direction.x).to_degrees().round() as i32;
    degrees.rem_euclid(360)
}

/// Rotate a unit vector by an angle in degrees, keeping it unit length
#[inline]
pub fn rotate_degrees(direction: DVec2, degrees: f64) -> DVec2 {
    direction
        .rotate(heading_from_degrees(degrees))
        .normalize_or(direction)
}

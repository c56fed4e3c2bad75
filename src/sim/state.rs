//! Search node and action types
//!
//! A `VehicleState` is both the car's kinematics after a simulated tick and
//! the ranking keys the beam search sorts on.

use std::cmp::Ordering;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_THRUST, MAX_TURN_DEGREES, MIN_THRUST};

/// One steering command: turn (degrees) then throttle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub angle: i32,
    pub thrust: i32,
}

impl Action {
    pub const fn new(angle: i32, thrust: i32) -> Self {
        Self { angle, thrust }
    }

    /// Same turn with the throttle closed
    pub const fn coasting(self) -> Self {
        Self {
            angle: self.angle,
            thrust: MIN_THRUST,
        }
    }

    /// True if the command is within the game's steering and throttle limits
    pub fn is_legal(&self) -> bool {
        self.angle.abs() <= MAX_TURN_DEGREES && (MIN_THRUST..=MAX_THRUST).contains(&self.thrust)
    }
}

/// A simulated car, ranked against the track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Checkpoints left to capture (primary key, lower is better)
    pub remaining: u32,
    /// Distance to the current target (secondary key)
    pub distance: f64,
    /// Forward component of the target-to-car offset in the car's frame
    /// (tertiary key; negative means the target is still ahead)
    pub alignment: f64,
    /// Uniform draw in [0, 1) that makes the order strict
    pub tiebreak: f64,
    pub position: DVec2,
    /// Velocity with this tick's friction already applied
    pub velocity: DVec2,
    /// Unit heading
    pub direction: DVec2,
}

impl VehicleState {
    /// Synthetic search root built from the observed car
    pub fn root(remaining: u32, position: DVec2, velocity: DVec2, direction: DVec2) -> Self {
        Self {
            remaining,
            distance: 0.0,
            alignment: 0.0,
            tiebreak: 0.0,
            position,
            velocity,
            direction,
        }
    }

    /// Ranking order: remaining, then distance, then alignment, then tiebreak.
    ///
    /// Strict lexicographic cascade with no weighting. Floats compare with
    /// `total_cmp`, so the result is `Equal` only when all four keys are
    /// bit-identical.
    pub fn rank(&self, other: &Self) -> Ordering {
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| self.distance.total_cmp(&other.distance))
            .then_with(|| self.alignment.total_cmp(&other.alignment))
            .then_with(|| self.tiebreak.total_cmp(&other.tiebreak))
    }

    /// True if `self` ranks strictly ahead of `other`
    #[inline]
    pub fn beats(&self, other: &Self) -> bool {
        self.rank(other) == Ordering::Less
    }
}

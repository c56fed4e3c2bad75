//! Anytime beam-search planner
//!
//! Each tick starts from the observed car, seeds a frontier with every
//! action, and then deepens it one round at a time until the clock says the
//! next round would not fit in the budget. The first move of the best leaf
//! is the answer.

pub mod clock;
pub mod frontier;

pub use clock::{Clock, ScriptedClock, SystemClock, should_stop};
pub use frontier::Frontier;

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::heading_from_degrees;
use crate::settings::PlannerConfig;
use crate::sim::{Action, Track, VehicleState, valid_actions};

/// Observed car kinematics for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Unit heading
    pub direction: DVec2,
}

impl Car {
    /// Build from the integers the game reports (heading in degrees)
    pub fn from_observation(x: i32, y: i32, vx: i32, vy: i32, angle: i32) -> Self {
        Self {
            position: DVec2::new(x as f64, y as f64),
            velocity: DVec2::new(vx as f64, vy as f64),
            direction: heading_from_degrees(angle as f64),
        }
    }
}

/// Outcome of one planning tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Command to send (thrust already zeroed if the brake guard fired)
    pub action: Action,
    /// Search depth reached, counting the seeding expansion
    pub rounds: u32,
    /// Best leaf of the final frontier
    pub best: VehicleState,
    /// True if the overshoot guard cut the thrust
    pub braked: bool,
}

/// Beam-search pilot
pub struct Planner<C: Clock = SystemClock> {
    config: PlannerConfig,
    actions: Vec<Action>,
    rng: Pcg32,
    clock: C,
}

impl Planner<SystemClock> {
    /// Planner on the wall clock
    pub fn new(config: PlannerConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> Planner<C> {
    /// Planner on a caller-supplied time source
    pub fn with_clock(config: PlannerConfig, clock: C) -> Result<Self> {
        config.validate()?;
        let actions = valid_actions();
        if actions.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "action set is empty".to_string(),
            });
        }
        let seed = config.seed.unwrap_or_else(rand::random);
        log::debug!("Planner seeded with {seed}");
        Ok(Self {
            config,
            actions,
            rng: Pcg32::seed_from_u64(seed),
            clock,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Choose a command for the car with `remaining` checkpoints left.
    ///
    /// Only fails with [`Error::EmptyFrontier`], which the non-empty action
    /// set and a validated config rule out.
    pub fn plan(&mut self, track: &Track, remaining: u32, car: &Car) -> Result<Decision> {
        let start = self.clock.now();
        let budget = self.config.time_budget();

        let root = VehicleState::root(remaining, car.position, car.velocity, car.direction);
        let mut frontier = Frontier::seed(&root, &self.actions, track, &mut self.rng);
        let mut rounds = 1u32;

        while !should_stop(
            self.clock.now().saturating_sub(start),
            rounds,
            budget,
            self.config.stop_factor,
        ) {
            frontier.prune(self.config.beam_width);
            frontier = frontier.expand(&self.actions, track, &mut self.rng);
            rounds += 1;
        }

        let &(best, first) = frontier.best().ok_or(Error::EmptyFrontier)?;
        let braked = first.thrust != 0 && overshoot_guard(track, remaining, car, &best, rounds);
        let action = if braked { first.coasting() } else { first };

        log::debug!(
            "rounds={rounds} best: remaining={} distance={:.1} alignment={:.1} -> {:?}{}",
            best.remaining,
            best.distance,
            best.alignment,
            action,
            if braked { " (braked)" } else { "" }
        );

        Ok(Decision {
            action,
            rounds,
            best,
            braked,
        })
    }
}

/// Brake-distance check on the winning leaf.
///
/// Fires when the leaf still has the root's target ahead of it and after
/// `rounds` simulated ticks sits farther away than the car is now minus half
/// of `rounds` ticks of current speed. Not reached by the search means the
/// extra thrust only carries the car past the checkpoint.
pub fn overshoot_guard(
    track: &Track,
    root_remaining: u32,
    car: &Car,
    best: &VehicleState,
    rounds: u32,
) -> bool {
    let Some(target) = track.target(root_remaining) else {
        return false;
    };
    let current = car.position.distance(target);
    let margin = rounds as f64 * car.velocity.length() / 2.0;
    best.remaining == root_remaining && best.distance > current - margin
}

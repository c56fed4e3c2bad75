//! Offline self-play
//!
//! Drives the planner against the simulator for a whole race. The car is
//! reported to the planner the way the referee would report it (integer
//! position, velocity and heading), so quantisation error is part of the run.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::planner::{Clock, Planner};
use crate::protocol::Tick;
use crate::sim::{Track, VehicleState, advance};
use crate::{heading_from_degrees, heading_to_degrees};

/// Result of one self-play race
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceSummary {
    pub ticks: u32,
    pub finished: bool,
    pub checkpoints_taken: usize,
    pub total_checkpoints: usize,
    pub min_rounds: u32,
    pub max_rounds: u32,
    pub mean_rounds: f64,
    /// Ticks where the overshoot guard cut the thrust
    pub brake_ticks: u32,
}

/// Quantise a simulated car into the referee's integer report
pub fn observe(state: &VehicleState, checkpoint_index: usize) -> Tick {
    Tick {
        checkpoint_index,
        x: state.position.x.round() as i32,
        y: state.position.y.round() as i32,
        vx: state.velocity.x.trunc() as i32,
        vy: state.velocity.y.trunc() as i32,
        angle: heading_to_degrees(state.direction),
    }
}

/// Race from the first checkpoint until the track is done or `max_ticks` pass
pub fn run_race<C: Clock>(
    track: &Track,
    planner: &mut Planner<C>,
    max_ticks: u32,
) -> Result<RaceSummary> {
    if max_ticks == 0 {
        return Err(Error::InvalidConfiguration {
            message: "max_ticks must be > 0".to_string(),
        });
    }

    let start = track.checkpoint(0).ok_or(Error::DegenerateTrack { count: 0 })?;
    let first = track.checkpoint(1).ok_or(Error::DegenerateTrack { count: 1 })?;
    let heading = heading_to_degrees((first - start).normalize_or(DVec2::X));

    // The start checkpoint counts as taken
    let mut checkpoint_index = 1usize;
    let mut car = VehicleState::root(
        track.remaining_from_index(checkpoint_index),
        start,
        DVec2::ZERO,
        heading_from_degrees(heading as f64),
    );
    // Tiebreak draws on the referee side carry no meaning
    let mut rng = Pcg32::seed_from_u64(0);

    let mut ticks = 0u32;
    let mut min_rounds = u32::MAX;
    let mut max_rounds = 0u32;
    let mut total_rounds = 0u64;
    let mut brake_ticks = 0u32;

    while ticks < max_ticks && checkpoint_index < track.len() {
        let tick = observe(&car, checkpoint_index);
        let remaining = track.remaining_from_index(tick.checkpoint_index);
        let decision = planner.plan(track, remaining, &tick.car())?;

        min_rounds = min_rounds.min(decision.rounds);
        max_rounds = max_rounds.max(decision.rounds);
        total_rounds += decision.rounds as u64;
        if decision.braked {
            brake_ticks += 1;
        }

        let reported = tick.car();
        let from = VehicleState::root(
            remaining,
            reported.position,
            reported.velocity,
            reported.direction,
        );
        car = advance(&from, decision.action, track, &mut rng);
        let next_index = track.index_from_remaining(car.remaining);
        if next_index != checkpoint_index {
            log::debug!("Tick {ticks}: checkpoint {checkpoint_index} -> {next_index}");
        }
        checkpoint_index = next_index;
        ticks += 1;
    }

    let finished = checkpoint_index >= track.len();
    let summary = RaceSummary {
        ticks,
        finished,
        checkpoints_taken: checkpoint_index.min(track.len()),
        total_checkpoints: track.len(),
        min_rounds: if ticks == 0 { 0 } else { min_rounds },
        max_rounds,
        mean_rounds: if ticks == 0 {
            0.0
        } else {
            total_rounds as f64 / ticks as f64
        },
        brake_ticks,
    };
    log::info!(
        "Race {} after {} ticks ({}/{} checkpoints, mean depth {:.1})",
        if finished { "finished" } else { "stopped" },
        summary.ticks,
        summary.checkpoints_taken,
        summary.total_checkpoints,
        summary.mean_rounds
    );
    Ok(summary)
}

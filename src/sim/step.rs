//! Fixed-tick vehicle step
//!
//! Advances one search node by one command and re-ranks it against the track.

use rand::Rng;

use super::state::{Action, VehicleState};
use super::track::Track;
use crate::consts::{
    CAPTURE_RADIUS, FRICTION, MAX_THRUST, MAX_TURN_DEGREES, MIN_THRUST, TURN_STEP_DEGREES,
};
use crate::rotate_degrees;

/// The discrete action set: every turn step paired with closed and full throttle.
///
/// Ordered angle-major, so the 14 entries run (-18, 0), (-18, 200), (-12, 0)...
pub fn valid_actions() -> Vec<Action> {
    (-MAX_TURN_DEGREES..=MAX_TURN_DEGREES)
        .step_by(TURN_STEP_DEGREES as usize)
        .flat_map(|angle| {
            [MIN_THRUST, MAX_THRUST]
                .into_iter()
                .map(move |thrust| Action::new(angle, thrust))
        })
        .collect()
}

/// Advance a node by one tick
///
/// Turn, accelerate, move, then apply friction. After the move the target is
/// checked against the capture radius once. A capture moves the target on by
/// one and the distance is re-measured, but a second capture in the same tick
/// is not considered. Once the track is exhausted the distance and alignment
/// keys are both zero.
pub fn advance<R: Rng>(
    state: &VehicleState,
    action: Action,
    track: &Track,
    rng: &mut R,
) -> VehicleState {
    let direction = rotate_degrees(state.direction, action.angle as f64);
    let mut velocity = state.velocity + direction * action.thrust as f64;
    let position = state.position + velocity;
    velocity *= FRICTION;

    let mut remaining = state.remaining;
    let mut target = track.target(remaining);
    let mut distance = target.map_or(0.0, |t| position.distance(t));
    if target.is_some() && distance <= CAPTURE_RADIUS {
        remaining -= 1;
        target = track.target(remaining);
        distance = target.map_or(0.0, |t| position.distance(t));
    }
    let alignment = target.map_or(0.0, |t| direction.dot(position - t));

    VehicleState {
        remaining,
        distance,
        alignment,
        tiebreak: rng.random::<f64>(),
        position,
        velocity,
        direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(12345)
    }

    fn two_point() -> Track {
        Track::from_points(&[(0, 0), (1000, 0)]).unwrap()
    }

    #[test]
    fn test_valid_actions() {
        let actions = valid_actions();
        assert_eq!(actions.len(), 14);
        assert_eq!(actions[0], Action::new(-18, 0));
        assert_eq!(actions[1], Action::new(-18, 200));
        assert_eq!(actions[13], Action::new(18, 200));
        assert!(actions.iter().all(|a| a.is_legal() && a.angle % 6 == 0));
    }

    #[test]
    fn test_friction_decay() {
        let track = Track::from_points(&[(50_000, 0), (60_000, 0)]).unwrap();
        let mut rng = rng();
        for (angle, velocity) in [
            (0, DVec2::new(300.0, 0.0)),
            (18, DVec2::new(-120.0, 45.0)),
            (-6, DVec2::new(0.0, -700.0)),
        ] {
            let start = VehicleState::root(6, DVec2::ZERO, velocity, DVec2::Y);
            let next = advance(&start, Action::new(angle, 0), &track, &mut rng);
            assert_eq!(next.position, velocity);
            assert!((next.velocity.length() - velocity.length() * 0.85).abs() < 1e-9);
        }
    }

    #[test]
    fn test_thrust_applied_along_rotated_heading() {
        let track = Track::from_points(&[(50_000, 0), (60_000, 0)]).unwrap();
        let start = VehicleState::root(6, DVec2::ZERO, DVec2::ZERO, DVec2::X);
        let next = advance(&start, Action::new(18, 200), &track, &mut rng());
        let expected_dir = DVec2::from_angle(18f64.to_radians());
        assert!((next.direction - expected_dir).length() < 1e-12);
        assert!((next.position - expected_dir * 200.0).length() < 1e-9);
        assert!((next.velocity - expected_dir * 170.0).length() < 1e-9);
    }

    #[test]
    fn test_capture_at_radius() {
        let track = two_point();
        // Target is checkpoint index 4 at the origin; the car lands exactly 600 away
        let start = VehicleState::root(2, DVec2::new(600.0, 0.0), DVec2::ZERO, DVec2::X);
        let next = advance(&start, Action::new(0, 0), &track, &mut rng());
        assert_eq!(next.remaining, 1);
        // Re-measured against the next target at (1000, 0)
        assert!((next.distance - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_capture_just_outside_radius() {
        let track = two_point();
        let start = VehicleState::root(2, DVec2::new(601.0, 0.0), DVec2::ZERO, DVec2::X);
        let next = advance(&start, Action::new(0, 0), &track, &mut rng());
        assert_eq!(next.remaining, 2);
        assert!((next.distance - 601.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_lookahead_capture() {
        // Two checkpoints inside the radius: only one extra capture per tick
        let track = Track::from_points(&[(0, 0), (100, 0), (5000, 0)]).unwrap();
        let start = VehicleState::root(3, DVec2::new(50.0, 0.0), DVec2::ZERO, DVec2::X);
        let next = advance(&start, Action::new(0, 0), &track, &mut rng());
        assert_eq!(next.remaining, 2);
        assert!((next.distance - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_alignment_is_forward_offset() {
        let track = Track::from_points(&[(5000, 0), (9000, 0)]).unwrap();
        let start = VehicleState::root(6, DVec2::ZERO, DVec2::ZERO, DVec2::X);
        let next = advance(&start, Action::new(0, 0), &track, &mut rng());
        // Target straight ahead: car sits 5000 "before" it
        assert!((next.alignment + 5000.0).abs() < 1e-9);

        let sideways = VehicleState::root(6, DVec2::ZERO, DVec2::ZERO, DVec2::Y);
        let next = advance(&sideways, Action::new(0, 0), &track, &mut rng());
        assert!(next.alignment.abs() < 1e-9);
    }

    #[test]
    fn test_exhausted_track_yields_zero_keys() {
        let track = two_point();
        let start = VehicleState::root(0, DVec2::new(10.0, 10.0), DVec2::ZERO, DVec2::X);
        let next = advance(&start, Action::new(6, 200), &track, &mut rng());
        assert_eq!(next.remaining, 0);
        assert_eq!(next.distance, 0.0);
        assert_eq!(next.alignment, 0.0);

        // Capturing the very last checkpoint also lands on the exhausted branch
        let last = VehicleState::root(1, DVec2::new(1000.0, 0.0), DVec2::ZERO, DVec2::X);
        let next = advance(&last, Action::new(0, 0), &track, &mut rng());
        assert_eq!(next.remaining, 0);
        assert_eq!(next.distance, 0.0);
        assert_eq!(next.alignment, 0.0);
    }

    #[test]
    fn test_remaining_never_increases() {
        let track = two_point();
        let mut rng = rng();
        let mut state = VehicleState::root(6, DVec2::new(-3000.0, 200.0), DVec2::ZERO, DVec2::X);
        for action in valid_actions().into_iter().cycle().take(200) {
            let next = advance(&state, action, &track, &mut rng);
            assert!(next.remaining <= state.remaining);
            state = next;
        }
    }

    #[test]
    fn test_tiebreak_in_unit_interval() {
        let track = two_point();
        let mut rng = rng();
        let start = VehicleState::root(6, DVec2::ZERO, DVec2::ZERO, DVec2::X);
        for _ in 0..100 {
            let next = advance(&start, Action::new(0, 200), &track, &mut rng);
            assert!((0.0..1.0).contains(&next.tiebreak));
        }
    }
}

//! Beam frontier
//!
//! An ordered list of (node, first action) pairs. Every round the list is
//! sorted, cut to the beam width and replaced by the expansion of the
//! survivors. Entries are never looked up by state, so floating-point keys
//! never need to hash or compare equal.

use rand::Rng;

use crate::sim::{Action, Track, VehicleState, advance};

/// Candidate states, each tagged with the root move that leads to it
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    entries: Vec<(VehicleState, Action)>,
}

impl Frontier {
    /// Expand the root through every action; each child remembers its own move
    pub fn seed<R: Rng>(root: &VehicleState, actions: &[Action], track: &Track, rng: &mut R) -> Self {
        let entries = actions
            .iter()
            .map(|&action| (advance(root, action, track, rng), action))
            .collect();
        Self { entries }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(VehicleState, Action)] {
        &self.entries
    }

    /// Sort best-first and keep at most `beam_width` entries
    pub fn prune(&mut self, beam_width: usize) {
        self.entries.sort_unstable_by(|a, b| a.0.rank(&b.0));
        self.entries.truncate(beam_width);
    }

    /// Expand every entry through every action.
    ///
    /// Children inherit the parent's root action, not the move just applied.
    pub fn expand<R: Rng>(&self, actions: &[Action], track: &Track, rng: &mut R) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len() * actions.len());
        for (node, first) in &self.entries {
            for &action in actions {
                entries.push((advance(node, action, track, rng), *first));
            }
        }
        Self { entries }
    }

    /// Best entry by the ranking order
    pub fn best(&self) -> Option<&(VehicleState, Action)> {
        self.entries.iter().min_by(|a, b| a.0.rank(&b.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::valid_actions;
    use glam::DVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (Track, VehicleState, Vec<Action>, Pcg32) {
        let track = Track::from_points(&[(0, 0), (8000, 0), (8000, 4000)]).unwrap();
        let root = VehicleState::root(8, DVec2::ZERO, DVec2::ZERO, DVec2::X);
        (track, root, valid_actions(), Pcg32::seed_from_u64(42))
    }

    #[test]
    fn test_seed_records_own_action() {
        let (track, root, actions, mut rng) = setup();
        let frontier = Frontier::seed(&root, &actions, &track, &mut rng);
        assert_eq!(frontier.len(), 14);
        for ((_, recorded), action) in frontier.entries().iter().zip(&actions) {
            assert_eq!(recorded, action);
        }
    }

    #[test]
    fn test_beam_bounds() {
        let (track, root, actions, mut rng) = setup();
        let beam_width = 5;
        let mut frontier = Frontier::seed(&root, &actions, &track, &mut rng);
        for _ in 0..6 {
            frontier.prune(beam_width);
            assert!(frontier.len() <= beam_width);
            frontier = frontier.expand(&actions, &track, &mut rng);
            assert!(frontier.len() <= beam_width * actions.len());
        }
    }

    #[test]
    fn test_prune_sorts_best_first() {
        let (track, root, actions, mut rng) = setup();
        let mut frontier = Frontier::seed(&root, &actions, &track, &mut rng);
        let best = *frontier.best().unwrap();
        frontier.prune(3);
        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.entries()[0].0, best.0);
        for pair in frontier.entries().windows(2) {
            assert!(pair[0].0.beats(&pair[1].0));
        }
    }

    #[test]
    fn test_children_inherit_root_action() {
        let (track, root, actions, mut rng) = setup();
        let mut frontier = Frontier::seed(&root, &actions, &track, &mut rng);
        frontier.prune(1);
        let survivor = frontier.entries()[0].1;
        let children = frontier.expand(&actions, &track, &mut rng);
        assert_eq!(children.len(), 14);
        assert!(children.entries().iter().all(|(_, first)| *first == survivor));
    }

    #[test]
    fn test_best_of_empty_is_none() {
        assert!(Frontier::default().best().is_none());
    }
}

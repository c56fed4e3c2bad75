//! Checkpoint track
//!
//! The checkpoint list is stored once per lap, back to back, so a target is
//! looked up by counting backward from the end with the number of checkpoints
//! still to take. No modular arithmetic is needed and an exhausted counter
//! simply has no target.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{LAPS, MIN_CHECKPOINTS};
use crate::error::{Error, Result};

/// Immutable race course, already unrolled over every lap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    checkpoints: Vec<DVec2>,
    lap_len: usize,
}

impl Track {
    /// Build a track from one lap of checkpoints
    pub fn new(lap: Vec<DVec2>) -> Result<Self> {
        if lap.len() < MIN_CHECKPOINTS {
            return Err(Error::DegenerateTrack { count: lap.len() });
        }
        let lap_len = lap.len();
        let checkpoints = lap.repeat(LAPS);
        Ok(Self {
            checkpoints,
            lap_len,
        })
    }

    /// Build a track from integer coordinates as the game sends them
    pub fn from_points(points: &[(i32, i32)]) -> Result<Self> {
        Self::new(
            points
                .iter()
                .map(|&(x, y)| DVec2::new(x as f64, y as f64))
                .collect(),
        )
    }

    /// Number of checkpoints over the whole race
    #[inline]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Always false for a constructed track
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Number of checkpoints in a single lap
    #[inline]
    pub fn lap_len(&self) -> usize {
        self.lap_len
    }

    /// Checkpoint at an absolute race index (0-based over all laps)
    #[inline]
    pub fn checkpoint(&self, index: usize) -> Option<DVec2> {
        self.checkpoints.get(index).copied()
    }

    /// Current target when `remaining` checkpoints are still to be taken.
    ///
    /// `None` once everything is captured (or for a counter larger than the
    /// race, which no game state produces).
    #[inline]
    pub fn target(&self, remaining: u32) -> Option<DVec2> {
        let remaining = remaining as usize;
        if remaining == 0 || remaining > self.checkpoints.len() {
            return None;
        }
        self.checkpoints.get(self.checkpoints.len() - remaining).copied()
    }

    /// Convert the game's "next checkpoint index" into a remaining count
    #[inline]
    pub fn remaining_from_index(&self, next_index: usize) -> u32 {
        self.checkpoints.len().saturating_sub(next_index) as u32
    }

    /// Inverse of [`Track::remaining_from_index`]
    #[inline]
    pub fn index_from_remaining(&self, remaining: u32) -> usize {
        self.checkpoints.len().saturating_sub(remaining as usize)
    }
}

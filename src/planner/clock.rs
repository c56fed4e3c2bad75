//! Time sources for the search loop
//!
//! The planner only ever asks for "now" as an offset from some fixed origin,
//! so tests can replace the wall clock with a scripted one.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock {
    /// Time since this clock's origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Replays a fixed list of readings, then keeps advancing by a fixed step
/// (zero by default, so the last reading repeats)
#[derive(Debug, Default)]
pub struct ScriptedClock {
    readings: RefCell<VecDeque<Duration>>,
    last: Cell<Option<Duration>>,
    step: Duration,
}

impl ScriptedClock {
    pub fn new(readings: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            readings: RefCell::new(readings.into_iter().collect()),
            last: Cell::new(None),
            step: Duration::ZERO,
        }
    }

    /// Clock that reads zero first and then advances by `step` on every call
    pub fn stepping(step: Duration) -> Self {
        Self {
            step,
            ..Self::new(std::iter::empty())
        }
    }

    /// Clock that jumps a whole budget per reading, so every plan stops
    /// right after the seeding expansion
    pub fn stop_immediately(budget: Duration) -> Self {
        Self::stepping(budget)
    }

    /// Queue more readings ahead of the stepping tail
    pub fn push(&self, reading: Duration) {
        self.readings.borrow_mut().push_back(reading);
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> Duration {
        let next = match self.readings.borrow_mut().pop_front() {
            Some(reading) => reading,
            None => self.last.get().map_or(Duration::ZERO, |last| last + self.step),
        };
        self.last.set(Some(next));
        next
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Predictive stop test, checked before starting another round.
///
/// Assumes the next round costs about the average of the rounds so far and
/// pads that estimate by `stop_factor / rounds`. `rounds` counts the seeding
/// expansion, so it is at least 1.
pub fn should_stop(elapsed: Duration, rounds: u32, budget: Duration, stop_factor: f64) -> bool {
    let rounds = rounds.max(1) as f64;
    elapsed.as_secs_f64() * (1.0 + stop_factor / rounds) >= budget.as_secs_f64()
}

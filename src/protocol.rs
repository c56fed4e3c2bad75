//! Game I/O
//!
//! Line protocol spoken with the game referee:
//! - Header: checkpoint count, then one `x y` line per checkpoint
//! - Every tick: `index x y vx vy angle`
//! - Reply: `EXPERT <angle> <thrust> <message>`

use std::fmt;
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::planner::{Car, Decision};
use crate::sim::Track;

/// One tick of referee input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// Next checkpoint index over the whole race (all laps)
    pub checkpoint_index: usize,
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
    /// Heading in degrees
    pub angle: i32,
}

impl Tick {
    pub fn car(&self) -> Car {
        Car::from_observation(self.x, self.y, self.vx, self.vy, self.angle)
    }
}

/// Reply line for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub angle: i32,
    pub thrust: i32,
    /// Free-form message slot; carries the search depth
    pub rounds: u32,
}

impl From<&Decision> for Command {
    fn from(decision: &Decision) -> Self {
        Self {
            angle: decision.action.angle,
            thrust: decision.action.thrust,
            rounds: decision.rounds,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EXPERT {} {} {}", self.angle, self.thrust, self.rounds)
    }
}

/// Read one line; `None` at end of input
fn next_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .map_err(|e| Error::io("read input line", e))?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Parse exactly `N` whitespace-separated integers
fn parse_ints<const N: usize>(line: &str, context: &'static str) -> Result<[i64; N]> {
    let malformed = || Error::MalformedLine {
        context,
        line: line.to_string(),
        expected: N,
    };
    let mut values = [0i64; N];
    let mut tokens = line.split_whitespace();
    for value in values.iter_mut() {
        *value = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(malformed)?;
    }
    if tokens.next().is_some() {
        return Err(malformed());
    }
    Ok(values)
}

fn to_i32(value: i64, line: &str, context: &'static str, expected: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::MalformedLine {
        context,
        line: line.to_string(),
        expected,
    })
}

/// Read the track header
pub fn read_track<R: BufRead>(reader: &mut R) -> Result<Track> {
    let line = next_line(reader)?.ok_or(Error::UnexpectedEof {
        context: "checkpoint count",
    })?;
    let [count] = parse_ints::<1>(&line, "checkpoint count")?;
    let count = usize::try_from(count).map_err(|_| Error::MalformedLine {
        context: "checkpoint count",
        line: line.clone(),
        expected: 1,
    })?;

    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let line = next_line(reader)?.ok_or(Error::UnexpectedEof {
            context: "checkpoint",
        })?;
        let [x, y] = parse_ints::<2>(&line, "checkpoint")?;
        points.push((
            to_i32(x, &line, "checkpoint", 2)?,
            to_i32(y, &line, "checkpoint", 2)?,
        ));
    }

    let track = Track::from_points(&points)?;
    log::info!(
        "Track loaded: {} checkpoints per lap, {} total",
        track.lap_len(),
        track.len()
    );
    Ok(track)
}

/// Read the next tick; `Ok(None)` once the referee closes the stream
pub fn read_tick<R: BufRead>(reader: &mut R) -> Result<Option<Tick>> {
    let line = loop {
        match next_line(reader)? {
            Some(line) if line.is_empty() => continue,
            Some(line) => break line,
            None => return Ok(None),
        }
    };
    const CONTEXT: &str = "tick";
    let [index, x, y, vx, vy, angle] = parse_ints::<6>(&line, CONTEXT)?;
    let checkpoint_index = usize::try_from(index).map_err(|_| Error::MalformedLine {
        context: CONTEXT,
        line: line.clone(),
        expected: 6,
    })?;
    Ok(Some(Tick {
        checkpoint_index,
        x: to_i32(x, &line, CONTEXT, 6)?,
        y: to_i32(y, &line, CONTEXT, 6)?,
        vx: to_i32(vx, &line, CONTEXT, 6)?,
        vy: to_i32(vy, &line, CONTEXT, 6)?,
        angle: to_i32(angle, &line, CONTEXT, 6)?,
    }))
}

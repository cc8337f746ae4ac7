//! Randomness port
//!
//! Message, focus and energy selection draw from a [`RandomSource`] instead
//! of a global generator, so tests can feed fixed sequences.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces uniform values in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_f64(&mut self) -> f64;
}

/// Entropy-seeded generator for normal runs.
#[derive(Debug)]
pub struct ThreadRandom {
    rng: StdRng,
}

impl ThreadRandom {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Reproducible generator (same seed, same greetings).
#[derive(Debug)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values outside `[0, 1)` are clamped into range. An empty list yields `0.0`.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    pos: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }

    /// Always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.pos % self.values.len()];
        self.pos = self.pos.wrapping_add(1);
        clamp_unit(value)
    }
}

/// Pick an index into a pool of `len` entries from a draw in `[0, 1)`.
///
/// `len` must be non-zero.
pub fn pick_index(draw: f64, len: usize) -> usize {
    let idx = (clamp_unit(draw) * len as f64).floor() as usize;
    idx.min(len - 1)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else if value >= 1.0 {
        1.0 - f64::EPSILON
    } else {
        value
    }
}

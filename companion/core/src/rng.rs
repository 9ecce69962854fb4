//! Random Sources
//!
//! Every random branch in the engine draws from a [`RandomSource`] handed
//! in by the caller. Production hosts use [`SeededRandom`]; tests script
//! the exact draws with [`ScriptedRandom`].

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform draws in `[0, 1)`
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f32;

    /// Uniform value in `[low, high)`
    fn range(&mut self, low: f32, high: f32) -> f32 {
        low + self.next_unit() * (high - low)
    }

    /// `true` with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_unit() < p
    }

    /// Uniform index in `[0, len)`; `0` for an empty range
    fn index(&mut self, len: usize) -> usize {
        let i = (self.next_unit() * len as f32) as usize;
        i.min(len.saturating_sub(1))
    }
}

/// Pick one entry from a non-empty list of phrases
pub fn pick(rng: &mut dyn RandomSource, items: &[&'static str]) -> &'static str {
    items.get(rng.index(items.len())).copied().unwrap_or_default()
}

/// `StdRng`-backed source, seeded or from OS entropy
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Deterministic source for reproducible runs
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Replays a fixed list of draws, then a fallback value forever
///
/// The default fallback (`0.99`) makes every low-probability roll fail,
/// which keeps scripted scenarios free of surprise side effects.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: VecDeque<f32>,
    fallback: f32,
    draws: usize,
}

impl ScriptedRandom {
    /// Largest value handed out, keeping draws inside `[0, 1)`
    const MAX: f32 = 0.999_999;

    /// Script the given draws
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0.99,
            draws: 0,
        }
    }

    /// Change the value returned once the script runs out
    #[must_use]
    pub fn with_fallback(mut self, fallback: f32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Append more scripted draws
    pub fn push(&mut self, value: f32) {
        self.values.push_back(value);
    }

    /// Total number of draws taken so far
    #[must_use]
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        self.draws += 1;
        self.values
            .pop_front()
            .unwrap_or(self.fallback)
            .clamp(0.0, Self::MAX)
    }
}

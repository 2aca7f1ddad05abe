//! Randomness used by the forecast generator.
//!
//! Handlers share one [`RandomSource`] across concurrently running requests, so
//! every implementation must be `Send + Sync`. Draw order between concurrent
//! requests is unspecified.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{
    fmt::Debug,
    ops::Range,
    sync::{Mutex, PoisonError},
};

pub trait RandomSource: Send + Sync + Debug {
    /// Uniform draw from the half-open `range`. The range must not be empty.
    fn next_in(&self, range: Range<i32>) -> i32;

    /// Uniform index into a collection of `len` items (`len > 0`).
    fn next_index(&self, len: usize) -> usize;
}

/// Draws from the calling thread's generator. This is the production source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_in(&self, range: Range<i32>) -> i32 {
        rand::rng().random_range(range)
    }

    fn next_index(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Reproducible source for tests and the `forecast --seed` command.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic while holding the lock cannot leave the generator invalid.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

impl RandomSource for SeededRandom {
    fn next_in(&self, range: Range<i32>) -> i32 {
        self.with_rng(|rng| rng.random_range(range))
    }

    fn next_index(&self, len: usize) -> usize {
        self.with_rng(|rng| rng.random_range(0..len))
    }
}

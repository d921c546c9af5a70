//! Random number sources for match simulation
//!
//! Every stochastic decision in the engine goes through [`RandomSource`],
//! so a fixed seed (or a scripted source in tests) reproduces a whole
//! season exactly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform integer source. `low..=high`, both inclusive.
pub trait RandomSource {
    fn uniform_int(&mut self, low: i64, high: i64) -> i64;

    /// Index into a slice of `len` labels, each equally likely.
    fn choose_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.uniform_int(0, len as i64 - 1) as usize
    }

    /// Seed for a derived, independent source (one per Monte Carlo trial).
    fn next_seed(&mut self) -> u64 {
        self.uniform_int(0, i64::MAX) as u64
    }
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        (**self).uniform_int(low, high)
    }
}

/// Adapter from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ChaCha8Rng> {
    /// Same seed, same sequence, on every platform.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}

/// Replays a fixed list of draws, clamped into the requested range.
#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;

    #[derive(Debug, Clone)]
    pub struct ScriptedSource {
        values: Vec<i64>,
        cursor: usize,
    }

    impl ScriptedSource {
        pub fn new(values: Vec<i64>) -> Self {
            assert!(!values.is_empty(), "scripted source needs at least one value");
            Self { values, cursor: 0 }
        }

        /// Always returns the same value (clamped).
        pub fn constant(value: i64) -> Self {
            Self::new(vec![value])
        }

        pub fn draws(&self) -> usize {
            self.cursor
        }
    }

    impl RandomSource for ScriptedSource {
        fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
            let value = self.values[self.cursor % self.values.len()];
            self.cursor += 1;
            value.clamp(low, high)
        }
    }
}

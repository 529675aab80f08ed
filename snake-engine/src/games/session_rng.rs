use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Every random decision the game makes goes through this trait so tests can
/// substitute a scripted source.
pub trait RandomSource {
    /// Uniform value in `0..upper`. `upper` is never zero.
    fn index(&mut self, upper: usize) -> usize;

    /// `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool;

    /// Uniform value in `low..=high`.
    fn range_inclusive(&mut self, low: u32, high: u32) -> u32;
}

pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SessionRng {
    fn index(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..upper.max(1))
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if low >= high {
            return low;
        }
        self.rng.random_range(low..=high)
    }
}

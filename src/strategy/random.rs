//! Uniform random selection

use crate::domain::{Candidate, Strategy};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks a candidate uniformly at random
#[derive(Debug)]
pub struct RandomStrategy {
    rng: Mutex<StdRng>,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence, for tests and simulations
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn select(&self, candidates: &[&dyn Candidate]) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }
        Some(self.rng.lock().gen_range(0..candidates.len()))
    }

    fn name(&self) -> &str {
        "random"
    }
}

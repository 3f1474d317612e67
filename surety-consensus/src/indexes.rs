//! Seedable oracle index assignment
//!
//! All "randomness" in the core flows through this source so index
//! assignment is reproducible in tests: seed it and the same draws come out.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Pseudorandom source of oracle indexes
#[derive(Debug)]
pub struct IndexSource {
    rng: StdRng,
}

impl IndexSource {
    /// Source seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source for tests and replay
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw one index from `0..pool`
    pub fn draw_index(&mut self, pool: u8) -> u8 {
        self.rng.gen_range(0..pool)
    }

    /// Draw `count` distinct indexes from `0..pool`
    ///
    /// `count` must not exceed `pool` or the loop could never finish.
    pub fn assign(&mut self, count: usize, pool: u8) -> Vec<u8> {
        debug_assert!(count <= pool as usize);
        let mut indexes = Vec::with_capacity(count);
        while indexes.len() < count {
            let index = self.draw_index(pool);
            if !indexes.contains(&index) {
                indexes.push(index);
            }
        }
        indexes
    }
}

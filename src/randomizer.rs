//! Seeded random source for piece selection and garbage holes
//!
//! Pieces are drawn uniformly and independently; there is no 7-bag, so
//! droughts of a given kind are possible. Two boards seeded alike see the
//! same piece sequence as long as they consume the same number of draws.

use crate::tetromino::ShapeKind;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: ChaCha8Rng,
}

impl Randomizer {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Reseed in place
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Draw the next piece kind uniformly from the 7
    pub fn next_piece(&mut self) -> ShapeKind {
        let all = ShapeKind::all();
        all[self.rng.gen_range(0..all.len())]
    }

    /// Draw a hole column in `0..width`
    pub fn hole(&mut self, width: usize) -> usize {
        self.rng.gen_range(0..width.max(1))
    }

    /// Draw `count` independent hole columns
    pub fn holes(&mut self, count: usize, width: usize) -> Vec<usize> {
        (0..count).map(|_| self.hole(width)).collect()
    }
}

//! Uniform random piece generation
//!
//! Every draw picks one of the 8 tetrominoes with equal probability.
//! There is no bag, so the same piece can repeat any number of times.

use crate::tetromino::Tetromino;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The piece randomizer
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: ChaCha8Rng,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Create a generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Create a generator with a fixed seed (for tests and replays)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw the next tetromino
    pub fn next(&mut self) -> Tetromino {
        let index = self.rng.gen_range(0..Tetromino::ALL.len());
        Tetromino::ALL[index]
    }
}

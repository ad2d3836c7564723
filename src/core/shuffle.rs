//! Seeded shuffling for deck setup and replays

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Deterministic permutation generator
///
/// The RNG is seeded once in [`Shuffler::new`] and never reseeded, so a
/// shuffler built from the same seed produces the same sequence of
/// permutations on every platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shuffler {
    rng: ChaCha12Rng,
}

impl Shuffler {
    pub fn new(seed: u64) -> Self {
        Shuffler {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    /// Each integer in `[0, n)` exactly once, in shuffled order
    pub fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut self.rng);
        order
    }

    /// Shuffle a slice in place (Fisher-Yates)
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

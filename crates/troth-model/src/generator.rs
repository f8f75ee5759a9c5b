// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Random Instance Generation
//!
//! A thin utility producing well-formed instances with uniformly random
//! preference rankings, deterministic under a fixed seed. Used by tests,
//! benchmarks, and demo tooling; the core algorithms only require that rank
//! lists be permutations, which shuffling guarantees by construction.

use crate::instance::Instance;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A configurable generator of random stable matching instances.
///
/// # Examples
///
/// ```rust
/// # use troth_model::generator::InstanceGenerator;
///
/// let instance = InstanceGenerator::new(6).with_seed(42).generate();
/// assert_eq!(instance.size(), 6);
///
/// // Same seed, same instance.
/// let again = InstanceGenerator::new(6).with_seed(42).generate();
/// assert_eq!(instance, again);
/// ```
#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    size: usize,
    seed: Option<u64>,
}

impl InstanceGenerator {
    /// Creates a generator for instances with `size` participants per group.
    #[inline]
    pub fn new(size: usize) -> Self {
        Self { size, seed: None }
    }

    /// Fixes the RNG seed, making generation reproducible.
    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generates an instance with uniformly random preference rankings.
    ///
    /// Without a seed, each call draws fresh entropy.
    pub fn generate(&self) -> Instance {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let proposer_ranks = self.random_rows(&mut rng);
        let receiver_ranks = self.random_rows(&mut rng);

        // Shuffled identity rows are permutations, so validation cannot fail.
        Instance::new(proposer_ranks, receiver_ranks)
            .expect("shuffled rank rows form valid permutations")
    }

    fn random_rows(&self, rng: &mut ChaCha8Rng) -> Vec<Vec<usize>> {
        (0..self.size)
            .map(|_| {
                let mut row: Vec<usize> = (0..self.size).collect();
                row.shuffle(rng);
                row
            })
            .collect()
    }
}

//! The single source of randomness used by setup and by fallbacks.
//!
//! Everything random in a game (impostor choice, turn order, secret word,
//! fallback clue or vote) is drawn through [`GameRng`], so tests can swap in
//! a scripted sequence and assert exact outcomes.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

pub trait GameRng: Send {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Uniform permutation of `0..len`.
    fn permutation(&mut self, len: usize) -> Vec<usize>;
}

/// [`GameRng`] backed by [`StdRng`], seeded or drawn from OS entropy.
#[derive(Debug)]
pub struct SeededRng {
    rng: StdRng,
}

impl SeededRng {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::new(None)
    }
}

impl GameRng for SeededRng {
    fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick_index needs a non-empty range");
        self.rng.random_range(0..len.max(1))
    }

    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut self.rng);
        order
    }
}

/// Replays fixed draws, wrapping around when exhausted. Picks are reduced
/// modulo the requested range; permutations are used when their length
/// matches, otherwise identity order is returned.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    picks: Vec<usize>,
    pick_idx: usize,
    permutations: Vec<Vec<usize>>,
    permutation_idx: usize,
}

impl ScriptedRng {
    pub fn new(picks: Vec<usize>, permutations: Vec<Vec<usize>>) -> Self {
        Self {
            picks,
            pick_idx: 0,
            permutations,
            permutation_idx: 0,
        }
    }
}

impl GameRng for ScriptedRng {
    fn pick_index(&mut self, len: usize) -> usize {
        if self.picks.is_empty() || len == 0 {
            return 0;
        }
        let pick = self.picks[self.pick_idx % self.picks.len()];
        self.pick_idx += 1;
        pick % len
    }

    fn permutation(&mut self, len: usize) -> Vec<usize> {
        if self.permutations.is_empty() {
            return (0..len).collect();
        }
        let order = self.permutations[self.permutation_idx % self.permutations.len()].clone();
        self.permutation_idx += 1;
        let mut sorted = order.clone();
        sorted.sort_unstable();
        if sorted == (0..len).collect::<Vec<_>>() {
            order
        } else {
            (0..len).collect()
        }
    }
}

//! Stochastic value-tree generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use chrono::{FixedOffset, TimeZone};
use plistdoc_core::{Number, ValueTree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("PLISTDOC_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    /// Returns 0, 1, 2, ... with decreasing probability
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Random dictionary key
    pub fn key(&mut self) -> String {
        let len = 1 + self.geometric(0.7);
        let chars = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_.";
        (0..len)
            .map(|_| chars[self.rng.gen_range(0..chars.len())] as char)
            .collect()
    }

    /// Random string, including markup-significant characters
    pub fn text(&mut self) -> String {
        let len = self.geometric(0.85);
        let chars = ['a', 'z', ' ', '<', '>', '&', '"', '\'', 'é', '日', '\n'];
        (0..len)
            .map(|_| chars[self.rng.gen_range(0..chars.len())])
            .collect()
    }

    /// Random byte blob
    pub fn bytes(&mut self) -> Vec<u8> {
        let len = self.geometric(0.9);
        (0..len).map(|_| self.rng.gen()).collect()
    }

    pub fn number(&mut self) -> Number {
        match self.rng.gen_range(0..3) {
            0 => Number::Integer(self.rng.gen_range(-100_000..100_000)),
            1 => Number::Real(self.rng.gen_range(-1000.0..1000.0)),
            _ => Number::Boolean(self.rng.gen()),
        }
    }

    /// Timestamp with a random whole-minute offset
    pub fn timestamp(&mut self) -> ValueTree {
        let minutes = self.rng.gen_range(-12 * 60..=14 * 60);
        let offset = FixedOffset::east_opt(minutes * 60).unwrap();
        let secs = self.rng.gen_range(0..4_000_000_000i64);
        ValueTree::Timestamp(offset.timestamp_opt(secs, 0).unwrap())
    }

    /// Random scalar value, data blobs only when `with_data`
    pub fn scalar(&mut self, with_data: bool) -> ValueTree {
        let choices = if with_data { 4 } else { 3 };
        match self.rng.gen_range(0..choices) {
            0 => ValueTree::Text(self.text()),
            1 => ValueTree::Number(self.number()),
            2 => self.timestamp(),
            _ => ValueTree::RawData(self.bytes()),
        }
    }

    /// Random tree no deeper than `max_depth`
    pub fn tree(&mut self, max_depth: usize, with_data: bool) -> ValueTree {
        if max_depth <= 1 || self.chance(0.4) {
            return self.scalar(with_data);
        }
        let width = self.geometric(0.6);
        match self.rng.gen_range(0..3) {
            0 => ValueTree::Dictionary(
                (0..width)
                    .map(|_| (self.key(), self.tree(max_depth - 1, with_data)))
                    .collect(),
            ),
            1 => ValueTree::Sequence(
                (0..width).map(|_| self.tree(max_depth - 1, with_data)).collect(),
            ),
            _ => ValueTree::Set((0..width).map(|_| self.tree(max_depth - 1, with_data)).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.key(), g2.key());
            assert_eq!(g1.tree(4, true), g2.tree(4, true));
        }
    }

    #[test]
    fn test_depth_bound() {
        let mut gen = Gen::new(7);
        for _ in 0..200 {
            assert!(gen.tree(5, false).depth() <= 5);
        }
    }
}

//! Injectable randomness for strategies that pick among candidates.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform indices.
pub trait RandomSource: Send {
    /// A uniformly distributed index in `0..len`. Callers never pass zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// OS-seeded pseudo-random source used outside of tests.
pub struct StdRandom(StdRng);

impl StdRandom {
    pub fn new() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Deterministic stream, useful for reproducible demos and benchmarks.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for StdRandom {
    fn pick(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Replays a fixed list of indices, then keeps returning 0.
///
/// Each scripted value is reduced modulo `len`, so a script can be written
/// without knowing every list length in advance.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    picks: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl ScriptedSource {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedSource {
    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().map(|p| p % len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_random_stays_in_range() {
        let mut rng = StdRandom::new();
        for len in 1..50 {
            assert!(rng.pick(len) < len);
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = StdRandom::seeded(7);
        let mut b = StdRandom::seeded(7);
        let xs: Vec<usize> = (0..20).map(|_| a.pick(100)).collect();
        let ys: Vec<usize> = (0..20).map(|_| b.pick(100)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_scripted_replays_then_zero() {
        let mut rng = ScriptedSource::new([2, 5, 1]);
        assert_eq!(rng.pick(3), 2);
        assert_eq!(rng.pick(3), 2); // 5 % 3
        assert_eq!(rng.pick(10), 1);
        assert_eq!(rng.pick(10), 0);
    }
}

//! Pseudo-random generation for the solvers.
//!
//! Walk-SAT and the distributor only need fast, statistically decent,
//! reproducible randomness, so a xorshift generator is enough. Seeding
//! from the OS goes through `RandomState`, which is entropy-backed.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

/// Fast xorshift PRNG for non-cryptographic randomness.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Creates a new PRNG with the given seed. A zero seed is remapped,
    /// the all-zero state is a fixed point of xorshift.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed },
        }
    }

    /// Generates the next random u64.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generates a random f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        // 53 high bits, the full mantissa width
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generates a uniform index in `[0, bound)`. `bound` must be nonzero.
    pub fn next_below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}

/// Draws a nonzero seed from OS entropy.
#[must_use]
pub fn entropy_seed() -> u64 {
    let seed = RandomState::new().build_hasher().finish();
    if seed == 0 { 1 } else { seed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xorshift_progresses() {
        let mut rng = XorShift64::new(12345);
        let a = rng.next_u64();
        let b = rng.next_u64();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = XorShift64::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn test_reproducible() {
        let mut a = XorShift64::new(7);
        let mut b = XorShift64::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_next_below_in_range() {
        let mut rng = XorShift64::new(99);
        for _ in 0..1000 {
            assert!(rng.next_below(7) < 7);
        }
    }

    #[test]
    fn test_f64_in_unit_interval() {
        let mut rng = XorShift64::new(3);
        for _ in 0..1000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }
}

//! Deterministic PRNG based on the Xorshift64 algorithm.
//!
//! Every random draw in a population (spawn position, spawn glow, lifetime,
//! integration jitter) goes through one of these, so a scene seeded the same
//! way replays bit-identically.

/// Xorshift64 PRNG with shifts (13, 7, 17).
///
/// Seed 0 is a fixed point of xorshift and is replaced with a non-zero
/// fallback.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns a uniformly distributed f64 in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns a value in [min, max] as f32.
    ///
    /// The draw is made in f64 and rounded once, so the result never leaves
    /// the closed interval when both bounds are representable f32 values.
    /// `min == max` returns `min`.
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        let (min, max) = (f64::from(min), f64::from(max));
        (min + self.next_f64() * (max - min)) as f32
    }

    /// Symmetric jitter in [-range, range].
    pub fn next_jitter(&mut self, range: f32) -> f32 {
        self.next_range(-range, range)
    }

    /// Returns a uniformly distributed index in [0, len).
    ///
    /// # Panics
    ///
    /// Panics if `len` is 0.
    pub fn next_index(&mut self, len: usize) -> usize {
        (self.next_u64() as usize) % len
    }

    /// Derives an independent seed for a child stream (noise tables, a second
    /// population) without consuming a fresh user seed.
    pub fn fork_seed(&mut self) -> u64 {
        self.next_u64() ^ 0x9E37_79B9_7F4A_7C15
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_produce_all_zeros() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn same_seed_produces_identical_sequences() {
        let mut a = Xorshift64::new(7);
        let mut b = Xorshift64::new(7);
        for i in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at {i}");
        }
    }

    #[test]
    fn next_range_with_equal_bounds_returns_bound() {
        let mut rng = Xorshift64::new(3);
        for _ in 0..100 {
            assert_eq!(rng.next_range(0.75, 0.75), 0.75);
        }
    }

    #[test]
    fn next_jitter_is_symmetric_and_bounded() {
        let mut rng = Xorshift64::new(11);
        let mut saw_negative = false;
        let mut saw_positive = false;
        for _ in 0..10_000 {
            let v = rng.next_jitter(0.015);
            assert!((-0.015..=0.015).contains(&v), "jitter {v} out of range");
            saw_negative |= v < 0.0;
            saw_positive |= v > 0.0;
        }
        assert!(saw_negative && saw_positive);
    }

    #[test]
    fn fork_seed_differs_from_parent_stream() {
        let mut parent = Xorshift64::new(42);
        let child_seed = parent.fork_seed();
        let mut child = Xorshift64::new(child_seed);
        assert_ne!(child.next_u64(), parent.next_u64());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval_for_any_seed(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "next_f64() = {v}");
                }
            }

            #[test]
            fn next_range_stays_in_closed_interval(
                seed: u64,
                min in 0.1_f32..2.0,
                span in 0.0_f32..3.0,
            ) {
                let max = min + span;
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v <= max, "{v} outside [{min}, {max}]");
                }
            }

            #[test]
            fn next_index_in_bounds(seed: u64, len in 1_usize..10_000) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    prop_assert!(rng.next_index(len) < len);
                }
            }
        }
    }
}

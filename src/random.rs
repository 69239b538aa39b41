//! Random number generation and elementary draws.
//!
//! Provides seeded RNG construction, unit lattice steps, bulk step sums,
//! and Bernoulli trials. Every function takes the generator explicitly;
//! there is no process-wide random state in this crate.
//!
//! # Reproducibility
//!
//! For reproducible experiments, use [`create_rng`] with a fixed seed.
//! The underlying algorithm (SmallRng) is deterministic for a given seed
//! on the same platform.

use rand::{Rng, RngCore};

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++) for high performance.
/// The sequence is deterministic for a given seed on the same platform.
///
/// # Examples
/// ```
/// use u_brownian::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Creates a `SmallRng` seeded from operating-system entropy.
///
/// Intended for the outermost entry point only, when no seed was given.
pub fn entropy_rng() -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::from_os_rng()
}

/// Draws a single unit lattice step, `-1` or `+1` with equal probability.
///
/// # Examples
/// ```
/// use u_brownian::random::{create_rng, unit_step};
/// let mut rng = create_rng(7);
/// let s = unit_step(&mut rng);
/// assert!(s == -1 || s == 1);
/// ```
pub fn unit_step<R: Rng>(rng: &mut R) -> i64 {
    if rng.random::<bool>() {
        1
    } else {
        -1
    }
}

/// Returns the sum of `n` independent unit steps without storing them.
///
/// # Algorithm
/// Each bit of a uniformly random `u64` is an independent fair coin.
/// Steps are consumed 64 at a time: a block with `k` set bits contributes
/// `2k − 64`. The final partial block masks off the unused high bits.
///
/// # Complexity
/// Time: O(n / 64), Space: O(1)
///
/// # Examples
/// ```
/// use u_brownian::random::{create_rng, step_sum};
/// let mut rng = create_rng(1);
/// let s = step_sum(1001, &mut rng);
/// assert!(s.abs() <= 1001);
/// assert_eq!(s.rem_euclid(2), 1);
/// ```
pub fn step_sum<R: Rng>(n: usize, rng: &mut R) -> i64 {
    let full_blocks = n / 64;
    let remainder = n % 64;

    let mut heads: u64 = 0;
    for _ in 0..full_blocks {
        heads += u64::from(rng.next_u64().count_ones());
    }
    if remainder > 0 {
        let mask = (1_u64 << remainder) - 1;
        heads += u64::from((rng.next_u64() & mask).count_ones());
    }

    2 * heads as i64 - n as i64
}

/// Performs a Bernoulli trial that succeeds with probability `p`.
///
/// The caller guarantees `p ∈ [0, 1]`.
pub fn bernoulli<R: Rng>(p: f64, rng: &mut R) -> bool {
    rng.random_bool(p)
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn step_sum_bounded_with_parity(
            seed in 0_u64..10000,
            n in 0_usize..500,
        ) {
            let mut rng = create_rng(seed);
            let s = step_sum(n, &mut rng);
            prop_assert!(s.unsigned_abs() as usize <= n);
            prop_assert_eq!(s.rem_euclid(2), (n % 2) as i64);
        }

        #[test]
        fn step_sum_deterministic(
            seed in 0_u64..10000,
            n in 0_usize..500,
        ) {
            let a = step_sum(n, &mut create_rng(seed));
            let b = step_sum(n, &mut create_rng(seed));
            prop_assert_eq!(a, b);
        }
    }
}

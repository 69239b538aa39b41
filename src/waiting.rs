//! Bernoulli coin sequences, waiting times between heads, and repeated
//! head-count experiments.
//!
//! A coin lands heads with probability `p`. The number of tails between
//! consecutive heads is geometric with mean `(1−p)/p`; the number of heads
//! in `n` flips is binomial and close to Poisson(n·p) when `p` is small.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distributions::{Exponential, Geometric, Poisson};
use crate::error::{checked_count, checked_probability, WalkError, WalkResult};
use crate::random::bernoulli;
use crate::stats::{self, Histogram};

/// Head probability used by the waiting-time experiments.
pub const DEFAULT_HEAD_PROBABILITY: f64 = 0.08;

/// Generates `n_flips` coin outcomes, `1` for heads with probability
/// `p_head`, `0` for tails.
///
/// # Errors
/// `InvalidArgument` if `n_flips` is negative or `p_head ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_brownian::random::create_rng;
/// use u_brownian::waiting::coin_sequence;
/// let mut rng = create_rng(42);
/// let seq = coin_sequence(1000, 0.08, &mut rng).unwrap();
/// assert_eq!(seq.len(), 1000);
/// assert!(seq.iter().all(|&c| c == 0 || c == 1));
/// ```
pub fn coin_sequence<R: Rng>(n_flips: i64, p_head: f64, rng: &mut R) -> WalkResult<Vec<u8>> {
    let n = checked_count("n_flips", n_flips)?;
    let p = checked_probability("p_head", p_head)?;
    Ok((0..n).map(|_| u8::from(bernoulli(p, rng))).collect())
}

/// Number of tails strictly between each pair of consecutive heads.
///
/// Any non-zero entry counts as a head. Fewer than two heads yields an
/// empty vector.
///
/// # Examples
/// ```
/// use u_brownian::waiting::waiting_times;
/// assert_eq!(waiting_times(&[0, 0, 1, 0, 0, 0, 1, 0, 1]), vec![3, 1]);
/// assert!(waiting_times(&[0, 0, 1, 0]).is_empty());
/// ```
pub fn waiting_times(sequence: &[u8]) -> Vec<u64> {
    let mut times = Vec::new();
    let mut last_head: Option<usize> = None;
    for (i, _) in sequence.iter().enumerate().filter(|(_, &c)| c != 0) {
        if let Some(prev) = last_head {
            times.push((i - prev - 1) as u64);
        }
        last_head = Some(i);
    }
    times
}

/// Summary of observed waiting times against the geometric and
/// exponential predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitingTimeStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Geometric mean waiting time `(1−p)/p`.
    pub theoretical_mean: f64,
    /// Exponential (continuous-time) mean `1/p`.
    pub exponential_mean: f64,
}

/// Computes waiting-time statistics for a coin with head probability
/// `p_head`.
///
/// # Errors
/// `EmptyInput` if `times` is empty; `InvalidArgument` unless
/// `0 < p_head ≤ 1`.
pub fn analyze_waiting_times(times: &[u64], p_head: f64) -> WalkResult<WaitingTimeStats> {
    let geometric = Geometric::new(p_head)?;
    let exponential = Exponential::new(p_head)?;
    if times.is_empty() {
        return Err(WalkError::empty("waiting-time statistics"));
    }
    let data: Vec<f64> = times.iter().map(|&t| t as f64).collect();
    let mean = stats::mean(&data).ok_or_else(|| WalkError::empty("waiting-time mean"))?;
    let std_dev = stats::population_std_dev(&data)
        .ok_or_else(|| WalkError::empty("waiting-time spread"))?;
    Ok(WaitingTimeStats {
        count: times.len(),
        mean,
        std_dev,
        theoretical_mean: geometric.mean(),
        exponential_mean: exponential.mean(),
    })
}

/// Largest waiting time that still gets one bin per integer.
pub const MAX_UNIT_BINS: u64 = 10_000;

/// Density histogram with unit-width bins centred on `0, 1, …, max(times)`.
///
/// When `max(times)` reaches [`MAX_UNIT_BINS`], the span
/// `[-0.5, max + 0.5]` is split into `MAX_UNIT_BINS` equal-width bins
/// instead.
/// `None` when `times` is empty.
pub fn waiting_time_histogram(times: &[u64]) -> Option<Histogram> {
    let max = *times.iter().max()?;
    let data: Vec<f64> = times.iter().map(|&t| t as f64).collect();
    if max >= MAX_UNIT_BINS {
        debug!("waiting time {max} exceeds the unit-bin limit, using {MAX_UNIT_BINS} bins");
        let hi = max as f64 + 0.5;
        return Histogram::uniform_range(&data, MAX_UNIT_BINS as usize, -0.5, hi);
    }
    let edges: Vec<f64> = (0..=max + 1).map(|k| k as f64 - 0.5).collect();
    Histogram::from_edges(&data, edges)
}

/// Runs `n_experiments` experiments of `n_flips` flips each and returns
/// the number of heads in each.
///
/// # Errors
/// `InvalidArgument` if either count is negative or `p_head ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_brownian::random::create_rng;
/// use u_brownian::waiting::head_counts;
/// let mut rng = create_rng(42);
/// let counts = head_counts(100, 10, 1.0, &mut rng).unwrap();
/// assert!(counts.iter().all(|&c| c == 10));
/// ```
pub fn head_counts<R: Rng>(
    n_experiments: i64,
    n_flips: i64,
    p_head: f64,
    rng: &mut R,
) -> WalkResult<Vec<u64>> {
    let experiments = checked_count("n_experiments", n_experiments)?;
    let flips = checked_count("n_flips", n_flips)?;
    let p = checked_probability("p_head", p_head)?;
    debug!("{experiments} head-count experiments of {flips} flips, p = {p}");
    Ok((0..experiments)
        .map(|_| (0..flips).filter(|_| bernoulli(p, rng)).count() as u64)
        .collect())
}

/// Observed head-count moments next to the Poisson rate `λ = n_flips·p`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadCountStats {
    pub mean: f64,
    /// Population variance.
    pub variance: f64,
    pub lambda: f64,
}

impl HeadCountStats {
    /// The Poisson law these counts are compared against.
    ///
    /// # Errors
    /// `InvalidArgument` when `lambda` is zero (no flips or `p = 0`).
    pub fn poisson(&self) -> WalkResult<Poisson> {
        Poisson::new(self.lambda)
    }
}

/// Summarises head counts from [`head_counts`].
///
/// # Errors
/// `EmptyInput` if `counts` is empty; `InvalidArgument` for a negative
/// `n_flips` or `p_head ∉ [0, 1]`.
pub fn head_count_statistics(
    counts: &[u64],
    n_flips: i64,
    p_head: f64,
) -> WalkResult<HeadCountStats> {
    let flips = checked_count("n_flips", n_flips)?;
    let p = checked_probability("p_head", p_head)?;
    let data: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
    let mean = stats::mean(&data).ok_or_else(|| WalkError::empty("head-count statistics"))?;
    let variance =
        stats::population_variance(&data).ok_or_else(|| WalkError::empty("head-count statistics"))?;
    Ok(HeadCountStats {
        mean,
        variance,
        lambda: flips as f64 * p,
    })
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

        // --- heads + waits account for every position between first and last head ---
        #[test]
        fn waiting_times_partition_sequence(
            seq in proptest::collection::vec(0_u8..=1, 0..200),
        ) {
            let heads: Vec<usize> = seq
                .iter()
                .enumerate()
                .filter(|(_, &c)| c == 1)
                .map(|(i, _)| i)
                .collect();
            let times = waiting_times(&seq);
            prop_assert_eq!(times.len(), heads.len().saturating_sub(1));
            if heads.len() >= 2 {
                let span = (heads[heads.len() - 1] - heads[0]) as u64;
                let covered: u64 = times.iter().sum::<u64>() + times.len() as u64;
                prop_assert_eq!(covered, span);
            }
        }
    }
}

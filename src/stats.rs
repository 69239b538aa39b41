//! Descriptive statistics with numerical stability guarantees.
//!
//! All functions in this module handle edge cases explicitly and use
//! numerically stable algorithms to avoid catastrophic cancellation.
//! They return `Option` for empty or non-finite input; the walk and
//! waiting-time layers turn `None` into [`WalkError::EmptyInput`](crate::error::WalkError).
//!
//! # Algorithms
//!
//! - **Mean**: Kahan compensated summation for O(ε) error independent of n.
//! - **Variance/StdDev**: Welford's online algorithm.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).
//! - **Histogram**: half-open bins `[eᵢ, eᵢ₊₁)` with the last bin closed,
//!   the same convention as NumPy's `histogram`.

use serde::{Deserialize, Serialize};

/// Computes the arithmetic mean using Kahan compensated summation.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Returns
/// - `None` if `data` is empty or contains any NaN/Inf.
///
/// # Examples
/// ```
/// use u_brownian::stats::mean;
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert!((mean(&v).unwrap() - 3.0).abs() < 1e-15);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Computes the sample variance using Welford's online algorithm.
///
/// Returns the **sample** (unbiased) variance with Bessel's correction
/// (denominator `n − 1`). The walk statistics use
/// [`population_variance`] instead; this is kept for callers that want
/// the unbiased estimator explicitly.
///
/// # Returns
/// - `None` if `data.len() < 2` or contains NaN/Inf.
///
/// # Examples
/// ```
/// use u_brownian::stats::variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
pub fn variance(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    accumulate(data)?.sample_variance()
}

/// Computes the population variance using Welford's online algorithm.
///
/// Returns the **population** variance (denominator `n`).
///
/// # Returns
/// - `None` if `data` is empty or contains NaN/Inf.
///
/// # Examples
/// ```
/// use u_brownian::stats::population_variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((population_variance(&v).unwrap() - 4.0).abs() < 1e-10);
/// ```
pub fn population_variance(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    accumulate(data)?.population_variance()
}

/// Computes the sample standard deviation, `sqrt(variance(data))`.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// Computes the population standard deviation, `sqrt(population_variance(data))`.
///
/// # Examples
/// ```
/// use u_brownian::stats::population_std_dev;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((population_std_dev(&v).unwrap() - 2.0).abs() < 1e-10);
/// ```
pub fn population_std_dev(data: &[f64]) -> Option<f64> {
    population_variance(data).map(f64::sqrt)
}

fn accumulate(data: &[f64]) -> Option<WelfordAccumulator> {
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let mut acc = WelfordAccumulator::new();
    for &x in data {
        acc.update(x);
    }
    Some(acc)
}

/// Returns the minimum value in the slice.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN.
pub fn min(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter().copied().try_fold(f64::INFINITY, |acc, x| {
        if x.is_nan() {
            None
        } else {
            Some(acc.min(x))
        }
    })
}

/// Returns the maximum value in the slice.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN.
pub fn max(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter().copied().try_fold(f64::NEG_INFINITY, |acc, x| {
        if x.is_nan() {
            None
        } else {
            Some(acc.max(x))
        }
    })
}

// ---------------------------------------------------------------------------
// Kahan compensated summation
// ---------------------------------------------------------------------------

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// This is an improved variant of Kahan summation that also handles the
/// case where the addend is larger in magnitude than the running sum.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *Zeitschrift für Angewandte
/// Mathematik und Mechanik* 54(1), pp. 39–51.
///
/// # Complexity
/// Time: O(n), Space: O(1)
pub fn kahan_sum(data: &[f64]) -> f64 {
    kahan_sum_iter(data.iter().copied())
}

/// [`kahan_sum`] over any iterator of `f64`, so callers can sum derived
/// quantities without collecting them first.
pub fn kahan_sum_iter<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for x in values {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

// ---------------------------------------------------------------------------
// Welford online accumulator
// ---------------------------------------------------------------------------

/// Streaming accumulator for mean and variance.
///
/// Computes running descriptive statistics in a single pass with O(1)
/// memory, which lets ensemble statistics be gathered without
/// materialising an `f64` copy of integer endpoints.
///
/// References:
/// - Welford (1962), *Technometrics* 4(3), pp. 419–420.
/// - Chan, Golub & LeVeque (1979), "Updating Formulae and a
///   Pairwise Algorithm for Computing Sample Variances".
///
/// # Examples
/// ```
/// use u_brownian::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.population_variance().unwrap() - 4.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
}

impl WelfordAccumulator {
    /// Creates a new empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            mean_acc: 0.0,
            m2: 0.0,
        }
    }

    /// Feeds a new sample into the accumulator.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.mean_acc = value;
            return;
        }
        let delta = value - self.mean_acc;
        self.mean_acc += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_acc);
    }

    /// Returns the number of samples seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the running mean, or `None` if no samples have been added.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean_acc)
        }
    }

    /// Returns the sample variance (n − 1 denominator), or `None` if fewer
    /// than 2 samples have been added.
    pub fn sample_variance(&self) -> Option<f64> {
        if self.count < 2 {
            None
        } else {
            Some(self.m2 / (self.count - 1) as f64)
        }
    }

    /// Returns the population variance (n denominator), or `None` if no
    /// samples have been added.
    pub fn population_variance(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.m2 / self.count as f64)
        }
    }

    /// Returns the population standard deviation, or `None` if no samples
    /// have been added.
    pub fn population_std_dev(&self) -> Option<f64> {
        self.population_variance().map(f64::sqrt)
    }

    /// Merges another accumulator into this one (parallel-friendly).
    ///
    /// Uses Chan's parallel update for the second central moment.
    pub fn merge(&mut self, other: &WelfordAccumulator) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }
        let na = self.count as f64;
        let nb = other.count as f64;
        let total = self.count + other.count;
        let n = total as f64;
        let delta = other.mean_acc - self.mean_acc;

        self.mean_acc += delta * (nb / n);
        self.m2 += other.m2 + delta * delta * na * nb / n;
        self.count = total;
    }
}

impl Default for WelfordAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Binned counts over explicit edges, ready for a plotting collaborator.
///
/// Bins are `[eᵢ, eᵢ₊₁)` except the last, which is closed on the right.
/// Samples outside `[e₀, eₙ]` are not counted.
///
/// # Examples
/// ```
/// use u_brownian::stats::Histogram;
/// let h = Histogram::uniform(&[0.0, 1.0, 1.0, 2.0], 2).unwrap();
/// assert_eq!(h.counts(), &[1, 3]);
/// let area: f64 = h
///     .density()
///     .iter()
///     .zip(h.edges().windows(2))
///     .map(|(d, w)| d * (w[1] - w[0]))
///     .sum();
/// assert!((area - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
}

impl Histogram {
    /// Builds `bins` equal-width bins spanning `[min(data), max(data)]`.
    ///
    /// When every sample is equal the range is widened to `value ± 0.5`.
    ///
    /// # Returns
    /// - `None` if `data` is empty, `bins == 0`, or data contains NaN/Inf.
    pub fn uniform(data: &[f64], bins: usize) -> Option<Self> {
        if bins == 0 || !data.iter().all(|x| x.is_finite()) {
            return None;
        }
        let (mut lo, mut hi) = (min(data)?, max(data)?);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        Self::uniform_range(data, bins, lo, hi)
    }

    /// Builds `bins` equal-width bins spanning `[lo, hi]`.
    ///
    /// # Returns
    /// - `None` if `bins == 0`, the bounds are not finite with `lo < hi`, or
    ///   the bins are too narrow to be distinct at this magnitude.
    pub fn uniform_range(data: &[f64], bins: usize, lo: f64, hi: f64) -> Option<Self> {
        if bins == 0 {
            return None;
        }
        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
        edges.push(hi);
        Self::from_edges(data, edges)
    }

    /// Builds a histogram over caller-supplied edges.
    ///
    /// # Returns
    /// - `None` if fewer than two edges are given or the edges are not
    ///   finite and strictly increasing.
    pub fn from_edges(data: &[f64], edges: Vec<f64>) -> Option<Self> {
        if edges.len() < 2
            || !edges.iter().all(|e| e.is_finite())
            || !edges.windows(2).all(|w| w[0] < w[1])
        {
            return None;
        }
        let bins = edges.len() - 1;
        let last = edges[bins];
        let mut counts = vec![0_u64; bins];
        for &x in data {
            if x.is_nan() || x < edges[0] || x > last {
                continue;
            }
            let idx = if x == last {
                bins - 1
            } else {
                edges.partition_point(|&e| e <= x) - 1
            };
            counts[idx] += 1;
        }
        Some(Self { edges, counts })
    }

    /// Bin edges, one more than the number of bins.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Sample count per bin.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of samples that fell inside the edges.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Midpoint of each bin.
    pub fn bin_centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Probability density per bin, integrating to 1 over the edges.
    ///
    /// All zeros when no sample fell inside the edges.
    pub fn density(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.counts.len()];
        }
        self.counts
            .iter()
            .zip(self.edges.windows(2))
            .map(|(&c, w)| c as f64 / (total as f64 * (w[1] - w[0])))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- mean ---

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean_nan() {
        assert_eq!(mean(&[1.0, f64::NAN, 3.0]), None);
    }

    #[test]
    fn test_mean_inf() {
        assert_eq!(mean(&[1.0, f64::INFINITY, 3.0]), None);
    }

    // --- variance ---

    #[test]
    fn test_variance_basic() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let var = variance(&v).unwrap();
        assert!((var - 4.571428571428571).abs() < 1e-10);
    }

    #[test]
    fn test_variance_single() {
        assert_eq!(variance(&[1.0]), None);
    }

    #[test]
    fn test_population_variance() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let var = population_variance(&v).unwrap();
        assert!((var - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_population_variance_single_is_zero() {
        assert_eq!(population_variance(&[3.0]), Some(0.0));
    }

    #[test]
    fn test_population_variance_empty() {
        assert_eq!(population_variance(&[]), None);
    }

    #[test]
    fn test_population_std_dev_waiting_times() {
        // numpy.std([10, 12, 8, 14, 11]) = 2.0
        let sd = population_std_dev(&[10.0, 12.0, 8.0, 14.0, 11.0]).unwrap();
        assert!((sd - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = std_dev(&v).unwrap();
        assert!((sd - 4.571428571428571_f64.sqrt()).abs() < 1e-10);
    }

    // --- min / max ---

    #[test]
    fn test_min_max() {
        let v = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        assert_eq!(min(&v), Some(1.0));
        assert_eq!(max(&v), Some(9.0));
    }

    #[test]
    fn test_min_max_nan() {
        assert_eq!(min(&[1.0, f64::NAN]), None);
        assert_eq!(max(&[1.0, f64::NAN]), None);
    }

    // --- kahan_sum ---

    #[test]
    fn test_kahan_sum_precision() {
        // Sum of 1e16 + 1.0 + (-1e16) with naive sum loses the 1.0
        let v = [1e16, 1.0, -1e16];
        let result = kahan_sum(&v);
        assert!(
            (result - 1.0).abs() < 1e-10,
            "Kahan sum should preserve the 1.0: got {result}"
        );
    }

    #[test]
    fn test_kahan_sum_iter_matches_slice() {
        let v = [0.1, 0.2, 0.3, 0.4];
        assert_eq!(kahan_sum(&v), kahan_sum_iter(v.iter().copied()));
    }

    // --- WelfordAccumulator ---

    #[test]
    fn test_welford_empty() {
        let acc = WelfordAccumulator::new();
        assert_eq!(acc.count(), 0);
        assert_eq!(acc.mean(), None);
        assert_eq!(acc.population_variance(), None);
    }

    #[test]
    fn test_welford_single() {
        let mut acc = WelfordAccumulator::new();
        acc.update(5.0);
        assert_eq!(acc.mean(), Some(5.0));
        assert_eq!(acc.sample_variance(), None);
        assert_eq!(acc.population_variance(), Some(0.0));
    }

    #[test]
    fn test_welford_merge() {
        let data_a = [1.0, 2.0, 3.0, 4.0];
        let data_b = [5.0, 6.0, 7.0, 8.0];
        let data_all: Vec<f64> = data_a.iter().chain(data_b.iter()).copied().collect();

        let mut acc_a = WelfordAccumulator::new();
        for &x in &data_a {
            acc_a.update(x);
        }
        let mut acc_b = WelfordAccumulator::new();
        for &x in &data_b {
            acc_b.update(x);
        }
        acc_a.merge(&acc_b);

        assert!((acc_a.mean().unwrap() - mean(&data_all).unwrap()).abs() < 1e-14);
        assert!(
            (acc_a.population_variance().unwrap() - population_variance(&data_all).unwrap())
                .abs()
                < 1e-10
        );
    }

    // --- Histogram ---

    #[test]
    fn test_histogram_uniform_counts() {
        let data = [0.0, 0.5, 1.0, 1.5, 2.0];
        let h = Histogram::uniform(&data, 4).unwrap();
        assert_eq!(h.edges(), &[0.0, 0.5, 1.0, 1.5, 2.0]);
        // last bin is closed: 1.5 and 2.0 both land in it
        assert_eq!(h.counts(), &[1, 1, 1, 2]);
        assert_eq!(h.total(), 5);
    }

    #[test]
    fn test_histogram_constant_data() {
        let h = Histogram::uniform(&[3.0, 3.0, 3.0], 1).unwrap();
        assert_eq!(h.edges(), &[2.5, 3.5]);
        assert_eq!(h.counts(), &[3]);
    }

    #[test]
    fn test_histogram_rejects_bad_input() {
        assert!(Histogram::uniform(&[], 3).is_none());
        assert!(Histogram::uniform(&[1.0], 0).is_none());
        assert!(Histogram::from_edges(&[1.0], vec![1.0]).is_none());
        assert!(Histogram::from_edges(&[1.0], vec![2.0, 1.0]).is_none());
    }

    #[test]
    fn test_histogram_ignores_out_of_range() {
        let h = Histogram::from_edges(&[-1.0, 0.25, 0.75, 5.0], vec![0.0, 0.5, 1.0]).unwrap();
        assert_eq!(h.counts(), &[1, 1]);
    }

    #[test]
    fn test_histogram_density_and_centers() {
        let h = Histogram::from_edges(&[0.0, 0.0, 1.0, 3.0], vec![-0.5, 0.5, 1.5, 3.5]).unwrap();
        assert_eq!(h.bin_centers(), vec![0.0, 1.0, 2.5]);
        let d = h.density();
        assert!((d[0] - 0.5).abs() < 1e-15);
        assert!((d[1] - 0.25).abs() < 1e-15);
        assert!((d[2] - 0.125).abs() < 1e-15);
    }

    #[test]
    fn test_histogram_uniform_range() {
        let h = Histogram::uniform_range(&[0.0, 1.0, 9.0, 10.0], 2, 0.0, 10.0).unwrap();
        assert_eq!(h.edges(), &[0.0, 5.0, 10.0]);
        assert_eq!(h.counts(), &[2, 2]);
        assert!(Histogram::uniform_range(&[1.0], 0, 0.0, 1.0).is_none());
        assert!(Histogram::uniform_range(&[1.0], 2, 1.0, 1.0).is_none());
        assert!(Histogram::uniform_range(&[1.0], 2, 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_histogram_density_empty_range() {
        let h = Histogram::from_edges(&[10.0], vec![0.0, 1.0]).unwrap();
        assert_eq!(h.density(), vec![0.0]);
    }
}

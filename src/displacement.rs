//! Displacement statistics and the MSD ≈ k·N scaling law.
//!
//! Variances reported here are **population** variances (denominator `M`),
//! matching a direct mean of squared deviations over the ensemble. Use
//! [`stats::variance`](crate::stats::variance) on the raw endpoints when
//! the unbiased estimator is wanted.
//!
//! # Theory
//!
//! For a symmetric ±1 walk E[x²] = N per axis, so the mean-square
//! displacement grows linearly, MSD = d·N for `d` axes. The least-squares
//! slope through the origin,
//!
//! ```text
//! k = Σ Nᵢ·MSDᵢ / Σ Nᵢ²
//! ```
//!
//! converges to `d` as ensembles grow.

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distributions::{Normal, Rayleigh};
use crate::ensemble::{generate_ensemble_endpoints, EndpointSet};
use crate::error::{checked_count, WalkError, WalkResult};
use crate::stats::{kahan_sum_iter, mean, WelfordAccumulator};
use crate::walk::Dimensions;

/// Step counts swept by default when measuring the scaling law.
pub const DEFAULT_SWEEP_STEPS: [i64; 4] = [1000, 2000, 3000, 4000];

/// Mean and population variance of one endpoint axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisStats {
    pub mean: f64,
    pub variance: f64,
}

impl AxisStats {
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    fn from_axis(axis: &[i64]) -> WalkResult<Self> {
        let mut acc = WelfordAccumulator::new();
        for &v in axis {
            acc.update(v as f64);
        }
        match (acc.mean(), acc.population_variance()) {
            (Some(mean), Some(variance)) => Ok(Self { mean, variance }),
            _ => Err(WalkError::empty("endpoint axis statistics")),
        }
    }
}

/// Aggregate statistics over an ensemble's endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplacementStats {
    pub x: AxisStats,
    pub y: Option<AxisStats>,
    /// Mean of `x² + y²` (or `x²` in 1D) over the ensemble.
    pub msd: f64,
    /// Number of walks the statistics were computed from.
    pub count: usize,
}

/// Computes per-axis mean and population variance plus the mean-square
/// displacement of an endpoint collection.
///
/// # Errors
/// `InvalidArgument` if the y array is present and differs in length from
/// x. `EmptyInput` if the ensemble has no walks.
///
/// # Examples
/// ```
/// use u_brownian::displacement::displacement_statistics;
/// use u_brownian::ensemble::EndpointSet;
/// let ends = EndpointSet { x: vec![1, -1, 3, -3], y: Some(vec![1, 1, -1, -1]) };
/// let s = displacement_statistics(&ends).unwrap();
/// assert_eq!(s.x.mean, 0.0);
/// assert_eq!(s.x.variance, 5.0);
/// assert_eq!(s.msd, 6.0);
/// ```
pub fn displacement_statistics(endpoints: &EndpointSet) -> WalkResult<DisplacementStats> {
    if let Some(y) = &endpoints.y {
        if y.len() != endpoints.x.len() {
            return Err(WalkError::invalid(
                "endpoints",
                format!(
                    "x has {} walks but y has {}",
                    endpoints.x.len(),
                    y.len()
                ),
            ));
        }
    }
    if endpoints.is_empty() {
        return Err(WalkError::empty("displacement statistics"));
    }
    let x = AxisStats::from_axis(&endpoints.x)?;
    let y = endpoints
        .y
        .as_deref()
        .map(AxisStats::from_axis)
        .transpose()?;
    let msd = mean(&endpoints.squared_displacements())
        .ok_or_else(|| WalkError::empty("mean-square displacement"))?;
    Ok(DisplacementStats {
        x,
        y,
        msd,
        count: endpoints.len(),
    })
}

/// Least-squares slope `k` of `msd ≈ k · steps`, constrained through the
/// origin.
///
/// # Errors
/// `InvalidArgument` if the arrays are empty or differ in length, if any
/// step count is not positive, or if any MSD value is not finite.
///
/// # Examples
/// ```
/// use u_brownian::displacement::fit_scaling_coefficient;
/// let k = fit_scaling_coefficient(&[1000, 2000], &[2000.0, 4000.0]).unwrap();
/// assert!((k - 2.0).abs() < 1e-12);
/// ```
pub fn fit_scaling_coefficient(steps: &[i64], msd: &[f64]) -> WalkResult<f64> {
    if steps.is_empty() {
        return Err(WalkError::invalid("steps", "at least one point is required"));
    }
    if steps.len() != msd.len() {
        return Err(WalkError::invalid(
            "msd",
            format!(
                "length {} does not match {} step counts",
                msd.len(),
                steps.len()
            ),
        ));
    }
    if let Some(&bad) = steps.iter().find(|&&n| n <= 0) {
        return Err(WalkError::invalid(
            "steps",
            format!("step counts must be positive, got {bad}"),
        ));
    }
    if let Some(&bad) = msd.iter().find(|m| !m.is_finite()) {
        return Err(WalkError::invalid(
            "msd",
            format!("values must be finite, got {bad}"),
        ));
    }

    let numerator = kahan_sum_iter(steps.iter().zip(msd).map(|(&n, &m)| n as f64 * m));
    let denominator = kahan_sum_iter(steps.iter().map(|&n| (n as f64) * (n as f64)));
    Ok(numerator / denominator)
}

/// Mean-square displacement measured at several step counts, with the
/// fitted scaling coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsdSweep {
    pub dimensions: Dimensions,
    pub steps: Vec<i64>,
    pub msd: Vec<f64>,
    pub k: f64,
}

impl MsdSweep {
    /// Relative deviation of each measured MSD from the theoretical `d·N`.
    pub fn relative_errors(&self) -> Vec<f64> {
        let slope = self.dimensions.theoretical_msd_slope();
        self.steps
            .iter()
            .zip(&self.msd)
            .map(|(&n, &m)| {
                let expected = slope * n as f64;
                (m - expected).abs() / expected
            })
            .collect()
    }

    /// Relative deviation of the fitted `k` from the theoretical slope.
    pub fn slope_error(&self) -> f64 {
        let slope = self.dimensions.theoretical_msd_slope();
        (self.k - slope).abs() / slope
    }
}

/// Measures the MSD of a `num_walks` ensemble at each step count and fits
/// the scaling coefficient.
///
/// Step counts are processed in order with the same generator, so the
/// whole sweep is reproducible from one seed.
///
/// # Errors
/// `InvalidArgument` for negative `num_walks` or any non-positive step
/// count; `EmptyInput` when `num_walks` is zero.
pub fn msd_sweep<R: Rng>(
    step_counts: &[i64],
    num_walks: i64,
    dimensions: Dimensions,
    rng: &mut R,
) -> WalkResult<MsdSweep> {
    checked_count("num_walks", num_walks)?;
    debug!(
        "msd sweep over {} step counts, {num_walks} walks each",
        step_counts.len()
    );

    let mut msd = Vec::with_capacity(step_counts.len());
    for &n in step_counts {
        if n <= 0 {
            return Err(WalkError::invalid(
                "steps",
                format!("step counts must be positive, got {n}"),
            ));
        }
        let endpoints = generate_ensemble_endpoints(n, num_walks, dimensions, rng)?;
        let stats = displacement_statistics(&endpoints)?;
        trace!("N = {n}: msd = {:.3}", stats.msd);
        msd.push(stats.msd);
    }

    let k = fit_scaling_coefficient(step_counts, &msd)?;
    debug!("fitted msd slope k = {k:.4}");
    Ok(MsdSweep {
        dimensions,
        steps: step_counts.to_vec(),
        msd,
        k,
    })
}

/// Limiting distribution N(0, √N) of one endpoint axis after `num_steps`.
///
/// # Errors
/// `InvalidArgument` unless `num_steps > 0`.
pub fn theoretical_axis_distribution(num_steps: i64) -> WalkResult<Normal> {
    let n = positive_steps(num_steps)?;
    Normal::new(0.0, n.sqrt())
}

/// Limiting distribution Rayleigh(√N) of the 2D radial displacement after
/// `num_steps`.
///
/// # Errors
/// `InvalidArgument` unless `num_steps > 0`.
pub fn theoretical_radial_distribution(num_steps: i64) -> WalkResult<Rayleigh> {
    let n = positive_steps(num_steps)?;
    Rayleigh::new(n.sqrt())
}

fn positive_steps(num_steps: i64) -> WalkResult<f64> {
    if num_steps <= 0 {
        return Err(WalkError::invalid(
            "num_steps",
            format!("must be positive, got {num_steps}"),
        ));
    }
    Ok(num_steps as f64)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_statistics_known_values() {
        let ends = EndpointSet {
            x: vec![2, 4, 4, 4, 5, 5, 7, 9],
            y: None,
        };
        let s = displacement_statistics(&ends).unwrap();
        assert!((s.x.mean - 5.0).abs() < 1e-15);
        // population variance, not the n − 1 value 4.571
        assert!((s.x.variance - 4.0).abs() < 1e-12);
        assert!((s.x.std_dev() - 2.0).abs() < 1e-12);
        assert!(s.y.is_none());
        assert!((s.msd - 29.0).abs() < 1e-12);
        assert_eq!(s.count, 8);
    }

    #[test]
    fn test_statistics_single_walk() {
        let ends = EndpointSet {
            x: vec![3],
            y: Some(vec![-4]),
        };
        let s = displacement_statistics(&ends).unwrap();
        assert_eq!(s.x.variance, 0.0);
        assert_eq!(s.y.unwrap().mean, -4.0);
        assert_eq!(s.msd, 25.0);
    }

    #[test]
    fn test_statistics_empty() {
        let ends = EndpointSet {
            x: vec![],
            y: Some(vec![]),
        };
        let err = displacement_statistics(&ends).unwrap_err();
        assert!(matches!(err, WalkError::EmptyInput { .. }));
    }

    #[test]
    fn test_statistics_axis_length_mismatch() {
        let ends = EndpointSet {
            x: vec![3, 3, 3],
            y: Some(vec![0]),
        };
        let err = displacement_statistics(&ends).unwrap_err();
        assert!(matches!(
            err,
            WalkError::InvalidArgument { name: "endpoints", .. }
        ));

        let ends = EndpointSet {
            x: vec![],
            y: Some(vec![1]),
        };
        assert!(matches!(
            displacement_statistics(&ends),
            Err(WalkError::InvalidArgument { name: "endpoints", .. })
        ));
    }

    #[test]
    fn test_msd_within_twenty_percent() {
        let mut rng = create_rng(42);
        let ends = generate_ensemble_endpoints(1000, 1000, Dimensions::Two, &mut rng).unwrap();
        let s = displacement_statistics(&ends).unwrap();
        let rel = (s.msd - 2000.0).abs() / 2000.0;
        assert!(rel < 0.2, "msd = {}, relative error {rel}", s.msd);
        // per-axis variance ≈ N
        let vx = s.x.variance;
        assert!((vx - 1000.0).abs() < 200.0, "x variance {vx}");
    }

    #[test]
    fn test_fit_exact_line() {
        let steps = [1, 2, 3, 4];
        let msd = [2.0, 4.0, 6.0, 8.0];
        assert!((fit_scaling_coefficient(&steps, &msd).unwrap() - 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_fit_least_squares() {
        // k = (1·1 + 2·5) / (1 + 4) = 11/5
        let k = fit_scaling_coefficient(&[1, 2], &[1.0, 5.0]).unwrap();
        assert!((k - 2.2).abs() < 1e-14);
    }

    #[test]
    fn test_fit_invalid_inputs() {
        assert!(fit_scaling_coefficient(&[], &[]).is_err());
        assert!(fit_scaling_coefficient(&[1, 2], &[1.0]).is_err());
        assert!(fit_scaling_coefficient(&[0, 2], &[1.0, 2.0]).is_err());
        assert!(fit_scaling_coefficient(&[-1, 2], &[1.0, 2.0]).is_err());
        assert!(fit_scaling_coefficient(&[1, 2], &[1.0, f64::NAN]).is_err());
        let err = fit_scaling_coefficient(&[1, 2], &[1.0]).unwrap_err();
        assert!(matches!(err, WalkError::InvalidArgument { name: "msd", .. }));
    }

    #[test]
    fn test_sweep_converges_to_two() {
        let mut rng = create_rng(42);
        let sweep = msd_sweep(&DEFAULT_SWEEP_STEPS, 1000, Dimensions::Two, &mut rng).unwrap();
        assert_eq!(sweep.steps.len(), 4);
        assert_eq!(sweep.msd.len(), 4);
        assert!(sweep.msd.iter().all(|&m| m > 0.0));
        assert!(sweep.k > 1.5 && sweep.k < 2.5, "k = {}", sweep.k);
        assert!(sweep.slope_error() < 0.25);
        assert!(sweep.relative_errors().iter().all(|&e| e < 0.2));
    }

    #[test]
    fn test_sweep_one_dimension() {
        let mut rng = create_rng(3);
        let sweep = msd_sweep(&[100, 200, 400], 2000, Dimensions::One, &mut rng).unwrap();
        assert!((sweep.k - 1.0).abs() < 0.15, "k = {}", sweep.k);
    }

    #[test]
    fn test_sweep_invalid() {
        let mut rng = create_rng(0);
        assert!(msd_sweep(&[100, 0], 10, Dimensions::Two, &mut rng).is_err());
        assert!(msd_sweep(&[100], -5, Dimensions::Two, &mut rng).is_err());
        let err = msd_sweep(&[100], 0, Dimensions::Two, &mut rng).unwrap_err();
        assert!(matches!(err, WalkError::EmptyInput { .. }));
        assert!(msd_sweep(&[], 10, Dimensions::Two, &mut rng).is_err());
    }

    #[test]
    fn test_sweep_deterministic() {
        let a = msd_sweep(&[50, 100], 200, Dimensions::Two, &mut create_rng(11)).unwrap();
        let b = msd_sweep(&[50, 100], 200, Dimensions::Two, &mut create_rng(11)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_theoretical_distributions() {
        let axis = theoretical_axis_distribution(1000).unwrap();
        assert!((axis.variance() - 1000.0).abs() < 1e-9);
        let radial = theoretical_radial_distribution(1000).unwrap();
        assert!((radial.mean_square() - 2000.0).abs() < 1e-9);
        assert!(theoretical_axis_distribution(0).is_err());
        assert!(theoretical_radial_distribution(-3).is_err());
    }
}

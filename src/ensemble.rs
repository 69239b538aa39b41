//! Ensembles of independent walks reduced to their endpoints.
//!
//! Only the final position of each walk is kept, so an ensemble of `M`
//! walks of `N` steps costs O(M) memory regardless of `N`.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{checked_count, WalkResult};
use crate::random::step_sum;
use crate::stats::Histogram;
use crate::walk::Dimensions;

/// Final positions of every walk in an ensemble, one array per axis.
///
/// Both arrays have the same length (the number of walks); `y` is `None`
/// for one-dimensional walks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSet {
    /// Final x coordinate of each walk.
    pub x: Vec<i64>,
    /// Final y coordinate of each walk, `None` in 1D.
    pub y: Option<Vec<i64>>,
}

impl EndpointSet {
    /// Number of walks.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when the ensemble has no walks.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `Two` when a y axis is present.
    pub fn dimensions(&self) -> Dimensions {
        if self.y.is_some() {
            Dimensions::Two
        } else {
            Dimensions::One
        }
    }

    /// Squared displacement `x² + y²` (or `x²` in 1D) per walk.
    pub fn squared_displacements(&self) -> Vec<f64> {
        match &self.y {
            Some(y) => self
                .x
                .iter()
                .zip(y)
                .map(|(&x, &y)| (x * x + y * y) as f64)
                .collect(),
            None => self.x.iter().map(|&x| (x * x) as f64).collect(),
        }
    }

    /// Radial displacement `sqrt(x² + y²)` (or `|x|` in 1D) per walk.
    pub fn radial_displacements(&self) -> Vec<f64> {
        self.squared_displacements()
            .into_iter()
            .map(f64::sqrt)
            .collect()
    }

    /// Density histogram of the radial displacements.
    ///
    /// `None` for an empty ensemble or `bins == 0`.
    pub fn radial_histogram(&self, bins: usize) -> Option<Histogram> {
        Histogram::uniform(&self.radial_displacements(), bins)
    }

    /// Density histogram of the squared displacements.
    pub fn squared_histogram(&self, bins: usize) -> Option<Histogram> {
        Histogram::uniform(&self.squared_displacements(), bins)
    }
}

/// Runs `num_walks` independent walks of `num_steps` steps and keeps only
/// their final positions.
///
/// Walk `i` draws its x sum, then its y sum, before walk `i + 1` starts,
/// so every walk and every axis consumes a disjoint stretch of the
/// generator's output.
///
/// # Errors
/// `InvalidArgument` if either count is negative. Zero walks yields empty
/// arrays; zero steps yields all-zero endpoints.
///
/// # Complexity
/// Time: O(M · N / 64 · d), Space: O(M · d)
///
/// # Examples
/// ```
/// use u_brownian::ensemble::generate_ensemble_endpoints;
/// use u_brownian::random::create_rng;
/// use u_brownian::walk::Dimensions;
/// let mut rng = create_rng(42);
/// let ends = generate_ensemble_endpoints(1000, 100, Dimensions::Two, &mut rng).unwrap();
/// assert_eq!(ends.len(), 100);
/// assert!(ends.x.iter().all(|x| x.abs() <= 1000));
/// ```
pub fn generate_ensemble_endpoints<R: Rng>(
    num_steps: i64,
    num_walks: i64,
    dimensions: Dimensions,
    rng: &mut R,
) -> WalkResult<EndpointSet> {
    let n = checked_count("num_steps", num_steps)?;
    let m = checked_count("num_walks", num_walks)?;
    debug!(
        "generating {m} endpoints of {n}-step walks in {} dimension(s)",
        dimensions.count()
    );

    let mut x = Vec::with_capacity(m);
    let mut y = match dimensions {
        Dimensions::One => None,
        Dimensions::Two => Some(Vec::with_capacity(m)),
    };
    for _ in 0..m {
        x.push(step_sum(n, rng));
        if let Some(y) = y.as_mut() {
            y.push(step_sum(n, rng));
        }
    }
    Ok(EndpointSet { x, y })
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn endpoints_have_requested_length(
            seed in 0_u64..10000,
            n in 0_i64..200,
            m in 0_i64..100,
        ) {
            let mut rng = create_rng(seed);
            let ends = generate_ensemble_endpoints(n, m, Dimensions::Two, &mut rng).unwrap();
            prop_assert_eq!(ends.x.len(), m as usize);
            prop_assert_eq!(ends.y.as_ref().map(Vec::len), Some(m as usize));
        }

        #[test]
        fn endpoints_bounded_with_parity(
            seed in 0_u64..10000,
            n in 0_i64..200,
        ) {
            let mut rng = create_rng(seed);
            let ends = generate_ensemble_endpoints(n, 20, Dimensions::Two, &mut rng).unwrap();
            for &v in ends.x.iter().chain(ends.y.as_ref().unwrap()) {
                prop_assert!(v.abs() <= n);
                prop_assert_eq!(v.rem_euclid(2), n % 2);
            }
        }
    }
}

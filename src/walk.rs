//! Single random-walk trajectories on the integer lattice.
//!
//! A walk of `N` steps draws `N` independent ±1 steps per axis and
//! accumulates them. The returned trajectory starts at the position after
//! the first step; the origin is implicit.
//!
//! # Invariants
//!
//! - Every step-to-step delta is exactly ±1.
//! - Each axis has length `N`.
//! - The final coordinate has the same parity as `N` and `|x_N| ≤ N`.
//! - Axes never share a draw: all x steps are drawn before any y step.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{checked_count, WalkError, WalkResult};
use crate::random::unit_step;

/// Number of independent lattice axes in a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dimensions {
    /// Walk along a line.
    One,
    /// Walk on the square lattice, x and y independent.
    Two,
}

impl Dimensions {
    /// Number of axes, 1 or 2.
    pub fn count(self) -> usize {
        match self {
            Dimensions::One => 1,
            Dimensions::Two => 2,
        }
    }

    /// Slope `k` of the theoretical law MSD = k·N.
    ///
    /// Each ±1 axis contributes E[x²] = N, so `k` equals the number of axes.
    pub fn theoretical_msd_slope(self) -> f64 {
        self.count() as f64
    }
}

impl TryFrom<u8> for Dimensions {
    type Error = WalkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Dimensions::One),
            2 => Ok(Dimensions::Two),
            other => Err(WalkError::invalid(
                "dimensions",
                format!("must be 1 or 2, got {other}"),
            )),
        }
    }
}

impl From<Dimensions> for u8 {
    fn from(d: Dimensions) -> Self {
        d.count() as u8
    }
}

/// Cumulative lattice positions of one walk.
///
/// `y` is `None` for a one-dimensional walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trajectory {
    /// x coordinate after each step.
    pub x: Vec<i64>,
    /// y coordinate after each step, `None` in 1D.
    pub y: Option<Vec<i64>>,
}

impl Trajectory {
    /// Number of recorded positions, equal to the number of steps.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True for a zero-step walk.
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

    /// Final position `(x, y)`; the origin for a zero-step walk.
    ///
    /// `y` is `None` for a one-dimensional walk.
    pub fn endpoint(&self) -> (i64, Option<i64>) {
        let last = |axis: &[i64]| axis.last().copied().unwrap_or(0);
        (last(self.x.as_slice()), self.y.as_deref().map(last))
    }

    /// Positions as `(x, y)` pairs, with `y = 0` for a one-dimensional walk.
    pub fn points(&self) -> Vec<(i64, i64)> {
        match &self.y {
            Some(y) => self.x.iter().copied().zip(y.iter().copied()).collect(),
            None => self.x.iter().map(|&x| (x, 0)).collect(),
        }
    }
}

/// Generates one random walk of `num_steps` unit steps per axis.
///
/// # Errors
/// `InvalidArgument` if `num_steps` is negative. Zero steps is valid and
/// yields empty axes.
///
/// # Complexity
/// Time: O(N · d), Space: O(N · d)
///
/// # Examples
/// ```
/// use u_brownian::random::create_rng;
/// use u_brownian::walk::{generate_walk, Dimensions};
/// let mut rng = create_rng(42);
/// let path = generate_walk(1000, Dimensions::Two, &mut rng).unwrap();
/// assert_eq!(path.len(), 1000);
/// assert!(path.x.windows(2).all(|w| (w[1] - w[0]).abs() == 1));
/// ```
pub fn generate_walk<R: Rng>(
    num_steps: i64,
    dimensions: Dimensions,
    rng: &mut R,
) -> WalkResult<Trajectory> {
    let n = checked_count("num_steps", num_steps)?;
    let x = cumulative_axis(n, rng);
    let y = match dimensions {
        Dimensions::One => None,
        Dimensions::Two => Some(cumulative_axis(n, rng)),
    };
    Ok(Trajectory { x, y })
}

fn cumulative_axis<R: Rng>(n: usize, rng: &mut R) -> Vec<i64> {
    let mut position = 0_i64;
    (0..n)
        .map(|_| {
            position += unit_step(rng);
            position
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

//! Reference probability distributions.
//!
//! Theoretical curves that simulated random-walk and coin-flip output is
//! compared against, with analytical moments and PDF/PMF/CDF evaluation.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Mean | Variance | Used for |
//! |---|---|---|---|---|
//! | [`Normal`] | μ, σ | μ | σ² | one endpoint axis, N(0, N) |
//! | [`Rayleigh`] | σ | σ√(π/2) | (4−π)σ²/2 | 2D radial displacement |
//! | [`Geometric`] | p | (1−p)/p | (1−p)/p² | tails between heads |
//! | [`Exponential`] | λ | 1/λ | 1/λ² | continuous waiting time |
//! | [`Poisson`] | λ | λ | λ | heads per fixed-length experiment |

use crate::error::{checked_probability, WalkError, WalkResult};
use crate::special;

fn require_positive(name: &'static str, value: f64) -> WalkResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(WalkError::invalid(
            name,
            format!("must be finite and > 0, got {value}"),
        ))
    }
}

// ============================================================================
// Normal Distribution
// ============================================================================

/// Normal (Gaussian) distribution N(μ, σ²).
///
/// # Mathematical Definition
/// - PDF: φ(x) = (1/(σ√(2π))) exp(−(x−μ)²/(2σ²))
/// - CDF: Φ((x−μ)/σ) (via standard normal CDF)
/// - Mean: μ
/// - Variance: σ²
///
/// By the central limit theorem an N-step ±1 walk axis approaches
/// N(0, N).
#[derive(Debug, Clone, PartialEq)]
pub struct Normal {
    mu: f64,
    sigma: f64,
}

impl Normal {
    /// Creates a new normal distribution N(μ, σ).
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `sigma ≤ 0` or parameters are not finite.
    pub fn new(mu: f64, sigma: f64) -> WalkResult<Self> {
        if !mu.is_finite() {
            return Err(WalkError::invalid("mu", format!("must be finite, got {mu}")));
        }
        let sigma = require_positive("sigma", sigma)?;
        Ok(Self { mu, sigma })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn mean(&self) -> f64 {
        self.mu
    }

    pub fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }

    /// PDF: (1/(σ√(2π))) exp(−(x−μ)²/(2σ²)).
    pub fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.mu) / self.sigma;
        special::standard_normal_pdf(z) / self.sigma
    }

    /// CDF: Φ((x−μ)/σ).
    pub fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.mu) / self.sigma;
        special::standard_normal_cdf(z)
    }
}

// ============================================================================
// Rayleigh Distribution
// ============================================================================

/// Rayleigh distribution, the length of a 2D vector with independent
/// N(0, σ²) components.
///
/// # Mathematical Definition
/// - PDF: (r/σ²) exp(−r²/(2σ²)) for r ≥ 0
/// - CDF: 1 − exp(−r²/(2σ²))
/// - Mean: σ√(π/2)
/// - Variance: (4 − π)σ²/2
/// - E[r²]: 2σ²
#[derive(Debug, Clone, PartialEq)]
pub struct Rayleigh {
    sigma: f64,
}

impl Rayleigh {
    /// # Errors
    /// Returns `InvalidArgument` unless `sigma` is finite and positive.
    pub fn new(sigma: f64) -> WalkResult<Self> {
        Ok(Self {
            sigma: require_positive("sigma", sigma)?,
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn mean(&self) -> f64 {
        self.sigma * (std::f64::consts::PI / 2.0).sqrt()
    }

    pub fn variance(&self) -> f64 {
        (4.0 - std::f64::consts::PI) * self.sigma * self.sigma / 2.0
    }

    /// Second raw moment E[r²] = 2σ², the 2D mean-square displacement.
    pub fn mean_square(&self) -> f64 {
        2.0 * self.sigma * self.sigma
    }

    pub fn pdf(&self, r: f64) -> f64 {
        if r < 0.0 {
            return 0.0;
        }
        let s2 = self.sigma * self.sigma;
        r / s2 * (-r * r / (2.0 * s2)).exp()
    }

    pub fn cdf(&self, r: f64) -> f64 {
        if r <= 0.0 {
            return 0.0;
        }
        -(-r * r / (2.0 * self.sigma * self.sigma)).exp_m1()
    }
}

// ============================================================================
// Geometric Distribution
// ============================================================================

/// Geometric distribution counting failures before the first success.
///
/// Support is `{0, 1, 2, …}`, which matches the number of tails between
/// two consecutive heads of a coin with head probability `p`.
///
/// # Mathematical Definition
/// - PMF: (1−p)ᵏ p
/// - CDF: 1 − (1−p)ᵏ⁺¹
/// - Mean: (1−p)/p
/// - Variance: (1−p)/p²
#[derive(Debug, Clone, PartialEq)]
pub struct Geometric {
    p: f64,
}

impl Geometric {
    /// # Errors
    /// Returns `InvalidArgument` unless `0 < p ≤ 1`.
    pub fn new(p: f64) -> WalkResult<Self> {
        let p = checked_probability("p", p)?;
        if p == 0.0 {
            return Err(WalkError::invalid("p", "must be > 0 for a geometric law"));
        }
        Ok(Self { p })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn mean(&self) -> f64 {
        (1.0 - self.p) / self.p
    }

    pub fn variance(&self) -> f64 {
        (1.0 - self.p) / (self.p * self.p)
    }

    pub fn pmf(&self, k: u64) -> f64 {
        (1.0 - self.p).powf(k as f64) * self.p
    }

    pub fn cdf(&self, k: u64) -> f64 {
        1.0 - (1.0 - self.p).powf(k as f64 + 1.0)
    }
}

// ============================================================================
// Exponential Distribution
// ============================================================================

/// Exponential distribution with rate λ, the continuous-time limit of
/// geometric waiting.
///
/// # Mathematical Definition
/// - PDF: λ exp(−λx) for x ≥ 0
/// - CDF: 1 − exp(−λx)
/// - Mean: 1/λ
/// - Variance: 1/λ²
#[derive(Debug, Clone, PartialEq)]
pub struct Exponential {
    rate: f64,
}

impl Exponential {
    /// # Errors
    /// Returns `InvalidArgument` unless `rate` is finite and positive.
    pub fn new(rate: f64) -> WalkResult<Self> {
        Ok(Self {
            rate: require_positive("rate", rate)?,
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn mean(&self) -> f64 {
        1.0 / self.rate
    }

    pub fn variance(&self) -> f64 {
        1.0 / (self.rate * self.rate)
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            self.rate * (-self.rate * x).exp()
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            -(-self.rate * x).exp_m1()
        }
    }
}

// ============================================================================
// Poisson Distribution
// ============================================================================

/// Poisson distribution with mean λ.
///
/// The number of heads in `n` flips of a coin with small head probability
/// `p` is approximately Poisson with λ = n·p.
///
/// # Mathematical Definition
/// - PMF: λˡ e^(−λ) / l!
/// - Mean: λ
/// - Variance: λ
///
/// The PMF is evaluated in log space, `exp(l ln λ − λ − ln l!)`, so large
/// `l` does not overflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Poisson {
    lambda: f64,
}

impl Poisson {
    /// # Errors
    /// Returns `InvalidArgument` unless `lambda` is finite and positive.
    pub fn new(lambda: f64) -> WalkResult<Self> {
        Ok(Self {
            lambda: require_positive("lambda", lambda)?,
        })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn mean(&self) -> f64 {
        self.lambda
    }

    pub fn variance(&self) -> f64 {
        self.lambda
    }

    pub fn pmf(&self, l: u64) -> f64 {
        (l as f64 * self.lambda.ln() - self.lambda - special::ln_factorial(l)).exp()
    }

    /// PMF evaluated at `0, 1, …, max_l − 1`.
    ///
    /// # Examples
    /// ```
    /// use u_brownian::distributions::Poisson;
    /// let table = Poisson::new(8.0).unwrap().pmf_table(20);
    /// assert_eq!(table.len(), 20);
    /// let total: f64 = table.iter().sum();
    /// assert!((total - 1.0).abs() < 1e-2);
    /// ```
    pub fn pmf_table(&self, max_l: u64) -> Vec<f64> {
        (0..max_l).map(|l| self.pmf(l)).collect()
    }

    pub fn cdf(&self, l: u64) -> f64 {
        (0..=l).map(|k| self.pmf(k)).sum::<f64>().min(1.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

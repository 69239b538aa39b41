//! # u-brownian
//!
//! Discrete random walks and the statistics of Brownian-like motion.
//!
//! This crate generates ±1 lattice walks in one or two dimensions, reduces
//! ensembles of walks to their endpoints, and measures how the
//! mean-square displacement scales with the number of steps. A sibling
//! Bernoulli core covers coin-flip waiting times and head counts.
//! Results are plain numbers and vectors inside serialisable records, so
//! any plotting library can consume them.
//!
//! ## Modules
//!
//! - [`walk`] — single trajectories (`generate_walk`)
//! - [`ensemble`] — endpoint ensembles (`generate_ensemble_endpoints`)
//! - [`displacement`] — displacement statistics and the MSD ≈ k·N fit
//! - [`waiting`] — coin sequences, waiting times, head-count experiments
//! - [`distributions`] — reference laws for overlaying simulation output
//! - [`stats`] — descriptive statistics and histograms
//! - [`special`] — normal CDF/PDF and ln Γ
//! - [`random`] — seeded generators and elementary draws
//! - [`config`] — YAML experiment configuration and runner
//! - [`error`] — [`WalkError`] and [`WalkResult`]
//!
//! ## Design Philosophy
//!
//! - **Explicit randomness**: every generator is passed in by the caller;
//!   the same seed always reproduces the same output
//! - **Eager validation**: negative counts are rejected, while zero walks
//!   or zero steps are valid degenerate inputs
//! - **Numerical stability**: Welford's algorithm for variance,
//!   Kahan summation for accumulation
//! - **Property-based testing**: walk invariants verified via proptest
//!
//! ## Example
//!
//! ```
//! use u_brownian::displacement::{displacement_statistics, msd_sweep};
//! use u_brownian::ensemble::generate_ensemble_endpoints;
//! use u_brownian::random::create_rng;
//! use u_brownian::walk::Dimensions;
//!
//! let mut rng = create_rng(42);
//! let ends = generate_ensemble_endpoints(1000, 500, Dimensions::Two, &mut rng).unwrap();
//! let stats = displacement_statistics(&ends).unwrap();
//! assert!((stats.msd - 2000.0).abs() < 400.0);
//!
//! let sweep = msd_sweep(&[100, 200, 300], 500, Dimensions::Two, &mut rng).unwrap();
//! assert!(sweep.k > 1.5 && sweep.k < 2.5);
//! ```

pub mod config;
pub mod displacement;
pub mod distributions;
pub mod ensemble;
pub mod error;
pub mod random;
pub mod special;
pub mod stats;
pub mod waiting;
pub mod walk;

pub use error::{WalkError, WalkResult};

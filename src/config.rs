//! Experiment configuration and the top-level experiment runner.
//!
//! An [`ExperimentConfig`] is plain data, loadable from YAML with every
//! field optional. [`ExperimentConfig::run`] is the outermost entry point:
//! it is the only place a generator is created, seeded from `seed` when
//! one is configured and from OS entropy otherwise.
//!
//! ```yaml
//! num_steps: 1000
//! num_walks: 1000
//! dimensions: 2
//! seed: 42
//! sweep_steps: [1000, 2000, 3000, 4000]
//! coin:
//!   p_head: 0.08
//!   n_flips: 1000
//! ```

use log::{debug, warn};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::displacement::{
    displacement_statistics, msd_sweep, DisplacementStats, MsdSweep, DEFAULT_SWEEP_STEPS,
};
use crate::ensemble::{generate_ensemble_endpoints, EndpointSet};
use crate::error::{checked_count, checked_probability, WalkError, WalkResult};
use crate::random::{create_rng, entropy_rng};
use crate::stats::Histogram;
use crate::waiting::{
    analyze_waiting_times, coin_sequence, head_count_statistics, head_counts,
    waiting_time_histogram, waiting_times, HeadCountStats, WaitingTimeStats,
    DEFAULT_HEAD_PROBABILITY,
};
use crate::walk::{generate_walk, Dimensions, Trajectory};

/// Parameters of the coin-flip experiments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinConfig {
    pub p_head: f64,
    /// Length of the sequence used for waiting times.
    pub n_flips: i64,
    /// Number of fixed-length head-count experiments.
    pub n_experiments: i64,
    pub flips_per_experiment: i64,
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self {
            p_head: DEFAULT_HEAD_PROBABILITY,
            n_flips: 1000,
            n_experiments: 10_000,
            flips_per_experiment: 100,
        }
    }
}

/// Parameters of a full random-walk and coin-flip experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub num_steps: i64,
    pub num_walks: i64,
    pub dimensions: Dimensions,
    pub seed: Option<u64>,
    pub sweep_steps: Vec<i64>,
    pub histogram_bins: usize,
    pub coin: CoinConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            num_steps: 1000,
            num_walks: 1000,
            dimensions: Dimensions::Two,
            seed: Some(42),
            sweep_steps: DEFAULT_SWEEP_STEPS.to_vec(),
            histogram_bins: 30,
            coin: CoinConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Parses and validates a YAML configuration. Missing fields take
    /// their default values.
    ///
    /// # Errors
    /// `Config` for malformed YAML (including `dimensions` other than 1
    /// or 2); `InvalidArgument` for values rejected by [`validate`](Self::validate).
    ///
    /// # Examples
    /// ```
    /// use u_brownian::config::ExperimentConfig;
    /// let cfg = ExperimentConfig::from_yaml_str("num_steps: 50\nseed: 7\n").unwrap();
    /// assert_eq!(cfg.num_steps, 50);
    /// assert_eq!(cfg.num_walks, 1000);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> WalkResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        debug!("loaded experiment configuration: {config:?}");
        Ok(config)
    }

    /// Serialises the configuration back to YAML.
    pub fn to_yaml_string(&self) -> WalkResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks every parameter eagerly.
    ///
    /// # Errors
    /// `InvalidArgument` naming the first offending field.
    pub fn validate(&self) -> WalkResult<()> {
        checked_count("num_steps", self.num_steps)?;
        checked_count("num_walks", self.num_walks)?;
        if let Some(&bad) = self.sweep_steps.iter().find(|&&n| n <= 0) {
            return Err(WalkError::invalid(
                "sweep_steps",
                format!("step counts must be positive, got {bad}"),
            ));
        }
        if self.histogram_bins == 0 {
            return Err(WalkError::invalid("histogram_bins", "must be at least 1"));
        }
        checked_probability("p_head", self.coin.p_head)?;
        checked_count("n_flips", self.coin.n_flips)?;
        checked_count("n_experiments", self.coin.n_experiments)?;
        checked_count("flips_per_experiment", self.coin.flips_per_experiment)?;
        Ok(())
    }

    /// The generator for this experiment: seeded when `seed` is set,
    /// OS-seeded otherwise.
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => create_rng(seed),
            None => entropy_rng(),
        }
    }

    /// Runs every experiment described by the configuration with one
    /// generator, in a fixed order: trajectory, endpoint ensemble, MSD
    /// sweep, coin sequence, head counts.
    ///
    /// Statistics over empty collections (zero walks, fewer than two
    /// heads) are reported as `None` rather than failing the run.
    ///
    /// # Errors
    /// `InvalidArgument` if the configuration does not validate.
    pub fn run(&self) -> WalkResult<ExperimentReport> {
        self.validate()?;
        let mut rng = self.rng();
        debug!(
            "running experiment: {} walks of {} steps, seed {:?}",
            self.num_walks, self.num_steps, self.seed
        );

        let trajectory = generate_walk(self.num_steps, self.dimensions, &mut rng)?;
        let endpoints = generate_ensemble_endpoints(
            self.num_steps,
            self.num_walks,
            self.dimensions,
            &mut rng,
        )?;
        let (statistics, radial_histogram) = if endpoints.is_empty() {
            (None, None)
        } else {
            (
                Some(displacement_statistics(&endpoints)?),
                endpoints.radial_histogram(self.histogram_bins),
            )
        };

        let sweep = if self.num_walks > 0 && !self.sweep_steps.is_empty() {
            Some(msd_sweep(
                &self.sweep_steps,
                self.num_walks,
                self.dimensions,
                &mut rng,
            )?)
        } else {
            None
        };

        let sequence = coin_sequence(self.coin.n_flips, self.coin.p_head, &mut rng)?;
        let waits = waiting_times(&sequence);
        let waiting = if waits.is_empty() {
            warn!(
                "no waiting times observed in {} flips with p = {}",
                self.coin.n_flips, self.coin.p_head
            );
            None
        } else {
            Some(analyze_waiting_times(&waits, self.coin.p_head)?)
        };
        let waiting_histogram = waiting_time_histogram(&waits);

        let counts = head_counts(
            self.coin.n_experiments,
            self.coin.flips_per_experiment,
            self.coin.p_head,
            &mut rng,
        )?;
        let head_count_stats = if counts.is_empty() {
            None
        } else {
            Some(head_count_statistics(
                &counts,
                self.coin.flips_per_experiment,
                self.coin.p_head,
            )?)
        };

        Ok(ExperimentReport {
            config: self.clone(),
            trajectory,
            endpoints,
            statistics,
            radial_histogram,
            sweep,
            waiting,
            waiting_histogram,
            head_counts: counts,
            head_count_stats,
        })
    }
}

/// Everything an experiment run produced, as plain serialisable data for
/// a plotting or reporting collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub config: ExperimentConfig,
    pub trajectory: Trajectory,
    pub endpoints: EndpointSet,
    pub statistics: Option<DisplacementStats>,
    pub radial_histogram: Option<Histogram>,
    pub sweep: Option<MsdSweep>,
    pub waiting: Option<WaitingTimeStats>,
    pub waiting_histogram: Option<Histogram>,
    pub head_counts: Vec<u64>,
    pub head_count_stats: Option<HeadCountStats>,
}

impl ExperimentReport {
    pub fn to_yaml_string(&self) -> WalkResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

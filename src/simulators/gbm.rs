// src/simulators/gbm.rs
//! Geometric Brownian Motion path simulation
//!
//! # Mathematical Framework
//!
//! Under the risk-neutral measure the asset follows:
//! ```text
//! dS_t = (r - δ) S_t dt + σ S_t dW_t
//! ```
//!
//! Each step applies the log-Euler update, exact for constant coefficients:
//! ```text
//! S_t = S_{t-1} * exp((r - δ - σ²/2)·dt + σ·√dt·z)
//! ```
//!
//! The per-step volatility may be overridden with a vector (one σ per step),
//! in which case the update uses σ_t and remains exact piecewise.
//!
//! # Sampling
//!
//! `SamplingScheme::QuasiRandom` (the default) draws a scrambled Sobol point
//! set of dimension `time_steps` and maps it through the distribution's
//! quantile function. `SamplingScheme::PseudoRandom` draws plain i.i.d.
//! samples instead; both schemes must agree statistically, which is one of
//! the crate's integration tests.

use super::{resolve_seed, PathEnsemble, PathSimulator, SimulationConfig};
use crate::distributions::{Distribution, NormalDistribution};
use crate::error::{validation::*, PricingResult};
use crate::qmc;
use ndarray::{Array2, Zip};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// How the underlying uniforms are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplingScheme {
    /// Scrambled Sobol uniforms mapped through the quantile function
    QuasiRandom,
    /// Plain i.i.d. draws from the distribution's sampler
    PseudoRandom,
}

/// Geometric Brownian Motion simulator.
pub struct GbmSimulator<D: Distribution = NormalDistribution> {
    distribution: D,
    sampling: SamplingScheme,
}

impl GbmSimulator<NormalDistribution> {
    /// Standard-normal shocks, quasi-random sampling.
    pub fn new() -> Self {
        GbmSimulator {
            distribution: NormalDistribution::standard(),
            sampling: SamplingScheme::QuasiRandom,
        }
    }
}

impl Default for GbmSimulator<NormalDistribution> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Distribution> GbmSimulator<D> {
    /// Use a custom shock distribution (e.g. Student-t for heavier tails).
    pub fn with_distribution(distribution: D) -> Self {
        GbmSimulator {
            distribution,
            sampling: SamplingScheme::QuasiRandom,
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingScheme) -> Self {
        self.sampling = sampling;
        self
    }
}

impl<D: Distribution> PathSimulator for GbmSimulator<D> {
    fn simulate(&self, config: &SimulationConfig) -> PricingResult<PathEnsemble> {
        config.validate()?;
        if config.step_volatility.is_none() {
            validate_positive("volatility", config.volatility)?;
        }

        let steps = config.time_steps;
        let paths = config.paths;
        let dt = config.maturity / steps as f64;
        let sqrt_dt = dt.sqrt();
        let seed = resolve_seed(config);

        // One shock per path per step, regardless of sampling scheme
        let shocks = match self.sampling {
            SamplingScheme::QuasiRandom => {
                let uniforms = qmc::sample_matrix(steps, paths, seed)?;
                self.distribution.ppf_matrix(&uniforms)
            }
            SamplingScheme::PseudoRandom => {
                let mut rng = StdRng::seed_from_u64(seed);
                let draws = self.distribution.sample(paths * steps, &mut rng);
                Array2::from_shape_vec((paths, steps), draws)
                    .expect("sampler returned paths * steps draws")
            }
        };

        let sigmas: Vec<f64> = match &config.step_volatility {
            Some(vols) => vols.clone(),
            None => vec![config.volatility; steps],
        };

        let s0 = config.initial_price;
        let drift = config.rate - config.dividend_yield;

        let mut prices = Array2::zeros((paths, steps + 1));
        Zip::from(prices.rows_mut())
            .and(shocks.rows())
            .par_for_each(|mut path, z| {
                path[0] = s0;
                for t in 1..=steps {
                    let sigma = sigmas[t - 1];
                    path[t] = path[t - 1]
                        * ((drift - 0.5 * sigma * sigma) * dt + sigma * sqrt_dt * z[t - 1]).exp();
                }
            });

        Ok(PathEnsemble {
            prices,
            variances: None,
            dt,
        })
    }
}

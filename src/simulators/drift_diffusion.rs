// src/simulators/drift_diffusion.rs
//! Generic drift-diffusion process with caller-supplied coefficients.
//!
//! Euler-Maruyama over an arbitrary SDE `dS = a(t, S)dt + b(t, S)dW`:
//! ```text
//! S_t = S_{t-1} + a(t, S_{t-1})·dt + b(t, S_{t-1})·√dt·z
//! ```
//! Drift and diffusion are plain closures evaluated per step; no trait
//! machinery. Ornstein-Uhlenbeck is the named special case
//! `a = κ(θ - S), b = σ`.

use super::{resolve_seed, PathEnsemble, PathSimulator, SimulationConfig};
use crate::distributions::{Distribution, NormalDistribution};
use crate::error::{validation::*, PricingResult};
use crate::qmc;
use ndarray::{Array2, Zip};

/// A state coefficient `f(t, s) -> f64`.
type CoefficientFn = Box<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// Euler-Maruyama simulator for a caller-defined drift-diffusion process.
pub struct DriftDiffusionSimulator<D: Distribution = NormalDistribution> {
    drift: CoefficientFn,
    diffusion: CoefficientFn,
    distribution: D,
}

impl DriftDiffusionSimulator<NormalDistribution> {
    pub fn new(
        drift: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
        diffusion: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        DriftDiffusionSimulator {
            drift: Box::new(drift),
            diffusion: Box::new(diffusion),
            distribution: NormalDistribution::standard(),
        }
    }

    /// Ornstein-Uhlenbeck process: mean reversion at speed κ toward level θ
    /// with constant diffusion σ.
    pub fn ornstein_uhlenbeck(kappa: f64, theta: f64, sigma: f64) -> PricingResult<Self> {
        validate_positive("kappa", kappa)?;
        validate_finite("theta", theta)?;
        validate_positive("sigma", sigma)?;

        Ok(Self::new(
            move |_t, s| kappa * (theta - s),
            move |_t, _s| sigma,
        ))
    }
}

impl<D: Distribution> DriftDiffusionSimulator<D> {
    /// Use a custom shock distribution for the Brownian increments.
    pub fn with_distribution(
        drift: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
        diffusion: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
        distribution: D,
    ) -> Self {
        DriftDiffusionSimulator {
            drift: Box::new(drift),
            diffusion: Box::new(diffusion),
            distribution,
        }
    }
}

impl<D: Distribution> PathSimulator for DriftDiffusionSimulator<D> {
    fn simulate(&self, config: &SimulationConfig) -> PricingResult<PathEnsemble> {
        config.validate()?;

        let steps = config.time_steps;
        let paths = config.paths;
        let dt = config.maturity / steps as f64;
        let sqrt_dt = dt.sqrt();
        let seed = resolve_seed(config);

        let uniforms = qmc::sample_matrix(steps, paths, seed)?;
        let shocks = self.distribution.ppf_matrix(&uniforms);

        let s0 = config.initial_price;
        let drift = &self.drift;
        let diffusion = &self.diffusion;

        let mut prices = Array2::zeros((paths, steps + 1));
        Zip::from(prices.rows_mut())
            .and(shocks.rows())
            .par_for_each(|mut path, z| {
                path[0] = s0;
                for t in 1..=steps {
                    let time = t as f64 * dt;
                    let prev = path[t - 1];
                    path[t] = prev
                        + drift(time, prev) * dt
                        + diffusion(time, prev) * sqrt_dt * z[t - 1];
                }
            });

        Ok(PathEnsemble {
            prices,
            variances: None,
            dt,
        })
    }
}

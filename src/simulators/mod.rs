// src/simulators/mod.rs
//! Quasi-random path simulation engine.
//!
//! A simulator advances a stochastic process over discrete time steps and
//! returns a dense [`PathEnsemble`]. Uniform draws come from the scrambled
//! Sobol generator in [`crate::qmc`] and are mapped into shocks through a
//! [`crate::distributions::Distribution`] quantile function.
//!
//! All configuration is threaded explicitly through [`simulate`]: a
//! simulator instance holds no per-call state, so re-invoking with the same
//! config (and a fixed seed) is fully deterministic, and with no seed the
//! scrambling differs per call by design.
//!
//! [`simulate`]: PathSimulator::simulate

pub mod drift_diffusion;
pub mod gbm;
pub mod heston;

pub use drift_diffusion::DriftDiffusionSimulator;
pub use gbm::{GbmSimulator, SamplingScheme};
pub use heston::HestonSimulator;

use crate::error::{validation::*, PricingError, PricingResult};
use ndarray::{Array2, ArrayView1};
use rand::Rng;

/// Heston stochastic-volatility parameters.
///
/// The variance process `dV = κ(θ - V)dt + ξ√V dW` is simulated with a
/// truncated Euler scheme (variance floored at zero). The Feller condition
/// `2κθ > ξ²` is NOT enforced: violating it makes the zero floor bind often
/// and biases the scheme, which is the caller's trade-off to make.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HestonParams {
    /// Initial variance v0
    pub v0: f64,
    /// Mean-reversion speed κ
    pub kappa: f64,
    /// Long-run variance θ
    pub theta: f64,
    /// Volatility of variance ξ
    pub xi: f64,
    /// Correlation ρ between price and variance shocks
    pub rho: f64,
}

impl HestonParams {
    pub fn validate(&self) -> PricingResult<()> {
        validate_non_negative("v0", self.v0)?;
        validate_positive("kappa", self.kappa)?;
        validate_positive("theta", self.theta)?;
        validate_positive("xi", self.xi)?;
        validate_correlation("rho", self.rho)?;
        Ok(())
    }
}

/// Configuration for one simulation run.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Initial stock price S0
    pub initial_price: f64,
    /// Time to maturity T in years
    pub maturity: f64,
    /// Risk-free rate r
    pub rate: f64,
    /// Constant volatility σ (ignored when `step_volatility` is set)
    pub volatility: f64,
    /// Continuous dividend yield δ
    pub dividend_yield: f64,
    /// Number of time steps N
    pub time_steps: usize,
    /// Number of simulated paths M; a power of two gives exact
    /// low-discrepancy coverage, other counts are truncations of one
    pub paths: usize,
    /// Optional per-step volatility, length must equal `time_steps`
    pub step_volatility: Option<Vec<f64>>,
    /// Process parameters for the Heston simulator
    pub heston: Option<HestonParams>,
    /// Scramble seed; `None` draws fresh entropy per call
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Validate the common configuration fields.
    pub fn validate(&self) -> PricingResult<()> {
        validate_positive("initial_price", self.initial_price)?;
        validate_positive("maturity", self.maturity)?;
        validate_finite("rate", self.rate)?;
        validate_non_negative("dividend_yield", self.dividend_yield)?;
        validate_steps(self.time_steps)?;
        validate_paths(self.paths)?;

        if let Some(vols) = &self.step_volatility {
            if vols.len() != self.time_steps {
                return Err(PricingError::InvalidParameter {
                    parameter: "step_volatility".to_string(),
                    value: vols.len() as f64,
                    constraint: format!("length must equal time_steps ({})", self.time_steps),
                });
            }
            for &v in vols {
                validate_positive("step_volatility", v)?;
            }
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_price: 100.0,
            maturity: 1.0,
            rate: 0.05,
            volatility: 0.2,
            dividend_yield: 0.0,
            time_steps: 252,
            paths: 4096,
            step_volatility: None,
            heston: None,
            seed: None,
        }
    }
}

/// Dense ensemble of simulated paths.
///
/// `prices` has shape (paths, time_steps + 1) with column 0 equal to the
/// initial price on every path. The Heston simulator also fills a parallel
/// `variances` matrix of the same shape. Returned by value; the caller owns
/// the ensemble from then on.
#[derive(Clone, Debug)]
pub struct PathEnsemble {
    pub prices: Array2<f64>,
    pub variances: Option<Array2<f64>>,
    /// Step length T / N in years
    pub dt: f64,
}

impl PathEnsemble {
    /// Number of simulated paths M.
    pub fn paths(&self) -> usize {
        self.prices.nrows()
    }

    /// Number of time steps N (columns minus the initial one).
    pub fn steps(&self) -> usize {
        self.prices.ncols() - 1
    }

    /// Terminal price column S_T.
    pub fn terminal_prices(&self) -> ArrayView1<'_, f64> {
        self.prices.column(self.prices.ncols() - 1)
    }
}

/// A stochastic process that can be advanced into a path ensemble.
pub trait PathSimulator {
    fn simulate(&self, config: &SimulationConfig) -> PricingResult<PathEnsemble>;
}

/// Fixed seed if the caller provided one, fresh entropy otherwise.
pub(crate) fn resolve_seed(config: &SimulationConfig) -> u64 {
    config.seed.unwrap_or_else(|| rand::thread_rng().gen())
}

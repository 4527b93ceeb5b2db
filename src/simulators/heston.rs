// src/simulators/heston.rs
//! Heston Stochastic Volatility Path Simulation
//!
//! # Mathematical Framework
//!
//! The Heston model evolves price and variance jointly:
//! ```text
//! dS_t = r S_t dt + √V_t S_t dW_t^(1)
//! dV_t = κ(θ - V_t) dt + ξ√V_t dW_t^(2)
//! ```
//! with `corr(dW^(1), dW^(2)) = ρ`.
//!
//! # Discretization
//!
//! Variance uses a truncated Euler step, floored at zero; the price step
//! uses the pre-update variance:
//! ```text
//! V_t = max(V_{t-1} + κ(θ - V_{t-1})dt + ξ√V_{t-1}√dt·Z1, 0)
//! S_t = S_{t-1} · exp((r - V_{t-1}/2)dt + √V_{t-1}√dt·Z2)
//! ```
//!
//! Truncation is a known approximation: when the Feller condition `2κθ > ξ²`
//! fails, the floor binds often and biases variance upward. The condition is
//! deliberately not enforced here.
//!
//! # Correlation
//!
//! Shocks come from a Sobol point set of dimension `2·time_steps`, mapped to
//! normals and correlated through the Cholesky factor of [[1, ρ], [ρ, 1]].
//! The raw first stream drives the variance; the mixed second stream drives
//! the price.

use super::{resolve_seed, PathEnsemble, PathSimulator, SimulationConfig};
use crate::distributions::{Distribution, NormalDistribution};
use crate::error::{PricingError, PricingResult};
use crate::qmc;
use nalgebra::Matrix2;
use ndarray::{Array2, Zip};

/// Two-factor Heston simulator.
///
/// Process parameters travel in `SimulationConfig::heston`; simulating
/// without them fails with `MissingParameter`.
pub struct HestonSimulator;

impl HestonSimulator {
    pub fn new() -> Self {
        HestonSimulator
    }
}

impl Default for HestonSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PathSimulator for HestonSimulator {
    fn simulate(&self, config: &SimulationConfig) -> PricingResult<PathEnsemble> {
        config.validate()?;
        let params = config
            .heston
            .ok_or_else(|| PricingError::MissingParameter {
                parameter: "heston".to_string(),
                context: "Heston path simulation".to_string(),
            })?;
        params.validate()?;

        let steps = config.time_steps;
        let paths = config.paths;
        let dt = config.maturity / steps as f64;
        let sqrt_dt = dt.sqrt();
        let seed = resolve_seed(config);

        // Two shock streams per step, interleaved per point
        let uniforms = qmc::sample_matrix(2 * steps, paths, seed)?;
        let normals = NormalDistribution::standard().ppf_matrix(&uniforms);

        let correlation = Matrix2::new(1.0, params.rho, params.rho, 1.0);
        let factor = match correlation.cholesky() {
            Some(chol) => chol.l(),
            // |ρ| = 1 makes the matrix singular; use the closed-form factor
            None => Matrix2::new(1.0, 0.0, params.rho, 0.0),
        };
        let (mix_raw, mix_orth) = (factor[(1, 0)], factor[(1, 1)]);

        let s0 = config.initial_price;
        let rate = config.rate;

        let mut prices = Array2::zeros((paths, steps + 1));
        let mut variances = Array2::zeros((paths, steps + 1));
        Zip::from(prices.rows_mut())
            .and(variances.rows_mut())
            .and(normals.rows())
            .par_for_each(|mut s_row, mut v_row, z| {
                s_row[0] = s0;
                v_row[0] = params.v0;
                for t in 1..=steps {
                    let z1 = z[2 * (t - 1)];
                    let z2 = mix_raw * z1 + mix_orth * z[2 * (t - 1) + 1];

                    let v_prev = v_row[t - 1];
                    let sqrt_v = v_prev.sqrt();

                    v_row[t] = (v_prev
                        + params.kappa * (params.theta - v_prev) * dt
                        + params.xi * sqrt_v * sqrt_dt * z1)
                        .max(0.0);
                    s_row[t] =
                        s_row[t - 1] * ((rate - 0.5 * v_prev) * dt + sqrt_v * sqrt_dt * z2).exp();
                }
            });

        Ok(PathEnsemble {
            prices,
            variances: Some(variances),
            dt,
        })
    }
}

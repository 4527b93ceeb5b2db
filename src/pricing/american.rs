// src/pricing/american.rs
//! Least-Squares Monte Carlo (Longstaff-Schwartz) American pricing
//!
//! # Mathematical Framework
//!
//! Backward induction over simulated *paths* instead of a lattice. At each
//! step, the continuation value of holding is approximated by regressing the
//! discounted next-step option value onto a polynomial basis of the current
//! price, restricted to in-the-money paths:
//! ```text
//! E[V_{t+1}·e^(-r·dt) | S_t] ≈ β₀ + β₁·S_t + β₂·S_t²
//! ```
//! A path exercises at the step iff its intrinsic value meets or exceeds the
//! predicted continuation; otherwise it keeps the discounted next-step
//! value. Out-of-the-money paths never compare; they just carry the
//! discounted value forward.
//!
//! # Update ordering
//!
//! This implementation discounts the next step's *already-updated* option
//! value (not the realized cash flow along each path), so every comparison
//! uses the freshest estimate. This is a deliberate deviation from the
//! textbook Longstaff-Schwartz cash-flow convention.
//!
//! The backward loop runs from step N-1 down to 1; step 0 would regress on a
//! constant spot column (singular design matrix, zero information), so the
//! final discount from step 1 to step 0 is applied once before averaging.
//!
//! # Degenerate steps
//!
//! Fewer than 3 in-the-money paths cannot support the 3-parameter basis;
//! such steps (including the empty case) skip the regression and simply
//! discount. Deep out-of-the-money contracts exercise this branch at every
//! step and still price correctly to their (near-zero) European value.

use crate::contracts::{ExerciseBoundaryPoint, ExerciseStyle, OptionContract, OptionType};
use crate::error::{PricingError, PricingResult};
use crate::simulators::{PathEnsemble, PathSimulator, SimulationConfig};
use nalgebra::{Matrix3, Vector3};
use rayon::prelude::*;

/// Price estimate plus the pathwise exercise boundary.
#[derive(Clone, Debug)]
pub struct LsmOutput {
    pub price: f64,
    /// One entry per interior time step (1..N), ascending in time;
    /// `price` is `None` where no path exercised
    pub boundary: Vec<ExerciseBoundaryPoint>,
}

/// Longstaff-Schwartz estimator over any path simulator.
pub struct LeastSquaresMonteCarlo<S: PathSimulator> {
    simulator: S,
}

impl<S: PathSimulator> LeastSquaresMonteCarlo<S> {
    pub fn new(simulator: S) -> Self {
        LeastSquaresMonteCarlo { simulator }
    }

    pub fn price(
        &self,
        contract: &OptionContract,
        config: &SimulationConfig,
    ) -> PricingResult<f64> {
        self.price_with_boundary(contract, config)
            .map(|output| output.price)
    }

    pub fn price_with_boundary(
        &self,
        contract: &OptionContract,
        config: &SimulationConfig,
    ) -> PricingResult<LsmOutput> {
        let ensemble = self.simulator.simulate(config)?;
        self.price_from_ensemble(contract, &ensemble)
    }

    /// Run the estimator over an already simulated ensemble.
    pub fn price_from_ensemble(
        &self,
        contract: &OptionContract,
        ensemble: &PathEnsemble,
    ) -> PricingResult<LsmOutput> {
        contract.validate()?;
        if contract.exercise != ExerciseStyle::American {
            return Err(PricingError::InvalidExerciseStyle {
                found: "european".to_string(),
                expected: "american".to_string(),
            });
        }

        let n_paths = ensemble.paths();
        let n_steps = ensemble.steps();
        let dt = contract.maturity / n_steps as f64;
        let discount = (-contract.rate * dt).exp();

        let mut values: Vec<f64> = (0..n_paths)
            .into_par_iter()
            .map(|path| contract.intrinsic(ensemble.prices[[path, n_steps]]))
            .collect();

        let mut boundary_rev: Vec<ExerciseBoundaryPoint> = Vec::with_capacity(n_steps);

        for step in (1..n_steps).rev() {
            // Discount the updated next-step values down to this step
            for value in values.iter_mut() {
                *value *= discount;
            }

            let spots = ensemble.prices.column(step);
            let itm: Vec<usize> = (0..n_paths)
                .filter(|&path| contract.intrinsic(spots[path]) > 0.0)
                .collect();

            if itm.len() < 3 {
                boundary_rev.push(ExerciseBoundaryPoint {
                    time: step as f64 * dt,
                    price: None,
                });
                continue;
            }

            let beta = match regression_coefficients(&itm, &spots, &values) {
                Some(beta) => beta,
                None => {
                    boundary_rev.push(ExerciseBoundaryPoint {
                        time: step as f64 * dt,
                        price: None,
                    });
                    continue;
                }
            };

            let mut exercised_spots: Vec<f64> = Vec::new();
            for &path in &itm {
                let s = spots[path];
                let continuation = beta[0] + beta[1] * s + beta[2] * s * s;
                let exercise = contract.intrinsic(s);
                if exercise >= continuation {
                    values[path] = exercise;
                    exercised_spots.push(s);
                }
            }

            boundary_rev.push(ExerciseBoundaryPoint {
                time: step as f64 * dt,
                price: boundary_from_exercised(contract.option_type, &exercised_spots),
            });
        }

        // Final discount from step 1 back to step 0
        for value in values.iter_mut() {
            *value *= discount;
        }
        let price = values.iter().sum::<f64>() / n_paths as f64;

        boundary_rev.reverse();
        Ok(LsmOutput {
            price,
            boundary: boundary_rev,
        })
    }
}

/// OLS on the basis [1, S, S²] via the 3×3 normal equations.
fn regression_coefficients(
    itm: &[usize],
    spots: &ndarray::ArrayView1<'_, f64>,
    values: &[f64],
) -> Option<Vector3<f64>> {
    let mut s1 = 0.0_f64;
    let mut s_s = 0.0_f64;
    let mut s_s2 = 0.0_f64;
    let mut s_s3 = 0.0_f64;
    let mut s_s4 = 0.0_f64;
    let mut s_y = 0.0_f64;
    let mut s_sy = 0.0_f64;
    let mut s_s2y = 0.0_f64;

    for &path in itm {
        let s = spots[path];
        let s2 = s * s;
        let y = values[path];
        s1 += 1.0;
        s_s += s;
        s_s2 += s2;
        s_s3 += s2 * s;
        s_s4 += s2 * s2;
        s_y += y;
        s_sy += s * y;
        s_s2y += s2 * y;
    }

    let xtx = Matrix3::new(s1, s_s, s_s2, s_s, s_s2, s_s3, s_s2, s_s3, s_s4);
    let xty = Vector3::new(s_y, s_sy, s_s2y);
    xtx.lu().solve(&xty)
}

/// Extreme exercised price: smallest for calls, largest for puts.
fn boundary_from_exercised(option_type: OptionType, exercised_spots: &[f64]) -> Option<f64> {
    match option_type {
        OptionType::Call => exercised_spots.iter().copied().reduce(f64::min),
        OptionType::Put => exercised_spots.iter().copied().reduce(f64::max),
    }
}

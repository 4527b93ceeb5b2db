// src/lattice.rs
//! Binomial Lattice Engine
//!
//! # Mathematical Framework
//!
//! A recombining tree with forward-tree up/down factors
//! ```text
//! u = exp((r - δ)h + σ√h),   d = exp((r - δ)h - σ√h),   h = T / steps
//! ```
//! and risk-neutral up probability
//! ```text
//! p = (exp((r - δ)h) - d) / (u - d)
//! ```
//! `p` outside [0, 1] means u, d, r admit arbitrage and pricing aborts with
//! `ArbitrageViolation` instead of silently producing an invalid number.
//!
//! The stock grid is filled by the direct combinatorial formula
//! `S[j, i] = S0 · u^(i-j) · d^j` (j down-moves after i steps) rather than a
//! step-by-step roll-forward. Backward induction discounts the expected
//! option value one step at a time; American contracts take the max against
//! immediate exercise at every node.
//!
//! # Exercise boundary
//!
//! For American contracts the engine can record, per time step, the stock
//! price at the first node (scanning from out-of-the-money toward
//! in-the-money) where immediate exercise strictly beats continuation.
//! Calls scan upward in price, puts downward, because moneyness grows in
//! opposite directions. Steps where no node prefers exercise get `None`.

use crate::contracts::{ExerciseBoundaryPoint, ExerciseStyle, OptionContract, OptionType};
use crate::error::{validation::*, PricingError, PricingResult};
use crate::pricing::PricingOracle;
use ndarray::Array2;

/// Lattice price plus the per-step early-exercise boundary.
#[derive(Clone, Debug)]
pub struct LatticeOutput {
    pub price: f64,
    /// One entry per time step in ascending time order
    pub boundary: Vec<ExerciseBoundaryPoint>,
}

/// Recombining binomial tree pricer.
#[derive(Clone, Copy, Debug)]
pub struct BinomialLattice {
    steps: usize,
}

impl BinomialLattice {
    pub fn new(steps: usize) -> PricingResult<Self> {
        validate_steps(steps)?;
        Ok(BinomialLattice { steps })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Price a European or American contract.
    pub fn price(&self, contract: &OptionContract) -> PricingResult<f64> {
        let (price, _) = self.induct(contract, false)?;
        Ok(price)
    }

    /// Price an American contract and extract its exercise boundary.
    pub fn price_with_boundary(&self, contract: &OptionContract) -> PricingResult<LatticeOutput> {
        if contract.exercise != ExerciseStyle::American {
            return Err(PricingError::InvalidExerciseStyle {
                found: "european".to_string(),
                expected: "american".to_string(),
            });
        }

        let (price, boundary) = self.induct(contract, true)?;
        Ok(LatticeOutput {
            price,
            boundary: boundary.unwrap_or_default(),
        })
    }

    fn induct(
        &self,
        contract: &OptionContract,
        track_boundary: bool,
    ) -> PricingResult<(f64, Option<Vec<ExerciseBoundaryPoint>>)> {
        contract.validate()?;

        let steps = self.steps;
        let h = contract.maturity / steps as f64;
        let (u, d) = up_down_factors(contract.volatility, h, contract.rate, contract.dividend_yield);
        let p = risk_neutral_probability(contract.rate, contract.dividend_yield, h, u, d)?;
        let discount = (-contract.rate * h).exp();
        let american = contract.exercise == ExerciseStyle::American;

        // Stock grid by the combinatorial formula, option grid from payoffs
        let mut stock = Array2::zeros((steps + 1, steps + 1));
        for i in 0..=steps {
            for j in 0..=i {
                stock[[j, i]] = contract.spot * u.powi((i - j) as i32) * d.powi(j as i32);
            }
        }

        let mut values = Array2::zeros((steps + 1, steps + 1));
        for j in 0..=steps {
            values[[j, steps]] = contract.intrinsic(stock[[j, steps]]);
        }

        let mut boundary_rev = track_boundary.then(Vec::new);
        let mut continuation = vec![0.0_f64; steps + 1];

        for i in (0..steps).rev() {
            for j in 0..=i {
                continuation[j] =
                    discount * (p * values[[j, i + 1]] + (1.0 - p) * values[[j + 1, i + 1]]);
            }

            for j in 0..=i {
                values[[j, i]] = if american {
                    continuation[j].max(contract.intrinsic(stock[[j, i]]))
                } else {
                    continuation[j]
                };
            }

            if let Some(boundary) = boundary_rev.as_mut() {
                // j indexes down-moves: j = 0 is the highest price at step i.
                // Put: out-of-the-money up high, scan j upward (price downward).
                // Call: out-of-the-money down low, scan j downward (price upward).
                let critical = match contract.option_type {
                    OptionType::Put => {
                        (0..=i).find(|&j| contract.intrinsic(stock[[j, i]]) > continuation[j])
                    }
                    OptionType::Call => (0..=i)
                        .rev()
                        .find(|&j| contract.intrinsic(stock[[j, i]]) > continuation[j]),
                };
                boundary.push(ExerciseBoundaryPoint {
                    time: i as f64 * h,
                    price: critical.map(|j| stock[[j, i]]),
                });
            }
        }

        let boundary = boundary_rev.map(|mut b| {
            b.reverse();
            b
        });
        Ok((values[[0, 0]], boundary))
    }
}

impl PricingOracle for BinomialLattice {
    fn price(&self, contract: &OptionContract) -> PricingResult<f64> {
        BinomialLattice::price(self, contract)
    }
}

/// Forward-tree up/down factors.
pub fn up_down_factors(sigma: f64, h: f64, rate: f64, dividend_yield: f64) -> (f64, f64) {
    let growth = (rate - dividend_yield) * h;
    let spread = sigma * h.sqrt();
    ((growth + spread).exp(), (growth - spread).exp())
}

/// Risk-neutral up probability, rejected outside [0, 1].
pub fn risk_neutral_probability(
    rate: f64,
    dividend_yield: f64,
    h: f64,
    u: f64,
    d: f64,
) -> PricingResult<f64> {
    let p = (((rate - dividend_yield) * h).exp() - d) / (u - d);
    if !(0.0..=1.0).contains(&p) {
        return Err(PricingError::ArbitrageViolation {
            probability: p,
            up: u,
            down: d,
        });
    }
    Ok(p)
}

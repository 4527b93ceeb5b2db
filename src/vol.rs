// src/vol.rs
//! Implied volatility by Newton-Raphson with a bisection fallback.
//!
//! The solver inverts any [`PricingOracle`] to find the volatility matching
//! an observed market price. Newton iterates
//! ```text
//! σ_{n+1} = σ_n + (market - model(σ_n)) / vega(σ_n)
//! ```
//! clamped to [lower_bound, upper_bound]. Deep out-of-the-money or extreme
//! maturity contracts can drive vega below resolution or push an iterate out
//! of bounds; Newton is then abandoned for plain bisection over the same
//! bounds, because a slow answer beats a divergent one.
//!
//! The solver never fails: whatever happens (including oracle errors
//! mid-search), it reports its best estimate with `converged` set
//! accordingly.

use crate::contracts::OptionContract;
use crate::pricing::PricingOracle;

const VEGA_FLOOR: f64 = 1e-8;

/// Solver output: best volatility estimate, work done, and whether the
/// tolerance was actually reached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpliedVolResult {
    pub volatility: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Newton-Raphson implied-volatility solver with bisection fallback.
#[derive(Clone, Copy, Debug)]
pub struct ImpliedVolSolver {
    pub initial_guess: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Default for ImpliedVolSolver {
    fn default() -> Self {
        ImpliedVolSolver {
            initial_guess: 0.2,
            tolerance: 1e-8,
            max_iterations: 100,
            lower_bound: 1e-4,
            upper_bound: 5.0,
        }
    }
}

impl ImpliedVolSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recover the volatility at which `oracle` reproduces `market_price`.
    pub fn solve<O: PricingOracle>(
        &self,
        oracle: &O,
        contract: &OptionContract,
        market_price: f64,
    ) -> ImpliedVolResult {
        let mut sigma = self.initial_guess.clamp(self.lower_bound, self.upper_bound);
        let mut iterations = 0;
        let mut best = Estimate {
            volatility: sigma,
            error: f64::INFINITY,
        };

        while iterations < self.max_iterations {
            iterations += 1;

            let model = match self.price_at(oracle, contract, sigma) {
                Some(price) => price,
                None => return self.bisect(oracle, contract, market_price, iterations, best),
            };
            let diff = market_price - model;
            best.track(sigma, diff.abs());

            if diff.abs() < self.tolerance {
                return ImpliedVolResult {
                    volatility: sigma,
                    iterations,
                    converged: true,
                };
            }

            let mut probe = contract.clone();
            probe.volatility = sigma;
            let vega = match oracle.vega(&probe) {
                Ok(v) => v,
                Err(_) => break,
            };
            if vega.abs() < VEGA_FLOOR {
                break;
            }

            let next = sigma + diff / vega;
            if next < self.lower_bound || next > self.upper_bound {
                break;
            }
            sigma = next;
        }

        self.bisect(oracle, contract, market_price, iterations, best)
    }

    /// Bisection over [lower_bound, upper_bound] for up to `max_iterations`
    /// more evaluations.
    fn bisect<O: PricingOracle>(
        &self,
        oracle: &O,
        contract: &OptionContract,
        market_price: f64,
        mut iterations: usize,
        mut best: Estimate,
    ) -> ImpliedVolResult {
        let mut lo = self.lower_bound;
        let mut hi = self.upper_bound;

        let mut f_lo = match self.price_at(oracle, contract, lo) {
            Some(price) => price - market_price,
            None => return best.give_up(iterations),
        };
        let f_hi = match self.price_at(oracle, contract, hi) {
            Some(price) => price - market_price,
            None => return best.give_up(iterations),
        };
        best.track(lo, f_lo.abs());
        best.track(hi, f_hi.abs());

        if f_lo * f_hi > 0.0 {
            // No bracket: the market price lies outside the oracle's range
            return best.give_up(iterations);
        }

        for _ in 0..self.max_iterations {
            iterations += 1;
            let mid = 0.5 * (lo + hi);
            let f_mid = match self.price_at(oracle, contract, mid) {
                Some(price) => price - market_price,
                None => return best.give_up(iterations),
            };
            best.track(mid, f_mid.abs());

            if f_mid.abs() < self.tolerance {
                return ImpliedVolResult {
                    volatility: mid,
                    iterations,
                    converged: true,
                };
            }

            if f_mid * f_lo > 0.0 {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
            }
        }

        best.give_up(iterations)
    }

    fn price_at<O: PricingOracle>(
        &self,
        oracle: &O,
        contract: &OptionContract,
        sigma: f64,
    ) -> Option<f64> {
        let mut probe = contract.clone();
        probe.volatility = sigma;
        oracle.price(&probe).ok()
    }
}

/// Running best estimate across both search phases.
#[derive(Clone, Copy)]
struct Estimate {
    volatility: f64,
    error: f64,
}

impl Estimate {
    fn track(&mut self, volatility: f64, error: f64) {
        if error < self.error {
            self.volatility = volatility;
            self.error = error;
        }
    }

    fn give_up(self, iterations: usize) -> ImpliedVolResult {
        ImpliedVolResult {
            volatility: self.volatility,
            iterations,
            converged: false,
        }
    }
}

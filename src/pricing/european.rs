// src/pricing/european.rs
//! European option pricing by simulation: discounted cross-path mean of the
//! terminal intrinsic payoff.

use crate::contracts::OptionContract;
use crate::error::PricingResult;
use crate::simulators::{PathSimulator, SimulationConfig};
use ndarray::parallel::prelude::*;

/// Simulation-based European pricer over any path simulator.
pub struct EuropeanSimulationPricer<S: PathSimulator> {
    simulator: S,
}

impl<S: PathSimulator> EuropeanSimulationPricer<S> {
    pub fn new(simulator: S) -> Self {
        EuropeanSimulationPricer { simulator }
    }

    pub fn price(
        &self,
        contract: &OptionContract,
        config: &SimulationConfig,
    ) -> PricingResult<f64> {
        contract.validate()?;

        let ensemble = self.simulator.simulate(config)?;
        let discount = (-contract.rate * contract.maturity).exp();

        let terminal = ensemble.terminal_prices();
        let payoff_sum: f64 = terminal
            .into_par_iter()
            .map(|&s_t| contract.intrinsic(s_t))
            .sum();

        Ok(discount * payoff_sum / ensemble.paths() as f64)
    }
}

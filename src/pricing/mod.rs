// src/pricing/mod.rs
//! Pricing engines built on top of the path simulators, plus the oracle
//! trait that lets any pricer (closed-form, lattice, simulation) be inverted
//! or composed as a black box.

pub mod american;
pub mod asian;
pub mod european;

pub use american::{LeastSquaresMonteCarlo, LsmOutput};
pub use asian::{AsianKind, AsianSimulationPricer, Averaging};
pub use european::EuropeanSimulationPricer;

use crate::contracts::OptionContract;
use crate::error::PricingResult;

/// A black-box pricing function `price(contract) -> f64`.
///
/// `vega` defaults to a central finite difference on the oracle's own price;
/// oracles with a closed form (Black-Scholes) override it.
pub trait PricingOracle {
    fn price(&self, contract: &OptionContract) -> PricingResult<f64>;

    fn vega(&self, contract: &OptionContract) -> PricingResult<f64> {
        const BUMP: f64 = 1e-4;

        let mut up = contract.clone();
        up.volatility = contract.volatility + BUMP;
        let mut down = contract.clone();
        down.volatility = (contract.volatility - BUMP).max(BUMP);

        let dv = up.volatility - down.volatility;
        Ok((self.price(&up)? - self.price(&down)?) / dv)
    }
}

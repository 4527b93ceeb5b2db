// src/analytics.rs
//! Analytical Black-Scholes formulas for European options
//!
//! # Mathematical Foundation
//!
//! Under Black-Scholes with continuous dividend yield δ the underlying
//! follows `dS_t = (r - δ) S_t dt + σ S_t dW_t` and European prices have the
//! closed forms
//! ```text
//! C = S e^(-δT) Φ(d₁) - K e^(-rT) Φ(d₂)
//! P = K e^(-rT) Φ(-d₂) - S e^(-δT) Φ(-d₁)
//! d₁ = [ln(S/K) + (r - δ + σ²/2)T] / (σ√T),   d₂ = d₁ - σ√T
//! ```
//!
//! These formulas serve the rest of the crate as the reference pricing
//! oracle: the implied-volatility solver inverts them (using the closed-form
//! vega below) and the lattice/simulation tests converge against them. The
//! exercise-style flag on a contract is ignored here; the closed form is
//! the European value by construction.

use crate::contracts::{OptionContract, OptionType};
use crate::error::PricingResult;
use crate::pricing::PricingOracle;
use statrs::function::erf;
use std::f64::consts::{PI, SQRT_2};

/// Standard normal CDF Φ(x).
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf::erf(x / SQRT_2))
}

/// Standard normal density φ(x).
fn norm_pdf(x: f64) -> f64 {
    (1.0 / (2.0 * PI).sqrt()) * (-0.5 * x * x).exp()
}

fn d1(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
}

/// Black-Scholes European call price.
pub fn call_price(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let d1 = d1(s, k, r, q, sigma, t);
    let d2 = d1 - sigma * t.sqrt();
    s * (-q * t).exp() * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// Black-Scholes European put price.
pub fn put_price(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let d1 = d1(s, k, r, q, sigma, t);
    let d2 = d1 - sigma * t.sqrt();
    k * (-r * t).exp() * norm_cdf(-d2) - s * (-q * t).exp() * norm_cdf(-d1)
}

/// Black-Scholes vega (∂V/∂σ), identical for calls and puts.
pub fn vega(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    s * (-q * t).exp() * norm_pdf(d1(s, k, r, q, sigma, t)) * t.sqrt()
}

/// Closed-form Black-Scholes pricing oracle.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlackScholes;

impl BlackScholes {
    pub fn new() -> Self {
        BlackScholes
    }
}

impl PricingOracle for BlackScholes {
    fn price(&self, contract: &OptionContract) -> PricingResult<f64> {
        contract.validate()?;
        let price = match contract.option_type {
            OptionType::Call => call_price(
                contract.spot,
                contract.strike,
                contract.rate,
                contract.dividend_yield,
                contract.volatility,
                contract.maturity,
            ),
            OptionType::Put => put_price(
                contract.spot,
                contract.strike,
                contract.rate,
                contract.dividend_yield,
                contract.volatility,
                contract.maturity,
            ),
        };
        Ok(price)
    }

    fn vega(&self, contract: &OptionContract) -> PricingResult<f64> {
        contract.validate()?;
        Ok(vega(
            contract.spot,
            contract.strike,
            contract.rate,
            contract.dividend_yield,
            contract.volatility,
            contract.maturity,
        ))
    }
}

//! # qmc-pricer: Quasi-Monte Carlo Option Pricing
//!
//! A Rust library for pricing financial options with quasi-random path
//! simulation, binomial lattices, and regression-based early-exercise
//! estimation.
//!
//! ## Key Features
//!
//! - **Low-Discrepancy Simulation**: scrambled Sobol point sets mapped
//!   through quantile functions for variance-reduced path ensembles
//! - **Multiple Processes**: geometric Brownian motion, Heston stochastic
//!   volatility, and generic drift-diffusion (Ornstein-Uhlenbeck included)
//! - **Early Exercise**: binomial lattice backward induction and
//!   Longstaff-Schwartz least-squares Monte Carlo, both with exercise
//!   boundary extraction
//! - **Implied Volatility**: Newton-Raphson with bisection fallback over any
//!   pricing oracle
//! - **Robust Numerics**: parameter validation and typed errors at every
//!   entry point
//!
//! ## Quick Start
//!
//! ```rust
//! use qmc_pricer::contracts::{ExerciseStyle, OptionContract, OptionType};
//! use qmc_pricer::lattice::BinomialLattice;
//!
//! // An at-the-money American put
//! let contract = OptionContract {
//!     spot: 100.0,
//!     strike: 100.0,
//!     maturity: 1.0,
//!     rate: 0.05,
//!     dividend_yield: 0.0,
//!     volatility: 0.2,
//!     option_type: OptionType::Put,
//!     exercise: ExerciseStyle::American,
//! };
//!
//! let lattice = BinomialLattice::new(500).expect("Valid step count");
//! let price = lattice.price(&contract).expect("Valid contract");
//! assert!(price > 0.0);
//! ```
//!
//! ## Mathematical Foundation
//!
//! All engines price under the risk-neutral measure: the option value is the
//! discounted expected payoff, approximated either on a recombining tree or
//! across a simulated path ensemble. American contracts solve the embedded
//! optimal-stopping problem, by nodewise comparison on the lattice and by
//! cross-sectional regression of continuation values on the simulated paths.

// Module declarations
pub mod error;
pub mod contracts;
pub mod distributions;
pub mod qmc;
pub mod simulators;
pub mod lattice;
pub mod analytics;
pub mod pricing;
pub mod vol;

// Re-export commonly used types for convenience
pub use error::{PricingError, PricingResult};

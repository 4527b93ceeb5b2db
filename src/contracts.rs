// src/contracts.rs
//! Option contract and market parameters.
//!
//! A contract is an immutable record created per pricing call and owned by
//! the caller. Engines never mutate or cache it; re-pricing with the same
//! contract always rebuilds lattices/ensembles from scratch.

use crate::error::{validation::*, PricingError, PricingResult};
use std::str::FromStr;

/// Call or put.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic (immediate-exercise) payoff at stock price `s`.
    #[inline]
    pub fn intrinsic(self, s: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (s - strike).max(0.0),
            OptionType::Put => (strike - s).max(0.0),
        }
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> PricingResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(PricingError::InvalidOptionType {
                found: other.to_string(),
            }),
        }
    }
}

/// Exercise style of the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExerciseStyle {
    European,
    American,
}

impl FromStr for ExerciseStyle {
    type Err = PricingError;

    fn from_str(s: &str) -> PricingResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "european" => Ok(ExerciseStyle::European),
            "american" => Ok(ExerciseStyle::American),
            other => Err(PricingError::InvalidExerciseStyle {
                found: other.to_string(),
                expected: "european or american".to_string(),
            }),
        }
    }
}

/// Market and contract parameters for a single vanilla option.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionContract {
    /// Current stock price S0
    pub spot: f64,
    /// Strike price K
    pub strike: f64,
    /// Time to maturity T in years
    pub maturity: f64,
    /// Continuously compounded risk-free rate r
    pub rate: f64,
    /// Continuous dividend yield δ
    pub dividend_yield: f64,
    /// Volatility σ of the underlying diffusion
    pub volatility: f64,
    pub option_type: OptionType,
    pub exercise: ExerciseStyle,
}

impl OptionContract {
    /// Validate the contract parameters.
    ///
    /// Volatility must be strictly positive: every engine here drives a
    /// diffusion (lattice, closed form, or simulation) through σ.
    pub fn validate(&self) -> PricingResult<()> {
        validate_positive("spot", self.spot)?;
        validate_positive("strike", self.strike)?;
        validate_positive("maturity", self.maturity)?;
        validate_finite("rate", self.rate)?;
        validate_non_negative("dividend_yield", self.dividend_yield)?;
        validate_positive("volatility", self.volatility)?;
        Ok(())
    }

    /// Intrinsic payoff of this contract at stock price `s`.
    #[inline]
    pub fn intrinsic(&self, s: f64) -> f64 {
        self.option_type.intrinsic(s, self.strike)
    }
}

/// One point of an early-exercise boundary.
///
/// `price` is the critical stock price at `time`; `None` where immediate
/// exercise is not optimal at any sampled/lattice node of that step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExerciseBoundaryPoint {
    pub time: f64,
    pub price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract() -> OptionContract {
        OptionContract {
            spot: 100.0,
            strike: 95.0,
            maturity: 1.0,
            rate: 0.05,
            dividend_yield: 0.0,
            volatility: 0.2,
            option_type: OptionType::Call,
            exercise: ExerciseStyle::European,
        }
    }

    #[test]
    fn test_intrinsic_payoffs() {
        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_validation() {
        assert!(contract().validate().is_ok());

        let mut bad = contract();
        bad.volatility = 0.0;
        assert!(bad.validate().is_err());

        let mut bad = contract();
        bad.maturity = -1.0;
        assert!(bad.validate().is_err());

        let mut bad = contract();
        bad.spot = 0.0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_option_type_parsing() {
        assert_eq!("call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!("PUT".parse::<OptionType>().unwrap(), OptionType::Put);

        let err = "straddle".parse::<OptionType>().unwrap_err();
        assert!(matches!(err, PricingError::InvalidOptionType { .. }));
    }

    #[test]
    fn test_exercise_style_parsing() {
        assert_eq!(
            "european".parse::<ExerciseStyle>().unwrap(),
            ExerciseStyle::European
        );
        assert_eq!(
            "American".parse::<ExerciseStyle>().unwrap(),
            ExerciseStyle::American
        );
        assert!("bermudan".parse::<ExerciseStyle>().is_err());
    }
}

// src/error.rs
use std::fmt;

/// Custom error types for the qmc-pricer library
#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Out-of-domain numeric input
    InvalidParameter {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Required configuration field absent
    MissingParameter { parameter: String, context: String },

    /// Option type other than call/put
    InvalidOptionType { found: String },

    /// Component invoked with the wrong exercise style
    InvalidExerciseStyle { found: String, expected: String },

    /// Low-discrepancy generator produced fewer points than requested
    InsufficientSamples { generated: usize, requested: usize },

    /// Risk-neutral probability left [0, 1]: u, d, r are inconsistent with no-arbitrage
    ArbitrageViolation { probability: f64, up: f64, down: f64 },
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::InvalidParameter {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = {}: {}",
                    parameter, value, constraint
                )
            }
            PricingError::MissingParameter { parameter, context } => {
                write!(f, "Missing parameter '{}' for {}", parameter, context)
            }
            PricingError::InvalidOptionType { found } => {
                write!(
                    f,
                    "Invalid option type '{}': expected 'call' or 'put'",
                    found
                )
            }
            PricingError::InvalidExerciseStyle { found, expected } => {
                write!(
                    f,
                    "Invalid exercise style '{}': this operation requires '{}'",
                    found, expected
                )
            }
            PricingError::InsufficientSamples {
                generated,
                requested,
            } => {
                write!(
                    f,
                    "Low-discrepancy generator produced {} points but {} were requested",
                    generated, requested
                )
            }
            PricingError::ArbitrageViolation {
                probability,
                up,
                down,
            } => {
                write!(
                    f,
                    "Risk-neutral probability {:.6} outside [0, 1] (u={}, d={}): tree parameters admit arbitrage",
                    probability, up, down
                )
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Result type alias for qmc-pricer operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Validation utilities
pub mod validation {
    use super::{PricingError, PricingResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> PricingResult<()> {
        if value <= 0.0 {
            Err(PricingError::InvalidParameter {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PricingResult<()> {
        if value < 0.0 {
            Err(PricingError::InvalidParameter {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is within a range
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> PricingResult<()> {
        if value < min || value > max {
            Err(PricingError::InvalidParameter {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {}]", min, max),
            })
        } else {
            Ok(())
        }
    }

    /// Validate correlation parameter
    pub fn validate_correlation(name: &str, rho: f64) -> PricingResult<()> {
        validate_range(name, rho, -1.0, 1.0)
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricingResult<()> {
        if !value.is_finite() {
            Err(PricingError::InvalidParameter {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate simulation path count
    pub fn validate_paths(paths: usize) -> PricingResult<()> {
        if paths == 0 {
            Err(PricingError::InvalidParameter {
                parameter: "paths".to_string(),
                value: paths as f64,
                constraint: "must be greater than 0".to_string(),
            })
        } else if paths > 1_000_000_000 {
            Err(PricingError::InvalidParameter {
                parameter: "paths".to_string(),
                value: paths as f64,
                constraint: "exceeds maximum allowed (1 billion)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate time step count
    pub fn validate_steps(steps: usize) -> PricingResult<()> {
        if steps == 0 {
            Err(PricingError::InvalidParameter {
                parameter: "steps".to_string(),
                value: steps as f64,
                constraint: "must be greater than 0".to_string(),
            })
        } else if steps > 100_000 {
            Err(PricingError::InvalidParameter {
                parameter: "steps".to_string(),
                value: steps as f64,
                constraint: "exceeds maximum allowed (100,000)".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

// src/distributions.rs
//! Probability laws feeding the path simulators.
//!
//! A `Distribution` supplies two things:
//! 1. `sample`: i.i.d. pseudo-random draws through a caller-provided RNG
//! 2. `ppf`: the inverse CDF (quantile function), used to map
//!    low-discrepancy uniforms into shocks
//!
//! `ppf` is defined for quantiles strictly inside (0, 1); at exactly 0 or 1
//! the quantile is ±infinity. The Sobol generator in this crate never emits
//! exact 0 or 1, so simulators can map its output unguarded.
//!
//! Distributions are stateless beyond their parameters and can be shared
//! read-only across simulations.

use crate::error::{validation::*, PricingError, PricingResult};
use ndarray::Array2;
use rand::Rng;
use rand_distr::Distribution as SampleDist;
use statrs::distribution::ContinuousCDF;

/// A parameterized probability law.
pub trait Distribution {
    /// Draw `n` independent variates.
    fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64>;

    /// Inverse CDF at quantile `q`, `q` strictly inside (0, 1).
    fn ppf(&self, q: f64) -> f64;

    /// Elementwise inverse CDF over a matrix of quantiles.
    fn ppf_matrix(&self, quantiles: &Array2<f64>) -> Array2<f64> {
        quantiles.mapv(|q| self.ppf(q))
    }
}

/// Normal law with mean and standard deviation.
#[derive(Clone, Copy, Debug)]
pub struct NormalDistribution {
    quantile: statrs::distribution::Normal,
    sampler: rand_distr::Normal<f64>,
}

impl NormalDistribution {
    pub fn new(mean: f64, std_dev: f64) -> PricingResult<Self> {
        validate_finite("mean", mean)?;
        validate_positive("std_dev", std_dev)?;

        let quantile = statrs::distribution::Normal::new(mean, std_dev).map_err(|_| {
            PricingError::InvalidParameter {
                parameter: "std_dev".to_string(),
                value: std_dev,
                constraint: "must define a valid normal law".to_string(),
            }
        })?;
        let sampler = rand_distr::Normal::new(mean, std_dev).map_err(|_| {
            PricingError::InvalidParameter {
                parameter: "std_dev".to_string(),
                value: std_dev,
                constraint: "must define a valid normal law".to_string(),
            }
        })?;

        Ok(NormalDistribution { quantile, sampler })
    }

    /// The standard normal N(0, 1), the default law for all simulators.
    pub fn standard() -> Self {
        Self::new(0.0, 1.0).expect("standard normal parameters are valid")
    }
}

impl Distribution for NormalDistribution {
    fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        (0..n).map(|_| self.sampler.sample(rng)).collect()
    }

    fn ppf(&self, q: f64) -> f64 {
        self.quantile.inverse_cdf(q)
    }
}

/// Student-t law with location and scale (heavier tails than normal).
#[derive(Clone, Debug)]
pub struct StudentTDistribution {
    loc: f64,
    scale: f64,
    quantile: statrs::distribution::StudentsT,
    sampler: rand_distr::StudentT<f64>,
}

impl StudentTDistribution {
    pub fn new(df: f64, loc: f64, scale: f64) -> PricingResult<Self> {
        validate_positive("df", df)?;
        validate_finite("loc", loc)?;
        validate_positive("scale", scale)?;

        let quantile = statrs::distribution::StudentsT::new(loc, scale, df).map_err(|_| {
            PricingError::InvalidParameter {
                parameter: "df".to_string(),
                value: df,
                constraint: "must define a valid Student-t law".to_string(),
            }
        })?;
        let sampler =
            rand_distr::StudentT::new(df).map_err(|_| PricingError::InvalidParameter {
                parameter: "df".to_string(),
                value: df,
                constraint: "must define a valid Student-t law".to_string(),
            })?;

        Ok(StudentTDistribution {
            loc,
            scale,
            quantile,
            sampler,
        })
    }

    /// Standard Student-t: location 0, scale 1.
    pub fn standardized(df: f64) -> PricingResult<Self> {
        Self::new(df, 0.0, 1.0)
    }
}

impl Distribution for StudentTDistribution {
    fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        (0..n)
            .map(|_| self.loc + self.scale * self.sampler.sample(rng))
            .collect()
    }

    fn ppf(&self, q: f64) -> f64 {
        self.quantile.inverse_cdf(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_invalid_parameters() {
        assert!(NormalDistribution::new(0.0, 0.0).is_err());
        assert!(NormalDistribution::new(0.0, -1.0).is_err());
        assert!(StudentTDistribution::new(0.0, 0.0, 1.0).is_err());
        assert!(StudentTDistribution::new(5.0, 0.0, -0.5).is_err());
    }

    #[test]
    fn test_normal_ppf_symmetry() {
        let dist = NormalDistribution::standard();
        assert!((dist.ppf(0.5)).abs() < 1e-12);
        assert!((dist.ppf(0.975) - 1.959964).abs() < 1e-4);
        assert!((dist.ppf(0.025) + 1.959964).abs() < 1e-4);
    }

    #[test]
    fn test_normal_sample_moments() {
        let dist = NormalDistribution::new(1.0, 2.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let draws = dist.sample(50_000, &mut rng);

        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / draws.len() as f64;

        assert!((mean - 1.0).abs() < 0.05, "mean {} far from 1", mean);
        assert!((var - 4.0).abs() < 0.2, "variance {} far from 4", var);
    }

    #[test]
    fn test_student_t_heavier_tails_than_normal() {
        let normal = NormalDistribution::standard();
        let t = StudentTDistribution::standardized(4.0).unwrap();
        // Same tail quantile sits further out for the t law
        assert!(t.ppf(0.99) > normal.ppf(0.99));
        assert!(t.ppf(0.01) < normal.ppf(0.01));
    }

    #[test]
    fn test_ppf_matrix_elementwise() {
        let dist = NormalDistribution::standard();
        let q = arr2(&[[0.5, 0.975], [0.025, 0.5]]);
        let z = dist.ppf_matrix(&q);

        assert!(z[[0, 0]].abs() < 1e-12);
        assert!((z[[0, 1]] - 1.959964).abs() < 1e-4);
        assert!((z[[1, 0]] + 1.959964).abs() < 1e-4);
    }
}

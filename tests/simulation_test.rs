// tests/simulation_test.rs
use qmc_pricer::simulators::{
    DriftDiffusionSimulator, GbmSimulator, HestonParams, HestonSimulator, PathSimulator,
    SamplingScheme, SimulationConfig,
};

fn terminal_mean_and_std(ensemble: &qmc_pricer::simulators::PathEnsemble) -> (f64, f64) {
    let terminal = ensemble.terminal_prices();
    let n = terminal.len() as f64;
    let mean = terminal.sum() / n;
    let var = terminal.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

#[test]
fn test_gbm_martingale_property() {
    let s0 = 100.0;
    let r = 0.05;
    let cfg = SimulationConfig {
        initial_price: s0,
        maturity: 1.0,
        rate: r,
        volatility: 0.2,
        dividend_yield: 0.0,
        time_steps: 16,
        paths: 4096,
        seed: Some(42),
        ..Default::default()
    };

    let ensemble = GbmSimulator::new().simulate(&cfg).expect("Valid configuration");
    let (mean, _) = terminal_mean_and_std(&ensemble);
    let discounted_mean = (-r * cfg.maturity).exp() * mean;

    println!("Discounted terminal mean: {}", discounted_mean);
    println!("Initial price: {}", s0);

    assert!(
        (discounted_mean - s0).abs() < 1.0,
        "Martingale property violated: discounted mean {} vs S0 {}",
        discounted_mean,
        s0
    );
}

#[test]
fn test_sobol_and_pseudo_random_statistically_indistinguishable() {
    let cfg = SimulationConfig {
        initial_price: 100.0,
        maturity: 1.0,
        rate: 0.05,
        volatility: 0.2,
        time_steps: 16,
        paths: 8192,
        seed: Some(7),
        ..Default::default()
    };

    let quasi = GbmSimulator::new().simulate(&cfg).expect("Valid configuration");
    let pseudo = GbmSimulator::new()
        .with_sampling(SamplingScheme::PseudoRandom)
        .simulate(&cfg)
        .expect("Valid configuration");

    let (quasi_mean, quasi_std) = terminal_mean_and_std(&quasi);
    let (pseudo_mean, pseudo_std) = terminal_mean_and_std(&pseudo);

    println!("Sobol terminal mean/std:  {} / {}", quasi_mean, quasi_std);
    println!("Pseudo terminal mean/std: {} / {}", pseudo_mean, pseudo_std);

    assert!(
        (quasi_mean - pseudo_mean).abs() < 1.5,
        "Terminal means diverge: Sobol {} vs pseudo {}",
        quasi_mean,
        pseudo_mean
    );
    assert!(
        (quasi_std - pseudo_std).abs() < 1.5,
        "Terminal std deviations diverge: Sobol {} vs pseudo {}",
        quasi_std,
        pseudo_std
    );
}

#[test]
fn test_generic_drift_diffusion_reproduces_gbm() {
    let r = 0.05;
    let sigma = 0.2;
    let cfg = SimulationConfig {
        initial_price: 100.0,
        maturity: 1.0,
        rate: r,
        volatility: sigma,
        time_steps: 100,
        paths: 8192,
        seed: Some(21),
        ..Default::default()
    };

    // GBM expressed through injected coefficients: a = rS, b = σS
    let generic = DriftDiffusionSimulator::new(move |_t, s| r * s, move |_t, s| sigma * s);
    let generic_ensemble = generic.simulate(&cfg).expect("Valid configuration");
    let gbm_ensemble = GbmSimulator::new().simulate(&cfg).expect("Valid configuration");

    let (generic_mean, generic_std) = terminal_mean_and_std(&generic_ensemble);
    let (gbm_mean, gbm_std) = terminal_mean_and_std(&gbm_ensemble);

    println!("Generic Euler terminal mean/std: {} / {}", generic_mean, generic_std);
    println!("Exact GBM terminal mean/std:     {} / {}", gbm_mean, gbm_std);

    assert!(
        (generic_mean - gbm_mean).abs() < 1.0,
        "Mean difference too large: {}",
        (generic_mean - gbm_mean).abs()
    );
    assert!(
        (generic_std - gbm_std).abs() < 1.5,
        "Std deviation difference too large: {}",
        (generic_std - gbm_std).abs()
    );
}

#[test]
fn test_heston_discounted_mean_close_to_spot() {
    let s0 = 100.0;
    let r = 0.05;
    let cfg = SimulationConfig {
        initial_price: s0,
        maturity: 1.0,
        rate: r,
        time_steps: 64,
        paths: 8192,
        heston: Some(HestonParams {
            v0: 0.04,
            kappa: 2.0,
            theta: 0.04,
            xi: 0.3,
            rho: -0.7,
        }),
        seed: Some(5),
        ..Default::default()
    };

    let ensemble = HestonSimulator::new().simulate(&cfg).expect("Valid configuration");
    let (mean, _) = terminal_mean_and_std(&ensemble);
    let discounted_mean = (-r * cfg.maturity).exp() * mean;

    println!("Heston discounted terminal mean: {}", discounted_mean);

    assert!(
        (discounted_mean - s0).abs() < 2.0,
        "Discounted Heston mean {} drifted from S0 {}",
        discounted_mean,
        s0
    );

    let variances = ensemble.variances.expect("Heston fills variances");
    assert!(
        variances.iter().all(|&v| v >= 0.0),
        "Variance matrix contains negative entries"
    );
}

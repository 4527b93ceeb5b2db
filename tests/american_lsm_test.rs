// tests/american_lsm_test.rs
use qmc_pricer::analytics;
use qmc_pricer::contracts::{ExerciseStyle, OptionContract, OptionType};
use qmc_pricer::lattice::BinomialLattice;
use qmc_pricer::pricing::LeastSquaresMonteCarlo;
use qmc_pricer::simulators::{GbmSimulator, SimulationConfig};

fn american(option_type: OptionType, strike: f64) -> OptionContract {
    OptionContract {
        spot: 100.0,
        strike,
        maturity: 1.0,
        rate: 0.05,
        dividend_yield: 0.0,
        volatility: 0.2,
        option_type,
        exercise: ExerciseStyle::American,
    }
}

fn config(paths: usize, steps: usize) -> SimulationConfig {
    SimulationConfig {
        initial_price: 100.0,
        maturity: 1.0,
        rate: 0.05,
        volatility: 0.2,
        time_steps: steps,
        paths,
        seed: Some(2024),
        ..Default::default()
    }
}

#[test]
fn test_lsm_put_close_to_lattice_benchmark() {
    let contract = american(OptionType::Put, 100.0);

    let lattice_price = BinomialLattice::new(1000)
        .expect("Valid step count")
        .price(&contract)
        .expect("Valid contract");

    let estimator = LeastSquaresMonteCarlo::new(GbmSimulator::new());
    let lsm_price = estimator
        .price(&contract, &config(8192, 50))
        .expect("Valid configuration");

    let rel_error = (lsm_price - lattice_price).abs() / lattice_price;

    println!("Lattice American put: {}", lattice_price);
    println!("LSM American put:     {}", lsm_price);
    println!("Relative error:       {}", rel_error);

    assert!(
        rel_error < 0.04,
        "LSM price {} deviates from lattice benchmark {} by {}",
        lsm_price,
        lattice_price,
        rel_error
    );
}

#[test]
fn test_lsm_put_at_least_european_value() {
    let contract = american(OptionType::Put, 100.0);
    let european = analytics::put_price(100.0, 100.0, 0.05, 0.0, 0.2, 1.0);

    let estimator = LeastSquaresMonteCarlo::new(GbmSimulator::new());
    let lsm_price = estimator
        .price(&contract, &config(8192, 50))
        .expect("Valid configuration");

    println!("LSM American put {} vs European {}", lsm_price, european);

    assert!(
        lsm_price > european * 0.98,
        "American estimate {} below European floor {}",
        lsm_price,
        european
    );
}

#[test]
fn test_deep_otm_call_takes_degenerate_branch() {
    // K ≫ S0: no path is ever in the money, every step skips the
    // regression and the estimate collapses to (near) zero.
    let contract = american(OptionType::Call, 1000.0);

    let estimator = LeastSquaresMonteCarlo::new(GbmSimulator::new());
    let output = estimator
        .price_with_boundary(&contract, &config(2048, 25))
        .expect("Deep OTM contract must not raise");

    println!("Deep OTM call estimate: {}", output.price);

    assert!(output.price >= 0.0);
    assert!(output.price < 1e-6, "Deep OTM call priced at {}", output.price);
    assert!(
        output.boundary.iter().all(|b| b.price.is_none()),
        "No step should record an exercise boundary"
    );
}

#[test]
fn test_lsm_call_without_dividends_near_european() {
    // Early exercise of a no-dividend call is worthless, so the LSM price
    // should land on the European value.
    let contract = american(OptionType::Call, 100.0);
    let european = analytics::call_price(100.0, 100.0, 0.05, 0.0, 0.2, 1.0);

    let estimator = LeastSquaresMonteCarlo::new(GbmSimulator::new());
    let lsm_price = estimator
        .price(&contract, &config(8192, 50))
        .expect("Valid configuration");

    let rel_error = (lsm_price - european).abs() / european;

    println!("LSM American call: {} vs European {}", lsm_price, european);

    assert!(
        rel_error < 0.05,
        "No-dividend American call {} deviates from European {} by {}",
        lsm_price,
        european,
        rel_error
    );
}

#[test]
fn test_lsm_boundary_stays_below_put_strike() {
    let contract = american(OptionType::Put, 100.0);
    let estimator = LeastSquaresMonteCarlo::new(GbmSimulator::new());
    let output = estimator
        .price_with_boundary(&contract, &config(8192, 50))
        .expect("Valid configuration");

    let defined: Vec<f64> = output.boundary.iter().filter_map(|b| b.price).collect();

    println!(
        "LSM boundary defined at {}/{} interior steps",
        defined.len(),
        output.boundary.len()
    );

    assert!(!defined.is_empty(), "Put should exercise somewhere");
    for price in defined {
        assert!(price < 100.0, "Exercised spot {} above the strike", price);
    }
}

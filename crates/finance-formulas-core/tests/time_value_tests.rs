use finance_formulas_core::time_value::{self, IrrConfig, IrrTermination};
use finance_formulas_core::FinanceError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Time-value of money tests
// ===========================================================================

// ---------------------------------------------------------------------------
// FV / PV tests
// ---------------------------------------------------------------------------

#[test]
fn test_fv_textbook_case() {
    // 1000 at 5% for 10 years => 1628.89
    let result = time_value::future_value(dec!(1000), dec!(0.05), 10).unwrap();
    assert!(
        (result - dec!(1628.89)).abs() < dec!(0.01),
        "Expected FV ~1628.89, got {}",
        result
    );
}

#[test]
fn test_fv_zero_periods_is_identity() {
    let result = time_value::future_value(dec!(-250.5), dec!(0.07), 0).unwrap();
    assert_eq!(result, dec!(-250.5));
}

#[test]
fn test_pv_textbook_case() {
    // 1628.89 in 10 years at 5% => ~1000 today
    let result = time_value::present_value(dec!(1628.89), dec!(0.05), 10).unwrap();
    assert!(
        (result - dec!(1000)).abs() < dec!(0.01),
        "Expected PV ~1000, got {}",
        result
    );
}

#[test]
fn test_pv_fv_round_trip_negative_periods() {
    let fv = time_value::future_value(dec!(500), dec!(0.08), -4).unwrap();
    assert!(fv < dec!(500));
    let pv = time_value::present_value(fv, dec!(0.08), -4).unwrap();
    assert!((pv - dec!(500)).abs() < dec!(0.0000001));
}

#[test]
fn test_rate_below_minus_one_not_rejected() {
    // (1 - 1.5)^2 = 0.25
    let result = time_value::future_value(dec!(100), dec!(-1.5), 2).unwrap();
    assert_eq!(result, dec!(25));
}

#[test]
fn test_total_loss_rate_errors_only_when_inverted() {
    assert_eq!(
        time_value::future_value(dec!(100), dec!(-1), 5).unwrap(),
        Decimal::ZERO
    );
    assert!(matches!(
        time_value::future_value(dec!(100), dec!(-1), -5),
        Err(FinanceError::DivisionByZero { .. })
    ));
    assert!(matches!(
        time_value::present_value(dec!(100), dec!(-1), 5),
        Err(FinanceError::DivisionByZero { .. })
    ));
}

#[test]
fn test_pv_long_horizon_is_tiny_not_an_error() {
    // 1.1^700 is far beyond decimal range; 1000 / 1.1^700 is about 1.06e-26
    let result = time_value::present_value(dec!(1000), dec!(0.10), 700).unwrap();
    assert!(result >= Decimal::ZERO);
    assert!(result < dec!(0.00000000000000000001), "Expected ~0, got {}", result);
}

#[test]
fn test_fv_long_horizon_still_overflows() {
    assert!(matches!(
        time_value::future_value(dec!(1000), dec!(0.10), 700),
        Err(FinanceError::NumericDomain { .. })
    ));
}

// ---------------------------------------------------------------------------
// NPV tests
// ---------------------------------------------------------------------------

#[test]
fn test_npv_basic_positive() {
    // -1000 + 300/1.1 + 420/1.21 + 680/1.331 = 130.73
    let cfs = vec![dec!(-1000), dec!(300), dec!(420), dec!(680)];
    let result = time_value::npv(dec!(0.10), &cfs).unwrap();
    assert!(
        (result - dec!(130.73)).abs() < dec!(0.01),
        "Expected NPV ~130.73, got {}",
        result
    );
}

#[test]
fn test_npv_zero_rate() {
    // At 0% rate, NPV is just sum of cash flows
    let cfs = vec![dec!(-100), dec!(50), dec!(50), dec!(50)];
    let result = time_value::npv(dec!(0.0), &cfs).unwrap();
    assert_eq!(result, dec!(50));
}

#[test]
fn test_npv_negative_result() {
    // High discount rate makes positive cash flows worth less
    let cfs = vec![dec!(-1000), dec!(100), dec!(100), dec!(100)];
    let result = time_value::npv(dec!(0.20), &cfs).unwrap();
    assert!(result < Decimal::ZERO, "Expected negative NPV, got {}", result);
}

#[test]
fn test_npv_first_flow_not_discounted() {
    let result = time_value::npv(dec!(0.50), &[dec!(-100), dec!(0)]).unwrap();
    assert_eq!(result, dec!(-100));
}

#[test]
fn test_npv_hundreds_of_periods() {
    // Level annuity of 1 for 700 periods at 10%: 1 + (1 - 1.1^-699) / 0.1 => ~11
    let cfs = vec![dec!(1); 700];
    let result = time_value::npv(dec!(0.10), &cfs).unwrap();
    assert!(
        (result - dec!(11)).abs() < dec!(0.000001),
        "Expected NPV ~11, got {}",
        result
    );
}

#[test]
fn test_npv_high_rate_many_periods() {
    // Halving each period: 1 + 1/2 + 1/4 + ... => ~2
    let cfs = vec![dec!(1); 100];
    let result = time_value::npv(dec!(1.0), &cfs).unwrap();
    assert!(
        (result - dec!(2)).abs() < dec!(0.000001),
        "Expected NPV ~2, got {}",
        result
    );
}

#[test]
fn test_npv_empty_cashflows() {
    let cfs: Vec<Decimal> = vec![];
    assert!(matches!(
        time_value::npv(dec!(0.10), &cfs),
        Err(FinanceError::EmptyInput { .. })
    ));
}

// ---------------------------------------------------------------------------
// IRR tests
// ---------------------------------------------------------------------------

#[test]
fn test_irr_textbook_case() {
    // -1000, +400, +400, +400 => IRR ~9.7%
    let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
    let irr = time_value::irr(&cfs).unwrap();
    assert!(
        (irr - dec!(0.097)).abs() < dec!(0.001),
        "Expected IRR ~9.7%, got {}",
        irr
    );
}

#[test]
fn test_irr_ten_percent() {
    let irr = time_value::irr(&[dec!(-100), dec!(110)]).unwrap();
    assert!(
        (irr - dec!(0.10)).abs() < dec!(0.0001),
        "Expected IRR ~10%, got {}",
        irr
    );
}

#[test]
fn test_irr_break_even() {
    // -100, +100 => IRR = 0%
    let config = IrrConfig::default().with_guess(dec!(0.05));
    let solution = time_value::irr_with_config(&[dec!(-100), dec!(100)], &config).unwrap();
    assert!(
        solution.rate.abs() < dec!(0.001),
        "Expected IRR ~0%, got {}",
        solution.rate
    );
    assert_eq!(solution.termination, IrrTermination::Converged);
}

#[test]
fn test_irr_high_return() {
    // -100, +200 in 1 period => IRR = 100%
    let config = IrrConfig::default().with_guess(dec!(0.50));
    let solution = time_value::irr_with_config(&[dec!(-100), dec!(200)], &config).unwrap();
    assert!(
        (solution.rate - dec!(1.0)).abs() < dec!(0.01),
        "Expected IRR ~100%, got {}",
        solution.rate
    );
}

#[test]
fn test_irr_high_return_many_periods() {
    // -1 then 3 per period for 80 periods: 3/(1+r) summed converges at r = 3
    let mut cfs = vec![dec!(-1)];
    cfs.extend(std::iter::repeat(dec!(3)).take(80));
    let solution = time_value::irr_with_config(&cfs, &IrrConfig::default()).unwrap();
    assert!(solution.is_converged());
    assert!(
        (solution.rate - dec!(3)).abs() < dec!(0.0001),
        "Expected IRR ~300%, got {}",
        solution.rate
    );
}

#[test]
fn test_irr_long_project() {
    // 300 periods of 900 on a 1000 outlay: 900 / r ~= 1000 => IRR ~90%
    let mut cfs = vec![dec!(-1000)];
    cfs.extend(std::iter::repeat(dec!(900)).take(300));
    let solution = time_value::irr_with_config(&cfs, &IrrConfig::default()).unwrap();
    assert!(solution.is_converged());
    assert!(
        (solution.rate - dec!(0.9)).abs() < dec!(0.0001),
        "Expected IRR ~90%, got {}",
        solution.rate
    );
}

#[test]
fn test_irr_npv_at_solution_is_zero() {
    let cfs = vec![dec!(-5000), dec!(1200), dec!(1500), dec!(1800), dec!(2100)];
    let solution = time_value::irr_with_config(&cfs, &IrrConfig::default()).unwrap();
    assert!(solution.is_converged());
    let residual = time_value::npv(solution.rate, &cfs).unwrap();
    assert!(
        residual.abs() < time_value::CONVERGENCE_THRESHOLD,
        "Expected NPV at IRR ~0, got {}",
        residual
    );
}

#[test]
fn test_irr_strict_conversion() {
    let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
    let converged = time_value::irr_with_config(&cfs, &IrrConfig::default())
        .unwrap()
        .converged();
    assert!(converged.is_ok());

    let exhausted = time_value::irr_with_config(&cfs, &IrrConfig::default().with_max_iterations(2))
        .unwrap()
        .converged();
    assert!(matches!(
        exhausted,
        Err(FinanceError::ConvergenceFailure { iterations: 2, .. })
    ));
}

#[test]
fn test_irr_exhausted_matches_manual_newton_steps() {
    // Two unconverged iterations must return exactly the second Newton iterate
    let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
    let one = time_value::irr_with_config(&cfs, &IrrConfig::default().with_max_iterations(1))
        .unwrap();
    let two_from_one = time_value::irr_with_config(
        &cfs,
        &IrrConfig::default().with_guess(one.rate).with_max_iterations(1),
    )
    .unwrap();
    let two = time_value::irr_with_config(&cfs, &IrrConfig::default().with_max_iterations(2))
        .unwrap();
    assert_eq!(two.rate, two_from_one.rate);
    assert_eq!(two.termination, IrrTermination::Exhausted);
}

#[test]
fn test_irr_single_flow_has_zero_derivative() {
    assert!(matches!(
        time_value::irr(&[dec!(100)]),
        Err(FinanceError::DivisionByZero { .. })
    ));
}

#[test]
fn test_irr_empty() {
    assert!(matches!(
        time_value::irr(&[]),
        Err(FinanceError::EmptyInput { .. })
    ));
}

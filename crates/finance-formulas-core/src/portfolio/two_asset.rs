use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::math;
use crate::statistics::{covariance_of, ensure_same_length, mean_of, std_dev_of, variance_of};
use crate::types::*;
use crate::FinanceResult;

/// Expected return of a two-asset portfolio: w1 * mean(r1) + w2 * mean(r2)
///
/// Weights are used as given. They are not required to sum to 1 and may be
/// negative; normalising them is the caller's responsibility. The two series
/// may differ in length since only their means are combined.
pub fn portfolio_expected_return(
    w1: Weight,
    returns1: &[Rate],
    w2: Weight,
    returns2: &[Rate],
) -> FinanceResult<Rate> {
    let mean1 = mean_of(returns1, "returns1")?;
    let mean2 = mean_of(returns2, "returns2")?;
    let leg1 = math::mul(w1, mean1, "portfolio expected return")?;
    let leg2 = math::mul(w2, mean2, "portfolio expected return")?;
    math::add(leg1, leg2, "portfolio expected return")
}

/// Two-asset portfolio variance: w1²σ1² + w2²σ2² + 2·w1·w2·cov(r1, r2)
///
/// The series are paired period by period and must have the same length.
pub fn portfolio_variance(
    w1: Weight,
    returns1: &[Rate],
    w2: Weight,
    returns2: &[Rate],
) -> FinanceResult<Decimal> {
    ensure_same_length(returns1, "returns1", returns2, "returns2")?;
    let var1 = variance_of(returns1, "returns1")?;
    let var2 = variance_of(returns2, "returns2")?;
    let cov12 = covariance_of(returns1, "returns1", returns2, "returns2")?;

    let ctx = "portfolio variance";
    let term1 = math::mul(math::mul(w1, w1, ctx)?, var1, ctx)?;
    let term2 = math::mul(math::mul(w2, w2, ctx)?, var2, ctx)?;
    let two_w1 = math::mul(dec!(2), w1, ctx)?;
    let cross = math::mul(math::mul(two_w1, w2, ctx)?, cov12, ctx)?;
    math::add(math::add(term1, term2, ctx)?, cross, ctx)
}

/// Input for a two-asset portfolio analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoAssetPortfolioInput {
    pub weight1: Weight,
    /// Periodic returns of the first asset (as decimals)
    pub returns1: Vec<Rate>,
    pub weight2: Weight,
    /// Periodic returns of the second asset, paired with `returns1`
    pub returns2: Vec<Rate>,
    /// Per-period risk-free rate; enables the Sharpe ratio when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_free_rate: Option<Rate>,
}

/// Output of a two-asset portfolio analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoAssetPortfolioOutput {
    pub expected_return: Rate,
    pub variance: Decimal,
    pub volatility: Rate,
    /// None when either asset has zero volatility
    pub correlation: Option<Decimal>,
    /// None without a risk-free rate or when the portfolio has zero volatility
    pub sharpe_ratio: Option<Decimal>,
    pub weight_sum: Weight,
}

/// Analyse a two-asset portfolio: expected return, variance, volatility,
/// correlation and (optionally) Sharpe ratio.
///
/// Unusual weights are flagged as warnings, never rejected.
pub fn analyse_two_asset_portfolio(
    input: &TwoAssetPortfolioInput,
) -> FinanceResult<ComputationOutput<TwoAssetPortfolioOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let expected_return = portfolio_expected_return(
        input.weight1,
        &input.returns1,
        input.weight2,
        &input.returns2,
    )?;
    let variance = portfolio_variance(
        input.weight1,
        &input.returns1,
        input.weight2,
        &input.returns2,
    )?;
    let volatility = math::sqrt(variance, "portfolio volatility")?;

    let weight_sum = math::add(input.weight1, input.weight2, "weight sum")?;
    if weight_sum != Decimal::ONE {
        warnings.push(format!(
            "Weights sum to {weight_sum}, not 1; results are not normalised"
        ));
    }
    if input.weight1 < Decimal::ZERO || input.weight2 < Decimal::ZERO {
        warnings.push("Negative weight implies a short position".into());
    }

    // Correlation: cov / (sigma1 * sigma2)
    let std1 = std_dev_of(&input.returns1, "returns1")?;
    let std2 = std_dev_of(&input.returns2, "returns2")?;
    let correlation = if std1.is_zero() || std2.is_zero() {
        warnings.push("An asset has zero volatility; correlation is undefined".into());
        None
    } else {
        let cov = covariance_of(&input.returns1, "returns1", &input.returns2, "returns2")?;
        let denominator = math::mul(std1, std2, "correlation")?;
        Some(math::div(cov, denominator, "correlation")?)
    };

    // Sharpe = (E[Rp] - Rf) / sigma_p
    let sharpe_ratio = match input.risk_free_rate {
        Some(_) if volatility.is_zero() => {
            warnings.push("Portfolio has zero volatility; Sharpe ratio is undefined".into());
            None
        }
        Some(rf) => {
            let excess = math::sub(expected_return, rf, "portfolio Sharpe ratio")?;
            Some(math::div(excess, volatility, "portfolio Sharpe ratio")?)
        }
        None => None,
    };

    let output = TwoAssetPortfolioOutput {
        expected_return,
        variance,
        volatility,
        correlation,
        sharpe_ratio,
        weight_sum,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Two-Asset Portfolio (mean-variance, population moments)",
        &serde_json::json!({
            "observations": input.returns1.len(),
            "weight1": input.weight1.to_string(),
            "weight2": input.weight2.to_string(),
            "risk_free_rate": input.risk_free_rate.map(|r| r.to_string()),
        }),
        warnings,
        elapsed,
        output,
    ))
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::math;
use crate::statistics::{covariance_of, ensure_same_length, mean_of, std_dev_of, variance_of};
use crate::types::*;
use crate::FinanceResult;

/// Sharpe ratio: (mean(returns) - Rf) / std(returns)
///
/// `risk_free_rate` must be expressed per period, matching the return series.
/// Constant returns have zero volatility and fail with `DivisionByZero`.
pub fn sharpe_ratio(returns: &[Rate], risk_free_rate: Rate) -> FinanceResult<Decimal> {
    let mean = mean_of(returns, "returns")?;
    let std_dev = std_dev_of(returns, "returns")?;
    let excess = math::sub(mean, risk_free_rate, "Sharpe ratio")?;
    math::div(excess, std_dev, "Sharpe ratio (zero volatility)")
}

/// Beta = Cov(asset, market) / Var(market)
pub fn beta(returns_asset: &[Rate], returns_market: &[Rate]) -> FinanceResult<Decimal> {
    let cov = covariance_of(returns_asset, "returns_asset", returns_market, "returns_market")?;
    let market_variance = variance_of(returns_market, "returns_market")?;
    math::div(cov, market_variance, "beta (zero market variance)")
}

/// CAPM expected return: Rf + Beta * (mean(market) - Rf)
pub fn expected_return_capm(
    risk_free_rate: Rate,
    returns_asset: &[Rate],
    returns_market: &[Rate],
) -> FinanceResult<Rate> {
    let beta_value = beta(returns_asset, returns_market)?;
    let market_return = mean_of(returns_market, "returns_market")?;
    let premium = math::sub(market_return, risk_free_rate, "CAPM market premium")?;
    let risk_adjustment = math::mul(beta_value, premium, "CAPM expected return")?;
    math::add(risk_free_rate, risk_adjustment, "CAPM expected return")
}

/// Input for asset-versus-market risk analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRiskInput {
    /// Periodic returns of the asset (as decimals)
    pub asset_returns: Vec<Rate>,
    /// Market returns over the same periods
    pub market_returns: Vec<Rate>,
    /// Per-period risk-free rate
    pub risk_free_rate: Rate,
}

/// Output of asset-versus-market risk analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRiskOutput {
    pub beta: Decimal,
    pub capm_expected_return: Rate,
    pub asset_mean_return: Rate,
    pub market_mean_return: Rate,
    /// Realised mean minus CAPM expected return (Jensen's alpha)
    pub alpha: Rate,
    /// None when the asset has zero volatility
    pub sharpe_ratio: Option<Decimal>,
    /// None when the asset has zero volatility
    pub correlation: Option<Decimal>,
}

/// Analyse an asset against the market: beta, CAPM expected return, alpha,
/// Sharpe ratio and correlation.
pub fn analyse_market_risk(
    input: &MarketRiskInput,
) -> FinanceResult<ComputationOutput<MarketRiskOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    ensure_same_length(
        &input.asset_returns,
        "asset_returns",
        &input.market_returns,
        "market_returns",
    )?;

    let beta_value = beta(&input.asset_returns, &input.market_returns)?;
    let capm_expected_return = expected_return_capm(
        input.risk_free_rate,
        &input.asset_returns,
        &input.market_returns,
    )?;
    let asset_mean_return = mean_of(&input.asset_returns, "asset_returns")?;
    let market_mean_return = mean_of(&input.market_returns, "market_returns")?;
    let alpha = math::sub(asset_mean_return, capm_expected_return, "alpha")?;

    let asset_std = std_dev_of(&input.asset_returns, "asset_returns")?;
    let (sharpe, correlation) = if asset_std.is_zero() {
        warnings.push("Asset has zero volatility; Sharpe ratio and correlation are undefined".into());
        (None, None)
    } else {
        let market_std = std_dev_of(&input.market_returns, "market_returns")?;
        let cov = covariance_of(
            &input.asset_returns,
            "asset_returns",
            &input.market_returns,
            "market_returns",
        )?;
        let denominator = math::mul(asset_std, market_std, "correlation")?;
        (
            Some(sharpe_ratio(&input.asset_returns, input.risk_free_rate)?),
            Some(math::div(cov, denominator, "correlation")?),
        )
    };

    if input.asset_returns.len() < 12 {
        warnings.push(format!(
            "Only {} observations; beta estimate is unreliable",
            input.asset_returns.len()
        ));
    }

    let output = MarketRiskOutput {
        beta: beta_value,
        capm_expected_return,
        asset_mean_return,
        market_mean_return,
        alpha,
        sharpe_ratio: sharpe,
        correlation,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Market Risk (CAPM beta, Jensen's alpha, Sharpe ratio)",
        &serde_json::json!({
            "observations": input.asset_returns.len(),
            "risk_free_rate": input.risk_free_rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

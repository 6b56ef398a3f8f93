//! Descriptive statistics over return series.
//!
//! Every estimator here is the population form: sums of squares and
//! cross-products are divided by N, not N - 1.

use rust_decimal::Decimal;

use crate::error::FinanceError;
use crate::math;
use crate::types::Rate;
use crate::FinanceResult;

/// Arithmetic mean of a return series
pub fn mean_return(returns: &[Rate]) -> FinanceResult<Rate> {
    mean_of(returns, "returns")
}

/// Population variance: sum((x - mean)^2) / N
pub fn variance(returns: &[Rate]) -> FinanceResult<Decimal> {
    variance_of(returns, "returns")
}

/// Population standard deviation
pub fn standard_deviation(returns: &[Rate]) -> FinanceResult<Decimal> {
    std_dev_of(returns, "returns")
}

/// Population covariance between two equally long return series
pub fn covariance(returns1: &[Rate], returns2: &[Rate]) -> FinanceResult<Decimal> {
    covariance_of(returns1, "returns1", returns2, "returns2")
}

/// Pearson correlation: cov(x, y) / (std(x) * std(y))
///
/// A series with zero volatility has no defined correlation and is reported as
/// a division by zero.
pub fn correlation(returns1: &[Rate], returns2: &[Rate]) -> FinanceResult<Decimal> {
    let cov = covariance(returns1, returns2)?;
    let std1 = std_dev_of(returns1, "returns1")?;
    let std2 = std_dev_of(returns2, "returns2")?;
    let denominator = math::mul(std1, std2, "correlation")?;
    math::div(cov, denominator, "correlation (zero standard deviation)")
}

pub(crate) fn mean_of(data: &[Decimal], field: &str) -> FinanceResult<Decimal> {
    ensure_non_empty(data, field)?;
    let mut sum = Decimal::ZERO;
    for x in data {
        sum = math::add(sum, *x, "mean")?;
    }
    math::div(sum, Decimal::from(data.len() as i64), "mean")
}

pub(crate) fn variance_of(data: &[Decimal], field: &str) -> FinanceResult<Decimal> {
    covariance_of(data, field, data, field)
}

pub(crate) fn std_dev_of(data: &[Decimal], field: &str) -> FinanceResult<Decimal> {
    let var = variance_of(data, field)?;
    math::sqrt(var, "standard deviation")
}

pub(crate) fn covariance_of(
    x: &[Decimal],
    x_field: &str,
    y: &[Decimal],
    y_field: &str,
) -> FinanceResult<Decimal> {
    ensure_same_length(x, x_field, y, y_field)?;
    let x_mean = mean_of(x, x_field)?;
    let y_mean = mean_of(y, y_field)?;

    let mut sum = Decimal::ZERO;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = math::sub(*xi, x_mean, "covariance")?;
        let dy = math::sub(*yi, y_mean, "covariance")?;
        let product = math::mul(dx, dy, "covariance")?;
        sum = math::add(sum, product, "covariance")?;
    }
    math::div(sum, Decimal::from(x.len() as i64), "covariance")
}

pub(crate) fn ensure_non_empty(data: &[Decimal], field: &str) -> FinanceResult<()> {
    if data.is_empty() {
        return Err(FinanceError::EmptyInput {
            field: field.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_same_length(
    x: &[Decimal],
    x_field: &str,
    y: &[Decimal],
    y_field: &str,
) -> FinanceResult<()> {
    ensure_non_empty(x, x_field)?;
    ensure_non_empty(y, y_field)?;
    if x.len() != y.len() {
        return Err(FinanceError::ShapeMismatch {
            left: x_field.to_string(),
            right: y_field.to_string(),
            left_len: x.len(),
            right_len: y.len(),
        });
    }
    Ok(())
}

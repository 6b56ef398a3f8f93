//! Checked Decimal arithmetic shared by the formula modules.
//!
//! `Decimal` has no infinities or NaN, so every operation that could leave the
//! representable range is routed through these helpers and reported as a
//! `FinanceError` instead of panicking.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::FinanceError;
use crate::FinanceResult;

pub(crate) fn div(numerator: Decimal, denominator: Decimal, context: &str) -> FinanceResult<Decimal> {
    if denominator.is_zero() {
        return Err(FinanceError::DivisionByZero {
            context: context.to_string(),
        });
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| overflow(context))
}

pub(crate) fn mul(a: Decimal, b: Decimal, context: &str) -> FinanceResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(context))
}

pub(crate) fn add(a: Decimal, b: Decimal, context: &str) -> FinanceResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(context))
}

pub(crate) fn sub(a: Decimal, b: Decimal, context: &str) -> FinanceResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| overflow(context))
}

/// Reciprocal discount factor 1 / (1 + rate).
///
/// Discounting multiplies by this factor so distant periods shrink toward
/// zero instead of dividing by a growth factor that can overflow.
pub(crate) fn discount_factor(rate: Decimal, context: &str) -> FinanceResult<Decimal> {
    let base = add(Decimal::ONE, rate, context)?;
    div(Decimal::ONE, base, context)
}

/// value * (1 + rate)^periods for any integer period count.
///
/// Negative periods raise the reciprocal factor rather than inverting the
/// positive power, so only a result that is itself out of range overflows.
/// A zero base with a negative exponent is a division by zero.
pub(crate) fn compound(value: Decimal, rate: Decimal, periods: i64, context: &str) -> FinanceResult<Decimal> {
    let mut square = if periods >= 0 {
        add(Decimal::ONE, rate, context)?
    } else {
        discount_factor(rate, context)?
    };
    let mut exponent = periods.unsigned_abs();
    let mut result = value;

    // Square-and-multiply with the value folded in from the start
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = mul(result, square, context)?;
        }
        exponent >>= 1;
        if exponent > 0 {
            square = mul(square, square, context)?;
        }
    }
    Ok(result)
}

pub(crate) fn sqrt(value: Decimal, context: &str) -> FinanceResult<Decimal> {
    if value.is_zero() {
        return Ok(Decimal::ZERO);
    }
    value.sqrt().ok_or_else(|| FinanceError::NumericDomain {
        context: format!("square root of {value} in {context}"),
    })
}

fn overflow(context: &str) -> FinanceError {
    FinanceError::NumericDomain {
        context: format!("{context} (result outside decimal range)"),
    }
}

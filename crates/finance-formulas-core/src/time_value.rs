use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinanceError;
use crate::math;
use crate::types::{Money, Rate};
use crate::FinanceResult;

pub const DEFAULT_IRR_GUESS: Decimal = dec!(0.1);
pub const CONVERGENCE_THRESHOLD: Decimal = dec!(0.000001);
pub const MAX_IRR_ITERATIONS: u32 = 100;

/// Newton-Raphson settings for [`irr_with_config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrConfig {
    /// Starting rate for the iteration
    pub guess: Rate,
    /// Upper bound on Newton steps
    pub max_iterations: u32,
    /// Stop once |NPV| falls below this value
    pub tolerance: Decimal,
}

impl Default for IrrConfig {
    fn default() -> Self {
        Self {
            guess: DEFAULT_IRR_GUESS,
            max_iterations: MAX_IRR_ITERATIONS,
            tolerance: CONVERGENCE_THRESHOLD,
        }
    }
}

impl IrrConfig {
    pub fn with_guess(mut self, guess: Rate) -> Self {
        self.guess = guess;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn validate(&self) -> FinanceResult<()> {
        if self.tolerance < Decimal::ZERO {
            return Err(FinanceError::InvalidInput {
                field: "tolerance".into(),
                reason: "Tolerance must be non-negative".into(),
            });
        }
        Ok(())
    }
}

/// Why the IRR iteration stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IrrTermination {
    /// |NPV| dropped below the tolerance
    Converged,
    /// The iteration budget ran out first
    Exhausted,
}

/// Result of the Newton-Raphson IRR search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrSolution {
    /// Rate after the final Newton step
    pub rate: Rate,
    /// Newton steps taken
    pub iterations: u32,
    pub termination: IrrTermination,
    /// NPV evaluated in the final iteration, before its update was applied.
    /// `None` when the budget was zero.
    pub last_npv: Option<Money>,
}

impl IrrSolution {
    pub fn is_converged(&self) -> bool {
        self.termination == IrrTermination::Converged
    }

    /// Rate if the search converged, otherwise a `ConvergenceFailure`.
    pub fn converged(self) -> FinanceResult<Rate> {
        match self.termination {
            IrrTermination::Converged => Ok(self.rate),
            IrrTermination::Exhausted => Err(FinanceError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: self.iterations,
                last_npv: self.last_npv.unwrap_or(Decimal::ZERO),
            }),
        }
    }
}

/// Future Value of a single sum: PV * (1 + r)^n
///
/// `periods` may be zero or negative. The rate is not range-checked; a rate of
/// -100% collapses the value to zero for positive periods and is a division
/// by zero for negative ones.
pub fn future_value(present_value: Money, rate: Rate, periods: i64) -> FinanceResult<Money> {
    math::compound(present_value, rate, periods, "future value")
}

/// Present Value of a single sum: FV / (1 + r)^n
///
/// Computed as FV * (1 / (1 + r))^n, so long horizons shrink toward zero
/// rather than overflowing the growth factor.
pub fn present_value(future_value: Money, rate: Rate, periods: i64) -> FinanceResult<Money> {
    let periods = periods.checked_neg().ok_or_else(|| FinanceError::NumericDomain {
        context: format!("present value over {periods} periods"),
    })?;
    math::compound(future_value, rate, periods, "present value")
}

/// Net Present Value of a series of cash flows.
///
/// Index 0 is period 0 and is not discounted, so an initial outlay belongs in
/// the first slot.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> FinanceResult<Money> {
    ensure_cash_flows(cash_flows)?;

    let mut result = cash_flows[0];
    if cash_flows.len() == 1 {
        return Ok(result);
    }

    let v = math::discount_factor(rate, "NPV discount factor at period 1")?;
    let mut discount = Decimal::ONE;

    for cf in &cash_flows[1..] {
        discount = math::mul(discount, v, "NPV discount factor")?;
        let present = math::mul(*cf, discount, "NPV discounting")?;
        result = math::add(result, present, "NPV sum")?;
    }

    Ok(result)
}

/// Internal Rate of Return with the default guess (10%), 100 iterations and
/// a tolerance of 1e-6.
///
/// Returns the last estimate even when the iteration budget runs out; use
/// [`irr_with_config`] to see how the search terminated.
pub fn irr(cash_flows: &[Money]) -> FinanceResult<Rate> {
    irr_with_config(cash_flows, &IrrConfig::default()).map(|solution| solution.rate)
}

/// Internal Rate of Return using Newton-Raphson on the NPV function.
///
/// The tolerance is tested against the NPV computed at the start of each
/// iteration, after that iteration's step has already been applied. The rate
/// returned on convergence is therefore one Newton step beyond the rate whose
/// NPV met the tolerance.
pub fn irr_with_config(cash_flows: &[Money], config: &IrrConfig) -> FinanceResult<IrrSolution> {
    ensure_cash_flows(cash_flows)?;
    config.validate()?;

    let mut rate = config.guess;
    let mut last_npv = None;

    for iteration in 1..=config.max_iterations {
        let npv_val = npv(rate, cash_flows)?;
        let dnpv = npv_derivative(rate, cash_flows)?;

        if dnpv.is_zero() {
            return Err(FinanceError::DivisionByZero {
                context: format!("IRR derivative at iteration {iteration} (rate {rate})"),
            });
        }

        let step = math::div(npv_val, dnpv, "IRR Newton step")?;
        rate = math::sub(rate, step, "IRR Newton step")?;
        last_npv = Some(npv_val);

        debug!("IRR iteration {iteration}: npv={npv_val} dnpv={dnpv} rate={rate}");

        if npv_val.abs() < config.tolerance {
            return Ok(IrrSolution {
                rate,
                iterations: iteration,
                termination: IrrTermination::Converged,
                last_npv,
            });
        }
    }

    warn!(
        "IRR did not converge within {} iterations; returning last estimate {rate}",
        config.max_iterations
    );

    Ok(IrrSolution {
        rate,
        iterations: config.max_iterations,
        termination: IrrTermination::Exhausted,
        last_npv,
    })
}

/// d(NPV)/d(rate) = sum of -t * CF_t / (1 + r)^(t + 1)
fn npv_derivative(rate: Rate, cash_flows: &[Money]) -> FinanceResult<Decimal> {
    if cash_flows.len() <= 1 {
        return Ok(Decimal::ZERO);
    }

    let v = math::discount_factor(rate, "NPV derivative discount factor")?;
    let mut dnpv = Decimal::ZERO;
    let mut discount = v;

    for (t, cf) in cash_flows.iter().enumerate().skip(1) {
        discount = math::mul(discount, v, "NPV derivative discount factor")?;
        let weighted = math::mul(Decimal::from(t as i64), *cf, "NPV derivative term")?;
        let term = math::mul(weighted, discount, "NPV derivative discounting")?;
        dnpv = math::sub(dnpv, term, "NPV derivative sum")?;
    }

    Ok(dnpv)
}

fn ensure_cash_flows(cash_flows: &[Money]) -> FinanceResult<()> {
    if cash_flows.is_empty() {
        return Err(FinanceError::EmptyInput {
            field: "cash_flows".into(),
        });
    }
    Ok(())
}

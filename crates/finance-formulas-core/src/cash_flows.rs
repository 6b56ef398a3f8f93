use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::math;
use crate::time_value::{irr_with_config, npv, IrrConfig, IrrSolution};
use crate::types::*;
use crate::FinanceResult;

/// Input for a periodic cash flow analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowAnalysisInput {
    /// Periodic cash flows (index 0 = period 0, typically the negative outlay)
    pub cash_flows: Vec<Money>,
    /// Discount rate per period for the NPV
    pub discount_rate: Rate,
    /// Newton-Raphson settings for the IRR search
    #[serde(default)]
    pub irr_config: IrrConfig,
}

/// Output of a periodic cash flow analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowAnalysisOutput {
    pub npv: Money,
    /// Plain sum of the flows (NPV at a 0% rate)
    pub undiscounted_total: Money,
    pub sign_changes: usize,
    /// None when the flows never change sign or the solver failed
    pub irr: Option<IrrSolution>,
}

/// NPV, undiscounted total and IRR of a periodic cash flow series.
///
/// IRR failures are reported as warnings rather than errors so the NPV is
/// still returned.
pub fn analyse_cash_flows(
    input: &CashFlowAnalysisInput,
) -> FinanceResult<ComputationOutput<CashFlowAnalysisOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let npv_value = npv(input.discount_rate, &input.cash_flows)?;

    let mut undiscounted_total = Decimal::ZERO;
    for cf in &input.cash_flows {
        undiscounted_total = math::add(undiscounted_total, *cf, "undiscounted total")?;
    }

    let sign_changes = count_sign_changes(&input.cash_flows);
    let irr = if sign_changes == 0 {
        warnings.push("Cash flows never change sign; IRR is undefined".into());
        None
    } else {
        if sign_changes > 1 {
            warnings.push(format!(
                "Cash flows change sign {sign_changes} times; IRR may not be unique"
            ));
        }
        match irr_with_config(&input.cash_flows, &input.irr_config) {
            Ok(solution) => {
                if !solution.is_converged() {
                    warnings.push(format!(
                        "IRR did not converge within {} iterations; last estimate reported",
                        solution.iterations
                    ));
                }
                Some(solution)
            }
            Err(e) => {
                warnings.push(format!("IRR calculation warning: {e}"));
                None
            }
        }
    };

    let output = CashFlowAnalysisOutput {
        npv: npv_value,
        undiscounted_total,
        sign_changes,
        irr,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Discounted Cash Flow (NPV, Newton-Raphson IRR)",
        &serde_json::json!({
            "periods": input.cash_flows.len(),
            "discount_rate": input.discount_rate.to_string(),
            "irr_guess": input.irr_config.guess.to_string(),
            "irr_max_iterations": input.irr_config.max_iterations,
            "irr_tolerance": input.irr_config.tolerance.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Sign changes between consecutive non-zero flows
fn count_sign_changes(cash_flows: &[Money]) -> usize {
    let mut changes = 0;
    let mut previous: Option<bool> = None;
    for cf in cash_flows.iter().filter(|cf| !cf.is_zero()) {
        let negative = cf.is_sign_negative();
        if let Some(prev) = previous {
            if prev != negative {
                changes += 1;
            }
        }
        previous = Some(negative);
    }
    changes
}

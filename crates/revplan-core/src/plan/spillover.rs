use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::plan::grid::MONTHS_PER_YEAR;
use crate::plan::period::{deserialize_optional, ContractPeriod};
use crate::types::{month_index_of, with_metadata, ComputationOutput, Money};

/// Portion of a contract that lands after the current fiscal year ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FySpillover {
    pub amount: Money,
    pub months: u32,
    pub has_spillover: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpilloverInput {
    #[serde(alias = "contractValue")]
    pub contract_value: Money,
    /// `YYYY-MM`, or empty
    #[serde(default, alias = "closeMonth")]
    pub close_month: String,
    #[serde(default, alias = "contractPeriod", deserialize_with = "deserialize_optional")]
    pub period: Option<ContractPeriod>,
}

/// FY+1 spillover estimate for display.
///
/// Uses `floor(contract_value / period)` per month. This is independent of
/// the allocated grid and can be lower than it by up to `period - 1`.
pub fn fy_spillover(
    contract_value: Money,
    close_month: &str,
    period: Option<ContractPeriod>,
) -> FySpillover {
    let none = FySpillover::default();
    let Some(period) = period else {
        return none;
    };
    if contract_value <= 0 || close_month.trim().is_empty() {
        return none;
    }
    let Some(month_index) = month_index_of(close_month) else {
        return none;
    };

    let effective = period.effective_months() as i64;
    let remaining_in_year = (MONTHS_PER_YEAR - month_index) as i64;
    let spill_months = (effective - remaining_in_year).max(0);
    if spill_months == 0 {
        return none;
    }

    let monthly = contract_value / effective;
    FySpillover {
        amount: monthly * spill_months,
        months: spill_months as u32,
        has_spillover: true,
    }
}

/// [`fy_spillover`] in the standard output envelope.
pub fn calculate_spillover(input: &SpilloverInput) -> ComputationOutput<FySpillover> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = fy_spillover(input.contract_value, &input.close_month, input.period);

    if !input.close_month.trim().is_empty() && month_index_of(&input.close_month).is_none() {
        warnings.push(format!(
            "Close month '{}' has no valid month; no spillover computed",
            input.close_month
        ));
    }
    if let Some(period) = input.period {
        let effective = period.effective_months() as Money;
        if result.has_spillover && input.contract_value % effective != 0 {
            warnings.push(format!(
                "Contract value does not divide evenly over {effective} months; \
                 monthly amount truncated by {}",
                input.contract_value % effective
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "FY+1 spillover: floor(contract value / period) x months past fiscal year end",
        &serde_json::json!({
            "contract_value": input.contract_value,
            "close_month": input.close_month,
            "contract_period": input.period.map(|p| p.to_string()),
        }),
        warnings,
        elapsed,
        result,
    )
}

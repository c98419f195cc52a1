use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::plan::grid::{RevenueGrid, MONTHS_PER_YEAR, MONTH_LABELS, PLAN_YEARS};
use crate::types::{sum_money, with_metadata, ComputationOutput, Money};

/// Quarter, half-year and fiscal-year totals of one 12-month plan.
///
/// `q1 + q2 + q3 + q4 == h1 + h2 == fy`, exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub q1: Money,
    pub q2: Money,
    pub q3: Money,
    pub q4: Money,
    pub h1: Money,
    pub h2: Money,
    pub fy: Money,
}

impl RevenueSummary {
    pub fn quarters(&self) -> [Money; 4] {
        [self.q1, self.q2, self.q3, self.q4]
    }
}

/// Summary of one plan year (1-based).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: usize,
    #[serde(flatten)]
    pub summary: RevenueSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSummary {
    pub years: Vec<YearSummary>,
    /// Sum of all 60 months
    pub contract_value: Money,
}

pub fn summarize(months: &[Money; MONTHS_PER_YEAR]) -> RevenueSummary {
    let quarter = |q: usize| -> Money { sum_money(months[q * 3..q * 3 + 3].iter().copied()) };
    let (q1, q2, q3, q4) = (quarter(0), quarter(1), quarter(2), quarter(3));
    let h1 = q1.saturating_add(q2);
    let h2 = q3.saturating_add(q4);
    RevenueSummary {
        q1,
        q2,
        q3,
        q4,
        h1,
        h2,
        fy: h1.saturating_add(h2),
    }
}

/// Per-year summaries for the whole horizon plus the contract value.
pub fn summarize_grid(grid: &RevenueGrid) -> GridSummary {
    let years: Vec<YearSummary> = (0..PLAN_YEARS)
        .map(|y| YearSummary {
            year: y + 1,
            summary: summarize(&grid.year(y)),
        })
        .collect();
    GridSummary {
        contract_value: sum_money(years.iter().map(|y| y.summary.fy)),
        years,
    }
}

/// Twelve monthly amounts, January first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryInput {
    pub months: [Money; MONTHS_PER_YEAR],
}

/// [`summarize`] in the standard output envelope.
pub fn summarize_plan(input: &SummaryInput) -> ComputationOutput<RevenueSummary> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let negative: Vec<&str> = input
        .months
        .iter()
        .zip(MONTH_LABELS)
        .filter(|(v, _)| **v < 0)
        .map(|(_, label)| label)
        .collect();
    if !negative.is_empty() {
        warnings.push(format!("Negative amounts in {}", negative.join(", ")));
    }

    let result = summarize(&input.months);
    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Quarter, half-year and FY totals of a 12-month plan",
        &serde_json::json!({ "months": input.months.len() }),
        warnings,
        elapsed,
        result,
    )
}

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::plan::grid::{slot_index, RevenueGrid, MONTHS_PER_YEAR, PLAN_YEARS};
use crate::plan::period::{deserialize_optional, ContractPeriod};
use crate::plan::spillover::{fy_spillover, FySpillover};
use crate::plan::summary::{summarize_grid, YearSummary};
use crate::types::{month_index_of, with_metadata, ComputationOutput, Money};

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A one-time charge booked into a single month of year 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneTimeCharge {
    /// Target month, `YYYY-MM`. Only the month component is used.
    #[serde(default, alias = "closeMonth")]
    pub close_month: String,
    #[serde(default)]
    pub amount: Money,
}

impl OneTimeCharge {
    pub fn new(close_month: impl Into<String>, amount: Money) -> Self {
        OneTimeCharge {
            close_month: close_month.into(),
            amount,
        }
    }
}

/// Recurring part of a contract: a flat monthly amount from the start month on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringContract {
    /// Start (close) month, `YYYY-MM`, or empty when not yet chosen.
    #[serde(default, alias = "closeMonth", alias = "startMonth")]
    pub start_month: String,
    #[serde(default, alias = "monthlyAmount")]
    pub monthly_amount: Money,
    /// `None` until a period is picked. The spread then assumes 12 months.
    #[serde(default, alias = "contractPeriod", deserialize_with = "deserialize_optional")]
    pub period: Option<ContractPeriod>,
}

impl RecurringContract {
    pub fn new(
        start_month: impl Into<String>,
        monthly_amount: Money,
        period: ContractPeriod,
    ) -> Self {
        RecurringContract {
            start_month: start_month.into(),
            monthly_amount,
            period: Some(period),
        }
    }

    /// Period the spread runs over, with the 12-month fallback for an unset picker.
    pub fn effective_period(&self) -> ContractPeriod {
        self.period.unwrap_or_default()
    }

    /// Contributes nothing: no start month or nothing to spread.
    pub fn is_inactive(&self) -> bool {
        self.start_month.trim().is_empty() || self.monthly_amount <= 0
    }
}

/// Everything the auto-spread reads from the entry form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationInput {
    #[serde(default, alias = "otcEntries")]
    pub otc_entries: Vec<OneTimeCharge>,
    #[serde(flatten)]
    pub recurring: RecurringContract,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Full auto-spread result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutput {
    /// 60 monthly amounts, year 1 January first
    pub grid: RevenueGrid,
    /// Quarter / half / FY totals per plan year
    pub years: Vec<YearSummary>,
    /// Sum of all 60 slots
    pub contract_value: Money,
    /// Advisory FY+1 spillover of the recurring contract
    pub fy_spillover: FySpillover,
}

/// What the allocator silently skipped on one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationTrace {
    /// Indices of OTC entries that carried an amount but no usable month
    pub dropped_otc: Vec<usize>,
    /// Recurring months that fell past year 5
    pub truncated_months: usize,
    /// Start month was set but had no usable month component
    pub unreadable_start: bool,
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

/// Rebuild the 60-month plan from OTC entries and the recurring contract.
///
/// Never fails: unusable entries contribute nothing.
pub fn allocate(otc_entries: &[OneTimeCharge], recurring: &RecurringContract) -> RevenueGrid {
    let mut grid = RevenueGrid::new();
    allocate_into(&mut grid, otc_entries, recurring);
    grid
}

/// Reset `grid` and allocate into it, reporting what was skipped.
pub fn allocate_into(
    grid: &mut RevenueGrid,
    otc_entries: &[OneTimeCharge],
    recurring: &RecurringContract,
) -> AllocationTrace {
    grid.clear();
    let mut trace = AllocationTrace {
        dropped_otc: apply_one_time_charges(grid, otc_entries),
        ..AllocationTrace::default()
    };

    if !recurring.is_inactive() {
        match month_index_of(&recurring.start_month) {
            Some(start) => {
                trace.truncated_months = spread_recurring(
                    grid,
                    start,
                    recurring.monthly_amount,
                    recurring.effective_period().capped_months(),
                );
            }
            None => trace.unreadable_start = true,
        }
    }

    debug!(
        otc_entries = otc_entries.len(),
        dropped_otc = trace.dropped_otc.len(),
        truncated_months = trace.truncated_months,
        contract_value = grid.total(),
        "revenue plan reallocated"
    );
    trace
}

/// Add each usable OTC amount into its year-1 month. Returns the indices of
/// entries that had an amount but no month in 1..=12.
fn apply_one_time_charges(grid: &mut RevenueGrid, otc_entries: &[OneTimeCharge]) -> Vec<usize> {
    let mut dropped = Vec::new();
    for (i, otc) in otc_entries.iter().enumerate() {
        if otc.close_month.trim().is_empty() || otc.amount <= 0 {
            continue;
        }
        match month_index_of(&otc.close_month) {
            Some(month) => grid.add(month, otc.amount),
            None => dropped.push(i),
        }
    }
    dropped
}

/// Add `monthly_amount` to `months` consecutive slots from `start_index`,
/// wrapping into later years. Returns how many months fell past year 5.
fn spread_recurring(
    grid: &mut RevenueGrid,
    start_index: usize,
    monthly_amount: Money,
    months: usize,
) -> usize {
    let mut truncated = 0;
    for i in 0..months {
        let absolute = start_index + i;
        let year_offset = absolute / MONTHS_PER_YEAR;
        let month_in_year = absolute % MONTHS_PER_YEAR;
        match slot_index(year_offset, month_in_year) {
            Some(slot) => grid.add(slot, monthly_amount),
            None => truncated += 1,
        }
    }
    truncated
}

/// Auto-spread with per-year summaries, contract value and FY spillover,
/// wrapped in the standard output envelope.
pub fn allocate_plan(input: &AllocationInput) -> ComputationOutput<AllocationOutput> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut grid = RevenueGrid::new();
    let trace = allocate_into(&mut grid, &input.otc_entries, &input.recurring);

    for i in &trace.dropped_otc {
        warnings.push(format!(
            "OTC entry {} has no valid month in '{}'; amount ignored",
            i + 1,
            input.otc_entries[*i].close_month
        ));
    }
    if trace.unreadable_start {
        warnings.push(format!(
            "Close month '{}' has no valid month; recurring amount not spread",
            input.recurring.start_month
        ));
    }
    if trace.truncated_months > 0 {
        warnings.push(format!(
            "{} recurring month(s) fall beyond the {}-year plan horizon and were dropped",
            trace.truncated_months, PLAN_YEARS
        ));
    }

    let summary = summarize_grid(&grid);
    let contract_value = summary.contract_value;
    let close_month = input.recurring.start_month.as_str();
    let fy_spillover = fy_spillover(contract_value, close_month, input.recurring.period);

    if fy_spillover.has_spillover {
        let recurring_after_fy1 = grid.slots()[MONTHS_PER_YEAR..]
            .iter()
            .fold(0, |acc: Money, v| acc.saturating_add(*v));
        if recurring_after_fy1 != fy_spillover.amount {
            warnings.push(format!(
                "FY spillover estimate ({}) differs from plan beyond year 1 ({})",
                fy_spillover.amount, recurring_after_fy1
            ));
        }
    }

    let output = AllocationOutput {
        grid,
        years: summary.years,
        contract_value,
        fy_spillover,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Revenue plan auto-spread: OTC into year 1, \
         recurring amount from close month over contract period",
        &serde_json::json!({
            "otc_entries": input.otc_entries.len(),
            "close_month": input.recurring.start_month,
            "monthly_amount": input.recurring.monthly_amount,
            "contract_period": input.recurring.period.map(|p| p.to_string()),
            "horizon_months": PLAN_YEARS * MONTHS_PER_YEAR,
        }),
        warnings,
        elapsed,
        output,
    )
}

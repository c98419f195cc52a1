use serde::Serialize;

use crate::plan::allocation::{allocate_into, AllocationTrace, OneTimeCharge, RecurringContract};
use crate::plan::grid::{RevenueGrid, MONTHS_PER_YEAR};
use crate::plan::period::ContractPeriod;
use crate::plan::spillover::{fy_spillover, FySpillover};
use crate::plan::summary::{summarize, RevenueSummary};
use crate::types::Money;

/// Revenue-plan state of the pipeline entry form.
///
/// Every mutator recomputes the grid and the contract value from scratch,
/// so the contract value can never drift from the plan it is derived from.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanEditor {
    otc_entries: Vec<OneTimeCharge>,
    recurring: RecurringContract,
    grid: RevenueGrid,
    contract_value: Money,
    #[serde(skip)]
    last_trace: AllocationTrace,
}

impl PlanEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs(otc_entries: Vec<OneTimeCharge>, recurring: RecurringContract) -> Self {
        let mut editor = PlanEditor {
            otc_entries,
            recurring,
            ..Self::default()
        };
        editor.recompute();
        editor
    }

    /// Reallocate the grid and refresh the contract value.
    pub fn recompute(&mut self) {
        self.last_trace = allocate_into(&mut self.grid, &self.otc_entries, &self.recurring);
        self.contract_value = self.grid.total();
    }

    pub fn add_otc(&mut self, entry: OneTimeCharge) {
        self.otc_entries.push(entry);
        self.recompute();
    }

    /// Remove the OTC entry at `index`. Out-of-range indices are ignored.
    pub fn remove_otc(&mut self, index: usize) -> Option<OneTimeCharge> {
        if index >= self.otc_entries.len() {
            return None;
        }
        let removed = self.otc_entries.remove(index);
        self.recompute();
        Some(removed)
    }

    /// Replace the OTC entry at `index`. Returns false when there is none.
    pub fn update_otc(&mut self, index: usize, entry: OneTimeCharge) -> bool {
        match self.otc_entries.get_mut(index) {
            Some(slot) => {
                *slot = entry;
                self.recompute();
                true
            }
            None => false,
        }
    }

    pub fn set_close_month(&mut self, close_month: impl Into<String>) {
        self.recurring.start_month = close_month.into();
        self.recompute();
    }

    pub fn set_monthly_amount(&mut self, amount: Money) {
        self.recurring.monthly_amount = amount;
        self.recompute();
    }

    pub fn set_contract_period(&mut self, period: ContractPeriod) {
        self.recurring.period = Some(period);
        self.recompute();
    }

    pub fn otc_entries(&self) -> &[OneTimeCharge] {
        &self.otc_entries
    }

    pub fn recurring(&self) -> &RecurringContract {
        &self.recurring
    }

    pub fn grid(&self) -> &RevenueGrid {
        &self.grid
    }

    pub fn contract_value(&self) -> Money {
        self.contract_value
    }

    pub fn last_trace(&self) -> &AllocationTrace {
        &self.last_trace
    }

    /// `jan` .. `dec_y5` output fields with their current amounts.
    pub fn month_fields(&self) -> Vec<(String, Money)> {
        self.grid.month_fields()
    }

    /// Year-1 plan, the slice that is persisted.
    pub fn year_one(&self) -> [Money; MONTHS_PER_YEAR] {
        self.grid.year(0)
    }

    /// Summary of plan year `year` (1-based). Years outside 1..=5 are all zero.
    pub fn year_summary(&self, year: usize) -> RevenueSummary {
        match year.checked_sub(1) {
            Some(offset) => summarize(&self.grid.year(offset)),
            None => RevenueSummary::default(),
        }
    }

    pub fn fy_spillover(&self) -> FySpillover {
        fy_spillover(
            self.contract_value,
            &self.recurring.start_month,
            self.recurring.period,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_value_tracks_every_edit() {
        let mut editor = PlanEditor::new();
        assert_eq!(editor.contract_value(), 0);

        editor.set_close_month("2026-04");
        assert_eq!(editor.contract_value(), 0);

        editor.set_monthly_amount(1_000);
        assert_eq!(editor.contract_value(), 12_000);

        editor.set_contract_period(ContractPeriod::Months(24));
        assert_eq!(editor.contract_value(), 24_000);

        editor.add_otc(OneTimeCharge::new("2026-01", 5_000));
        assert_eq!(editor.contract_value(), 29_000);
        assert_eq!(editor.year_one()[0], 5_000);

        editor.update_otc(0, OneTimeCharge::new("2026-02", 6_000));
        assert_eq!(editor.year_one()[0], 0);
        assert_eq!(editor.year_one()[1], 6_000);
        assert_eq!(editor.contract_value(), 30_000);

        assert!(editor.remove_otc(0).is_some());
        assert_eq!(editor.contract_value(), 24_000);
        assert!(editor.remove_otc(0).is_none());
    }

    #[test]
    fn test_one_time_period_collapses_spread() {
        let editor = PlanEditor::with_inputs(
            vec![],
            RecurringContract::new("2026-09", 7_500, ContractPeriod::OneTime),
        );
        assert_eq!(editor.contract_value(), 7_500);
        assert_eq!(editor.year_one()[8], 7_500);
    }

    #[test]
    fn test_month_fields_and_year_summary() {
        let editor = PlanEditor::with_inputs(
            vec![],
            RecurringContract::new("2026-11", 100, ContractPeriod::Months(3)),
        );
        let fields = editor.month_fields();
        assert_eq!(fields.len(), 60);
        assert_eq!(fields[10], ("nov".to_string(), 100));
        assert_eq!(fields[12], ("jan_y2".to_string(), 100));
        assert_eq!(editor.year_summary(1).q4, 200);
        assert_eq!(editor.year_summary(2).q1, 100);
        assert_eq!(editor.year_summary(0), RevenueSummary::default());
        assert_eq!(editor.year_summary(9), RevenueSummary::default());
    }

    #[test]
    fn test_spillover_uses_derived_contract_value() {
        let editor = PlanEditor::with_inputs(
            vec![],
            RecurringContract::new("2026-07", 1_000_000, ContractPeriod::Months(12)),
        );
        let s = editor.fy_spillover();
        assert!(s.has_spillover);
        assert_eq!(s.months, 6);
        assert_eq!(s.amount, 6_000_000);
    }

    #[test]
    fn test_unset_period_spreads_but_reports_no_spillover() {
        let mut editor = PlanEditor::new();
        editor.set_close_month("2026-07");
        editor.set_monthly_amount(1_000_000);
        assert_eq!(editor.recurring().period, None);
        assert_eq!(editor.contract_value(), 12_000_000);
        assert_eq!(editor.fy_spillover(), FySpillover::default());

        editor.set_contract_period(ContractPeriod::Months(12));
        assert_eq!(editor.fy_spillover().amount, 6_000_000);
    }

    #[test]
    fn test_update_out_of_range_is_noop() {
        let mut editor = PlanEditor::new();
        assert!(!editor.update_otc(3, OneTimeCharge::new("2026-01", 1)));
        assert!(editor.grid().is_empty());
    }
}

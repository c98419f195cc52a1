//! Revenue-plan auto-spread: the 60-month grid, its allocation from OTC and
//! recurring inputs, period/year summaries and the FY+1 spillover estimate.

pub mod allocation;
pub mod editor;
pub mod grid;
pub mod period;
pub mod spillover;
pub mod summary;

pub use allocation::{allocate, allocate_plan, AllocationInput, OneTimeCharge, RecurringContract};
pub use editor::PlanEditor;
pub use grid::RevenueGrid;
pub use period::ContractPeriod;
pub use spillover::{calculate_spillover, fy_spillover, FySpillover, SpilloverInput};
pub use summary::{summarize, summarize_plan, RevenueSummary, SummaryInput};

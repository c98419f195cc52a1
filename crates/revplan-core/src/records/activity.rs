use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::pipeline::filter::{distinct_values, paginate, Page};
use crate::plan::grid::MONTH_LABELS;
use crate::types::{month_index_of, sum_money, with_metadata, ComputationOutput, Money};
use crate::RevPlanResult;

/// Rows per activity/highlight table page.
pub const RECORDS_PAGE_SIZE: usize = 10;

/// A presales visit or meeting logged by an SE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPlan {
    #[serde(default)]
    pub id: String,
    pub se_name: String,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub opportunity_name: Option<String>,
    pub activity_date: NaiveDate,
    #[serde(default)]
    pub am_name: Option<String>,
    #[serde(default)]
    pub agenda: Option<String>,
    #[serde(default)]
    pub solution_offer: Option<String>,
    #[serde(default)]
    pub contract_value: Money,
    /// Year-1 revenue plan quoted during the activity
    #[serde(default)]
    pub rev_plan_fy: Money,
    /// `YYYY-MM`
    #[serde(default)]
    pub est_close_month: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub next_action: Option<String>,
    #[serde(default)]
    pub pipeline_entry_id: Option<String>,
}

/// `2026-01` → `Jan-26`. Unreadable input comes back unchanged, missing as `-`.
pub fn close_month_label(month: Option<&str>) -> String {
    let Some(raw) = month.filter(|m| !m.is_empty()) else {
        return "-".to_string();
    };
    let year = raw.split('-').next().unwrap_or_default();
    match month_index_of(raw) {
        Some(idx) if !year.is_empty() && year.is_ascii() => {
            let short = &year[year.len().saturating_sub(2)..];
            format!("{}-{}", MONTH_LABELS[idx], short)
        }
        _ => raw.to_string(),
    }
}

pub(crate) fn contains_ci(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| f.to_lowercase().contains(needle))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityFilter {
    /// Case-insensitive match on SE, account, opportunity, AM or agenda
    pub search: String,
    pub est_close_month: Option<String>,
}

impl ActivityFilter {
    pub fn matches(&self, plan: &ActivityPlan) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || contains_ci(Some(plan.se_name.as_str()), &needle)
            || contains_ci(plan.account_name.as_deref(), &needle)
            || contains_ci(plan.opportunity_name.as_deref(), &needle)
            || contains_ci(plan.am_name.as_deref(), &needle)
            || contains_ci(plan.agenda.as_deref(), &needle);

        let matches_month = match &self.est_close_month {
            None => true,
            Some(m) => plan.est_close_month.as_deref() == Some(m.as_str()),
        };

        matches_search && matches_month
    }
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    RECORDS_PAGE_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityQuery {
    pub activities: Vec<ActivityPlan>,
    #[serde(default)]
    pub filter: ActivityFilter,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub per_page: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityQueryOutput {
    pub page: Page<ActivityPlan>,
    pub matched: usize,
    pub matched_contract_value: Money,
    pub matched_rev_plan: Money,
    /// Sorted close months present in the data
    pub close_months: Vec<String>,
}

pub fn query_activities(
    input: &ActivityQuery,
) -> RevPlanResult<ComputationOutput<ActivityQueryOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let matched: Vec<ActivityPlan> = input
        .activities
        .iter()
        .filter(|a| input.filter.matches(a))
        .cloned()
        .collect();
    if matched.is_empty() && !input.activities.is_empty() {
        warnings.push("No activities match the current filters".to_string());
    }

    let output = ActivityQueryOutput {
        matched: matched.len(),
        matched_contract_value: sum_money(matched.iter().map(|a| a.contract_value)),
        matched_rev_plan: sum_money(matched.iter().map(|a| a.rev_plan_fy)),
        close_months: distinct_values(&input.activities, |a| {
            a.est_close_month.as_deref().unwrap_or_default()
        }),
        page: paginate(&matched, input.page, input.per_page)?,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Activity plan table filter and pagination",
        &serde_json::json!({
            "activities": input.activities.len(),
            "page": input.page,
            "per_page": input.per_page,
        }),
        warnings,
        elapsed,
        output,
    ))
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;

use crate::error::RevPlanError;
use crate::pipeline::entry::{PipelineEntry, Stage};
use crate::types::{sum_money, with_metadata, ComputationOutput, Money};
use crate::RevPlanResult;

/// Rows per table page.
pub const DEFAULT_PAGE_SIZE: usize = 15;

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionFilter {
    #[default]
    All,
    Complete,
    Incomplete,
}

/// Table filters. `None` means "all".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineFilter {
    /// Case-insensitive match on account, opportunity, AM or SE name
    pub search: String,
    pub stage: Option<Stage>,
    pub am_name: Option<String>,
    pub se_name: Option<String>,
    pub close_month: Option<String>,
    pub pilar: Option<String>,
    pub account_name: Option<String>,
    pub completion: CompletionFilter,
}

fn exact(filter: &Option<String>, value: &str) -> bool {
    filter.as_deref().map_or(true, |f| f == value)
}

impl PipelineFilter {
    pub fn matches(&self, entry: &PipelineEntry) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || [
                &entry.account_name,
                &entry.opportunity_name,
                &entry.am_name,
                &entry.se_name,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));

        let matches_completion = match self.completion {
            CompletionFilter::All => true,
            CompletionFilter::Complete => entry.is_complete(),
            CompletionFilter::Incomplete => !entry.is_complete(),
        };

        matches_search
            && self.stage.map_or(true, |s| s == entry.stage)
            && exact(&self.am_name, &entry.am_name)
            && exact(&self.se_name, &entry.se_name)
            && exact(&self.close_month, &entry.close_month)
            && exact(&self.pilar, &entry.pilar)
            && exact(&self.account_name, &entry.account_name)
            && matches_completion
    }

    pub fn apply<'a>(&self, entries: &'a [PipelineEntry]) -> Vec<&'a PipelineEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }

    /// Dropdown filters currently narrowing the table (search excluded).
    pub fn active_filter_count(&self) -> usize {
        [
            self.stage.is_some(),
            self.am_name.is_some(),
            self.se_name.is_some(),
            self.close_month.is_some(),
            self.pilar.is_some(),
            self.account_name.is_some(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    pub fn clear(&mut self) {
        *self = PipelineFilter::default();
    }
}

/// Sorted, de-duplicated, non-empty values of one field.
pub fn distinct_values<'a, T, F>(items: &'a [T], field: F) -> Vec<String>
where
    F: Fn(&'a T) -> &'a str,
{
    items
        .iter()
        .map(field)
        .filter(|v| !v.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Values offered by each filter dropdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptions {
    pub am_names: Vec<String>,
    pub se_names: Vec<String>,
    pub close_months: Vec<String>,
    pub pilars: Vec<String>,
    pub account_names: Vec<String>,
}

pub fn filter_options(entries: &[PipelineEntry]) -> FilterOptions {
    FilterOptions {
        am_names: distinct_values(entries, |e| e.am_name.as_str()),
        se_names: distinct_values(entries, |e| e.se_name.as_str()),
        close_months: distinct_values(entries, |e| e.close_month.as_str()),
        pilars: distinct_values(entries, |e| e.pilar.as_str()),
        account_names: distinct_values(entries, |e| e.account_name.as_str()),
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice out 1-based `page`. Page 1 of an empty list is an empty page;
/// any other page past the end is an error.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> RevPlanResult<Page<T>> {
    if per_page == 0 {
        return Err(RevPlanError::InvalidInput {
            field: "per_page".into(),
            reason: "Page size must be at least 1".into(),
        });
    }
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    if page == 0 || (page > total_pages && !(page == 1 && total_items == 0)) {
        return Err(RevPlanError::InvalidPage { page, total_pages });
    }
    let start = (page - 1) * per_page;
    let end = start.saturating_add(per_page).min(total_items);
    Ok(Page {
        items: items[start..end].to_vec(),
        page,
        per_page,
        total_pages,
        total_items,
    })
}

// ---------------------------------------------------------------------------
// Table query
// ---------------------------------------------------------------------------

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineQuery {
    pub entries: Vec<PipelineEntry>,
    #[serde(default)]
    pub filter: PipelineFilter,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub per_page: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineQueryOutput {
    pub page: Page<PipelineEntry>,
    pub matched: usize,
    pub active_filters: usize,
    /// Contract value of the matched entries
    pub matched_contract_value: Money,
    /// Year-1 FY revenue across all entries, unfiltered
    pub total_fy_revenue: Money,
    pub options: FilterOptions,
}

/// Filter and paginate the pipeline table.
pub fn query_pipeline(
    input: &PipelineQuery,
) -> RevPlanResult<ComputationOutput<PipelineQueryOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let matched: Vec<PipelineEntry> = input
        .filter
        .apply(&input.entries)
        .into_iter()
        .cloned()
        .collect();

    if matched.is_empty() && !input.entries.is_empty() {
        warnings.push("No entries match the current filters".to_string());
    }

    let matched_contract_value = sum_money(matched.iter().map(|e| e.contract_value));
    let page = paginate(&matched, input.page, input.per_page)?;

    let output = PipelineQueryOutput {
        matched: matched.len(),
        active_filters: input.filter.active_filter_count(),
        matched_contract_value,
        total_fy_revenue: sum_money(input.entries.iter().map(|e| e.fy_revenue())),
        options: filter_options(&input.entries),
        page,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Pipeline table filter and pagination",
        &serde_json::json!({
            "entries": input.entries.len(),
            "page": input.page,
            "per_page": input.per_page,
        }),
        warnings,
        elapsed,
        output,
    ))
}

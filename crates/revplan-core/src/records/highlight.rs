use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::pipeline::entry::Stage;
use crate::pipeline::filter::{paginate, Page};
use crate::records::activity::contains_ci;
use crate::types::{sum_money, with_metadata, ComputationOutput, Money};
use crate::RevPlanResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightStatus {
    #[default]
    #[serde(rename = "On Progress")]
    OnProgress,
    /// Stored spelling is "Complate"; the corrected form is accepted on input.
    #[serde(rename = "Complate", alias = "Complete")]
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightCategory {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeptInCharge {
    #[serde(rename = "AM")]
    Am,
    Product,
    Delivery,
}

/// An issue or win escalated from the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlight {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: Option<HighlightCategory>,
    #[serde(default)]
    pub related_account: Option<String>,
    #[serde(default)]
    pub related_opportunity: Option<String>,
    #[serde(default)]
    pub highlight_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: HighlightStatus,
    #[serde(default)]
    pub se_name: Option<String>,
    #[serde(default)]
    pub presales_lob: Option<String>,
    #[serde(default)]
    pub support_needed: Option<String>,
    #[serde(default)]
    pub dept_in_charge: Option<DeptInCharge>,
    #[serde(default)]
    pub potential_rev: Option<Money>,
    #[serde(default)]
    pub pipeline_entry_id: Option<String>,
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub creator_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightFilter {
    /// Case-insensitive match on title, account, opportunity, SE or creator
    pub search: String,
    pub status: Option<HighlightStatus>,
    pub category: Option<HighlightCategory>,
    pub stage: Option<Stage>,
}

impl HighlightFilter {
    pub fn matches(&self, h: &Highlight) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || contains_ci(Some(h.title.as_str()), &needle)
            || contains_ci(h.related_account.as_deref(), &needle)
            || contains_ci(h.related_opportunity.as_deref(), &needle)
            || contains_ci(h.se_name.as_deref(), &needle)
            || contains_ci(h.creator_name.as_deref(), &needle);

        matches_search
            && self.status.map_or(true, |s| s == h.status)
            && self.category.map_or(true, |c| h.category == Some(c))
            && self.stage.map_or(true, |s| h.stage == Some(s))
    }
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    super::activity::RECORDS_PAGE_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightQuery {
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub filter: HighlightFilter,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub per_page: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightQueryOutput {
    pub page: Page<Highlight>,
    pub matched: usize,
    pub on_progress: usize,
    pub complete: usize,
    pub matched_potential_rev: Money,
    /// Stages present in the data, first-seen order
    pub stages: Vec<Stage>,
}

pub fn query_highlights(
    input: &HighlightQuery,
) -> RevPlanResult<ComputationOutput<HighlightQueryOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let matched: Vec<Highlight> = input
        .highlights
        .iter()
        .filter(|h| input.filter.matches(h))
        .cloned()
        .collect();
    if matched.is_empty() && !input.highlights.is_empty() {
        warnings.push("No highlights match the current filters".to_string());
    }

    let mut stages: Vec<Stage> = Vec::new();
    for stage in input.highlights.iter().filter_map(|h| h.stage) {
        if !stages.contains(&stage) {
            stages.push(stage);
        }
    }

    let on_progress = matched
        .iter()
        .filter(|h| h.status == HighlightStatus::OnProgress)
        .count();

    let output = HighlightQueryOutput {
        matched: matched.len(),
        on_progress,
        complete: matched.len() - on_progress,
        matched_potential_rev: sum_money(matched.iter().filter_map(|h| h.potential_rev)),
        stages,
        page: paginate(&matched, input.page, input.per_page)?,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Highlight table filter and pagination",
        &serde_json::json!({
            "highlights": input.highlights.len(),
            "page": input.page,
            "per_page": input.per_page,
        }),
        warnings,
        elapsed,
        output,
    ))
}

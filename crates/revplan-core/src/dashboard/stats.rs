use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::dashboard::config::DashboardConfig;
use crate::format::format_compact;
use crate::pipeline::catalog::{PILARS, TOWERS};
use crate::pipeline::entry::{PipelineEntry, Stage};
use crate::pipeline::filter::{paginate, Page};
use crate::plan::grid::{MONTHS_PER_YEAR, MONTH_LABELS};
use crate::types::{sum_money, with_metadata, ComputationOutput, Money, Rate};
use crate::RevPlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Headline figures. Revenue figures use the year-1 plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub opportunities: usize,
    pub total_pipeline: Money,
    pub closed_won: Money,
    pub closed_won_count: usize,
    pub in_progress: Money,
    pub in_progress_count: usize,
    /// total_pipeline / opportunities
    pub avg_deal_size: Money,
    /// closed_won / fy_target
    pub target_achievement: Rate,
    pub fy_target: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTotal {
    pub stage: Stage,
    pub total: Money,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: Money,
    pub target: Money,
}

/// Grouping key for [`distribution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Pilar,
    Tower,
    Lob,
    ProductFamily,
}

impl Dimension {
    fn key<'a>(&self, entry: &'a PipelineEntry) -> &'a str {
        match self {
            Dimension::Pilar => entry.pilar.as_str(),
            Dimension::Tower => entry.tower.as_str(),
            Dimension::Lob => entry.presales_lob.as_str(),
            Dimension::ProductFamily => entry.product_family.as_str(),
        }
    }

    /// Buckets always shown, even when empty.
    fn canonical(&self) -> &'static [&'static str] {
        match self {
            Dimension::Pilar => &PILARS,
            Dimension::Tower => &TOWERS,
            Dimension::Lob | Dimension::ProductFamily => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionSlice {
    pub name: String,
    /// Sum of contract values
    pub value: Money,
    pub count: usize,
    /// value / sum of all slices
    pub share: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardInput {
    pub entries: Vec<PipelineEntry>,
    #[serde(default)]
    pub config: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOutput {
    pub stats: DashboardStats,
    /// Compact labels of the three stat cards
    pub labels: StatLabels,
    pub by_stage: Vec<StageTotal>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub by_pilar: Vec<DistributionSlice>,
    pub by_tower: Vec<DistributionSlice>,
    pub by_lob: Vec<DistributionSlice>,
    pub by_product_family: Vec<DistributionSlice>,
    /// First page of the pipeline table
    pub table: Page<PipelineEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatLabels {
    pub total_pipeline: String,
    pub closed_won: String,
    pub in_progress: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Safe ratio: returns Decimal::ZERO when the denominator is zero.
fn safe_ratio(numerator: Money, denominator: Money) -> Rate {
    if denominator == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(numerator) / Decimal::from(denominator)
    }
}

fn fy_sum<'a>(entries: impl Iterator<Item = &'a PipelineEntry>) -> Money {
    sum_money(entries.map(|e| e.fy_revenue()))
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

pub fn compute_stats(entries: &[PipelineEntry], config: &DashboardConfig) -> DashboardStats {
    let total_pipeline = fy_sum(entries.iter());
    let won: Vec<&PipelineEntry> = entries.iter().filter(|e| e.stage == Stage::ClosedWon).collect();
    let open: Vec<&PipelineEntry> = entries.iter().filter(|e| !e.stage.is_closed()).collect();
    let closed_won = fy_sum(won.iter().copied());

    DashboardStats {
        opportunities: entries.len(),
        total_pipeline,
        closed_won,
        closed_won_count: won.len(),
        in_progress: fy_sum(open.iter().copied()),
        in_progress_count: open.len(),
        avg_deal_size: if entries.is_empty() {
            0
        } else {
            total_pipeline / entries.len() as Money
        },
        target_achievement: safe_ratio(closed_won, config.fy_target),
        fy_target: config.fy_target,
    }
}

/// Year-1 totals per stage, every stage present, funnel order.
pub fn by_stage(entries: &[PipelineEntry]) -> Vec<StageTotal> {
    Stage::ALL
        .into_iter()
        .map(|stage| {
            let in_stage = entries.iter().filter(|e| e.stage == stage);
            StageTotal {
                stage,
                total: fy_sum(in_stage.clone()),
                count: in_stage.count(),
            }
        })
        .collect()
}

/// Jan..Dec year-1 plan summed over all entries, against the monthly target.
pub fn monthly_revenue(entries: &[PipelineEntry], monthly_target: Money) -> Vec<MonthlyRevenue> {
    let mut sums = [0 as Money; MONTHS_PER_YEAR];
    for e in entries {
        for (sum, v) in sums.iter_mut().zip(e.rev_plan.months()) {
            *sum = sum.saturating_add(v);
        }
    }
    MONTH_LABELS
        .iter()
        .zip(sums)
        .map(|(label, revenue)| MonthlyRevenue {
            month: label.to_string(),
            revenue,
            target: monthly_target,
        })
        .collect()
}

/// Contract value and deal count per bucket of `dimension`.
///
/// Pilar and tower list every catalogued bucket first; other values follow
/// in order of first appearance. Blank keys are skipped.
pub fn distribution(entries: &[PipelineEntry], dimension: Dimension) -> Vec<DistributionSlice> {
    let mut names: Vec<String> = dimension.canonical().iter().map(|s| s.to_string()).collect();
    for e in entries {
        let key = dimension.key(e);
        if !key.trim().is_empty() && !names.iter().any(|n| n == key) {
            names.push(key.to_string());
        }
    }

    let mut slices: Vec<DistributionSlice> = names
        .into_iter()
        .map(|name| {
            let members = entries.iter().filter(|e| dimension.key(e) == name);
            DistributionSlice {
                value: sum_money(members.clone().map(|e| e.contract_value)),
                count: members.count(),
                share: Decimal::ZERO,
                name,
            }
        })
        .collect();

    let total = sum_money(slices.iter().map(|s| s.value));
    for s in &mut slices {
        s.share = safe_ratio(s.value, total);
    }
    slices
}

/// All dashboard figures in one pass.
pub fn build_dashboard(
    input: &DashboardInput,
) -> RevPlanResult<ComputationOutput<DashboardOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.config.validate()?;

    if input.config.fy_target == 0 {
        warnings.push("FY target is zero; target achievement reported as 0".to_string());
    }
    let mismatched = input
        .entries
        .iter()
        .filter(|e| e.fy_revenue() > e.contract_value)
        .count();
    if mismatched > 0 {
        warnings.push(format!(
            "{mismatched} entr{} with year-1 plan above contract value",
            if mismatched == 1 { "y" } else { "ies" }
        ));
    }

    let stats = compute_stats(&input.entries, &input.config);
    let labels = StatLabels {
        total_pipeline: format_compact(stats.total_pipeline),
        closed_won: format_compact(stats.closed_won),
        in_progress: format_compact(stats.in_progress),
    };

    let output = DashboardOutput {
        by_stage: by_stage(&input.entries),
        monthly_revenue: monthly_revenue(&input.entries, input.config.monthly_target),
        by_pilar: distribution(&input.entries, Dimension::Pilar),
        by_tower: distribution(&input.entries, Dimension::Tower),
        by_lob: distribution(&input.entries, Dimension::Lob),
        by_product_family: distribution(&input.entries, Dimension::ProductFamily),
        table: paginate(&input.entries, 1, input.config.page_size)?,
        stats,
        labels,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Pipeline dashboard: year-1 plan totals by stage and month, contract value by segment",
        &serde_json::json!({
            "entries": input.entries.len(),
            "fy_target": input.config.fy_target,
            "monthly_target": input.config.monthly_target,
            "page_size": input.config.page_size,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn entry(stage: Stage, jan: Money, contract_value: Money, pilar: &str) -> PipelineEntry {
        let mut e = PipelineEntry::new("Acct", "Opp", stage);
        e.rev_plan.jan = jan;
        e.contract_value = contract_value;
        e.pilar = pilar.into();
        e
    }

    #[test]
    fn test_stats_split_won_and_open() {
        let entries = vec![
            entry(Stage::ClosedWon, 300, 300, "Network & Infra"),
            entry(Stage::ClosedLost, 50, 50, "Network & Infra"),
            entry(Stage::Proposal, 150, 400, "Fleet Management"),
        ];
        let cfg = DashboardConfig {
            fy_target: 1_200,
            ..Default::default()
        };
        let s = compute_stats(&entries, &cfg);
        assert_eq!(s.total_pipeline, 500);
        assert_eq!(s.closed_won, 300);
        assert_eq!(s.closed_won_count, 1);
        assert_eq!(s.in_progress, 150);
        assert_eq!(s.in_progress_count, 1);
        assert_eq!(s.avg_deal_size, 166);
        assert_eq!(s.target_achievement, dec!(0.25));
    }

    #[test]
    fn test_stats_empty() {
        let s = compute_stats(&[], &DashboardConfig::default());
        assert_eq!(s.avg_deal_size, 0);
        assert_eq!(s.target_achievement, Decimal::ZERO);
    }

    #[test]
    fn test_by_stage_lists_every_stage() {
        let entries = vec![
            entry(Stage::PoC, 10, 10, ""),
            entry(Stage::PoC, 5, 5, ""),
        ];
        let stages = by_stage(&entries);
        assert_eq!(stages.len(), 7);
        assert_eq!(stages[0].stage, Stage::InitialCommunication);
        assert_eq!(stages[3].stage, Stage::PoC);
        assert_eq!(stages[3].total, 15);
        assert_eq!(stages[3].count, 2);
        assert_eq!(stages[0].count, 0);
    }

    #[test]
    fn test_monthly_revenue_sums_across_entries() {
        let mut a = entry(Stage::PoC, 10, 0, "");
        a.rev_plan.dec = 7;
        let b = entry(Stage::Proposal, 5, 0, "");
        let months = monthly_revenue(&[a, b], 4);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month, "Jan");
        assert_eq!(months[0].revenue, 15);
        assert_eq!(months[11].revenue, 7);
        assert!(months.iter().all(|m| m.target == 4));
    }

    #[test]
    fn test_pilar_distribution_keeps_canonical_buckets() {
        let entries = vec![
            entry(Stage::PoC, 0, 300, "Network & Infra"),
            entry(Stage::PoC, 0, 100, "Fleet Management"),
            entry(Stage::PoC, 0, 100, "Legacy"),
        ];
        let d = distribution(&entries, Dimension::Pilar);
        assert_eq!(d.len(), PILARS.len() + 1);
        assert_eq!(d[0].name, "Fleet Management");
        assert_eq!(d[0].value, 100);
        assert_eq!(d[0].share, dec!(0.2));
        assert_eq!(d[2].value, 300);
        assert_eq!(d[2].share, dec!(0.6));
        assert_eq!(d.last().map(|s| s.name.as_str()), Some("Legacy"));
        assert_eq!(d[1].count, 0);
    }

    #[test]
    fn test_lob_distribution_first_seen_order() {
        let mut a = entry(Stage::PoC, 0, 10, "");
        a.presales_lob = "Resource & Energy".into();
        let mut b = entry(Stage::PoC, 0, 30, "");
        b.presales_lob = "Financial Institutions".into();
        let c = entry(Stage::PoC, 0, 99, "");
        let d = distribution(&[a, b, c], Dimension::Lob);
        let names: Vec<&str> = d.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Resource & Energy", "Financial Institutions"]);
        assert_eq!(d[1].share, dec!(0.75));
    }

    #[test]
    fn test_build_dashboard_warns_on_zero_target() {
        let input = DashboardInput {
            entries: vec![entry(Stage::ClosedWon, 2_000_000_000, 2_000_000_000, "")],
            config: DashboardConfig {
                fy_target: 0,
                ..Default::default()
            },
        };
        let out = build_dashboard(&input).unwrap();
        assert_eq!(out.result.stats.target_achievement, Decimal::ZERO);
        assert_eq!(out.result.labels.closed_won, "IDR 2.0Bn");
        assert_eq!(out.warnings.len(), 1);
    }
}

use pretty_assertions::assert_eq;
use revplan_core::dashboard::{build_dashboard, DashboardConfig, DashboardInput};
use revplan_core::pipeline::entry::{PipelineEntry, Stage};
use revplan_core::pipeline::filter::{query_pipeline, PipelineFilter, PipelineQuery};
use revplan_core::plan::{ContractPeriod, OneTimeCharge, PlanEditor, RecurringContract};
use revplan_core::RevPlanError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn planned_entry(
    account: &str,
    stage: Stage,
    family: &str,
    otc: Vec<OneTimeCharge>,
    recurring: RecurringContract,
) -> PipelineEntry {
    let mut entry = PipelineEntry::new(account, format!("{account} rollout"), stage);
    entry.set_product_family(family);
    entry.apply_plan(&PlanEditor::with_inputs(otc, recurring));
    entry
}

fn sample_pipeline() -> Vec<PipelineEntry> {
    vec![
        // 12 x 1Bn from January, fully inside FY
        planned_entry(
            "PT Armada",
            Stage::ClosedWon,
            "Fleet Sense",
            vec![],
            RecurringContract::new("2026-01", 1_000_000_000, ContractPeriod::Months(12)),
        ),
        // 2 months in FY, 10 spill into next year
        planned_entry(
            "PT Tambang",
            Stage::Negotiation,
            "Connected Mine",
            vec![OneTimeCharge::new("2026-11", 500_000_000)],
            RecurringContract::new("2026-11", 100_000_000, ContractPeriod::Months(12)),
        ),
        planned_entry(
            "PT Lama",
            Stage::ClosedLost,
            "Office 365",
            vec![OneTimeCharge::new("2026-04", 300_000_000)],
            RecurringContract::new("", 0, ContractPeriod::default()),
        ),
    ]
}

// ===========================================================================
// Dashboard
// ===========================================================================

#[test]
fn test_dashboard_headline_stats() {
    let input = DashboardInput {
        entries: sample_pipeline(),
        config: DashboardConfig::default(),
    };
    let out = build_dashboard(&input).unwrap();
    let stats = &out.result.stats;

    // 12Bn + (500Mn + 2 x 100Mn) + 300Mn
    assert_eq!(stats.total_pipeline, 13_000_000_000);
    assert_eq!(stats.closed_won, 12_000_000_000);
    assert_eq!(stats.closed_won_count, 1);
    assert_eq!(stats.in_progress, 700_000_000);
    assert_eq!(stats.in_progress_count, 1);
    // 12Bn / 300Bn
    assert_eq!(stats.target_achievement, dec!(0.04));
    assert_eq!(out.result.labels.total_pipeline, "IDR 13.0Bn");
    assert_eq!(out.result.labels.in_progress, "IDR 700Mn");
    assert!(out.warnings.is_empty(), "unexpected warnings: {:?}", out.warnings);
}

#[test]
fn test_dashboard_monthly_and_stage_breakdown() {
    let input = DashboardInput {
        entries: sample_pipeline(),
        config: DashboardConfig::default(),
    };
    let out = build_dashboard(&input).unwrap().result;

    assert_eq!(out.monthly_revenue[3].revenue, 1_300_000_000);
    assert_eq!(out.monthly_revenue[10].revenue, 1_600_000_000);
    assert_eq!(out.monthly_revenue[11].target, 4_000_000_000);

    let negotiation = out
        .by_stage
        .iter()
        .find(|s| s.stage == Stage::Negotiation)
        .map(|s| (s.total, s.count));
    assert_eq!(negotiation, Some((700_000_000, 1)));
    let month_sum: i64 = out.monthly_revenue.iter().map(|m| m.revenue).sum();
    let stage_sum: i64 = out.by_stage.iter().map(|s| s.total).sum();
    assert_eq!(month_sum, stage_sum);
}

#[test]
fn test_dashboard_distribution_uses_contract_value() {
    let input = DashboardInput {
        entries: sample_pipeline(),
        config: DashboardConfig::default(),
    };
    let out = build_dashboard(&input).unwrap().result;

    let epini = &out.by_tower[0];
    assert_eq!(epini.name, "EPINI");
    // 12Bn + 1.7Bn
    assert_eq!(epini.value, 13_700_000_000);
    assert_eq!(epini.count, 2);
    let esem = &out.by_tower[1];
    assert_eq!(esem.value, 300_000_000);
    assert_eq!(
        esem.share,
        Decimal::from(300_000_000i64) / Decimal::from(14_000_000_000i64)
    );
}

#[test]
fn test_dashboard_rejects_negative_target() {
    let input = DashboardInput {
        entries: vec![],
        config: DashboardConfig {
            fy_target: -5,
            ..Default::default()
        },
    };
    match build_dashboard(&input) {
        Err(RevPlanError::InvalidInput { field, .. }) => assert_eq!(field, "fy_target"),
        other => panic!("expected InvalidInput, got {:?}", other.map(|o| o.result.stats)),
    }
}

#[test]
fn test_dashboard_totals_saturate_on_huge_plans() {
    let huge = || {
        planned_entry(
            "PT Raksasa",
            Stage::Proposal,
            "Fleet Sense",
            vec![OneTimeCharge::new("2026-01", i64::MAX)],
            RecurringContract::new("", 0, ContractPeriod::default()),
        )
    };
    let input = DashboardInput {
        entries: vec![huge(), huge()],
        config: DashboardConfig::default(),
    };
    let out = build_dashboard(&input).unwrap().result;
    assert_eq!(out.monthly_revenue[0].revenue, i64::MAX);
    assert_eq!(out.stats.total_pipeline, i64::MAX);
    assert_eq!(out.stats.in_progress, i64::MAX);
    assert_eq!(out.by_tower[0].value, i64::MAX);
}

// ===========================================================================
// Pipeline table
// ===========================================================================

#[test]
fn test_pipeline_query_pages_filtered_rows() {
    let mut entries = sample_pipeline();
    for i in 0..20 {
        let mut e = PipelineEntry::new(format!("PT Mitra {i}"), "Renewal", Stage::Proposal);
        e.pilar = "Network & Infra".into();
        entries.push(e);
    }
    let query = PipelineQuery {
        entries,
        filter: PipelineFilter {
            stage: Some(Stage::Proposal),
            ..Default::default()
        },
        page: 2,
        per_page: 15,
    };
    let out = query_pipeline(&query).unwrap().result;
    assert_eq!(out.matched, 20);
    assert_eq!(out.page.total_pages, 2);
    assert_eq!(out.page.items.len(), 5);
    assert_eq!(out.page.items[0].account_name, "PT Mitra 15");
}

#[test]
fn test_pipeline_query_page_out_of_range() {
    let query = PipelineQuery {
        entries: sample_pipeline(),
        filter: PipelineFilter::default(),
        page: 3,
        per_page: 15,
    };
    assert!(matches!(
        query_pipeline(&query),
        Err(RevPlanError::InvalidPage { page: 3, total_pages: 1 })
    ));
}

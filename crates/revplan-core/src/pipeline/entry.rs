use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RevPlanError;
use crate::pipeline::catalog::classify;
use crate::plan::grid::{column_name, MONTHS_PER_YEAR};
use crate::plan::summary::{summarize, RevenueSummary};
use crate::plan::{ContractPeriod, OneTimeCharge, PlanEditor};
use crate::types::{sum_money, Money};

/// Sales stage of an opportunity, in funnel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "Initial Communication")]
    InitialCommunication,
    Proposal,
    Negotiation,
    PoC,
    #[serde(rename = "Sign Agreement")]
    SignAgreement,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::InitialCommunication,
        Stage::Proposal,
        Stage::Negotiation,
        Stage::PoC,
        Stage::SignAgreement,
        Stage::ClosedWon,
        Stage::ClosedLost,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::InitialCommunication => "Initial Communication",
            Stage::Proposal => "Proposal",
            Stage::Negotiation => "Negotiation",
            Stage::PoC => "PoC",
            Stage::SignAgreement => "Sign Agreement",
            Stage::ClosedWon => "Closed Won",
            Stage::ClosedLost => "Closed Lost",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Stage::ClosedWon | Stage::ClosedLost)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stage {
    type Err = RevPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Stage::ALL
            .into_iter()
            .find(|st| st.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RevPlanError::InvalidInput {
                field: "stage".into(),
                reason: format!("unknown stage '{s}'"),
            })
    }
}

/// Year-1 revenue plan as persisted, January first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevPlan {
    pub jan: Money,
    pub feb: Money,
    pub mar: Money,
    pub apr: Money,
    pub may: Money,
    pub jun: Money,
    pub jul: Money,
    pub aug: Money,
    pub sep: Money,
    pub oct: Money,
    pub nov: Money,
    pub dec: Money,
}

impl RevPlan {
    pub fn months(&self) -> [Money; MONTHS_PER_YEAR] {
        [
            self.jan, self.feb, self.mar, self.apr, self.may, self.jun, self.jul, self.aug,
            self.sep, self.oct, self.nov, self.dec,
        ]
    }

    pub fn summary(&self) -> RevenueSummary {
        summarize(&self.months())
    }

    pub fn total(&self) -> Money {
        sum_money(self.months())
    }
}

impl From<[Money; MONTHS_PER_YEAR]> for RevPlan {
    fn from(m: [Money; MONTHS_PER_YEAR]) -> Self {
        RevPlan {
            jan: m[0],
            feb: m[1],
            mar: m[2],
            apr: m[3],
            may: m[4],
            jun: m[5],
            jul: m[6],
            aug: m[7],
            sep: m[8],
            oct: m[9],
            nov: m[10],
            dec: m[11],
        }
    }
}

/// One opportunity in the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEntry {
    #[serde(default)]
    pub id: String,
    pub account_name: String,
    pub opportunity_name: String,
    pub stage: Stage,
    #[serde(default)]
    pub product_family: String,
    #[serde(default)]
    pub pilar: String,
    #[serde(default)]
    pub tower: String,
    #[serde(default)]
    pub se_name: String,
    #[serde(default)]
    pub presales_lob: String,
    #[serde(default)]
    pub am_name: String,
    /// `YYYY-MM` or empty
    #[serde(default)]
    pub close_month: String,
    #[serde(default)]
    pub contract_period: ContractPeriod,
    #[serde(default)]
    pub contract_value: Money,
    #[serde(default)]
    pub rev_plan: RevPlan,
    #[serde(default = "default_telkom_si")]
    pub telkom_si: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub si_name: Option<String>,
    #[serde(default)]
    pub bespoke_project: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_release_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub otc_entries: Vec<OneTimeCharge>,
}

fn default_telkom_si() -> String {
    "Telkom".to_string()
}

impl PipelineEntry {
    /// A bare entry with the descriptive fields left empty.
    pub fn new(
        account_name: impl Into<String>,
        opportunity_name: impl Into<String>,
        stage: Stage,
    ) -> Self {
        PipelineEntry {
            id: String::new(),
            account_name: account_name.into(),
            opportunity_name: opportunity_name.into(),
            stage,
            product_family: String::new(),
            pilar: String::new(),
            tower: String::new(),
            se_name: String::new(),
            presales_lob: String::new(),
            am_name: String::new(),
            close_month: String::new(),
            contract_period: ContractPeriod::default(),
            contract_value: 0,
            rev_plan: RevPlan::default(),
            telkom_si: default_telkom_si(),
            si_name: None,
            bespoke_project: false,
            project_id: None,
            po_release_date: None,
            otc_entries: Vec::new(),
        }
    }

    /// A new entry whose plan fields come from a form editor.
    pub fn from_editor(
        account_name: impl Into<String>,
        opportunity_name: impl Into<String>,
        stage: Stage,
        editor: &PlanEditor,
    ) -> Self {
        let mut entry = PipelineEntry::new(account_name, opportunity_name, stage);
        entry.apply_plan(editor);
        entry
    }

    /// Set the product family and, when it is catalogued, its pilar and tower.
    pub fn set_product_family(&mut self, product_family: impl Into<String>) {
        self.product_family = product_family.into();
        if let Some(c) = classify(&self.product_family) {
            self.pilar = c.pilar.to_string();
            self.tower = c.tower.to_string();
        }
    }

    /// Copy the revenue-plan state of a form editor onto this entry.
    ///
    /// Only the year-1 slice is stored; the contract value covers all five years.
    pub fn apply_plan(&mut self, editor: &PlanEditor) {
        let recurring = editor.recurring();
        self.close_month = recurring.start_month.clone();
        self.contract_period = recurring.effective_period();
        self.contract_value = editor.contract_value();
        self.rev_plan = RevPlan::from(editor.year_one());
        self.otc_entries = editor.otc_entries().to_vec();
    }

    /// Year-1 plan columns and the contract value, in storage naming.
    pub fn plan_columns(&self) -> Vec<(String, Money)> {
        let mut columns: Vec<(String, Money)> = self
            .rev_plan
            .months()
            .iter()
            .enumerate()
            .map(|(slot, amount)| (column_name(slot), *amount))
            .collect();
        columns.push(("contract_value".to_string(), self.contract_value));
        columns
    }

    /// Fiscal-year total of the persisted year-1 plan.
    pub fn fy_revenue(&self) -> Money {
        self.rev_plan.total()
    }

    /// All key fields are filled and the contract carries value.
    pub fn is_complete(&self) -> bool {
        let filled = [
            &self.opportunity_name,
            &self.account_name,
            &self.am_name,
            &self.product_family,
            &self.pilar,
            &self.tower,
            &self.se_name,
            &self.presales_lob,
            &self.close_month,
        ];
        filled.iter().all(|f| !f.trim().is_empty()) && self.contract_value > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::RecurringContract;

    fn complete_entry() -> PipelineEntry {
        let mut e = PipelineEntry::new("PT Maju", "Fleet rollout", Stage::Proposal);
        e.set_product_family("Fleet Sense");
        e.se_name = "Sari".into();
        e.presales_lob = "Financial Institutions".into();
        e.am_name = "Budi".into();
        e.close_month = "2026-03".into();
        e.contract_value = 10;
        e
    }

    #[test]
    fn test_stage_labels_round_trip_through_serde() {
        for stage in Stage::ALL {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.label()));
            assert_eq!(stage.label().parse::<Stage>().unwrap(), stage);
        }
        assert!("Won".parse::<Stage>().is_err());
    }

    #[test]
    fn test_product_family_fills_pilar_and_tower() {
        let mut e = PipelineEntry::new("A", "B", Stage::PoC);
        e.set_product_family("Smart Meter");
        assert_eq!(e.pilar, "IoT Industrial");
        assert_eq!(e.tower, "EPINI");

        e.set_product_family("Bespoke Thing");
        assert_eq!(e.product_family, "Bespoke Thing");
        assert_eq!(e.pilar, "IoT Industrial");
    }

    #[test]
    fn test_closed_stages() {
        assert!(Stage::ClosedWon.is_closed());
        assert!(Stage::ClosedLost.is_closed());
        assert!(!Stage::PoC.is_closed());
    }

    #[test]
    fn test_is_complete() {
        let e = complete_entry();
        assert!(e.is_complete());

        let mut missing_am = complete_entry();
        missing_am.am_name = "  ".into();
        assert!(!missing_am.is_complete());

        let mut no_value = complete_entry();
        no_value.contract_value = 0;
        assert!(!no_value.is_complete());
    }

    #[test]
    fn test_apply_plan_and_columns() {
        let editor = PlanEditor::with_inputs(
            vec![OneTimeCharge::new("2026-01", 50)],
            RecurringContract::new("2026-11", 10, ContractPeriod::Months(4)),
        );
        let e = PipelineEntry::from_editor("A", "B", Stage::Negotiation, &editor);
        assert_eq!(e.contract_value, 90);
        assert_eq!(e.rev_plan.jan, 50);
        assert_eq!(e.rev_plan.nov, 10);
        assert_eq!(e.fy_revenue(), 70);
        assert_eq!(e.close_month, "2026-11");

        let cols = e.plan_columns();
        assert_eq!(cols.len(), 13);
        assert_eq!(cols[0], ("jan_plan".to_string(), 50));
        assert_eq!(cols[11], ("dec_plan".to_string(), 10));
        assert_eq!(cols[12], ("contract_value".to_string(), 90));
    }

    #[test]
    fn test_deserialize_minimal_entry() {
        let json = r#"{
            "account_name": "PT Kereta",
            "opportunity_name": "Tap on Bus",
            "stage": "Closed Won",
            "contract_period": "OTC",
            "rev_plan": {"jan":1,"feb":0,"mar":0,"apr":0,"may":0,"jun":0,
                         "jul":0,"aug":0,"sep":0,"oct":0,"nov":0,"dec":2}
        }"#;
        let e: PipelineEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.stage, Stage::ClosedWon);
        assert_eq!(e.contract_period, ContractPeriod::OneTime);
        assert_eq!(e.telkom_si, "Telkom");
        assert_eq!(e.fy_revenue(), 3);
        assert_eq!(e.rev_plan.summary().q4, 2);
    }
}

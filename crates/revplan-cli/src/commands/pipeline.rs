use clap::Args;
use serde_json::Value;

use revplan_core::dashboard::{build_dashboard, DashboardInput};
use revplan_core::pipeline::entry::Stage;
use revplan_core::pipeline::filter::{query_pipeline, PipelineQuery};

use crate::input;

/// Arguments for the pipeline dashboard
#[derive(Args)]
pub struct DashboardArgs {
    /// Path to JSON input file ({"entries": [...], "config": {...}})
    #[arg(long)]
    pub input: Option<String>,

    /// Override the FY closed-won target, in IDR
    #[arg(long)]
    pub fy_target: Option<i64>,

    /// Override the monthly revenue target, in IDR
    #[arg(long)]
    pub monthly_target: Option<i64>,
}

/// Arguments for the filtered, paginated pipeline table
#[derive(Args)]
pub struct PipelineArgs {
    /// Path to JSON input file ({"entries": [...], "filter": {...}})
    #[arg(long)]
    pub input: Option<String>,

    /// Case-insensitive search on account, opportunity, AM or SE
    #[arg(long)]
    pub search: Option<String>,

    /// Only this stage, e.g. "Closed Won"
    #[arg(long)]
    pub stage: Option<String>,

    /// 1-based page number
    #[arg(long)]
    pub page: Option<usize>,

    /// Rows per page
    #[arg(long)]
    pub per_page: Option<usize>,
}

pub fn run_dashboard(args: DashboardArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut dash_input: DashboardInput = input::require(args.input.as_deref(), "dashboard")?;
    if let Some(target) = args.fy_target {
        dash_input.config.fy_target = target;
    }
    if let Some(target) = args.monthly_target {
        dash_input.config.monthly_target = target;
    }
    let result = build_dashboard(&dash_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_pipeline(args: PipelineArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut query: PipelineQuery = input::require(args.input.as_deref(), "pipeline table")?;
    if let Some(search) = args.search {
        query.filter.search = search;
    }
    if let Some(ref stage) = args.stage {
        query.filter.stage = Some(stage.parse::<Stage>()?);
    }
    if let Some(page) = args.page {
        query.page = page;
    }
    if let Some(per_page) = args.per_page {
        query.per_page = per_page;
    }
    let result = query_pipeline(&query)?;
    Ok(serde_json::to_value(result)?)
}

use clap::Args;
use serde_json::Value;

use revplan_core::records::{query_activities, query_highlights, ActivityQuery, HighlightQuery};

use crate::input;

/// Arguments for the activity plan table
#[derive(Args)]
pub struct ActivitiesArgs {
    /// Path to JSON input file ({"activities": [...], "filter": {...}})
    #[arg(long)]
    pub input: Option<String>,

    /// Case-insensitive search on SE, account, opportunity, AM or agenda
    #[arg(long)]
    pub search: Option<String>,

    /// 1-based page number
    #[arg(long)]
    pub page: Option<usize>,
}

/// Arguments for the highlight table
#[derive(Args)]
pub struct HighlightsArgs {
    /// Path to JSON input file ({"highlights": [...], "filter": {...}})
    #[arg(long)]
    pub input: Option<String>,

    /// Case-insensitive search on title, account, opportunity, SE or creator
    #[arg(long)]
    pub search: Option<String>,

    /// 1-based page number
    #[arg(long)]
    pub page: Option<usize>,
}

pub fn run_activities(args: ActivitiesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut query: ActivityQuery = input::require(args.input.as_deref(), "activity plans")?;
    if let Some(search) = args.search {
        query.filter.search = search;
    }
    if let Some(page) = args.page {
        query.page = page;
    }
    let result = query_activities(&query)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_highlights(args: HighlightsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut query: HighlightQuery = input::require(args.input.as_deref(), "highlights")?;
    if let Some(search) = args.search {
        query.filter.search = search;
    }
    if let Some(page) = args.page {
        query.page = page;
    }
    let result = query_highlights(&query)?;
    Ok(serde_json::to_value(result)?)
}

use napi::Result as NapiResult;
use napi_derive::napi;

use revplan_core::{dashboard, format, pipeline, plan, records};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Revenue plan
// ---------------------------------------------------------------------------

#[napi]
pub fn allocate_plan(input_json: String) -> NapiResult<String> {
    let input: plan::AllocationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = plan::allocate_plan(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn summarize_plan(input_json: String) -> NapiResult<String> {
    let input: plan::SummaryInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = plan::summarize_plan(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn fy_spillover(input_json: String) -> NapiResult<String> {
    let input: plan::SpilloverInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = plan::calculate_spillover(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[napi]
pub fn build_dashboard(input_json: String) -> NapiResult<String> {
    let input: dashboard::DashboardInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = dashboard::build_dashboard(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn query_pipeline(input_json: String) -> NapiResult<String> {
    let input: pipeline::filter::PipelineQuery =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = pipeline::filter::query_pipeline(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `{"pilar": ..., "tower": ...}` or `null` for an uncatalogued family.
#[napi]
pub fn classify_product_family(product_family: String) -> NapiResult<String> {
    let classification = pipeline::catalog::classify(&product_family);
    serde_json::to_string(&classification).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[napi]
pub fn query_activities(input_json: String) -> NapiResult<String> {
    let input: records::ActivityQuery = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = records::query_activities(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn query_highlights(input_json: String) -> NapiResult<String> {
    let input: records::HighlightQuery =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = records::query_highlights(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_compact(value: i64) -> String {
    format::format_compact(value)
}

#[napi]
pub fn format_currency(value: i64) -> String {
    format::format_currency(value)
}

#[napi]
pub fn parse_formatted(raw: String) -> i64 {
    format::parse_formatted(&raw)
}

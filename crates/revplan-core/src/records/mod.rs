//! Activity plans and highlights with their table filters.

pub mod activity;
pub mod highlight;

pub use activity::{
    close_month_label, query_activities, ActivityFilter, ActivityPlan, ActivityQuery,
};
pub use highlight::{query_highlights, Highlight, HighlightFilter, HighlightQuery, HighlightStatus};

pub mod catalog;
pub mod entry;
pub mod filter;

pub use entry::{PipelineEntry, RevPlan, Stage};
pub use filter::{paginate, Page, PipelineFilter};

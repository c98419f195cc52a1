pub mod pipeline;
pub mod plan;
pub mod records;

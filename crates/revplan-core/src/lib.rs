pub mod error;
pub mod format;
pub mod plan;
pub mod types;

#[cfg(feature = "pipeline")]
pub mod pipeline;

#[cfg(feature = "dashboard")]
pub mod dashboard;

#[cfg(feature = "records")]
pub mod records;

pub use error::RevPlanError;
pub use types::*;

/// Standard result type for all revplan operations
pub type RevPlanResult<T> = Result<T, RevPlanError>;

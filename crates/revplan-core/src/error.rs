use thiserror::Error;

#[derive(Debug, Error)]
pub enum RevPlanError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid year-month '{0}': expected YYYY-MM")]
    InvalidYearMonth(String),

    #[error("Invalid contract period '{0}': expected a month count (1-60) or OTC")]
    InvalidPeriod(String),

    #[error("Page {page} is out of range (total pages: {total_pages})")]
    InvalidPage { page: usize, total_pages: usize },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RevPlanError {
    fn from(e: serde_json::Error) -> Self {
        RevPlanError::SerializationError(e.to_string())
    }
}

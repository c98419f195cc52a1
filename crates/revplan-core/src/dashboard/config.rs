use serde::{Deserialize, Serialize};

use crate::error::RevPlanError;
use crate::pipeline::filter::DEFAULT_PAGE_SIZE;
use crate::types::Money;
use crate::RevPlanResult;

/// Fiscal-year closed-won target: IDR 300 Bn.
pub const DEFAULT_FY_TARGET: Money = 300_000_000_000;

/// Monthly revenue-plan target line: IDR 4 Bn.
pub const DEFAULT_MONTHLY_TARGET: Money = 4_000_000_000;

/// Dashboard targets and table paging. Missing fields take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub fy_target: Money,
    pub monthly_target: Money,
    pub page_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            fy_target: DEFAULT_FY_TARGET,
            monthly_target: DEFAULT_MONTHLY_TARGET,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> RevPlanResult<()> {
        if self.fy_target < 0 {
            return Err(RevPlanError::InvalidInput {
                field: "fy_target".into(),
                reason: "FY target cannot be negative".into(),
            });
        }
        if self.monthly_target < 0 {
            return Err(RevPlanError::InvalidInput {
                field: "monthly_target".into(),
                reason: "Monthly target cannot be negative".into(),
            });
        }
        if self.page_size == 0 {
            return Err(RevPlanError::InvalidInput {
                field: "page_size".into(),
                reason: "Page size must be at least 1".into(),
            });
        }
        Ok(())
    }
}

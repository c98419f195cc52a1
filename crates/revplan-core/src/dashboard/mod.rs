//! Pipeline dashboard: headline stats, stage funnel, monthly plan against
//! target, and contract-value distribution by pilar, tower, LoB and product
//! family.

pub mod config;
pub mod stats;

pub use config::DashboardConfig;
pub use stats::{
    build_dashboard, by_stage, compute_stats, distribution, monthly_revenue, DashboardInput,
    DashboardOutput, DashboardStats, Dimension, DistributionSlice,
};

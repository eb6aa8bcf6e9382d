//! Time-series projections: retirement, savings and portfolio growth

mod series;
pub mod retirement;
pub mod savings;
pub mod portfolio;

pub use series::{
    AllocationRow, PortfolioProjection, PortfolioValueRow, RetirementProjection, RetirementRow,
    RetirementSummary, SavingsProjection, SavingsRow, SavingsSummary,
};
pub use retirement::{project_retirement, real_rate, RetirementParams};
pub use savings::{project_savings, CompoundingFrequency, SavingsParams};
pub use portfolio::{blended_return, project_allocation, project_portfolio, PortfolioParams};

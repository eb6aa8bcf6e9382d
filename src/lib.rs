//! Financial Projections - projection and tax-computation engine
//!
//! This library provides:
//! - Retirement projections at an inflation-adjusted real rate
//! - Savings projections under selectable compounding frequencies
//! - Progressive-bracket federal, flat state and payroll tax computation
//! - Risk-profile portfolio allocation and growth
//! - CSV export of every result series

pub mod error;
pub mod assumptions;
pub mod projection;
pub mod tax;
pub mod export;
pub mod scenario;

// Re-export commonly used types
pub use error::{CalcError, CalcResult};
pub use assumptions::{Assumptions, FilingStatus, RiskProfile, TaxTables, ProfileTable};
pub use projection::{
    CompoundingFrequency, PortfolioParams, PortfolioProjection, RetirementParams,
    RetirementProjection, SavingsParams, SavingsProjection,
};
pub use tax::{TaxParams, TaxResult};
pub use scenario::ScenarioRunner;

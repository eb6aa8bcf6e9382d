//! Scenario runner for repeated and batch calculations
//!
//! Loads the reference tables once, then runs any number of calculations
//! against them. Every run derives only from its own parameter snapshot, so
//! batches fan out across threads and come back in input order.

use rayon::prelude::*;

use crate::assumptions::{Assumptions, LoadError};
use crate::error::CalcResult;
use crate::projection::{
    project_portfolio, project_retirement, project_savings, PortfolioParams, PortfolioProjection,
    RetirementParams, RetirementProjection, SavingsParams, SavingsProjection,
};
use crate::tax::{calculate_taxes, TaxParams, TaxResult};

/// Pre-loaded runner for the four calculators
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// for income in [50_000.0, 75_000.0, 100_000.0] {
///     let params = TaxParams { income, ..Default::default() };
///     let result = runner.run_tax(&params)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Create runner with the built-in tables
    pub fn new() -> Self {
        Self {
            assumptions: Assumptions::default_tables(),
        }
    }

    /// Create runner by loading tables from CSV files
    pub fn from_csv() -> Result<Self, LoadError> {
        Ok(Self {
            assumptions: Assumptions::from_csv()?,
        })
    }

    /// Create runner from specific assumptions directory
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self, LoadError> {
        Ok(Self {
            assumptions: Assumptions::from_csv_path(path)?,
        })
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn run_retirement(&self, params: &RetirementParams) -> CalcResult<RetirementProjection> {
        project_retirement(params)
    }

    pub fn run_savings(&self, params: &SavingsParams) -> CalcResult<SavingsProjection> {
        project_savings(params)
    }

    pub fn run_tax(&self, params: &TaxParams) -> CalcResult<TaxResult> {
        calculate_taxes(params, &self.assumptions.tax)
    }

    pub fn run_portfolio(&self, params: &PortfolioParams) -> CalcResult<PortfolioProjection> {
        project_portfolio(params, &self.assumptions.portfolios)
    }

    /// Run many retirement scenarios in parallel; one result per input, in order
    pub fn run_retirement_batch(
        &self,
        params: &[RetirementParams],
    ) -> Vec<CalcResult<RetirementProjection>> {
        params.par_iter().map(|p| self.run_retirement(p)).collect()
    }

    pub fn run_savings_batch(
        &self,
        params: &[SavingsParams],
    ) -> Vec<CalcResult<SavingsProjection>> {
        params.par_iter().map(|p| self.run_savings(p)).collect()
    }

    pub fn run_tax_batch(&self, params: &[TaxParams]) -> Vec<CalcResult<TaxResult>> {
        params.par_iter().map(|p| self.run_tax(p)).collect()
    }

    pub fn run_portfolio_batch(
        &self,
        params: &[PortfolioParams],
    ) -> Vec<CalcResult<PortfolioProjection>> {
        params.par_iter().map(|p| self.run_portfolio(p)).collect()
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Get mutable reference to the tables for customization
    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.assumptions
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

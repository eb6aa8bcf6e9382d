//! Risk-weighted portfolio growth

use serde::{Deserialize, Serialize};

use super::series::{AllocationRow, PortfolioProjection, PortfolioValueRow};
use crate::assumptions::{validate_allocation, AssetClass, ProfileTable, RiskProfile};
use crate::error::{bounded_horizon, finite_balance, non_negative_amount, CalcError, CalcResult};

/// Inputs for a portfolio projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioParams {
    pub investment_amount: f64,
    pub risk_profile: RiskProfile,
    pub horizon_years: u32,
}

impl Default for PortfolioParams {
    fn default() -> Self {
        Self {
            investment_amount: 100_000.0,
            risk_profile: RiskProfile::Moderate,
            horizon_years: 15,
        }
    }
}

/// Allocation-weighted expected return in percent.
///
/// Weights are the static profile percentages, so the blend is a property of
/// the profile and does not depend on the amount invested.
pub fn blended_return(classes: &[AssetClass]) -> f64 {
    classes
        .iter()
        .map(|c| c.expected_return * c.percentage / 100.0)
        .sum()
}

/// Project the portfolio for the profile selected in `params`
pub fn project_portfolio(
    params: &PortfolioParams,
    profiles: &ProfileTable,
) -> CalcResult<PortfolioProjection> {
    let classes = profiles.get(params.risk_profile)?;
    project_allocation(params.investment_amount, params.horizon_years, classes)
}

/// Project an arbitrary allocation set: split the amount across classes and
/// compound it at the blended return for years 0..=horizon
pub fn project_allocation(
    investment_amount: f64,
    horizon_years: u32,
    classes: &[AssetClass],
) -> CalcResult<PortfolioProjection> {
    validate_allocation(classes)?;
    let amount = non_negative_amount("investment_amount", investment_amount)?;
    let horizon_years = bounded_horizon("horizon_years", horizon_years)?;

    let blended = blended_return(classes);
    if blended <= -100.0 {
        return Err(CalcError::InvalidPercentage {
            field: "expected return",
            reason: format!("blended return {} would wipe out the portfolio", blended),
        });
    }

    let allocation = classes
        .iter()
        .map(|c| AllocationRow {
            name: c.name.clone(),
            percentage: c.percentage,
            amount: c.percentage / 100.0 * amount,
            expected_return: c.expected_return,
        })
        .collect();

    // Checked before scaling so a zero amount cannot hide an overflow as NaN
    let growth_factor = 1.0 + blended / 100.0;
    let values = (0..=horizon_years)
        .map(|year| -> CalcResult<PortfolioValueRow> {
            let compounded = growth_factor.powi(year as i32);
            let compounded = finite_balance("growth factor", year, compounded)?;
            let value = finite_balance("balance", year, amount * compounded)?;
            Ok(PortfolioValueRow {
                year,
                value,
                growth: value - amount,
            })
        })
        .collect::<CalcResult<Vec<_>>>()?;

    log::debug!(
        "Portfolio projection: {} classes, blended return {:.4}%, {} years",
        classes.len(),
        blended,
        horizon_years
    );

    Ok(PortfolioProjection {
        investment_amount: amount,
        blended_return: blended,
        allocation,
        values,
    })
}

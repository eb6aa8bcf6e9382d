//! Retirement projection at an inflation-adjusted real rate

use serde::{Deserialize, Serialize};

use super::series::{RetirementProjection, RetirementRow};
use crate::error::{
    bounded_horizon, finite_balance, non_negative_amount, non_negative_rate, CalcError, CalcResult,
};

/// Inputs for a retirement projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetirementParams {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_savings: f64,
    pub annual_contribution: f64,
    /// Nominal annual return in percent
    pub expected_return: f64,
    /// Annual inflation in percent
    pub inflation_rate: f64,
}

impl Default for RetirementParams {
    fn default() -> Self {
        Self {
            current_age: 30,
            retirement_age: 65,
            current_savings: 50_000.0,
            annual_contribution: 6_000.0,
            expected_return: 7.0,
            inflation_rate: 2.5,
        }
    }
}

/// Real rate from nominal return and inflation, both in percent
pub fn real_rate(expected_return: f64, inflation_rate: f64) -> f64 {
    (1.0 + expected_return / 100.0) / (1.0 + inflation_rate / 100.0) - 1.0
}

/// Project savings from the current age through retirement, one row per year.
///
/// Row 0 carries the starting savings untouched and reports them as its
/// contribution. Each later row grows the prior balance by the real rate and
/// then adds the annual contribution. Retiring at the current age yields
/// row 0 alone.
pub fn project_retirement(params: &RetirementParams) -> CalcResult<RetirementProjection> {
    if params.retirement_age < params.current_age {
        return Err(CalcError::InvalidRange {
            field: "retirement_age",
            reason: format!(
                "retirement age {} is before current age {}",
                params.retirement_age, params.current_age
            ),
        });
    }
    let years = bounded_horizon("retirement_age", params.retirement_age - params.current_age)?;

    let starting = non_negative_amount("current_savings", params.current_savings)?;
    let contribution = non_negative_amount("annual_contribution", params.annual_contribution)?;
    let nominal = non_negative_rate("expected_return", params.expected_return)?;
    let inflation = non_negative_rate("inflation_rate", params.inflation_rate)?;

    let rate = real_rate(nominal, inflation);

    let mut rows = Vec::with_capacity(years as usize + 1);
    rows.push(RetirementRow {
        year: 0,
        age: params.current_age,
        balance: starting,
        contribution: starting,
        total_contributions: starting,
        growth: 0.0,
    });

    let mut balance = starting;
    for year in 1..=years {
        balance = finite_balance("balance", year, balance * (1.0 + rate) + contribution)?;
        let total_contributions = starting + contribution * year as f64;
        rows.push(RetirementRow {
            year,
            age: params.current_age + year,
            balance,
            contribution,
            total_contributions,
            growth: balance - total_contributions,
        });
    }

    log::debug!(
        "Retirement projection: {} years at real rate {:.6}, final balance {:.2}",
        years,
        rate,
        balance
    );

    Ok(RetirementProjection { real_rate: rate, rows })
}

//! Savings projection with selectable compounding frequency
//!
//! Every frequency runs through the same monthly simulation: a contribution
//! lands each month and interest is credited on the months where the chosen
//! frequency compounds. Daily compounding is approximated by crediting a
//! 30-day equivalent each month.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::series::{SavingsProjection, SavingsRow, SavingsSummary};
use crate::error::{
    bounded_horizon, finite_balance, non_negative_amount, non_negative_rate, CalcError, CalcResult,
};

/// Days of daily compounding credited per simulated month
const DAYS_PER_MONTH: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundingFrequency {
    Annually,
    Semiannually,
    Quarterly,
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub const ALL: [CompoundingFrequency; 5] = [
        CompoundingFrequency::Annually,
        CompoundingFrequency::Semiannually,
        CompoundingFrequency::Quarterly,
        CompoundingFrequency::Monthly,
        CompoundingFrequency::Daily,
    ];

    /// Compounding events per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::Semiannually => 2,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Daily => 365,
        }
    }

    /// Growth factor credited at the end of `month` (1-indexed), given an annual decimal rate
    fn monthly_factor(&self, month: u32, rate: f64) -> f64 {
        match self {
            CompoundingFrequency::Monthly => 1.0 + rate / 12.0,
            CompoundingFrequency::Daily => (1.0 + rate / 365.0).powi(DAYS_PER_MONTH),
            other => {
                let n = other.periods_per_year();
                if month % (12 / n) == 0 {
                    1.0 + rate / n as f64
                } else {
                    1.0
                }
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompoundingFrequency::Annually => "annually",
            CompoundingFrequency::Semiannually => "semiannually",
            CompoundingFrequency::Quarterly => "quarterly",
            CompoundingFrequency::Monthly => "monthly",
            CompoundingFrequency::Daily => "daily",
        }
    }
}

impl fmt::Display for CompoundingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompoundingFrequency {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "annually" | "annual" => Ok(CompoundingFrequency::Annually),
            "semiannually" | "semiannual" => Ok(CompoundingFrequency::Semiannually),
            "quarterly" => Ok(CompoundingFrequency::Quarterly),
            "monthly" => Ok(CompoundingFrequency::Monthly),
            "daily" => Ok(CompoundingFrequency::Daily),
            _ => Err(CalcError::UnknownSelector {
                kind: "compounding frequency",
                value: s.to_string(),
            }),
        }
    }
}

/// Inputs for a savings projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsParams {
    pub initial_deposit: f64,
    pub monthly_contribution: f64,
    /// Nominal annual rate in percent
    pub interest_rate: f64,
    pub years: u32,
    pub frequency: CompoundingFrequency,
}

impl Default for SavingsParams {
    fn default() -> Self {
        Self {
            initial_deposit: 1_000.0,
            monthly_contribution: 200.0,
            interest_rate: 5.0,
            years: 10,
            frequency: CompoundingFrequency::Monthly,
        }
    }
}

/// Simulate `years * 12` months and sample the balance at each year boundary
pub fn project_savings(params: &SavingsParams) -> CalcResult<SavingsProjection> {
    if params.years == 0 {
        return Err(CalcError::InvalidRange {
            field: "years",
            reason: "horizon must be at least one year".to_string(),
        });
    }

    let initial = non_negative_amount("initial_deposit", params.initial_deposit)?;
    let monthly = non_negative_amount("monthly_contribution", params.monthly_contribution)?;
    let rate = non_negative_rate("interest_rate", params.interest_rate)? / 100.0;

    let total_months = bounded_horizon("years", params.years)? * 12;
    let contributions_at = |month: u32| initial + monthly * month as f64;
    let sample = |month: u32, balance: f64| {
        let total_contributions = contributions_at(month);
        SavingsRow {
            month,
            year: month / 12,
            balance,
            total_contributions,
            interest_earned: balance - total_contributions,
        }
    };

    let mut balance = initial;
    let mut rows = Vec::with_capacity(params.years as usize + 1);
    rows.push(sample(0, balance));

    for month in 1..=total_months {
        balance += monthly;
        let factor = params.frequency.monthly_factor(month, rate);
        balance = finite_balance("balance", month, balance * factor)?;

        if month % 12 == 0 || month == total_months {
            rows.push(sample(month, balance));
        }
    }

    let total_contributions = contributions_at(total_months);
    let summary = SavingsSummary {
        months: total_months,
        final_balance: balance,
        total_contributions,
        interest_earned: balance - total_contributions,
    };

    log::debug!(
        "Savings projection: {} months compounding {}, final balance {:.2}",
        total_months,
        params.frequency,
        balance
    );

    Ok(SavingsProjection { rows, summary })
}

//! Output structures for the time-series projections

use serde::{Deserialize, Serialize};

/// One year of a retirement projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementRow {
    /// Period index, 0 at the current age
    pub year: u32,
    pub age: u32,
    /// Balance in today's dollars (real terms)
    pub balance: f64,
    /// Deposit for the period; period 0 reports the starting savings
    pub contribution: f64,
    pub total_contributions: f64,
    pub growth: f64,
}

/// Complete retirement projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementProjection {
    /// Inflation-adjusted annual rate as a decimal
    pub real_rate: f64,
    pub rows: Vec<RetirementRow>,
}

impl RetirementProjection {
    pub fn summary(&self) -> RetirementSummary {
        let last = self.rows.last();
        RetirementSummary {
            years: self.rows.len().saturating_sub(1) as u32,
            final_balance: last.map(|r| r.balance).unwrap_or(0.0),
            total_contributions: last.map(|r| r.total_contributions).unwrap_or(0.0),
            total_growth: last.map(|r| r.growth).unwrap_or(0.0),
            real_rate: self.real_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementSummary {
    pub years: u32,
    pub final_balance: f64,
    pub total_contributions: f64,
    pub total_growth: f64,
    pub real_rate: f64,
}

/// A year-boundary sample of a savings simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsRow {
    pub month: u32,
    pub year: u32,
    pub balance: f64,
    pub total_contributions: f64,
    pub interest_earned: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSummary {
    pub months: u32,
    pub final_balance: f64,
    pub total_contributions: f64,
    pub interest_earned: f64,
}

/// Complete savings projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsProjection {
    pub rows: Vec<SavingsRow>,
    pub summary: SavingsSummary,
}

/// Dollar allocation for one asset class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    pub name: String,
    pub percentage: f64,
    pub amount: f64,
    pub expected_return: f64,
}

/// Portfolio value at a year boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValueRow {
    pub year: u32,
    pub value: f64,
    pub growth: f64,
}

/// Complete portfolio projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioProjection {
    pub investment_amount: f64,
    /// Allocation-weighted expected return in percent
    pub blended_return: f64,
    pub allocation: Vec<AllocationRow>,
    pub values: Vec<PortfolioValueRow>,
}

impl PortfolioProjection {
    pub fn final_value(&self) -> f64 {
        self.values.last().map(|r| r.value).unwrap_or(self.investment_amount)
    }

    pub fn total_growth(&self) -> f64 {
        self.values.last().map(|r| r.growth).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retirement_summary_uses_last_row() {
        let projection = RetirementProjection {
            real_rate: 0.0,
            rows: vec![
                RetirementRow {
                    year: 0,
                    age: 40,
                    balance: 100.0,
                    contribution: 100.0,
                    total_contributions: 100.0,
                    growth: 0.0,
                },
                RetirementRow {
                    year: 1,
                    age: 41,
                    balance: 160.0,
                    contribution: 50.0,
                    total_contributions: 150.0,
                    growth: 10.0,
                },
            ],
        };

        let summary = projection.summary();
        assert_eq!(summary.years, 1);
        assert_eq!(summary.final_balance, 160.0);
        assert_eq!(summary.total_contributions, 150.0);
        assert_eq!(summary.total_growth, 10.0);
    }

    #[test]
    fn test_empty_portfolio_defaults() {
        let projection = PortfolioProjection {
            investment_amount: 500.0,
            blended_return: 5.0,
            allocation: Vec::new(),
            values: Vec::new(),
        };
        assert_eq!(projection.final_value(), 500.0);
        assert_eq!(projection.total_growth(), 0.0);
    }
}

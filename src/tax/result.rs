//! Tax computation output

use serde::{Deserialize, Serialize};

/// The part of taxable income that fell inside one federal bracket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub rate: f64,
    pub lower: f64,
    /// `None` for the open-ended top bracket
    pub upper: Option<f64>,
    pub taxed_amount: f64,
    pub tax: f64,
}

/// Full tax breakdown for one set of parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    pub gross_income: f64,
    pub taxable_income: f64,
    pub federal_tax: f64,
    pub state_tax: f64,
    pub social_security_tax: f64,
    pub medicare_tax: f64,
    pub total_tax: f64,
    /// Total tax as a percentage of gross income; 0 when income is 0
    pub effective_rate: f64,
    pub take_home_pay: f64,
    /// Rate of the highest bracket reached, as a decimal
    pub marginal_rate: f64,
    pub federal_slices: Vec<BracketSlice>,
}

/// How a summary line's value should be displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Currency,
    Percent,
}

/// One Category/Amount line of the tax summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxLine {
    pub category: &'static str,
    pub value: f64,
    pub kind: LineKind,
}

impl TaxResult {
    pub fn payroll_tax(&self) -> f64 {
        self.social_security_tax + self.medicare_tax
    }

    /// Slices for the chart: where each dollar of gross income goes
    pub fn breakdown(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("Federal Tax", self.federal_tax),
            ("State Tax", self.state_tax),
            ("Social Security", self.social_security_tax),
            ("Medicare", self.medicare_tax),
            ("Take-home Pay", self.take_home_pay),
        ]
    }

    /// Lines for the tabular summary and its export
    pub fn summary_lines(&self) -> Vec<TaxLine> {
        let currency = |category, value| TaxLine {
            category,
            value,
            kind: LineKind::Currency,
        };
        vec![
            currency("Gross Income", self.gross_income),
            currency("Taxable Income", self.taxable_income),
            currency("Federal Tax", self.federal_tax),
            currency("State Tax", self.state_tax),
            currency("Social Security Tax", self.social_security_tax),
            currency("Medicare Tax", self.medicare_tax),
            currency("Total Tax", self.total_tax),
            currency("Take-home Pay", self.take_home_pay),
            TaxLine {
                category: "Effective Tax Rate",
                value: self.effective_rate,
                kind: LineKind::Percent,
            },
        ]
    }
}

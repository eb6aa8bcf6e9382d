//! Progressive federal tax plus flat state and payroll taxes

use serde::{Deserialize, Serialize};

use super::result::{BracketSlice, TaxResult};
use crate::assumptions::{BracketSchedule, FilingStatus, PayrollRates, TaxTables};
use crate::error::{non_negative_amount, CalcResult};

/// Inputs for a tax computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxParams {
    pub income: f64,
    pub filing_status: FilingStatus,
    pub retirement_contributions: f64,
    pub other_deductions: f64,
    /// Key into the state-rate table, e.g. "texas" or "New York"
    pub state: String,
}

impl Default for TaxParams {
    fn default() -> Self {
        Self {
            income: 75_000.0,
            filing_status: FilingStatus::Single,
            retirement_contributions: 6_000.0,
            other_deductions: 12_950.0, // standard deduction
            state: "california".to_string(),
        }
    }
}

/// Federal tax on `taxable_income`, walking brackets from the bottom.
///
/// Each bracket consumes at most its own width, so income is only ever taxed
/// at the rate of the slice it falls in. Returns the tax and the non-empty
/// slices in ascending order.
pub fn federal_tax(taxable_income: f64, schedule: &BracketSchedule) -> (f64, Vec<BracketSlice>) {
    let mut remaining = taxable_income.max(0.0);
    let mut previous_bound = 0.0;
    let mut tax = 0.0;
    let mut slices = Vec::new();

    for bracket in schedule.brackets() {
        if remaining <= 0.0 {
            break;
        }

        let upper = bracket.upper_bound();
        let taxed_amount = remaining.min(upper - previous_bound);
        let slice_tax = taxed_amount * bracket.rate;

        tax += slice_tax;
        remaining -= taxed_amount;
        slices.push(BracketSlice {
            rate: bracket.rate,
            lower: previous_bound,
            upper: bracket.up_to,
            taxed_amount,
            tax: slice_tax,
        });

        previous_bound = upper;
    }

    (tax, slices)
}

/// Social Security (capped at the wage base) and Medicare (with the
/// additional rate on income above the threshold)
pub fn payroll_taxes(income: f64, rates: &PayrollRates) -> (f64, f64) {
    let social_security = income.min(rates.social_security_wage_base) * rates.social_security_rate;

    let mut medicare = income * rates.medicare_rate;
    if income > rates.additional_medicare_threshold {
        medicare += (income - rates.additional_medicare_threshold) * rates.additional_medicare_rate;
    }

    (social_security, medicare)
}

/// Compute the full tax breakdown.
///
/// State tax applies the flat state rate to taxable income (after deductions),
/// while payroll taxes apply to gross income.
pub fn calculate_taxes(params: &TaxParams, tables: &TaxTables) -> CalcResult<TaxResult> {
    let income = non_negative_amount("income", params.income)?;
    let retirement =
        non_negative_amount("retirement_contributions", params.retirement_contributions)?;
    let deductions = non_negative_amount("other_deductions", params.other_deductions)?;

    let schedule = tables.schedule(params.filing_status)?;
    let state_rate = tables.state_rate(&params.state)?;

    let taxable_income = (income - retirement - deductions).max(0.0);

    let (federal, federal_slices) = federal_tax(taxable_income, schedule);
    let state = taxable_income * state_rate;
    let (social_security, medicare) = payroll_taxes(income, &tables.payroll);

    let total_tax = federal + state + social_security + medicare;
    let effective_rate = if income > 0.0 { total_tax / income * 100.0 } else { 0.0 };
    let marginal_rate = federal_slices.last().map(|s| s.rate).unwrap_or(0.0);

    log::debug!(
        "Taxes for {} income {:.2} in {}: federal {:.2}, state {:.2}, total {:.2}",
        params.filing_status,
        income,
        params.state,
        federal,
        state,
        total_tax
    );

    Ok(TaxResult {
        gross_income: income,
        taxable_income,
        federal_tax: federal,
        state_tax: state,
        social_security_tax: social_security,
        medicare_tax: medicare,
        total_tax,
        effective_rate,
        take_home_pay: income - total_tax,
        marginal_rate,
        federal_slices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::TaxBracket;
    use crate::error::CalcError;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn texas_single() -> TaxParams {
        TaxParams {
            income: 75_000.0,
            filing_status: FilingStatus::Single,
            retirement_contributions: 6_000.0,
            other_deductions: 12_950.0,
            state: "texas".to_string(),
        }
    }

    #[test]
    fn test_reference_case() {
        let tables = TaxTables::default_2023();
        let result = calculate_taxes(&texas_single(), &tables).unwrap();

        assert_abs_diff_eq!(result.taxable_income, 56_050.0, epsilon = 1e-9);
        assert_eq!(result.state_tax, 0.0);

        // 11000 @ 10% + 33725 @ 12% + 11325 @ 22%
        assert_abs_diff_eq!(result.federal_tax, 1_100.0 + 4_047.0 + 2_491.5, epsilon = 1e-6);
        assert_abs_diff_eq!(result.social_security_tax, 4_650.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.medicare_tax, 1_087.5, epsilon = 1e-6);
        assert_abs_diff_eq!(result.total_tax, 13_376.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.take_home_pay, 61_624.0, epsilon = 1e-6);
        assert_relative_eq!(result.effective_rate, 13_376.0 / 75_000.0 * 100.0, epsilon = 1e-9);
        assert_eq!(result.marginal_rate, 0.22);
        assert!(result.total_tax <= result.gross_income);
    }

    #[test]
    fn test_federal_tax_equals_sum_of_slices() {
        let tables = TaxTables::default_2023();
        let result = calculate_taxes(&texas_single(), &tables).unwrap();

        let slice_total: f64 = result.federal_slices.iter().map(|s| s.tax).sum();
        let taxed_total: f64 = result.federal_slices.iter().map(|s| s.taxed_amount).sum();
        assert_abs_diff_eq!(slice_total, result.federal_tax, epsilon = 1e-9);
        assert_abs_diff_eq!(taxed_total, result.taxable_income, epsilon = 1e-9);
        assert_eq!(result.federal_slices.len(), 3);
    }

    #[test]
    fn test_bracket_ordering_does_not_matter() {
        let tables = TaxTables::default_2023();
        let schedule = tables.schedule(FilingStatus::Single).unwrap();

        let mut reversed = schedule.brackets().to_vec();
        reversed.reverse();
        let reordered = BracketSchedule::new(reversed).unwrap();

        for income in [0.0, 5_000.0, 56_050.0, 250_000.0, 1_000_000.0] {
            assert_eq!(federal_tax(income, schedule).0, federal_tax(income, &reordered).0);
        }
    }

    #[test]
    fn test_income_at_bracket_bound() {
        let tables = TaxTables::default_2023();
        for status in FilingStatus::ALL {
            let schedule = tables.schedule(status).unwrap();
            let mut cumulative = 0.0;

            for (i, bracket) in schedule.brackets().iter().enumerate() {
                let Some(bound) = bracket.up_to else { break };
                cumulative += (bound - schedule.lower_bound(i)) * bracket.rate;

                let (tax, slices) = federal_tax(bound, schedule);
                assert_relative_eq!(tax, cumulative, epsilon = 1e-12);
                // Nothing spills into the next bracket
                assert_eq!(slices.len(), i + 1);
            }
        }
    }

    #[test]
    fn test_top_bracket_is_unbounded() {
        let schedule = BracketSchedule::new(vec![
            TaxBracket::new(0.10, 10_000.0),
            TaxBracket::unbounded(0.50),
        ])
        .unwrap();
        let (tax, slices) = federal_tax(1_010_000.0, &schedule);
        assert_abs_diff_eq!(tax, 1_000.0 + 500_000.0, epsilon = 1e-6);
        assert_eq!(slices[1].upper, None);
        assert_eq!(slices[1].lower, 10_000.0);
    }

    #[test]
    fn test_state_tax_on_taxable_income() {
        let tables = TaxTables::default_2023();
        let params = TaxParams {
            state: "california".to_string(),
            ..texas_single()
        };
        let result = calculate_taxes(&params, &tables).unwrap();
        assert_abs_diff_eq!(result.state_tax, 56_050.0 * 0.093, epsilon = 1e-9);
    }

    #[test]
    fn test_payroll_caps_and_surcharge() {
        let rates = PayrollRates::default();

        let (ss, medicare) = payroll_taxes(300_000.0, &rates);
        assert_abs_diff_eq!(ss, 160_200.0 * 0.062, epsilon = 1e-9);
        assert_abs_diff_eq!(medicare, 300_000.0 * 0.0145 + 100_000.0 * 0.009, epsilon = 1e-9);

        // Exactly at the threshold: no surcharge
        let (_, medicare) = payroll_taxes(200_000.0, &rates);
        assert_abs_diff_eq!(medicare, 200_000.0 * 0.0145, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_income_effective_rate() {
        let tables = TaxTables::default_2023();
        let params = TaxParams {
            income: 0.0,
            ..texas_single()
        };
        let result = calculate_taxes(&params, &tables).unwrap();

        assert_eq!(result.effective_rate, 0.0);
        assert_eq!(result.total_tax, 0.0);
        assert_eq!(result.taxable_income, 0.0);
        assert!(result.federal_slices.is_empty());
        assert_eq!(result.marginal_rate, 0.0);
    }

    #[test]
    fn test_deductions_exceeding_income() {
        let tables = TaxTables::default_2023();
        let params = TaxParams {
            income: 10_000.0,
            other_deductions: 20_000.0,
            ..texas_single()
        };
        let result = calculate_taxes(&params, &tables).unwrap();
        assert_eq!(result.taxable_income, 0.0);
        assert_eq!(result.federal_tax, 0.0);
        // Payroll still applies to gross income
        assert!(result.social_security_tax > 0.0);
    }

    #[test]
    fn test_total_never_exceeds_income() {
        let tables = TaxTables::default_2023();
        for status in FilingStatus::ALL {
            for income in [1.0, 30_000.0, 150_000.0, 500_000.0, 5_000_000.0] {
                let params = TaxParams {
                    income,
                    filing_status: status,
                    retirement_contributions: 0.0,
                    other_deductions: 0.0,
                    state: "california".to_string(),
                };
                let result = calculate_taxes(&params, &tables).unwrap();
                assert!(result.total_tax <= income);
                assert!(result.take_home_pay >= 0.0);
            }
        }
    }

    #[test]
    fn test_unknown_state() {
        let tables = TaxTables::default_2023();
        let params = TaxParams {
            state: "atlantis".to_string(),
            ..texas_single()
        };
        assert!(matches!(
            calculate_taxes(&params, &tables),
            Err(CalcError::UnknownSelector { kind: "state", .. })
        ));
    }

    #[test]
    fn test_breakdown_sums_to_income() {
        let tables = TaxTables::default_2023();
        let result = calculate_taxes(&TaxParams::default(), &tables).unwrap();

        let total: f64 = result.breakdown().iter().map(|(_, v)| v).sum();
        assert_relative_eq!(total, result.gross_income, epsilon = 1e-9);
        assert_eq!(result.summary_lines().len(), 9);
        assert_relative_eq!(result.payroll_tax(), result.social_security_tax + result.medicare_tax);
    }

    #[test]
    fn test_idempotent() {
        let tables = TaxTables::default_2023();
        let params = TaxParams::default();
        assert_eq!(
            calculate_taxes(&params, &tables).unwrap(),
            calculate_taxes(&params, &tables).unwrap()
        );
    }
}

//! Delimited-text export shared by every calculator
//!
//! Each row type names its header and maps itself to fields; one writer
//! handles all of them.

use std::io::Write;

use crate::projection::{AllocationRow, PortfolioValueRow, RetirementRow, SavingsRow};
use crate::tax::{LineKind, TaxLine};

/// A row that can be written as one CSV record under a fixed header
pub trait CsvRecord {
    fn header() -> &'static [&'static str];
    fn fields(&self) -> Vec<String>;
}

/// Write the header followed by one record per row
pub fn write_records<W: Write, T: CsvRecord>(writer: W, rows: &[T]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(T::header())?;
    for row in rows {
        writer.write_record(row.fields())?;
    }
    writer.flush()?;
    Ok(())
}

/// Render rows to an in-memory CSV string
pub fn to_csv_string<T: CsvRecord>(rows: &[T]) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, rows)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Whole-dollar amount with thousands separators, e.g. `$1,234,567`
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Percentage with two decimals, e.g. `17.83%`
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

impl CsvRecord for RetirementRow {
    fn header() -> &'static [&'static str] {
        &["Age", "Year", "Balance", "Contribution"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.age.to_string(),
            self.year.to_string(),
            format!("{:.0}", self.balance),
            format!("{:.0}", self.contribution),
        ]
    }
}

impl CsvRecord for SavingsRow {
    fn header() -> &'static [&'static str] {
        &["Year", "Month", "Balance", "Total Contributions"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            self.month.to_string(),
            format!("{:.0}", self.balance),
            format!("{:.0}", self.total_contributions),
        ]
    }
}

impl CsvRecord for AllocationRow {
    fn header() -> &'static [&'static str] {
        &["Asset Class", "Percentage", "Amount", "Expected Return"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            format!("{}%", self.percentage),
            format_currency(self.amount),
            format!("{}%", self.expected_return),
        ]
    }
}

impl CsvRecord for PortfolioValueRow {
    fn header() -> &'static [&'static str] {
        &["Year", "Portfolio Value", "Growth"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            format_currency(self.value),
            format_currency(self.growth),
        ]
    }
}

impl CsvRecord for TaxLine {
    fn header() -> &'static [&'static str] {
        &["Category", "Amount"]
    }

    fn fields(&self) -> Vec<String> {
        let amount = match self.kind {
            LineKind::Currency => format_currency(self.value),
            LineKind::Percent => format_percent(self.value),
        };
        vec![self.category.to_string(), amount]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{ProfileTable, TaxTables};
    use crate::projection::{
        project_portfolio, project_retirement, project_savings, PortfolioParams, RetirementParams,
        SavingsParams,
    };
    use crate::tax::{calculate_taxes, TaxParams};

    #[test]
    fn test_currency_grouping() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1_000.0), "$1,000");
        assert_eq!(format_currency(1_234_567.89), "$1,234,568");
        assert_eq!(format_currency(-25_000.0), "-$25,000");
        assert_eq!(format_currency(-0.2), "$0");
    }

    #[test]
    fn test_retirement_export() {
        let projection = project_retirement(&RetirementParams::default()).unwrap();
        let csv = to_csv_string(&projection.rows).unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("Age,Year,Balance,Contribution"));
        assert_eq!(lines.next(), Some("30,0,50000,50000"));
        assert_eq!(csv.lines().count(), 37);
    }

    #[test]
    fn test_savings_export_header() {
        let projection = project_savings(&SavingsParams::default()).unwrap();
        let csv = to_csv_string(&projection.rows).unwrap();
        assert!(csv.starts_with("Year,Month,Balance,Total Contributions\n0,0,1000,1000\n"));
        assert!(csv.trim_end().ends_with(",25000"));
    }

    #[test]
    fn test_currency_fields_are_quoted() {
        let profiles = ProfileTable::default_profiles();
        let projection = project_portfolio(&PortfolioParams::default(), &profiles).unwrap();

        let allocation = to_csv_string(&projection.allocation).unwrap();
        let mut lines = allocation.lines();
        assert_eq!(lines.next(), Some("Asset Class,Percentage,Amount,Expected Return"));
        assert_eq!(lines.next(), Some("Bonds,40%,\"$40,000\",3.5%"));

        let values = to_csv_string(&projection.values).unwrap();
        assert!(values.starts_with("Year,Portfolio Value,Growth\n0,\"$100,000\",$0\n"));
    }

    #[test]
    fn test_tax_export() {
        let params = TaxParams {
            state: "texas".to_string(),
            ..TaxParams::default()
        };
        let result = calculate_taxes(&params, &TaxTables::default_2023()).unwrap();
        let csv = to_csv_string(&result.summary_lines()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Category,Amount");
        assert_eq!(lines[1], "Gross Income,\"$75,000\"");
        assert_eq!(lines[8], "Take-home Pay,\"$61,624\"");
        assert_eq!(lines[9], "Effective Tax Rate,17.83%");
    }
}

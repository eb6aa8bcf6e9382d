//! Financial Projections CLI
//!
//! Command-line front end for the retirement, savings, tax and portfolio calculators

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use financial_projections::export::{format_currency, format_percent, write_records, CsvRecord};
use financial_projections::{
    Assumptions, CompoundingFrequency, FilingStatus, PortfolioParams, RetirementParams, RiskProfile,
    SavingsParams, ScenarioRunner, TaxParams,
};

#[derive(Debug, Parser)]
#[command(
    name = "projections",
    version,
    about = "Retirement, savings, tax and portfolio projections"
)]
struct Cli {
    /// Directory holding assumption CSV files; built-in tables are used when omitted
    #[arg(long, global = true)]
    assumptions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Project retirement savings in today's dollars
    Retirement(RetirementArgs),
    /// Project savings with a chosen compounding frequency
    Savings(SavingsArgs),
    /// Break down federal, state and payroll taxes
    Tax(TaxArgs),
    /// Allocate and grow a portfolio for a risk profile
    Portfolio(PortfolioArgs),
}

#[derive(Debug, Args)]
struct RetirementArgs {
    #[arg(long, default_value_t = 30)]
    current_age: u32,
    #[arg(long, default_value_t = 65)]
    retirement_age: u32,
    #[arg(long, default_value_t = 50_000.0)]
    current_savings: f64,
    #[arg(long, default_value_t = 6_000.0)]
    annual_contribution: f64,
    /// Nominal annual return (%)
    #[arg(long, default_value_t = 7.0)]
    expected_return: f64,
    /// Annual inflation (%)
    #[arg(long, default_value_t = 2.5)]
    inflation_rate: f64,
    /// Write the series to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SavingsArgs {
    #[arg(long, default_value_t = 1_000.0)]
    initial_deposit: f64,
    #[arg(long, default_value_t = 200.0)]
    monthly_contribution: f64,
    /// Nominal annual rate (%)
    #[arg(long, default_value_t = 5.0)]
    interest_rate: f64,
    #[arg(long, default_value_t = 10)]
    years: u32,
    /// annually, semiannually, quarterly, monthly or daily
    #[arg(long, default_value = "monthly")]
    frequency: CompoundingFrequency,
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct TaxArgs {
    #[arg(long, default_value_t = 75_000.0)]
    income: f64,
    /// single, married or head
    #[arg(long, default_value = "single")]
    filing_status: FilingStatus,
    #[arg(long, default_value_t = 6_000.0)]
    retirement_contributions: f64,
    #[arg(long, default_value_t = 12_950.0)]
    other_deductions: f64,
    #[arg(long, default_value = "california")]
    state: String,
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct PortfolioArgs {
    #[arg(long, default_value_t = 100_000.0)]
    investment_amount: f64,
    /// conservative, moderate or aggressive
    #[arg(long, default_value = "moderate")]
    risk_profile: RiskProfile,
    #[arg(long, default_value_t = 15)]
    horizon_years: u32,
    /// Allocation CSV; returns go to a `_returns` file alongside it
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let runner = match &cli.assumptions {
        Some(dir) => ScenarioRunner::from_csv_path(dir)
            .with_context(|| format!("loading assumptions from {}", dir.display()))?,
        None => ScenarioRunner::with_assumptions(Assumptions::default_tables()),
    };

    match cli.command {
        Command::Retirement(args) => run_retirement(&runner, args),
        Command::Savings(args) => run_savings(&runner, args),
        Command::Tax(args) => run_tax(&runner, args),
        Command::Portfolio(args) => run_portfolio(&runner, args),
    }
}

fn run_retirement(runner: &ScenarioRunner, args: RetirementArgs) -> Result<()> {
    let params = RetirementParams {
        current_age: args.current_age,
        retirement_age: args.retirement_age,
        current_savings: args.current_savings,
        annual_contribution: args.annual_contribution,
        expected_return: args.expected_return,
        inflation_rate: args.inflation_rate,
    };
    let projection = runner.run_retirement(&params)?;

    println!("{:>5} {:>5} {:>16} {:>14}", "Age", "Year", "Balance", "Contribution");
    println!("{}", "-".repeat(43));
    for row in &projection.rows {
        println!(
            "{:>5} {:>5} {:>16} {:>14}",
            row.age,
            row.year,
            format_currency(row.balance),
            format_currency(row.contribution)
        );
    }

    let summary = projection.summary();
    println!("\nSummary:");
    println!("  Real Rate:           {}", format_percent(summary.real_rate * 100.0));
    println!("  Final Balance:       {}", format_currency(summary.final_balance));
    println!("  Total Contributions: {}", format_currency(summary.total_contributions));
    println!("  Total Growth:        {}", format_currency(summary.total_growth));

    if let Some(path) = &args.csv {
        export(path, &projection.rows)?;
    }
    Ok(())
}

fn run_savings(runner: &ScenarioRunner, args: SavingsArgs) -> Result<()> {
    let params = SavingsParams {
        initial_deposit: args.initial_deposit,
        monthly_contribution: args.monthly_contribution,
        interest_rate: args.interest_rate,
        years: args.years,
        frequency: args.frequency,
    };
    let projection = runner.run_savings(&params)?;

    println!("{:>5} {:>6} {:>16} {:>20}", "Year", "Month", "Balance", "Total Contributions");
    println!("{}", "-".repeat(50));
    for row in &projection.rows {
        println!(
            "{:>5} {:>6} {:>16} {:>20}",
            row.year,
            row.month,
            format_currency(row.balance),
            format_currency(row.total_contributions)
        );
    }

    let summary = &projection.summary;
    println!("\nSummary ({} compounding):", params.frequency);
    println!("  Final Balance:       {}", format_currency(summary.final_balance));
    println!("  Total Contributions: {}", format_currency(summary.total_contributions));
    println!("  Interest Earned:     {}", format_currency(summary.interest_earned));

    if let Some(path) = &args.csv {
        export(path, &projection.rows)?;
    }
    Ok(())
}

fn run_tax(runner: &ScenarioRunner, args: TaxArgs) -> Result<()> {
    let params = TaxParams {
        income: args.income,
        filing_status: args.filing_status,
        retirement_contributions: args.retirement_contributions,
        other_deductions: args.other_deductions,
        state: args.state,
    };
    let result = runner.run_tax(&params)?;

    println!("Federal brackets ({}):", params.filing_status);
    for slice in &result.federal_slices {
        let upper = slice.upper.map(format_currency).unwrap_or_else(|| "and up".to_string());
        println!(
            "  {:>5} {:>12} - {:<12} {:>14} taxed {:>12}",
            format!("{:.0}%", slice.rate * 100.0),
            format_currency(slice.lower),
            upper,
            format_currency(slice.taxed_amount),
            format_currency(slice.tax)
        );
    }

    println!();
    let lines = result.summary_lines();
    for line in &lines {
        let fields = line.fields();
        println!("  {:<22} {:>14}", fields[0], fields[1]);
    }
    println!("  {:<22} {:>14}", "Marginal Rate", format_percent(result.marginal_rate * 100.0));

    if let Some(path) = &args.csv {
        export(path, &lines)?;
    }
    Ok(())
}

fn run_portfolio(runner: &ScenarioRunner, args: PortfolioArgs) -> Result<()> {
    let params = PortfolioParams {
        investment_amount: args.investment_amount,
        risk_profile: args.risk_profile,
        horizon_years: args.horizon_years,
    };
    let projection = runner.run_portfolio(&params)?;

    println!("Allocation ({}):", params.risk_profile);
    for asset in &projection.allocation {
        println!(
            "  {:<22} {:>6}% {:>14} {:>6}%",
            asset.name,
            asset.percentage,
            format_currency(asset.amount),
            asset.expected_return
        );
    }
    println!("  Blended expected return: {}", format_percent(projection.blended_return));

    println!("\n{:>5} {:>16} {:>14}", "Year", "Value", "Growth");
    println!("{}", "-".repeat(37));
    for row in &projection.values {
        println!(
            "{:>5} {:>16} {:>14}",
            row.year,
            format_currency(row.value),
            format_currency(row.growth)
        );
    }

    if let Some(path) = &args.csv {
        export(path, &projection.allocation)?;
        export(&sibling_path(path, "_returns"), &projection.values)?;
    }
    Ok(())
}

fn export<T: CsvRecord>(path: &Path, rows: &[T]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_records(file, rows).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    println!("\nResults written to: {}", path.display());
    Ok(())
}

/// `out/alloc.csv` + `_returns` -> `out/alloc_returns.csv`
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("portfolio");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext),
        None => format!("{}{}", stem, suffix),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tax_arguments() {
        let cli = Cli::parse_from([
            "projections",
            "tax",
            "--income",
            "120000",
            "--filing-status",
            "married",
            "--state",
            "New York",
        ]);
        match cli.command {
            Command::Tax(args) => {
                assert_eq!(args.income, 120_000.0);
                assert_eq!(args.filing_status, FilingStatus::MarriedJointly);
                assert_eq!(args.state, "New York");
                assert_eq!(args.other_deductions, 12_950.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_savings_frequency() {
        let cli = Cli::parse_from([
            "projections",
            "savings",
            "--frequency",
            "quarterly",
            "--years",
            "3",
        ]);
        match cli.command {
            Command::Savings(args) => {
                assert_eq!(args.frequency, CompoundingFrequency::Quarterly);
                assert_eq!(args.years, 3);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Cli::try_parse_from(["projections", "savings", "--frequency", "hourly"]).is_err());
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_path(Path::new("out/alloc.csv"), "_returns"),
            PathBuf::from("out/alloc_returns.csv")
        );
        assert_eq!(sibling_path(Path::new("alloc"), "_returns"), PathBuf::from("alloc_returns"));
    }
}

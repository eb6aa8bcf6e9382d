//! CSV-based assumption loader
//!
//! Loads tax tables and risk-profile allocations from CSV files in data/assumptions/

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use super::{AssetClass, FilingStatus, PayrollRates, RiskProfile, TaxBracket};
use crate::error::CalcError;

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

pub const FEDERAL_BRACKETS_FILE: &str = "federal_brackets.csv";
pub const STATE_RATES_FILE: &str = "state_rates.csv";
pub const PAYROLL_RATES_FILE: &str = "payroll_rates.csv";
pub const ASSET_CLASSES_FILE: &str = "asset_classes.csv";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("{file} line {line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    #[error("{file} is missing required key {key}")]
    Missing { file: String, key: String },

    #[error("Invalid assumption table: {0}")]
    Invalid(#[from] CalcError),
}

fn open(path: &Path, file: &str) -> Result<File, LoadError> {
    File::open(path.join(file)).map_err(|source| LoadError::Io {
        file: file.to_string(),
        source,
    })
}

/// Deserialize every record of a CSV source, tagging failures with the file name
fn read_rows<R: Read, T: DeserializeOwned>(reader: R, file: &str) -> Result<Vec<T>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| LoadError::Csv {
            file: file.to_string(),
            source,
        })
}

#[derive(Debug, Deserialize)]
struct BracketRow {
    filing_status: String,
    rate: f64,
    up_to: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct StateRow {
    state: String,
    rate: f64,
}

#[derive(Debug, Deserialize)]
struct KeyValueRow {
    key: String,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct AssetRow {
    profile: String,
    name: String,
    percentage: f64,
    expected_return: f64,
}

/// Load federal brackets from CSV (filing_status,rate,up_to; empty up_to = top bracket)
/// Returns brackets grouped by filing status in file order
pub fn load_federal_brackets_from_reader<R: Read>(
    reader: R,
) -> Result<HashMap<FilingStatus, Vec<TaxBracket>>, LoadError> {
    let rows: Vec<BracketRow> = read_rows(reader, FEDERAL_BRACKETS_FILE)?;
    let mut schedules: HashMap<FilingStatus, Vec<TaxBracket>> = HashMap::new();

    for (idx, row) in rows.into_iter().enumerate() {
        let status: FilingStatus =
            row.filing_status.parse().map_err(|e: CalcError| LoadError::Parse {
                file: FEDERAL_BRACKETS_FILE.to_string(),
                line: idx + 2,
                message: e.to_string(),
            })?;
        schedules.entry(status).or_default().push(TaxBracket {
            rate: row.rate,
            up_to: row.up_to,
        });
    }

    Ok(schedules)
}

pub fn load_federal_brackets(
    path: &Path,
) -> Result<HashMap<FilingStatus, Vec<TaxBracket>>, LoadError> {
    load_federal_brackets_from_reader(open(path, FEDERAL_BRACKETS_FILE)?)
}

/// Load flat state rates from CSV (state,rate)
pub fn load_state_rates_from_reader<R: Read>(
    reader: R,
) -> Result<BTreeMap<String, f64>, LoadError> {
    let rows: Vec<StateRow> = read_rows(reader, STATE_RATES_FILE)?;
    let mut rates = BTreeMap::new();

    for (idx, row) in rows.into_iter().enumerate() {
        if rates.insert(row.state.clone(), row.rate).is_some() {
            return Err(LoadError::Parse {
                file: STATE_RATES_FILE.to_string(),
                line: idx + 2,
                message: format!("duplicate state {}", row.state),
            });
        }
    }

    Ok(rates)
}

pub fn load_state_rates(path: &Path) -> Result<BTreeMap<String, f64>, LoadError> {
    load_state_rates_from_reader(open(path, STATE_RATES_FILE)?)
}

/// Load payroll rates from CSV (key,value)
pub fn load_payroll_rates_from_reader<R: Read>(reader: R) -> Result<PayrollRates, LoadError> {
    let rows: Vec<KeyValueRow> = read_rows(reader, PAYROLL_RATES_FILE)?;
    let values: HashMap<String, f64> = rows.into_iter().map(|r| (r.key, r.value)).collect();

    let get = |key: &str| {
        values.get(key).copied().ok_or_else(|| LoadError::Missing {
            file: PAYROLL_RATES_FILE.to_string(),
            key: key.to_string(),
        })
    };

    Ok(PayrollRates {
        social_security_rate: get("social_security_rate")?,
        social_security_wage_base: get("social_security_wage_base")?,
        medicare_rate: get("medicare_rate")?,
        additional_medicare_rate: get("additional_medicare_rate")?,
        additional_medicare_threshold: get("additional_medicare_threshold")?,
    })
}

pub fn load_payroll_rates(path: &Path) -> Result<PayrollRates, LoadError> {
    load_payroll_rates_from_reader(open(path, PAYROLL_RATES_FILE)?)
}

/// Load asset classes from CSV (profile,name,percentage,expected_return)
/// Returns classes grouped by profile in file order
pub fn load_asset_classes_from_reader<R: Read>(
    reader: R,
) -> Result<HashMap<RiskProfile, Vec<AssetClass>>, LoadError> {
    let rows: Vec<AssetRow> = read_rows(reader, ASSET_CLASSES_FILE)?;
    let mut profiles: HashMap<RiskProfile, Vec<AssetClass>> = HashMap::new();

    for (idx, row) in rows.into_iter().enumerate() {
        let profile: RiskProfile = row.profile.parse().map_err(|e: CalcError| LoadError::Parse {
            file: ASSET_CLASSES_FILE.to_string(),
            line: idx + 2,
            message: e.to_string(),
        })?;
        profiles.entry(profile).or_default().push(AssetClass {
            name: row.name,
            percentage: row.percentage,
            expected_return: row.expected_return,
        });
    }

    Ok(profiles)
}

pub fn load_asset_classes(path: &Path) -> Result<HashMap<RiskProfile, Vec<AssetClass>>, LoadError> {
    load_asset_classes_from_reader(open(path, ASSET_CLASSES_FILE)?)
}

/// Raw tables as read from disk, before validation
#[derive(Debug)]
pub struct LoadedAssumptions {
    pub federal_brackets: HashMap<FilingStatus, Vec<TaxBracket>>,
    pub state_rates: BTreeMap<String, f64>,
    pub payroll_rates: PayrollRates,
    pub asset_classes: HashMap<RiskProfile, Vec<AssetClass>>,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self, LoadError> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> Result<Self, LoadError> {
        log::info!("Loading assumptions from {}", path.display());
        Ok(Self {
            federal_brackets: load_federal_brackets(path)?,
            state_rates: load_state_rates(path)?,
            payroll_rates: load_payroll_rates(path)?,
            asset_classes: load_asset_classes(path)?,
        })
    }
}

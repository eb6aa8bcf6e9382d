//! Reference tables: federal brackets, state and payroll rates, risk-profile allocations

mod profiles;
mod tax_tables;
pub mod loader;

pub use profiles::{
    validate_allocation, AssetClass, ProfileTable, RiskProfile, ALLOCATION_TOLERANCE,
};
pub use tax_tables::{state_key, BracketSchedule, FilingStatus, PayrollRates, TaxBracket, TaxTables};
pub use loader::{LoadError, LoadedAssumptions};

use std::collections::HashMap;
use std::path::Path;

/// Container for all calculator assumptions
#[derive(Debug, Clone, Default)]
pub struct Assumptions {
    pub tax: TaxTables,
    pub portfolios: ProfileTable,
}

impl Assumptions {
    /// Create assumptions from the built-in tables
    pub fn default_tables() -> Self {
        Self {
            tax: TaxTables::default_2023(),
            portfolios: ProfileTable::default_profiles(),
        }
    }

    /// Load assumptions from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self, LoadError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, LoadError> {
        let loaded = LoadedAssumptions::load_from(path)?;
        Self::from_loaded(loaded)
    }

    /// Validate raw tables and build the container
    pub fn from_loaded(loaded: LoadedAssumptions) -> Result<Self, LoadError> {
        let federal = loaded
            .federal_brackets
            .into_iter()
            .map(|(status, brackets)| {
                BracketSchedule::new(brackets).map(|schedule| (status, schedule))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        let tax = TaxTables::new(federal, loaded.state_rates, loaded.payroll_rates)?;
        let portfolios = ProfileTable::new(loaded.asset_classes)?;

        log::info!(
            "Loaded {} state rates and {} filing-status schedules",
            tax.states().count(),
            FilingStatus::ALL.iter().filter(|s| tax.schedule(**s).is_ok()).count()
        );

        Ok(Self { tax, portfolios })
    }
}

//! Federal bracket schedules, flat state rates and payroll (FICA) rates

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

/// Filing status selecting a federal bracket schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingStatus {
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "married", alias = "married-jointly", alias = "married_jointly")]
    MarriedJointly,
    #[serde(rename = "head", alias = "head-of-household", alias = "head_of_household")]
    HeadOfHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 3] = [
        FilingStatus::Single,
        FilingStatus::MarriedJointly,
        FilingStatus::HeadOfHousehold,
    ];

    /// Key used in the bracket table files
    pub fn as_str(&self) -> &'static str {
        match self {
            FilingStatus::Single => "single",
            FilingStatus::MarriedJointly => "married",
            FilingStatus::HeadOfHousehold => "head",
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilingStatus {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "single" => Ok(FilingStatus::Single),
            "married" | "married-jointly" => Ok(FilingStatus::MarriedJointly),
            "head" | "head-of-household" => Ok(FilingStatus::HeadOfHousehold),
            _ => Err(CalcError::UnknownSelector {
                kind: "filing status",
                value: s.to_string(),
            }),
        }
    }
}

/// One marginal bracket: income up to `up_to` is taxed at `rate`.
/// `up_to == None` marks the open-ended top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub rate: f64,
    pub up_to: Option<f64>,
}

impl TaxBracket {
    pub fn new(rate: f64, up_to: f64) -> Self {
        Self { rate, up_to: Some(up_to) }
    }

    pub fn unbounded(rate: f64) -> Self {
        Self { rate, up_to: None }
    }

    /// Upper bound as a float, infinite for the top bracket
    pub fn upper_bound(&self) -> f64 {
        self.up_to.unwrap_or(f64::INFINITY)
    }
}

/// Progressive schedule for one filing status, ascending by bound
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    /// Build a schedule, sorting by upper bound and checking coverage.
    ///
    /// The schedule must be non-empty, bounds must be positive and strictly
    /// increasing, and exactly the last bracket must be unbounded so every
    /// non-negative income lands in exactly one slice per bracket.
    pub fn new(mut brackets: Vec<TaxBracket>) -> CalcResult<Self> {
        if brackets.is_empty() {
            return Err(CalcError::InvalidRange {
                field: "brackets",
                reason: "schedule has no brackets".to_string(),
            });
        }

        for bracket in &brackets {
            if !bracket.rate.is_finite() || bracket.rate < 0.0 || bracket.rate > 1.0 {
                return Err(CalcError::InvalidPercentage {
                    field: "bracket rate",
                    reason: format!("{} is outside [0, 1]", bracket.rate),
                });
            }
            if let Some(bound) = bracket.up_to {
                if !bound.is_finite() || bound <= 0.0 {
                    return Err(CalcError::InvalidRange {
                        field: "bracket bound",
                        reason: format!("{} must be a positive finite bound", bound),
                    });
                }
            }
        }

        brackets.sort_by(|a, b| a.upper_bound().total_cmp(&b.upper_bound()));

        let unbounded = brackets.iter().filter(|b| b.up_to.is_none()).count();
        if unbounded != 1 {
            return Err(CalcError::InvalidRange {
                field: "brackets",
                reason: format!("expected exactly one unbounded top bracket, found {}", unbounded),
            });
        }

        for pair in brackets.windows(2) {
            if pair[1].upper_bound() <= pair[0].upper_bound() {
                return Err(CalcError::InvalidRange {
                    field: "brackets",
                    reason: format!(
                        "bounds must be strictly increasing ({} then {})",
                        pair[0].upper_bound(),
                        pair[1].upper_bound()
                    ),
                });
            }
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Lower bound of the bracket at `index`
    pub fn lower_bound(&self, index: usize) -> f64 {
        if index == 0 {
            0.0
        } else {
            self.brackets[index - 1].upper_bound()
        }
    }
}

/// Payroll tax parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayrollRates {
    pub social_security_rate: f64,
    pub social_security_wage_base: f64,
    pub medicare_rate: f64,
    pub additional_medicare_rate: f64,
    pub additional_medicare_threshold: f64,
}

impl Default for PayrollRates {
    fn default() -> Self {
        Self {
            social_security_rate: 0.062,
            social_security_wage_base: 160_200.0,
            medicare_rate: 0.0145,
            additional_medicare_rate: 0.009,
            additional_medicare_threshold: 200_000.0,
        }
    }
}

impl PayrollRates {
    pub fn validate(&self) -> CalcResult<()> {
        for (field, rate) in [
            ("social_security_rate", self.social_security_rate),
            ("medicare_rate", self.medicare_rate),
            ("additional_medicare_rate", self.additional_medicare_rate),
        ] {
            if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
                return Err(CalcError::InvalidPercentage {
                    field,
                    reason: format!("{} is outside [0, 1]", rate),
                });
            }
        }
        for (field, amount) in [
            ("social_security_wage_base", self.social_security_wage_base),
            ("additional_medicare_threshold", self.additional_medicare_threshold),
        ] {
            if !amount.is_finite() || amount < 0.0 {
                return Err(CalcError::InvalidRange {
                    field,
                    reason: format!("{} must be a non-negative amount", amount),
                });
            }
        }
        Ok(())
    }
}

/// Normalise a state selector: "New York" and "new-york" both become "newyork"
pub fn state_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// All reference data the tax engine needs
#[derive(Debug, Clone)]
pub struct TaxTables {
    federal: HashMap<FilingStatus, BracketSchedule>,
    state_rates: BTreeMap<String, f64>,
    pub payroll: PayrollRates,
}

impl TaxTables {
    pub fn new(
        federal: HashMap<FilingStatus, BracketSchedule>,
        state_rates: BTreeMap<String, f64>,
        payroll: PayrollRates,
    ) -> CalcResult<Self> {
        for (state, &rate) in &state_rates {
            if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
                return Err(CalcError::InvalidPercentage {
                    field: "state rate",
                    reason: format!("{} rate {} is outside [0, 1]", state, rate),
                });
            }
        }
        payroll.validate()?;

        let mut normalised = BTreeMap::new();
        for (state, rate) in state_rates {
            let key = state_key(&state);
            if normalised.insert(key.clone(), rate).is_some() {
                return Err(CalcError::InvalidRange {
                    field: "state",
                    reason: format!("{} duplicates an earlier entry for {}", state, key),
                });
            }
        }

        Ok(Self {
            federal,
            state_rates: normalised,
            payroll,
        })
    }

    /// 2023 federal brackets, ten state rates and FICA rates
    pub fn default_2023() -> Self {
        let mut federal = HashMap::new();
        federal.insert(
            FilingStatus::Single,
            Self::schedule_from(&[11_000.0, 44_725.0, 95_375.0, 182_100.0, 231_250.0, 578_125.0]),
        );
        federal.insert(
            FilingStatus::MarriedJointly,
            Self::schedule_from(&[22_000.0, 89_450.0, 190_750.0, 364_200.0, 462_500.0, 693_750.0]),
        );
        federal.insert(
            FilingStatus::HeadOfHousehold,
            Self::schedule_from(&[15_700.0, 59_850.0, 95_350.0, 182_100.0, 231_250.0, 578_100.0]),
        );

        let state_rates = [
            ("california", 0.093),
            ("newyork", 0.068),
            ("texas", 0.0),
            ("florida", 0.0),
            ("illinois", 0.0495),
            ("washington", 0.0),
            ("pennsylvania", 0.0307),
            ("ohio", 0.0399),
            ("georgia", 0.0575),
            ("northcarolina", 0.0499),
        ]
        .into_iter()
        .map(|(state, rate)| (state.to_string(), rate))
        .collect();

        Self {
            federal,
            state_rates,
            payroll: PayrollRates::default(),
        }
    }

    // Marginal rates are shared across filing statuses; only the bounds differ.
    fn schedule_from(bounds: &[f64; 6]) -> BracketSchedule {
        const RATES: [f64; 7] = [0.10, 0.12, 0.22, 0.24, 0.32, 0.35, 0.37];
        let brackets = bounds
            .iter()
            .zip(RATES)
            .map(|(&bound, rate)| TaxBracket::new(rate, bound))
            .chain(std::iter::once(TaxBracket::unbounded(RATES[6])))
            .collect();
        BracketSchedule { brackets }
    }

    pub fn schedule(&self, status: FilingStatus) -> CalcResult<&BracketSchedule> {
        self.federal.get(&status).ok_or_else(|| CalcError::UnknownSelector {
            kind: "filing status",
            value: status.to_string(),
        })
    }

    pub fn state_rate(&self, state: &str) -> CalcResult<f64> {
        self.state_rates
            .get(&state_key(state))
            .copied()
            .ok_or_else(|| CalcError::UnknownSelector {
                kind: "state",
                value: state.to_string(),
            })
    }

    /// State keys in alphabetical order
    pub fn states(&self) -> impl Iterator<Item = (&str, f64)> {
        self.state_rates.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

impl Default for TaxTables {
    fn default() -> Self {
        Self::default_2023()
    }
}

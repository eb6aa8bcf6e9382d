//! Risk profiles and their asset-class allocations

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

/// Allowed drift of an allocation total away from 100%
pub const ALLOCATION_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 3] = [
        RiskProfile::Conservative,
        RiskProfile::Moderate,
        RiskProfile::Aggressive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Moderate => "moderate",
            RiskProfile::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskProfile::Conservative),
            "moderate" => Ok(RiskProfile::Moderate),
            "aggressive" => Ok(RiskProfile::Aggressive),
            _ => Err(CalcError::UnknownSelector {
                kind: "risk profile",
                value: s.to_string(),
            }),
        }
    }
}

/// A named asset class within a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClass {
    pub name: String,
    /// Share of the portfolio in percent (0-100)
    pub percentage: f64,
    /// Expected annual return in percent
    pub expected_return: f64,
}

impl AssetClass {
    pub fn new(name: &str, percentage: f64, expected_return: f64) -> Self {
        Self {
            name: name.to_string(),
            percentage,
            expected_return,
        }
    }
}

/// Check that an allocation set is non-empty, non-negative and sums to 100
pub fn validate_allocation(classes: &[AssetClass]) -> CalcResult<()> {
    if classes.is_empty() {
        return Err(CalcError::InvalidPercentage {
            field: "allocation",
            reason: "profile has no asset classes".to_string(),
        });
    }

    for class in classes {
        if !class.percentage.is_finite() || class.percentage < 0.0 {
            return Err(CalcError::InvalidPercentage {
                field: "allocation",
                reason: format!("{} has allocation {}", class.name, class.percentage),
            });
        }
        if !class.expected_return.is_finite() {
            return Err(CalcError::InvalidPercentage {
                field: "expected return",
                reason: format!("{} has expected return {}", class.name, class.expected_return),
            });
        }
    }

    let total: f64 = classes.iter().map(|c| c.percentage).sum();
    if (total - 100.0).abs() > ALLOCATION_TOLERANCE {
        return Err(CalcError::InvalidPercentage {
            field: "allocation",
            reason: format!("percentages sum to {}, expected 100", total),
        });
    }

    Ok(())
}

/// Asset-class allocations keyed by risk profile
#[derive(Debug, Clone)]
pub struct ProfileTable {
    profiles: HashMap<RiskProfile, Vec<AssetClass>>,
}

impl ProfileTable {
    /// Build a table, validating each profile's allocation
    pub fn new(profiles: HashMap<RiskProfile, Vec<AssetClass>>) -> CalcResult<Self> {
        for classes in profiles.values() {
            validate_allocation(classes)?;
        }
        Ok(Self { profiles })
    }

    /// Conservative / moderate / aggressive mixes of the same five classes
    pub fn default_profiles() -> Self {
        let mix = |bonds, large, mid, intl, cash| {
            vec![
                AssetClass::new("Bonds", bonds, 3.5),
                AssetClass::new("Large Cap Stocks", large, 7.0),
                AssetClass::new("Mid Cap Stocks", mid, 8.0),
                AssetClass::new("International Stocks", intl, 7.5),
                AssetClass::new("Cash", cash, 1.5),
            ]
        };

        let mut profiles = HashMap::new();
        profiles.insert(RiskProfile::Conservative, mix(60.0, 20.0, 10.0, 5.0, 5.0));
        profiles.insert(RiskProfile::Moderate, mix(40.0, 30.0, 15.0, 10.0, 5.0));
        profiles.insert(RiskProfile::Aggressive, mix(20.0, 40.0, 20.0, 15.0, 5.0));

        Self { profiles }
    }

    pub fn get(&self, profile: RiskProfile) -> CalcResult<&[AssetClass]> {
        self.profiles
            .get(&profile)
            .map(Vec::as_slice)
            .ok_or_else(|| CalcError::UnknownSelector {
                kind: "risk profile",
                value: profile.to_string(),
            })
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::default_profiles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_profiles_sum_to_100() {
        let table = ProfileTable::default_profiles();
        for profile in RiskProfile::ALL {
            let classes = table.get(profile).unwrap();
            let total: f64 = classes.iter().map(|c| c.percentage).sum();
            assert_abs_diff_eq!(total, 100.0, epsilon = 1e-12);
            assert!(validate_allocation(classes).is_ok());
        }
    }

    #[test]
    fn test_allocation_must_sum_to_100() {
        let classes = vec![
            AssetClass::new("Bonds", 50.0, 3.5),
            AssetClass::new("Stocks", 40.0, 7.0),
        ];
        let err = validate_allocation(&classes).unwrap_err();
        assert!(matches!(err, CalcError::InvalidPercentage { field: "allocation", .. }));

        let mut profiles = HashMap::new();
        profiles.insert(RiskProfile::Moderate, classes);
        assert!(ProfileTable::new(profiles).is_err());
    }

    #[test]
    fn test_negative_allocation_rejected() {
        let classes = vec![
            AssetClass::new("Bonds", 120.0, 3.5),
            AssetClass::new("Short", -20.0, 7.0),
        ];
        assert!(validate_allocation(&classes).is_err());
        assert!(validate_allocation(&[]).is_err());
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!("Aggressive".parse::<RiskProfile>().unwrap(), RiskProfile::Aggressive);
        assert!(matches!(
            "yolo".parse::<RiskProfile>(),
            Err(CalcError::UnknownSelector { kind: "risk profile", .. })
        ));
    }

    #[test]
    fn test_missing_profile() {
        let table = ProfileTable::new(HashMap::new()).unwrap();
        assert!(table.get(RiskProfile::Moderate).is_err());
    }
}

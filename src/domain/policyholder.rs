//! Policyholder attributes collected by the single-record form.
//!
//! The categorical domains below are exactly the categories the classifier
//! was trained on; the form never offers anything else.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::features::{RawRecord, RawValue};

/// Allowed age in years.
pub const AGE_RANGE: RangeInclusive<u32> = 18..=70;
/// Allowed vehicle age in years.
pub const VEHICLE_AGE_RANGE: RangeInclusive<u32> = 0..=20;
/// Allowed annual premium (ZAR).
pub const ANNUAL_PREMIUM_RANGE: RangeInclusive<u32> = 1000..=20000;
/// Allowed number of previous claims.
pub const CLAIMS_HISTORY_RANGE: RangeInclusive<u32> = 0..=10;
/// Allowed credit score.
pub const CREDIT_SCORE_RANGE: RangeInclusive<u32> = 300..=850;
/// Allowed number of dependents.
pub const DEPENDENTS_RANGE: RangeInclusive<u32> = 0..=5;

/// Attribute names in the order the form collects them.
pub const ATTRIBUTE_NAMES: [&str; 9] = [
    "age",
    "gender",
    "policy_type",
    "vehicle_age",
    "annual_premium",
    "claims_history",
    "region",
    "credit_score",
    "number_of_dependents",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Self::Male, Self::Female];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyType {
    Comprehensive,
    ThirdParty,
    ThirdPartyFireAndTheft,
}

impl PolicyType {
    pub const ALL: [PolicyType; 3] = [
        Self::Comprehensive,
        Self::ThirdParty,
        Self::ThirdPartyFireAndTheft,
    ];

    /// Category label exactly as it appeared in the training data.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comprehensive => "Comprehensive",
            Self::ThirdParty => "Third Party",
            Self::ThirdPartyFireAndTheft => "Third Party, Fire and Theft",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Urban,
    Suburban,
    Rural,
}

impl Region {
    pub const ALL: [Region; 3] = [Self::Urban, Self::Suburban, Self::Rural];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urban => "Urban",
            Self::Suburban => "Suburban",
            Self::Rural => "Rural",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One policyholder as entered through the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyholderRecord {
    /// Age in years (18-70)
    pub age: u32,

    pub gender: Gender,

    pub policy_type: PolicyType,

    /// Vehicle age in years (0-20)
    pub vehicle_age: u32,

    /// Annual premium in ZAR (1000-20000)
    pub annual_premium: u32,

    /// Number of previous claims (0-10)
    pub claims_history: u32,

    pub region: Region,

    /// Credit score (300-850)
    pub credit_score: u32,

    /// Number of dependents (0-5)
    pub number_of_dependents: u32,
}

impl Default for PolicyholderRecord {
    fn default() -> Self {
        Self {
            age: 30,
            gender: Gender::Male,
            policy_type: PolicyType::Comprehensive,
            vehicle_age: 5,
            annual_premium: 8000,
            claims_history: 1,
            region: Region::Urban,
            credit_score: 600,
            number_of_dependents: 1,
        }
    }
}

impl PolicyholderRecord {
    /// Validate that all numeric attributes are within the form's bounds.
    ///
    /// # Errors
    /// Returns every violated bound as a separate message.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let checks: [(&str, u32, &RangeInclusive<u32>); 6] = [
            ("Age", self.age, &AGE_RANGE),
            ("Vehicle age", self.vehicle_age, &VEHICLE_AGE_RANGE),
            ("Annual premium", self.annual_premium, &ANNUAL_PREMIUM_RANGE),
            ("Previous claims", self.claims_history, &CLAIMS_HISTORY_RANGE),
            ("Credit score", self.credit_score, &CREDIT_SCORE_RANGE),
            ("Dependents", self.number_of_dependents, &DEPENDENTS_RANGE),
        ];

        let errors: Vec<String> = checks
            .iter()
            .filter(|(_, value, range)| !range.contains(value))
            .map(|(label, value, range)| {
                format!(
                    "{label} {value} out of range [{}, {}]",
                    range.start(),
                    range.end()
                )
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Convert to the untyped record the feature encoder consumes.
    #[must_use]
    pub fn to_raw_record(&self) -> RawRecord {
        RawRecord::new()
            .with("age", RawValue::from(self.age))
            .with("gender", RawValue::from(self.gender.as_str()))
            .with("policy_type", RawValue::from(self.policy_type.as_str()))
            .with("vehicle_age", RawValue::from(self.vehicle_age))
            .with("annual_premium", RawValue::from(self.annual_premium))
            .with("claims_history", RawValue::from(self.claims_history))
            .with("region", RawValue::from(self.region.as_str()))
            .with("credit_score", RawValue::from(self.credit_score))
            .with("number_of_dependents", RawValue::from(self.number_of_dependents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PolicyholderRecord::default().validate().is_ok());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let record = PolicyholderRecord {
            age: 17,
            credit_score: 900,
            ..Default::default()
        };
        let errors = record.validate().expect_err("Should be invalid");
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("Age 17"));
        assert!(errors[1].starts_with("Credit score 900"));
    }

    #[test]
    fn test_raw_record_keeps_form_order() {
        let raw = PolicyholderRecord::default().to_raw_record();
        let names: Vec<&str> = raw.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ATTRIBUTE_NAMES);
        assert_eq!(
            raw.get("policy_type"),
            Some(&RawValue::Category("Comprehensive".to_string()))
        );
    }

    #[test]
    fn test_policy_type_labels_match_training_categories() {
        let labels: Vec<&str> = PolicyType::ALL.iter().map(PolicyType::as_str).collect();
        assert_eq!(
            labels,
            ["Comprehensive", "Third Party", "Third Party, Fire and Theft"]
        );
    }
}

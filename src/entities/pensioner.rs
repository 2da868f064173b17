// 👤 Pensioner Entity
//
// Record fetched from the pensioner-detail service, keyed by the 12-digit
// identity (Aadhaar) number. This service never mutates it: it reads it,
// stores it, and derives a pension amount from it.

use super::bank::Bank;
use super::null_as_default;
use crate::date_util::optional_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// PENSION TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PensionType {
    /// Pension drawn by the retiree
    SelfPension,

    /// Pension drawn by the family of the retiree
    Family,

    /// Anything else; paid at the family rate
    Unknown,
}

impl PensionType {
    /// Classify a raw pension type, ignoring case
    pub fn classify(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("self") {
            PensionType::SelfPension
        } else if raw.eq_ignore_ascii_case("family") {
            PensionType::Family
        } else {
            PensionType::Unknown
        }
    }

    /// Share of the last salary paid as pension
    pub fn salary_multiplier(&self) -> f64 {
        match self {
            PensionType::SelfPension => 0.8,
            PensionType::Family | PensionType::Unknown => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PensionType::SelfPension => "self",
            PensionType::Family => "family",
            PensionType::Unknown => "unknown",
        }
    }
}

// ============================================================================
// PENSIONER RECORD
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionerDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Identity number - unique key, never changes.
    /// Absent when the upstream service has no matching pensioner.
    #[serde(default)]
    pub aadhaar_number: Option<String>,

    #[serde(default, with = "optional_date")]
    pub date_of_birth: Option<NaiveDate>,

    /// Tax identifier
    #[serde(default, deserialize_with = "null_as_default")]
    pub pan: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub salary: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub allowance: f64,

    /// Raw pension type (`self` | `family`), echoed back verbatim in results
    #[serde(default)]
    pub pension_type: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub account_number: i64,

    #[serde(default)]
    pub bank: Option<Bank>,
}

impl PensionerDetail {
    /// Identity number, treating an empty string as absent
    pub fn identity(&self) -> Option<&str> {
        self.aadhaar_number
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }

    /// Classified pension type, `None` when the raw value is absent
    pub fn kind(&self) -> Option<PensionType> {
        self.pension_type.as_deref().map(PensionType::classify)
    }

    /// True when this record belongs to the requested identity number
    pub fn matches_input(&self, input: &PensionerInput) -> bool {
        self.identity() == Some(input.aadhaar_number.as_str())
    }
}

// ============================================================================
// REQUEST / RESULT TYPES
// ============================================================================

/// Request body of `POST /processPension`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionerInput {
    pub aadhaar_number: String,
}

impl PensionerInput {
    pub fn new(aadhaar_number: &str) -> Self {
        PensionerInput {
            aadhaar_number: aadhaar_number.to_string(),
        }
    }
}

/// Computed pension, built fresh per request and never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionResult {
    pub name: String,

    #[serde(default, with = "optional_date")]
    pub date_of_birth: Option<NaiveDate>,

    pub pan: String,
    pub pension_type: String,

    /// Raw value, no rounding or floor
    pub pension_amount: f64,
}

/// Breakdown of a pension payment: gross amount, bank charge, and net total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionAmountDetail {
    pub aadhaar_number: String,
    pub pension_amount: f64,
    pub bank_service_charge: f64,
    pub total_amount: f64,
}

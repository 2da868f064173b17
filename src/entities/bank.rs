// 🏦 Bank Entity - the account a pension is paid into
//
// A bank account belongs to exactly one pensioner. The bank type decides the
// service charge deducted from every pension payment.

use super::null_as_default;
use serde::{Deserialize, Serialize};

// ============================================================================
// BANK TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BankType {
    /// Public sector bank
    Public,

    /// Private sector bank
    Private,

    /// Anything else; charged like a private bank
    Unknown,
}

impl BankType {
    /// Classify a raw bank type, ignoring case
    pub fn classify(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("public") {
            BankType::Public
        } else if raw.eq_ignore_ascii_case("private") {
            BankType::Private
        } else {
            BankType::Unknown
        }
    }

    /// Service charge deducted per payment
    pub fn service_charge(&self) -> f64 {
        match self {
            BankType::Public => 500.0,
            BankType::Private | BankType::Unknown => 550.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BankType::Public => "public",
            BankType::Private => "private",
            BankType::Unknown => "unknown",
        }
    }
}

// ============================================================================
// BANK ACCOUNT
// ============================================================================

/// Bank account linked to a pensioner, keyed by account number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bank_name: String,

    /// Unique key
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_number: i64,

    /// Raw bank type as delivered upstream (`public` | `private`)
    #[serde(default)]
    pub bank_type: Option<String>,
}

impl Bank {
    pub fn new(bank_name: &str, account_number: i64, bank_type: &str) -> Self {
        Bank {
            bank_name: bank_name.to_string(),
            account_number,
            bank_type: Some(bank_type.to_string()),
        }
    }

    /// Classified bank type, `None` when the raw value is absent
    pub fn kind(&self) -> Option<BankType> {
        self.bank_type.as_deref().map(BankType::classify)
    }
}

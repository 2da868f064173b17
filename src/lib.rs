// Process Pension - Core Library
// Exposes all modules for use in the operator CLI, the API server, and tests

pub mod audit;
pub mod calculator;
pub mod clients;
pub mod config;
pub mod date_util;
pub mod db;
pub mod entities;
pub mod error;
pub mod logging;
pub mod repository;
pub mod service;
pub mod validation;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use audit::{get_audit_trail, record_audit, AuditAction, AuditEntry, PayInputs};
pub use calculator::PensionCalculator;
pub use clients::{
    AuthorizationClient, HttpAuthorizationClient, HttpPensionerDetailClient,
    PensionerDetailClient, PensionerRepository,
};
pub use config::{AppConfig, ConfigError};
pub use date_util::parse_date;
pub use db::{
    count_pensioners, get_pension_amount_detail, get_pensioner, save_pension_amount_detail,
    save_pensioner, setup_database,
};
pub use entities::{
    Bank, BankType, PensionAmountDetail, PensionResult, PensionType, PensionerDetail,
    PensionerInput,
};
pub use error::{ErrorResponse, ProcessPensionError};
pub use repository::SqlitePensionerRepository;
pub use service::ProcessPensionService;
pub use validation::{is_valid_identity_number, validate_input};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

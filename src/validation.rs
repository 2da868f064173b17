// 📐 Input validation
// Runs before any collaborator is called.

use crate::entities::PensionerInput;
use crate::error::{ProcessPensionError, Result, INVALID_DETAILS_MESSAGE};

pub const IDENTITY_NUMBER_LENGTH: usize = 12;

/// Exactly 12 ASCII digits
pub fn is_valid_identity_number(value: &str) -> bool {
    value.len() == IDENTITY_NUMBER_LENGTH && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_input(input: &PensionerInput) -> Result<()> {
    if is_valid_identity_number(&input.aadhaar_number) {
        Ok(())
    } else {
        Err(ProcessPensionError::Validation(
            INVALID_DETAILS_MESSAGE.to_string(),
        ))
    }
}

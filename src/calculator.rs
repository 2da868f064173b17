// 🧮 Pension Calculator
//
//   base          = salary * multiplier + allowance   (self 0.8, family 0.5)
//   charge        = 500 for public banks, 550 otherwise
//   pensionAmount = base - charge
//
// No floor and no rounding: small salaries can produce a negative amount.

use crate::entities::{PensionAmountDetail, PensionResult, PensionerDetail};
use crate::error::{ProcessPensionError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct PensionCalculator;

impl PensionCalculator {
    pub fn new() -> Self {
        PensionCalculator
    }

    /// Compute the pension for a record, passing identity fields through
    pub fn compute(&self, record: &PensionerDetail) -> Result<PensionResult> {
        let breakdown = self.breakdown(record)?;
        let pension_type = record
            .pension_type
            .clone()
            .ok_or(ProcessPensionError::MissingField("pensionType"))?;

        Ok(PensionResult {
            name: record.name.clone(),
            date_of_birth: record.date_of_birth,
            pan: record.pan.clone(),
            pension_type,
            pension_amount: breakdown.total_amount,
        })
    }

    /// Gross amount, bank charge and net total for a record
    pub fn breakdown(&self, record: &PensionerDetail) -> Result<PensionAmountDetail> {
        let pension_type = record
            .kind()
            .ok_or(ProcessPensionError::MissingField("pensionType"))?;
        let bank = record
            .bank
            .as_ref()
            .ok_or(ProcessPensionError::MissingField("bank"))?;
        let bank_type = bank
            .kind()
            .ok_or(ProcessPensionError::MissingField("bank.bankType"))?;

        let gross = record.salary * pension_type.salary_multiplier() + record.allowance;
        let charge = bank_type.service_charge();

        Ok(PensionAmountDetail {
            aadhaar_number: record.identity().unwrap_or_default().to_string(),
            pension_amount: gross,
            bank_service_charge: charge,
            total_amount: gross - charge,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::pensioner::fixtures::pensioner;

    fn amount(pension_type: &str, bank_type: &str) -> f64 {
        PensionCalculator::new()
            .compute(&pensioner(pension_type, bank_type))
            .unwrap()
            .pension_amount
    }

    #[test]
    fn test_self_public() {
        assert_eq!(amount("self", "public"), 89500.0);
    }

    #[test]
    fn test_self_private() {
        assert_eq!(amount("self", "private"), 89450.0);
    }

    #[test]
    fn test_family_public() {
        assert_eq!(amount("family", "public"), 59500.0);
    }

    #[test]
    fn test_family_private() {
        assert_eq!(amount("family", "private"), 59450.0);
    }

    #[test]
    fn test_case_insensitive_types() {
        assert_eq!(amount("Self", "PUBLIC"), 89500.0);
        assert_eq!(amount("FAMILY", "Private"), 59450.0);
    }

    #[test]
    fn test_unrecognized_types_use_lower_rate() {
        // Unknown pension type -> family rate, unknown bank -> private charge
        assert_eq!(amount("widow", "cooperative"), 59450.0);
    }

    #[test]
    fn test_formula_over_salary_grid() {
        let calc = PensionCalculator::new();
        for salary in [0.0, 1.0, 1234.5, 50000.0, 1e7] {
            for allowance in [0.0, 99.0, 10000.0] {
                let mut record = pensioner("self", "public");
                record.salary = salary;
                record.allowance = allowance;
                assert_eq!(
                    calc.compute(&record).unwrap().pension_amount,
                    salary * 0.8 + allowance - 500.0
                );

                record.pension_type = Some("family".to_string());
                record.bank = Some(crate::entities::Bank::new("HDFC", 1, "private"));
                assert_eq!(
                    calc.compute(&record).unwrap().pension_amount,
                    salary * 0.5 + allowance - 550.0
                );
            }
        }
    }

    #[test]
    fn test_small_salary_goes_negative() {
        let mut record = pensioner("family", "private");
        record.salary = 100.0;
        record.allowance = 0.0;

        let result = PensionCalculator::new().compute(&record).unwrap();
        assert_eq!(result.pension_amount, -500.0);
    }

    #[test]
    fn test_passthrough_fields() {
        let record = pensioner("Family", "public");
        let result = PensionCalculator::new().compute(&record).unwrap();

        assert_eq!(result.name, "Vishnu");
        assert_eq!(result.pan, "BRPPV3218K");
        assert_eq!(result.date_of_birth, record.date_of_birth);
        // Copied verbatim, not normalized
        assert_eq!(result.pension_type, "Family");
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let calc = PensionCalculator::new();

        let mut record = pensioner("self", "public");
        record.pension_type = None;
        assert!(matches!(
            calc.compute(&record),
            Err(ProcessPensionError::MissingField("pensionType"))
        ));

        let mut record = pensioner("self", "public");
        record.bank = None;
        assert!(matches!(
            calc.compute(&record),
            Err(ProcessPensionError::MissingField("bank"))
        ));

        let mut record = pensioner("self", "public");
        if let Some(bank) = record.bank.as_mut() {
            bank.bank_type = None;
        }
        assert!(matches!(
            calc.compute(&record),
            Err(ProcessPensionError::MissingField("bank.bankType"))
        ));
    }

    #[test]
    fn test_breakdown_agrees_with_compute() {
        let calc = PensionCalculator::new();
        let record = pensioner("self", "private");

        let breakdown = calc.breakdown(&record).unwrap();
        assert_eq!(breakdown.aadhaar_number, "123456789011");
        assert_eq!(breakdown.pension_amount, 90000.0);
        assert_eq!(breakdown.bank_service_charge, 550.0);
        assert_eq!(breakdown.total_amount, 89450.0);
        assert_eq!(
            calc.compute(&record).unwrap().pension_amount,
            breakdown.total_amount
        );
    }
}

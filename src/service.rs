// ⚙️ Process Pension Service
//
// validate input -> authorize token -> fetch record -> check presence
//   -> persist record -> compute pension
//
// Every step runs in sequence; any failure ends the request. Nothing is retried.

use crate::calculator::PensionCalculator;
use crate::clients::{AuthorizationClient, PensionerDetailClient, PensionerRepository};
use crate::entities::{PensionResult, PensionerInput};
use crate::error::{ProcessPensionError, Result, DETAILS_INCORRECT_MESSAGE, FORBIDDEN_MESSAGE};
use crate::validation::validate_input;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct ProcessPensionService {
    authorization: Arc<dyn AuthorizationClient>,
    pensioner_details: Arc<dyn PensionerDetailClient>,
    repository: Arc<dyn PensionerRepository>,
    calculator: PensionCalculator,
}

impl ProcessPensionService {
    pub fn new(
        authorization: Arc<dyn AuthorizationClient>,
        pensioner_details: Arc<dyn PensionerDetailClient>,
        repository: Arc<dyn PensionerRepository>,
    ) -> Self {
        Self {
            authorization,
            pensioner_details,
            repository,
            calculator: PensionCalculator::new(),
        }
    }

    /// Handle one pension request for the caller holding `token`
    pub async fn process_pension(&self, token: &str, input: &PensionerInput) -> Result<PensionResult> {
        info!("START - process_pension()");

        validate_input(input)?;

        if !self.authorization.validate(token).await? {
            return Err(ProcessPensionError::Unauthorized(FORBIDDEN_MESSAGE.to_string()));
        }

        let record = self
            .pensioner_details
            .fetch_by_identity(&input.aadhaar_number)
            .await?;
        debug!("Pensioner details: {:?}", record);

        if record.identity().is_none() {
            return Err(ProcessPensionError::NotFound(DETAILS_INCORRECT_MESSAGE.to_string()));
        }
        if !record.matches_input(input) {
            warn!(
                "Pensioner detail service returned a different identity for {}",
                input.aadhaar_number
            );
        }
        info!("Pensioner details found");

        let saved = self.repository.save(&record).await?;
        let result = self.calculator.compute(&saved)?;

        info!("END - process_pension()");
        Ok(result)
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::*;
    use super::*;
    use crate::entities::pensioner::fixtures::pensioner;
    use std::sync::atomic::Ordering;

    const TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";

    fn input() -> PensionerInput {
        PensionerInput::new("123456789011")
    }

    #[tokio::test]
    async fn test_process_pension_for_self() {
        let repo = Arc::new(FakeRepository::default());
        let service = ProcessPensionService::new(
            FakeAuthorization::new(true),
            FakePensionerDetails::returning(pensioner("self", "public")),
            repo.clone(),
        );

        let result = service.process_pension(TOKEN, &input()).await.unwrap();

        assert_eq!(result.pension_amount, 89500.0);
        assert_eq!(repo.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_process_pension_for_family() {
        let service = ProcessPensionService::new(
            FakeAuthorization::new(true),
            FakePensionerDetails::returning(pensioner("family", "public")),
            Arc::new(FakeRepository::default()),
        );

        let result = service.process_pension(TOKEN, &input()).await.unwrap();
        assert_eq!(result.pension_amount, 59500.0);
        assert_eq!(result.pension_type, "family");
    }

    #[tokio::test]
    async fn test_invalid_token_short_circuits() {
        let details = FakePensionerDetails::returning(pensioner("self", "public"));
        let service = ProcessPensionService::new(
            FakeAuthorization::new(false),
            details.clone(),
            Arc::new(FakeRepository::default()),
        );

        let err = service.process_pension("user1", &input()).await.unwrap_err();

        assert!(matches!(err, ProcessPensionError::Unauthorized(_)));
        assert_eq!(err.status_code(), 403);
        assert_eq!(details.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_identity_rejected_before_any_call() {
        let auth = FakeAuthorization::new(true);
        let details = FakePensionerDetails::returning(pensioner("self", "public"));
        let service = ProcessPensionService::new(
            auth.clone(),
            details.clone(),
            Arc::new(FakeRepository::default()),
        );

        let err = service
            .process_pension(TOKEN, &PensionerInput::new("30054646895"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessPensionError::Validation(_)));
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
        assert_eq!(details.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let mut empty = pensioner("self", "public");
        empty.aadhaar_number = None;
        let repo = Arc::new(FakeRepository::default());
        let service = ProcessPensionService::new(
            FakeAuthorization::new(true),
            FakePensionerDetails::returning(empty),
            repo.clone(),
        );

        let err = service.process_pension(TOKEN, &input()).await.unwrap_err();

        assert!(matches!(err, ProcessPensionError::NotFound(_)));
        assert_eq!(err.to_string(), "Details entered are incorrect");
        assert!(repo.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_error_is_relayed() {
        let service = ProcessPensionService::new(
            FakeAuthorization::new(true),
            FakePensionerDetails::failing(400, br#"{"message":"Internal Server Error"}"#),
            Arc::new(FakeRepository::default()),
        );

        let err = service.process_pension(TOKEN, &input()).await.unwrap_err();
        assert_eq!(err.to_string(), "Internal Server Error");
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_persistence_failure_is_fatal() {
        let service = ProcessPensionService::new(
            FakeAuthorization::new(true),
            FakePensionerDetails::returning(pensioner("self", "public")),
            Arc::new(FakeRepository {
                fail: true,
                ..Default::default()
            }),
        );

        let err = service.process_pension(TOKEN, &input()).await.unwrap_err();
        assert!(matches!(err, ProcessPensionError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_record_without_bank_is_missing_field() {
        let mut record = pensioner("self", "public");
        record.bank = None;
        let service = ProcessPensionService::new(
            FakeAuthorization::new(true),
            FakePensionerDetails::returning(record),
            Arc::new(FakeRepository::default()),
        );

        let err = service.process_pension(TOKEN, &input()).await.unwrap_err();
        assert!(matches!(err, ProcessPensionError::MissingField("bank")));
    }
}

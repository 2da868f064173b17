// Collaborators of the pension request handler.
// The handler only sees these traits; HTTP and SQLite adapters are injected at startup.

pub mod auth;
pub mod pensioner_detail;

use crate::entities::PensionerDetail;
use crate::error::Result;
use async_trait::async_trait;

pub use auth::HttpAuthorizationClient;
pub use pensioner_detail::HttpPensionerDetailClient;

/// Validates access tokens
#[async_trait]
pub trait AuthorizationClient: Send + Sync {
    async fn validate(&self, token: &str) -> Result<bool>;
}

/// Fetches pensioner records by identity number
#[async_trait]
pub trait PensionerDetailClient: Send + Sync {
    async fn fetch_by_identity(&self, aadhaar_number: &str) -> Result<PensionerDetail>;
}

/// Stores pensioner records, upsert keyed by identity number
#[async_trait]
pub trait PensionerRepository: Send + Sync {
    async fn save(&self, record: &PensionerDetail) -> Result<PensionerDetail>;
}

pub(crate) fn build_http_client(timeout: std::time::Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| crate::error::ProcessPensionError::Transport(format!("Failed to create HTTP client: {}", e)))
}

//! Pensioner-detail service adapter

use super::{build_http_client, PensionerDetailClient};
use crate::entities::PensionerDetail;
use crate::error::{ProcessPensionError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

/// Calls `GET {base_url}/pensionerDetailByAadhaar/{aadhaar}`
pub struct HttpPensionerDetailClient {
    client: Client,
    base_url: String,
}

impl HttpPensionerDetailClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn detail_url(&self, aadhaar_number: &str) -> String {
        format!("{}/pensionerDetailByAadhaar/{}", self.base_url, aadhaar_number)
    }
}

#[async_trait]
impl PensionerDetailClient for HttpPensionerDetailClient {
    async fn fetch_by_identity(&self, aadhaar_number: &str) -> Result<PensionerDetail> {
        let response = self
            .client
            .get(self.detail_url(aadhaar_number))
            .send()
            .await
            .map_err(|e| ProcessPensionError::Transport(format!("Pensioner detail request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            warn!("Pensioner detail service answered {}", status);
            return Err(ProcessPensionError::upstream(status.as_u16(), &body));
        }

        response.json::<PensionerDetail>().await.map_err(|e| {
            ProcessPensionError::Transport(format!("Failed to parse pensioner detail: {}", e))
        })
    }
}

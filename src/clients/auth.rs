//! Authorization service adapter

use super::{build_http_client, AuthorizationClient};
use crate::error::{ProcessPensionError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Calls `GET {base_url}/validate` with the caller's token
pub struct HttpAuthorizationClient {
    client: Client,
    base_url: String,
}

impl HttpAuthorizationClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn validate_url(&self) -> String {
        format!("{}/validate", self.base_url)
    }
}

#[async_trait]
impl AuthorizationClient for HttpAuthorizationClient {
    async fn validate(&self, token: &str) -> Result<bool> {
        let response = self
            .client
            .get(self.validate_url())
            .header("Authorization", token)
            .send()
            .await
            .map_err(|e| ProcessPensionError::Transport(format!("Authorization request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => {
                let valid: bool = response.json().await.map_err(|e| {
                    ProcessPensionError::Transport(format!("Failed to parse authorization response: {}", e))
                })?;
                debug!("Token validation verdict: {}", valid);
                Ok(valid)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!("Authorization service rejected token ({})", response.status());
                Ok(false)
            }
            status => {
                let body = response.bytes().await.unwrap_or_default();
                Err(ProcessPensionError::upstream(status.as_u16(), &body))
            }
        }
    }
}

// ⚠️ Error taxonomy for pension processing
//
// Every failure the request path can produce, plus the rules for relaying
// error bodies coming back from the pensioner-detail service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback message when an upstream error body is empty
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid Request";

/// Message returned when no pensioner matches the identity number
pub const DETAILS_INCORRECT_MESSAGE: &str = "Details entered are incorrect";

/// Message returned when the identity number has the wrong format
pub const INVALID_DETAILS_MESSAGE: &str = "Invalid Details";

/// Message returned when the authorization service rejects the token
pub const FORBIDDEN_MESSAGE: &str = "You are not allowed to access this resource";

pub type Result<T> = std::result::Result<T, ProcessPensionError>;

#[derive(Debug, Error)]
pub enum ProcessPensionError {
    /// Malformed request body or identity number
    #[error("{0}")]
    Validation(String),

    /// Token rejected by the authorization service
    #[error("{0}")]
    Unauthorized(String),

    /// No pensioner record for the identity number
    #[error("{0}")]
    NotFound(String),

    /// Error relayed from the pensioner-detail service
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Record is missing a field the calculation dereferences
    #[error("Pensioner record is missing required field: {0}")]
    MissingField(&'static str),

    /// Upstream service could not be reached
    #[error("Upstream service unavailable: {0}")]
    Transport(String),

    /// Storage failed while saving the record
    #[error("Persistence failure: {0:#}")]
    Persistence(#[source] anyhow::Error),
}

impl ProcessPensionError {
    /// Build an upstream error from the raw status and body of a failed call.
    ///
    /// The message is the `message` field of a JSON body, the raw text when the
    /// body is not that JSON shape, or "Invalid Request" when the body is empty.
    pub fn upstream(status: u16, body: &[u8]) -> Self {
        ProcessPensionError::Upstream {
            status,
            message: upstream_message(body),
        }
    }

    /// HTTP status code this error maps to at the boundary
    pub fn status_code(&self) -> u16 {
        match self {
            ProcessPensionError::Validation(_) => 400,
            ProcessPensionError::Unauthorized(_) => 403,
            ProcessPensionError::NotFound(_) => 404,
            ProcessPensionError::Upstream { status, .. } if (400..600).contains(status) => *status,
            ProcessPensionError::Upstream { .. } => 400,
            ProcessPensionError::MissingField(_) => 422,
            ProcessPensionError::Transport(_) => 502,
            ProcessPensionError::Persistence(_) => 500,
        }
    }

    /// Client errors are logged at warn, everything else at error
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// JSON error body: `{ "message": "..." }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<&ProcessPensionError> for ErrorResponse {
    fn from(err: &ProcessPensionError) -> Self {
        ErrorResponse::new(err.to_string())
    }
}

fn upstream_message(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.trim().is_empty() {
        return INVALID_REQUEST_MESSAGE.to_string();
    }

    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => text.into_owned(),
    }
}

// ============================================================================
// HTTP BOUNDARY
// ============================================================================

#[cfg(feature = "server")]
impl axum::response::IntoResponse for ProcessPensionError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code())
            .unwrap_or(axum::http::StatusCode::BAD_REQUEST);
        (status, axum::Json(ErrorResponse::from(&self))).into_response()
    }
}

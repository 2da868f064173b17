// Process Pension - REST API with Axum

use crate::entities::{PensionResult, PensionerInput};
use crate::error::{ProcessPensionError, INVALID_REQUEST_MESSAGE};
use crate::service::ProcessPensionService;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: ProcessPensionService,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse { status: "OK" })
}

/// POST /processPension - Compute the pension for an identity number
async fn process_pension(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<PensionerInput>, JsonRejection>,
) -> Result<Json<PensionResult>, ProcessPensionError> {
    let result = handle_process_pension(&state, &headers, body).await;

    if let Err(e) = &result {
        if e.is_client_error() {
            warn!("processPension failed ({}): {}", e.status_code(), e);
        } else {
            error!("processPension failed ({}): {}", e.status_code(), e);
        }
    }

    result.map(Json)
}

async fn handle_process_pension(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Json<PensionerInput>, JsonRejection>,
) -> Result<PensionResult, ProcessPensionError> {
    let Json(input) = body.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        ProcessPensionError::Validation(INVALID_REQUEST_MESSAGE.to_string())
    })?;

    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ProcessPensionError::Validation("Missing Authorization header".to_string()))?;

    state.service.process_pension(token, &input).await
}

// ============================================================================
// Router
// ============================================================================

pub fn router(service: ProcessPensionService) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/health", get(health_check))
        .route("/processPension", post(process_pension))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

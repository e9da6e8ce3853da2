//! HTTP routes for the planning service.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::model::{SemInputs, SemPlan};
use crate::server::AppState;
use crate::utils::error::PlanError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
    pub text_generation: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Error returned to HTTP callers as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, err.user_friendly_message())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            StatusCode::UNSUPPORTED_MEDIA_TYPE => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            StatusCode::BAD_REQUEST => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::new(status, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "sem-planner".to_string(),
        text_generation: state.planner.has_text_generator(),
    })
}

/// Generate a SEM plan from keyword ideas
pub async fn generate_sem_plan(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SemInputs>, JsonRejection>,
) -> Result<Json<SemPlan>, ApiError> {
    let Json(inputs) = payload?;

    match state.planner.generate_sem_plan(&inputs).await {
        Ok(plan) => {
            tracing::info!(
                brand = %plan.brand,
                keywords = plan.total_keywords,
                "SEM plan generated"
            );
            Ok(Json(plan))
        }
        Err(e) => {
            tracing::error!(error = %e, category = ?e.category(), "Failed to generate SEM plan");
            Err(e.into())
        }
    }
}

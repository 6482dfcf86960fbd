use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::climate::ClimateError;
use crate::services::prediction::PredictionError;

/// Outward message for every prediction failure that is not the caller's fault.
pub const PREDICTION_UNAVAILABLE: &str = "Prediction unavailable";

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ExternalServiceError(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::NotImplemented(msg) => (StatusCode::NOT_IMPLEMENTED, msg),
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ClimateError> for AppError {
    fn from(err: ClimateError) -> Self {
        match err {
            ClimateError::InvalidQuery(msg) => AppError::BadRequest(msg),
            err @ ClimateError::UpstreamFetch { .. } => {
                AppError::ExternalServiceError(err.to_string())
            }
        }
    }
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::InvalidWindSpeed(e) => AppError::BadRequest(e.to_string()),
            err @ PredictionError::NonFiniteFeature { .. } => AppError::BadRequest(err.to_string()),
            other => {
                // The specific classification stays in the logs only.
                tracing::error!("Prediction failed: {}", other);
                AppError::ExternalServiceError(PREDICTION_UNAVAILABLE.to_string())
            }
        }
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::errors::PlanError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Plan generation exceeded the {0} ms budget")]
    Timeout(u64),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation error"),
            ApiError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "Generation timed out"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

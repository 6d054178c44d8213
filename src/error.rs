//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::ErrorResponse;
use crate::pricing::PricingError;
use crate::routing::RoutingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::Validation { message, .. } => AppError::Validation(message),
            PricingError::Routing(e) => AppError::Routing(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::Validation(msg) => {
                tracing::debug!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, "Invalid request")
            }
            AppError::Routing(e) => {
                tracing::error!("Routing error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Distance could not be determined")
            }
        };

        let detail = match self {
            AppError::Validation(msg) => msg,
            AppError::Routing(e) => e.to_string(),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            detail,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

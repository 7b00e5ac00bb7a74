use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::orders::OrderError;

/// Envelope shared by every JSON response of the service.
#[derive(Serialize, Debug, ToSchema)]
pub struct StdResponse<T, M> {
    pub data: Option<T>,
    pub message: Option<M>,
}

impl<T: Serialize, M: Serialize> IntoResponse for StdResponse<T, M> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        required_fields: Vec<&'static str>,
    },
    #[error("{0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    ForbiddenResource(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0} is unreachable")]
    ServiceUnreachable(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenResource(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnreachable(_) => StatusCode::BAD_GATEWAY,
            AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Validation {
                message,
                required_fields,
            } => json!({
                "data": null,
                "message": message,
                "requiredFields": required_fields,
            }),
            AppError::Other(err) => {
                tracing::error!(error = ?err, "Unhandled error");
                json!({ "data": null, "message": "Internal server error" })
            }
            other => json!({ "data": null, "message": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation {
                message,
                required_fields,
            } => AppError::Validation {
                message,
                required_fields,
            },
            OrderError::UserNotFound(_) => AppError::NotFound(err.to_string()),
            OrderError::InsufficientStock { .. } => AppError::Conflict(err.to_string()),
            OrderError::Gateway(gateway_err) => {
                tracing::error!(error = %gateway_err, "Payment gateway failure");
                AppError::ServiceUnreachable("Payment gateway".into())
            }
            OrderError::Persistence(err) => AppError::Other(err),
        }
    }
}

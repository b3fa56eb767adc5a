//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::CoreError;
use domain_dispatch::DispatchError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request carried no usable JSON body
    #[error("Missed Payload")]
    MissedPayload,

    /// The payload or the backend list was rejected; the message is returned as is
    #[error("{0}")]
    BadRequest(String),

    /// Server-side configuration problem
    #[error("{0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissedPayload | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidPayload(_) => ApiError::BadRequest(err.to_string()),
            other => {
                error!(error = %other, "Driver configuration error");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::NoBackends | DispatchError::UnknownBackends(_) => {
                ApiError::BadRequest(err.to_string())
            }
            DispatchError::Driver(core) => core.into(),
        }
    }
}

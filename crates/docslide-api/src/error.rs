//! HTTP error responses.
//!
//! Every error renders as an envelope so clients parse one shape for all
//! outcomes.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use docslide_core::defaults::ROUTER_PROVIDER;
use docslide_core::Envelope;

#[derive(Debug)]
pub enum ApiError {
    /// Unknown `operation` field (400).
    UnsupportedOperation(String),
    /// Provider answered with a failed envelope (502, returned as-is).
    Upstream(Envelope),
    /// Request body exceeded the configured limit (413).
    PayloadTooLarge(String),
    /// Malformed request body or invalid provider data (500).
    Internal(String),
}

impl ApiError {
    pub fn unsupported(operation: &str) -> Self {
        Self::UnsupportedOperation(format!("Unsupported operation \"{}\".", operation))
    }
}

impl From<docslide_core::Error> for ApiError {
    fn from(err: docslide_core::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::Internal(format!("Multipart error: {}", err.body_text()))
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Internal(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            ApiError::UnsupportedOperation(msg) => {
                (StatusCode::BAD_REQUEST, Envelope::error(ROUTER_PROVIDER, msg))
            }
            ApiError::Upstream(envelope) => (StatusCode::BAD_GATEWAY, envelope),
            ApiError::PayloadTooLarge(msg) => {
                warn!(error = %msg, "Request body too large");
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    Envelope::error(ROUTER_PROVIDER, msg),
                )
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "AI endpoint failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::error(ROUTER_PROVIDER, msg),
                )
            }
        };

        (status, Json(envelope)).into_response()
    }
}

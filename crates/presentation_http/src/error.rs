//! API error handling
//!
//! Every failure is answered with `{"error": "<message>"}`. Client errors
//! carry a message the user can act on; provider and internal failures are
//! logged with their details and answered with a generic message so
//! provider internals never reach the browser.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// An upstream provider failed or answered with garbage
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Gateway timeout: {0}")]
    GatewayTimeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    /// HTTP status for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client
    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => msg.clone(),
            Self::BadGateway(_) => {
                "The assistant is unable to respond right now, please try again".to_string()
            },
            Self::ServiceUnavailable(_) => {
                "The assistant is busy right now, please try again shortly".to_string()
            },
            Self::GatewayTimeout(_) => "The request took too long to complete".to_string(),
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::InputMissing
            | ApplicationError::ModerationBlocked { .. }
            | ApplicationError::InvalidArtifact(_) => Self::BadRequest(err.to_string()),
            ApplicationError::NotFound(_) => Self::NotFound("Audio file not found".to_string()),
            ApplicationError::TranscriptionFailed(_)
            | ApplicationError::GenerationFailed(_)
            | ApplicationError::SynthesisFailed(_)
            | ApplicationError::MalformedProviderResponse(_) => Self::BadGateway(err.to_string()),
            ApplicationError::RateLimited => Self::ServiceUnavailable(err.to_string()),
            ApplicationError::Timeout(_) => Self::GatewayTimeout(err.to_string()),
            ApplicationError::Cancelled
            | ApplicationError::Storage(_)
            | ApplicationError::Configuration(_)
            | ApplicationError::Domain(_)
            | ApplicationError::Internal(_) => Self::Internal(err.to_string()),
        }
    }
}

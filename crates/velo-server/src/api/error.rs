//! API error types and response handling.
//!
//! This module provides a unified error type for all API handlers
//! with automatic conversion to appropriate HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type.
///
/// Each variant maps to a specific HTTP status code and produces a
/// consistent JSON error response.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// 400 Bad Request - Invalid input from client.
    BadRequest {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },

    /// 404 Not Found - Resource does not exist.
    NotFound {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },

    /// 409 Conflict - Operation cannot be completed due to current state.
    Conflict {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },

    /// 500 Internal Server Error - Unexpected server-side error.
    InternalError {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
        /// Optional details (not exposed to client in production).
        details: Option<String>,
    },
}

/// Standard JSON error response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "BIKE_UNAVAILABLE",
    "message": "Bike 'B1' is not available for rental",
    "details": null
}))]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "BIKE_UNAVAILABLE").
    #[schema(example = "BIKE_UNAVAILABLE")]
    pub error: String,

    /// Human-readable error message.
    #[schema(example = "Bike 'B1' is not available for rental")]
    pub message: String,

    /// Optional additional details for debugging.
    #[schema(nullable)]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Self::BadRequest {
                error_code,
                message,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: error_code,
                    message,
                    details: None,
                },
            ),

            Self::NotFound {
                error_code,
                message,
            } => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: error_code,
                    message,
                    details: None,
                },
            ),

            Self::Conflict {
                error_code,
                message,
            } => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: error_code,
                    message,
                    details: None,
                },
            ),

            Self::InternalError {
                error_code,
                message,
                details,
            } => {
                // Log internal errors
                tracing::error!(
                    error_code = %error_code,
                    message = %message,
                    details = ?details,
                    "Internal server error"
                );

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: error_code,
                        message,
                        details: details.map(|d| serde_json::json!(d)),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest { message, .. } => write!(f, "Bad Request: {message}"),
            Self::NotFound { message, .. } => write!(f, "Not Found: {message}"),
            Self::Conflict { message, .. } => write!(f, "Conflict: {message}"),
            Self::InternalError { message, .. } => {
                write!(f, "Internal Error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Convert from velo_core errors.
///
/// Lookup failures map to 404, rejected state transitions to 409, and the
/// remaining variants (clock anomalies, configuration faults) to 500.
impl From<velo_core::VeloError> for ApiError {
    fn from(err: velo_core::VeloError) -> Self {
        use velo_core::VeloError;

        match &err {
            VeloError::BikeNotFound(_)
            | VeloError::RentalNotFound(_)
            | VeloError::RenterNotFound(_) => Self::NotFound {
                error_code: err.error_code().to_string(),
                message: err.to_string(),
            },
            VeloError::BikeUnavailable(_)
            | VeloError::InvalidTransition { .. }
            | VeloError::RentalAlreadyCompleted(_)
            | VeloError::RentalNotCompleted(_) => Self::Conflict {
                error_code: err.error_code().to_string(),
                message: err.to_string(),
            },
            VeloError::InvalidTimeRange { .. }
            | VeloError::ConfigParseError(_)
            | VeloError::ConfigValidationError(_)
            | VeloError::ConfigIoError { .. } => Self::InternalError {
                error_code: err.error_code().to_string(),
                message: err.to_string(),
                details: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_error() {
        let err = ApiError::BadRequest {
            error_code: "test_error".to_string(),
            message: "Test message".to_string(),
        };
        assert!(err.to_string().contains("Bad Request"));
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse {
            error: "test_error".to_string(),
            message: "Test message".to_string(),
            details: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test_error"));
    }

    #[test]
    fn test_core_not_found_maps_to_404() {
        let err = ApiError::from(velo_core::VeloError::BikeNotFound("B9".into()));
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn test_core_conflicts_map_to_409() {
        let err = ApiError::from(velo_core::VeloError::BikeUnavailable("B1".into()));
        assert!(matches!(err, ApiError::Conflict { .. }));

        let err = ApiError::from(velo_core::VeloError::RentalAlreadyCompleted("R0".into()));
        assert!(matches!(err, ApiError::Conflict { .. }));
    }
}

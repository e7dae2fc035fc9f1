//! Unified API error handling
//!
//! Every failure is rendered as `{"error": {"code", "message", "details"?, "request_id"}}`.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::service::AnalysisError;

const VALIDATION_MESSAGE: &str = "Data validation error: 'sentences' must be a list of strings";

/// Error details
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Per-field validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub details: Option<Vec<serde_json::Value>>,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Unified API error type
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Malformed request body (422)
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<serde_json::Value>,
    },

    /// Service misconfiguration, such as a missing prompt template (500)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Configuration(_) => "CONFIG_ERROR",
            ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Configuration(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let code = self.code();
        let request_id = Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                code = code,
                status = status.as_u16(),
                request_id = %request_id,
                message = %self,
                "API error"
            );
        } else {
            tracing::warn!(
                code = code,
                status = status.as_u16(),
                request_id = %request_id,
                message = %self,
                "Rejected request"
            );
        }

        let details = match self {
            ApiError::Validation { details, .. } => Some(details.clone()),
            _ => None,
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
                details,
                request_id,
            },
        })
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Prompt(e) => ApiError::Configuration(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonPayloadError> for ApiError {
    fn from(err: JsonPayloadError) -> Self {
        let detail = match &err {
            JsonPayloadError::Deserialize(e) => {
                let kind = match e.classify() {
                    serde_json::error::Category::Data => "type_error",
                    _ => "json_invalid",
                };
                json!({
                    "type": kind,
                    "loc": ["body"],
                    "msg": e.to_string(),
                    "line": e.line(),
                    "column": e.column(),
                })
            }
            JsonPayloadError::ContentType => json!({
                "type": "content_type",
                "loc": ["header", "content-type"],
                "msg": err.to_string(),
            }),
            _ => json!({
                "type": "payload",
                "loc": ["body"],
                "msg": err.to_string(),
            }),
        };

        ApiError::Validation {
            message: VALIDATION_MESSAGE.to_string(),
            details: vec![detail],
        }
    }
}

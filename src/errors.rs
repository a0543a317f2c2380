use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

/// Message returned to callers that fail the API key check.
pub const FORBIDDEN_MESSAGE: &str = "Forbidden – Invalid API Key";

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Request body could not be interpreted as a lead.
    BadRequest(String),
    /// Request body exceeds the size limit.
    PayloadTooLarge(String),
    /// Missing or wrong `x-api-key` header.
    Forbidden,
    /// No usable Salesforce access token.
    Authorization(String),
    /// Salesforce rejected the access token (HTTP 401).
    SessionExpired(String),
    /// Salesforce rejected the request or could not be reached.
    ExternalApiError(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl AppError {
    /// The message surfaced to the caller, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            AppError::BadRequest(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Authorization(msg)
            | AppError::SessionExpired(msg)
            | AppError::ExternalApiError(msg)
            | AppError::InternalError(msg) => msg.clone(),
            AppError::Forbidden => FORBIDDEN_MESSAGE.to_string(),
            AppError::WithContext { source, .. } => source.message(),
        }
    }

    /// Whether Salesforce reported the session as invalid, looking through context wrappers.
    pub fn is_session_expired(&self) -> bool {
        match self {
            AppError::SessionExpired(_) => true,
            AppError::WithContext { source, .. } => source.is_session_expired(),
            _ => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            AppError::Forbidden => write!(f, "Forbidden: invalid API key"),
            AppError::Authorization(msg) => write!(f, "Authorization error: {}", msg),
            AppError::SessionExpired(msg) => write!(f, "Session expired: {}", msg),
            AppError::ExternalApiError(msg) => write!(f, "External API error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each error variant to an HTTP status code and JSON body.
    ///
    /// Upstream failures are reported as 500 with the raw message so webhook
    /// callers can see why Salesforce refused the lead.
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                StatusCode::BAD_REQUEST
            }
            AppError::PayloadTooLarge(msg) => {
                tracing::warn!("Payload too large: {}", msg);
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AppError::Forbidden => {
                tracing::warn!("Rejected request with invalid API key");
                StatusCode::FORBIDDEN
            }
            AppError::Authorization(msg) => {
                tracing::error!("Salesforce authorization error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::SessionExpired(msg) => {
                tracing::error!("Salesforce session expired: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ExternalApiError(msg) => {
                tracing::error!("External API error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::WithContext { source, context } => {
                // Log full context chain for debugging
                tracing::error!("Error with context: {} -> {}", context, source);
                // Delegate to underlying error's response
                return (**source).clone().into_response();
            }
        };

        let body = Json(ErrorResponse {
            error: self.message(),
        });

        (status, body).into_response()
    }
}

/// Bodies the `Json` extractor refuses (bad syntax, wrong content type,
/// oversized) are reported in the same `{error}` shape as everything else.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_raw_message() {
        let err: Result<(), AppError> =
            Err(AppError::ExternalApiError("Required fields are missing".to_string()));
        let wrapped = err.context("Salesforce lead creation").unwrap_err();

        assert_eq!(wrapped.message(), "Required fields are missing");
        assert_eq!(
            wrapped.to_string(),
            "Salesforce lead creation: External API error: Required fields are missing"
        );
    }

    #[test]
    fn test_session_expired_seen_through_context() {
        let err: Result<(), AppError> =
            Err(AppError::SessionExpired("Session expired or invalid".to_string()));
        let wrapped = err.with_context(|| "lead 42".to_string()).unwrap_err();

        assert!(wrapped.is_session_expired());
        assert!(!AppError::Forbidden.is_session_expired());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::BadRequest("x".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ExternalApiError("x".to_string())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::PayloadTooLarge("x".to_string())
                .into_response()
                .status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::WithContext {
                source: Box::new(AppError::Forbidden),
                context: "auth".to_string(),
            }
            .into_response()
            .status(),
            StatusCode::FORBIDDEN
        );
    }
}

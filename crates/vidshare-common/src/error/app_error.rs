//! Application error types
//!
//! Unified error handling for the entire application.

use serde::Serialize;
use vidshare_core::DomainError;

/// Error type shared by the binaries and the service layer
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    /// HTTP status for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InvalidToken | Self::TokenExpired => 401,
            Self::NotFound(_) => 404,
            Self::Database(_) | Self::Cache(_) | Self::Config(_) | Self::Internal(_) => 500,
            Self::Domain(e) => domain_status(e),
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Whether the client may retry the same request unchanged
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_transient())
    }
}

/// Status for the engagement taxonomy and the other domain failures
fn domain_status(e: &DomainError) -> u16 {
    if e.is_unauthenticated() {
        401
    } else if e.is_not_found() {
        404
    } else if e.is_authorization() {
        403
    } else if e.is_validation() {
        400
    } else if e.is_conflict() {
        409
    } else if e.is_transient() {
        503
    } else {
        500
    }
}

/// Error response structure for API responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    /// Present (and `true`) only when the client may retry
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            retryable: err.is_retryable(),
            details: None,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use vidshare_core::Snowflake;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::TokenExpired.status_code(), 401);
        assert_eq!(AppError::NotFound("video".to_string()).status_code(), 404);
        assert_eq!(AppError::Validation("test".to_string()).status_code(), 400);
        assert_eq!(AppError::Database("test".to_string()).status_code(), 500);
    }

    #[test]
    fn test_engagement_taxonomy_status() {
        assert_eq!(AppError::Domain(DomainError::Unauthenticated).status_code(), 401);
        assert_eq!(
            AppError::Domain(DomainError::reference("Video", Snowflake::new(1))).status_code(),
            404
        );
        assert_eq!(
            AppError::Domain(DomainError::ConstraintViolation("pk".into())).status_code(),
            409
        );
        assert_eq!(
            AppError::Domain(DomainError::StoreUnavailable("timeout".into())).status_code(),
            503
        );
    }

    #[test]
    fn test_retryable() {
        assert!(AppError::Domain(DomainError::StoreUnavailable("x".into())).is_retryable());
        assert!(!AppError::Domain(DomainError::ConstraintViolation("x".into())).is_retryable());
        assert!(!AppError::InvalidToken.is_retryable());
    }

    #[test]
    fn test_error_response() {
        let err = AppError::NotFound("video".to_string());
        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "Resource not found: video");
        assert!(!response.retryable);

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("retryable").is_none());

        let err = AppError::Domain(DomainError::StoreUnavailable("down".into()));
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(json["retryable"], true);
        assert_eq!(json["code"], "STORE_UNAVAILABLE");
    }
}

//! Unified error handling.
//!
//! One error type for every service layer, rendered as an HTTP response with
//! a stable machine-readable code and a user-facing message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{DomainError, Role};
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication
    #[error("Missing JWT token")]
    MissingCredential,

    #[error("Invalid JWT token")]
    InvalidCredential,

    #[error("JWT token expired")]
    TokenExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Authorization
    #[error("{required} role required")]
    WrongRole { required: Role },

    #[error("{0}")]
    Forbidden(String),

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    // Inventory and redemption
    #[error("Coupon is sold out")]
    SoldOut,

    #[error("Offer has expired")]
    OfferExpired,

    #[error("Offer has already been redeemed")]
    AlreadyRedeemed,

    // Validation
    #[error("{0}")]
    IdMismatch(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Store unavailable")]
    StoreUnavailable(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingCredential => "MISSING_CREDENTIAL",
            AppError::InvalidCredential => "INVALID_CREDENTIAL",
            AppError::TokenExpired => "TOKEN_EXPIRED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::WrongRole { .. } => "WRONG_ROLE",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::SoldOut => "SOLD_OUT",
            AppError::OfferExpired => "OFFER_EXPIRED",
            AppError::AlreadyRedeemed => "ALREADY_REDEEMED",
            AppError::IdMismatch(_) => "ID_MISMATCH",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            #[cfg(feature = "database")]
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCredential
            | AppError::InvalidCredential
            | AppError::TokenExpired
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::WrongRole { .. } | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::SoldOut | AppError::AlreadyRedeemed => {
                StatusCode::CONFLICT
            }
            AppError::OfferExpired => StatusCode::GONE,
            AppError::IdMismatch(_) | AppError::Validation(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            #[cfg(feature = "database")]
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            #[cfg(feature = "database")]
            AppError::StoreUnavailable(e) => {
                tracing::error!("Store error: {:?}", e);
                "The data store is unavailable".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::Password(msg) => AppError::Validation(msg),
            DomainError::NotFound(entity) => AppError::NotFound(entity),
            DomainError::Conflict(entity) => AppError::Conflict(entity),
            DomainError::SoldOut => AppError::SoldOut,
            DomainError::OfferExpired => AppError::OfferExpired,
            DomainError::AlreadyRedeemed => AppError::AlreadyRedeemed,
            err @ DomainError::IdMismatch { .. } => AppError::IdMismatch(err.to_string()),
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(entity.to_string()))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound(entity.into())
    }

    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn wrong_role(required: Role) -> Self {
        AppError::WrongRole { required }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[test]
    fn test_domain_errors_keep_their_kind() {
        assert!(matches!(AppError::from(DomainError::SoldOut), AppError::SoldOut));
        assert!(matches!(
            AppError::from(DomainError::OfferExpired),
            AppError::OfferExpired
        ));
        assert!(matches!(
            AppError::from(DomainError::AlreadyRedeemed),
            AppError::AlreadyRedeemed
        ));
        assert!(matches!(
            AppError::from(DomainError::IdMismatch {
                path: "c1".to_string(),
                body: "c2".to_string()
            }),
            AppError::IdMismatch(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::Password("short".to_string())),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::MissingCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::wrong_role(Role::Client).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::SoldOut.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::OfferExpired.status(), StatusCode::GONE);
        assert_eq!(
            AppError::IdMismatch("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_wrong_role_message() {
        assert_eq!(
            AppError::wrong_role(Role::Employee).to_string(),
            "employee role required"
        );
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = AppError::internal("connection string leaked");
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let response = AppError::SoldOut.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], "SOLD_OUT");
        assert_eq!(json["error"]["message"], "Coupon is sold out");
    }
}
